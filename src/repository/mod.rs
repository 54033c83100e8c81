//! Repository layer: one persistence gateway per entity
//!
//! Every gateway implements [`EntityRepository`]; the backing store is either
//! PostgreSQL or an in-process map.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{
        Book, BookCopy, Category, CheckOut, Entity, Notification, Page, PageRequest,
        PatronAccount, WaitList,
    },
};

pub use memory::{Directory, InMemoryBookRepository, InMemoryRepository};
pub use postgres::PgRepository;

/// Persistence gateway for one entity type
#[async_trait]
pub trait EntityRepository<E: Entity>: Send + Sync {
    /// Stores a new record and returns it with its identifier assigned
    async fn insert(&self, entity: E) -> AppResult<E>;

    /// Replaces the stored record; `None` when the identifier does not resolve
    async fn update(&self, entity: E) -> AppResult<Option<E>>;

    /// Reads, merges and writes back the record as one unit
    async fn merge(&self, id: &E::Id, patch: E::Patch) -> AppResult<Option<E>>;

    async fn find_by_id(&self, id: &E::Id, eager: bool) -> AppResult<Option<E>>;

    async fn find_page(&self, request: &PageRequest, eager: bool) -> AppResult<Page<E>>;

    async fn exists(&self, id: &E::Id) -> AppResult<bool>;

    /// Removes the record; returns whether a record was removed
    async fn delete(&self, id: &E::Id) -> AppResult<bool>;

    async fn count(&self) -> AppResult<u64>;
}

#[derive(Clone)]
enum Storage {
    Postgres(Pool<Postgres>),
    Memory(Arc<Directory>),
}

/// Main repository struct holding one gateway per entity
#[derive(Clone)]
pub struct Repository {
    storage: Storage,
    pub patron_accounts: Arc<dyn EntityRepository<PatronAccount>>,
    pub books: Arc<dyn EntityRepository<Book>>,
    pub check_outs: Arc<dyn EntityRepository<CheckOut>>,
    pub book_copies: Arc<dyn EntityRepository<BookCopy>>,
    pub categories: Arc<dyn EntityRepository<Category>>,
    pub notifications: Arc<dyn EntityRepository<Notification>>,
    pub wait_lists: Arc<dyn EntityRepository<WaitList>>,
}

impl Repository {
    /// Create a repository backed by the given database pool
    pub fn postgres(pool: Pool<Postgres>) -> Self {
        Self {
            patron_accounts: Arc::new(PgRepository::<PatronAccount>::new(pool.clone())),
            books: Arc::new(PgRepository::<Book>::new(pool.clone())),
            check_outs: Arc::new(PgRepository::<CheckOut>::new(pool.clone())),
            book_copies: Arc::new(PgRepository::<BookCopy>::new(pool.clone())),
            categories: Arc::new(PgRepository::<Category>::new(pool.clone())),
            notifications: Arc::new(PgRepository::<Notification>::new(pool.clone())),
            wait_lists: Arc::new(PgRepository::<WaitList>::new(pool.clone())),
            storage: Storage::Postgres(pool),
        }
    }

    /// Create an in-process repository with an empty directory of users and
    /// publishers
    pub fn in_memory() -> Self {
        Self::in_memory_with(Arc::new(Directory::default()))
    }

    pub fn in_memory_with(directory: Arc<Directory>) -> Self {
        Self {
            patron_accounts: Arc::new(InMemoryRepository::<PatronAccount>::new(directory.clone())),
            books: Arc::new(InMemoryBookRepository::new(directory.clone())),
            check_outs: Arc::new(InMemoryRepository::<CheckOut>::new(directory.clone())),
            book_copies: Arc::new(InMemoryRepository::<BookCopy>::new(directory.clone())),
            categories: Arc::new(InMemoryRepository::<Category>::new(directory.clone())),
            notifications: Arc::new(InMemoryRepository::<Notification>::new(directory.clone())),
            wait_lists: Arc::new(InMemoryRepository::<WaitList>::new(directory.clone())),
            storage: Storage::Memory(directory),
        }
    }

    /// Check that the backing store answers
    pub async fn ping(&self) -> AppResult<()> {
        match &self.storage {
            Storage::Postgres(pool) => {
                sqlx::query("SELECT 1").execute(pool).await?;
                Ok(())
            }
            Storage::Memory(_) => Ok(()),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match &self.storage {
            Storage::Postgres(_) => "postgres",
            Storage::Memory(_) => "memory",
        }
    }
}

//! In-process gateways backed by a locked map

use std::cmp::Ordering as CmpOrdering;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::EntityRepository;
use crate::{
    error::AppResult,
    models::{Book, BookPatch, Direction, Entity, EntityId, LabelSource, Page, PageRequest},
};

/// Reference labels known to the in-memory backend. Users and publishers are
/// registered directly; book titles follow the book gateway's writes.
#[derive(Default)]
pub struct Directory {
    users: RwLock<HashMap<i64, String>>,
    books: RwLock<HashMap<i64, String>>,
    publishers: RwLock<HashMap<i64, String>>,
}

impl Directory {
    pub fn register_user(&self, id: i64, login: impl Into<String>) {
        self.users.write().insert(id, login.into());
    }

    pub fn register_book(&self, id: i64, title: impl Into<String>) {
        self.books.write().insert(id, title.into());
    }

    pub fn register_publisher(&self, id: i64, name: impl Into<String>) {
        self.publishers.write().insert(id, name.into());
    }

    fn forget_book(&self, id: i64) {
        self.books.write().remove(&id);
    }

    fn record_book(&self, book: &Book) {
        if let Some(id) = book.id {
            match &book.title {
                Some(title) => self.register_book(id, title.clone()),
                None => self.forget_book(id),
            }
        }
    }
}

impl LabelSource for Directory {
    fn user_login(&self, id: i64) -> Option<String> {
        self.users.read().get(&id).cloned()
    }

    fn book_title(&self, id: i64) -> Option<String> {
        self.books.read().get(&id).cloned()
    }

    fn publisher_name(&self, id: i64) -> Option<String> {
        self.publishers.read().get(&id).cloned()
    }
}

pub struct InMemoryRepository<E: Entity> {
    sequence: AtomicI64,
    records: RwLock<BTreeMap<E::Id, E>>,
    labels: Arc<dyn LabelSource>,
}

impl<E: Entity> InMemoryRepository<E> {
    pub fn new(labels: Arc<dyn LabelSource>) -> Self {
        Self {
            sequence: AtomicI64::new(1),
            records: RwLock::new(BTreeMap::new()),
            labels,
        }
    }

    fn next_id(&self) -> E::Id {
        E::Id::mint().unwrap_or_else(|| E::Id::from_sequence(self.sequence.fetch_add(1, Ordering::Relaxed)))
    }

    fn compare(request: &PageRequest, a: &E, b: &E) -> CmpOrdering {
        for order in &request.sort {
            let ordering = a.sort_key(order.field.name).cmp(&b.sort_key(order.field.name));
            let ordering = match order.direction {
                Direction::Asc => ordering,
                Direction::Desc => ordering.reverse(),
            };
            if ordering != CmpOrdering::Equal {
                return ordering;
            }
        }
        a.id().cmp(&b.id())
    }
}

#[async_trait]
impl<E: Entity> EntityRepository<E> for InMemoryRepository<E> {
    async fn insert(&self, mut entity: E) -> AppResult<E> {
        let id = self.next_id();
        entity.set_id(id.clone());
        entity.detach_references();
        self.records.write().insert(id, entity.clone());
        Ok(entity)
    }

    async fn update(&self, mut entity: E) -> AppResult<Option<E>> {
        let Some(id) = entity.id().cloned() else {
            return Ok(None);
        };
        entity.detach_references();

        let mut records = self.records.write();
        match records.get_mut(&id) {
            Some(stored) => {
                *stored = entity.clone();
                Ok(Some(entity))
            }
            None => Ok(None),
        }
    }

    async fn merge(&self, id: &E::Id, patch: E::Patch) -> AppResult<Option<E>> {
        let mut records = self.records.write();
        Ok(records.get_mut(id).map(|stored| {
            stored.merge(patch);
            stored.clone()
        }))
    }

    async fn find_by_id(&self, id: &E::Id, eager: bool) -> AppResult<Option<E>> {
        let found = self.records.read().get(id).cloned();
        Ok(found.map(|mut entity| {
            if eager {
                entity.resolve_references(self.labels.as_ref());
            }
            entity
        }))
    }

    async fn find_page(&self, request: &PageRequest, eager: bool) -> AppResult<Page<E>> {
        let mut all: Vec<E> = self.records.read().values().cloned().collect();
        let total_elements = all.len() as u64;
        all.sort_by(|a, b| Self::compare(request, a, b));

        let content = all
            .into_iter()
            .skip(request.offset() as usize)
            .take(request.size as usize)
            .map(|mut entity| {
                if eager {
                    entity.resolve_references(self.labels.as_ref());
                }
                entity
            })
            .collect();

        Ok(Page {
            content,
            number: request.page,
            size: request.size,
            total_elements,
        })
    }

    async fn exists(&self, id: &E::Id) -> AppResult<bool> {
        Ok(self.records.read().contains_key(id))
    }

    async fn delete(&self, id: &E::Id) -> AppResult<bool> {
        Ok(self.records.write().remove(id).is_some())
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.records.read().len() as u64)
    }
}

/// Book gateway that keeps the directory's title labels in step with the
/// stored books
pub struct InMemoryBookRepository {
    books: InMemoryRepository<Book>,
    directory: Arc<Directory>,
}

impl InMemoryBookRepository {
    pub fn new(directory: Arc<Directory>) -> Self {
        Self {
            books: InMemoryRepository::new(directory.clone()),
            directory,
        }
    }
}

#[async_trait]
impl EntityRepository<Book> for InMemoryBookRepository {
    async fn insert(&self, entity: Book) -> AppResult<Book> {
        let stored = self.books.insert(entity).await?;
        self.directory.record_book(&stored);
        Ok(stored)
    }

    async fn update(&self, entity: Book) -> AppResult<Option<Book>> {
        let stored = self.books.update(entity).await?;
        if let Some(book) = &stored {
            self.directory.record_book(book);
        }
        Ok(stored)
    }

    async fn merge(&self, id: &i64, patch: BookPatch) -> AppResult<Option<Book>> {
        let merged = self.books.merge(id, patch).await?;
        if let Some(book) = &merged {
            self.directory.record_book(book);
        }
        Ok(merged)
    }

    async fn find_by_id(&self, id: &i64, eager: bool) -> AppResult<Option<Book>> {
        self.books.find_by_id(id, eager).await
    }

    async fn find_page(&self, request: &PageRequest, eager: bool) -> AppResult<Page<Book>> {
        self.books.find_page(request, eager).await
    }

    async fn exists(&self, id: &i64) -> AppResult<bool> {
        self.books.exists(id).await
    }

    async fn delete(&self, id: &i64) -> AppResult<bool> {
        let removed = self.books.delete(id).await?;
        if removed {
            self.directory.forget_book(*id);
        }
        Ok(removed)
    }

    async fn count(&self) -> AppResult<u64> {
        self.books.count().await
    }
}

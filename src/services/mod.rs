//! Entity services

pub mod entity;

pub use entity::EntityService;

use crate::{
    config::DeletePolicy,
    error::AppResult,
    models::{Book, BookCopy, Category, CheckOut, Notification, PatronAccount, WaitList},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub patron_accounts: EntityService<PatronAccount>,
    pub books: EntityService<Book>,
    pub check_outs: EntityService<CheckOut>,
    pub book_copies: EntityService<BookCopy>,
    pub categories: EntityService<Category>,
    pub notifications: EntityService<Notification>,
    pub wait_lists: EntityService<WaitList>,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, delete_policy: DeletePolicy) -> Self {
        Self {
            patron_accounts: EntityService::new(repository.patron_accounts.clone(), delete_policy),
            books: EntityService::new(repository.books.clone(), delete_policy),
            check_outs: EntityService::new(repository.check_outs.clone(), delete_policy),
            book_copies: EntityService::new(repository.book_copies.clone(), delete_policy),
            categories: EntityService::new(repository.categories.clone(), delete_policy),
            notifications: EntityService::new(repository.notifications.clone(), delete_policy),
            wait_lists: EntityService::new(repository.wait_lists.clone(), delete_policy),
            repository,
        }
    }

    /// Check storage reachability
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.ping().await
    }

    pub fn storage_backend(&self) -> &'static str {
        self.repository.backend_name()
    }
}

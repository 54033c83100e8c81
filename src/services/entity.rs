//! Generic entity service
//!
//! A thin layer over a gateway that enforces the identifier rules shared by
//! every entity and maps missing records to `NotFound`.

use std::sync::Arc;

use crate::{
    config::DeletePolicy,
    error::{AppError, AppResult},
    models::{Entity, Page, PageRequest},
    repository::EntityRepository,
};

pub struct EntityService<E: Entity> {
    repository: Arc<dyn EntityRepository<E>>,
    delete_policy: DeletePolicy,
}

impl<E: Entity> Clone for EntityService<E> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
            delete_policy: self.delete_policy,
        }
    }
}

impl<E: Entity> EntityService<E> {
    pub fn new(repository: Arc<dyn EntityRepository<E>>, delete_policy: DeletePolicy) -> Self {
        Self {
            repository,
            delete_policy,
        }
    }

    fn not_found(id: &E::Id) -> AppError {
        AppError::NotFound(format!("{} with id {} not found", E::NAME, id))
    }

    /// Save a new record; it must not carry an identifier yet
    pub async fn save(&self, entity: E) -> AppResult<E> {
        tracing::debug!("Request to save {} : {:?}", E::NAME, entity);
        if entity.id().is_some() {
            return Err(AppError::id_exists(E::NAME));
        }
        self.repository.insert(entity).await
    }

    /// Replace a stored record
    pub async fn update(&self, entity: E) -> AppResult<E> {
        tracing::debug!("Request to update {} : {:?}", E::NAME, entity);
        let id = entity.id().cloned().ok_or_else(|| AppError::id_null(E::NAME))?;
        self.repository
            .update(entity)
            .await?
            .ok_or_else(|| Self::not_found(&id))
    }

    /// Merge the fields present on `patch` into the stored record
    pub async fn partial_update(&self, patch: E::Patch) -> AppResult<E> {
        tracing::debug!("Request to partially update {} : {:?}", E::NAME, patch);
        let id = E::patch_id(&patch)
            .cloned()
            .ok_or_else(|| AppError::id_null(E::NAME))?;
        self.repository
            .merge(&id, patch)
            .await?
            .ok_or_else(|| Self::not_found(&id))
    }

    pub async fn find_all(&self, request: &PageRequest, eager: bool) -> AppResult<Page<E>> {
        tracing::debug!("Request to get all {} : {:?}", E::NAME, request);
        self.repository.find_page(request, eager).await
    }

    pub async fn find_one(&self, id: &E::Id, eager: bool) -> AppResult<E> {
        tracing::debug!("Request to get {} : {}", E::NAME, id);
        self.repository
            .find_by_id(id, eager)
            .await?
            .ok_or_else(|| Self::not_found(id))
    }

    pub async fn exists(&self, id: &E::Id) -> AppResult<bool> {
        self.repository.exists(id).await
    }

    pub async fn delete(&self, id: &E::Id) -> AppResult<()> {
        tracing::debug!("Request to delete {} : {}", E::NAME, id);
        let removed = self.repository.delete(id).await?;
        if !removed && self.delete_policy == DeletePolicy::Strict {
            return Err(Self::not_found(id));
        }
        Ok(())
    }

    pub async fn count(&self) -> AppResult<u64> {
        self.repository.count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mockall::{mock, predicate::eq};

    use crate::models::{Category, CategoryPatch};

    mock! {
        CategoryRepo {}

        #[async_trait]
        impl EntityRepository<Category> for CategoryRepo {
            async fn insert(&self, entity: Category) -> AppResult<Category>;
            async fn update(&self, entity: Category) -> AppResult<Option<Category>>;
            async fn merge(&self, id: &i64, patch: CategoryPatch) -> AppResult<Option<Category>>;
            async fn find_by_id(&self, id: &i64, eager: bool) -> AppResult<Option<Category>>;
            async fn find_page(&self, request: &PageRequest, eager: bool) -> AppResult<Page<Category>>;
            async fn exists(&self, id: &i64) -> AppResult<bool>;
            async fn delete(&self, id: &i64) -> AppResult<bool>;
            async fn count(&self) -> AppResult<u64>;
        }
    }

    fn service(repo: MockCategoryRepo, policy: DeletePolicy) -> EntityService<Category> {
        EntityService::new(Arc::new(repo), policy)
    }

    fn category(id: Option<i64>) -> Category {
        Category {
            id,
            name: Some("Poetry".to_string()),
            description: None,
        }
    }

    #[tokio::test]
    async fn save_rejects_preset_identifier() {
        let mut repo = MockCategoryRepo::new();
        repo.expect_insert().never();

        let err = service(repo, DeletePolicy::Idempotent)
            .save(category(Some(1)))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation { key: "idexists", .. }));
    }

    #[tokio::test]
    async fn save_returns_stored_record() {
        let mut repo = MockCategoryRepo::new();
        repo.expect_insert()
            .times(1)
            .returning(|mut c| {
                c.id = Some(5);
                Ok(c)
            });

        let saved = service(repo, DeletePolicy::Idempotent)
            .save(category(None))
            .await
            .unwrap();
        assert_eq!(saved.id, Some(5));
    }

    #[tokio::test]
    async fn update_without_identifier_is_idnull() {
        let mut repo = MockCategoryRepo::new();
        repo.expect_update().never();

        let err = service(repo, DeletePolicy::Idempotent)
            .update(category(None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { key: "idnull", .. }));
    }

    #[tokio::test]
    async fn update_of_vanished_record_is_not_found() {
        let mut repo = MockCategoryRepo::new();
        repo.expect_update().times(1).returning(|_| Ok(None));

        let err = service(repo, DeletePolicy::Idempotent)
            .update(category(Some(9)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn partial_update_delegates_to_merge() {
        let mut repo = MockCategoryRepo::new();
        repo.expect_merge()
            .with(eq(3), mockall::predicate::always())
            .times(1)
            .returning(|id, patch| {
                Ok(Some(Category {
                    id: Some(*id),
                    name: Some("Poetry".to_string()),
                    description: patch.description,
                }))
            });

        let merged = service(repo, DeletePolicy::Idempotent)
            .partial_update(CategoryPatch {
                id: Some(3),
                name: None,
                description: Some("Verse".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(merged.name.as_deref(), Some("Poetry"));
        assert_eq!(merged.description.as_deref(), Some("Verse"));
    }

    #[tokio::test]
    async fn partial_update_of_vanished_record_is_not_found() {
        let mut repo = MockCategoryRepo::new();
        repo.expect_merge()
            .with(eq(3), mockall::predicate::always())
            .times(1)
            .returning(|_, _| Ok(None));

        let err = service(repo, DeletePolicy::Idempotent)
            .partial_update(CategoryPatch {
                id: Some(3),
                name: Some("Verse".to_string()),
                description: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn partial_update_without_identifier_is_idnull() {
        let mut repo = MockCategoryRepo::new();
        repo.expect_merge().never();

        let err = service(repo, DeletePolicy::Idempotent)
            .partial_update(CategoryPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { key: "idnull", .. }));
    }

    #[tokio::test]
    async fn delete_policy_governs_missing_identifiers() {
        let mut repo = MockCategoryRepo::new();
        repo.expect_delete().returning(|_| Ok(false));
        assert!(service(repo, DeletePolicy::Idempotent).delete(&1).await.is_ok());

        let mut repo = MockCategoryRepo::new();
        repo.expect_delete().returning(|_| Ok(false));
        let err = service(repo, DeletePolicy::Strict).delete(&1).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn find_one_maps_absence_to_not_found() {
        let mut repo = MockCategoryRepo::new();
        repo.expect_find_by_id()
            .with(eq(4), eq(true))
            .returning(|_, _| Ok(None));

        let err = service(repo, DeletePolicy::Idempotent)
            .find_one(&4, true)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}

//! PostgreSQL gateways
//!
//! Each write runs in its own transaction, committed on success and rolled
//! back when dropped on any other path. Reads run in a read-only transaction.

mod book_copies;
mod books;
mod categories;
mod check_outs;
mod notifications;
mod patron_accounts;
mod wait_lists;

use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::{
    postgres::{PgArguments, PgRow},
    query::QueryAs,
    Encode, FromRow, Pool, Postgres, Row, Type,
};

use super::EntityRepository;
use crate::{
    error::{AppError, AppResult},
    models::{Entity, EntityId, Page, PageRequest},
};

pub type PgQueryAs<'q, E> = QueryAs<'q, Postgres, E, PgArguments>;

/// Table mapping of an entity
pub trait PgEntity: Entity + for<'r> FromRow<'r, PgRow> + Unpin {
    const TABLE: &'static str;
    const ID_COLUMN: &'static str;
    /// Writable columns, in the order [`PgEntity::bind_columns`] binds them
    const COLUMNS: &'static [&'static str];
    /// Extra label columns selected on eager reads (each starting with `, `)
    const EAGER_COLUMNS: &'static str = "";
    /// Joins backing [`PgEntity::EAGER_COLUMNS`]; the entity table is aliased `t`
    const EAGER_JOINS: &'static str = "";

    fn bind_columns<'q>(&self, query: PgQueryAs<'q, Self>) -> PgQueryAs<'q, Self>;
}

/// Reads an optional label column, tolerating its absence from the row
pub(crate) fn label(row: &PgRow, column: &str) -> Option<String> {
    row.try_get::<Option<String>, _>(column).ok().flatten()
}

pub(crate) fn decode_error<E>(err: E) -> sqlx::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    sqlx::Error::Decode(Box::new(err))
}

/// Maps a rejected write: a dangling or still-referenced foreign key is a
/// client error, anything else a database failure
pub(crate) fn write_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            tracing::debug!("Foreign key violation: {}", db.message());
            AppError::BadRequest(format!(
                "Reference violates constraint {}",
                db.constraint().unwrap_or("on a related record")
            ))
        }
        _ => AppError::Database(err),
    }
}

pub struct PgRepository<E> {
    pool: Pool<Postgres>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: PgEntity> PgRepository<E> {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }

    fn select_sql(eager: bool) -> String {
        if eager {
            format!(
                "SELECT t.*{} FROM {} t {}",
                E::EAGER_COLUMNS,
                E::TABLE,
                E::EAGER_JOINS
            )
        } else {
            format!("SELECT t.* FROM {} t", E::TABLE)
        }
    }

    fn insert_sql(with_id: bool) -> String {
        let mut columns: Vec<&str> = Vec::with_capacity(E::COLUMNS.len() + 1);
        if with_id {
            columns.push(E::ID_COLUMN);
        }
        columns.extend_from_slice(E::COLUMNS);

        let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("${}", i)).collect();
        format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING *",
            E::TABLE,
            columns.join(", "),
            placeholders.join(", ")
        )
    }

    fn update_sql() -> String {
        let sets: Vec<String> = E::COLUMNS
            .iter()
            .enumerate()
            .map(|(i, column)| format!("{} = ${}", column, i + 1))
            .collect();
        format!(
            "UPDATE {} SET {} WHERE {} = ${} RETURNING *",
            E::TABLE,
            sets.join(", "),
            E::ID_COLUMN,
            E::COLUMNS.len() + 1
        )
    }

    fn order_by_sql(request: &PageRequest) -> String {
        let mut orders: Vec<String> = request
            .sort
            .iter()
            .map(|order| format!("t.{} {}", order.field.column, order.direction.as_sql()))
            .collect();
        orders.push(format!("t.{} ASC", E::ID_COLUMN));
        orders.join(", ")
    }
}

#[async_trait]
impl<E> EntityRepository<E> for PgRepository<E>
where
    E: PgEntity,
    E::Id: for<'q> Encode<'q, Postgres> + Type<Postgres>,
{
    async fn insert(&self, mut entity: E) -> AppResult<E> {
        let minted = E::Id::mint();
        let sql = Self::insert_sql(minted.is_some());

        let mut query = sqlx::query_as::<_, E>(&sql);
        if let Some(id) = minted {
            entity.set_id(id.clone());
            query = query.bind(id);
        }
        let query = entity.bind_columns(query);

        let mut tx = self.pool.begin().await?;
        let stored = query.fetch_one(&mut *tx).await.map_err(write_error)?;
        tx.commit().await?;

        tracing::debug!("Inserted {} {:?}", E::NAME, stored.id());
        Ok(stored)
    }

    async fn update(&self, entity: E) -> AppResult<Option<E>> {
        let Some(id) = entity.id().cloned() else {
            return Ok(None);
        };
        let sql = Self::update_sql();
        let query = entity.bind_columns(sqlx::query_as::<_, E>(&sql)).bind(id);

        let mut tx = self.pool.begin().await?;
        let stored = query.fetch_optional(&mut *tx).await.map_err(write_error)?;
        tx.commit().await?;

        Ok(stored)
    }

    async fn merge(&self, id: &E::Id, patch: E::Patch) -> AppResult<Option<E>> {
        let lock_sql = format!(
            "SELECT t.* FROM {} t WHERE t.{} = $1 FOR UPDATE",
            E::TABLE,
            E::ID_COLUMN
        );
        let update_sql = Self::update_sql();

        let mut tx = self.pool.begin().await?;

        let Some(mut stored) = sqlx::query_as::<_, E>(&lock_sql)
            .bind(id.clone())
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        stored.merge(patch);

        let merged = stored
            .bind_columns(sqlx::query_as::<_, E>(&update_sql))
            .bind(id.clone())
            .fetch_optional(&mut *tx)
            .await
            .map_err(write_error)?;
        tx.commit().await?;

        Ok(merged)
    }

    async fn find_by_id(&self, id: &E::Id, eager: bool) -> AppResult<Option<E>> {
        let sql = format!("{} WHERE t.{} = $1", Self::select_sql(eager), E::ID_COLUMN);

        let found = sqlx::query_as::<_, E>(&sql)
            .bind(id.clone())
            .fetch_optional(&self.pool)
            .await?;

        Ok(found)
    }

    async fn find_page(&self, request: &PageRequest, eager: bool) -> AppResult<Page<E>> {
        let count_sql = format!("SELECT COUNT(*) FROM {}", E::TABLE);
        let page_sql = format!(
            "{} ORDER BY {} LIMIT $1 OFFSET $2",
            Self::select_sql(eager),
            Self::order_by_sql(request)
        );

        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION READ ONLY")
            .execute(&mut *tx)
            .await?;

        let total: i64 = sqlx::query_scalar::<_, i64>(&count_sql).fetch_one(&mut *tx).await?;
        let content = sqlx::query_as::<_, E>(&page_sql)
            .bind(i64::try_from(request.size).unwrap_or(i64::MAX))
            .bind(request.checked_offset().unwrap_or(i64::MAX))
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Page {
            content,
            number: request.page,
            size: request.size,
            total_elements: total.max(0) as u64,
        })
    }

    async fn exists(&self, id: &E::Id) -> AppResult<bool> {
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = $1)",
            E::TABLE,
            E::ID_COLUMN
        );
        let exists: bool = sqlx::query_scalar::<_, bool>(&sql)
            .bind(id.clone())
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn delete(&self, id: &E::Id) -> AppResult<bool> {
        let sql = format!("DELETE FROM {} WHERE {} = $1", E::TABLE, E::ID_COLUMN);

        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(&sql)
            .bind(id.clone())
            .execute(&mut *tx)
            .await
            .map_err(write_error)?;
        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> AppResult<u64> {
        let sql = format!("SELECT COUNT(*) FROM {}", E::TABLE);
        let total: i64 = sqlx::query_scalar::<_, i64>(&sql).fetch_one(&self.pool).await?;
        Ok(total.max(0) as u64)
    }
}

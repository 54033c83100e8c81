//! Book table mapping

use sqlx::{postgres::PgRow, FromRow, Row};

use super::{PgEntity, PgQueryAs};
use crate::models::Book;

impl PgEntity for Book {
    const TABLE: &'static str = "book";
    const ID_COLUMN: &'static str = "id";
    const COLUMNS: &'static [&'static str] = &["title", "image", "description"];

    fn bind_columns<'q>(&self, query: PgQueryAs<'q, Self>) -> PgQueryAs<'q, Self> {
        query
            .bind(self.title.clone())
            .bind(self.image.clone())
            .bind(self.description.clone())
    }
}

impl<'r> FromRow<'r, PgRow> for Book {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: Some(row.try_get("id")?),
            title: row.try_get("title")?,
            image: row.try_get("image")?,
            description: row.try_get("description")?,
        })
    }
}

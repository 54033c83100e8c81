//! Book copy table mapping

use sqlx::{postgres::PgRow, FromRow, Row};

use super::{label, PgEntity, PgQueryAs};
use crate::models::{BookCopy, BookRef, PublisherRef};

impl PgEntity for BookCopy {
    const TABLE: &'static str = "book_copy";
    const ID_COLUMN: &'static str = "id";
    const COLUMNS: &'static [&'static str] = &[
        "year_published",
        "amount",
        "image",
        "description",
        "book_id",
        "publisher_id",
    ];
    const EAGER_COLUMNS: &'static str = ", b.title AS book_title, p.name AS publisher_name";
    const EAGER_JOINS: &'static str = "LEFT JOIN book b ON b.id = t.book_id \
         LEFT JOIN publisher p ON p.id = t.publisher_id";

    fn bind_columns<'q>(&self, query: PgQueryAs<'q, Self>) -> PgQueryAs<'q, Self> {
        query
            .bind(self.year_published)
            .bind(self.amount)
            .bind(self.image.clone())
            .bind(self.description.clone())
            .bind(self.book.as_ref().map(|b| b.id))
            .bind(self.publisher.as_ref().map(|p| p.id))
    }
}

impl<'r> FromRow<'r, PgRow> for BookCopy {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let book_id: Option<i64> = row.try_get("book_id")?;
        let publisher_id: Option<i64> = row.try_get("publisher_id")?;

        Ok(Self {
            id: Some(row.try_get("id")?),
            year_published: row.try_get("year_published")?,
            amount: row.try_get("amount")?,
            image: row.try_get("image")?,
            description: row.try_get("description")?,
            book: book_id.map(|id| BookRef {
                id,
                title: label(row, "book_title"),
            }),
            publisher: publisher_id.map(|id| PublisherRef {
                id,
                name: label(row, "publisher_name"),
            }),
        })
    }
}

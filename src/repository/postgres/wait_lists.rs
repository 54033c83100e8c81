//! Wait list table mapping

use sqlx::{postgres::PgRow, FromRow, Row};

use super::{label, PgEntity, PgQueryAs};
use crate::models::{BookRef, CardNumber, PatronAccountRef, WaitList};

impl PgEntity for WaitList {
    const TABLE: &'static str = "wait_list";
    const ID_COLUMN: &'static str = "id";
    const COLUMNS: &'static [&'static str] = &["creat_at", "patron_account_card_number", "book_id"];
    const EAGER_COLUMNS: &'static str = ", b.title AS book_title";
    const EAGER_JOINS: &'static str = "LEFT JOIN book b ON b.id = t.book_id";

    fn bind_columns<'q>(&self, query: PgQueryAs<'q, Self>) -> PgQueryAs<'q, Self> {
        query
            .bind(self.creat_at)
            .bind(self.patron_account.as_ref().map(|p| p.card_number.clone()))
            .bind(self.book.as_ref().map(|b| b.id))
    }
}

impl<'r> FromRow<'r, PgRow> for WaitList {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let card_number: Option<CardNumber> = row.try_get("patron_account_card_number")?;
        let book_id: Option<i64> = row.try_get("book_id")?;

        Ok(Self {
            id: Some(row.try_get("id")?),
            creat_at: row.try_get("creat_at")?,
            patron_account: card_number.map(PatronAccountRef::new),
            book: book_id.map(|id| BookRef {
                id,
                title: label(row, "book_title"),
            }),
        })
    }
}

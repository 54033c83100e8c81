//! Checkout table mapping

use sqlx::{postgres::PgRow, FromRow, Row};

use super::{decode_error, PgEntity, PgQueryAs};
use crate::models::{BookCopyRef, CardNumber, CheckOut, CheckOutStatus, PatronAccountRef};

impl PgEntity for CheckOut {
    const TABLE: &'static str = "check_out";
    const ID_COLUMN: &'static str = "id";
    const COLUMNS: &'static [&'static str] = &[
        "start_time",
        "end_time",
        "status",
        "is_returned",
        "book_copy_id",
        "patron_account_card_number",
    ];

    fn bind_columns<'q>(&self, query: PgQueryAs<'q, Self>) -> PgQueryAs<'q, Self> {
        query
            .bind(self.start_time)
            .bind(self.end_time)
            .bind(self.status.map(|s| s.as_str()))
            .bind(self.is_returned)
            .bind(self.book_copy.as_ref().map(|c| c.id))
            .bind(self.patron_account.as_ref().map(|p| p.card_number.clone()))
    }
}

impl<'r> FromRow<'r, PgRow> for CheckOut {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let status: Option<String> = row.try_get("status")?;
        let status = status
            .map(|s| s.parse::<CheckOutStatus>())
            .transpose()
            .map_err(decode_error)?;
        let book_copy_id: Option<i64> = row.try_get("book_copy_id")?;
        let card_number: Option<CardNumber> = row.try_get("patron_account_card_number")?;

        Ok(Self {
            id: Some(row.try_get("id")?),
            start_time: row.try_get("start_time")?,
            end_time: row.try_get("end_time")?,
            status,
            is_returned: row.try_get("is_returned")?,
            book_copy: book_copy_id.map(|id| BookCopyRef { id }),
            patron_account: card_number.map(PatronAccountRef::new),
        })
    }
}

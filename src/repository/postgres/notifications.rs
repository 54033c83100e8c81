//! Notification table mapping

use sqlx::{postgres::PgRow, FromRow, Row};

use super::{decode_error, PgEntity, PgQueryAs};
use crate::models::{Notification, NotificationType};

impl PgEntity for Notification {
    const TABLE: &'static str = "notification";
    const ID_COLUMN: &'static str = "id";
    const COLUMNS: &'static [&'static str] = &["sent_at", "notification_type"];

    fn bind_columns<'q>(&self, query: PgQueryAs<'q, Self>) -> PgQueryAs<'q, Self> {
        query
            .bind(self.sent_at)
            .bind(self.kind.map(|k| k.as_str()))
    }
}

impl<'r> FromRow<'r, PgRow> for Notification {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let kind: Option<String> = row.try_get("notification_type")?;

        Ok(Self {
            id: Some(row.try_get("id")?),
            sent_at: row.try_get("sent_at")?,
            kind: kind
                .map(|k| k.parse::<NotificationType>())
                .transpose()
                .map_err(decode_error)?,
        })
    }
}

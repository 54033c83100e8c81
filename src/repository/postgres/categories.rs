use sqlx::{postgres::PgRow, FromRow, Row};

use super::{PgEntity, PgQueryAs};
use crate::models::Category;

impl PgEntity for Category {
    const TABLE: &'static str = "category";
    const ID_COLUMN: &'static str = "id";
    const COLUMNS: &'static [&'static str] = &["name", "description"];

    fn bind_columns<'q>(&self, query: PgQueryAs<'q, Self>) -> PgQueryAs<'q, Self> {
        query.bind(self.name.clone()).bind(self.description.clone())
    }
}

impl<'r> FromRow<'r, PgRow> for Category {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: Some(row.try_get("id")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
        })
    }
}

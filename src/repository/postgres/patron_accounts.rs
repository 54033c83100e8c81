//! Patron account table mapping

use sqlx::{postgres::PgRow, FromRow, Row};

use super::{label, PgEntity, PgQueryAs};
use crate::models::{PatronAccount, UserRef};

impl PgEntity for PatronAccount {
    const TABLE: &'static str = "patron_account";
    const ID_COLUMN: &'static str = "card_number";
    const COLUMNS: &'static [&'static str] = &["user_id"];
    const EAGER_COLUMNS: &'static str = ", u.login AS user_login";
    const EAGER_JOINS: &'static str = "LEFT JOIN app_user u ON u.id = t.user_id";

    fn bind_columns<'q>(&self, query: PgQueryAs<'q, Self>) -> PgQueryAs<'q, Self> {
        query.bind(self.user.as_ref().map(|u| u.id))
    }
}

impl<'r> FromRow<'r, PgRow> for PatronAccount {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let user_id: Option<i64> = row.try_get("user_id")?;

        Ok(Self {
            card_number: Some(row.try_get("card_number")?),
            user: user_id.map(|id| UserRef {
                id,
                login: label(row, "user_login"),
            }),
        })
    }
}

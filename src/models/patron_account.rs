//! Patron account model

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::entity::{Entity, EntityId, SortField, SortKey};
use super::references::{LabelSource, UserRef};

/// Length of a minted card number
pub const CARD_NUMBER_LEN: usize = 10;

/// Library card number, the natural key of a patron account
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct CardNumber(pub String);

impl CardNumber {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl EntityId for CardNumber {
    fn mint() -> Option<Self> {
        let simple = uuid::Uuid::new_v4().simple().to_string();
        Some(CardNumber(simple[..CARD_NUMBER_LEN].to_string()))
    }

    fn from_sequence(value: i64) -> Self {
        CardNumber(format!("{value:0>width$}", width = CARD_NUMBER_LEN))
    }
}

/// Patron account
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatronAccount {
    pub card_number: Option<CardNumber>,
    pub user: Option<UserRef>,
}

/// Partial patron account. The card number is the only plain field, so a
/// merge leaves the stored record as it was.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatronAccountPatch {
    pub card_number: Option<CardNumber>,
}

impl Entity for PatronAccount {
    type Id = CardNumber;
    type Patch = PatronAccountPatch;

    const NAME: &'static str = "patronAccount";
    const RESOURCE: &'static str = "patron-accounts";
    const ID_FIELD: &'static str = "cardNumber";
    const SORT_FIELDS: &'static [SortField] = &[SortField::new("cardNumber", "card_number")];

    fn id(&self) -> Option<&CardNumber> {
        self.card_number.as_ref()
    }

    fn set_id(&mut self, id: CardNumber) {
        self.card_number = Some(id);
    }

    fn patch_id(patch: &PatronAccountPatch) -> Option<&CardNumber> {
        patch.card_number.as_ref()
    }

    fn merge(&mut self, _patch: PatronAccountPatch) {}

    fn sort_key(&self, field: &str) -> SortKey {
        match field {
            "cardNumber" => self.card_number.as_ref().map(|c| c.0.clone()).into(),
            _ => SortKey::Null,
        }
    }

    fn resolve_references(&mut self, labels: &dyn LabelSource) {
        if let Some(user) = self.user.as_mut() {
            user.login = labels.user_login(user.id);
        }
    }

    fn detach_references(&mut self) {
        if let Some(user) = self.user.as_mut() {
            user.login = None;
        }
    }
}

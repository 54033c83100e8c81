//! Wait list model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::entity::{Entity, SortField, SortKey};
use super::references::{BookRef, LabelSource, PatronAccountRef};

/// A patron waiting for a book to become available
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WaitList {
    pub id: Option<i64>,
    pub creat_at: Option<DateTime<Utc>>,
    pub patron_account: Option<PatronAccountRef>,
    pub book: Option<BookRef>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WaitListPatch {
    pub id: Option<i64>,
    pub creat_at: Option<DateTime<Utc>>,
}

impl Entity for WaitList {
    type Id = i64;
    type Patch = WaitListPatch;

    const NAME: &'static str = "waitList";
    const RESOURCE: &'static str = "wait-lists";
    const ID_FIELD: &'static str = "id";
    const SORT_FIELDS: &'static [SortField] = &[
        SortField::new("id", "id"),
        SortField::new("creatAt", "creat_at"),
    ];

    fn id(&self) -> Option<&i64> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn patch_id(patch: &WaitListPatch) -> Option<&i64> {
        patch.id.as_ref()
    }

    fn merge(&mut self, patch: WaitListPatch) {
        merge_fields!(self, patch; creat_at);
    }

    fn sort_key(&self, field: &str) -> SortKey {
        match field {
            "id" => self.id.into(),
            "creatAt" => self.creat_at.into(),
            _ => SortKey::Null,
        }
    }

    fn resolve_references(&mut self, labels: &dyn LabelSource) {
        if let Some(book) = self.book.as_mut() {
            book.title = labels.book_title(book.id);
        }
    }

    fn detach_references(&mut self) {
        if let Some(book) = self.book.as_mut() {
            book.title = None;
        }
    }
}

//! Checkout model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::entity::{Entity, SortField, SortKey};
use super::enums::CheckOutStatus;
use super::references::{BookCopyRef, PatronAccountRef};

/// Checkout of a book copy by a patron
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckOut {
    pub id: Option<i64>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub status: Option<CheckOutStatus>,
    pub is_returned: Option<bool>,
    pub book_copy: Option<BookCopyRef>,
    pub patron_account: Option<PatronAccountRef>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckOutPatch {
    pub id: Option<i64>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub status: Option<CheckOutStatus>,
    pub is_returned: Option<bool>,
}

impl Entity for CheckOut {
    type Id = i64;
    type Patch = CheckOutPatch;

    const NAME: &'static str = "checkOut";
    const RESOURCE: &'static str = "check-outs";
    const ID_FIELD: &'static str = "id";
    const SORT_FIELDS: &'static [SortField] = &[
        SortField::new("id", "id"),
        SortField::new("startTime", "start_time"),
        SortField::new("endTime", "end_time"),
        SortField::new("status", "status"),
        SortField::new("isReturned", "is_returned"),
    ];

    fn id(&self) -> Option<&i64> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn patch_id(patch: &CheckOutPatch) -> Option<&i64> {
        patch.id.as_ref()
    }

    fn merge(&mut self, patch: CheckOutPatch) {
        merge_fields!(self, patch; start_time, end_time, status, is_returned);
    }

    fn sort_key(&self, field: &str) -> SortKey {
        match field {
            "id" => self.id.into(),
            "startTime" => self.start_time.into(),
            "endTime" => self.end_time.into(),
            "status" => self.status.map(|s| s.as_str()).into(),
            "isReturned" => self.is_returned.into(),
            _ => SortKey::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CardNumber;

    #[test]
    fn merge_overwrites_only_present_fields() {
        let start = DateTime::<Utc>::from_timestamp(0, 0).unwrap();
        let mut stored = CheckOut {
            id: Some(7),
            start_time: Some(start),
            end_time: None,
            status: Some(CheckOutStatus::Pending),
            is_returned: Some(false),
            book_copy: Some(BookCopyRef { id: 2 }),
            patron_account: Some(PatronAccountRef::new(CardNumber::new("abc"))),
        };

        stored.merge(CheckOutPatch {
            id: Some(7),
            status: Some(CheckOutStatus::Accepted),
            ..Default::default()
        });

        assert_eq!(stored.status, Some(CheckOutStatus::Accepted));
        assert_eq!(stored.start_time, Some(start));
        assert_eq!(stored.is_returned, Some(false));
        assert_eq!(stored.book_copy, Some(BookCopyRef { id: 2 }));
    }
}

//! Notification model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::entity::{Entity, SortField, SortKey};
use super::enums::NotificationType;

/// Notification sent to a patron
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Option<i64>,
    pub sent_at: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    pub kind: Option<NotificationType>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPatch {
    pub id: Option<i64>,
    pub sent_at: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    pub kind: Option<NotificationType>,
}

impl Entity for Notification {
    type Id = i64;
    type Patch = NotificationPatch;

    const NAME: &'static str = "notification";
    const RESOURCE: &'static str = "notifications";
    const ID_FIELD: &'static str = "id";
    const SORT_FIELDS: &'static [SortField] = &[
        SortField::new("id", "id"),
        SortField::new("sentAt", "sent_at"),
        SortField::new("type", "notification_type"),
    ];

    fn id(&self) -> Option<&i64> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn patch_id(patch: &NotificationPatch) -> Option<&i64> {
        patch.id.as_ref()
    }

    fn merge(&mut self, patch: NotificationPatch) {
        merge_fields!(self, patch; sent_at, kind);
    }

    fn sort_key(&self, field: &str) -> SortKey {
        match field {
            "id" => self.id.into(),
            "sentAt" => self.sent_at.into(),
            "type" => self.kind.map(|k| k.as_str()).into(),
            _ => SortKey::Null,
        }
    }
}

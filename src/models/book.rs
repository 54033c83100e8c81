//! Book model

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::entity::{Entity, SortField, SortKey};

/// Catalogue entry; copies, wait lists and reference labels point at it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: Option<i64>,
    #[validate(required)]
    pub title: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookPatch {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
}

impl Entity for Book {
    type Id = i64;
    type Patch = BookPatch;

    const NAME: &'static str = "book";
    const RESOURCE: &'static str = "books";
    const ID_FIELD: &'static str = "id";
    const SORT_FIELDS: &'static [SortField] = &[
        SortField::new("id", "id"),
        SortField::new("title", "title"),
        SortField::new("image", "image"),
        SortField::new("description", "description"),
    ];

    fn id(&self) -> Option<&i64> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn patch_id(patch: &BookPatch) -> Option<&i64> {
        patch.id.as_ref()
    }

    fn merge(&mut self, patch: BookPatch) {
        merge_fields!(self, patch; title, image, description);
    }

    fn sort_key(&self, field: &str) -> SortKey {
        match field {
            "id" => self.id.into(),
            "title" => self.title.clone().into(),
            "image" => self.image.clone().into(),
            "description" => self.description.clone().into(),
            _ => SortKey::Null,
        }
    }
}

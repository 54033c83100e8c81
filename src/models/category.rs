//! Category model

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::entity::{Entity, SortField, SortKey};

/// Book category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Option<i64>,
    #[validate(required)]
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPatch {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl Entity for Category {
    type Id = i64;
    type Patch = CategoryPatch;

    const NAME: &'static str = "category";
    const RESOURCE: &'static str = "categories";
    const ID_FIELD: &'static str = "id";
    const SORT_FIELDS: &'static [SortField] = &[
        SortField::new("id", "id"),
        SortField::new("name", "name"),
        SortField::new("description", "description"),
    ];

    fn id(&self) -> Option<&i64> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn patch_id(patch: &CategoryPatch) -> Option<&i64> {
        patch.id.as_ref()
    }

    fn merge(&mut self, patch: CategoryPatch) {
        merge_fields!(self, patch; name, description);
    }

    fn sort_key(&self, field: &str) -> SortKey {
        match field {
            "id" => self.id.into(),
            "name" => self.name.clone().into(),
            "description" => self.description.clone().into(),
            _ => SortKey::Null,
        }
    }
}

//! Book copy model

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::entity::{Entity, SortField, SortKey};
use super::references::{BookRef, LabelSource, PublisherRef};

/// Physical copy of a book from a given publisher
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookCopy {
    pub id: Option<i64>,
    pub year_published: Option<i32>,
    #[validate(range(min = 0))]
    pub amount: Option<i32>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub book: Option<BookRef>,
    pub publisher: Option<PublisherRef>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookCopyPatch {
    pub id: Option<i64>,
    pub year_published: Option<i32>,
    pub amount: Option<i32>,
    pub image: Option<String>,
    pub description: Option<String>,
}

impl Entity for BookCopy {
    type Id = i64;
    type Patch = BookCopyPatch;

    const NAME: &'static str = "bookCopy";
    const RESOURCE: &'static str = "book-copies";
    const ID_FIELD: &'static str = "id";
    const SORT_FIELDS: &'static [SortField] = &[
        SortField::new("id", "id"),
        SortField::new("yearPublished", "year_published"),
        SortField::new("amount", "amount"),
        SortField::new("image", "image"),
        SortField::new("description", "description"),
    ];

    fn id(&self) -> Option<&i64> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn patch_id(patch: &BookCopyPatch) -> Option<&i64> {
        patch.id.as_ref()
    }

    fn merge(&mut self, patch: BookCopyPatch) {
        merge_fields!(self, patch; year_published, amount, image, description);
    }

    fn sort_key(&self, field: &str) -> SortKey {
        match field {
            "id" => self.id.into(),
            "yearPublished" => self.year_published.into(),
            "amount" => self.amount.into(),
            "image" => self.image.clone().into(),
            "description" => self.description.clone().into(),
            _ => SortKey::Null,
        }
    }

    fn resolve_references(&mut self, labels: &dyn LabelSource) {
        if let Some(book) = self.book.as_mut() {
            book.title = labels.book_title(book.id);
        }
        if let Some(publisher) = self.publisher.as_mut() {
            publisher.name = labels.publisher_name(publisher.id);
        }
    }

    fn detach_references(&mut self) {
        if let Some(book) = self.book.as_mut() {
            book.title = None;
        }
        if let Some(publisher) = self.publisher.as_mut() {
            publisher.name = None;
        }
    }
}

//! To-one references between records
//!
//! A reference always carries the identifier of the target. Labels such as
//! `login` or `title` are output-only: ignored on input and filled in by
//! eager reads.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::patron_account::CardNumber;

/// Lookup of display labels for referenced records
pub trait LabelSource: Send + Sync {
    fn user_login(&self, id: i64) -> Option<String>;
    fn book_title(&self, id: i64) -> Option<String>;
    fn publisher_name(&self, id: i64) -> Option<String>;
}

/// Reference to a user account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserRef {
    pub id: i64,
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
}

impl UserRef {
    pub fn new(id: i64) -> Self {
        Self { id, login: None }
    }
}

/// Reference to a book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BookRef {
    pub id: i64,
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl BookRef {
    pub fn new(id: i64) -> Self {
        Self { id, title: None }
    }
}

/// Reference to a publisher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PublisherRef {
    pub id: i64,
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl PublisherRef {
    pub fn new(id: i64) -> Self {
        Self { id, name: None }
    }
}

/// Reference to a book copy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BookCopyRef {
    pub id: i64,
}

/// Reference to a patron account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatronAccountRef {
    pub card_number: CardNumber,
}

impl PatronAccountRef {
    pub fn new(card_number: CardNumber) -> Self {
        Self { card_number }
    }
}

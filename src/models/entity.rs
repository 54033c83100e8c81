//! Entity abstraction shared by every managed record
//!
//! The gateways, services and REST handlers are written once against
//! [`Entity`]; each model only describes its identifier, its patch shape and
//! how its fields sort.

use std::fmt::{Debug, Display};
use std::hash::Hash;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use validator::Validate;

use super::references::LabelSource;

/// Identifier of an entity
pub trait EntityId:
    Clone + Debug + Display + Eq + Ord + Hash + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Identifier minted by the application before insert.
    /// `None` leaves the assignment to the storage sequence.
    fn mint() -> Option<Self>;

    /// Builds an identifier from a storage sequence value
    fn from_sequence(value: i64) -> Self;
}

impl EntityId for i64 {
    fn mint() -> Option<Self> {
        None
    }

    fn from_sequence(value: i64) -> Self {
        value
    }
}

/// Field that a page of entities can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortField {
    /// Name on the wire (`sort=creatAt,desc`)
    pub name: &'static str,
    /// Backing column
    pub column: &'static str,
}

impl SortField {
    pub const fn new(name: &'static str, column: &'static str) -> Self {
        Self { name, column }
    }
}

/// Comparable value of a sortable field. Missing values sort first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey {
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
    Instant(DateTime<Utc>),
}

impl From<bool> for SortKey {
    fn from(v: bool) -> Self {
        SortKey::Bool(v)
    }
}

impl From<i32> for SortKey {
    fn from(v: i32) -> Self {
        SortKey::Int(v.into())
    }
}

impl From<i64> for SortKey {
    fn from(v: i64) -> Self {
        SortKey::Int(v)
    }
}

impl From<String> for SortKey {
    fn from(v: String) -> Self {
        SortKey::Text(v)
    }
}

impl From<&str> for SortKey {
    fn from(v: &str) -> Self {
        SortKey::Text(v.to_string())
    }
}

impl From<DateTime<Utc>> for SortKey {
    fn from(v: DateTime<Utc>) -> Self {
        SortKey::Instant(v)
    }
}

impl<T: Into<SortKey>> From<Option<T>> for SortKey {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(SortKey::Null)
    }
}

/// A persisted record with a unique identifier and a fixed field schema
pub trait Entity:
    Clone + Debug + Serialize + DeserializeOwned + Validate + Send + Sync + 'static
{
    type Id: EntityId;
    /// Partial payload; only the fields it carries are written
    type Patch: Debug + DeserializeOwned + Send + Sync + 'static;

    /// Name used in alerts and problem responses (`waitList`)
    const NAME: &'static str;
    /// Collection segment under `/api` (`wait-lists`)
    const RESOURCE: &'static str;
    /// Wire name of the identifier field
    const ID_FIELD: &'static str;
    /// Fields accepted in `sort` parameters
    const SORT_FIELDS: &'static [SortField];

    fn id(&self) -> Option<&Self::Id>;

    fn set_id(&mut self, id: Self::Id);

    fn patch_id(patch: &Self::Patch) -> Option<&Self::Id>;

    /// Copies every field present on `patch`; absent fields are left unchanged.
    /// Relationships are never touched by a patch.
    fn merge(&mut self, patch: Self::Patch);

    fn sort_key(&self, field: &str) -> SortKey;

    /// Fills the output-only labels of to-one references
    fn resolve_references(&mut self, _labels: &dyn LabelSource) {}

    /// Drops reference labels, keeping identifiers only
    fn detach_references(&mut self) {}

    fn sort_field(name: &str) -> Option<&'static SortField> {
        Self::SORT_FIELDS.iter().find(|field| field.name == name)
    }
}

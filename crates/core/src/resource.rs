//! The per-resource strategy consumed by the generic view machinery.
//!
//! Agents, leads, and properties share one controller; everything that
//! differs between them (collection path, searchable fields, sort order,
//! form conversion) is expressed through [`Resource`] and its associated
//! [`SortKey`] and [`FormDraft`] types.

use std::cmp::Ordering;
use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::enrichment::EnrichmentPayload;
use crate::error::CrmError;

/// A record type served by one remote collection.
pub trait Resource:
    Clone + Debug + PartialEq + Send + Sync + Serialize + DeserializeOwned + 'static
{
    type SortKey: SortKey;
    type Draft: FormDraft<Self>;

    /// Path segment of the collection, e.g. `"properties"`.
    const COLLECTION: &'static str;
    /// Human noun used in fallback messages, e.g. `"property"`.
    const SINGULAR: &'static str;
    /// Filter names the server accepts as query parameters, in the order
    /// they are appended to the query string.
    const SERVER_FILTERS: &'static [&'static str];

    /// Unique identifier within a loaded set.
    fn id(&self) -> i64;

    /// Fields matched by the free-text search box.
    fn search_fields(&self) -> Vec<&str>;

    /// Total order for `key`. The view sorts stably, so returning
    /// `Ordering::Equal` keeps server order.
    fn compare(a: &Self, b: &Self, key: Self::SortKey) -> Ordering;

    /// Short description of the record, e.g. a name or street address.
    fn label(&self) -> String;

    /// Question put to the user before the record is deleted.
    fn delete_prompt(&self) -> String {
        format!("Are you sure you want to delete {}?", self.label())
    }

    /// Applies a filter the server does not understand. Filters listed in
    /// [`Resource::SERVER_FILTERS`] never reach this method.
    fn matches_filter(&self, _name: &str, _value: &str) -> bool {
        true
    }

    /// Merges page-level enrichment into the record.
    fn enrich(&mut self, _insights: &EnrichmentPayload) {}
}

/// Sort selector for one resource.
pub trait SortKey: Copy + Debug + Default + PartialEq + Eq + Send + Sync + 'static {
    /// Every key, default first.
    fn all() -> &'static [Self];

    fn as_str(&self) -> &'static str;

    fn parse(value: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|k| k.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

/// Create/edit form contents, held as strings until submit.
///
/// `Default` yields the blank form with the page's preset selections.
pub trait FormDraft<R>: Clone + Debug + Default + PartialEq + Send + Sync + 'static {
    /// Copies a record into form fields; absent values become empty strings.
    fn from_record(record: &R) -> Self;

    /// Validates the draft and converts it to the JSON body of a POST or PUT.
    ///
    /// Fails with [`CrmError::Validation`] without touching the network.
    fn to_payload(&self) -> Result<serde_json::Value, CrmError>;
}

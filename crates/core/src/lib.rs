//! summer-core: records, view derivation, and form drafts for the Summer
//! real-estate CRM.
//!
//! Everything here is synchronous and side-effect free. Network access
//! lives in `summer-remote`; page state lives in `summer-controller`.
//!
//! # Public API
//!
//! - [`Resource`] -- per-collection strategy (search fields, sort keys, drafts)
//! - [`Criteria`] and [`derive_view()`] -- the filtered-and-sorted projection
//! - [`CrmError`] -- the error taxonomy shared by every crate
//! - [`EnrichmentPayload`] -- best-effort decorative data
//! - Records: [`Agent`], [`Lead`], [`Property`]

pub mod criteria;
pub mod draft;
pub mod enrichment;
pub mod error;
pub mod records;
pub mod resource;
pub mod sample;
pub mod stats;
pub mod view;

// ── Convenience re-exports ───────────────────────────────────────────

pub use criteria::Criteria;
pub use enrichment::{EnrichmentKey, EnrichmentPayload};
pub use error::CrmError;
pub use records::{
    Agent, AgentDraft, AgentSort, Lead, LeadDraft, LeadSort, Property, PropertyDraft, PropertySort,
};
pub use resource::{FormDraft, Resource, SortKey};
pub use view::derive_view;

//! The three CRM record types and their sort keys and form drafts.

pub mod agent;
pub mod lead;
pub mod property;

pub use agent::{Agent, AgentDraft, AgentSort};
pub use lead::{Lead, LeadDraft, LeadInquiry, LeadSort};
pub use property::{Property, PropertyDraft, PropertyInquiry, PropertySort};

//! summer-controller: the state behind a CRM list page.
//!
//! [`ViewStateController`] owns one resource's records, criteria, form
//! draft and load/submit state, and drives the remote collection through
//! `summer-remote`. Hosts read state by snapshot and answer delete
//! confirmations through [`HostPrompt`].

pub mod controller;
pub mod prompt;
pub mod state;

pub use controller::ViewStateController;
pub use prompt::{HostPrompt, ScriptedPrompt};
pub use state::{
    LoadState, Modal, PageState, RemoveOutcome, StalePolicy, SubmitOutcome, SubmitState,
};

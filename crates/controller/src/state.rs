//! Observable page state and operation outcomes.

use summer_core::{Criteria, CrmError, EnrichmentPayload, Resource};

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    NotLoaded,
    Loading,
    Loaded,
    Error(CrmError),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn error(&self) -> Option<&CrmError> {
        match self {
            LoadState::Error(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitState {
    Idle,
    Submitting,
    Error(CrmError),
}

impl SubmitState {
    pub fn error(&self) -> Option<&CrmError> {
        match self {
            SubmitState::Error(e) => Some(e),
            _ => None,
        }
    }
}

/// The create/edit form.
#[derive(Debug, Clone, PartialEq)]
pub enum Modal<R> {
    Closed,
    Creating,
    /// Editing a copy of the record taken when the form opened.
    Editing(R),
}

impl<R> Modal<R> {
    pub fn is_open(&self) -> bool {
        !matches!(self, Modal::Closed)
    }
}

/// Everything a page renders from. Obtained by value through
/// [`ViewStateController::snapshot`](crate::ViewStateController::snapshot).
#[derive(Debug, Clone, PartialEq)]
pub struct PageState<R: Resource> {
    /// Server response order.
    pub records: Vec<R>,
    pub load_state: LoadState,
    pub criteria: Criteria<R::SortKey>,
    pub modal: Modal<R>,
    pub draft: R::Draft,
    pub submit_state: SubmitState,
    pub insights: EnrichmentPayload,
    /// Set by the first successful load; never cleared.
    pub loaded_once: bool,
}

impl<R: Resource> Default for PageState<R> {
    fn default() -> Self {
        PageState {
            records: Vec::new(),
            load_state: LoadState::NotLoaded,
            criteria: Criteria::default(),
            modal: Modal::Closed,
            draft: R::Draft::default(),
            submit_state: SubmitState::Idle,
            insights: EnrichmentPayload::default(),
            loaded_once: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome<R> {
    /// Saved and resynced; the form is closed. Carries the server's echo of
    /// the record when it sent one.
    Saved(Option<R>),
    /// The draft failed local validation. Nothing was sent.
    Invalid(CrmError),
    /// The server refused or could not be reached. The form stays open.
    Failed(CrmError),
    /// A submission is already in flight.
    Busy,
    /// No form is open.
    NoForm,
    Disposed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RemoveOutcome {
    Removed,
    /// The user declined the confirmation.
    Cancelled,
    Failed(CrmError),
    /// A delete is already in flight.
    Busy,
    NotFound,
    Disposed,
}

/// How overlapping loads settle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StalePolicy {
    /// Every response is applied as it arrives; the last to arrive wins.
    #[default]
    LastArrivalWins,
    /// Responses to superseded requests are discarded; the most recently
    /// issued request wins.
    LatestIssuedWins,
}

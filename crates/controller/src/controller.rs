//! One generic controller for every list page.
//!
//! State lives behind a `std::sync::Mutex` that is only held between
//! suspension points, so several operations on the same controller may be
//! in flight at once. Every write that follows an `.await` first checks
//! whether the controller was disposed in the meantime.

use std::sync::{Arc, Mutex, MutexGuard};

use summer_core::{derive_view, Criteria, EnrichmentPayload, FormDraft, Resource};
use summer_remote::{
    ClientConfig, CollectionClient, EnrichmentAggregator, EnrichmentEndpoint, Transport,
};

use crate::prompt::HostPrompt;
use crate::state::{
    LoadState, Modal, PageState, RemoveOutcome, StalePolicy, SubmitOutcome, SubmitState,
};

/// View state and CRUD lifecycle for one resource's page.
pub struct ViewStateController<R: Resource> {
    collection: CollectionClient<R>,
    enrichment: Option<Enrichment>,
    prompt: Arc<dyn HostPrompt>,
    policy: StalePolicy,
    state: Mutex<Tracked<R>>,
}

struct Enrichment {
    aggregator: EnrichmentAggregator,
    endpoints: Vec<EnrichmentEndpoint>,
}

/// Page state plus the bookkeeping that hosts never see.
struct Tracked<R: Resource> {
    page: PageState<R>,
    /// Sequence number of the most recently issued load.
    issued: u64,
    /// Loads issued but not yet settled.
    pending: usize,
    /// Outcome of the most recently applied load.
    settled: LoadState,
    deleting: bool,
    disposed: bool,
}

impl<R: Resource> ViewStateController<R> {
    pub fn new(collection: CollectionClient<R>, prompt: Arc<dyn HostPrompt>) -> Self {
        ViewStateController {
            collection,
            enrichment: None,
            prompt,
            policy: StalePolicy::default(),
            state: Mutex::new(Tracked {
                page: PageState::default(),
                issued: 0,
                pending: 0,
                settled: LoadState::NotLoaded,
                deleting: false,
                disposed: false,
            }),
        }
    }

    /// A controller for `R`'s collection under `config.api_base`, with the
    /// standard enrichment endpoints fetched alongside every load.
    pub fn from_config(
        config: &ClientConfig,
        transport: Arc<dyn Transport>,
        prompt: Arc<dyn HostPrompt>,
    ) -> Self {
        let collection = CollectionClient::new(Arc::clone(&transport), &config.api_base);
        Self::new(collection, prompt)
            .with_enrichment(EnrichmentAggregator::new(transport), config.enrichment_endpoints())
    }

    pub fn with_enrichment(
        mut self,
        aggregator: EnrichmentAggregator,
        endpoints: Vec<EnrichmentEndpoint>,
    ) -> Self {
        self.enrichment = Some(Enrichment {
            aggregator,
            endpoints,
        });
        self
    }

    pub fn with_stale_policy(mut self, policy: StalePolicy) -> Self {
        self.policy = policy;
        self
    }

    fn lock(&self) -> MutexGuard<'_, Tracked<R>> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // ──────────────────────────────────────────────
    // Reading
    // ──────────────────────────────────────────────

    pub fn snapshot(&self) -> PageState<R> {
        self.lock().page.clone()
    }

    pub fn records(&self) -> Vec<R> {
        self.lock().page.records.clone()
    }

    pub fn load_state(&self) -> LoadState {
        self.lock().page.load_state.clone()
    }

    pub fn submit_state(&self) -> SubmitState {
        self.lock().page.submit_state.clone()
    }

    pub fn modal(&self) -> Modal<R> {
        self.lock().page.modal.clone()
    }

    pub fn draft(&self) -> R::Draft {
        self.lock().page.draft.clone()
    }

    pub fn criteria(&self) -> Criteria<R::SortKey> {
        self.lock().page.criteria.clone()
    }

    pub fn insights(&self) -> EnrichmentPayload {
        self.lock().page.insights.clone()
    }

    /// Whether any enrichment arrived on the last applied load.
    pub fn is_connected(&self) -> bool {
        self.lock().page.insights.is_connected()
    }

    pub fn is_deleting(&self) -> bool {
        self.lock().deleting
    }

    /// The filtered and sorted records for the current criteria.
    pub fn view(&self) -> Vec<R> {
        let tracked = self.lock();
        derive_view(&tracked.page.records, &tracked.page.criteria)
    }

    // ──────────────────────────────────────────────
    // Criteria
    // ──────────────────────────────────────────────

    pub fn set_search(&self, text: impl Into<String>) {
        self.lock().page.criteria.search_text = text.into();
    }

    pub fn set_sort(&self, key: R::SortKey) {
        self.lock().page.criteria.sort_key = key;
    }

    /// Sets or clears (empty value) a filter. Returns `true` when the change
    /// calls for a reload: the filter is one the server applies and the
    /// page has loaded at least once.
    pub fn set_filter(&self, name: &str, value: &str) -> bool {
        let mut tracked = self.lock();
        let before = tracked.page.criteria.server_query::<R>();
        tracked.page.criteria.set_filter(name, value);
        let changed = tracked.page.criteria.server_query::<R>() != before;
        changed && tracked.page.loaded_once
    }

    // ──────────────────────────────────────────────
    // Loading
    // ──────────────────────────────────────────────

    /// Replaces the criteria, then loads.
    pub async fn load_with(&self, criteria: Criteria<R::SortKey>) {
        {
            let mut tracked = self.lock();
            if tracked.disposed {
                return;
            }
            tracked.page.criteria = criteria;
        }
        self.load().await;
    }

    /// Fetches the collection with the current server-side filters, and the
    /// enrichment endpoints in parallel when configured.
    ///
    /// Failures end up in [`PageState::load_state`]; this never fails.
    /// Existing records are kept when a load fails.
    pub async fn load(&self) {
        let (seq, query) = {
            let mut tracked = self.lock();
            if tracked.disposed {
                return;
            }
            tracked.issued += 1;
            tracked.pending += 1;
            tracked.page.load_state = LoadState::Loading;
            (tracked.issued, tracked.page.criteria.server_query::<R>())
        };
        tracing::debug!(collection = R::COLLECTION, seq, "load issued");
        let mut guard = LoadGuard {
            controller: self,
            settled: false,
        };

        let insights = async {
            match &self.enrichment {
                Some(e) => Some(e.aggregator.fetch_all(&e.endpoints).await),
                None => None,
            }
        };
        let (listed, insights) = tokio::join!(self.collection.list(&query), insights);
        guard.settled = true;

        let mut tracked = self.lock();
        tracked.pending = tracked.pending.saturating_sub(1);
        if tracked.disposed {
            tracing::debug!(collection = R::COLLECTION, seq, "load settled after dispose");
            return;
        }

        let stale = self.policy == StalePolicy::LatestIssuedWins && seq < tracked.issued;
        if stale {
            tracing::debug!(
                collection = R::COLLECTION,
                seq,
                latest = tracked.issued,
                "discarding stale load"
            );
        } else {
            if let Some(insights) = insights {
                tracked.page.insights = insights;
            }
            match listed {
                Ok(mut records) => {
                    if self.enrichment.is_some() {
                        let insights = tracked.page.insights.clone();
                        for record in &mut records {
                            record.enrich(&insights);
                        }
                    }
                    tracing::info!(
                        collection = R::COLLECTION,
                        seq,
                        count = records.len(),
                        "load complete"
                    );
                    tracked.page.records = records;
                    tracked.page.loaded_once = true;
                    tracked.settled = LoadState::Loaded;
                }
                Err(e) => {
                    tracing::warn!(collection = R::COLLECTION, seq, error = %e, "load failed");
                    tracked.settled = LoadState::Error(e);
                }
            }
        }

        tracked.page.load_state = if tracked.pending > 0 {
            LoadState::Loading
        } else {
            tracked.settled.clone()
        };
    }

    // ──────────────────────────────────────────────
    // Form
    // ──────────────────────────────────────────────

    /// Opens a blank create form. Returns `false`, leaving the form as it
    /// is, while a submission is in flight.
    pub fn open_create(&self) -> bool {
        let mut tracked = self.lock();
        if tracked.page.submit_state == SubmitState::Submitting {
            return false;
        }
        tracked.page.modal = Modal::Creating;
        tracked.page.draft = R::Draft::default();
        tracked.page.submit_state = SubmitState::Idle;
        true
    }

    /// Opens the edit form for loaded record `id`. Returns `false` when no
    /// such record is loaded or a submission is in flight.
    pub fn open_edit(&self, id: i64) -> bool {
        let mut tracked = self.lock();
        if tracked.page.submit_state == SubmitState::Submitting {
            return false;
        }
        let Some(record) = tracked.page.records.iter().find(|r| r.id() == id).cloned() else {
            return false;
        };
        tracked.page.draft = R::Draft::from_record(&record);
        tracked.page.modal = Modal::Editing(record);
        tracked.page.submit_state = SubmitState::Idle;
        true
    }

    /// Closes the form, discarding the draft and any submit error. The form
    /// stays open while a submission is in flight; returns whether it closed.
    pub fn close_modal(&self) -> bool {
        let mut tracked = self.lock();
        if tracked.page.submit_state == SubmitState::Submitting {
            return false;
        }
        tracked.page.modal = Modal::Closed;
        tracked.page.draft = R::Draft::default();
        tracked.page.submit_state = SubmitState::Idle;
        true
    }

    /// Edits the open form's draft in place.
    pub fn update_draft(&self, edit: impl FnOnce(&mut R::Draft)) {
        edit(&mut self.lock().page.draft);
    }

    /// Validates the draft and POSTs (creating) or PUTs (editing) it.
    ///
    /// On success the collection is reloaded before the form closes. On
    /// failure the form stays open with the error in
    /// [`PageState::submit_state`]. A draft that fails validation never
    /// reaches the network.
    pub async fn submit(&self) -> SubmitOutcome<R> {
        let (target, payload) = {
            let mut tracked = self.lock();
            if tracked.disposed {
                return SubmitOutcome::Disposed;
            }
            if tracked.page.submit_state == SubmitState::Submitting {
                return SubmitOutcome::Busy;
            }
            let target = match &tracked.page.modal {
                Modal::Closed => return SubmitOutcome::NoForm,
                Modal::Creating => None,
                Modal::Editing(record) => Some(record.id()),
            };
            match tracked.page.draft.to_payload() {
                Ok(payload) => {
                    tracked.page.submit_state = SubmitState::Submitting;
                    (target, payload)
                }
                Err(e) => {
                    tracked.page.submit_state = SubmitState::Error(e.clone());
                    return SubmitOutcome::Invalid(e);
                }
            }
        };
        let _guard = SubmitGuard { controller: self };

        let saved = match target {
            None => self.collection.create(payload).await,
            Some(id) => self.collection.update(id, payload).await,
        };

        let echoed = match saved {
            Ok(echoed) => echoed,
            Err(e) => {
                let mut tracked = self.lock();
                if tracked.disposed {
                    return SubmitOutcome::Disposed;
                }
                tracing::warn!(collection = R::COLLECTION, error = %e, "save failed");
                tracked.page.submit_state = SubmitState::Error(e.clone());
                return SubmitOutcome::Failed(e);
            }
        };
        tracing::info!(collection = R::COLLECTION, id = ?target, "saved");

        self.load().await;

        let mut tracked = self.lock();
        if tracked.disposed {
            return SubmitOutcome::Disposed;
        }
        tracked.page.modal = Modal::Closed;
        tracked.page.draft = R::Draft::default();
        tracked.page.submit_state = SubmitState::Idle;
        SubmitOutcome::Saved(echoed)
    }

    // ──────────────────────────────────────────────
    // Delete
    // ──────────────────────────────────────────────

    /// Deletes loaded record `id` after the host confirms.
    ///
    /// On success the collection is reloaded. On failure the host is
    /// alerted and the record stays listed.
    pub async fn remove(&self, id: i64) -> RemoveOutcome {
        let question = {
            let mut tracked = self.lock();
            if tracked.disposed {
                return RemoveOutcome::Disposed;
            }
            if tracked.deleting {
                return RemoveOutcome::Busy;
            }
            let Some(record) = tracked.page.records.iter().find(|r| r.id() == id) else {
                return RemoveOutcome::NotFound;
            };
            let question = record.delete_prompt();
            tracked.deleting = true;
            question
        };
        let _guard = DeleteGuard { controller: self };

        if !self.prompt.confirm(&question) {
            tracing::debug!(collection = R::COLLECTION, id, "delete cancelled");
            return RemoveOutcome::Cancelled;
        }

        if let Err(e) = self.collection.delete(id).await {
            if self.lock().disposed {
                return RemoveOutcome::Disposed;
            }
            tracing::warn!(collection = R::COLLECTION, id, error = %e, "delete failed");
            self.prompt.alert(e.message());
            return RemoveOutcome::Failed(e);
        }
        tracing::info!(collection = R::COLLECTION, id, "deleted");

        self.load().await;
        RemoveOutcome::Removed
    }

    // ──────────────────────────────────────────────
    // Lifetime
    // ──────────────────────────────────────────────

    /// Detaches the controller from its page. Requests already in flight
    /// run to completion but their results are dropped, and later
    /// operations do nothing.
    pub fn dispose(&self) {
        self.lock().disposed = true;
        tracing::debug!(collection = R::COLLECTION, "disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.lock().disposed
    }
}

/// Returns the submit flag to idle if a submission ends without settling
/// it, e.g. when the submitting future is dropped.
struct SubmitGuard<'a, R: Resource> {
    controller: &'a ViewStateController<R>,
}

impl<R: Resource> Drop for SubmitGuard<'_, R> {
    fn drop(&mut self) {
        let mut tracked = self.controller.lock();
        if tracked.page.submit_state == SubmitState::Submitting {
            tracked.page.submit_state = SubmitState::Idle;
        }
    }
}

/// Settles a load whose future is dropped before the response arrives, so
/// `Loading` never outlives the requests that caused it.
struct LoadGuard<'a, R: Resource> {
    controller: &'a ViewStateController<R>,
    settled: bool,
}

impl<R: Resource> Drop for LoadGuard<'_, R> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut tracked = self.controller.lock();
        tracked.pending = tracked.pending.saturating_sub(1);
        if tracked.pending == 0 {
            tracked.page.load_state = tracked.settled.clone();
        }
    }
}

struct DeleteGuard<'a, R: Resource> {
    controller: &'a ViewStateController<R>,
}

impl<R: Resource> Drop for DeleteGuard<'_, R> {
    fn drop(&mut self) {
        self.controller.lock().deleting = false;
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

//! Page lifecycle tests: load, derive, submit, remove and dispose against
//! a scripted transport.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use summer_controller::{
    HostPrompt, LoadState, Modal, RemoveOutcome, ScriptedPrompt, StalePolicy, SubmitOutcome,
    SubmitState, ViewStateController,
};
use summer_core::{Agent, AgentSort, CrmError, Criteria, Property};
use summer_remote::fake::{FakeReply, FakeTransport};
use summer_remote::{ClientConfig, CollectionClient, Method};
use url::Url;

fn base() -> Url {
    Url::parse("http://crm.test/api").unwrap()
}

fn controller<R: summer_core::Resource>(
    fake: &Arc<FakeTransport>,
    prompt: Arc<dyn HostPrompt>,
) -> ViewStateController<R> {
    ViewStateController::new(CollectionClient::new(fake.clone(), &base()), prompt)
}

fn ok(data: Value) -> FakeReply {
    FakeReply::json(200, json!({"success": true, "data": data}))
}

fn agents_json() -> Value {
    json!([
        {"id": 1, "name": "Jennifer Martinez", "specialty": "Luxury Homes",
         "rating": 4.9, "leads": 145, "deals": 89},
        {"id": 2, "name": "David Kim", "specialty": "First-Time Buyers",
         "rating": 4.7, "leads": 98, "deals": 67},
        {"id": 3, "name": "Sarah Thompson", "specialty": "Investment Properties",
         "rating": 4.8, "leads": 203, "deals": 156},
        {"id": 4, "name": "Michael Brown", "specialty": "Commercial Real Estate",
         "rating": 4.6, "leads": 87, "deals": 71}
    ])
}

fn property_json(id: i64, address: &str) -> Value {
    json!({
        "id": id, "address": address, "city": "Austin", "state": "TX",
        "zip_code": "78701", "listing_price": 450000,
        "listing_status": "active", "listing_date": "2025-06-01"
    })
}

fn methods(fake: &FakeTransport) -> Vec<Method> {
    fake.requests().iter().map(|r| r.method).collect()
}

// ──────────────────────────────────────────────
// Derived view
// ──────────────────────────────────────────────

#[tokio::test]
async fn numeric_sorts_are_non_increasing_and_name_is_ascending() {
    let fake = Arc::new(FakeTransport::new());
    fake.script(Method::Get, "/api/agents", ok(agents_json()));
    let c = controller::<Agent>(&fake, Arc::new(ScriptedPrompt::declining()));
    c.load().await;

    c.set_sort(AgentSort::Rating);
    let ratings: Vec<f64> = c.view().iter().map(|a| a.rating).collect();
    assert!(ratings.windows(2).all(|w| w[0] >= w[1]));

    c.set_sort(AgentSort::Leads);
    let leads: Vec<i64> = c.view().iter().map(|a| a.leads).collect();
    assert!(leads.windows(2).all(|w| w[0] >= w[1]));

    c.set_sort(AgentSort::Deals);
    let deals: Vec<i64> = c.view().iter().map(|a| a.deals).collect();
    assert!(deals.windows(2).all(|w| w[0] >= w[1]));

    c.set_sort(AgentSort::Name);
    let names: Vec<String> = c.view().iter().map(|a| a.name.clone()).collect();
    assert_eq!(
        names,
        ["David Kim", "Jennifer Martinez", "Michael Brown", "Sarah Thompson"]
    );
}

#[tokio::test]
async fn view_is_idempotent_and_search_ignores_case() {
    let fake = Arc::new(FakeTransport::new());
    fake.script(Method::Get, "/api/agents", ok(agents_json()));
    let c = controller::<Agent>(&fake, Arc::new(ScriptedPrompt::declining()));
    c.load().await;

    c.set_search("MARTINEZ");
    let upper = c.view();
    assert_eq!(upper, c.view());
    c.set_search("martinez");
    assert_eq!(upper, c.view());
    assert_eq!(upper.len(), 1);
    assert_eq!(fake.requests().len(), 1);
}

// ──────────────────────────────────────────────
// Loading
// ──────────────────────────────────────────────

#[tokio::test]
async fn success_false_sets_error_with_api_message() {
    let fake = Arc::new(FakeTransport::new());
    fake.script(
        Method::Get,
        "/api/properties",
        FakeReply::json(200, json!({"success": false, "message": "db down"})),
    );
    let c = controller::<Property>(&fake, Arc::new(ScriptedPrompt::declining()));
    c.load().await;

    let state = c.load_state();
    assert_eq!(state.error().map(CrmError::message), Some("db down"));
    assert!(!c.snapshot().loaded_once);
}

#[tokio::test]
async fn failed_reload_keeps_previous_records() {
    let fake = Arc::new(FakeTransport::new());
    fake.script(Method::Get, "/api/properties", ok(json!([property_json(1, "1 Main")])));
    fake.script(
        Method::Get,
        "/api/properties",
        FakeReply::unreachable("connection reset"),
    );
    let c = controller::<Property>(&fake, Arc::new(ScriptedPrompt::declining()));
    c.load().await;
    c.load().await;

    assert_eq!(
        c.load_state(),
        LoadState::Error(CrmError::transport("Failed to connect to the server"))
    );
    assert_eq!(c.records().len(), 1);
}

#[tokio::test]
async fn load_state_is_loading_while_request_is_outstanding() {
    let fake = Arc::new(FakeTransport::new());
    fake.script(
        Method::Get,
        "/api/agents",
        ok(agents_json()).after(Duration::from_millis(150)),
    );
    let c = controller::<Agent>(&fake, Arc::new(ScriptedPrompt::declining()));

    let observe = async {
        tokio::time::sleep(Duration::from_millis(30)).await;
        c.load_state()
    };
    let ((), during) = tokio::join!(c.load(), observe);
    assert_eq!(during, LoadState::Loading);
    assert_eq!(c.load_state(), LoadState::Loaded);
}

#[tokio::test]
async fn slower_first_response_wins_by_default() {
    let fake = Arc::new(FakeTransport::new());
    fake.script(
        Method::Get,
        "/api/properties",
        ok(json!([property_json(1, "first")])).after(Duration::from_millis(120)),
    );
    fake.script(Method::Get, "/api/properties", ok(json!([property_json(2, "second")])));
    let c = controller::<Property>(&fake, Arc::new(ScriptedPrompt::declining()));

    tokio::join!(c.load(), c.load());

    let records = c.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].address, "first");
    assert_eq!(c.load_state(), LoadState::Loaded);
}

#[tokio::test]
async fn latest_issued_policy_discards_stale_response() {
    let fake = Arc::new(FakeTransport::new());
    fake.script(
        Method::Get,
        "/api/properties",
        ok(json!([property_json(1, "first")])).after(Duration::from_millis(120)),
    );
    fake.script(Method::Get, "/api/properties", ok(json!([property_json(2, "second")])));
    let c = controller::<Property>(&fake, Arc::new(ScriptedPrompt::declining()))
        .with_stale_policy(StalePolicy::LatestIssuedWins);

    tokio::join!(c.load(), c.load());

    assert_eq!(c.records()[0].address, "second");
    assert_eq!(c.load_state(), LoadState::Loaded);
}

#[tokio::test]
async fn enrichment_is_merged_into_agents() {
    let fake = Arc::new(FakeTransport::new());
    fake.script(Method::Get, "/api/agents", ok(agents_json()));
    fake.script(
        Method::Get,
        "/api/quote",
        FakeReply::json(200, json!({"quote": "Close strong"})),
    );
    fake.script(Method::Get, "/api/fortune-cookie", FakeReply::text(500, ""));
    fake.script(
        Method::Get,
        "/api/color",
        FakeReply::json(200, json!({"color": "gold"})),
    );
    fake.script(Method::Get, "/api/spirit-animal", FakeReply::unreachable("dns"));

    let c = ViewStateController::<Agent>::from_config(
        &ClientConfig::new(base()),
        fake.clone(),
        Arc::new(ScriptedPrompt::declining()),
    );
    c.load().await;

    assert!(c.is_connected());
    assert_eq!(c.insights().color.as_deref(), Some("gold"));
    assert_eq!(c.insights().fortune, None);
    assert!(c
        .records()
        .iter()
        .all(|a| a.quote.as_deref() == Some("Close strong")));
    assert_eq!(c.load_state(), LoadState::Loaded);
}

// ──────────────────────────────────────────────
// Submit
// ──────────────────────────────────────────────

#[tokio::test]
async fn blank_required_fields_never_reach_the_network() {
    let fake = Arc::new(FakeTransport::new());
    let c = controller::<summer_core::Lead>(&fake, Arc::new(ScriptedPrompt::declining()));
    c.open_create();

    let outcome = c.submit().await;

    let err = match outcome {
        SubmitOutcome::Invalid(err) => err,
        other => panic!("expected validation failure, got {other:?}"),
    };
    assert_eq!(err.kind(), "validation");
    assert_eq!(c.submit_state(), SubmitState::Error(err));
    assert!(c.modal().is_open());
    assert!(fake.requests().is_empty());
}

#[tokio::test]
async fn create_posts_coerced_payload_then_reloads_and_closes() {
    let fake = Arc::new(FakeTransport::new());
    fake.script(
        Method::Post,
        "/api/properties",
        FakeReply::json(
            201,
            json!({"success": true, "data": property_json(7, "1247 Oak Valley Dr")}),
        ),
    );
    fake.script(
        Method::Get,
        "/api/properties",
        ok(json!([property_json(7, "1247 Oak Valley Dr")])),
    );
    let c = controller::<Property>(&fake, Arc::new(ScriptedPrompt::declining()));
    c.open_create();
    c.update_draft(|d| {
        d.address = "1247 Oak Valley Dr".into();
        d.city = "Austin".into();
        d.zip_code = "78704".into();
        d.listing_price = "450000".into();
    });

    let outcome = c.submit().await;

    assert!(matches!(outcome, SubmitOutcome::Saved(Some(ref p)) if p.id == 7));
    assert_eq!(methods(&fake), vec![Method::Post, Method::Get]);
    let body = fake.requests()[0].body.clone().unwrap();
    assert_eq!(body["listing_price"], json!(450000));
    assert!(body.get("bedrooms").is_none());
    assert_eq!(c.modal(), Modal::Closed);
    assert_eq!(c.submit_state(), SubmitState::Idle);
    assert_eq!(c.records().len(), 1);
}

#[tokio::test]
async fn rejected_update_keeps_form_open_with_message() {
    let fake = Arc::new(FakeTransport::new());
    fake.script(Method::Get, "/api/properties", ok(json!([property_json(3, "9 Elm")])));
    fake.script(
        Method::Put,
        "/api/properties/3",
        FakeReply::json(
            409,
            json!({"success": false, "message": "Listing is under contract"}),
        ),
    );
    let c = controller::<Property>(&fake, Arc::new(ScriptedPrompt::declining()));
    c.load().await;
    assert!(c.open_edit(3));

    let outcome = c.submit().await;

    let expected = CrmError::rejection(Some(409), "Listing is under contract");
    assert_eq!(outcome, SubmitOutcome::Failed(expected.clone()));
    assert_eq!(c.submit_state(), SubmitState::Error(expected));
    assert!(matches!(c.modal(), Modal::Editing(_)));
    assert_eq!(methods(&fake), vec![Method::Get, Method::Put]);
}

#[tokio::test]
async fn second_submit_while_first_in_flight_is_refused() {
    let fake = Arc::new(FakeTransport::new());
    fake.script(
        Method::Post,
        "/api/agents",
        FakeReply::json(201, json!({"success": true})).after(Duration::from_millis(100)),
    );
    fake.script(Method::Get, "/api/agents", ok(json!([])));
    let c = controller::<Agent>(&fake, Arc::new(ScriptedPrompt::declining()));
    c.open_create();
    c.update_draft(|d| {
        d.name = "Priya Shah".into();
        d.specialty = "Relocation".into();
    });

    let (first, second) = tokio::join!(c.submit(), c.submit());

    assert_eq!(first, SubmitOutcome::Saved(None));
    assert_eq!(second, SubmitOutcome::Busy);
    assert_eq!(fake.count(Method::Post), 1);
}

#[tokio::test]
async fn form_cannot_be_reopened_while_submitting() {
    let fake = Arc::new(FakeTransport::new());
    fake.script(
        Method::Post,
        "/api/agents",
        FakeReply::json(201, json!({"success": true})).after(Duration::from_millis(100)),
    );
    fake.script(Method::Get, "/api/agents", ok(json!([])));
    let c = controller::<Agent>(&fake, Arc::new(ScriptedPrompt::declining()));
    c.open_create();
    c.update_draft(|d| {
        d.name = "Priya Shah".into();
        d.specialty = "Relocation".into();
    });

    let meddle = async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        let closed = c.close_modal();
        let reopened = c.open_create();
        c.update_draft(|d| d.name = "Second Draft".into());
        let second = c.submit().await;
        (closed, reopened, c.submit_state(), second)
    };
    let (first, (closed, reopened, during, second)) = tokio::join!(c.submit(), meddle);

    assert!(!closed);
    assert!(!reopened);
    assert_eq!(during, SubmitState::Submitting);
    assert_eq!(second, SubmitOutcome::Busy);
    assert_eq!(first, SubmitOutcome::Saved(None));
    assert_eq!(fake.count(Method::Post), 1);
    assert_eq!(c.modal(), Modal::Closed);
    assert_eq!(c.submit_state(), SubmitState::Idle);
}

// ──────────────────────────────────────────────
// Cancellation
// ──────────────────────────────────────────────

#[tokio::test]
async fn dropped_load_does_not_leave_page_loading() {
    let fake = Arc::new(FakeTransport::new());
    fake.script(
        Method::Get,
        "/api/agents",
        ok(agents_json()).after(Duration::from_millis(200)),
    );
    let c = controller::<Agent>(&fake, Arc::new(ScriptedPrompt::declining()));

    let cut_short = tokio::time::timeout(Duration::from_millis(20), c.load()).await;
    assert!(cut_short.is_err());
    assert_eq!(c.load_state(), LoadState::NotLoaded);

    c.load().await;
    assert_eq!(c.load_state(), LoadState::Loaded);
    assert_eq!(c.records().len(), 4);
}

// ──────────────────────────────────────────────
// Remove
// ──────────────────────────────────────────────

#[tokio::test]
async fn declined_confirmation_sends_no_delete() {
    let fake = Arc::new(FakeTransport::new());
    fake.script(Method::Get, "/api/properties", ok(json!([property_json(5, "12 Pine St")])));
    let prompt = Arc::new(ScriptedPrompt::declining());
    let c = controller::<Property>(&fake, prompt.clone());
    c.load().await;

    assert_eq!(c.remove(5).await, RemoveOutcome::Cancelled);
    assert_eq!(fake.count(Method::Delete), 0);
    assert_eq!(
        prompt.confirmations(),
        ["Are you sure you want to delete the property at 12 Pine St?"]
    );
    assert!(!c.is_deleting());
}

#[tokio::test]
async fn confirmed_delete_issues_one_delete_then_one_reload() {
    let fake = Arc::new(FakeTransport::new());
    fake.script(Method::Get, "/api/properties", ok(json!([property_json(5, "12 Pine St")])));
    fake.script(Method::Get, "/api/properties", ok(json!([])));
    fake.script(
        Method::Delete,
        "/api/properties/5",
        FakeReply::json(200, json!({"success": true})),
    );
    let c = controller::<Property>(&fake, Arc::new(ScriptedPrompt::accepting()));
    c.load().await;

    assert_eq!(c.remove(5).await, RemoveOutcome::Removed);
    assert_eq!(methods(&fake), vec![Method::Get, Method::Delete, Method::Get]);
    assert!(c.records().is_empty());
}

#[tokio::test]
async fn failed_delete_alerts_and_keeps_record() {
    let fake = Arc::new(FakeTransport::new());
    fake.script(Method::Get, "/api/properties", ok(json!([property_json(5, "12 Pine St")])));
    fake.script(Method::Delete, "/api/properties/5", FakeReply::text(500, ""));
    let prompt = Arc::new(ScriptedPrompt::accepting());
    let c = controller::<Property>(&fake, prompt.clone());
    c.load().await;

    let outcome = c.remove(5).await;

    assert_eq!(
        outcome,
        RemoveOutcome::Failed(CrmError::rejection(Some(500), "Failed to delete property"))
    );
    assert_eq!(prompt.alerts(), ["Failed to delete property"]);
    assert_eq!(c.records().len(), 1);
    assert_eq!(fake.count(Method::Get), 1);
}

#[tokio::test]
async fn removing_unknown_record_asks_nothing() {
    let fake = Arc::new(FakeTransport::new());
    let prompt = Arc::new(ScriptedPrompt::accepting());
    let c = controller::<Property>(&fake, prompt.clone());
    assert_eq!(c.remove(1).await, RemoveOutcome::NotFound);
    assert!(prompt.confirmations().is_empty());
}

// ──────────────────────────────────────────────
// Dispose
// ──────────────────────────────────────────────

#[tokio::test]
async fn results_arriving_after_dispose_are_dropped() {
    let fake = Arc::new(FakeTransport::new());
    fake.script(
        Method::Get,
        "/api/agents",
        ok(agents_json()).after(Duration::from_millis(100)),
    );
    let c = controller::<Agent>(&fake, Arc::new(ScriptedPrompt::declining()));

    let navigate_away = async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        c.dispose();
    };
    tokio::join!(c.load(), navigate_away);

    assert!(c.is_disposed());
    assert!(c.records().is_empty());
    assert_eq!(c.load_state(), LoadState::Loading);

    c.load_with(Criteria::new().with_sort(AgentSort::Name)).await;
    assert_eq!(fake.requests().len(), 1);
}

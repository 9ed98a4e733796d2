//! End-to-end tests for `UreqTransport` against a local axum server.
//!
//! Each test binds its own server to an ephemeral port on 127.0.0.1 and
//! talks to it through the real HTTP stack.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use summer_core::{CrmError, EnrichmentKey, Property};
use summer_remote::{ClientConfig, CollectionClient, EnrichmentAggregator, Transport, UreqTransport};
use url::Url;

/// Query strings and bodies seen by the server, in arrival order.
#[derive(Default)]
struct Seen {
    queries: Vec<HashMap<String, String>>,
    bodies: Vec<Value>,
}

type Shared = Arc<Mutex<Seen>>;

fn property_json(id: i64, price: f64) -> Value {
    json!({
        "id": id,
        "address": format!("{id} Congress Ave"),
        "city": "Austin",
        "state": "TX",
        "zip_code": "78701",
        "listing_price": price,
        "listing_status": "active",
        "listing_date": "2025-06-01"
    })
}

async fn list_properties(
    State(seen): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    seen.lock().unwrap().queries.push(query);
    Json(json!({
        "success": true,
        "data": [property_json(1, 450000.0), property_json(2, 2150000.0)]
    }))
}

async fn create_property(
    State(seen): State<Shared>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    seen.lock().unwrap().bodies.push(body);
    (
        StatusCode::CREATED,
        Json(json!({"success": true, "data": property_json(3, 450000.0)})),
    )
}

async fn update_property(Path(id): Path<i64>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({"success": false, "message": format!("Property {id} is locked")})),
    )
}

async fn delete_property() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn start_server() -> (Url, Shared) {
    let seen: Shared = Arc::default();
    let app = Router::new()
        .route("/api/properties", get(list_properties).post(create_property))
        .route("/api/properties/{id}", put(update_property).delete(delete_property))
        .route("/api/quote", get(|| async { Json(json!({"quote": "Onward"})) }))
        .route(
            "/api/fortune-cookie",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "down") }),
        )
        .route("/api/color", get(|| async { Json(json!({"color": "teal"})) }))
        .route(
            "/api/spirit-animal",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "down") }),
        )
        .with_state(seen.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    let base = Url::parse(&format!("http://{addr}/api")).unwrap();
    (base, seen)
}

fn transport() -> Arc<dyn Transport> {
    Arc::new(UreqTransport::new(Duration::from_secs(5)))
}

#[tokio::test]
async fn list_sends_server_filters_as_query() {
    let (base, seen) = start_server().await;
    let client = CollectionClient::<Property>::new(transport(), &base);

    let records = client
        .list(&[
            ("status".to_string(), "active".to_string()),
            ("min_price".to_string(), "400000".to_string()),
        ])
        .await
        .unwrap();

    assert_eq!(records.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 2]);
    let seen = seen.lock().unwrap();
    assert_eq!(seen.queries.len(), 1);
    assert_eq!(seen.queries[0].get("status").map(String::as_str), Some("active"));
    assert_eq!(seen.queries[0].get("min_price").map(String::as_str), Some("400000"));
}

#[tokio::test]
async fn create_posts_json_and_decodes_echo() {
    let (base, seen) = start_server().await;
    let client = CollectionClient::<Property>::new(transport(), &base);

    let created = client
        .create(json!({"address": "3 Congress Ave", "listing_price": 450000}))
        .await
        .unwrap();

    assert_eq!(created.map(|p| p.id), Some(3));
    assert_eq!(
        seen.lock().unwrap().bodies,
        vec![json!({"address": "3 Congress Ave", "listing_price": 450000})]
    );
}

#[tokio::test]
async fn non_2xx_statuses_become_rejections() {
    let (base, _) = start_server().await;
    let client = CollectionClient::<Property>::new(transport(), &base);

    let err = client.update(9, json!({})).await.unwrap_err();
    assert_eq!(err, CrmError::rejection(Some(422), "Property 9 is locked"));

    let err = client.delete(9).await.unwrap_err();
    assert_eq!(err, CrmError::rejection(Some(500), "Failed to delete property"));
}

#[tokio::test]
async fn enrichment_survives_half_the_endpoints_failing() {
    let (base, _) = start_server().await;
    let config = ClientConfig::new(base);
    let payload = EnrichmentAggregator::new(transport())
        .fetch_all(&config.enrichment_endpoints())
        .await;
    assert_eq!(payload.keys(), vec![EnrichmentKey::Quote, EnrichmentKey::Color]);
    assert_eq!(payload.color.as_deref(), Some("teal"));
}

#[tokio::test]
async fn closed_port_is_a_transport_failure() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let base = Url::parse(&format!("http://{addr}/api")).unwrap();
    let client = CollectionClient::<Property>::new(transport(), &base);
    let err = client.list(&[]).await.unwrap_err();
    assert_eq!(err, CrmError::transport("Failed to connect to the server"));
}

//! Integration tests for the marketplace client against a local stub backend.
//!
//! Each test spins up its own axum server on an ephemeral port.

use std::time::Duration;

use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use greenora_client::{
    ClientError, DashboardView, MarketplaceClient, ProfileLoader, QuoteDesk, QuoteForm,
    ReceiptSource, NOT_SPECIFIED,
};
use greenora_core::types::{Identity, SyncUserRequest, UserType};

// =============================================================================
// Helpers
// =============================================================================

async fn get_user(Path(uid): Path<String>) -> Json<Value> {
    match uid.as_str() {
        "exporter-1" => Json(json!({
            "success": true,
            "user": {
                "name": "Meera",
                "email": "meera@example.com",
                "userType": "exporter",
                "company": "Meera Botanicals",
                "plantsSaved": ["tulsi"],
                "quotesRequested": []
            }
        })),
        "team/lead?x=1#a" => Json(json!({
            "success": true,
            "user": { "name": "Odd Uid", "email": "odd@example.com", "userType": "buyer" }
        })),
        _ => Json(json!({ "success": false, "error": "User not found" })),
    }
}

async fn sync_user(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({
        "success": true,
        "user": {
            "name": body["name"],
            "email": body["email"],
            "userType": body["userType"]
        }
    }))
}

async fn list_plants() -> Json<Value> {
    Json(json!([
        { "_id": "p1", "name": "Holy Basil (Tulsi)", "price": 180, "benefits": ["Immunity", "Stress", "Respiratory"] },
        { "_id": "p2", "name": "Neem", "price": 95.5 }
    ]))
}

async fn submit_quote(Json(body): Json<Value>) -> Json<Value> {
    if body["destination"] == "Atlantis" {
        return Json(json!({ "success": false }));
    }
    Json(json!({ "success": true, "quoteId": format!("Q-{}", body["quantity"]) }))
}

fn stub_backend() -> Router {
    Router::new()
        .route("/api/users/sync", post(sync_user))
        .route("/api/users/{uid}", get(get_user))
        .route("/api/plants", get(list_plants))
        .route("/api/quotes/submit", post(submit_quote))
}

fn broken_backend() -> Router {
    Router::new().fallback(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "database offline") })
}

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// A base URL nothing is listening on.
async fn dead_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn client(base_url: &str) -> MarketplaceClient {
    MarketplaceClient::new(base_url, Duration::from_secs(5)).unwrap()
}

fn identity() -> Identity {
    Identity {
        uid: "exporter-1".to_string(),
        email: "login@example.com".to_string(),
    }
}

fn filled_form(destination: &str) -> QuoteForm {
    QuoteForm {
        plant_type: "Aloe Vera".to_string(),
        quantity: 250,
        destination: destination.to_string(),
        ..QuoteForm::default()
    }
}

// =============================================================================
// MarketplaceClient
// =============================================================================

#[tokio::test]
async fn test_get_user_success() {
    let base = serve(stub_backend()).await;
    let profile = client(&base).get_user("exporter-1").await.unwrap().unwrap();
    assert_eq!(profile.name.as_deref(), Some("Meera"));
    assert_eq!(profile.user_type, UserType::Exporter);
    assert_eq!(profile.plants_saved, vec!["tulsi".to_string()]);
}

#[tokio::test]
async fn test_get_user_application_error() {
    let base = serve(stub_backend()).await;
    let err = client(&base).get_user("nobody").await.unwrap_err();
    assert!(matches!(err, ClientError::Application(msg) if msg == "User not found"));
}

#[tokio::test]
async fn test_get_user_uid_is_one_path_segment() {
    let base = serve(stub_backend()).await;
    let profile = client(&base).get_user("team/lead?x=1#a").await.unwrap().unwrap();
    assert_eq!(profile.name.as_deref(), Some("Odd Uid"));
}

#[tokio::test]
async fn test_list_plants() {
    let base = serve(stub_backend()).await;
    let plants = client(&base).list_plants().await.unwrap();
    assert_eq!(plants.len(), 2);
    assert_eq!(plants[0].id, "p1");
    assert_eq!(plants[0].headline_benefits().len(), 2);
    assert!(plants[1].benefits.is_empty());
    assert_eq!(plants[1].price_label(), "₹95.5/plant");
}

#[tokio::test]
async fn test_sync_user() {
    let base = serve(stub_backend()).await;
    let request = SyncUserRequest {
        firebase_uid: "new-1".to_string(),
        email: "new@example.com".to_string(),
        name: "New Buyer".to_string(),
        user_type: UserType::Buyer,
        company: None,
        country: Some("India".to_string()),
        phone: None,
    };
    let profile = client(&base).sync_user(&request).await.unwrap().unwrap();
    assert_eq!(profile.email.as_deref(), Some("new@example.com"));
    assert_eq!(profile.user_type, UserType::Buyer);
}

#[tokio::test]
async fn test_non_success_status() {
    let base = serve(broken_backend()).await;
    let err = client(&base).list_plants().await.unwrap_err();
    match err {
        ClientError::Status { status, body } => {
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body, "database offline");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    let base = dead_url().await;
    let err = client(&base).list_plants().await.unwrap_err();
    assert!(matches!(err, ClientError::Network(_)));
}

// =============================================================================
// QuoteDesk
// =============================================================================

#[tokio::test]
async fn test_quote_backend_receipt() {
    let base = serve(stub_backend()).await;
    let desk = QuoteDesk::new(client(&base));

    let receipt = desk
        .submit(&filled_form("Germany"), Some(&identity()), None)
        .await
        .unwrap();
    assert_eq!(receipt.source, ReceiptSource::Backend);
    assert_eq!(receipt.quote_id.as_deref(), Some("Q-250"));
    assert_eq!(
        receipt.message,
        "💰 Quote request submitted for 250 plants of Aloe Vera!"
    );
    assert!(receipt.notice().contains("Quote ID: Q-250"));
}

#[tokio::test]
async fn test_quote_application_failure_falls_back() {
    let base = serve(stub_backend()).await;
    let desk = QuoteDesk::new(client(&base));

    let receipt = desk
        .submit(&filled_form("Atlantis"), Some(&identity()), None)
        .await
        .unwrap();
    assert_eq!(receipt.source, ReceiptSource::Simulated);
    assert!(receipt.quote_id.is_none());
    assert!(receipt.notice().contains("We'll contact you at login@example.com"));
}

#[tokio::test]
async fn test_quote_server_error_falls_back() {
    let base = serve(broken_backend()).await;
    let desk = QuoteDesk::new(client(&base));
    let receipt = desk.submit(&filled_form("UAE"), None, None).await.unwrap();
    assert_eq!(receipt.source, ReceiptSource::Simulated);
}

#[tokio::test]
async fn test_quote_unreachable_backend_falls_back() {
    let base = dead_url().await;
    let desk = QuoteDesk::new(client(&base));

    let loader = ProfileLoader::new(client(&base));
    let profile = loader.load("exporter-1").await;
    assert!(profile.is_none());

    let receipt = desk
        .submit(&filled_form("USA"), Some(&identity()), profile.as_ref())
        .await
        .unwrap();
    assert_eq!(receipt.source, ReceiptSource::Simulated);
    assert_eq!(
        receipt.message,
        "💰 Quote request submitted for 250 plants of Aloe Vera!"
    );
}

#[tokio::test]
async fn test_quote_validation_error_is_returned() {
    let base = serve(stub_backend()).await;
    let desk = QuoteDesk::new(client(&base));
    let err = desk.submit(&filled_form("  "), None, None).await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
}

#[tokio::test]
async fn test_exporter_gets_export_inquiry_wording() {
    let base = serve(stub_backend()).await;
    let loader = ProfileLoader::new(client(&base));
    let profile = loader.load("exporter-1").await.unwrap();

    let desk = QuoteDesk::new(client(&base));
    let receipt = desk
        .submit(&filled_form("Japan"), Some(&identity()), Some(&profile))
        .await
        .unwrap();
    assert!(receipt.message.starts_with("📦 Export inquiry submitted for Aloe Vera!"));
    assert_eq!(receipt.contact_email.as_deref(), Some("meera@example.com"));
}

// =============================================================================
// ProfileLoader and dashboard
// =============================================================================

#[tokio::test]
async fn test_profile_loader_missing_user_is_none() {
    let base = serve(stub_backend()).await;
    let loader = ProfileLoader::new(client(&base));
    assert!(loader.load("ghost").await.is_none());
}

#[tokio::test]
async fn test_dashboard_from_loaded_profile() {
    let base = serve(stub_backend()).await;
    let loader = ProfileLoader::new(client(&base));
    let profile = loader.load("exporter-1").await;

    let view = DashboardView::build(&identity(), profile.as_ref(), chrono::Utc::now());
    assert_eq!(view.display_name, "Meera");
    assert_eq!(view.company, "Meera Botanicals");
    assert_eq!(view.country, NOT_SPECIFIED);
    assert_eq!(view.plants_saved, 1);
}

#[tokio::test]
async fn test_profile_sync_failure_is_none() {
    let base = serve(broken_backend()).await;
    let loader = ProfileLoader::new(client(&base));
    let request = SyncUserRequest {
        firebase_uid: "x".to_string(),
        email: "x@example.com".to_string(),
        name: "X".to_string(),
        user_type: UserType::Exporter,
        company: None,
        country: None,
        phone: None,
    };
    assert!(loader.sync(&request).await.is_none());
}

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::{TestRequest, TestServer};
use chrono::Utc;
use serde_json::{json, Value};

use stylist_api::{
    db::{InMemoryClosetStore, InMemoryPreferenceStore},
    error::{AppError, AppResult},
    models::TrendReport,
    routes::{create_router, AppState},
    services::{
        providers::StoreSearchProvider,
        recommendations::{EMPTY_CLOSET_MESSAGE, FALLBACK_PREFACE, INSUFFICIENT_CLOSET_MARKER},
        PreferenceAdjuster, ProductLookup, RecommendationService, TextGenerator, TrendLookup,
        TrendSource,
    },
};

const CLOSET_OUTFIT: &str = "White shirt and blue jeans. Crisp and easy for the office.";
const GENERAL_OUTFIT: &str = "Navy blazer with grey trousers. Sharp without trying too hard.";

/// Answers by prompt shape, the way the model is asked
struct ScriptedGenerator {
    closet_answer: &'static str,
}

#[async_trait::async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> String {
        if prompt.contains("Proposed Outfit") {
            "MATCH|Fits the notes.".to_string()
        } else if prompt.contains("alternative outfits") {
            "- Outfit 1: A\n- Outfit 2: B\n- Outfit 3: C".to_string()
        } else if prompt.contains("based on a closet") {
            self.closet_answer.to_string()
        } else {
            GENERAL_OUTFIT.to_string()
        }
    }
}

struct FixedTrends;

#[async_trait::async_trait]
impl TrendSource for FixedTrends {
    async fn lookup(&self, query: &str) -> AppResult<TrendReport> {
        if query.contains("unavailable") {
            return Err(AppError::ExternalApi("trend service down".to_string()));
        }
        Ok(TrendReport {
            trend_topic: query.to_string(),
            current_trends: vec![
                "Quiet luxury style".to_string(),
                "Celebrity breakup rumours".to_string(),
                "Denim on denim look".to_string(),
            ],
            insights: "Muted tones lead.".to_string(),
            sources: vec!["https://fashion.example/trends".to_string()],
            fetched_at: Utc::now(),
        })
    }
}

fn create_test_server_with(closet_answer: &'static str) -> TestServer {
    let generator: Arc<dyn TextGenerator> = Arc::new(ScriptedGenerator { closet_answer });
    let recommendations = RecommendationService::new(
        generator.clone(),
        TrendLookup::new(Arc::new(FixedTrends)),
        PreferenceAdjuster::new(generator),
        ProductLookup::new(Arc::new(StoreSearchProvider::new())),
    );
    let state = AppState::new(
        recommendations,
        Arc::new(InMemoryClosetStore::new()),
        Arc::new(InMemoryPreferenceStore::new()),
    );
    TestServer::new(create_router(Arc::new(state))).unwrap()
}

fn create_test_server() -> TestServer {
    create_test_server_with(CLOSET_OUTFIT)
}

fn as_user(request: TestRequest, user: &'static str) -> TestRequest {
    request.add_header(
        HeaderName::from_static("x-user-id"),
        HeaderValue::from_static(user),
    )
}

async fn add_items(server: &TestServer, user: &'static str, items: &[&str]) {
    for item in items {
        as_user(server.post("/closet/items"), user)
            .json(&json!({ "item": item }))
            .await
            .assert_status_ok();
    }
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    response.assert_json(&json!({ "status": "healthy" }));
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = create_test_server();
    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("req-42"),
        )
        .await;
    assert_eq!(response.header("x-request-id").to_str().unwrap(), "req-42");
}

#[tokio::test]
async fn test_missing_user_is_unauthorized() {
    let server = create_test_server();
    let response = server.get("/closet").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("x-user-id"));
}

#[tokio::test]
async fn test_closet_add_list_and_remove() {
    let server = create_test_server();
    add_items(&server, "alice", &["white shirt", "blue jeans"]).await;

    let response = as_user(server.get("/closet"), "alice").await;
    response.assert_json(&json!({ "items": ["white shirt", "blue jeans"] }));

    let response = as_user(server.delete("/closet/items"), "alice")
        .json(&json!({ "item": "white shirt" }))
        .await;
    response.assert_status_ok();

    let response = as_user(server.get("/closet"), "alice").await;
    response.assert_json(&json!({ "items": ["blue jeans"] }));

    // Closets are per user
    let response = as_user(server.get("/closet"), "bob").await;
    response.assert_json(&json!({ "items": [] }));
}

#[tokio::test]
async fn test_closet_remove_missing_item() {
    let server = create_test_server();
    let response = as_user(server.delete("/closet/items"), "alice")
        .json(&json!({ "item": "red scarf" }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_closet_rejects_blank_item() {
    let server = create_test_server();
    let response = as_user(server.post("/closet/items"), "alice")
        .json(&json!({ "item": "   " }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_generate_outfit_empty_closet() {
    let server = create_test_server();
    let response = as_user(server.post("/generate-outfit"), "alice")
        .json(&json!({ "occasion": "work", "style": "casual" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({ "error": EMPTY_CLOSET_MESSAGE }));
}

#[tokio::test]
async fn test_generate_outfit_from_closet() {
    let server = create_test_server();
    add_items(&server, "alice", &["white shirt", "blue jeans"]).await;

    let response = as_user(server.post("/generate-outfit"), "alice")
        .json(&json!({ "occasion": "work", "style": "casual", "gender": "woman" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["recommendation"], CLOSET_OUTFIT);
    assert_eq!(body["is_fallback"], false);
    assert_eq!(
        body["trends_considered"],
        json!(["Quiet luxury style", "Denim on denim look"])
    );
    let links = body["shopping_links"].as_array().unwrap();
    assert!(links.contains(&json!("https://www.amazon.com/s?k=white+shirt")));
}

#[tokio::test]
async fn test_generate_outfit_falls_back_to_general() {
    let server = create_test_server_with(INSUFFICIENT_CLOSET_MARKER);
    add_items(&server, "alice", &["red scarf"]).await;

    let response = as_user(server.post("/generate-outfit"), "alice")
        .json(&json!({ "occasion": "wedding", "style": "formal" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["is_fallback"], true);
    assert_eq!(
        body["recommendation"],
        format!("{}{}", FALLBACK_PREFACE, GENERAL_OUTFIT)
    );
}

#[tokio::test]
async fn test_generate_outfit_general_uses_notes() {
    let server = create_test_server();
    as_user(server.post("/preferences"), "alice")
        .json(&json!({ "preferences": { "additional_notes": "no heels" } }))
        .await
        .assert_status_ok();

    let response = as_user(server.post("/generate-outfit"), "alice")
        .json(&json!({
            "occasion": "dinner",
            "style": "smart",
            "recommendation_type": "general"
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["recommendation"], GENERAL_OUTFIT);
    assert_eq!(body["reasons"], json!(["Style Notes Check: Fits the notes."]));
}

#[tokio::test]
async fn test_preferences_merge() {
    let server = create_test_server();

    let response = as_user(server.get("/preferences"), "alice").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["favorite_colors"], json!([]));

    as_user(server.post("/preferences"), "alice")
        .json(&json!({ "preferences": { "favorite_colors": ["navy"], "height": 158 } }))
        .await
        .assert_status_ok();

    let response = as_user(server.post("/preferences"), "alice")
        .json(&json!({ "preferences": { "skin_color": "olive" } }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["favorite_colors"], json!(["navy"]));
    assert_eq!(body["height"], 158);
    assert_eq!(body["skin_tone"], "olive");
}

#[tokio::test]
async fn test_preferences_reject_unknown_field() {
    let server = create_test_server();
    let response = as_user(server.post("/preferences"), "alice")
        .json(&json!({ "preferences": { "shoe_size": 42 } }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_recommend_outfits() {
    let server = create_test_server();
    add_items(&server, "alice", &["white shirt", "blue jeans"]).await;

    let response = as_user(server.post("/recommend-outfits"), "alice")
        .json(&json!({
            "occasion": "work",
            "style": "casual",
            "base_outfit": CLOSET_OUTFIT,
            "trends": ["Quiet luxury style"]
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["base_outfit"], CLOSET_OUTFIT);
    assert!(body["extra_recommendations"]
        .as_str()
        .unwrap()
        .starts_with("- Outfit 1:"));
    assert_eq!(body["trends_used"], json!(["Quiet luxury style"]));
}

#[tokio::test]
async fn test_recommend_outfits_caps_trends() {
    let server = create_test_server();

    let response = as_user(server.post("/recommend-outfits"), "alice")
        .json(&json!({
            "occasion": "party",
            "style": "chic",
            "recommendation_type": "general",
            "base_outfit": GENERAL_OUTFIT,
            "trends": ["Sequin style", "Metallic look", "Velvet outfit", "Sheer fashion"]
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(
        body["trends_used"],
        json!(["Sequin style", "Metallic look", "Velvet outfit"])
    );
}

#[tokio::test]
async fn test_analyze_trends() {
    let server = create_test_server();

    let response = server.post("/analyze-trends").json(&json!({})).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["trend_topic"], "current fashion trends");
    assert_eq!(
        body["current_trends"],
        json!(["Quiet luxury style", "Denim on denim look"])
    );

    let response = server
        .post("/analyze-trends")
        .json(&json!({ "query": "unavailable" }))
        .await;
    response.assert_status(StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_search_products() {
    let server = create_test_server();

    let response = server
        .post("/search-products")
        .json(&json!({ "outfit": "Black boots and a denim jacket" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["full_outfit_description"], "Black boots and a denim jacket");
    assert!(!body["shopping_links"].as_array().unwrap().is_empty());

    let response = server
        .post("/search-products")
        .json(&json!({ "outfit": "" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

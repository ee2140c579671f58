//! Integration tests for the shaft sizing HTTP API.
//!
//! This test suite drives the router end to end against the shipped
//! catalog in `config/lf_systems`:
//! - Automatic round and rectangular sizing
//! - Cumulative and uniform airflow models
//! - User-specified sizes, including failing and parallel-fan cases
//! - Markdown reports and CSI specifications
//! - Fan catalog listing
//! - Error cases

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use shaft_sizer::api::{AppState, create_router};
use shaft_sizer::config::ConfigLoader;

// =============================================================================
// Test Helpers
// =============================================================================

fn create_test_state() -> AppState {
    let config = ConfigLoader::load("./config/lf_systems").expect("Failed to load config");
    AppState::new(config)
}

fn create_router_for_test() -> Router {
    create_router(create_test_state())
}

async fn send(
    router: Router,
    method: &str,
    uri: &str,
    body: Option<String>,
) -> (StatusCode, String, String) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get("content-type")
        .map(|v| v.to_str().unwrap().to_string())
        .unwrap_or_default();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn post_size(router: Router, body: Value) -> (StatusCode, Value) {
    let (status, _, text) = send(router, "POST", "/size", Some(body.to_string())).await;
    (status, serde_json::from_str(&text).unwrap())
}

/// Ten storeys, two 4" subducts at 100 CFM per floor, 50% diversity and a
/// two-elbow offset above the roof.
fn ten_storey_building(sizing: Value) -> Value {
    let floors: Vec<Value> = (0..10)
        .map(|_| json!({"penetrations": 2, "subduct_size_in": 4, "cfm_per_penetration": 100}))
        .collect();
    json!({
        "project": {
            "name": "Riverside Lofts",
            "location": "Austin, TX",
            "prepared_by": "engineer@example.com"
        },
        "exhaust_type": "clothes_dryers",
        "floors": floors,
        "floor_height_ft": 10,
        "duct_after_last_ft": 20,
        "diversity_pct": 50,
        "offset": {"elbows": 2, "length_ft": 10, "angle": 90},
        "sizing": sizing,
        "max_delta_p": 0.25
    })
}

// =============================================================================
// Automatic Sizing
// =============================================================================

#[tokio::test]
async fn test_round_auto_sizing() {
    let router = create_router_for_test();
    let body = ten_storey_building(json!({"mode": "round_auto"}));
    let (status, result) = post_size(router, body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["shaft"]["label"], "12\" Round");
    assert_eq!(result["shaft"]["passes"], true);
    assert_eq!(result["shaft"]["design_cfm"], "1000");
    assert_eq!(result["shaft"]["total_penetrations"], 20);
    assert_eq!(result["shaft"]["floors"].as_array().unwrap().len(), 10);
    assert_eq!(result["alternatives"].as_array().unwrap().len(), 8);
    assert_eq!(result["fan"]["model"], "DEF015");
    assert_eq!(result["fan"]["quantity"], 1);
    assert_eq!(result["fan"]["system_sp"], "0.6487");
    assert_eq!(result["fan"]["available_cfm"], "1646");
    assert_eq!(result["fan"]["margin_pct"], "64.6");
    assert_eq!(result["controller"]["model"], "L152.M");
    assert_eq!(result["chart"]["system_curve"].as_array().unwrap().len(), 21);
}

#[tokio::test]
async fn test_uniform_model_needs_larger_shaft() {
    let router = create_router_for_test();
    let mut body = ten_storey_building(json!({"mode": "round_auto"}));
    body["flow_model"] = json!("uniform");
    let (status, result) = post_size(router, body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["shaft"]["label"], "14\" Round");
    assert_eq!(result["fan"]["available_cfm"], "1745");
}

#[tokio::test]
async fn test_rect_auto_sizing() {
    let router = create_router_for_test();
    let body = ten_storey_building(json!({"mode": "rect_auto"}));
    let (status, result) = post_size(router, body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["shaft"]["label"], "12\" × 8\" Rect");
    assert_eq!(result["shaft"]["shape"]["kind"], "rectangular");
}

#[tokio::test]
async fn test_low_rise_uses_single_transducer_controller() {
    let router = create_router_for_test();
    let mut body = ten_storey_building(json!({"mode": "round_auto"}));
    body["floors"] = json!(body["floors"].as_array().unwrap()[..5].to_vec());
    let (status, result) = post_size(router, body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["controller"]["model"], "L150.H");
}

#[tokio::test]
async fn test_audit_trace_contains_steps() {
    let router = create_router_for_test();
    let (_, result) = post_size(router, ten_storey_building(json!({"mode": "round_auto"}))).await;

    let steps = result["audit_trace"]["steps"].as_array().unwrap();
    let rules: Vec<&str> = steps.iter().map(|s| s["rule_id"].as_str().unwrap()).collect();
    assert_eq!(
        rules,
        vec![
            "floor_aggregation",
            "offset_fittings",
            "shaft_search",
            "fan_selection",
            "controller_selection"
        ]
    );
    assert!(result["audit_trace"]["warnings"].as_array().unwrap().is_empty());
    assert!(result["calculation_id"].is_string());
}

// =============================================================================
// User-Specified Sizes
// =============================================================================

#[tokio::test]
async fn test_rect_user_orders_sides() {
    let router = create_router_for_test();
    let body = ten_storey_building(json!({"mode": "rect_user", "width_in": 12, "height_in": 24}));
    let (status, result) = post_size(router, body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["shaft"]["label"], "24\" × 12\" Rect");
}

#[tokio::test]
async fn test_undersized_user_shaft_returns_warning() {
    let router = create_router_for_test();
    let body = ten_storey_building(json!({"mode": "round_user", "diameter_in": 10}));
    let (status, result) = post_size(router, body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["shaft"]["passes"], false);
    assert_eq!(result["audit_trace"]["warnings"][0]["code"], "DELTA_P_EXCEEDED");
    assert_eq!(result["audit_trace"]["warnings"][0]["severity"], "high");
}

#[tokio::test]
async fn test_parallel_fans() {
    let router = create_router_for_test();
    let mut body = ten_storey_building(json!({"mode": "round_user", "diameter_in": 36}));
    body["diversity_pct"] = json!(100);
    for floor in body["floors"].as_array_mut().unwrap() {
        floor["cfm_per_penetration"] = json!(400);
    }
    let (status, result) = post_size(router, body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["fan"]["model"], "DEF050");
    assert_eq!(result["fan"]["parallel"], true);
    assert!(result["fan"]["cfm_per_fan"].is_string());
    assert!(
        result["audit_trace"]["warnings"]
            .as_array()
            .unwrap()
            .iter()
            .any(|w| w["code"] == "PARALLEL_FANS")
    );
}

// =============================================================================
// Reports and Catalog
// =============================================================================

#[tokio::test]
async fn test_report_returns_markdown() {
    let router = create_router_for_test();
    let body = json!({
        "input": ten_storey_building(json!({"mode": "round_auto"})),
        "date": "2026-03-01"
    });
    let (status, content_type, text) =
        send(router, "POST", "/report", Some(body.to_string())).await;

    assert_eq!(status, StatusCode::OK);
    assert!(content_type.starts_with("text/markdown"));
    assert!(text.starts_with("# MES SHAFT SIZING REPORT"));
    assert!(text.contains("**Date:** March 2026"));
    assert!(text.contains("| Recommended Shaft | 12\" Round |"));
    assert!(text.contains("| 10 (Top) |"));
}

#[tokio::test]
async fn test_spec_returns_csi_section() {
    let router = create_router_for_test();
    let body = ten_storey_building(json!({"mode": "round_auto"}));
    let (status, content_type, text) =
        send(router, "POST", "/spec", Some(body.to_string())).await;

    assert_eq!(status, StatusCode::OK);
    assert!(content_type.starts_with("text/markdown"));
    assert!(text.starts_with("# SECTION 23 34 00"));
    assert!(text.contains("#### 2.02 EXHAUST FAN: DEF015"));
    assert!(text.contains("#### 2.03 CONTROLLER: L152.M"));
    assert!(text.contains("- Shaft size: 12\" Round"));
    assert!(text.contains("| Maximum floor differential | 0.1016 in. WC |"));
    assert!(text.trim_end().ends_with("**END OF SECTION 23 34 00**"));
}

#[tokio::test]
async fn test_spec_rejects_invalid_input() {
    let router = create_router_for_test();
    let mut body = ten_storey_building(json!({"mode": "round_auto"}));
    body["diversity_pct"] = json!(10);
    let (status, _, text) = send(router, "POST", "/spec", Some(body.to_string())).await;
    let error: Value = serde_json::from_str(&text).unwrap();

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");
    assert_eq!(error["details"], "diversity_pct");
}

#[tokio::test]
async fn test_fan_catalog_listing() {
    let router = create_router_for_test();
    let (status, _, text) = send(router, "GET", "/fans", None).await;
    let fans: Value = serde_json::from_str(&text).unwrap();

    assert_eq!(status, StatusCode::OK);
    let models: Vec<&str> = fans
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["model"].as_str().unwrap())
        .collect();
    assert_eq!(models, vec!["DEF004", "DEF008", "DEF015", "DEF025", "DEF035", "DEF050"]);
    assert_eq!(fans[0]["max_cfm"], 540.0);
}

#[tokio::test]
async fn test_single_fan_with_curve() {
    let router = create_router_for_test();
    let (status, _, text) = send(router, "GET", "/fans/def015", None).await;
    let fan: Value = serde_json::from_str(&text).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(fan["model"], "DEF015");
    assert_eq!(fan["curve"].as_array().unwrap().len(), 9);
}

// =============================================================================
// Error Cases
// =============================================================================

#[tokio::test]
async fn test_error_unknown_fan() {
    let router = create_router_for_test();
    let (status, _, text) = send(router, "GET", "/fans/DEF999", None).await;
    let error: Value = serde_json::from_str(&text).unwrap();

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["code"], "FAN_NOT_FOUND");
}

#[tokio::test]
async fn test_error_malformed_json() {
    let router = create_router_for_test();
    let (status, _, text) = send(router, "POST", "/size", Some("{invalid json".to_string())).await;
    let error: Value = serde_json::from_str(&text).unwrap();

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "MALFORMED_JSON");
}

#[tokio::test]
async fn test_error_missing_floors() {
    let router = create_router_for_test();
    let mut body = ten_storey_building(json!({"mode": "round_auto"}));
    body.as_object_mut().unwrap().remove("floors");
    let (status, error) = post_size(router, body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");
    assert!(error["message"].as_str().unwrap().contains("floors"));
}

#[tokio::test]
async fn test_error_invalid_diversity() {
    let router = create_router_for_test();
    let mut body = ten_storey_building(json!({"mode": "round_auto"}));
    body["diversity_pct"] = json!(10);
    let (status, error) = post_size(router, body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");
    assert_eq!(error["details"], "diversity_pct");
}

#[tokio::test]
async fn test_error_unknown_sizing_mode() {
    let router = create_router_for_test();
    let body = ten_storey_building(json!({"mode": "oval_auto"}));
    let (status, error) = post_size(router, body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_error_no_viable_shaft() {
    let router = create_router_for_test();
    let mut body = ten_storey_building(json!({"mode": "round_user", "diameter_in": 8}));
    for floor in body["floors"].as_array_mut().unwrap() {
        floor["subduct_size_in"] = json!(8);
    }
    let (status, error) = post_size(router, body).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error["code"], "NO_VIABLE_SHAFT");
}

#[tokio::test]
async fn test_error_missing_content_type() {
    let router = create_router_for_test();
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/size")
                .body(Body::from(
                    ten_storey_building(json!({"mode": "round_auto"})).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let error: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(error["code"], "MISSING_CONTENT_TYPE");
}

// HTTP tests for the matching routes

use actix_web::{http::StatusCode, test, web, App};
use serde_json::{json, Value};
use stable_match::config::MatchingSettings;
use stable_match::models::MatchMode;
use stable_match::routes::{configure_routes, matching::AppState};

fn state(matching: MatchingSettings) -> web::Data<AppState> {
    web::Data::new(AppState { matching })
}

fn contested_body() -> Value {
    json!({
        "proposers": [
            { "id": "A", "preferences": ["X"] },
            { "id": "B", "preferences": ["X", "Y"] }
        ],
        "proposees": [
            { "id": "X", "preferences": ["B", "A"] },
            { "id": "Y", "preferences": ["B"] }
        ]
    })
}

#[actix_web::test]
async fn test_health() {
    let app = test::init_service(
        App::new()
            .app_data(state(MatchingSettings::default()))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[actix_web::test]
async fn test_run_stable_by_default() {
    let app = test::init_service(
        App::new()
            .app_data(state(MatchingSettings::default()))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/matching/run")
        .set_json(contested_body())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["mode"], "stable");
    assert_eq!(body["stable"], true);
    assert_eq!(body["report"]["utility"]["matchCount"], 1);
    assert_eq!(body["report"]["pairings"][0]["proposer"], "B");
    assert_eq!(body["report"]["pairings"][0]["proposee"], "X");
    assert!(body.get("trace").is_none());
    assert!(body["runId"].as_str().is_some());
}

#[actix_web::test]
async fn test_run_greedy_with_trace() {
    let app = test::init_service(
        App::new()
            .app_data(state(MatchingSettings::default()))
            .configure(configure_routes),
    )
    .await;

    let mut body = contested_body();
    body["mode"] = json!("greedy");
    body["includeTrace"] = json!(true);

    let req = test::TestRequest::post()
        .uri("/api/v1/matching/run")
        .set_json(body)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["mode"], "greedy");
    assert_eq!(body["stable"], false);
    assert_eq!(body["blockingPairs"][0]["proposer"], "B");
    assert_eq!(body["report"]["utility"]["matchCount"], 2);

    let trace = body["trace"].as_array().unwrap();
    assert_eq!(trace[0]["event"], "queue");
    assert!(trace.iter().all(|e| e["event"] != "dumped"));
}

#[actix_web::test]
async fn test_configured_default_mode() {
    let matching = MatchingSettings {
        default_mode: MatchMode::Greedy,
        ..MatchingSettings::default()
    };
    let app = test::init_service(
        App::new()
            .app_data(state(matching))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/matching/run")
        .set_json(contested_body())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["mode"], "greedy");
}

#[actix_web::test]
async fn test_duplicate_identifier_rejected() {
    let app = test::init_service(
        App::new()
            .app_data(state(MatchingSettings::default()))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/matching/run")
        .set_json(json!({
            "proposers": [
                { "id": "A", "preferences": ["X"] },
                { "id": "A", "preferences": [] }
            ],
            "proposees": [{ "id": "X", "preferences": ["A"] }]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Invalid input");
    assert_eq!(body["message"], "duplicate proposer identifier: A");
}

#[actix_web::test]
async fn test_oversize_input_rejected() {
    let matching = MatchingSettings {
        max_agents_per_side: Some(1),
        ..MatchingSettings::default()
    };
    let app = test::init_service(
        App::new()
            .app_data(state(matching))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/matching/run")
        .set_json(contested_body())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_traced_run_over_trace_limit_refused() {
    let matching = MatchingSettings {
        max_trace_agents: 1,
        ..MatchingSettings::default()
    };
    let app = test::init_service(
        App::new()
            .app_data(state(matching))
            .configure(configure_routes),
    )
    .await;

    let mut traced = contested_body();
    traced["includeTrace"] = json!(true);
    let req = test::TestRequest::post()
        .uri("/api/v1/matching/run")
        .set_json(traced)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Trace too large");

    // Same input without a trace still runs
    let req = test::TestRequest::post()
        .uri("/api/v1/matching/run")
        .set_json(contested_body())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_configured_trace_default_respects_trace_limit() {
    let matching = MatchingSettings {
        include_trace: true,
        max_trace_agents: 1,
        ..MatchingSettings::default()
    };
    let app = test::init_service(
        App::new()
            .app_data(state(matching))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/matching/run")
        .set_json(contested_body())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let mut untraced = contested_body();
    untraced["includeTrace"] = json!(false);
    let req = test::TestRequest::post()
        .uri("/api/v1/matching/run")
        .set_json(untraced)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body.get("trace").is_none());
}

#[actix_web::test]
async fn test_blank_identifier_fails_validation() {
    let app = test::init_service(
        App::new()
            .app_data(state(MatchingSettings::default()))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/matching/run")
        .set_json(json!({ "proposers": [{ "id": "", "preferences": [] }] }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Validation failed");
}

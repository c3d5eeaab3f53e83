//! Integration tests for operator sessions: import → start → render →
//! advance → terminal → back, all through the HTTP surface.

mod common;

use axum::http::StatusCode;
use serde_json::json;

async fn import_acme(app: &axum::Router) {
    let (status, _) =
        common::post_json(app.clone(), "/api/v1/transfer/import", &common::acme_bundle()).await;
    assert_eq!(status, StatusCode::OK);
}

async fn start_session(app: &axum::Router) -> serde_json::Value {
    let (status, view) = common::post_json(
        app.clone(),
        "/api/v1/sessions",
        &json!({
            "productId": "ACME",
            "operatorName": "João",
            "customerFirstName": "Maria"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    view
}

#[tokio::test]
async fn test_full_call_walkthrough() {
    let app = common::build_test_app();
    import_acme(&app).await;

    // Start lands on the entry step with the customer name substituted in
    // bold.
    let view = start_session(&app).await;
    assert_eq!(view["position"], "step");
    assert_eq!(view["step"]["id"], "s1");
    assert_eq!(view["canGoBack"], false);
    let nodes = view["step"]["nodes"].as_array().unwrap();
    assert_eq!(nodes[0], json!({"kind": "plain", "text": "Hi "}));
    assert_eq!(nodes[1]["kind"], "styled");
    assert_eq!(nodes[1]["text"], "Maria");
    assert_eq!(nodes[1]["style"]["bold"], true);
    let buttons = view["step"]["buttons"].as_array().unwrap();
    assert_eq!(buttons[0]["label"], "Next");
    assert_eq!(buttons[1]["nextStepId"], serde_json::Value::Null);

    let session_id = view["sessionId"].as_str().unwrap().to_owned();

    // Clicking "Next" moves to s2.
    let (status, view) = common::post_json(
        app.clone(),
        &format!("/api/v1/sessions/{session_id}/advance"),
        &json!({"buttonId": "s1-b0"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["step"]["id"], "s2");
    assert_eq!(view["canGoBack"], true);

    // Back returns to s1 and empties the history.
    let (status, view) = common::post_json(
        app.clone(),
        &format!("/api/v1/sessions/{session_id}/back"),
        &json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["step"]["id"], "s1");
    assert_eq!(view["canGoBack"], false);

    // Ending the call keeps history: terminal, then back out to s1.
    let (status, view) = common::post_json(
        app.clone(),
        &format!("/api/v1/sessions/{session_id}/advance"),
        &json!({"buttonId": "s1-b1"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["position"], "terminal");
    assert!(view["step"].is_null());
    assert_eq!(view["canGoBack"], true);

    let (status, view) = common::post_json(
        app.clone(),
        &format!("/api/v1/sessions/{session_id}/back"),
        &json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["step"]["id"], "s1");

    // Returning to the product list destroys the session.
    let status = common::delete(app.clone(), &format!("/api/v1/sessions/{session_id}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) =
        common::get_json(app, &format!("/api/v1/sessions/{session_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_dangling_link_is_a_dead_end_not_a_crash() {
    let app = common::build_test_app();
    import_acme(&app).await;

    // An admin deletes s2 while operators hold sessions pointing at it.
    let status = common::delete(app.clone(), "/api/v1/steps/s2").await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let view = start_session(&app).await;
    let session_id = view["sessionId"].as_str().unwrap().to_owned();

    let (status, body) = common::post_json(
        app.clone(),
        &format!("/api/v1/sessions/{session_id}/advance"),
        &json!({"buttonId": "s1-b0"}),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "script_unavailable");
    assert_eq!(
        body["message"],
        "script data unavailable, contact an administrator"
    );

    // The session survives: back out to s1 and keep working.
    let (status, view) = common::post_json(
        app,
        &format!("/api/v1/sessions/{session_id}/back"),
        &json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["step"]["id"], "s1");
}

#[tokio::test]
async fn test_unknown_button_is_rejected() {
    let app = common::build_test_app();
    import_acme(&app).await;
    let view = start_session(&app).await;
    let session_id = view["sessionId"].as_str().unwrap().to_owned();

    let (status, body) = common::post_json(
        app,
        &format!("/api/v1/sessions/{session_id}/advance"),
        &json!({"buttonId": "ghost"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "unknown_button");
}

#[tokio::test]
async fn test_session_for_unknown_product_returns_404() {
    let app = common::build_test_app();

    let (status, body) = common::post_json(
        app,
        "/api/v1/sessions",
        &json!({"productId": "ghost"}),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "product_not_found");
}

#[tokio::test]
async fn test_annotations_surface_with_the_step() {
    // Arrange — a step carrying a legacy alert (no title) and tabulations.
    let app = common::build_test_app();
    common::post_json(
        app.clone(),
        "/api/v1/steps",
        &json!({
            "id": "s1",
            "title": "Retenção",
            "content": "Oferecer desconto",
            "buttons": [],
            "productId": "acme",
            "alert": {"message": "Cliente em lista de retenção", "createdAt": "2024-11-01T12:00:00Z"},
            "tabulations": [{"name": "Retido", "description": "Cliente aceitou a oferta"}]
        }),
    )
    .await;
    common::post_json(
        app.clone(),
        "/api/v1/products",
        &json!({"id": "acme", "name": "ACME", "firstStepId": "s1"}),
    )
    .await;

    // Act
    let (status, view) = common::post_json(
        app,
        "/api/v1/sessions",
        &json!({"productId": "acme"}),
    )
    .await;

    // Assert — alert renders with the default title; the tabulation
    // affordance pulses on arrival.
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(view["step"]["alert"]["title"], "Atenção");
    assert_eq!(
        view["step"]["alert"]["message"],
        "Cliente em lista de retenção"
    );
    assert_eq!(view["step"]["tabulations"][0]["name"], "Retido");
    assert_eq!(view["step"]["tabulationPulse"], true);
}

#[tokio::test]
async fn test_segmented_step_renders_styled_nodes() {
    // Arrange — a step whose content carries a styled segment.
    let app = common::build_test_app();
    common::post_json(
        app.clone(),
        "/api/v1/steps",
        &json!({
            "id": "s1",
            "title": "Oferta",
            "content": "Temos uma oferta imperdível hoje",
            "buttons": [],
            "productId": "acme",
            "segments": [
                {"id": "seg1", "text": "oferta imperdível",
                 "style": {"bold": true, "color": "#c00", "size": "2xl"}}
            ]
        }),
    )
    .await;
    common::post_json(
        app.clone(),
        "/api/v1/products",
        &json!({"id": "acme", "name": "ACME", "firstStepId": "s1"}),
    )
    .await;

    // Act — operator runs a 20px base size.
    let (status, view) = common::post_json(
        app,
        "/api/v1/sessions",
        &json!({"productId": "acme", "basePx": 20.0}),
    )
    .await;

    // Assert — gap, styled match with the scaled size, trailing text.
    assert_eq!(status, StatusCode::CREATED);
    let nodes = view["step"]["nodes"].as_array().unwrap();
    assert_eq!(nodes[0], json!({"kind": "plain", "text": "Temos uma "}));
    assert_eq!(nodes[1]["kind"], "styled");
    assert_eq!(nodes[1]["text"], "oferta imperdível");
    assert_eq!(nodes[1]["style"]["color"], "#c00");
    assert_eq!(nodes[1]["style"]["sizePx"], 30.0);
    assert_eq!(nodes[2], json!({"kind": "plain", "text": " hoje"}));
}

//! Integration tests for the product repository surface.

mod common;

use axum::http::StatusCode;
use serde_json::json;

fn product_body(id: &str, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "category": "Telefonia",
        "active": true,
        "firstStepId": null
    })
}

#[tokio::test]
async fn test_product_crud_round_trip() {
    let app = common::build_test_app();

    let (status, created) =
        common::post_json(app.clone(), "/api/v1/products", &product_body("acme", "ACME")).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "ACME");

    let (status, fetched) = common::get_json(app.clone(), "/api/v1/products/acme").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["category"], "Telefonia");

    let mut updated = product_body("acme", "ACME Telecom");
    updated["firstStepId"] = json!("s1");
    let (status, body) = common::put_json(app.clone(), "/api/v1/products/acme", &updated).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["firstStepId"], "s1");

    let status = common::delete(app.clone(), "/api/v1/products/acme").await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = common::get_json(app, "/api/v1/products/acme").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_products_list_is_ordered_by_name() {
    let app = common::build_test_app();
    common::post_json(app.clone(), "/api/v1/products", &product_body("z", "Zeta")).await;
    common::post_json(app.clone(), "/api/v1/products", &product_body("a", "Alfa")).await;

    let (status, products) = common::get_json(app, "/api/v1/products").await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = products
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Alfa", "Zeta"]);
}

#[tokio::test]
async fn test_duplicate_product_id_is_rejected() {
    let app = common::build_test_app();
    common::post_json(app.clone(), "/api/v1/products", &product_body("acme", "ACME")).await;

    let (status, json) =
        common::post_json(app, "/api/v1/products", &product_body("acme", "Clone")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_error");
}

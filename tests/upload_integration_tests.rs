mod common;

use axum::http::StatusCode;
use common::{RequestBuilder, TestHarness, read_json};

#[tokio::test]
async fn test_upload_returns_analysis() {
    let harness = TestHarness::new().await;
    let csv = common::sheet(&[
        ("Laptop", "alice@corp.example", 10),
        ("Monitor", "bob@corp.example", 40),
    ]);

    let response = harness.upload("assets.csv", &csv).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["filename"], "assets.csv");
    assert_eq!(body["total_assets"], 2);
    assert_eq!(body["expiring_count"], 1);
    assert_eq!(body["expiring"][0]["name"], "Laptop");
    assert_eq!(body["active_assets"], 2);
    assert_eq!(body["total_value"], 200.0);
    assert_eq!(body["expiry_chart"]["data"][0]["type"], "histogram");
}

#[tokio::test]
async fn test_upload_then_view_round_trip() {
    let harness = TestHarness::new().await;
    let csv = common::sheet(&[("Laptop", "alice@corp.example", 10)]);

    let response = harness.upload("fleet.csv", &csv).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = harness.get("/assets/fleet.csv").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["filename"], "fleet.csv");
    assert_eq!(body["total_assets"], 1);
    assert_eq!(body["expiring_count"], 1);
}

#[tokio::test]
async fn test_upload_without_file_field_is_rejected() {
    let harness = TestHarness::new().await;

    let response = harness
        .make_request(RequestBuilder::upload_wrong_field("Asset\nLaptop\n"))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_view_unknown_filename_is_404() {
    let harness = TestHarness::new().await;

    let response = harness.get("/assets/never-uploaded.csv").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = read_json(response).await;
    assert_eq!(body["error"], "Not found");
}

#[tokio::test]
async fn test_unparsable_expiry_row_counted_but_not_expiring() {
    let harness = TestHarness::new().await;
    let expiry = (chrono::Utc::now() + chrono::Duration::days(10)).date_naive();
    let csv = format!(
        "Asset,Owner Email,Expiry Date\n\
         Laptop,alice@corp.example,{}\n\
         Router,carol@corp.example,someday-soon\n",
        expiry
    );

    let response = harness.upload("assets.csv", &csv).await;
    let body = read_json(response).await;

    assert_eq!(body["total_assets"], 2);
    assert_eq!(body["expiring_count"], 1);
    assert_eq!(body["expiring"][0]["name"], "Laptop");
}

#[tokio::test]
async fn test_no_status_column_counts_all_active() {
    let harness = TestHarness::new().await;
    let csv = "Asset,Expiry Date\nA,2099-01-01\nB,2099-01-01\nC,2099-01-01\n";

    let response = harness.upload("assets.csv", csv).await;
    let body = read_json(response).await;

    assert_eq!(body["total_assets"], 3);
    assert_eq!(body["active_assets"], 3);
}

#[tokio::test]
async fn test_upload_traversal_filename_is_sanitized() {
    let harness = TestHarness::new().await;
    let csv = common::sheet(&[("Laptop", "alice@corp.example", 10)]);

    let response = harness.upload("../../etc/assets.csv", &csv).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["filename"], "assets.csv");

    let response = harness.get("/assets/assets.csv").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_reupload_replaces_previous_sheet() {
    let harness = TestHarness::new().await;

    let first = common::sheet(&[("Laptop", "alice@corp.example", 10)]);
    harness.upload("assets.csv", &first).await;

    let second = common::sheet(&[
        ("Laptop", "alice@corp.example", 10),
        ("Monitor", "bob@corp.example", 20),
        ("Router", "carol@corp.example", 25),
    ]);
    harness.upload("assets.csv", &second).await;

    let body = read_json(harness.get("/assets/assets.csv").await).await;
    assert_eq!(body["total_assets"], 3);
}

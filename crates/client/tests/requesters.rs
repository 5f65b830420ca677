//! Report, prediction and geocoding clients against stub services.

mod common;

use std::collections::HashMap;

use assert_matches::assert_matches;
use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use civic_client::geocoding::{locate_project, Geocoder, GoogleGeocoder};
use civic_client::requests::{
    DateRange, PredictionRequest, PredictionRequester, ReportRequest, ReportRequester,
    ReportType, RequestSlot,
};
use civic_client::{ClientError, GeocodingError};
use civic_core::types::LatLng;
use common::{sample_new, spawn};
use serde_json::{json, Value};

fn report_request() -> ReportRequest {
    ReportRequest {
        report_type: ReportType::Traffic,
        format: "pdf".into(),
        date_range: DateRange {
            start: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
        },
        location: "all".into(),
    }
}

fn prediction_request() -> PredictionRequest {
    let when = NaiveDate::from_ymd_opt(2025, 3, 14)
        .unwrap()
        .and_hms_opt(17, 30, 0)
        .unwrap();
    PredictionRequest::at(when, Some("Downtown".into()))
}

async fn stub_services() -> String {
    let app = Router::new()
        .route(
            "/report/ok",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["reportType"], "traffic");
                Json(json!({
                    "summary": {
                        "total_records": 1440,
                        "unique_roads": 12,
                        "average_traffic_level": 2.7,
                        "peak_traffic_percentage": 18.5
                    },
                    "report_url": "http://reports.local/r/42.pdf"
                }))
            }),
        )
        .route(
            "/report/error",
            post(|| async { Json(json!({ "error": "model unavailable" })) }),
        )
        .route(
            "/report/malformed",
            post(|| async { (StatusCode::OK, "{\"summary\": ") }),
        )
        .route(
            "/report/down",
            post(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
        )
        .route(
            "/predict/bare",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["timestamp"], "2025-03-14 17:30");
                Json(json!([
                    { "road": "Colorado Blvd", "level": 4, "path": [[34.1456, -118.15], [34.1456, -118.13]] },
                    { "level": 1, "path": [[34.16, -118.14], [34.17, -118.14]] }
                ]))
            }),
        )
        .route(
            "/predict/wrapped",
            post(|| async {
                Json(json!({ "predictions": [{ "level": 3, "path": [[34.1, -118.1], [34.2, -118.2]] }] }))
            }),
        )
        .route(
            "/geocode",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                let address = params.get("address").cloned().unwrap_or_default();
                if params.get("key").map(String::as_str) != Some("test-key") {
                    return Json(json!({ "status": "REQUEST_DENIED", "error_message": "bad key" }));
                }
                if address.starts_with("Nowhere") {
                    return Json(json!({ "status": "ZERO_RESULTS", "results": [] }));
                }
                assert!(address.ends_with(", Pasadena, CA"));
                Json(json!({
                    "status": "OK",
                    "results": [{ "geometry": { "location": { "lat": 34.1478, "lng": -118.1445 } } }]
                }))
            }),
        );
    spawn(app).await
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[tokio::test]
async fn report_summary_and_url_are_returned() {
    let base = stub_services().await;
    let requester = ReportRequester::new(reqwest::Client::new(), format!("{base}/report/ok"));

    let response = requester.generate(&report_request()).await.unwrap();
    let summary = response.summary.unwrap();
    assert_eq!(summary.total_records, 1440);
    assert_eq!(summary.unique_roads, 12);
    assert_eq!(response.report_url.as_deref(), Some("http://reports.local/r/42.pdf"));
}

#[tokio::test]
async fn report_error_field_is_a_failure() {
    let base = stub_services().await;
    let requester = ReportRequester::new(reqwest::Client::new(), format!("{base}/report/error"));

    assert_matches!(
        requester.generate(&report_request()).await,
        Err(ClientError::Api { status: 200, ref message }) if message == "model unavailable"
    );
}

#[tokio::test]
async fn malformed_report_json_is_reported() {
    let base = stub_services().await;
    let requester = ReportRequester::new(reqwest::Client::new(), format!("{base}/report/malformed"));

    assert_matches!(
        requester.generate(&report_request()).await,
        Err(ClientError::MalformedResponse(_))
    );
}

#[tokio::test]
async fn report_http_failure_is_reported() {
    let base = stub_services().await;
    let requester = ReportRequester::new(reqwest::Client::new(), format!("{base}/report/down"));

    assert_matches!(
        requester.generate(&report_request()).await,
        Err(ClientError::Api { status: 502, .. })
    );
}

#[tokio::test]
async fn failed_report_lands_in_slot_as_error() {
    let base = stub_services().await;
    let requester = ReportRequester::new(reqwest::Client::new(), format!("{base}/report/malformed"));
    let mut slot = RequestSlot::new();

    let ticket = slot.begin();
    let result = requester.generate(&report_request()).await;
    assert!(slot.finish(ticket, result));

    assert!(!slot.is_loading());
    assert!(slot.error().unwrap().starts_with("Malformed response"));
}

// ---------------------------------------------------------------------------
// Predictions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bare_prediction_list() {
    let base = stub_services().await;
    let requester = PredictionRequester::new(reqwest::Client::new(), format!("{base}/predict/bare"));

    let predictions = requester.predict(&prediction_request()).await.unwrap();
    assert_eq!(predictions.len(), 2);
    assert_eq!(predictions[0].road.as_deref(), Some("Colorado Blvd"));
    assert_eq!(predictions[0].level, 4);
    assert_eq!(predictions[1].path_points()[0], LatLng::new(34.16, -118.14));
}

#[tokio::test]
async fn wrapped_prediction_list() {
    let base = stub_services().await;
    let requester =
        PredictionRequester::new(reqwest::Client::new(), format!("{base}/predict/wrapped"));

    let predictions = requester.predict(&prediction_request()).await.unwrap();
    assert_eq!(predictions.len(), 1);
    assert_eq!(predictions[0].level, 3);
}

#[tokio::test]
async fn prediction_against_wrong_endpoint_fails() {
    let base = stub_services().await;
    let requester = PredictionRequester::new(reqwest::Client::new(), format!("{base}/missing"));

    assert_matches!(
        requester.predict(&prediction_request()).await,
        Err(ClientError::Api { status: 404, .. })
    );
}

// ---------------------------------------------------------------------------
// Geocoding
// ---------------------------------------------------------------------------

fn geocoder(base: &str, key: &str) -> GoogleGeocoder {
    GoogleGeocoder::new(reqwest::Client::new(), key)
        .with_endpoint(format!("{base}/geocode"))
        .with_region_suffix(", Pasadena, CA")
}

#[tokio::test]
async fn geocode_resolves_address() {
    let base = stub_services().await;
    let location = geocoder(&base, "test-key")
        .geocode("100 N Garfield Ave")
        .await
        .unwrap();
    assert_eq!(location, LatLng::new(34.1478, -118.1445));
}

#[tokio::test]
async fn locate_project_fills_location() {
    let base = stub_services().await;
    let mut input = sample_new("City Hall Plaza");
    input.address = "100 N Garfield Ave".into();
    input.location = LatLng::new(0.0, 0.0);

    let located = locate_project(&geocoder(&base, "test-key"), input).await.unwrap();
    assert_eq!(located.location, LatLng::new(34.1478, -118.1445));
}

#[tokio::test]
async fn geocode_zero_results_aborts_locate() {
    let base = stub_services().await;
    let mut input = sample_new("Lost");
    input.address = "Nowhere Lane".into();

    assert_matches!(
        locate_project(&geocoder(&base, "test-key"), input).await,
        Err(ClientError::Geocoding(GeocodingError::NoResults(_)))
    );
}

#[tokio::test]
async fn geocode_denied_is_service_error() {
    let base = stub_services().await;

    assert_matches!(
        geocoder(&base, "wrong-key").geocode("100 N Garfield Ave").await,
        Err(GeocodingError::Service { ref status, .. }) if status == "REQUEST_DENIED"
    );
}

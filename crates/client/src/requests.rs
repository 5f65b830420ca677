//! Report and prediction requests.
//!
//! Each user action issues exactly one request; there is no retry. A
//! [`RequestSlot`] tracks the state the dashboard renders and makes sure
//! that when requests overlap, only the most recently issued one lands.

use chrono::NaiveDateTime;
use civic_core::project::validate_date_range;
use civic_core::types::{CalendarDate, LatLng};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Wire format of [`PredictionRequest::timestamp`].
pub const PREDICTION_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

// ---------------------------------------------------------------------------
// Request slot
// ---------------------------------------------------------------------------

/// What the dashboard shows for one kind of request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestState<T> {
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

/// Handle for one issued request. Only the newest ticket can complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug)]
pub struct RequestSlot<T> {
    state: RequestState<T>,
    issued: u64,
}

impl<T> Default for RequestSlot<T> {
    fn default() -> Self {
        Self {
            state: RequestState::Idle,
            issued: 0,
        }
    }
}

impl<T> RequestSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter the loading state and issue a ticket for the new request.
    pub fn begin(&mut self) -> Ticket {
        self.issued += 1;
        self.state = RequestState::Loading;
        Ticket(self.issued)
    }

    /// Record the outcome of the request behind `ticket`.
    ///
    /// Returns `false`, leaving the state untouched, when a newer request
    /// has been issued since.
    pub fn finish(&mut self, ticket: Ticket, result: ClientResult<T>) -> bool {
        if ticket.0 != self.issued {
            tracing::debug!(ticket = ticket.0, latest = self.issued, "Dropping stale response");
            return false;
        }
        self.state = match result {
            Ok(value) => RequestState::Ready(value),
            Err(e) => {
                tracing::warn!(error = %e, "Request failed");
                RequestState::Failed(e.to_string())
            }
        };
        true
    }

    pub fn state(&self) -> &RequestState<T> {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, RequestState::Loading)
    }

    pub fn value(&self) -> Option<&T> {
        match &self.state {
            RequestState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            RequestState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    Traffic,
    Parking,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: CalendarDate,
    pub end: CalendarDate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub report_type: ReportType,
    /// Output format understood by the generator, e.g. `"pdf"`.
    pub format: String,
    pub date_range: DateRange,
    /// Location name, or `"all"`.
    pub location: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ReportSummary {
    #[serde(default)]
    pub total_records: u64,
    #[serde(default)]
    pub unique_roads: u64,
    #[serde(default)]
    pub average_traffic_level: f64,
    #[serde(default)]
    pub peak_traffic_percentage: f64,
}

/// Generator reply. Every part is optional; an `error` means failure even
/// when the HTTP status was 200.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ReportResponse {
    #[serde(default)]
    pub summary: Option<ReportSummary>,
    #[serde(default)]
    pub report_url: Option<String>,
    /// Generated report text.
    #[serde(default)]
    pub report: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReportRequester {
    client: reqwest::Client,
    endpoint: String,
}

impl ReportRequester {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn from_config(client: reqwest::Client, config: &ClientConfig) -> Self {
        Self::new(client, config.report_endpoint.clone())
    }

    /// POST the request to the generator. Inverted date ranges are rejected
    /// without a network call.
    pub async fn generate(&self, request: &ReportRequest) -> ClientResult<ReportResponse> {
        validate_date_range(request.date_range.start, request.date_range.end)?;

        let response = self.client.post(&self.endpoint).json(request).send().await?;
        let status = response.status().as_u16();
        let body: ReportResponse = parse_response(response).await?;

        if let Some(message) = body.error {
            return Err(ClientError::Api { status, message });
        }
        tracing::info!(
            report_type = ?request.report_type,
            has_url = body.report_url.is_some(),
            "Report generated"
        );
        Ok(body)
    }
}

// ---------------------------------------------------------------------------
// Predictions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRequest {
    /// `YYYY-MM-DD HH:MM`.
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
}

impl PredictionRequest {
    pub fn at(when: NaiveDateTime, district: Option<String>) -> Self {
        Self {
            timestamp: when.format(PREDICTION_TIMESTAMP_FORMAT).to_string(),
            district,
        }
    }
}

/// Predicted congestion along one road.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Prediction {
    #[serde(default)]
    pub road: Option<String>,
    /// 1 (free flowing) to 5 (gridlock).
    pub level: u8,
    /// `[lat, lng]` pairs.
    pub path: Vec<[f64; 2]>,
}

impl Prediction {
    pub fn path_points(&self) -> Vec<LatLng> {
        self.path.iter().map(|[lat, lng]| LatLng::new(*lat, *lng)).collect()
    }
}

/// The predictor answers with either a bare list or a wrapped one.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PredictionsBody {
    Bare(Vec<Prediction>),
    Wrapped { predictions: Vec<Prediction> },
}

#[derive(Debug, Clone)]
pub struct PredictionRequester {
    client: reqwest::Client,
    endpoint: String,
}

impl PredictionRequester {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn from_config(client: reqwest::Client, config: &ClientConfig) -> Self {
        Self::new(client, config.prediction_endpoint.clone())
    }

    pub async fn predict(&self, request: &PredictionRequest) -> ClientResult<Vec<Prediction>> {
        let response = self.client.post(&self.endpoint).json(request).send().await?;
        let body: PredictionsBody = parse_response(response).await?;
        let predictions = match body {
            PredictionsBody::Bare(list) => list,
            PredictionsBody::Wrapped { predictions } => predictions,
        };
        tracing::info!(count = predictions.len(), timestamp = %request.timestamp, "Predictions received");
        Ok(predictions)
    }
}

async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(ClientError::Api {
            status: status.as_u16(),
            message,
        });
    }
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ClientError::MalformedResponse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::NaiveDate;

    #[test]
    fn slot_starts_idle() {
        let slot: RequestSlot<u32> = RequestSlot::new();
        assert_eq!(slot.state(), &RequestState::Idle);
        assert!(slot.value().is_none());
    }

    #[test]
    fn slot_records_success_and_failure() {
        let mut slot = RequestSlot::new();
        let ticket = slot.begin();
        assert!(slot.is_loading());
        assert!(slot.finish(ticket, Ok(7)));
        assert_eq!(slot.value(), Some(&7));

        let ticket = slot.begin();
        assert!(slot.finish(ticket, Err(ClientError::MalformedResponse("eof".into()))));
        assert_eq!(slot.error(), Some("Malformed response: eof"));
    }

    #[test]
    fn latest_issued_request_wins() {
        let mut slot = RequestSlot::new();
        let first = slot.begin();
        let second = slot.begin();

        assert!(slot.finish(second, Ok("second")));
        assert!(!slot.finish(first, Ok("first")));
        assert_eq!(slot.value(), Some(&"second"));
    }

    #[test]
    fn stale_response_does_not_end_loading() {
        let mut slot: RequestSlot<&str> = RequestSlot::new();
        let first = slot.begin();
        let _second = slot.begin();

        assert!(!slot.finish(first, Ok("first")));
        assert!(slot.is_loading());
    }

    #[test]
    fn report_request_uses_camel_case() {
        let request = ReportRequest {
            report_type: ReportType::Parking,
            format: "pdf".into(),
            date_range: DateRange {
                start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                end: NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
            },
            location: "all".into(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "reportType": "parking",
                "format": "pdf",
                "dateRange": { "start": "2025-01-01", "end": "2025-01-31" },
                "location": "all"
            })
        );
    }

    #[tokio::test]
    async fn inverted_report_range_is_rejected_locally() {
        let requester = ReportRequester::new(reqwest::Client::new(), "http://127.0.0.1:9/unreachable");
        let request = ReportRequest {
            report_type: ReportType::Traffic,
            format: "pdf".into(),
            date_range: DateRange {
                start: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
                end: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            },
            location: "all".into(),
        };
        assert_matches!(requester.generate(&request).await, Err(ClientError::Validation(_)));
    }

    #[test]
    fn report_response_fields_are_optional() {
        let body: ReportResponse = serde_json::from_str(r#"{"report": "All clear"}"#).unwrap();
        assert_eq!(body.report.as_deref(), Some("All clear"));
        assert!(body.summary.is_none());
        assert!(body.error.is_none());
    }

    #[test]
    fn prediction_timestamp_format() {
        let when = NaiveDate::from_ymd_opt(2025, 7, 4)
            .unwrap()
            .and_hms_opt(8, 5, 0)
            .unwrap();
        let request = PredictionRequest::at(when, None);
        assert_eq!(request.timestamp, "2025-07-04 08:05");
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({ "timestamp": "2025-07-04 08:05" })
        );
    }

    #[test]
    fn predictions_accept_both_shapes() {
        let bare: PredictionsBody =
            serde_json::from_str(r#"[{"level": 2, "path": [[34.1, -118.1], [34.2, -118.2]]}]"#)
                .unwrap();
        let wrapped: PredictionsBody = serde_json::from_str(
            r#"{"predictions": [{"road": "I-210", "level": 5, "path": [[34.1, -118.1]]}]}"#,
        )
        .unwrap();

        assert_matches!(bare, PredictionsBody::Bare(list) if list.len() == 1 && list[0].road.is_none());
        assert_matches!(
            wrapped,
            PredictionsBody::Wrapped { predictions } if predictions[0].road.as_deref() == Some("I-210")
        );
    }

    #[test]
    fn prediction_path_converts_to_points() {
        let prediction = Prediction {
            road: None,
            level: 3,
            path: vec![[34.1, -118.1], [34.2, -118.2]],
        };
        assert_eq!(
            prediction.path_points(),
            vec![LatLng::new(34.1, -118.1), LatLng::new(34.2, -118.2)]
        );
    }
}

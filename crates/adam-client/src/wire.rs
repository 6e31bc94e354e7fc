//! JSON bodies exchanged with the scoring API and their decoding.

use crate::error::ClientError;
use adam_capture::CapturedImage;
use adam_core::catalog::ModelInfo;
use adam_core::{AnalysisResult, CompareResult, Measurements, ModelResult};
use chrono::{DateTime, NaiveDateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `POST /api/v1/analyze`
#[derive(Debug, Serialize)]
pub struct AnalyzeRequest<'a> {
    pub front_image: &'a CapturedImage,
    pub side_image: &'a CapturedImage,
    pub model: &'a str,
}

/// `POST /api/v1/analyze/quick`
#[derive(Debug, Serialize)]
pub struct QuickAnalyzeRequest<'a> {
    pub front_image: &'a CapturedImage,
    pub model: &'a str,
}

/// `POST /api/v1/analyze/compare`. A missing side image is sent as `null`.
#[derive(Debug, Serialize)]
pub struct CompareRequest<'a> {
    pub front_image: &'a CapturedImage,
    pub side_image: Option<&'a CapturedImage>,
}

/// A decoded single-analysis answer.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResponse {
    pub data: AnalysisResult,
    pub timestamp: Option<DateTime<Utc>>,
}

/// A decoded comparison answer, measurements already shared.
#[derive(Debug, Clone, PartialEq)]
pub struct CompareResponse {
    pub result: CompareResult,
    pub timestamp: Option<DateTime<Utc>>,
}

/// `GET /api/v1/health`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    #[serde(default)]
    pub services: IndexMap<String, String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

#[derive(Deserialize)]
struct RawAnalysis {
    success: Option<bool>,
    data: Option<AnalysisResult>,
    timestamp: Option<String>,
    #[serde(flatten)]
    rest: IndexMap<String, Value>,
}

#[derive(Deserialize)]
struct RawCompare {
    success: Option<bool>,
    measurements: Option<Measurements>,
    model_results: Option<IndexMap<String, ModelResult>>,
    timestamp: Option<String>,
    #[serde(flatten)]
    rest: IndexMap<String, Value>,
}

#[derive(Deserialize)]
struct ModelsBody {
    models: Vec<ModelInfo>,
}

fn decode<'de, T: Deserialize<'de>>(body: &'de str) -> Result<T, ClientError> {
    serde_json::from_str(body).map_err(|e| ClientError::Payload(format!("invalid JSON: {e}")))
}

/// Check the `success` flag; a `false` carries the service's own reason.
fn check_success(success: Option<bool>, rest: &IndexMap<String, Value>) -> Result<(), ClientError> {
    match success {
        Some(true) => Ok(()),
        Some(false) => {
            let reason = error_detail(rest)
                .map(|(code, message)| match code {
                    Some(code) => format!("{code}: {message}"),
                    None => message,
                })
                .unwrap_or_else(|| "no reason given".to_string());
            Err(ClientError::Payload(format!("service reported failure: {reason}")))
        }
        None => Err(ClientError::Payload("missing success flag".to_string())),
    }
}

/// Decode a 2xx body from `/analyze` or `/analyze/quick`.
pub fn parse_analysis(body: &str) -> Result<AnalysisResponse, ClientError> {
    let raw: RawAnalysis = decode(body)?;
    check_success(raw.success, &raw.rest)?;
    let data = raw
        .data
        .ok_or_else(|| ClientError::Payload("missing data".to_string()))?;
    Ok(AnalysisResponse {
        data,
        timestamp: raw.timestamp.as_deref().and_then(parse_timestamp),
    })
}

/// Decode a 2xx body from `/analyze/compare`.
pub fn parse_compare(body: &str) -> Result<CompareResponse, ClientError> {
    let raw: RawCompare = decode(body)?;
    check_success(raw.success, &raw.rest)?;
    let measurements = raw
        .measurements
        .ok_or_else(|| ClientError::Payload("missing measurements".to_string()))?;
    let model_results = raw
        .model_results
        .ok_or_else(|| ClientError::Payload("missing model_results".to_string()))?;

    let mut result = CompareResult {
        measurements,
        model_results,
    };
    result.share_measurements();
    Ok(CompareResponse {
        result,
        timestamp: raw.timestamp.as_deref().and_then(parse_timestamp),
    })
}

pub fn parse_health(body: &str) -> Result<HealthStatus, ClientError> {
    decode(body)
}

pub fn parse_models(body: &str) -> Result<Vec<ModelInfo>, ClientError> {
    decode::<ModelsBody>(body).map(|b| b.models)
}

/// Build the error for a non-2xx answer from its status and body.
pub fn status_error(status: u16, reason: Option<&str>, body: &str) -> ClientError {
    let fields: IndexMap<String, Value> = serde_json::from_str(body).unwrap_or_default();
    let (code, message) = error_detail(&fields).unwrap_or_else(|| {
        let text = body.trim();
        let message = if text.is_empty() {
            reason.unwrap_or("no response body").to_string()
        } else {
            truncate(text, 200)
        };
        (None, message)
    });
    ClientError::Status {
        status,
        code,
        message,
    }
}

/// Pull `(code, message)` out of `{error: {...}}` or `{detail: ...}`.
///
/// `detail` may also be a bare string or a list of validation errors.
fn error_detail(fields: &IndexMap<String, Value>) -> Option<(Option<String>, String)> {
    let value = fields.get("error").or_else(|| fields.get("detail"))?;
    match value {
        Value::String(message) => Some((None, message.clone())),
        Value::Object(obj) => {
            let code = obj.get("code").and_then(Value::as_str).map(str::to_string);
            let message = obj
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| value.to_string());
            Some((code, message))
        }
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            let message = if messages.is_empty() {
                value.to_string()
            } else {
                messages.join("; ")
            };
            Some((None, message))
        }
        other => Some((None, other.to_string())),
    }
}

/// Service timestamps are ISO-8601, with or without an offset (naive ones
/// are UTC).
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc));
    }
    match NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        Ok(naive) => Some(naive.and_utc()),
        Err(e) => {
            tracing::debug!(timestamp = s, error = %e, "ignoring unparseable timestamp");
            None
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adam_core::mock;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    fn analysis_json() -> Value {
        serde_json::to_value(mock::mock_analysis()).unwrap()
    }

    #[test]
    fn test_request_bodies_use_contract_field_names() {
        let image = CapturedImage::from_bytes(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]).unwrap();

        let body = serde_json::to_value(AnalyzeRequest {
            front_image: &image,
            side_image: &image,
            model: "gemini-1.5-pro",
        })
        .unwrap();
        assert_eq!(
            body,
            json!({
                "front_image": "data:image/png;base64,iVBORw0KGgo=",
                "side_image": "data:image/png;base64,iVBORw0KGgo=",
                "model": "gemini-1.5-pro",
            })
        );

        let body = serde_json::to_value(CompareRequest {
            front_image: &image,
            side_image: None,
        })
        .unwrap();
        assert_eq!(body["side_image"], Value::Null);
    }

    #[test]
    fn test_parse_analysis_success() {
        let body = json!({
            "success": true,
            "data": analysis_json(),
            "timestamp": "2024-05-01T12:30:00.123456",
        })
        .to_string();
        let resp = parse_analysis(&body).unwrap();
        assert_eq!(resp.data.score, 7.5);
        let ts = resp.timestamp.unwrap();
        assert_eq!((ts.year(), ts.month(), ts.hour(), ts.minute()), (2024, 5, 12, 30));
    }

    #[test]
    fn test_parse_analysis_requires_success_flag() {
        let body = json!({ "data": analysis_json() }).to_string();
        assert_eq!(
            parse_analysis(&body),
            Err(ClientError::Payload("missing success flag".into()))
        );
    }

    #[test]
    fn test_parse_analysis_false_success_carries_reason() {
        let body = json!({
            "success": false,
            "error": { "code": "ANALYSIS_ERROR", "message": "model overloaded" },
        })
        .to_string();
        let err = parse_analysis(&body).unwrap_err();
        assert_eq!(
            err,
            ClientError::Payload("service reported failure: ANALYSIS_ERROR: model overloaded".into())
        );
    }

    #[test]
    fn test_parse_analysis_rejects_malformed_data() {
        let body = json!({ "success": true, "data": { "score": "high" } }).to_string();
        assert!(matches!(parse_analysis(&body), Err(ClientError::Payload(_))));
        assert!(matches!(parse_analysis("<html>"), Err(ClientError::Payload(_))));
        let body = json!({ "success": true }).to_string();
        assert_eq!(parse_analysis(&body), Err(ClientError::Payload("missing data".into())));
    }

    #[test]
    fn test_parse_compare_preserves_order_and_shares_measurements() {
        let shared = serde_json::to_value(mock::mock_measurements()).unwrap();
        let mut drifted = analysis_json();
        drifted["measurements"]["gonial_angle"] = json!(99.0);
        let body = json!({
            "success": true,
            "measurements": shared,
            "model_results": {
                "gemini-2.0-flash": { "success": true, "data": drifted, "time_seconds": 1.2 },
                "gemini-1.5-pro": { "success": false, "error": "quota exceeded" },
            },
            "timestamp": "2024-05-01T12:30:00Z",
        })
        .to_string();

        let resp = parse_compare(&body).unwrap();
        let keys: Vec<&str> = resp.result.model_results.keys().map(String::as_str).collect();
        assert_eq!(keys, ["gemini-2.0-flash", "gemini-1.5-pro"]);
        let flash = resp.result.model_results["gemini-2.0-flash"].data.as_ref().unwrap();
        assert_eq!(flash.measurements, resp.result.measurements);
        assert!(resp.timestamp.is_some());
    }

    #[test]
    fn test_parse_compare_requires_measurements() {
        let body = json!({ "success": true, "model_results": {} }).to_string();
        assert_eq!(
            parse_compare(&body),
            Err(ClientError::Payload("missing measurements".into()))
        );
    }

    #[test]
    fn test_status_error_reads_both_envelopes() {
        let body = json!({ "error": { "code": "BAD_IMAGE", "message": "corrupt" } }).to_string();
        assert_eq!(
            status_error(400, Some("Bad Request"), &body),
            ClientError::Status {
                status: 400,
                code: Some("BAD_IMAGE".into()),
                message: "corrupt".into()
            }
        );

        let body = json!({ "detail": { "code": "FACE_NOT_DETECTED", "message": "no face" } }).to_string();
        assert_eq!(status_error(400, None, &body).code(), Some("FACE_NOT_DETECTED"));

        let body = json!({ "detail": [{ "loc": ["body", "front_image"], "msg": "field required" }] }).to_string();
        assert_eq!(
            status_error(422, None, &body),
            ClientError::Status {
                status: 422,
                code: None,
                message: "field required".into()
            }
        );
    }

    #[test]
    fn test_status_error_without_json_body() {
        assert_eq!(
            status_error(502, Some("Bad Gateway"), ""),
            ClientError::Status {
                status: 502,
                code: None,
                message: "Bad Gateway".into()
            }
        );
        let err = status_error(500, None, "Internal Server Error");
        assert!(err.to_string().ends_with("Internal Server Error"));
    }

    #[test]
    fn test_parse_health_and_models() {
        let health = parse_health(r#"{"status":"healthy","version":"1.0.0","services":{"mediapipe":"ok","llm":"ok"}}"#).unwrap();
        assert!(health.is_healthy());
        assert_eq!(health.services.len(), 2);

        let health = parse_health(r#"{"status":"degraded","version":"1.0.0"}"#).unwrap();
        assert!(!health.is_healthy());
        assert!(health.services.is_empty());

        let models = parse_models(r#"{"models":[{"id":"gemini-2.0-flash","name":"Gemini 2.0 Flash","description":"fast"}]}"#).unwrap();
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].id, "gemini-2.0-flash");
    }

    #[test]
    fn test_parse_timestamp_forms() {
        assert!(parse_timestamp("2024-05-01T12:30:00+02:00").is_some());
        assert!(parse_timestamp("2024-05-01T12:30:00").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }
}

//! HTTP handlers.
//!
//! Endpoints:
//! - GET  /health         - liveness and model mode
//! - POST /predict        - score one patient
//! - POST /batch_predict  - score `{"patients": [...]}`, one entry per patient

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use super::error::ApiError;
use super::AppState;
use crate::domain::{PatientRecord, RiskAssessment};
use crate::ports::RiskModel;
use crate::InsightError;

/// Score reported for a batch entry that could not be scored.
pub const FALLBACK_RISK_SCORE: f64 = 0.5;
/// Category reported for a batch entry that could not be scored.
pub const FALLBACK_RISK_CATEGORY: &str = "Unknown";

const UNKNOWN_PATIENT: &str = "unknown";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub demo_mode: bool,
}

/// A scored batch entry: the assessment with the echoed id.
#[derive(Debug, Serialize)]
pub struct ScoredEntry {
    pub patient_id: String,
    #[serde(flatten)]
    pub assessment: RiskAssessment,
}

/// Neutral fallback for a batch entry that failed validation.
#[derive(Debug, Serialize)]
pub struct FailedEntry {
    pub patient_id: String,
    pub error: String,
    pub risk_score: f64,
    pub risk_category: &'static str,
}

/// One entry of a batch response.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BatchEntry {
    Scored(ScoredEntry),
    Failed(FailedEntry),
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub predictions: Vec<BatchEntry>,
    pub total_patients: usize,
    pub timestamp: DateTime<Utc>,
}

pub(super) async fn health<M: RiskModel + 'static>(
    State(state): State<AppState<M>>,
) -> Json<HealthResponse> {
    let model = state.service.model();
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now(),
        version: model.model_version().to_string(),
        demo_mode: model.is_demo_mode(),
    })
}

pub(super) async fn predict<M: RiskModel + 'static>(
    State(state): State<AppState<M>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<RiskAssessment>, ApiError> {
    let Ok(Json(Value::Object(fields))) = payload else {
        return Err(ApiError::BadRequest("No JSON data provided".to_string()));
    };
    if fields.is_empty() {
        return Err(ApiError::BadRequest("No JSON data provided".to_string()));
    }

    let (_, record) = parse_patient(fields)?;
    let assessment = state.service.assess(&record)?;
    tracing::info!("Prediction made: {}", assessment.risk_category);
    Ok(Json(assessment))
}

pub(super) async fn batch_predict<M: RiskModel + 'static>(
    State(state): State<AppState<M>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<BatchResponse>, ApiError> {
    let patients = match payload {
        Ok(Json(Value::Object(mut body))) => match body.remove("patients") {
            Some(Value::Array(patients)) => patients,
            _ => return Err(ApiError::BadRequest("No patients data provided".to_string())),
        },
        _ => return Err(ApiError::BadRequest("No patients data provided".to_string())),
    };

    if patients.len() > state.config.max_batch {
        return Err(ApiError::BadRequest(format!(
            "Batch of {} patients exceeds limit of {}",
            patients.len(),
            state.config.max_batch
        )));
    }

    let predictions: Vec<BatchEntry> = patients
        .into_iter()
        .map(|patient| score_entry(&state, patient))
        .collect();

    let failed = predictions
        .iter()
        .filter(|p| matches!(p, BatchEntry::Failed(_)))
        .count();
    tracing::info!(
        "Batch prediction: {} patients, {} failed",
        predictions.len(),
        failed
    );

    Ok(Json(BatchResponse {
        total_patients: predictions.len(),
        predictions,
        timestamp: Utc::now(),
    }))
}

fn score_entry<M: RiskModel>(state: &AppState<M>, patient: Value) -> BatchEntry {
    let fields = match patient {
        Value::Object(fields) => fields,
        _ => {
            return failed(
                UNKNOWN_PATIENT.to_string(),
                "Patient entry must be a JSON object".to_string(),
            )
        }
    };

    match parse_patient(fields) {
        Ok((patient_id, record)) => match state.service.assess(&record) {
            Ok(assessment) => BatchEntry::Scored(ScoredEntry {
                patient_id,
                assessment,
            }),
            Err(e) => failed(patient_id, e.to_string()),
        },
        Err((patient_id, e)) => failed(patient_id, e.to_string()),
    }
}

fn failed(patient_id: String, error: String) -> BatchEntry {
    BatchEntry::Failed(FailedEntry {
        patient_id,
        error,
        risk_score: FALLBACK_RISK_SCORE,
        risk_category: FALLBACK_RISK_CATEGORY,
    })
}

/// Split out the echoed identifier and decode the rest as a record.
///
/// String and numeric ids are echoed as text; anything else is "unknown".
fn parse_patient(
    mut fields: Map<String, Value>,
) -> Result<(String, PatientRecord), (String, InsightError)> {
    let patient_id = match fields.remove("patient_id") {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };
    let echo = patient_id
        .clone()
        .unwrap_or_else(|| UNKNOWN_PATIENT.to_string());

    match serde_json::from_value::<PatientRecord>(Value::Object(fields)) {
        Ok(mut record) => {
            record.patient_id = patient_id;
            Ok((echo, record))
        }
        Err(e) => Err((echo, InsightError::Validation(e.to_string()))),
    }
}

impl From<(String, InsightError)> for ApiError {
    fn from((_, e): (String, InsightError)) -> Self {
        ApiError::Insight(e)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use serde_json::json;
    use tower::ServiceExt;

    use crate::adapters::composite::CompositeRiskModel;
    use crate::application::AssessmentService;
    use crate::server::{router, ServerConfig};

    fn app() -> Router {
        app_with(ServerConfig::default())
    }

    fn app_with(config: ServerConfig) -> Router {
        let service = Arc::new(AssessmentService::new(Arc::new(CompositeRiskModel::new())));
        router(service, config)
    }

    async fn post(app: Router, uri: &str, body: String) -> (StatusCode, serde_json::Value) {
        let resp = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .expect("Should build request"),
            )
            .await
            .expect("Should get response");
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("Should read body");
        let value = serde_json::from_slice(&bytes).expect("Should be JSON");
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let resp = app()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("Should build request"),
            )
            .await
            .expect("Should get response");
        assert_eq!(resp.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("Should read body");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("Should be JSON");
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["version"], "1.0");
        assert_eq!(body["demo_mode"], true);
    }

    #[tokio::test]
    async fn test_predict_scores_patient() {
        let body = json!({
            "phq9_score": 22,
            "gad7_score": 18,
            "age": 50,
            "employment": "Disabled",
            "education": "Other"
        });
        let (status, value) = post(app(), "/predict", body.to_string()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["risk_category"], "High Risk");
        assert_eq!(value["confidence"], 0.85);
        assert_eq!(value["model_version"], "1.0");
        let score = value["risk_score"].as_f64().expect("Should have score");
        assert!((score - 0.793).abs() < 1e-3);
        assert_eq!(
            value["recommendations"].as_array().map(Vec::len),
            Some(5)
        );
    }

    #[tokio::test]
    async fn test_predict_missing_field() {
        let (status, value) = post(app(), "/predict", json!({"gad7_score": 5}).to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["code"], 400);
        let error = value["error"].as_str().expect("Should have message");
        assert!(error.contains("phq9_score"));
    }

    #[tokio::test]
    async fn test_predict_rejects_out_of_range() {
        let (status, _) = post(
            app(),
            "/predict",
            json!({"phq9_score": 28, "gad7_score": 5}).to_string(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_predict_without_body() {
        let (status, value) = post(app(), "/predict", String::new()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["error"], "No JSON data provided");
    }

    #[tokio::test]
    async fn test_batch_predict_echoes_ids_and_falls_back() {
        let body = json!({
            "patients": [
                {"patient_id": "A-1", "phq9_score": 4, "gad7_score": 3, "age": 30},
                {"patient_id": 17, "gad7_score": 3},
                {"phq9_score": 20, "gad7_score": 15}
            ]
        });
        let (status, value) = post(app(), "/batch_predict", body.to_string()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["total_patients"], 3);
        let predictions = value["predictions"].as_array().expect("Should be array");

        assert_eq!(predictions[0]["patient_id"], "A-1");
        assert_eq!(predictions[0]["risk_category"], "Low Risk");

        assert_eq!(predictions[1]["patient_id"], "17");
        assert_eq!(predictions[1]["risk_category"], "Unknown");
        assert_eq!(predictions[1]["risk_score"], 0.5);
        assert!(predictions[1]["error"]
            .as_str()
            .expect("Should carry error")
            .contains("phq9_score"));

        assert_eq!(predictions[2]["patient_id"], "unknown");
        assert!(predictions[2]["risk_score"].as_f64().is_some());
    }

    #[tokio::test]
    async fn test_batch_predict_requires_patients() {
        let (status, value) = post(app(), "/batch_predict", json!({}).to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["error"], "No patients data provided");
    }

    #[tokio::test]
    async fn test_batch_predict_enforces_limit() {
        let config = ServerConfig {
            max_batch: 1,
            ..ServerConfig::default()
        };
        let body = json!({
            "patients": [
                {"phq9_score": 1, "gad7_score": 1},
                {"phq9_score": 2, "gad7_score": 2}
            ]
        });
        let (status, _) = post(app_with(config), "/batch_predict", body.to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

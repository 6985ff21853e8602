use api_rest::{router, AppState};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use biopanel_core::{CoreConfig, MetricKind, Panels, PatientService};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

fn app() -> (Router, Panels) {
    let panels = Panels::seeded(&CoreConfig::default());
    let app = router(AppState::new(PatientService::new(), panels.clone()));
    (app, panels)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn health_reports_ok() {
    let (app, _) = app();
    let (status, body) = get(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn lists_demo_patients() {
    let (app, _) = app();
    let (status, body) = get(app, "/api/patients").await;
    assert_eq!(status, StatusCode::OK);

    let patients = body.as_array().unwrap();
    assert_eq!(patients.len(), 5);
    assert_eq!(patients[0]["name"], "Alex Johnson");
    assert_eq!(patients[0]["dateOfBirth"], "1988-02-14");
    assert_eq!(patients[0]["lastVisit"], "2025-11-02");
}

#[tokio::test]
async fn get_patient_returns_404_when_unknown() {
    let (app, _) = app();
    let (status, body) = get(app.clone(), "/api/patients/2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Priya Desai");

    let (status, _) = get(app, "/api/patients/99").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn biomarkers_use_client_json_shape() {
    let (app, _) = app();
    let (status, body) = get(app, "/api/patients/1/biomarkers").await;
    assert_eq!(status, StatusCode::OK);

    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 15);

    let glucose = &records[0];
    assert_eq!(glucose["id"], 101);
    assert_eq!(glucose["patientId"], 1);
    assert_eq!(glucose["name"], "Glucose (fasting)");
    assert_eq!(glucose["value"], 84.5);
    assert_eq!(glucose["unit"], "mg/dL");
    assert_eq!(glucose["category"], "metabolic");
    assert_eq!(glucose["referenceRange"]["min"], 70.0);
    assert_eq!(glucose["referenceRange"]["max"], 99.0);
    assert_eq!(glucose["measuredAt"], "2025-11-02T09:00:00Z");
    assert_eq!(glucose["status"], "normal");
    assert_eq!(glucose.as_object().unwrap().len(), 9);
}

#[tokio::test]
async fn category_query_is_case_insensitive() {
    let (app, _) = app();
    let (status, body) = get(app, "/api/patients/1/biomarkers?category=Metabolic").await;
    assert_eq!(status, StatusCode::OK);

    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 5);
    assert!(records.iter().all(|r| r["category"] == "metabolic"));
}

#[tokio::test]
async fn empty_category_query_returns_everything() {
    let (app, _) = app();
    let (_, body) = get(app, "/api/patients/1/biotrackers?category=").await;
    assert_eq!(body.as_array().unwrap().len(), 15);
}

#[tokio::test]
async fn unknown_patient_or_category_is_empty_array() {
    let (app, _) = app();
    let (status, body) = get(app.clone(), "/api/patients/42/biomarkers").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Array(vec![]));

    let (status, body) = get(app, "/api/patients/1/biotrackers?category=renal").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Array(vec![]));
}

#[tokio::test]
async fn non_integer_patient_id_is_bad_request() {
    let (app, _) = app();
    let (status, _) = get(app.clone(), "/api/patients/abc/biomarkers").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(app, "/api/patients/1.5").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn biomarker_and_biotracker_routes_read_separate_panels() {
    let (app, panels) = app();
    let at = chrono::DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
        .unwrap()
        .with_timezone(&chrono::Utc);
    panels
        .repository(MetricKind::Biomarker)
        .update_value(101, 120.0, at)
        .unwrap();

    let (_, markers) = get(app.clone(), "/api/patients/1/biomarkers").await;
    assert_eq!(markers[0]["value"], 120.0);
    assert_eq!(markers[0]["status"], "high");
    assert_eq!(markers[0]["measuredAt"], "2025-01-01T00:00:00Z");

    let (_, trackers) = get(app, "/api/patients/1/biotrackers").await;
    assert_eq!(trackers[0]["value"], 84.5);
    assert_eq!(trackers[0]["status"], "normal");
}

#[tokio::test]
async fn serves_openapi_document() {
    let (app, _) = app();
    let (status, body) = get(app, "/api-docs/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/patients/{id}/biomarkers"].is_object());
}

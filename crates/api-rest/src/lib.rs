//! # API REST
//!
//! REST API implementation for MedTrack.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, status codes)
//!
//! All medication logic lives in `medtrack-core`; handlers translate between JSON bodies and
//! [`MedicationService`] calls.

#![warn(rust_2018_idioms)]

pub mod dto;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use std::sync::{Arc, Mutex, MutexGuard};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use dto::{
    AddMedicationReq, DosesRes, ErrorRes, HealthRes, ListMedicationsRes, MedicationRes,
    ProgressRes, UpcomingDoseRes, UpcomingParams,
};
use medtrack_core::{MedicationError, MedicationId, MedicationService, DEFAULT_UPCOMING_LIMIT};

/// Application state shared across REST API handlers.
///
/// One service per process; each handler holds the lock for a single operation.
#[derive(Clone)]
pub struct AppState {
    service: Arc<Mutex<MedicationService>>,
}

impl AppState {
    pub fn new(service: MedicationService) -> Self {
        Self {
            service: Arc::new(Mutex::new(service)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, MedicationService>, ApiError> {
        self.service.lock().map_err(|_| {
            tracing::error!("medication service lock poisoned");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
        })
    }
}

type ApiError = (StatusCode, Json<ErrorRes>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorRes {
            error: message.into(),
        }),
    )
}

fn map_medication_error(e: MedicationError) -> ApiError {
    match e {
        MedicationError::InvalidInput(_) | MedicationError::Uuid(_) | MedicationError::Text(_) => {
            api_error(StatusCode::BAD_REQUEST, e.to_string())
        }
        e if e.is_not_found() => api_error(StatusCode::NOT_FOUND, e.to_string()),
        e => {
            tracing::error!("medication error: {:?}", e);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        list_medications,
        add_medication,
        mark_dose_taken,
        todays_progress,
        upcoming_doses,
        due_doses,
    ),
    components(schemas(
        HealthRes,
        ErrorRes,
        MedicationRes,
        ListMedicationsRes,
        AddMedicationReq,
        ProgressRes,
        UpcomingDoseRes,
        DosesRes,
    ))
)]
pub struct ApiDoc;

/// Builds the REST router with Swagger UI and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/medications", get(list_medications).post(add_medication))
        .route("/medications/:id/doses/:slot/taken", post(mark_dose_taken))
        .route("/progress", get(todays_progress))
        .route("/upcoming", get(upcoming_doses))
        .route("/due", get(due_doses))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds `addr` and serves the REST API until the process stops.
///
/// # Errors
/// Returns an error if the address cannot be bound or the server fails while running.
pub async fn serve(addr: &str, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("-- MedTrack REST API listening on {}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for monitoring and load balancers.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "MedTrack REST API is alive".into(),
    })
}

#[utoipa::path(
    get,
    path = "/medications",
    responses(
        (status = 200, description = "All medications with today's taken flags", body = ListMedicationsRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// List every medication in insertion order.
#[axum::debug_handler]
async fn list_medications(
    State(state): State<AppState>,
) -> Result<Json<ListMedicationsRes>, ApiError> {
    let service = state.lock()?;
    let medications = service.medications().iter().map(MedicationRes::from).collect();
    Ok(Json(ListMedicationsRes { medications }))
}

#[utoipa::path(
    post,
    path = "/medications",
    request_body = AddMedicationReq,
    responses(
        (status = 201, description = "Medication added", body = MedicationRes),
        (status = 400, description = "Validation failed", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Add a medication.
///
/// Blank rows in `times` are dropped; every remaining time must be `HH:MM`. The new record
/// starts with every dose slot untaken.
///
/// # Errors
/// Returns `400 Bad Request` if name, dosage or frequency is blank, no valid time remains, a
/// time is malformed, or the colour is not in the palette.
#[axum::debug_handler]
async fn add_medication(
    State(state): State<AppState>,
    Json(req): Json<AddMedicationReq>,
) -> Result<(StatusCode, Json<MedicationRes>), ApiError> {
    let mut service = state.lock()?;
    let medication = service
        .add_from_form(req.into())
        .map_err(map_medication_error)?;
    Ok((StatusCode::CREATED, Json(MedicationRes::from(&medication))))
}

#[utoipa::path(
    post,
    path = "/medications/{id}/doses/{slot}/taken",
    params(
        ("id" = String, Path, description = "Medication id (32 lowercase hex characters)"),
        ("slot" = usize, Path, description = "Dose slot index within the medication's times")
    ),
    responses(
        (status = 200, description = "Dose marked taken", body = MedicationRes),
        (status = 400, description = "Malformed medication id or slot", body = ErrorRes),
        (status = 404, description = "Unknown medication or slot", body = ErrorRes)
    )
)]
/// Mark one dose slot as taken. Repeating the call is harmless.
#[axum::debug_handler]
async fn mark_dose_taken(
    State(state): State<AppState>,
    Path((id, slot)): Path<(String, String)>,
) -> Result<Json<MedicationRes>, ApiError> {
    let id = MedicationId::parse(&id).map_err(|e| map_medication_error(e.into()))?;
    let slot: usize = slot.trim().parse().map_err(|_| {
        api_error(StatusCode::BAD_REQUEST, format!("invalid dose slot: '{}'", slot))
    })?;
    let mut service = state.lock()?;
    let medication = service
        .mark_medication_taken(id, slot)
        .map_err(map_medication_error)?;
    Ok(Json(MedicationRes::from(&medication)))
}

#[utoipa::path(
    get,
    path = "/progress",
    responses(
        (status = 200, description = "Today's adherence", body = ProgressRes)
    )
)]
/// Today's taken/total doses and the rounded percentage.
#[axum::debug_handler]
async fn todays_progress(State(state): State<AppState>) -> Result<Json<ProgressRes>, ApiError> {
    let service = state.lock()?;
    Ok(Json(service.todays_progress().into()))
}

#[utoipa::path(
    get,
    path = "/upcoming",
    params(UpcomingParams),
    responses(
        (status = 200, description = "Next untaken doses", body = DosesRes)
    )
)]
/// The next untaken doses in medication order.
#[axum::debug_handler]
async fn upcoming_doses(
    State(state): State<AppState>,
    Query(params): Query<UpcomingParams>,
) -> Result<Json<DosesRes>, ApiError> {
    let limit = params.limit.unwrap_or(DEFAULT_UPCOMING_LIMIT);
    let service = state.lock()?;
    let doses = service
        .upcoming_doses(limit)
        .into_iter()
        .map(UpcomingDoseRes::from)
        .collect();
    Ok(Json(DosesRes { doses }))
}

#[utoipa::path(
    get,
    path = "/due",
    responses(
        (status = 200, description = "Untaken doses whose hour has arrived (server local time)", body = DosesRes)
    )
)]
/// Untaken doses that are due now.
#[axum::debug_handler]
async fn due_doses(State(state): State<AppState>) -> Result<Json<DosesRes>, ApiError> {
    let now = chrono::Local::now().time();
    let service = state.lock()?;
    let doses = service
        .due_doses(now)
        .into_iter()
        .map(UpcomingDoseRes::from)
        .collect();
    Ok(Json(DosesRes { doses }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use medtrack_core::{MedicationTracker, UserId};
    use tower::ServiceExt;

    fn seeded_app() -> (AppState, Router) {
        let service =
            MedicationService::in_memory(UserId::new(), MedicationTracker::seeded().unwrap());
        let state = AppState::new(service);
        (state.clone(), router(state))
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (_, app) = seeded_app();
        let (status, body) = send(app, get_req("/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn test_progress_for_seed_data() {
        let (_, app) = seeded_app();
        let (status, body) = send(app, get_req("/progress")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            serde_json::json!({ "takenDoses": 3, "totalDoses": 6, "progressPercentage": 50 })
        );
    }

    #[tokio::test]
    async fn test_add_medication_filters_blank_times() {
        let (state, app) = seeded_app();
        let req = post_json(
            "/medications",
            serde_json::json!({
                "name": "TestDrug",
                "dosage": "10mg",
                "frequency": "Once daily",
                "times": ["09:00", ""],
            }),
        );

        let (status, body) = send(app, req).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["taken"], serde_json::json!([false]));
        assert_eq!(body["color"], "blue");

        let progress = state.lock().unwrap().todays_progress();
        assert_eq!(progress.total_doses, 7);
        assert_eq!(progress.taken_doses, 3);
    }

    #[tokio::test]
    async fn test_add_medication_rejects_invalid_time() {
        let (state, app) = seeded_app();
        let req = post_json(
            "/medications",
            serde_json::json!({
                "name": "TestDrug",
                "dosage": "10mg",
                "frequency": "Once daily",
                "times": ["9am"],
            }),
        );

        let (status, body) = send(app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("HH:MM"));
        assert_eq!(state.lock().unwrap().medications().len(), 5);
    }

    #[tokio::test]
    async fn test_mark_dose_taken_updates_record() {
        let (state, app) = seeded_app();
        let id = state.lock().unwrap().medications()[0].id();

        let (status, body) = send(
            app,
            post_json(&format!("/medications/{id}/doses/1/taken"), serde_json::Value::Null),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["taken"], serde_json::json!([true, true]));
        assert_eq!(state.lock().unwrap().todays_progress().taken_doses, 4);
    }

    #[tokio::test]
    async fn test_mark_dose_taken_unknown_id_is_404() {
        let (state, app) = seeded_app();
        let uri = format!("/medications/{}/doses/0/taken", MedicationId::new());

        let (status, _) = send(app, post_json(&uri, serde_json::Value::Null)).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(state.lock().unwrap().todays_progress().taken_doses, 3);
    }

    #[tokio::test]
    async fn test_mark_dose_taken_bad_slot_is_404() {
        let (state, app) = seeded_app();
        let id = state.lock().unwrap().medications()[1].id();

        let (status, _) = send(
            app,
            post_json(&format!("/medications/{id}/doses/5/taken"), serde_json::Value::Null),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_mark_dose_taken_malformed_id_is_400() {
        let (_, app) = seeded_app();
        let (status, _) = send(
            app,
            post_json("/medications/not-an-id/doses/0/taken", serde_json::Value::Null),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_mark_dose_taken_non_numeric_slot_is_json_400() {
        let (state, app) = seeded_app();
        let id = state.lock().unwrap().medications()[1].id();

        let (status, body) = send(
            app,
            post_json(&format!("/medications/{id}/doses/x/taken"), serde_json::Value::Null),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid dose slot: 'x'");
        assert_eq!(state.lock().unwrap().todays_progress().taken_doses, 3);
    }

    #[tokio::test]
    async fn test_upcoming_respects_limit() {
        let (_, app) = seeded_app();
        let (status, body) = send(app.clone(), get_req("/upcoming")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["doses"].as_array().unwrap().len(), 3);

        let (_, body) = send(app, get_req("/upcoming?limit=1")).await;
        let doses = body["doses"].as_array().unwrap();
        assert_eq!(doses.len(), 1);
        assert_eq!(doses[0]["name"], "Metformin");
        assert_eq!(doses[0]["slotIndex"], 1);
    }

    #[tokio::test]
    async fn test_list_medications_returns_seed() {
        let (_, app) = seeded_app();
        let (status, body) = send(app, get_req("/medications")).await;

        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = body["medications"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["name"].as_str().unwrap())
            .collect();
        assert_eq!(
            names,
            vec!["Metformin", "Lisinopril", "Atorvastatin", "Aspirin", "Vitamin D"]
        );
    }
}

//! # API REST
//!
//! REST API implementation for RDV.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, staff API key)
//!
//! Uses `api-shared` for wire types and `rdv-core` for all scheduling
//! decisions; nothing in this crate re-implements a business rule.

#![warn(rust_2018_idioms)]

pub mod error;

use axum::{
    extract::{Path as AxumPath, Query, State},
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::{get, post, put},
    Router,
};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use api_shared::wire;
use api_shared::HealthService;
use rdv_core::{
    Appointment, AppointmentFilter, AppointmentStatus, AppointmentType, BookingRequest,
    ContactInfo, ContactMessageStore, EmailAddress, NonEmptyText, SchedulingService,
};

use crate::error::{ApiError, ApiResult};

/// Application state shared across REST API handlers.
///
/// Holds the scheduling service, the contact message store and the staff API
/// key resolved at startup.
#[derive(Clone)]
pub struct AppState {
    service: SchedulingService,
    contact_store: ContactMessageStore,
    staff_api_key: Option<String>,
}

impl AppState {
    pub fn new(
        service: SchedulingService,
        contact_store: ContactMessageStore,
        staff_api_key: Option<String>,
    ) -> Self {
        Self {
            service,
            contact_store,
            staff_api_key,
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        available_slots,
        create_appointment,
        list_appointments,
        update_appointment_status,
        submit_contact_message,
    ),
    components(schemas(
        wire::HealthRes,
        wire::ErrorRes,
        wire::SlotRes,
        wire::AvailableSlotsRes,
        wire::CreateAppointmentReq,
        wire::AppointmentRes,
        wire::ListAppointmentsRes,
        wire::UpdateStatusReq,
        wire::ContactMessageReq,
        wire::ContactMessageRes,
    ))
)]
pub struct ApiDoc;

/// Builds the full application router, including Swagger UI and CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/available-slots", get(available_slots))
        .route("/api/appointments", post(create_appointment))
        .route("/api/appointments", get(list_appointments))
        .route(
            "/api/appointments/:id/status",
            put(update_appointment_status),
        )
        .route("/api/contact", post(submit_contact_message))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Checks the `x-api-key` header against the configured staff key.
fn require_staff_key(state: &AppState, headers: &HeaderMap) -> ApiResult<()> {
    let provided = headers.get("x-api-key").and_then(|v| v.to_str().ok());
    api_shared::auth::validate_api_key(provided, state.staff_api_key.as_deref())?;
    Ok(())
}

fn appointment_res(appointment: &Appointment) -> wire::AppointmentRes {
    wire::AppointmentRes {
        id: appointment.id.to_string(),
        appointment_type: appointment.appointment_type.to_string(),
        date: appointment.date.to_string(),
        time: rdv_core::slots::format_slot_time(appointment.time),
        status: appointment.status.to_string(),
        name: appointment.contact.name.to_string(),
        email: appointment.contact.email.to_string(),
        phone: appointment.contact.phone.clone(),
        subject: appointment.subject.clone(),
        notes: appointment.notes.clone(),
        created_at: appointment.created_at.to_rfc3339(),
        updated_at: appointment.updated_at.to_rfc3339(),
    }
}

fn parse_date(input: &str) -> ApiResult<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| ApiError::bad_request(format!("invalid date: {input} (expected YYYY-MM-DD)")))
}

fn parse_time(input: &str) -> ApiResult<NaiveTime> {
    NaiveTime::parse_from_str(input, "%H:%M")
        .map_err(|_| ApiError::bad_request(format!("invalid time: {input} (expected HH:MM)")))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = wire::HealthRes)
    )
)]
/// Health check endpoint for the REST API.
///
/// Used for monitoring and load balancer health checks.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<wire::HealthRes> {
    Json(HealthService::check_health())
}

#[derive(Deserialize)]
struct SlotsQuery {
    date: String,
    #[serde(rename = "type")]
    appointment_type: String,
}

#[utoipa::path(
    get,
    path = "/api/available-slots",
    params(
        ("date" = String, Query, description = "ISO-8601 calendar date"),
        ("type" = String, Query, description = "Appointment type: formation or livrables")
    ),
    responses(
        (status = 200, description = "Bookable slots, possibly empty", body = wire::AvailableSlotsRes),
        (status = 400, description = "Invalid date or type", body = wire::ErrorRes),
        (status = 503, description = "Appointment store unavailable", body = wire::ErrorRes)
    )
)]
/// Lists the free slots for a date and appointment type.
///
/// An empty `available_slots` array is a success response meaning "no
/// availability"; callers should render it as such, not as a failure.
#[axum::debug_handler]
async fn available_slots(
    State(state): State<AppState>,
    Query(query): Query<SlotsQuery>,
) -> ApiResult<Json<wire::AvailableSlotsRes>> {
    let date = parse_date(&query.date)?;
    let appointment_type: AppointmentType = query.appointment_type.parse()?;

    let slots = state.service.available_slots(date, appointment_type)?;
    Ok(Json(wire::AvailableSlotsRes {
        available_slots: slots
            .into_iter()
            .map(|slot| wire::SlotRes {
                time: rdv_core::slots::format_slot_time(slot.time),
                display: slot.display,
            })
            .collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/appointments",
    request_body = wire::CreateAppointmentReq,
    responses(
        (status = 201, description = "Appointment created in pending status", body = wire::AppointmentRes),
        (status = 400, description = "Invalid date, time, type or contact field", body = wire::ErrorRes),
        (status = 409, description = "Slot already taken", body = wire::ErrorRes),
        (status = 503, description = "Appointment store unavailable", body = wire::ErrorRes)
    )
)]
/// Creates a booking from a form submission.
///
/// The date and slot are re-validated and availability re-checked between
/// the client's slot query and this submission; losing that race yields a
/// 409 with `SlotTaken` semantics rather than a silent overwrite.
#[axum::debug_handler]
async fn create_appointment(
    State(state): State<AppState>,
    Json(req): Json<wire::CreateAppointmentReq>,
) -> ApiResult<(StatusCode, Json<wire::AppointmentRes>)> {
    let date = parse_date(&req.appointment_date)?;
    let time = parse_time(&req.appointment_time)?;
    let appointment_type: AppointmentType = req.appointment_type.parse()?;

    let name = NonEmptyText::new(&req.name)
        .map_err(|_| ApiError::bad_request("name must not be empty"))?;
    let email = EmailAddress::parse(&req.email)
        .map_err(|e| ApiError::bad_request(format!("invalid email: {e}")))?;

    let appointment = state.service.create_booking(BookingRequest {
        appointment_type,
        date,
        time,
        contact: ContactInfo {
            name,
            email,
            phone: req.phone,
        },
        subject: req.subject,
        notes: req.notes,
    })?;

    Ok((StatusCode::CREATED, Json(appointment_res(&appointment))))
}

#[derive(Deserialize)]
struct ListQuery {
    #[serde(rename = "type")]
    appointment_type: Option<String>,
    status: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/appointments",
    params(
        ("type" = Option<String>, Query, description = "Filter by appointment type"),
        ("status" = Option<String>, Query, description = "Filter by status")
    ),
    responses(
        (status = 200, description = "Appointments ordered by date and time", body = wire::ListAppointmentsRes),
        (status = 401, description = "Missing or invalid staff API key", body = wire::ErrorRes),
        (status = 503, description = "Appointment store unavailable", body = wire::ErrorRes)
    )
)]
/// Staff dashboard listing, filterable by type and status.
#[axum::debug_handler]
async fn list_appointments(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<wire::ListAppointmentsRes>> {
    require_staff_key(&state, &headers)?;

    let filter = AppointmentFilter {
        appointment_type: query
            .appointment_type
            .as_deref()
            .map(str::parse::<AppointmentType>)
            .transpose()?,
        status: query
            .status
            .as_deref()
            .map(str::parse::<AppointmentStatus>)
            .transpose()?,
    };

    let appointments = state.service.list_appointments(&filter)?;
    Ok(Json(wire::ListAppointmentsRes {
        appointments: appointments.iter().map(appointment_res).collect(),
    }))
}

#[utoipa::path(
    put,
    path = "/api/appointments/{id}/status",
    request_body = wire::UpdateStatusReq,
    params(
        ("id" = String, Path, description = "Appointment UUID")
    ),
    responses(
        (status = 200, description = "Status updated", body = wire::AppointmentRes),
        (status = 400, description = "Invalid id or status value", body = wire::ErrorRes),
        (status = 401, description = "Missing or invalid staff API key", body = wire::ErrorRes),
        (status = 404, description = "Unknown appointment", body = wire::ErrorRes),
        (status = 409, description = "Transition not allowed by the lifecycle", body = wire::ErrorRes),
        (status = 503, description = "Appointment store unavailable", body = wire::ErrorRes)
    )
)]
/// Applies a staff status change.
///
/// The confirmation step lives in the staff UI; this endpoint only enforces
/// the lifecycle table.
#[axum::debug_handler]
async fn update_appointment_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(id): AxumPath<String>,
    Json(req): Json<wire::UpdateStatusReq>,
) -> ApiResult<Json<wire::AppointmentRes>> {
    require_staff_key(&state, &headers)?;

    let id = Uuid::parse_str(&id)
        .map_err(|_| ApiError::bad_request(format!("invalid appointment id: {id}")))?;
    let new_status: AppointmentStatus = req.new_status.parse()?;

    let appointment = state.service.update_status(id, new_status)?;
    Ok(Json(appointment_res(&appointment)))
}

#[utoipa::path(
    post,
    path = "/api/contact",
    request_body = wire::ContactMessageReq,
    responses(
        (status = 201, description = "Message stored", body = wire::ContactMessageRes),
        (status = 400, description = "Invalid field", body = wire::ErrorRes),
        (status = 503, description = "Message store unavailable", body = wire::ErrorRes)
    )
)]
/// Stores a contact form submission.
#[axum::debug_handler]
async fn submit_contact_message(
    State(state): State<AppState>,
    Json(req): Json<wire::ContactMessageReq>,
) -> ApiResult<(StatusCode, Json<wire::ContactMessageRes>)> {
    let name = NonEmptyText::new(&req.name)
        .map_err(|_| ApiError::bad_request("name must not be empty"))?;
    let email = EmailAddress::parse(&req.email)
        .map_err(|e| ApiError::bad_request(format!("invalid email: {e}")))?;
    let message = NonEmptyText::new(&req.message)
        .map_err(|_| ApiError::bad_request("message must not be empty"))?;

    let stored = state
        .contact_store
        .submit(name, email, req.subject, message)?;
    Ok((
        StatusCode::CREATED,
        Json(wire::ContactMessageRes {
            id: stored.id.to_string(),
            sent_at: stored.sent_at.to_rfc3339(),
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use chrono::{TimeZone, Utc};
    use http_body_util::BodyExt;
    use rdv_core::{CoreConfig, FileAppointmentStore, FixedClock};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tempfile::TempDir;
    use tower::ServiceExt;

    const STAFF_KEY: &str = "test-staff-key";

    /// Router pinned to Monday 2024-06-10.
    fn test_router(temp_dir: &TempDir) -> Router {
        let cfg = Arc::new(CoreConfig::new(temp_dir.path().to_path_buf()));
        let store = Arc::new(FileAppointmentStore::open(cfg.clone()).expect("open store"));
        let clock = Arc::new(FixedClock(
            Utc.with_ymd_and_hms(2024, 6, 10, 10, 0, 0).unwrap(),
        ));
        let service = SchedulingService::with_clock(cfg.clone(), store, clock);
        let contact_store = ContactMessageStore::open(cfg).expect("open contact store");
        router(AppState::new(
            service,
            contact_store,
            Some(STAFF_KEY.to_string()),
        ))
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body should collect")
            .to_bytes();
        serde_json::from_slice(&bytes).expect("body should be JSON")
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request should build")
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request should build")
    }

    fn staff_put_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("PUT")
            .uri(uri)
            .header("content-type", "application/json")
            .header("x-api-key", STAFF_KEY)
            .body(Body::from(body.to_string()))
            .expect("request should build")
    }

    fn booking_body(date: &str, time: &str, appointment_type: &str) -> Value {
        json!({
            "appointment_date": date,
            "appointment_time": time,
            "type": appointment_type,
            "name": "Test Client",
            "email": "client@example.com",
            "phone": "+33 6 12 34 56 78",
            "subject": "Kick-off",
        })
    }

    #[tokio::test]
    async fn test_health_is_ok() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let response = test_router(&temp_dir)
            .oneshot(get("/health"))
            .await
            .expect("request should succeed");
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["ok"], json!(true));
    }

    #[tokio::test]
    async fn test_available_slots_returns_full_grid() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let response = test_router(&temp_dir)
            .oneshot(get("/api/available-slots?date=2024-06-11&type=formation"))
            .await
            .expect("request should succeed");
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        let slots = body["available_slots"]
            .as_array()
            .expect("available_slots should be an array");
        assert_eq!(slots.len(), 7);
        assert_eq!(slots[0]["time"], json!("09:00"));
        assert_eq!(slots[6]["display"], json!("15:00"));
    }

    #[tokio::test]
    async fn test_available_slots_rejects_weekend_with_error_body() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        // 2024-06-15 is a Saturday.
        let response = test_router(&temp_dir)
            .oneshot(get("/api/available-slots?date=2024-06-15&type=formation"))
            .await
            .expect("request should succeed");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert!(body["error"]
            .as_str()
            .expect("error message should be a string")
            .contains("Monday to Friday"));
    }

    #[tokio::test]
    async fn test_available_slots_rejects_unknown_type() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let response = test_router(&temp_dir)
            .oneshot(get("/api/available-slots?date=2024-06-11&type=consulting"))
            .await
            .expect("request should succeed");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("consulting"));
    }

    #[tokio::test]
    async fn test_available_slots_rejects_malformed_date() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let response = test_router(&temp_dir)
            .oneshot(get("/api/available-slots?date=11-06-2024&type=formation"))
            .await
            .expect("request should succeed");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_booking_removes_slot_from_availability() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let app = test_router(&temp_dir);

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/appointments",
                booking_body("2024-06-11", "10:00", "formation"),
            ))
            .await
            .expect("request should succeed");
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        assert_eq!(created["status"], json!("pending"));
        assert_eq!(created["time"], json!("10:00"));

        let response = app
            .oneshot(get("/api/available-slots?date=2024-06-11&type=formation"))
            .await
            .expect("request should succeed");
        let body = body_json(response).await;
        let times: Vec<&str> = body["available_slots"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["time"].as_str().unwrap())
            .collect();
        assert!(!times.contains(&"10:00"));
        assert_eq!(times.len(), 6);
    }

    #[tokio::test]
    async fn test_double_booking_conflicts() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let app = test_router(&temp_dir);

        let first = app
            .clone()
            .oneshot(post_json(
                "/api/appointments",
                booking_body("2024-06-11", "09:00", "livrables"),
            ))
            .await
            .expect("request should succeed");
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = app
            .oneshot(post_json(
                "/api/appointments",
                booking_body("2024-06-11", "09:00", "livrables"),
            ))
            .await
            .expect("request should succeed");
        assert_eq!(second.status(), StatusCode::CONFLICT);
        let body = body_json(second).await;
        assert!(body["error"].as_str().unwrap().contains("no longer available"));
    }

    #[tokio::test]
    async fn test_booking_rejects_unknown_fields() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut body = booking_body("2024-06-11", "09:00", "formation");
        body["unexpected_key"] = json!("should fail");

        let response = test_router(&temp_dir)
            .oneshot(post_json("/api/appointments", body))
            .await
            .expect("request should succeed");
        assert!(
            response.status().is_client_error(),
            "unknown keys must be rejected, got {}",
            response.status()
        );
    }

    #[tokio::test]
    async fn test_staff_listing_requires_api_key() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let app = test_router(&temp_dir);

        let response = app
            .clone()
            .oneshot(get("/api/appointments"))
            .await
            .expect("request should succeed");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/appointments")
                    .header("x-api-key", STAFF_KEY)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .expect("request should succeed");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_status_lifecycle_over_http() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let app = test_router(&temp_dir);

        let created = app
            .clone()
            .oneshot(post_json(
                "/api/appointments",
                booking_body("2024-06-11", "11:00", "formation"),
            ))
            .await
            .expect("request should succeed");
        let created = body_json(created).await;
        let id = created["id"].as_str().unwrap().to_string();

        // pending -> completed is not allowed.
        let response = app
            .clone()
            .oneshot(staff_put_json(
                &format!("/api/appointments/{id}/status"),
                json!({ "new_status": "completed" }),
            ))
            .await
            .expect("request should succeed");
        assert_eq!(response.status(), StatusCode::CONFLICT);

        // pending -> confirmed is.
        let response = app
            .clone()
            .oneshot(staff_put_json(
                &format!("/api/appointments/{id}/status"),
                json!({ "new_status": "confirmed" }),
            ))
            .await
            .expect("request should succeed");
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], json!("confirmed"));
    }

    #[tokio::test]
    async fn test_status_change_requires_api_key() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let response = test_router(&temp_dir)
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri(format!("/api/appointments/{}/status", Uuid::new_v4()))
                    .header("content-type", "application/json")
                    .body(Body::from(json!({ "new_status": "confirmed" }).to_string()))
                    .unwrap(),
            )
            .await
            .expect("request should succeed");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_status_change_unknown_id_is_not_found() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let response = test_router(&temp_dir)
            .oneshot(staff_put_json(
                &format!("/api/appointments/{}/status", Uuid::new_v4()),
                json!({ "new_status": "confirmed" }),
            ))
            .await
            .expect("request should succeed");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_contact_message_submission() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let response = test_router(&temp_dir)
            .oneshot(post_json(
                "/api/contact",
                json!({
                    "name": "Jane Doe",
                    "email": "jane@example.com",
                    "subject": "Business Inquiry",
                    "message": "I would like to discuss a project.",
                }),
            ))
            .await
            .expect("request should succeed");
        assert_eq!(response.status(), StatusCode::CREATED);

        let invalid = test_router(&temp_dir)
            .oneshot(post_json(
                "/api/contact",
                json!({
                    "name": "Jane Doe",
                    "email": "invalid-email",
                    "message": "hello",
                }),
            ))
            .await
            .expect("request should succeed");
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
    }
}

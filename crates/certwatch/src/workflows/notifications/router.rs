use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Extension, Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;

use super::service::{ComplianceService, ComplianceServiceError};
use super::MailSender;
use crate::workflows::compliance::domain::{Certificate, Employee, Position};
use crate::workflows::compliance::repository::{DirectoryRepository, RepositoryError};

/// Header carrying the shared secret for the scheduled dispatch path.
pub const CRON_SECRET_HEADER: &str = "x-cron-secret";

/// Shared-secret gate for the unauthenticated scheduled endpoint. Built from
/// configuration and attached as a request extension by the server.
#[derive(Clone)]
pub struct ScheduleGate {
    secret: Option<Arc<str>>,
}

impl ScheduleGate {
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: secret.map(Arc::from),
        }
    }

    fn enabled(&self) -> bool {
        self.secret.is_some()
    }

    fn permits(&self, provided: Option<&str>) -> bool {
        match (&self.secret, provided) {
            (Some(secret), Some(provided)) => secret.as_ref() == provided,
            _ => false,
        }
    }
}

/// Router builder exposing the compliance dashboard and notification endpoints.
pub fn compliance_router<R, M>(service: Arc<ComplianceService<R, M>>) -> Router
where
    R: DirectoryRepository + 'static,
    M: MailSender + 'static,
{
    Router::new()
        .route("/api/v1/dashboard", get(dashboard_handler::<R, M>))
        .route(
            "/api/v1/notifications/preview",
            get(preview_handler::<R, M>),
        )
        .route(
            "/api/v1/notifications/dispatch",
            post(dispatch_handler::<R, M>),
        )
        .route(
            "/api/v1/notifications/run-scheduled",
            post(scheduled_handler::<R, M>),
        )
        .route("/api/v1/directory", put(replace_directory_handler::<R, M>))
        .route(
            "/api/v1/employees/:employee_id/normalize",
            post(normalize_handler::<R, M>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct AsOfQuery {
    /// Override "today" for deterministic reporting; defaults to the local date.
    #[serde(default)]
    today: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PreviewQuery {
    days: u32,
    #[serde(default)]
    today: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DispatchRequest {
    threshold_days: u32,
    #[serde(default)]
    today: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DirectoryPayload {
    #[serde(default)]
    employees: Vec<Employee>,
    #[serde(default)]
    positions: Vec<Position>,
    #[serde(default)]
    certificates: Vec<Certificate>,
}

fn effective_today(requested: Option<NaiveDate>) -> NaiveDate {
    requested.unwrap_or_else(|| Local::now().date_naive())
}

pub(crate) async fn dashboard_handler<R, M>(
    State(service): State<Arc<ComplianceService<R, M>>>,
    Query(query): Query<AsOfQuery>,
) -> Response
where
    R: DirectoryRepository + 'static,
    M: MailSender + 'static,
{
    match service.dashboard(effective_today(query.today)) {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn preview_handler<R, M>(
    State(service): State<Arc<ComplianceService<R, M>>>,
    Query(query): Query<PreviewQuery>,
) -> Response
where
    R: DirectoryRepository + 'static,
    M: MailSender + 'static,
{
    match service.preview(query.days, effective_today(query.today)) {
        Ok(entries) => (StatusCode::OK, Json(entries)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn dispatch_handler<R, M>(
    State(service): State<Arc<ComplianceService<R, M>>>,
    Json(request): Json<DispatchRequest>,
) -> Response
where
    R: DirectoryRepository + 'static,
    M: MailSender + 'static,
{
    match service
        .dispatch(request.threshold_days, effective_today(request.today))
        .await
    {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn scheduled_handler<R, M>(
    State(service): State<Arc<ComplianceService<R, M>>>,
    Extension(gate): Extension<ScheduleGate>,
    headers: HeaderMap,
) -> Response
where
    R: DirectoryRepository + 'static,
    M: MailSender + 'static,
{
    if !gate.enabled() {
        let payload = json!({ "error": "scheduled dispatch is not configured" });
        return (StatusCode::SERVICE_UNAVAILABLE, Json(payload)).into_response();
    }

    let provided = headers
        .get(CRON_SECRET_HEADER)
        .and_then(|value| value.to_str().ok());
    if !gate.permits(provided) {
        let payload = json!({ "error": "invalid or missing cron secret" });
        return (StatusCode::UNAUTHORIZED, Json(payload)).into_response();
    }

    match service.run_scheduled(effective_today(None)).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn replace_directory_handler<R, M>(
    State(service): State<Arc<ComplianceService<R, M>>>,
    Json(payload): Json<DirectoryPayload>,
) -> Response
where
    R: DirectoryRepository + 'static,
    M: MailSender + 'static,
{
    let counts = json!({
        "employees": payload.employees.len(),
        "positions": payload.positions.len(),
        "certificates": payload.certificates.len(),
    });

    match service.replace_directory(payload.employees, payload.positions, payload.certificates) {
        Ok(()) => (StatusCode::OK, Json(counts)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn normalize_handler<R, M>(
    State(service): State<Arc<ComplianceService<R, M>>>,
    Path(employee_id): Path<String>,
) -> Response
where
    R: DirectoryRepository + 'static,
    M: MailSender + 'static,
{
    match service.normalize_employee(&employee_id) {
        Ok(employee) => (StatusCode::OK, Json(employee)).into_response(),
        Err(ComplianceServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({ "error": format!("employee {employee_id} not found") });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

fn error_response(error: ComplianceServiceError) -> Response {
    let status = match &error {
        ComplianceServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ComplianceServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        ComplianceServiceError::InvalidThreshold => StatusCode::UNPROCESSABLE_ENTITY,
    };

    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}

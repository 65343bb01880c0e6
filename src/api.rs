// REST API over the relational store (Axum)
//
// Thin adapter: every handler validates through a form or calls a store query
// and wraps the result in `ApiResponse`. No join or filter logic lives here.

use crate::forms::{CourseForm, CourseTypeForm, FormError, RegistrationForm};
use crate::store::{CourseFilter, RelationalStore};
use crate::error::StoreError;
use crate::views::{CourseView, RegistrationView, StoreStats};
use crate::entities::{Course, CourseType, Registration};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: RelationalStore,
}

/// API Response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: (),
            error: Some(message.into()),
        }
    }
}

/// Form or store failure, mapped onto an HTTP status
#[derive(Debug)]
pub struct ApiError(FormError);

impl From<FormError> for ApiError {
    fn from(err: FormError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            FormError::Blank(_) | FormError::NoSelection(_) => StatusCode::BAD_REQUEST,
            FormError::Store(StoreError::EmptyName { .. }) => StatusCode::BAD_REQUEST,
            FormError::Store(StoreError::Reference { .. }) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::info!(%status, error = %self.0, "request rejected");
        (status, Json(ApiResponse::err(self.0.to_string()))).into_response()
    }
}

type Created<T> = (StatusCode, Json<ApiResponse<T>>);

fn created<T>(data: T) -> Created<T> {
    (StatusCode::CREATED, Json(ApiResponse::ok(data)))
}

#[derive(Debug, Default, Deserialize)]
pub struct CourseQuery {
    pub type_id: Option<String>,
}

impl CourseQuery {
    fn filter(self) -> CourseFilter {
        match self.type_id {
            Some(type_id) if !type_id.is_empty() => CourseFilter::by_type(type_id),
            _ => CourseFilter::all(),
        }
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/stats - Collection counts
async fn get_stats(State(state): State<AppState>) -> Json<ApiResponse<StoreStats>> {
    Json(ApiResponse::ok(state.store.stats()))
}

/// GET /api/course-types
async fn list_course_types(State(state): State<AppState>) -> Json<ApiResponse<Vec<CourseType>>> {
    Json(ApiResponse::ok(state.store.list_course_types()))
}

/// POST /api/course-types
async fn create_course_type(
    State(state): State<AppState>,
    Json(mut form): Json<CourseTypeForm>,
) -> Result<Created<CourseType>, ApiError> {
    Ok(created(form.submit(&state.store)?))
}

/// GET /api/courses?type_id=<uuid>
async fn list_courses(
    State(state): State<AppState>,
    Query(query): Query<CourseQuery>,
) -> Json<ApiResponse<Vec<Course>>> {
    Json(ApiResponse::ok(state.store.list_courses(&query.filter())))
}

/// POST /api/courses
async fn create_course(
    State(state): State<AppState>,
    Json(mut form): Json<CourseForm>,
) -> Result<Created<Course>, ApiError> {
    Ok(created(form.submit(&state.store)?))
}

/// GET /api/courses/joined?type_id=<uuid>
async fn joined_courses(
    State(state): State<AppState>,
    Query(query): Query<CourseQuery>,
) -> Json<ApiResponse<Vec<CourseView>>> {
    Json(ApiResponse::ok(
        state.store.joined_course_view_filtered(&query.filter()),
    ))
}

/// GET /api/registrations
async fn list_registrations(
    State(state): State<AppState>,
) -> Json<ApiResponse<Vec<Registration>>> {
    Json(ApiResponse::ok(state.store.list_registrations()))
}

/// POST /api/registrations
async fn create_registration(
    State(state): State<AppState>,
    Json(mut form): Json<RegistrationForm>,
) -> Result<Created<Registration>, ApiError> {
    Ok(created(form.submit(&state.store)?))
}

/// GET /api/registrations/joined
async fn joined_registrations(
    State(state): State<AppState>,
) -> Json<ApiResponse<Vec<RegistrationView>>> {
    Json(ApiResponse::ok(state.store.joined_registration_view()))
}

// ============================================================================
// Router
// ============================================================================

pub fn router(store: RelationalStore) -> Router {
    let state = AppState { store };

    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/stats", get(get_stats))
        .route(
            "/course-types",
            get(list_course_types).post(create_course_type),
        )
        .route("/courses", get(list_courses).post(create_course))
        .route("/courses/joined", get(joined_courses))
        .route(
            "/registrations",
            get(list_registrations).post(create_registration),
        )
        .route("/registrations/joined", get(joined_registrations))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}

//! # API REST
//!
//! REST API implementation for the public health intake portal.
//!
//! Handles:
//! - HTTP endpoints with axum (intake submission, classification, staff review)
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON bodies, status codes, CORS)
//!
//! Business rules live in `intake-core`; handlers only translate between HTTP and it.

#![warn(rust_2018_idioms)]

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        FromRequest, FromRequestParts, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post, put},
    Router,
};
use intake_core::{
    classify, IntakeAnswers, IntakeError, IntakeForm, IntakeFormData, ReviewFilter,
    ReviewStatus, ReviewStore, ReviewSummary, RiskLevel, Submission, ValidationErrors,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::{IntoParams, OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

/// Application state shared across REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ReviewStore>,
}

// ============================================================================
// Request and response bodies
// ============================================================================

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Symptom and risk-factor answers to classify.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct ClassifyReq(pub IntakeAnswers);

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyRes {
    #[schema(value_type = String, example = "medium")]
    pub risk_level: RiskLevel,
}

/// A completed intake form: demographics, symptoms, riskFactors and consent.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct SubmitIntakeReq(pub IntakeFormData);

/// A stored submission, including its `derived` risk level and status.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct SubmissionRes(pub Submission);

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListSubmissionsRes {
    pub submissions: Vec<SubmissionRes>,
}

/// Counts by risk level and review status.
#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct SummaryRes(pub ReviewSummary);

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateStatusReq {
    #[schema(value_type = String, example = "in_review")]
    pub status: ReviewStatus,
}

/// Dashboard filters. Omitted or `all` means no filtering.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListSubmissionsQuery {
    /// low, medium, high or all
    pub risk: Option<String>,
    /// new, in_review, closed or all
    pub status: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorRes {
    pub message: String,
    /// Field name to message, present for validation failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub fields: Option<ValidationErrors>,
}

/// Maps core errors onto HTTP responses.
#[derive(Debug)]
pub struct ApiError(IntakeError);

impl From<IntakeError> for ApiError {
    fn from(err: IntakeError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(IntakeError::InvalidInput(rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self(IntakeError::InvalidInput(rejection.body_text()))
    }
}

/// JSON body extractor that rejects with an [`ErrorRes`] body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path extractor that rejects with an [`ErrorRes`] body.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self.0 {
            IntakeError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorRes {
                    message: "validation failed".into(),
                    fields: Some(errors),
                },
            ),
            IntakeError::InvalidInput(message) => (
                StatusCode::BAD_REQUEST,
                ErrorRes {
                    message,
                    fields: None,
                },
            ),
            IntakeError::NotFound(id) => (
                StatusCode::NOT_FOUND,
                ErrorRes {
                    message: format!("submission {id} not found"),
                    fields: None,
                },
            ),
            other => {
                tracing::error!("Intake API error: {:?}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorRes {
                        message: "Internal error".into(),
                        fields: None,
                    },
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

// ============================================================================
// Router
// ============================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        classify_answers,
        create_submission,
        list_submissions,
        submission_summary,
        get_submission,
        update_status,
    ),
    components(schemas(
        HealthRes,
        ClassifyReq,
        ClassifyRes,
        SubmitIntakeReq,
        SubmissionRes,
        ListSubmissionsRes,
        SummaryRes,
        UpdateStatusReq,
        ErrorRes,
    ))
)]
pub struct ApiDoc;

/// Build the REST router with Swagger UI and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/classify", post(classify_answers))
        .route("/submissions", get(list_submissions).post(create_submission))
        .route("/submissions/summary", get(submission_summary))
        .route("/submissions/:id", get(get_submission))
        .route("/submissions/:id/status", put(update_status))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind `addr` and serve the REST API until the server stops.
///
/// # Errors
/// Returns an error if the address cannot be bound or the server fails while running.
pub async fn serve(addr: &str, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("-- Intake REST API listening on {}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

// ============================================================================
// Handlers
// ============================================================================

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
        message: "Intake REST API is alive".into(),
    })
}

#[utoipa::path(
    post,
    path = "/classify",
    request_body = ClassifyReq,
    responses(
        (status = 200, description = "Risk level of the answers", body = ClassifyRes),
        (status = 400, description = "Body is not JSON", body = ErrorRes)
    )
)]
/// Classify answers without storing anything.
///
/// Missing sections and unanswered questions are allowed; they contribute nothing to the
/// score.
#[axum::debug_handler]
async fn classify_answers(
    State(_state): State<AppState>,
    ApiJson(req): ApiJson<ClassifyReq>,
) -> Json<ClassifyRes> {
    Json(ClassifyRes {
        risk_level: classify(&req.0),
    })
}

#[utoipa::path(
    post,
    path = "/submissions",
    request_body = SubmitIntakeReq,
    responses(
        (status = 201, description = "Intake stored", body = SubmissionRes),
        (status = 400, description = "Incomplete intake or malformed body", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Submit a completed intake.
///
/// Every step is validated, the risk level is stamped and the submission is stored with
/// status `new`.
///
/// # Errors
/// Returns `400 Bad Request` with per-field messages if any step is incomplete, and
/// `500 Internal Server Error` if the store cannot be written.
#[axum::debug_handler]
async fn create_submission(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SubmitIntakeReq>,
) -> Result<(StatusCode, Json<SubmissionRes>), ApiError> {
    let mut form = IntakeForm::at_review(req.0);
    let submission = form.submit(&state.store)?;
    Ok((StatusCode::CREATED, Json(SubmissionRes(submission))))
}

#[utoipa::path(
    get,
    path = "/submissions",
    params(ListSubmissionsQuery),
    responses(
        (status = 200, description = "Submissions, newest first", body = ListSubmissionsRes),
        (status = 400, description = "Unknown filter value", body = ErrorRes)
    )
)]
/// List submissions for the review dashboard.
#[axum::debug_handler]
async fn list_submissions(
    State(state): State<AppState>,
    Query(query): Query<ListSubmissionsQuery>,
) -> Result<Json<ListSubmissionsRes>, ApiError> {
    let filter = ReviewFilter::from_selection(query.risk.as_deref(), query.status.as_deref())?;
    let submissions = state
        .store
        .list(&filter)
        .into_iter()
        .map(SubmissionRes)
        .collect();
    Ok(Json(ListSubmissionsRes { submissions }))
}

#[utoipa::path(
    get,
    path = "/submissions/summary",
    responses(
        (status = 200, description = "Counts by risk level and status", body = SummaryRes)
    )
)]
/// Dashboard counts across every stored submission.
#[axum::debug_handler]
async fn submission_summary(State(state): State<AppState>) -> Json<SummaryRes> {
    Json(SummaryRes(state.store.summary()))
}

#[utoipa::path(
    get,
    path = "/submissions/{id}",
    params(("id" = Uuid, Path, description = "Submission id")),
    responses(
        (status = 200, description = "The submission", body = SubmissionRes),
        (status = 400, description = "Id is not a UUID", body = ErrorRes),
        (status = 404, description = "No such submission", body = ErrorRes)
    )
)]
/// Fetch one submission.
#[axum::debug_handler]
async fn get_submission(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<SubmissionRes>, ApiError> {
    let submission = state.store.get(id)?;
    Ok(Json(SubmissionRes(submission)))
}

#[utoipa::path(
    put,
    path = "/submissions/{id}/status",
    params(("id" = Uuid, Path, description = "Submission id")),
    request_body = UpdateStatusReq,
    responses(
        (status = 200, description = "Updated submission", body = SubmissionRes),
        (status = 400, description = "Unknown status, malformed body or id", body = ErrorRes),
        (status = 404, description = "No such submission", body = ErrorRes)
    )
)]
/// Move a submission to a new review status.
#[axum::debug_handler]
async fn update_status(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateStatusReq>,
) -> Result<Json<SubmissionRes>, ApiError> {
    let updated = state.store.update_status(id, req.status)?;
    Ok(Json(SubmissionRes(updated)))
}

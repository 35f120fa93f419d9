//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::error::{ApiError, ErrorResponse};
use crate::web::protocol::{
    ItemPayload, PointsResponse, ProcessReceiptRequest, ProcessReceiptResponse, ReceiptPayload,
    UserPointsResponse,
};
use crate::web::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    response::Json,
};
use receipt_points_core::domain::Receipt;
use std::sync::Arc;
use tracing::debug;
use utoipa::OpenApi;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        process_receipt_handler,
        get_points_handler,
        get_user_points_handler,
        health_handler,
    ),
    components(
        schemas(
            ProcessReceiptRequest,
            ReceiptPayload,
            ItemPayload,
            ProcessReceiptResponse,
            PointsResponse,
            UserPointsResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Receipt Points API", description = "Score purchase receipts and look up awarded points.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Process a receipt for a user.
///
/// Scores the receipt, credits the points to the user's running total and
/// returns the id under which the receipt was stored. Submitting the same
/// receipt twice for the same user is rejected.
#[utoipa::path(
    post,
    path = "/receipts/process",
    request_body = ProcessReceiptRequest,
    responses(
        (status = 200, description = "Receipt processed", body = ProcessReceiptResponse),
        (status = 400, description = "Malformed body or invalid receipt", body = ErrorResponse),
        (status = 409, description = "Receipt already submitted by this user", body = ErrorResponse),
        (status = 503, description = "Concurrent submission conflict, retry later", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn process_receipt_handler(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<ProcessReceiptRequest>, JsonRejection>,
) -> Result<Json<ProcessReceiptResponse>, ApiError> {
    let Json(request) = payload
        .map_err(|e| ApiError::BadRequest(format!("Invalid JSON format: {}", e.body_text())))?;
    debug!(user_id = request.user_id, "Processing receipt submission");

    let receipt = Receipt::from(request.receipt);
    let processed = app_state
        .processor
        .process(request.user_id, &receipt)
        .await?;

    Ok(Json(ProcessReceiptResponse { id: processed.id }))
}

/// Get the points awarded to a processed receipt.
#[utoipa::path(
    get,
    path = "/receipts/{id}/points",
    params(
        ("id" = String, Path, description = "Receipt id returned by /receipts/process.")
    ),
    responses(
        (status = 200, description = "Points for the receipt", body = PointsResponse),
        (status = 404, description = "No receipt found for that id", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_points_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<PointsResponse>, ApiError> {
    let points = app_state.lookup.get_points(&id).await?;
    Ok(Json(PointsResponse { points }))
}

/// Get a user's accumulated points across all of their receipts.
#[utoipa::path(
    get,
    path = "/users/{user_id}/points",
    params(
        ("user_id" = i64, Path, description = "The submitting user's id.")
    ),
    responses(
        (status = 200, description = "Running points total", body = UserPointsResponse),
        (status = 400, description = "User id is not an integer", body = ErrorResponse),
        (status = 404, description = "User has not submitted any receipts", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_user_points_handler(
    State(app_state): State<Arc<AppState>>,
    user_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<UserPointsResponse>, ApiError> {
    let Path(user_id) = user_id.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let account = app_state.lookup.get_user_points(user_id).await?;
    Ok(Json(UserPointsResponse {
        user_id: account.user_id,
        points: account.points,
    }))
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is running", body = String))
)]
pub async fn health_handler() -> &'static str {
    "OK"
}

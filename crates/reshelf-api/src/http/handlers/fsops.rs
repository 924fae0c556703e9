//! Filesystem maintenance endpoints.
//!
//! Walking and mutation are blocking, so each request dispatches through
//! `FsOpsService::run` on the blocking pool, inside an `fsops.dispatch` span
//! carrying the request id and route.

use std::sync::Arc;

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Query, State},
};
use reshelf_fsops::{ExecutionReport, FsRequest, FsResponse};
use reshelf_telemetry::{current_request_id, current_route};
use tracing::{error, info_span};

use crate::http::errors::ApiError;
use crate::models::{
    DeleteEmptyFoldersBody, ListSubfoldersBody, LogsResponse, MoveFilesBody, RenameFilesBody,
    SubfoldersResponse,
};
use crate::state::ApiState;

pub(crate) async fn list_subfolders_query(
    State(state): State<Arc<ApiState>>,
    query: Result<Query<ListSubfoldersBody>, QueryRejection>,
) -> Result<Json<SubfoldersResponse>, ApiError> {
    let Query(body) = query?;
    list_subfolders(&state, &body).await
}

pub(crate) async fn list_subfolders_body(
    State(state): State<Arc<ApiState>>,
    body: Result<Json<ListSubfoldersBody>, JsonRejection>,
) -> Result<Json<SubfoldersResponse>, ApiError> {
    let Json(body) = body?;
    list_subfolders(&state, &body).await
}

async fn list_subfolders(
    state: &ApiState,
    body: &ListSubfoldersBody,
) -> Result<Json<SubfoldersResponse>, ApiError> {
    let request = FsRequest::ListSubfolders(body.to_request()?);
    let operation = request.operation();
    let subfolders = dispatch(state, request)
        .await?
        .into_subfolders()
        .ok_or_else(|| mismatched(operation))?;
    Ok(Json(SubfoldersResponse {
        success: true,
        subfolders,
    }))
}

pub(crate) async fn move_files(
    State(state): State<Arc<ApiState>>,
    body: Result<Json<MoveFilesBody>, JsonRejection>,
) -> Result<Json<LogsResponse>, ApiError> {
    let Json(body) = body?;
    report_response(&state, FsRequest::MoveByKeyword(body.to_request()?)).await
}

pub(crate) async fn rename_files(
    State(state): State<Arc<ApiState>>,
    body: Result<Json<RenameFilesBody>, JsonRejection>,
) -> Result<Json<LogsResponse>, ApiError> {
    let Json(body) = body?;
    report_response(&state, FsRequest::RenameBatch(body.to_request()?)).await
}

pub(crate) async fn delete_empty_folders(
    State(state): State<Arc<ApiState>>,
    body: Result<Json<DeleteEmptyFoldersBody>, JsonRejection>,
) -> Result<Json<LogsResponse>, ApiError> {
    let Json(body) = body?;
    report_response(&state, FsRequest::DeleteEmptyFolders(body.to_request()?)).await
}

async fn report_response(
    state: &ApiState,
    request: FsRequest,
) -> Result<Json<LogsResponse>, ApiError> {
    let operation = request.operation();
    let ExecutionReport { logs, summary, .. } = dispatch(state, request)
        .await?
        .into_report()
        .ok_or_else(|| mismatched(operation))?;
    Ok(Json(LogsResponse::new(logs, Some(summary))))
}

/// Request id and matched route of the current task, `-` when unbound.
fn request_labels() -> (String, String) {
    let unbound = || "-".to_string();
    (
        current_request_id().unwrap_or_else(unbound),
        current_route().unwrap_or_else(unbound),
    )
}

/// Run the request on the blocking pool.
///
/// The task-local request context does not follow the job onto the blocking
/// thread, so its labels are copied into the span the job runs in.
async fn dispatch(state: &ApiState, request: FsRequest) -> Result<FsResponse, ApiError> {
    let operation = request.operation();
    let (request_id, route) = request_labels();
    let span = info_span!(
        "fsops.dispatch",
        operation,
        request_id = %request_id,
        route = %route
    );
    let service = state.fsops.clone();
    tokio::task::spawn_blocking(move || span.in_scope(|| service.run(request)))
        .await
        .map_err(|err| {
            error!(operation, error = %err, "filesystem worker terminated");
            ApiError::internal("filesystem worker terminated unexpectedly")
        })?
        .map_err(ApiError::from)
}

fn mismatched(operation: &'static str) -> ApiError {
    error!(operation, "fsops service returned a mismatched response");
    ApiError::internal("unexpected filesystem response")
}

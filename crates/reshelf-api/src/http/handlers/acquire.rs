use std::sync::Arc;

use axum::{Json, extract::State, extract::rejection::JsonRejection};

use crate::http::errors::ApiError;
use crate::models::{DownloadBody, LogsResponse};
use crate::state::ApiState;

pub(crate) async fn download(
    State(state): State<Arc<ApiState>>,
    body: Result<Json<DownloadBody>, JsonRejection>,
) -> Result<Json<LogsResponse>, ApiError> {
    let Json(body) = body?;
    let request = body.into_request()?;
    let logs = state.acquirer.submit(&request).await?;
    Ok(Json(LogsResponse::new(logs, None)))
}

//! Task route handlers.

use super::AppState;
use crate::error::{ApiError, ApiResult};
use crate::query::Sort;
use crate::types::{Task, TaskPayload};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::collections::HashMap;

/// Query parameter selecting the sort direction; never treated as a filter.
pub const SORT_DIRECTION_PARAM: &str = "sortDirection";
/// Query parameter selecting the sort field; never treated as a filter.
pub const SORT_FIELD_PARAM: &str = "sortField";

/// Health check response.
#[derive(serde::Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Run a store-backed service call on the blocking pool.
///
/// A call that panics surfaces as `INTERNAL_ERROR`.
pub(super) async fn blocking<T, F>(f: F) -> ApiResult<T>
where
    F: FnOnce() -> ApiResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(ApiError::internal)?
}

/// `GET /task` - every remaining query parameter is a filter entry.
pub async fn list_tasks(
    State(state): State<AppState>,
    params: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let Query(mut params) = params?;
    let direction = params.remove(SORT_DIRECTION_PARAM);
    let field = params.remove(SORT_FIELD_PARAM);
    let sort = Sort::parse(field.as_deref(), direction.as_deref())?;

    let tasks = blocking(move || state.query.get_all_tasks(&params, sort)).await?;
    Ok(Json(tasks))
}

/// `GET /task/{id}`
pub async fn get_task(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Response, ApiError> {
    let Path(id) = id?;
    let task = blocking(move || state.query.get_task_by_id(id)).await?;
    Ok(found_or_404(task))
}

/// `POST /task`
pub async fn create_task(
    State(state): State<AppState>,
    payload: Result<Json<TaskPayload>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    let Json(payload) = payload?;
    let task = blocking(move || state.mutation.create_task(payload)).await?;
    Ok(Json(task))
}

/// `PUT /task/{id}`
pub async fn update_task(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<TaskPayload>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let task = blocking(move || state.mutation.update_task(id, payload)).await?;
    Ok(found_or_404(task))
}

/// `DELETE /task/{id}` - empty 200 on success.
pub async fn delete_task(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    match blocking(move || state.mutation.delete_task(id)).await? {
        Some(_) => Ok(StatusCode::OK),
        None => Ok(StatusCode::NOT_FOUND),
    }
}

fn found_or_404(task: Option<Task>) -> Response {
    match task {
        Some(task) => Json(task).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn blocking_returns_the_call_result() {
        let value = blocking(|| Ok(41 + 1)).await.unwrap();
        assert_eq!(value, 42);

        let err = blocking(|| -> ApiResult<()> {
            Err(ApiError::invalid_argument("priority", "bad"))
        })
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidArgument);
    }

    #[tokio::test]
    async fn panicking_call_is_an_internal_error() {
        let err = blocking(|| -> ApiResult<()> { panic!("store exploded") })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InternalError);
    }
}

//! HTTP transport for the task services.
//!
//! This module provides the axum router, the API-key gate and the server
//! lifecycle. Handlers stay thin: they parse the request, call a service and
//! map `None` to 404 and `ApiError` to a status code.

pub mod auth;
mod handlers;

use crate::error::{ApiError, ErrorCode};
use crate::service::{TaskMutationService, TaskQueryService};
use crate::store::TaskStore;
use auth::{RequestGate, require_api_key};
use axum::{
    Json, Router,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

pub use auth::ApiKeyGate;
pub use handlers::{SORT_DIRECTION_PARAM, SORT_FIELD_PARAM};

/// Server state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub query: TaskQueryService,
    pub mutation: TaskMutationService,
    pub gate: Arc<dyn RequestGate>,
}

impl AppState {
    /// Wire both services to the same store.
    pub fn new(store: Arc<dyn TaskStore>, gate: Arc<dyn RequestGate>) -> Self {
        Self {
            query: TaskQueryService::new(Arc::clone(&store)),
            mutation: TaskMutationService::new(store),
            gate,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.code {
            ErrorCode::InvalidArgument => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::StoreFailure | ErrorCode::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            error!(code = ?self.code, message = %self.message, "Request failed");
        }

        (status, Json(self)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::new(ErrorCode::InvalidArgument, "Malformed task body")
            .with_field("body")
            .with_details(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::new(ErrorCode::InvalidArgument, "Task id must be an integer")
            .with_field("id")
            .with_details(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::new(ErrorCode::InvalidArgument, "Malformed query string")
            .with_field("query")
            .with_details(rejection.body_text())
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/task",
            get(handlers::list_tasks).post(handlers::create_task),
        )
        .route(
            "/task/{id}",
            get(handlers::get_task)
                .put(handlers::update_task)
                .delete(handlers::delete_task),
        )
        .route("/api/health", get(handlers::health))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Handle to a running server.
pub struct ServerHandle {
    addr: SocketAddr,
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl ServerHandle {
    /// Address the server is bound to.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stop accepting connections and wait for in-flight requests to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
        let _ = self.task.await;
    }
}

/// Bind `addr` and serve the router in a background task.
pub async fn start_server(state: AppState, addr: SocketAddr) -> anyhow::Result<ServerHandle> {
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    info!("Tasks API listening on http://{}", bound_addr);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                info!("Tasks API shutting down");
            })
            .await
        {
            error!("Server error: {}", e);
        }
    });

    Ok(ServerHandle {
        addr: bound_addr,
        shutdown_tx,
        task,
    })
}

use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::{Path, State},
    response::Response,
    routing::{get, post},
};

use crate::{
    handler::ApiHandler,
    pipeline::{Operation, dispatch},
};

/// HTTP API service builder.
pub struct HttpApi<H> {
    handler: Arc<H>,
}

impl<H> HttpApi<H>
where
    H: ApiHandler,
{
    /// Create new HTTP API with the given handler.
    pub fn new(handler: Arc<H>) -> Self {
        Self { handler }
    }

    /// Build axum router with mounted endpoints.
    ///
    /// Routes:
    /// - POST /api/v1/pods - Create worker
    /// - GET /api/v1/pods/{key}/status - Worker status
    /// - GET /api/v1/pods/{key}/logs - Worker logs
    /// - GET /api/v1/pods/{key}/info - Worker descriptor
    pub fn router(self) -> Router {
        let pods = Router::new()
            .route("/pods", post(create_worker::<H>))
            .route("/pods/{key}/status", get(worker_status::<H>))
            .route("/pods/{key}/logs", get(worker_logs::<H>))
            .route("/pods/{key}/info", get(worker_info::<H>));

        Router::new()
            .nest("/api/v1", pods)
            .with_state(self.handler)
    }
}

/// POST /api/v1/pods
async fn create_worker<H>(State(handler): State<Arc<H>>, body: Bytes) -> Response
where
    H: ApiHandler,
{
    let payload = body.clone();
    dispatch(Operation::Create, &body, move |ctx| async move {
        handler.create_worker(&ctx, &payload).await
    })
    .await
}

/// GET /api/v1/pods/{key}/status
async fn worker_status<H>(State(handler): State<Arc<H>>, Path(key): Path<String>) -> Response
where
    H: ApiHandler,
{
    dispatch(Operation::Status, &[], move |ctx| async move {
        handler.worker_status(&ctx, &key).await
    })
    .await
}

/// GET /api/v1/pods/{key}/logs
async fn worker_logs<H>(State(handler): State<Arc<H>>, Path(key): Path<String>) -> Response
where
    H: ApiHandler,
{
    dispatch(Operation::Logs, &[], move |ctx| async move {
        handler.worker_logs(&ctx, &key).await
    })
    .await
}

/// GET /api/v1/pods/{key}/info
async fn worker_info<H>(State(handler): State<Arc<H>>, Path(key): Path<String>) -> Response
where
    H: ApiHandler,
{
    dispatch(Operation::Info, &[], move |ctx| async move {
        handler.worker_info(&ctx, &key).await
    })
    .await
}

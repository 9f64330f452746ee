use std::{fmt, future::Future};

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{context::RequestContext, error::ApiError};

/// Operation served by one route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Status,
    Logs,
    Info,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Status => "status",
            Operation::Logs => "logs",
            Operation::Info => "info",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serve one request: open a request context, run `call`, encode the outcome.
///
/// The context is cancelled when this returns, on every path. `body` is only
/// logged. Errors are written as `"<message> <request-id>"` with the error's
/// status; payloads as JSON followed by a newline.
pub(crate) async fn dispatch<T, F, Fut>(operation: Operation, body: &[u8], call: F) -> Response
where
    T: Serialize,
    F: FnOnce(RequestContext) -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let (ctx, _guard) = RequestContext::new();
    let request_id = ctx.id();

    if !body.is_empty() {
        debug!(
            %request_id,
            %operation,
            body = %String::from_utf8_lossy(body),
            "request body"
        );
    }

    match call(ctx).await.and_then(|payload| encode(&payload)) {
        Ok(bytes) => {
            info!(%request_id, %operation, status = StatusCode::OK.as_u16(), "request served");
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                bytes,
            )
                .into_response()
        }
        Err(err) => {
            let status = err.status();
            warn!(
                %request_id,
                %operation,
                status = status.as_u16(),
                error = %err,
                "request failed"
            );
            (status, format!("{err} {request_id}\n")).into_response()
        }
    }
}

fn encode<T: Serialize>(payload: &T) -> Result<Vec<u8>, ApiError> {
    let mut bytes = serde_json::to_vec(payload).map_err(|e| {
        ApiError::Serialization(format!("Fail to marshal response because of {e}"))
    })?;
    bytes.push(b'\n');
    Ok(bytes)
}

use std::future::Future;

use tokio_util::sync::{CancellationToken, DropGuard};
use uuid::Uuid;

/// Per-request identity and cancellation scope.
///
/// Cheap to clone; every clone observes the same cancellation.
#[derive(Debug, Clone)]
pub struct RequestContext {
    id: Uuid,
    token: CancellationToken,
}

impl RequestContext {
    /// Fresh context with a random correlation id.
    ///
    /// The returned guard cancels the context when dropped; the pipeline holds it
    /// for the lifetime of the request.
    pub fn new() -> (Self, DropGuard) {
        let token = CancellationToken::new();
        let guard = token.clone().drop_guard();
        let ctx = Self {
            id: Uuid::new_v4(),
            token,
        };
        (ctx, guard)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// First hyphen-separated group of the correlation id.
    pub fn short_id(&self) -> String {
        let id = self.id.to_string();
        id.split('-').next().unwrap_or_default().to_string()
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Run `fut` unless the request is cancelled first; `None` on cancellation.
    pub async fn until_cancelled<F>(&self, fut: F) -> Option<F::Output>
    where
        F: Future,
    {
        self.token.run_until_cancelled(fut).await
    }
}

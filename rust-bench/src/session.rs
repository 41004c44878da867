use std::time::Duration;

use reqwest::Method;
use tokio::sync::mpsc;
use tokio::time::sleep;

use crate::executor::RequestExecutor;
use crate::result::RequestResult;

/// One simulated user's journey, in order.
pub const SESSION_SCRIPT: [(Method, &str); 8] = [
    (Method::GET, "/"),
    (Method::GET, "/health"),
    (Method::GET, "/categories"),
    (Method::GET, "/products?limit=20"),
    (Method::GET, "/products?category_id=1&min_price=10&max_price=100"),
    (Method::GET, "/products/1"),
    (Method::GET, "/compute/fibonacci/25"),
    (Method::GET, "/metrics"),
];

/// Append-only handle onto the run's result collection.
#[derive(Clone, Debug)]
pub struct ResultSink {
    tx: mpsc::UnboundedSender<RequestResult>,
}

impl ResultSink {
    pub fn new(tx: mpsc::UnboundedSender<RequestResult>) -> Self {
        Self { tx }
    }

    /// Returns false once the collecting side is gone.
    pub fn push(&self, result: RequestResult) -> bool {
        self.tx.send(result).is_ok()
    }
}

pub async fn run_user_session(
    user_id: usize,
    executor: &RequestExecutor,
    sink: &ResultSink,
    pacing: Duration,
) {
    for (method, endpoint) in SESSION_SCRIPT {
        let result = executor.execute(user_id, method, endpoint, None).await;
        if !sink.push(result) {
            tracing::warn!(user_id, endpoint, "result sink closed, dropping result");
        }
        sleep(pacing).await;
    }
}

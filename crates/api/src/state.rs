use ferrous_doh_application::ports::DohHandler;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub struct DohState {
    /// Answers decoded queries. `None` makes the endpoint reply 501.
    pub handler: Option<Arc<dyn DohHandler>>,
    /// Parent of the per-request cancellation tokens.
    pub shutdown: CancellationToken,
}

impl DohState {
    pub fn new(handler: Arc<dyn DohHandler>) -> Self {
        Self {
            handler: Some(handler),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn without_handler() -> Self {
        Self {
            handler: None,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }
}

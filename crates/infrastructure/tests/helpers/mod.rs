#![allow(dead_code)]
pub mod doh_upstream;

use ferrous_doh_infrastructure::transport::{HttpTransport, ReqwestTransport};
use std::sync::Arc;

pub fn plain_transport() -> Arc<dyn HttpTransport> {
    Arc::new(ReqwestTransport::from_client(reqwest::Client::new()))
}

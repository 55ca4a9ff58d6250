pub mod client;
pub mod forwarder;
pub mod json_api;

pub use client::{DohClient, DohMethod, DNS_MESSAGE_CONTENT_TYPE};
pub use forwarder::Forwarder;
pub use json_api::{JsonApiClient, DNS_JSON_CONTENT_TYPE};

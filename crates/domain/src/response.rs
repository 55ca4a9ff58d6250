//! Normalized DNS answer, shared by the wire path and the JSON API path.
//!
//! Field names follow the `application/dns-json` body used by the
//! well-known providers, so a provider body decodes directly into
//! [`NormalizedResponse`] and our own output serializes the same way.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedResponse {
    /// Response code (0 = NOERROR, 3 = NXDOMAIN, ...).
    #[serde(rename = "Status")]
    pub status: u16,

    #[serde(rename = "TC", default)]
    pub truncated: bool,

    #[serde(rename = "RD", default)]
    pub recursion_desired: bool,

    #[serde(rename = "RA", default)]
    pub recursion_available: bool,

    #[serde(rename = "AD", default)]
    pub authenticated_data: bool,

    #[serde(rename = "CD", default)]
    pub checking_disabled: bool,

    #[serde(rename = "Question", default)]
    pub question: Vec<NormalizedQuestion>,

    #[serde(rename = "Answer", default)]
    pub answer: Vec<NormalizedAnswer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedQuestion {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedAnswer {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: u16,
    #[serde(rename = "TTL")]
    pub ttl: u32,
    pub data: String,
}

impl NormalizedResponse {
    pub fn is_success(&self) -> bool {
        self.status == 0
    }
}

/// One unit of orchestrator output: a response tagged with the source
/// that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledResult {
    pub label: String,
    pub resp: NormalizedResponse,
}

/// What the orchestrator hands to its sink; plain or labeled depending on
/// the `labels` option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OutputItem {
    Labeled(LabeledResult),
    Plain(NormalizedResponse),
}

impl OutputItem {
    pub fn response(&self) -> &NormalizedResponse {
        match self {
            OutputItem::Labeled(labeled) => &labeled.resp,
            OutputItem::Plain(resp) => resp,
        }
    }
}

use axum::{
    body::Body,
    extract::{rejection::QueryRejection, Query, Request, State},
    http::{header, request::Parts, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use hickory_proto::op::Message;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument};

use crate::errors::DohResponseError;
use crate::state::DohState;

pub const DNS_MESSAGE_CONTENT_TYPE: &str = "application/dns-message";

/// Largest DNS message accepted in a POST body.
const MAX_DNS_MESSAGE_SIZE: usize = 65_535;

#[derive(Deserialize, Debug)]
pub struct DnsQueryParams {
    pub dns: Option<String>,
}

#[instrument(skip_all)]
pub async fn health_check() -> &'static str {
    info!("Health check requested");
    "OK"
}

#[instrument(skip_all, name = "doh_get")]
pub async fn dns_query_get(
    method: Method,
    State(state): State<DohState>,
    params: Result<Query<DnsQueryParams>, QueryRejection>,
    request: Request,
) -> Result<Response, DohResponseError> {
    // The GET route also receives HEAD.
    if method != Method::GET {
        return Err(DohResponseError::MethodNotAllowed);
    }

    let Query(params) = params.map_err(|e| {
        debug!(error = %e, "Invalid query string");
        DohResponseError::BadRequest("invalid query string".to_string())
    })?;

    let encoded = params
        .dns
        .filter(|dns| !dns.is_empty())
        .ok_or_else(|| DohResponseError::BadRequest("missing dns parameter".to_string()))?;

    let wire = URL_SAFE_NO_PAD.decode(encoded.as_bytes()).map_err(|e| {
        debug!(error = %e, "Invalid base64url in dns parameter");
        DohResponseError::BadRequest("dns parameter is not base64url".to_string())
    })?;

    let (parts, _) = request.into_parts();
    answer(&state, parts, &wire).await
}

#[instrument(skip_all, name = "doh_post")]
pub async fn dns_query_post(
    State(state): State<DohState>,
    request: Request,
) -> Result<Response, DohResponseError> {
    let (parts, body) = request.into_parts();

    if !is_dns_message(&parts.headers) {
        debug!(content_type = ?parts.headers.get(header::CONTENT_TYPE), "Rejected POST content type");
        return Err(DohResponseError::UnsupportedMediaType);
    }

    let wire = read_body(body).await?;
    answer(&state, parts, &wire).await
}

fn is_dns_message(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|media_type| media_type.trim().eq_ignore_ascii_case(DNS_MESSAGE_CONTENT_TYPE))
}

async fn read_body(body: Body) -> Result<Vec<u8>, DohResponseError> {
    axum::body::to_bytes(body, MAX_DNS_MESSAGE_SIZE)
        .await
        .map(|bytes| bytes.to_vec())
        .map_err(|e| {
            error!(error = %e, "Failed to read DoH request body");
            DohResponseError::Internal
        })
}

async fn answer(
    state: &DohState,
    mut parts: Parts,
    wire: &[u8],
) -> Result<Response, DohResponseError> {
    let query = Message::from_vec(wire).map_err(|e| {
        debug!(error = %e, "Failed to unpack DoH request");
        DohResponseError::BadRequest("malformed DNS message".to_string())
    })?;

    let Some(handler) = state.handler.as_ref() else {
        return Err(DohResponseError::NotImplemented);
    };

    // Dropped (and so cancelled) when the client goes away mid-request.
    let cancel: CancellationToken = state.shutdown.child_token();
    let _guard = cancel.clone().drop_guard();
    parts.extensions.insert(cancel);

    let id = query.id();
    let mut response_headers = HeaderMap::new();
    let reply = handler
        .handle(&parts, &mut response_headers, query)
        .await
        .map_err(|e| {
            error!(id = id, error = %e, "DoH handler failed");
            DohResponseError::Internal
        })?;

    let body = reply.to_vec().map_err(|e| {
        error!(id = id, error = %e, "Failed to pack DoH response");
        DohResponseError::Internal
    })?;

    debug!(id = id, answers = reply.answers().len(), "DoH query answered");

    let mut response = (StatusCode::OK, body).into_response();
    let headers = response.headers_mut();
    headers.extend(response_headers);
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(DNS_MESSAGE_CONTENT_TYPE),
    );

    Ok(response)
}

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

/// Failure of a `/dns-query` exchange, mapped to its HTTP status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DohResponseError {
    BadRequest(String),
    MethodNotAllowed,
    UnsupportedMediaType,
    NotImplemented,
    Internal,
}

impl DohResponseError {
    pub fn status(&self) -> StatusCode {
        match self {
            DohResponseError::BadRequest(_) => StatusCode::BAD_REQUEST,
            DohResponseError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            DohResponseError::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            DohResponseError::NotImplemented => StatusCode::NOT_IMPLEMENTED,
            DohResponseError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for DohResponseError {
    fn into_response(self) -> Response {
        let status = self.status();
        let allow = matches!(self, DohResponseError::MethodNotAllowed);
        let body = match self {
            DohResponseError::BadRequest(reason) => reason,
            _ => status.canonical_reason().unwrap_or_default().to_string(),
        };

        let mut response = (status, body).into_response();
        if allow {
            response
                .headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static("GET, POST"));
        }
        response
    }
}

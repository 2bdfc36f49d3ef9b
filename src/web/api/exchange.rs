//! API endpoint for the envelope exchange.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;

use crate::core::{Dispatch, DispatchStatus, Dispatcher};
use crate::protocol::types::MALFORMED_PAYLOAD;
use crate::protocol::ErrorBody;

/// Receive one request envelope and answer it.
///
/// A body that cannot be read (too large, or the stream failed) keeps the
/// status axum chose for it but gets the same JSON shape as other
/// malformed payloads.
pub async fn exchange(
    State(dispatcher): State<Arc<Dispatcher>>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            tracing::warn!("Unreadable request body: {}", rejection.body_text());
            return unreadable_body(rejection.status(), rejection.body_text());
        }
    };

    if !is_json(&headers) {
        tracing::warn!("Rejected request without JSON content type");
        return Dispatch::malformed("Content-Type must be application/json").into_response();
    }

    dispatcher.dispatch_bytes(&body).into_response()
}

fn is_json(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || (essence.starts_with("application/") && essence.ends_with("+json"))
}

fn unreadable_body(status: StatusCode, message: String) -> Response {
    let error = ErrorBody::new(MALFORMED_PAYLOAD, message);
    (status, Json(json!({ "error": error }))).into_response()
}

fn status_code(status: DispatchStatus) -> StatusCode {
    match status {
        DispatchStatus::Ok => StatusCode::OK,
        DispatchStatus::ClientError => StatusCode::BAD_REQUEST,
        DispatchStatus::ServerError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for Dispatch {
    fn into_response(self) -> Response {
        let status = status_code(self.status());
        match self {
            Dispatch::Responded { envelope, .. } => (status, Json(envelope)).into_response(),
            Dispatch::Rejected(error) => (status, Json(json!({ "error": error }))).into_response(),
        }
    }
}

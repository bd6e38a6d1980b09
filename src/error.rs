use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::store::StoreError;

/// Field name carrying the text of an error body.
///
/// Existing clients read `error` on some routes and `message` on others, so
/// each route keeps the key it has always answered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKey {
    Error,
    Message,
}

impl MessageKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKey::Error => "error",
            MessageKey::Message => "message",
        }
    }
}

/// Outcome of a request that did not produce rows
#[derive(Debug, Error)]
pub enum ApiError {
    /// Valid request, nothing matched
    #[error("{text}")]
    NotFound { key: MessageKey, text: String },

    /// Request parameters rejected before the store was queried
    #[error("{text}")]
    InvalidInput { key: MessageKey, text: String },

    /// The store reported a failure; its text is passed through
    #[error(transparent)]
    Upstream(#[from] StoreError),

    /// Any other fault raised while handling the request
    #[error("{0}")]
    Unhandled(String),
}

impl ApiError {
    pub fn not_found(key: MessageKey, text: impl Into<String>) -> Self {
        ApiError::NotFound {
            key,
            text: text.into(),
        }
    }

    pub fn invalid_input(key: MessageKey, text: impl Into<String>) -> Self {
        ApiError::InvalidInput {
            key,
            text: text.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) | ApiError::Unhandled(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn key(&self) -> MessageKey {
        match self {
            ApiError::NotFound { key, .. } | ApiError::InvalidInput { key, .. } => *key,
            ApiError::Upstream(_) | ApiError::Unhandled(_) => MessageKey::Error,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Upstream(e) => log::error!("Store error: {:?}", e),
            ApiError::Unhandled(msg) => log::error!("Unhandled error: {}", msg),
            ApiError::NotFound { .. } | ApiError::InvalidInput { .. } => {
                log::debug!("{} {}", self.status(), self)
            }
        }

        let mut body = Map::new();
        body.insert(self.key().as_str().to_string(), Value::String(self.to_string()));

        (self.status(), Json(Value::Object(body))).into_response()
    }
}

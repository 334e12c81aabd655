use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Everything a request can fail with, mapped onto an HTTP response in one
/// place. Upstream and attach failures are 502 because the bridge itself is
/// healthy; the caller is expected to retry the whole request.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    UnsupportedMediaType(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Upstream(String),

    /// The asset was uploaded but the attach transaction did not commit.
    /// The ids are surfaced to the caller for manual reconciliation.
    #[error("failed to attach asset {asset_id} to bookmark {bookmark_id}: {reason}")]
    Attach {
        bookmark_id: String,
        asset_id: String,
        reason: String,
    },

    /// The database lock-wait bound expired. Retryable by the caller.
    #[error("database busy: {0}")]
    Busy(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<libsql::Error> for BridgeError {
    fn from(error: libsql::Error) -> Self {
        let detail = error.to_string();
        let lowered = detail.to_lowercase();
        if lowered.contains("database is locked") || lowered.contains("busy") {
            BridgeError::Busy(detail)
        } else {
            BridgeError::Internal(anyhow::anyhow!(detail))
        }
    }
}

impl IntoResponse for BridgeError {
    fn into_response(self) -> Response {
        use BridgeError::*;
        match self {
            Unauthorized(msg) => error_json(StatusCode::UNAUTHORIZED, &msg),
            UnsupportedMediaType(msg) => error_json(StatusCode::UNSUPPORTED_MEDIA_TYPE, &msg),
            BadRequest(msg) => error_json(StatusCode::BAD_REQUEST, &msg),
            Upstream(msg) => error_json(StatusCode::BAD_GATEWAY, &msg),
            Attach {
                bookmark_id,
                asset_id,
                reason,
            } => (
                StatusCode::BAD_GATEWAY,
                Json(json!({
                    "error": reason,
                    "bookmarkId": bookmark_id,
                    "assetId": asset_id,
                })),
            )
                .into_response(),
            Busy(msg) => error_json(StatusCode::SERVICE_UNAVAILABLE, &msg),
            Internal(e) => {
                let source: &(dyn std::error::Error + 'static) = e.as_ref();
                tracing::error!(error = %crate::unpack_error(source), "request failed");
                error_json(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
            }
        }
    }
}

fn error_json(status: StatusCode, msg: &str) -> Response {
    (status, Json(json!({ "error": msg }))).into_response()
}

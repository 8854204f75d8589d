//! Translation of store and transport failures into HTTP responses.

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::{BytesRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use pdfstore_files::{ErrorKind, FilesError};

use crate::MessageRes;

pub const NOT_FOUND_BODY: &str = "File Not Found";
pub const INTERNAL_ERROR_BODY: &str = "Internal Server Error";

/// Error returned by every handler and by the upload extractor.
#[derive(Debug)]
pub enum ApiError {
    /// Caller input was missing or malformed (400, JSON `{message}`)
    Validation(String),
    /// Nothing stored at the requested path (404, plain text)
    NotFound,
    /// Unexpected failure; the cause is logged and never sent to the caller (500, plain text)
    Internal(String),
    /// The request body could not be decoded; keeps axum's status
    Transport { status: StatusCode, message: String },
}

impl From<FilesError> for ApiError {
    fn from(err: FilesError) -> Self {
        match err.kind() {
            ErrorKind::Validation => ApiError::Validation(err.to_string()),
            ErrorKind::NotFound => ApiError::NotFound,
            ErrorKind::Internal => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("blocking task failed: {err}"))
    }
}

macro_rules! transport_rejection {
    ($($rejection:ty),* $(,)?) => {
        $(
            impl From<$rejection> for ApiError {
                fn from(rejection: $rejection) -> Self {
                    ApiError::Transport {
                        status: rejection.status(),
                        message: rejection.body_text(),
                    }
                }
            }
        )*
    };
}

transport_rejection!(
    MultipartRejection,
    MultipartError,
    PathRejection,
    QueryRejection,
    BytesRejection,
);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(message) => {
                tracing::debug!(%message, "rejected request");
                (StatusCode::BAD_REQUEST, Json(MessageRes { message })).into_response()
            }
            ApiError::NotFound => (StatusCode::NOT_FOUND, NOT_FOUND_BODY).into_response(),
            ApiError::Internal(cause) => {
                tracing::error!(error = %cause, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY).into_response()
            }
            ApiError::Transport { status, message } => {
                tracing::debug!(%status, %message, "could not decode request");
                (status, Json(MessageRes { message })).into_response()
            }
        }
    }
}

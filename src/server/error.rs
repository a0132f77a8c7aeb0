//! HTTP error responses rendered on the upload page.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::error::Error;
use crate::model::StyleVariant;
use crate::pipeline::ScaleSelection;

use super::page;

/// Application-level error type for HTTP handlers.
///
/// Renders the upload page again with the message, so the user can retry.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// An error from the stylization pipeline.
    #[error(transparent)]
    Pipeline(#[from] Error),

    /// The multipart body could not be read.
    #[error(transparent)]
    Multipart(#[from] MultipartError),

    /// A malformed request.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// An [`AppError`] bound to the page it should be rendered on.
#[derive(Debug)]
pub struct PageError {
    pub variant: StyleVariant,
    pub scale: ScaleSelection,
    pub error: AppError,
}

impl AppError {
    /// Status code and user-facing message.
    fn classify(&self) -> (StatusCode, String) {
        match self {
            Self::Pipeline(err) if err.is_client_error() => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            Self::Pipeline(err) => {
                tracing::error!(error = %err, "Stylization failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Stylization failed, please try again with another image.".to_string(),
                )
            }
            Self::Multipart(err) => (err.status(), err.body_text()),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        }
    }

    /// Attach the page context the error is rendered in.
    #[must_use]
    pub fn on_page(self, variant: StyleVariant, scale: ScaleSelection) -> PageError {
        PageError {
            variant,
            scale,
            error: self,
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let (status, message) = self.error.classify();
        let body = page::upload_page(self.variant, self.scale, Some(&message));
        (status, Html(body)).into_response()
    }
}

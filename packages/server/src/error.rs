//! Errors returned by the render service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use dccode_render::RenderError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    /// The posted document could not be read or flattened.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Malformed request outside the document itself.
    #[error("{0}")]
    BadRequest(String),

    /// The rendering task panicked or was cancelled.
    #[error("rendering failed unexpectedly")]
    Task(#[from] tokio::task::JoinError),

    /// Invalid service configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Render(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Task(_) | Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "rejected request");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_errors_are_client_errors() {
        let err = ServerError::from(RenderError::NotALevel("html".to_string()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Root element is <html>, expected <level>");
    }

    #[test]
    fn config_errors_are_server_errors() {
        let err = ServerError::Config("bad".to_string());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

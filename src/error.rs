use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SipError {
    /// Missing, malformed or out-of-domain request fields.
    #[error("{0}")]
    InvalidInput(String),

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl SipError {
    pub fn status(&self) -> StatusCode {
        match self {
            SipError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            SipError::Storage(_) | SipError::Migration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for SipError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            SipError::InvalidInput(msg) => {
                tracing::warn!(error = %msg, "rejected calculation input");
                msg.clone()
            }
            SipError::Storage(_) | SipError::Migration(_) => {
                tracing::error!(error = %self, "history store failure");
                "Internal server error".to_string()
            }
        };
        crate::api::error_response(status, &message)
    }
}

use thiserror::Error;

use crate::domain::{AmountOverflow, InvalidDate, MalformedPayload};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Backend API unreachable: {0}")]
    Upstream(String),

    #[error("Backend API request failed with status {0}")]
    UpstreamStatus(u16),

    #[error("Invalid response format: {0}")]
    InvalidPayload(String),

    #[error("{0}")]
    InvalidDate(#[from] InvalidDate),

    #[error("Cannot aggregate transactions: {0}")]
    Overflow(#[from] AmountOverflow),

    #[error("Transaction source error: {0}")]
    Source(#[from] anyhow::Error),
}

impl From<MalformedPayload> for AppError {
    fn from(err: MalformedPayload) -> Self {
        AppError::InvalidPayload(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => AppError::UpstreamStatus(status.as_u16()),
            None if err.is_decode() => AppError::InvalidPayload(err.to_string()),
            None => AppError::Upstream(err.to_string()),
        }
    }
}

impl AppError {
    /// Whether the caller supplied bad input, as opposed to a failed fetch.
    pub fn is_client_error(&self) -> bool {
        matches!(self, AppError::InvalidDate(_))
    }
}

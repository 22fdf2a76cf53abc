//! Places transaction records are fetched from.
//!
//! A source hands back the raw JSON payload; validation happens in the
//! application layer so every source is checked the same way.

mod backend;
mod file;
pub mod mock;

use async_trait::async_trait;
use serde_json::Value;

use crate::application::AppError;
use crate::domain::DateRange;

pub use backend::HttpTransactionSource;
pub use file::FileTransactionSource;

#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// Fetch the raw transaction payload. Sources that can narrow by date
    /// do so; callers filter again regardless.
    async fn fetch(&self, range: &DateRange) -> Result<Value, AppError>;

    /// Human-readable origin, used in log lines.
    fn describe(&self) -> String;
}

/// A fixed in-memory payload.
#[derive(Debug, Clone)]
pub struct StaticTransactionSource {
    payload: Value,
}

impl StaticTransactionSource {
    pub fn new(payload: Value) -> Self {
        Self { payload }
    }
}

#[async_trait]
impl TransactionSource for StaticTransactionSource {
    async fn fetch(&self, _range: &DateRange) -> Result<Value, AppError> {
        Ok(self.payload.clone())
    }

    fn describe(&self) -> String {
        "in-memory transactions".to_string()
    }
}

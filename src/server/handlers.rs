use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use crate::application::{AppError, DashboardService, DashboardSummary};
use crate::domain::{DateRange, TransactionRecord};

use super::ApiError;

pub type ServiceState = Arc<DashboardService>;

/// `start_date` / `end_date` query parameters (YYYY-MM-DD, blank = absent).
#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl RangeQuery {
    pub fn range(&self) -> Result<DateRange, AppError> {
        Ok(DateRange::parse(
            self.start_date.as_deref(),
            self.end_date.as_deref(),
        )?)
    }
}

/// GET /health
pub async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// GET /api/dashboard
/// Aggregated metrics, monthly series and expense distribution
pub async fn get_dashboard(
    State(service): State<ServiceState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<DashboardSummary>, ApiError> {
    let range = query.range()?;
    let summary = service.summary(&range).await?;
    Ok(Json(summary))
}

/// GET /api/transactions
/// Validated transactions inside the requested range
pub async fn get_transactions(
    State(service): State<ServiceState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Vec<TransactionRecord>>, ApiError> {
    let range = query.range()?;
    let records = service.transactions(&range).await?;
    Ok(Json(records))
}

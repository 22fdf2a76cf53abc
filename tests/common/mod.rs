// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    Json, Router,
    body::Body,
    http::{Request, StatusCode},
    routing::get,
};
use chrono::NaiveDate;
use finboard::application::{Clock, DashboardService};
use finboard::source::{StaticTransactionSource, TransactionSource};
use serde_json::{Value, json};
use tower::ServiceExt;

/// Helper to parse a date string into a NaiveDate
pub fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// Service over a fixed payload with a pinned "today"
pub fn static_service(payload: Value, today: &str) -> Arc<DashboardService> {
    service_with(Arc::new(StaticTransactionSource::new(payload)), today)
}

pub fn service_with(source: Arc<dyn TransactionSource>, today: &str) -> Arc<DashboardService> {
    Arc::new(DashboardService::new(source).with_clock(Clock::Fixed(parse_date(today))))
}

/// Test fixture: a small quarter of activity in the Laravel backend's shape
pub fn quarter_payload() -> Value {
    json!([
        {"id": 1, "description": "Retainer", "amount": "5000.00", "type": "income", "category": "Sales", "transaction_date": "2024-01-05"},
        {"id": 2, "description": "Payroll", "amount": "2000.00", "type": "expense", "category": "Salaries", "transaction_date": "2024-01-25"},
        {"id": 3, "description": "Ads", "amount": "500.00", "type": "expense", "category": "Marketing", "transaction_date": "2024-02-10"},
        {"id": 4, "description": "Retainer", "amount": "6000.00", "type": "income", "category": "Sales", "transaction_date": "2024-02-05"},
        {"id": 5, "description": "Payroll", "amount": "2000.00", "type": "expense", "category": "Salaries", "transaction_date": "2024-02-25"},
        {"id": 6, "description": "Retainer", "amount": "7000.00", "type": "income", "category": "Sales", "transaction_date": "2024-03-05"},
        {"id": 7, "description": "Servers", "amount": "500.00", "type": "expense", "category": "Operations", "transaction_date": "2024-03-12"}
    ])
}

/// Send a GET request through the router and decode the JSON body
pub async fn get_json(router: Router, uri: &str) -> Result<(StatusCode, Value)> {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty())?)
        .await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, serde_json::from_slice(&bytes)?))
}

/// Start a stand-in for the transactions backend on an ephemeral port.
/// `/api/transactions` answers with `payload`; `/api/broken` answers 500.
pub async fn spawn_backend(payload: Value) -> Result<SocketAddr> {
    let app = Router::new()
        .route(
            "/api/transactions",
            get(move || {
                let payload = payload.clone();
                async move { Json(payload) }
            }),
        )
        .route(
            "/api/broken",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(addr)
}

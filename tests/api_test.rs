mod common;

use anyhow::Result;
use axum::http::StatusCode;
use common::{get_json, quarter_payload, static_service};
use finboard::server::create_router;
use serde_json::json;

#[tokio::test]
async fn test_health_check() -> Result<()> {
    let router = create_router(static_service(json!([]), "2024-03-31"));
    let (status, body) = get_json(router, "/health").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
    Ok(())
}

#[tokio::test]
async fn test_dashboard_endpoint() -> Result<()> {
    let router = create_router(static_service(quarter_payload(), "2024-03-31"));
    let (status, body) = get_json(router, "/api/dashboard").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["metrics"]["totalRevenue"], 18000.0);
    assert_eq!(body["metrics"]["totalExpenses"], 5000.0);
    assert_eq!(body["metrics"]["netProfit"], 13000.0);
    assert_eq!(body["monthlyRevenue"]["labels"].as_array().unwrap().len(), 12);
    assert_eq!(body["monthlyRevenue"]["labels"][11], "2024-03");
    assert_eq!(body["monthlyRevenue"]["data"][11], 7000.0);
    assert_eq!(body["cashFlow"]["revenue"][10], 6000.0);
    assert_eq!(body["cashFlow"]["expenses"][10], 2500.0);
    assert_eq!(body["cashFlow"]["profit"][10], 3500.0);
    assert_eq!(
        body["expenseDistribution"],
        json!({"labels": ["Salaries", "Marketing", "Operations"], "data": [80.0, 10.0, 10.0]})
    );
    Ok(())
}

#[tokio::test]
async fn test_dashboard_endpoint_with_range() -> Result<()> {
    let router = create_router(static_service(quarter_payload(), "2024-03-31"));
    let (status, body) =
        get_json(router, "/api/dashboard?start_date=2024-03-01&end_date=2024-03-31").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["metrics"]["totalRevenue"], 7000.0);
    assert_eq!(body["metrics"]["totalExpenses"], 500.0);
    assert_eq!(body["expenseDistribution"]["labels"], json!(["Operations"]));
    Ok(())
}

#[tokio::test]
async fn test_blank_query_parameters_are_ignored() -> Result<()> {
    let router = create_router(static_service(quarter_payload(), "2024-03-31"));
    let (status, body) = get_json(router, "/api/dashboard?start_date=&end_date=").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["metrics"]["totalRevenue"], 18000.0);
    Ok(())
}

#[tokio::test]
async fn test_invalid_date_is_bad_request() -> Result<()> {
    let router = create_router(static_service(quarter_payload(), "2024-03-31"));
    let (status, body) = get_json(router, "/api/dashboard?start_date=march").await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("march"));
    Ok(())
}

#[tokio::test]
async fn test_malformed_upstream_is_internal_error() -> Result<()> {
    let router = create_router(static_service(json!({"message": "oops"}), "2024-03-31"));
    let (status, body) = get_json(router, "/api/dashboard").await?;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Failed to process transactions"}));
    Ok(())
}

#[tokio::test]
async fn test_transactions_endpoint() -> Result<()> {
    let router = create_router(static_service(quarter_payload(), "2024-03-31"));
    let (status, body) = get_json(router, "/api/transactions?end_date=2024-01-31").await?;

    assert_eq!(status, StatusCode::OK);
    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(
        records[0],
        json!({
            "id": "1",
            "description": "Retainer",
            "amount": 5000.0,
            "type": "income",
            "category": "Sales",
            "transaction_date": "2024-01-05"
        })
    );
    Ok(())
}

#[tokio::test]
async fn test_overflowing_amounts_return_500() -> Result<()> {
    let payload = json!([
        {"id": 1, "amount": "50000000000000000", "type": "income", "transaction_date": "2024-03-01"},
        {"id": 2, "amount": "50000000000000000", "type": "income", "transaction_date": "2024-03-02"}
    ]);
    let router = create_router(static_service(payload, "2024-03-31"));
    let (status, body) = get_json(router, "/api/dashboard").await?;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Failed to process transactions"}));
    Ok(())
}

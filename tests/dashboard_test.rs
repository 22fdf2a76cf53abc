mod common;

use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use common::{parse_date, quarter_payload, service_with, static_service};
use finboard::application::AppError;
use finboard::domain::DateRange;
use finboard::source::FileTransactionSource;
use serde_json::json;

#[tokio::test]
async fn test_quarter_summary() -> Result<()> {
    let service = static_service(quarter_payload(), "2024-03-31");
    let summary = service.summary(&DateRange::default()).await?;
    let m = &summary.metrics;

    assert_eq!(m.total_revenue, 1_800_000);
    assert_eq!(m.total_expenses, 500_000);
    assert_eq!(m.net_profit, 1_300_000);
    assert!((m.profit_margin - 1_300_000.0 / 1_800_000.0 * 100.0).abs() < 1e-9);

    // Previous window ends in February, current window ends in March
    assert!((m.revenue_growth - 700_000.0 / 1_100_000.0 * 100.0).abs() < 1e-9);
    assert!((m.expense_growth - 50_000.0 / 450_000.0 * 100.0).abs() < 1e-9);
    assert_eq!(m.profit_growth, 100.0);
    let previous_margin = 650_000.0 / 1_100_000.0 * 100.0;
    assert!((m.margin_growth - (m.profit_margin - previous_margin)).abs() < 1e-9);

    let labels: Vec<String> = summary
        .monthly_revenue
        .labels
        .iter()
        .map(|l| l.to_string())
        .collect();
    assert_eq!(labels.len(), 12);
    assert_eq!(labels[0], "2023-04");
    assert_eq!(labels[11], "2024-03");
    assert_eq!(&summary.monthly_revenue.data[9..], &[500_000, 600_000, 700_000]);
    assert_eq!(&summary.cash_flow.expenses[9..], &[200_000, 250_000, 50_000]);
    assert_eq!(&summary.cash_flow.profit[9..], &[300_000, 350_000, 650_000]);
    assert!(summary.cash_flow.profit[..9].iter().all(|p| *p == 0));

    let dist = &summary.expense_distribution;
    assert_eq!(dist.labels, vec!["Salaries", "Marketing", "Operations"]);
    assert_eq!(dist.data, vec![80.0, 10.0, 10.0]);

    Ok(())
}

#[tokio::test]
async fn test_filtered_summary_uses_first_seen_order() -> Result<()> {
    let service = static_service(quarter_payload(), "2024-03-31");
    let range = DateRange::new(Some(parse_date("2024-02-01")), Some(parse_date("2024-02-29")));
    let summary = service.summary(&range).await?;

    assert_eq!(summary.metrics.total_revenue, 600_000);
    assert_eq!(summary.metrics.total_expenses, 250_000);
    assert_eq!(summary.expense_distribution.labels, vec!["Marketing", "Salaries"]);
    assert_eq!(summary.expense_distribution.data, vec![20.0, 80.0]);

    // The window still ends at "today", not at the filter's end
    assert_eq!(summary.cash_flow.labels.last().unwrap().to_string(), "2024-03");
    assert_eq!(summary.monthly_revenue.data[11], 0);

    Ok(())
}

#[tokio::test]
async fn test_filter_excluding_all_records_is_all_zero() -> Result<()> {
    let service = static_service(quarter_payload(), "2024-03-31");
    let range = DateRange::new(Some(parse_date("2025-01-01")), None);
    let summary = service.summary(&range).await?;

    assert_eq!(summary.metrics.total_revenue, 0);
    assert_eq!(summary.metrics.profit_margin, 0.0);
    assert_eq!(summary.metrics.profit_growth, 0.0);
    assert_eq!(summary.monthly_revenue.data, vec![0; 12]);
    assert!(summary.expense_distribution.labels.is_empty());
    assert!(summary.expense_distribution.data.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_empty_payload() -> Result<()> {
    let service = static_service(json!([]), "2024-03-31");
    let summary = service.summary(&DateRange::default()).await?;

    let value = serde_json::to_value(&summary)?;
    assert_eq!(value["metrics"]["totalRevenue"], 0.0);
    assert_eq!(value["monthlyRevenue"]["data"], serde_json::to_value(vec![0.0; 12])?);
    assert_eq!(value["expenseDistribution"], json!({"labels": [], "data": []}));

    Ok(())
}

#[tokio::test]
async fn test_non_array_payload_is_fatal() -> Result<()> {
    let service = static_service(json!({"data": []}), "2024-03-31");
    let err = service.summary(&DateRange::default()).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidPayload(_)));

    Ok(())
}

#[tokio::test]
async fn test_summary_is_byte_identical_across_calls() -> Result<()> {
    let service = static_service(quarter_payload(), "2024-03-31");
    let first = serde_json::to_string(&service.summary(&DateRange::default()).await?)?;
    let second = serde_json::to_string(&service.summary(&DateRange::default()).await?)?;
    assert_eq!(first, second);

    Ok(())
}

#[tokio::test]
async fn test_csv_file_source() -> Result<()> {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile()?;
    writeln!(file, "id,description,amount,type,category,transaction_date")?;
    writeln!(file, "1,Invoice,1000.00,income,,2024-01-15")?;
    writeln!(file, "2,Rent,400.00,expense,Ops,2024-01-20")?;
    writeln!(file, "3,Broken,n/a,expense,Ops,2024-01-21")?;
    file.flush()?;

    let service = service_with(Arc::new(FileTransactionSource::new(file.path())), "2024-06-10");
    let summary = service.summary(&DateRange::default()).await?;

    assert_eq!(summary.metrics.total_revenue, 100_000);
    assert_eq!(summary.metrics.total_expenses, 40_000);
    assert_eq!(summary.metrics.net_profit, 60_000);
    assert_eq!(summary.metrics.profit_margin, 60.0);
    assert_eq!(summary.expense_distribution.labels, vec!["Ops"]);
    assert_eq!(summary.expense_distribution.data, vec![100.0]);

    Ok(())
}

#[tokio::test]
async fn test_concurrent_summaries_agree() -> Result<()> {
    let service = static_service(quarter_payload(), "2024-03-31");

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.summary(&DateRange::default()).await })
        })
        .collect();

    let expected = service.summary(&DateRange::default()).await?;
    for handle in handles {
        assert_eq!(handle.await??, expected);
    }

    Ok(())
}

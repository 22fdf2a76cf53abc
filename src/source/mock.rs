//! Built-in sample transactions, served with `--mock` when no backend is
//! available.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{Value, json};

use crate::application::{AppError, Clock};
use crate::domain::{DateRange, format_cents, trailing_months};

use super::TransactionSource;

/// Expense categories and their share of each month's spending, in percent.
const EXPENSE_MIX: [(&str, i64); 5] = [
    ("Operations", 30),
    ("Marketing", 25),
    ("Salaries", 20),
    ("Equipment", 15),
    ("Other", 10),
];

/// A year of steadily growing revenue with a fixed expense mix, ending at
/// the month of `today`. The output only depends on `today`.
pub fn sample_transactions(today: NaiveDate) -> Value {
    let mut rows = Vec::new();
    let mut next_id = 1;

    for (i, month) in trailing_months(today, 12).into_iter().enumerate() {
        let step = i as i64;
        let revenue = 9_500_000 + step * 750_000;
        let spending = 6_500_000 + step * 500_000;

        let day = |d: u32| format!("{}-{:02}", month, d);

        rows.push(json!({
            "id": next_id,
            "description": format!("Sales {}", month),
            "amount": format_amount(revenue),
            "type": "income",
            "category": "Sales",
            "transaction_date": day(3),
        }));
        next_id += 1;

        for (n, (category, share)) in EXPENSE_MIX.iter().enumerate() {
            rows.push(json!({
                "id": next_id,
                "description": format!("{} {}", category, month),
                "amount": format_amount(spending * share / 100),
                "type": "expense",
                "category": category,
                "transaction_date": day(8 + 4 * n as u32),
            }));
            next_id += 1;
        }
    }

    Value::Array(rows)
}

/// Backend-style decimal string, without thousands separators.
fn format_amount(cents: i64) -> String {
    format_cents(cents).replace(',', "")
}

/// Serves [`sample_transactions`] for the clock's current date.
#[derive(Debug, Clone, Default)]
pub struct MockTransactionSource {
    clock: Clock,
}

impl MockTransactionSource {
    pub fn new(clock: Clock) -> Self {
        Self { clock }
    }
}

#[async_trait]
impl TransactionSource for MockTransactionSource {
    async fn fetch(&self, _range: &DateRange) -> Result<Value, AppError> {
        Ok(sample_transactions(self.clock.today()))
    }

    fn describe(&self) -> String {
        "built-in sample data".to_string()
    }
}

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use super::{Cents, ParseCentsError, cents_from_units, parse_cents, parse_date, serialize_units};

/// Category used for expenses that arrive without one.
pub const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" => Some(TransactionKind::Income),
            "expense" => Some(TransactionKind::Expense),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single validated income or expense event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionRecord {
    /// Opaque upstream identifier
    pub id: String,
    pub description: Option<String>,
    /// Amount in cents (never negative)
    #[serde(serialize_with = "serialize_units")]
    pub amount: Cents,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub category: String,
    pub transaction_date: NaiveDate,
}

impl TransactionRecord {
    pub fn new(
        id: impl Into<String>,
        kind: TransactionKind,
        amount: Cents,
        transaction_date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            description: None,
            amount,
            kind,
            category: UNCATEGORIZED.to_string(),
            transaction_date,
        }
    }

    pub fn income(id: impl Into<String>, amount: Cents, transaction_date: NaiveDate) -> Self {
        Self::new(id, TransactionKind::Income, amount, transaction_date)
    }

    pub fn expense(
        id: impl Into<String>,
        amount: Cents,
        category: impl Into<String>,
        transaction_date: NaiveDate,
    ) -> Self {
        Self::new(id, TransactionKind::Expense, amount, transaction_date).with_category(category)
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        let category = category.into();
        self.category = if category.trim().is_empty() {
            UNCATEGORIZED.to_string()
        } else {
            category
        };
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }
}

/// Why a single upstream record was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordError {
    /// Position of the record in the upstream array
    pub index: usize,
    pub field: Option<String>,
    pub error: String,
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "record {}: {}: {}", self.index, field, self.error),
            None => write!(f, "record {}: {}", self.index, self.error),
        }
    }
}

/// Outcome of validating an upstream payload. Malformed records are kept
/// out of `records` and reported in `rejected`.
#[derive(Debug, Clone, Default)]
pub struct ParsedTransactions {
    pub records: Vec<TransactionRecord>,
    pub rejected: Vec<RecordError>,
}

/// The upstream payload is not an array of records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedPayload(pub String);

impl fmt::Display for MalformedPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected an array of transactions, got {}", self.0)
    }
}

impl std::error::Error for MalformedPayload {}

/// Validate an upstream JSON payload into transaction records.
///
/// A payload that is not an array is fatal. Inside the array each record
/// needs a numeric, non-negative `amount`, a `type` of income or expense,
/// and a parseable `transaction_date`; records failing any of these are
/// dropped and reported.
pub fn parse_transactions(payload: &Value) -> Result<ParsedTransactions, MalformedPayload> {
    let items = payload
        .as_array()
        .ok_or_else(|| MalformedPayload(json_type_name(payload).to_string()))?;

    let mut parsed = ParsedTransactions::default();
    for (index, item) in items.iter().enumerate() {
        match parse_record(index, item) {
            Ok(record) => parsed.records.push(record),
            Err(error) => parsed.rejected.push(error),
        }
    }
    Ok(parsed)
}

fn parse_record(index: usize, item: &Value) -> Result<TransactionRecord, RecordError> {
    let reject = |field: Option<&str>, error: String| RecordError {
        index,
        field: field.map(str::to_string),
        error,
    };

    let object = item
        .as_object()
        .ok_or_else(|| reject(None, format!("expected an object, got {}", json_type_name(item))))?;

    let id = match object.get("id") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };

    let amount = match object.get("amount") {
        Some(Value::Number(n)) => number_to_cents(n),
        Some(Value::String(s)) => parse_cents(s),
        _ => return Err(reject(Some("amount"), "missing or not numeric".into())),
    }
    .map_err(|e| reject(Some("amount"), e.to_string()))?;
    if amount < 0 {
        return Err(reject(Some("amount"), "amount must not be negative".into()));
    }

    let kind = object
        .get("type")
        .and_then(Value::as_str)
        .and_then(TransactionKind::from_str)
        .ok_or_else(|| reject(Some("type"), "must be 'income' or 'expense'".into()))?;

    let transaction_date = object
        .get("transaction_date")
        .and_then(Value::as_str)
        .ok_or_else(|| reject(Some("transaction_date"), "missing".into()))
        .and_then(|raw| {
            parse_date(raw).map_err(|e| reject(Some("transaction_date"), e.to_string()))
        })?;

    let mut record = TransactionRecord::new(id, kind, amount, transaction_date);
    if let Some(category) = object.get("category").and_then(Value::as_str) {
        record = record.with_category(category);
    }
    if let Some(description) = object.get("description").and_then(Value::as_str) {
        record = record.with_description(description);
    }
    Ok(record)
}

/// Whole numbers convert exactly. Fractions go through their decimal text;
/// floats serde_json prints in exponent form (`1e16`, `1e-6`) fall back to
/// float arithmetic.
fn number_to_cents(n: &Number) -> Result<Cents, ParseCentsError> {
    if let Some(units) = n.as_i64() {
        return units.checked_mul(100).ok_or(ParseCentsError::Overflow);
    }
    parse_cents(&n.to_string()).or_else(|_| {
        n.as_f64()
            .ok_or(ParseCentsError::InvalidFormat)
            .and_then(cents_from_units)
    })
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

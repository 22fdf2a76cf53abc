use std::sync::Arc;

use chrono::{Local, NaiveDate};

use crate::domain::{DateRange, TransactionRecord, parse_transactions};
use crate::source::TransactionSource;

use super::{AppError, DashboardSummary, aggregate};

/// Where "today" comes from when building the trailing twelve months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Clock {
    /// The local calendar date at call time
    #[default]
    System,
    /// A pinned date, for reproducible output
    Fixed(NaiveDate),
}

impl Clock {
    pub fn today(&self) -> NaiveDate {
        match self {
            Clock::System => Local::now().date_naive(),
            Clock::Fixed(date) => *date,
        }
    }
}

/// Application service producing dashboard data from a transaction source.
/// This is the interface shared by the HTTP server and the CLI.
pub struct DashboardService {
    source: Arc<dyn TransactionSource>,
    clock: Clock,
}

impl DashboardService {
    pub fn new(source: Arc<dyn TransactionSource>) -> Self {
        Self {
            source,
            clock: Clock::System,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn source_description(&self) -> String {
        self.source.describe()
    }

    /// Fetch and validate transactions, keeping those inside `range`.
    pub async fn transactions(&self, range: &DateRange) -> Result<Vec<TransactionRecord>, AppError> {
        let mut records = self.load(range).await?;
        records.retain(|r| range.contains(r.transaction_date));
        Ok(records)
    }

    /// Fetch transactions and aggregate them into a dashboard summary.
    pub async fn summary(&self, range: &DateRange) -> Result<DashboardSummary, AppError> {
        let records = self.load(range).await?;
        let today = self.today();
        let summary = aggregate(&records, range, today)?;

        tracing::info!(
            records = records.len(),
            %today,
            total_revenue = summary.metrics.total_revenue,
            total_expenses = summary.metrics.total_expenses,
            "Built dashboard summary"
        );
        Ok(summary)
    }

    async fn load(&self, range: &DateRange) -> Result<Vec<TransactionRecord>, AppError> {
        let payload = self.source.fetch(range).await?;
        let parsed = parse_transactions(&payload)?;

        for rejected in &parsed.rejected {
            tracing::warn!("Dropping malformed transaction: {}", rejected);
        }
        tracing::debug!(
            accepted = parsed.records.len(),
            rejected = parsed.rejected.len(),
            "Validated transactions from {}",
            self.source.describe()
        );

        Ok(parsed.records)
    }
}

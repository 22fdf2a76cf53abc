use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{
    AmountOverflow, Cents, DateRange, MonthKey, TransactionKind, TransactionRecord, add_cents,
    serialize_units, serialize_units_seq, sub_cents, trailing_months,
};

/// Number of calendar months in every time series.
pub const SERIES_MONTHS: usize = 12;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub metrics: Metrics,
    pub monthly_revenue: MonthlySeries,
    pub cash_flow: CashFlowSeries,
    pub expense_distribution: ExpenseDistribution,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    #[serde(serialize_with = "serialize_units")]
    pub total_revenue: Cents,
    #[serde(serialize_with = "serialize_units")]
    pub total_expenses: Cents,
    #[serde(serialize_with = "serialize_units")]
    pub net_profit: Cents,
    pub profit_margin: f64,
    pub revenue_growth: f64,
    pub expense_growth: f64,
    pub profit_growth: f64,
    pub margin_growth: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySeries {
    pub labels: Vec<MonthKey>,
    #[serde(serialize_with = "serialize_units_seq")]
    pub data: Vec<Cents>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashFlowSeries {
    pub labels: Vec<MonthKey>,
    #[serde(serialize_with = "serialize_units_seq")]
    pub revenue: Vec<Cents>,
    #[serde(serialize_with = "serialize_units_seq")]
    pub expenses: Vec<Cents>,
    /// Per-month revenue minus expenses (not cumulative)
    #[serde(serialize_with = "serialize_units_seq")]
    pub profit: Vec<Cents>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ExpenseDistribution {
    pub labels: Vec<String>,
    /// Share of total expenses, in percent
    pub data: Vec<f64>,
}

impl ExpenseDistribution {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl DashboardSummary {
    /// All-zero summary: twelve zero-valued months and no distribution.
    pub fn empty(today: NaiveDate) -> Self {
        let labels = trailing_months(today, SERIES_MONTHS);
        let zeros = vec![0; labels.len()];
        Self {
            metrics: Metrics {
                total_revenue: 0,
                total_expenses: 0,
                net_profit: 0,
                profit_margin: 0.0,
                revenue_growth: 0.0,
                expense_growth: 0.0,
                profit_growth: 0.0,
                margin_growth: 0.0,
            },
            monthly_revenue: MonthlySeries {
                labels: labels.clone(),
                data: zeros.clone(),
            },
            cash_flow: CashFlowSeries {
                labels,
                revenue: zeros.clone(),
                expenses: zeros.clone(),
                profit: zeros,
            },
            expense_distribution: ExpenseDistribution::default(),
        }
    }
}

/// Revenue and expense sums for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MonthBucket {
    month: MonthKey,
    revenue: Cents,
    expenses: Cents,
}

impl MonthBucket {
    fn profit(&self) -> Result<Cents, AmountOverflow> {
        sub_cents(self.revenue, self.expenses)
    }
}

/// Aggregate transaction records into a dashboard summary.
///
/// The monthly series always cover the twelve calendar months ending at the
/// month of `today`, whatever dates the records span. Records outside that
/// window still count toward the overall totals. Every zero denominator
/// yields a zero rate. Fails only when a sum does not fit in `Cents`.
pub fn aggregate(
    records: &[TransactionRecord],
    range: &DateRange,
    today: NaiveDate,
) -> Result<DashboardSummary, AmountOverflow> {
    let retained: Vec<&TransactionRecord> = records
        .iter()
        .filter(|r| range.contains(r.transaction_date))
        .collect();

    if retained.is_empty() {
        return Ok(DashboardSummary::empty(today));
    }

    let total_revenue = sum_kind(&retained, TransactionKind::Income)?;
    let total_expenses = sum_kind(&retained, TransactionKind::Expense)?;
    let net_profit = sub_cents(total_revenue, total_expenses)?;
    let profit_margin = percent_of(net_profit, total_revenue);

    let buckets = bucket_by_month(&retained, today)?;

    // Two overlapping eleven-month windows, offset by one month.
    let previous = &buckets[..buckets.len() - 1];
    let current = &buckets[1..];
    let (previous_revenue, previous_expenses) = window_sums(previous)?;
    let (current_revenue, current_expenses) = window_sums(current)?;
    let previous_net = sub_cents(previous_revenue, previous_expenses)?;
    let current_net = sub_cents(current_revenue, current_expenses)?;

    // A negative previous net flips the sign of profit growth; kept as is.
    let metrics = Metrics {
        total_revenue,
        total_expenses,
        net_profit,
        profit_margin,
        revenue_growth: percent_of(
            sub_cents(current_revenue, previous_revenue)?,
            previous_revenue,
        ),
        expense_growth: percent_of(
            sub_cents(current_expenses, previous_expenses)?,
            previous_expenses,
        ),
        profit_growth: percent_of(sub_cents(current_net, previous_net)?, previous_net),
        margin_growth: if previous_revenue == 0 {
            0.0
        } else {
            profit_margin - percent_of(previous_net, previous_revenue)
        },
    };

    let labels: Vec<MonthKey> = buckets.iter().map(|b| b.month).collect();
    let revenue: Vec<Cents> = buckets.iter().map(|b| b.revenue).collect();
    let profit = buckets
        .iter()
        .map(MonthBucket::profit)
        .collect::<Result<Vec<Cents>, _>>()?;

    Ok(DashboardSummary {
        metrics,
        monthly_revenue: MonthlySeries {
            labels: labels.clone(),
            data: revenue.clone(),
        },
        cash_flow: CashFlowSeries {
            labels,
            revenue,
            expenses: buckets.iter().map(|b| b.expenses).collect(),
            profit,
        },
        expense_distribution: expense_distribution(&retained, total_expenses)?,
    })
}

fn sum_kind(
    records: &[&TransactionRecord],
    kind: TransactionKind,
) -> Result<Cents, AmountOverflow> {
    records
        .iter()
        .filter(|r| r.kind == kind)
        .try_fold(0, |total, r| add_cents(total, r.amount))
}

/// `part / whole * 100`, or 0 when `whole` is 0.
fn percent_of(part: Cents, whole: Cents) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

fn bucket_by_month(
    records: &[&TransactionRecord],
    today: NaiveDate,
) -> Result<Vec<MonthBucket>, AmountOverflow> {
    let mut buckets: Vec<MonthBucket> = trailing_months(today, SERIES_MONTHS)
        .into_iter()
        .map(|month| MonthBucket {
            month,
            revenue: 0,
            expenses: 0,
        })
        .collect();

    for record in records {
        let month = MonthKey::of(record.transaction_date);
        // Months are sorted, so a binary search finds the slot.
        if let Ok(slot) = buckets.binary_search_by(|b| b.month.cmp(&month)) {
            let bucket = &mut buckets[slot];
            let slot_total = match record.kind {
                TransactionKind::Income => &mut bucket.revenue,
                TransactionKind::Expense => &mut bucket.expenses,
            };
            *slot_total = add_cents(*slot_total, record.amount)?;
        }
    }

    Ok(buckets)
}

fn window_sums(window: &[MonthBucket]) -> Result<(Cents, Cents), AmountOverflow> {
    window.iter().try_fold((0, 0), |(revenue, expenses), b| {
        Ok((add_cents(revenue, b.revenue)?, add_cents(expenses, b.expenses)?))
    })
}

/// Per-category share of `total_expenses`, in first-seen category order.
fn expense_distribution(
    records: &[&TransactionRecord],
    total_expenses: Cents,
) -> Result<ExpenseDistribution, AmountOverflow> {
    let mut totals: Vec<(&str, Cents)> = Vec::new();
    for record in records.iter().filter(|r| r.is_expense()) {
        match totals.iter_mut().find(|(name, _)| *name == record.category) {
            Some((_, total)) => *total = add_cents(*total, record.amount)?,
            None => totals.push((record.category.as_str(), record.amount)),
        }
    }

    Ok(ExpenseDistribution {
        labels: totals.iter().map(|(name, _)| name.to_string()).collect(),
        data: totals
            .iter()
            .map(|(_, amount)| percent_of(*amount, total_expenses))
            .collect(),
    })
}

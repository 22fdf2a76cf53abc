use std::fmt;
use std::io::Write;

use anyhow::Result;

use crate::application::DashboardSummary;
use crate::domain::{DateRange, cents_to_units, format_cents};

/// Render the summary as the terminal dashboard: metric cards, the monthly
/// cash-flow table and the expense distribution.
pub fn render_table(summary: &DashboardSummary, range: &DateRange) -> Result<String> {
    let mut out = String::new();
    write_table(&mut out, summary, range)?;
    Ok(out)
}

fn write_table(
    out: &mut impl fmt::Write,
    summary: &DashboardSummary,
    range: &DateRange,
) -> fmt::Result {
    let m = &summary.metrics;
    let months = &summary.cash_flow.labels;

    writeln!(out, "Financial Dashboard")?;
    if let (Some(first), Some(last)) = (months.first(), months.last()) {
        writeln!(out, "Months: {} to {}", first.short_label(), last.short_label())?;
    }
    writeln!(out, "Filter: {}", describe_range(range))?;
    writeln!(out)?;

    writeln!(
        out,
        "Total Revenue:   {:>18}  {}",
        format_cents(m.total_revenue),
        signed_percent(m.revenue_growth)
    )?;
    writeln!(
        out,
        "Total Expenses:  {:>18}  {}",
        format_cents(m.total_expenses),
        signed_percent(m.expense_growth)
    )?;
    writeln!(
        out,
        "Net Profit:      {:>18}  {}",
        format_cents(m.net_profit),
        signed_percent(m.profit_growth)
    )?;
    writeln!(
        out,
        "Profit Margin:   {:>17.1}%  {:+.1} pts",
        m.profit_margin, m.margin_growth
    )?;
    writeln!(out)?;

    writeln!(
        out,
        "{:<10} {:>16} {:>16} {:>16}",
        "MONTH", "REVENUE", "EXPENSES", "PROFIT"
    )?;
    writeln!(out, "{}", "-".repeat(61))?;
    let flow = &summary.cash_flow;
    for (i, month) in months.iter().enumerate() {
        writeln!(
            out,
            "{:<10} {:>16} {:>16} {:>16}",
            month.short_label(),
            format_cents(flow.revenue[i]),
            format_cents(flow.expenses[i]),
            format_cents(flow.profit[i])
        )?;
    }

    writeln!(out)?;
    writeln!(out, "Expense Distribution")?;
    let distribution = &summary.expense_distribution;
    if distribution.is_empty() {
        writeln!(out, "  (no expenses)")?;
    }
    for (label, share) in distribution.labels.iter().zip(&distribution.data) {
        writeln!(out, "  {:<20} {:>6.1}%", truncate(label, 20), share)?;
    }

    Ok(())
}

/// Write the monthly cash flow as CSV, amounts in decimal units.
pub fn write_csv<W: Write>(summary: &DashboardSummary, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["month", "revenue", "expenses", "profit"])?;

    let flow = &summary.cash_flow;
    for (i, month) in flow.labels.iter().enumerate() {
        csv_writer.write_record([
            month.to_string(),
            format!("{:.2}", cents_to_units(flow.revenue[i])),
            format!("{:.2}", cents_to_units(flow.expenses[i])),
            format!("{:.2}", cents_to_units(flow.profit[i])),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

fn describe_range(range: &DateRange) -> String {
    match (range.start, range.end) {
        (None, None) => "all dates".to_string(),
        (Some(start), None) => format!("from {}", start),
        (None, Some(end)) => format!("until {}", end),
        (Some(start), Some(end)) => format!("{} to {}", start, end),
    }
}

fn signed_percent(value: f64) -> String {
    format!("{:+.1}%", value)
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

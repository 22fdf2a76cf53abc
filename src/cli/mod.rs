mod render;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Args, Parser, Subcommand};

use crate::application::{Clock, DashboardService};
use crate::domain::{DateRange, parse_date};
use crate::server::run_server;
use crate::source::{
    FileTransactionSource, HttpTransactionSource, TransactionSource, mock::MockTransactionSource,
};

pub use render::{render_table, write_csv};

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000/api/transactions";

/// Finboard - Financial Metrics Dashboard
#[derive(Parser)]
#[command(name = "finboard")]
#[command(about = "Revenue, expense and profit metrics over the trailing twelve months")]
#[command(version)]
pub struct Cli {
    /// Backend endpoint returning the transaction array
    #[arg(
        long,
        global = true,
        env = "FINBOARD_BACKEND_URL",
        default_value = DEFAULT_BACKEND_URL
    )]
    pub backend_url: String,

    /// Read transactions from a JSON or CSV file instead of the backend
    #[arg(long, global = true, conflicts_with = "mock")]
    pub input: Option<PathBuf>,

    /// Use built-in sample transactions instead of the backend
    #[arg(long, global = true)]
    pub mock: bool,

    /// Pin the current date (YYYY-MM-DD) that ends the twelve-month window
    #[arg(long, global = true)]
    pub today: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the dashboard API over HTTP
    Serve {
        /// Address to listen on
        #[arg(long, env = "FINBOARD_HOST", default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on
        #[arg(short, long, env = "FINBOARD_PORT", default_value = "3000")]
        port: u16,
    },

    /// Print the dashboard summary once
    Summary {
        #[command(flatten)]
        range: RangeArgs,

        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Redraw the dashboard periodically until interrupted
    Watch {
        #[command(flatten)]
        range: RangeArgs,

        /// Seconds between refreshes
        #[arg(short, long, env = "FINBOARD_REFRESH_SECS", default_value = "30")]
        interval: u64,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct RangeArgs {
    /// Only include transactions on or after this date (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<String>,

    /// Only include transactions on or before this date (YYYY-MM-DD)
    #[arg(long)]
    pub end_date: Option<String>,
}

impl RangeArgs {
    pub fn range(&self) -> Result<DateRange> {
        DateRange::parse(self.start_date.as_deref(), self.end_date.as_deref())
            .context("Dates must be in YYYY-MM-DD format")
    }
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let clock = self.clock()?;
        let service = Arc::new(DashboardService::new(self.source(clock)?).with_clock(clock));

        match self.command {
            Commands::Serve { host, port } => {
                run_server(service, &host, port).await?;
            }

            Commands::Summary { range, format } => {
                let range = range.range()?;
                let summary = service.summary(&range).await?;

                match format.as_str() {
                    "json" => {
                        println!("{}", serde_json::to_string_pretty(&summary)?);
                    }
                    "csv" => {
                        write_csv(&summary, std::io::stdout().lock())?;
                    }
                    _ => {
                        print!("{}", render_table(&summary, &range)?);
                    }
                }
            }

            Commands::Watch { range, interval } => {
                let range = range.range()?;
                run_watch(&service, &range, Duration::from_secs(interval.max(1))).await?;
            }
        }

        Ok(())
    }

    fn clock(&self) -> Result<Clock> {
        match &self.today {
            Some(date_str) => {
                let date = parse_date(date_str)
                    .with_context(|| format!("Invalid --today '{}'. Use YYYY-MM-DD", date_str))?;
                Ok(Clock::Fixed(date))
            }
            None => Ok(Clock::System),
        }
    }

    fn source(&self, clock: Clock) -> Result<Arc<dyn TransactionSource>> {
        if self.mock {
            return Ok(Arc::new(MockTransactionSource::new(clock)));
        }
        if let Some(path) = &self.input {
            return Ok(Arc::new(FileTransactionSource::new(path)));
        }
        Ok(Arc::new(HttpTransactionSource::new(&self.backend_url)?))
    }
}

/// Fetch, aggregate and redraw on every tick. A failed refresh is reported
/// and the loop carries on.
async fn run_watch(service: &DashboardService, range: &DateRange, every: Duration) -> Result<()> {
    let mut ticker = tokio::time::interval(every);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                // Clear the screen and move the cursor home.
                print!("\x1b[2J\x1b[H");
                match service.summary(range).await {
                    Ok(summary) => print!("{}", render_table(&summary, range)?),
                    Err(e) => {
                        tracing::error!("Refresh failed: {}", e);
                        println!("Failed to load dashboard data: {}", e);
                    }
                }
                println!();
                println!(
                    "Updated {} - refreshing every {}s, Ctrl-C to quit",
                    Local::now().format("%H:%M:%S"),
                    every.as_secs()
                );
            }
            result = &mut shutdown => {
                result.context("Failed to listen for Ctrl-C")?;
                break;
            }
        }
    }

    Ok(())
}

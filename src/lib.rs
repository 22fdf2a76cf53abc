pub mod application;
pub mod cli;
pub mod domain;
pub mod logging;
pub mod server;
pub mod source;

pub use application::{DashboardService, DashboardSummary, aggregate};
pub use domain::*;

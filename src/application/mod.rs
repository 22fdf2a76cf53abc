// Application layer: aggregation and the service that feeds it.
// The HTTP server and the CLI both go through `DashboardService`, so the
// summary is computed in exactly one place.

pub mod dashboard;
pub mod error;
pub mod service;

pub use dashboard::*;
pub use error::*;
pub use service::*;

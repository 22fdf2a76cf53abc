mod money;
mod period;
mod transaction;

pub use money::*;
pub use period::*;
pub use transaction::*;

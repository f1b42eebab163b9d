pub mod metrics;
pub mod region;
pub mod types;

pub use metrics::*;
pub use region::*;
pub use types::*;

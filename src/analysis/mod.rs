pub mod aggregator;
pub mod pipeline;

pub use aggregator::{accumulate, is_filtered, ContributionAggregator};
pub use pipeline::ContributionRun;

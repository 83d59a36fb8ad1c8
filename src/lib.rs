pub mod config;
pub mod error;
pub mod models;
pub mod github;
pub mod analysis;
pub mod export;
pub mod report;

pub use config::{Config, RunConfig};
pub use error::{Error, Result};
pub use github::{IssueSearch, SearchClient, SearchKind, SearchQuery};
pub use analysis::{ContributionAggregator, ContributionRun};
pub use export::export_csv;

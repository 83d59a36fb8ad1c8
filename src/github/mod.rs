pub mod client;
pub mod paginator;
pub mod query;

pub use client::{IssueSearch, SearchClient};
pub use paginator::Paginator;
pub use query::{SearchKind, SearchQuery};

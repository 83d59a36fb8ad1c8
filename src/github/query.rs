//! Search query construction for the `search/issues` endpoint.
//!
//! See <https://docs.github.com/en/search-github/searching-on-github/searching-issues-and-pull-requests>
//! for the qualifier syntax.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound used when a date range has no end.
const OPEN_RANGE_END: &str = "*";

/// Qualifiers joined by spaces; the transport URL-encodes them into `a+b+c`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchQuery(String);

impl SearchQuery {
    fn from_qualifiers(qualifiers: &[String]) -> Self {
        Self(qualifiers.join(" "))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn qualifiers(&self) -> impl Iterator<Item = &str> {
        self.0.split(' ')
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn created_range(start: &str, end: Option<&str>) -> String {
    let end = end
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .unwrap_or(OPEN_RANGE_END);
    format!("created:{}..{}", start, end)
}

/// Merged PRs authored by `user` in repositories owned by `organization`.
pub fn merged_prs_query(user: &str, organization: &str, start: &str, end: Option<&str>) -> SearchQuery {
    SearchQuery::from_qualifiers(&[
        format!("author:{}", user),
        "is:pr".to_string(),
        "is:merged".to_string(),
        format!("user:{}", organization),
        created_range(start, end),
    ])
}

/// PRs reviewed by `user`, whoever authored them.
pub fn reviewed_prs_query(user: &str, organization: &str, start: &str, end: Option<&str>) -> SearchQuery {
    SearchQuery::from_qualifiers(&[
        "is:pr".to_string(),
        format!("reviewed-by:{}", user),
        format!("user:{}", organization),
        created_range(start, end),
    ])
}

/// Closed issues that `user` *created*.
///
/// This does not find issues the user closed but did not author: the search
/// API has no "closed-by" qualifier, so the query keys on `author:`.
pub fn closed_issues_query(user: &str, organization: &str, start: &str, end: Option<&str>) -> SearchQuery {
    SearchQuery::from_qualifiers(&[
        format!("author:{}", user),
        "is:issue".to_string(),
        "is:closed".to_string(),
        format!("user:{}", organization),
        created_range(start, end),
    ])
}

/// Issues created by `user`, in any state.
pub fn opened_issues_query(user: &str, organization: &str, start: &str, end: Option<&str>) -> SearchQuery {
    SearchQuery::from_qualifiers(&[
        format!("author:{}", user),
        "is:issue".to_string(),
        format!("user:{}", organization),
        created_range(start, end),
    ])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SearchKind {
    MergedPrs,
    ReviewedPrs,
    OpenedIssues,
    ClosedIssues,
}

impl SearchKind {
    pub fn build(&self, user: &str, organization: &str, start: &str, end: Option<&str>) -> SearchQuery {
        match self {
            SearchKind::MergedPrs => merged_prs_query(user, organization, start, end),
            SearchKind::ReviewedPrs => reviewed_prs_query(user, organization, start, end),
            SearchKind::OpenedIssues => opened_issues_query(user, organization, start, end),
            SearchKind::ClosedIssues => closed_issues_query(user, organization, start, end),
        }
    }
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchKind::MergedPrs => write!(f, "merged PRs"),
            SearchKind::ReviewedPrs => write!(f, "reviewed PRs"),
            SearchKind::OpenedIssues => write!(f, "opened issues"),
            SearchKind::ClosedIssues => write!(f, "closed issues"),
        }
    }
}

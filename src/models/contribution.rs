use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::item::ResultItem;
use crate::github::SearchKind;

/// Count of retained items keyed by `repository_url`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepositoryTally(BTreeMap<String, usize>);

impl RepositoryTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, repository_url: &str) {
        *self.0.entry(repository_url.to_string()).or_insert(0) += 1;
    }

    pub fn get(&self, repository_url: &str) -> usize {
        self.0.get(repository_url).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(repo, count)| (repo.as_str(), *count))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserContribution {
    pub user: String,
    /// Items the search returned before label filtering.
    pub found: usize,
    pub retained: usize,
    pub by_repository: RepositoryTally,
    pub items: Vec<ResultItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub kind: SearchKind,
    pub organization: String,
    pub users: Vec<UserContribution>,
    pub team: RepositoryTally,
    pub generated_at: DateTime<Utc>,
}

impl RunResult {
    pub fn total_found(&self) -> usize {
        self.users.iter().map(|u| u.found).sum()
    }

    pub fn total_retained(&self) -> usize {
        self.users.iter().map(|u| u.retained).sum()
    }

    /// Retained items of every user, in query order.
    pub fn items(&self) -> impl Iterator<Item = &ResultItem> {
        self.users.iter().flat_map(|u| u.items.iter())
    }

    pub fn is_team_run(&self) -> bool {
        self.users.len() > 1
    }
}

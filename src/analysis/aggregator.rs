use chrono::Utc;
use std::collections::HashSet;

use crate::github::SearchKind;
use crate::models::{RepositoryTally, ResultItem, RunResult, UserContribution};

/// True when `item` carries at least one label listed in `excluded`.
/// Items without labels are never filtered.
pub fn is_filtered(item: &ResultItem, excluded: &HashSet<String>) -> bool {
    if excluded.is_empty() {
        return false;
    }
    item.label_names().any(|name| excluded.contains(name))
}

/// Counts every unfiltered item against its repository in both tallies and
/// returns how many items were kept.
pub fn accumulate(
    items: &[ResultItem],
    excluded: &HashSet<String>,
    per_user: &mut RepositoryTally,
    team: &mut RepositoryTally,
) -> usize {
    let kept: Vec<&ResultItem> = items
        .iter()
        .filter(|item| !is_filtered(item, excluded))
        .collect();
    tally(kept.iter().copied(), per_user, team);
    kept.len()
}

fn tally<'a>(
    items: impl IntoIterator<Item = &'a ResultItem>,
    per_user: &mut RepositoryTally,
    team: &mut RepositoryTally,
) {
    for item in items {
        per_user.increment(&item.repository_url);
        team.increment(&item.repository_url);
    }
}

/// Folds each user's search results into per-user and team-wide tallies.
pub struct ContributionAggregator {
    excluded: HashSet<String>,
    team: RepositoryTally,
    users: Vec<UserContribution>,
}

impl ContributionAggregator {
    pub fn new<I, S>(exclude_labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            excluded: exclude_labels.into_iter().map(Into::into).collect(),
            team: RepositoryTally::new(),
            users: Vec::new(),
        }
    }

    pub fn add_user(&mut self, user: &str, items: Vec<ResultItem>) -> &UserContribution {
        let found = items.len();
        let (kept, filtered): (Vec<ResultItem>, Vec<ResultItem>) = items
            .into_iter()
            .partition(|item| !is_filtered(item, &self.excluded));
        if !filtered.is_empty() {
            tracing::debug!("Filtered {} items for {} by label", filtered.len(), user);
        }

        let mut by_repository = RepositoryTally::new();
        tally(&kept, &mut by_repository, &mut self.team);

        self.users.push(UserContribution {
            user: user.to_string(),
            found,
            retained: kept.len(),
            by_repository,
            items: kept,
        });

        &self.users[self.users.len() - 1]
    }

    pub fn finish(self, kind: SearchKind, organization: &str) -> RunResult {
        RunResult {
            kind,
            organization: organization.to_string(),
            users: self.users,
            team: self.team,
            generated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Label;

    fn item(number: u64, repo: &str, labels: Option<Vec<&str>>) -> ResultItem {
        ResultItem {
            title: format!("Item {}", number),
            url: format!("https://api.github.com/repos/o3de/{}/issues/{}", repo, number),
            repository_url: format!("https://api.github.com/repos/o3de/{}", repo),
            number,
            labels: labels.map(|names| {
                names
                    .iter()
                    .map(|n| Label { name: n.to_string() })
                    .collect()
            }),
            html_url: None,
            state: None,
        }
    }

    fn labels(names: &[&str]) -> HashSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_is_filtered() {
        let excluded = labels(&["wontfix"]);
        assert!(is_filtered(&item(1, "a", Some(vec!["bug", "wontfix"])), &excluded));
        assert!(!is_filtered(&item(2, "a", Some(vec!["bug"])), &excluded));
        assert!(!is_filtered(&item(3, "a", Some(vec![])), &excluded));
        assert!(!is_filtered(&item(4, "a", None), &excluded));
        assert!(!is_filtered(&item(5, "a", Some(vec!["wontfix"])), &HashSet::new()));
    }

    #[test]
    fn test_accumulate_without_exclusions_keeps_everything() {
        let items = vec![
            item(1, "o3de", Some(vec!["wontfix"])),
            item(2, "o3de", None),
            item(3, "sig-build", None),
        ];
        let mut per_user = RepositoryTally::new();
        let mut team = RepositoryTally::new();

        let retained = accumulate(&items, &HashSet::new(), &mut per_user, &mut team);

        assert_eq!(retained, 3);
        assert_eq!(per_user.total(), items.len());
        assert_eq!(per_user, team);
    }

    #[test]
    fn test_accumulate_skips_excluded_label() {
        let items = vec![item(1, "o3de", Some(vec!["wontfix"])), item(2, "sig-build", None)];
        let mut per_user = RepositoryTally::new();
        let mut team = RepositoryTally::new();

        let retained = accumulate(&items, &labels(&["wontfix"]), &mut per_user, &mut team);

        assert_eq!(retained, 1);
        assert_eq!(per_user.get("https://api.github.com/repos/o3de/o3de"), 0);
        assert_eq!(team.get("https://api.github.com/repos/o3de/o3de"), 0);
        assert_eq!(team.get("https://api.github.com/repos/o3de/sig-build"), 1);
    }

    #[test]
    fn test_team_tally_is_sum_of_users() {
        let mut aggregator = ContributionAggregator::new(["wontfix"]);
        aggregator.add_user(
            "alice",
            vec![item(1, "o3de", None), item(2, "o3de", None), item(3, "sig-build", None)],
        );
        aggregator.add_user(
            "bob",
            vec![item(4, "o3de", Some(vec!["wontfix"])), item(5, "sig-build", None)],
        );
        aggregator.add_user("carol", vec![item(6, "o3de-extras", Some(vec!["docs"]))]);

        let result = aggregator.finish(SearchKind::MergedPrs, "o3de");

        for (repo, count) in result.team.iter() {
            let summed: usize = result.users.iter().map(|u| u.by_repository.get(repo)).sum();
            assert_eq!(count, summed, "{}", repo);
        }
        assert_eq!(result.team.get("https://api.github.com/repos/o3de/o3de"), 2);
        assert_eq!(result.total_found(), 6);
        assert_eq!(result.total_retained(), 5);
        assert_eq!(result.users[1].found, 2);
        assert_eq!(result.users[1].retained, 1);
        assert_eq!(result.users[1].items.len(), 1);
        assert_eq!(result.users[1].items[0].number, 5);
        assert_eq!(result.items().count(), result.total_retained());
        assert!(result.is_team_run());
    }

    #[test]
    fn test_retained_items_keep_order() {
        let mut aggregator = ContributionAggregator::new(Vec::<String>::new());
        aggregator.add_user("alice", vec![item(2, "a", None), item(1, "b", None)]);
        aggregator.add_user("bob", vec![item(3, "a", None)]);

        let result = aggregator.finish(SearchKind::OpenedIssues, "o3de");
        let numbers: Vec<u64> = result.items().map(|i| i.number).collect();
        assert_eq!(numbers, vec![2, 1, 3]);
    }
}

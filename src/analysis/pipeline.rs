use indicatif::{ProgressBar, ProgressStyle};

use crate::analysis::aggregator::ContributionAggregator;
use crate::config::RunConfig;
use crate::error::Result;
use crate::github::IssueSearch;
use crate::models::RunResult;

/// Runs one search per team member, strictly one after another, and folds
/// the results into a [`RunResult`].
pub struct ContributionRun<S> {
    search: S,
    config: RunConfig,
}

impl<S: IssueSearch> ContributionRun<S> {
    pub fn new(search: S, config: RunConfig) -> Self {
        Self { search, config }
    }

    /// Any search failure aborts the run; nothing is kept for the user whose
    /// search was in flight.
    pub async fn run(&self) -> Result<RunResult> {
        let config = &self.config;
        let mut aggregator = ContributionAggregator::new(config.exclude_labels.iter().cloned());

        let pb = self.progress_bar();

        for user in &config.members {
            pb.set_message(user.clone());

            let query = config.kind.build(
                user,
                &config.organization,
                &config.range_start,
                config.range_end.as_deref(),
            );
            let items = self.search.search(&query).await?;
            tracing::info!("{} {} found for {}", items.len(), config.kind, user);

            let contribution = aggregator.add_user(user, items);
            tracing::debug!(
                "{}: {} retained across {} repositories",
                user,
                contribution.retained,
                contribution.by_repository.len()
            );

            pb.inc(1);
        }

        pb.finish_and_clear();
        Ok(aggregator.finish(config.kind, &config.organization))
    }

    fn progress_bar(&self) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(self.config.members.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} members {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb
    }
}

use chrono::{DateTime, Utc};
use interfaces_github_stargazers::{FetchStarCountError, GitHubGraphQLClient, RepositoryRef, StarCount};
use interfaces_slack_webhook::{SendMessageError, SlackWebhookClient};
use thiserror::Error;
use tracing::info;

use crate::message::format_star_message;
use crate::policy::NotificationPolicy;
use crate::retry::{with_retry, RetryPolicy};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("FetchStarCount: {source}")]
    FetchStarCount {
        #[from]
        source: FetchStarCountError,
    },

    #[error("SendMessage: {source}")]
    SendMessage {
        #[from]
        source: SendMessageError,
    },
}

/// How a single run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Notified { stars: StarCount },
    Skipped { stars: StarCount },
}

impl RunOutcome {
    pub fn stars(&self) -> StarCount {
        match self {
            Self::Notified { stars } | Self::Skipped { stars } => *stars,
        }
    }
}

/// One repository, one GitHub client, one Slack webhook.
///
/// Runs share nothing, so a job can be run repeatedly.
#[derive(Debug, Clone)]
pub struct StargazersJob {
    pub repository: RepositoryRef,
    pub github: GitHubGraphQLClient,
    pub slack: SlackWebhookClient,
    pub policy: NotificationPolicy,
    pub retry: RetryPolicy,
}

impl StargazersJob {
    pub async fn run(&self) -> Result<RunOutcome, RunError> {
        self.run_at(Utc::now()).await
    }

    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<RunOutcome, RunError> {
        let repository = &self.repository;

        let stars = with_retry(&self.retry, || self.github.fetch_star_count(repository)).await?;

        info!(%repository, stars, "fetched star count");

        if !self.policy.should_notify(stars, &now) {
            info!(%repository, stars, %now, "nothing to announce");
            return Ok(RunOutcome::Skipped { stars });
        }

        let message = format_star_message(repository, stars);

        self.slack.send(&message).await?;

        info!(%repository, stars, "announced star count");
        Ok(RunOutcome::Notified { stars })
    }
}

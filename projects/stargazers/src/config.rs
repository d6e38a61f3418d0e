//! Command-line and environment configuration.
//!
//! Every flag falls back to an environment variable, so the binary can run
//! from a scheduler that only injects env. `dotenvy` loads `.env` first (see
//! `main`). Secrets are read from `GITHUB_AUTH_TOKEN` and
//! `STARGAZERS_SLACK_WEBHOOK_TOKEN` and are hidden from `--help`.

use std::num::NonZeroU64;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use interfaces_github_stargazers::{
    ApiToken, ApiTokenError, FetchStarCountError, GitHubGraphQLClient, RepositoryRef,
    GITHUB_GRAPHQL_ENDPOINT,
};
use interfaces_slack_webhook::{SendMessageError, SlackWebhookClient, WebhookUrl, WebhookUrlError};
use thiserror::Error;

use crate::pipeline::StargazersJob;
use crate::policy::{NotificationPolicy, NotificationWindow, NotificationWindowError};
use crate::retry::RetryPolicy;
use crate::schedule::Schedule;

#[derive(Debug, Parser)]
#[command(name = "stargazers", version, about = "Announce GitHub star milestones on Slack")]
pub struct Cli {
    /// Tracing filter used when RUST_LOG is unset
    #[arg(long, env = "STARGAZERS_LOG", default_value = utils_trace::DEFAULT_LEVEL, global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch, decide and notify once, then exit
    Run(JobArgs),
    /// Repeat `run` on a fixed interval
    Watch(WatchArgs),
}

#[derive(Debug, Clone, Args)]
pub struct JobArgs {
    /// Repository name
    #[arg(long, env = "STARGAZERS_REPOSITORY", default_value = "prefect")]
    pub repository: String,

    /// Repository owner
    #[arg(long, env = "STARGAZERS_OWNER", default_value = "PrefectHQ")]
    pub owner: String,

    /// GitHub token sent as a bearer credential
    #[arg(long, env = "GITHUB_AUTH_TOKEN", hide_env_values = true)]
    pub github_token: String,

    /// Slack incoming-webhook URL
    #[arg(long, env = "STARGAZERS_SLACK_WEBHOOK_TOKEN", hide_env_values = true)]
    pub slack_webhook: String,

    #[arg(long, env = "STARGAZERS_GRAPHQL_ENDPOINT", default_value = GITHUB_GRAPHQL_ENDPOINT)]
    pub graphql_endpoint: String,

    /// Per-request timeout for both GitHub and Slack
    #[arg(long, env = "STARGAZERS_TIMEOUT_SECS", default_value = "10")]
    pub timeout_secs: NonZeroU64,

    /// Extra attempts when fetching the star count fails
    #[arg(long, env = "STARGAZERS_FETCH_RETRIES", default_value_t = crate::retry::DEFAULT_MAX_RETRIES)]
    pub fetch_retries: u32,

    #[arg(long, env = "STARGAZERS_RETRY_DELAY_SECS", default_value_t = 60)]
    pub retry_delay_secs: u64,

    /// Announce every time the count is a multiple of this
    #[arg(long, env = "STARGAZERS_MILESTONE", default_value = "1000")]
    pub milestone: NonZeroU64,

    /// Hour (UTC) of the daily announcement window
    #[arg(long, env = "STARGAZERS_WINDOW_HOUR", default_value_t = crate::policy::DEFAULT_WINDOW_HOUR)]
    pub window_hour: u32,

    /// Width of the daily window in minutes, starting on the hour
    #[arg(long, env = "STARGAZERS_WINDOW_MINUTES", default_value_t = crate::policy::DEFAULT_WINDOW_MINUTES)]
    pub window_minutes: u32,
}

#[derive(Debug, Clone, Args)]
pub struct WatchArgs {
    #[command(flatten)]
    pub job: JobArgs,

    #[arg(long, env = "STARGAZERS_INTERVAL_SECS", default_value_t = 300)]
    pub interval_secs: u64,

    /// Also run on Saturdays and Sundays
    #[arg(long, env = "STARGAZERS_INCLUDE_WEEKENDS")]
    pub include_weekends: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("ApiToken: {source}")]
    ApiToken {
        #[from]
        source: ApiTokenError,
    },

    #[error("WebhookUrl: {source}")]
    WebhookUrl {
        #[from]
        source: WebhookUrlError,
    },

    #[error("NotificationWindow: {source}")]
    NotificationWindow {
        #[from]
        source: NotificationWindowError,
    },

    #[error("GitHubClient: {source}")]
    GitHubClient {
        #[from]
        source: FetchStarCountError,
    },

    #[error("SlackClient: {source}")]
    SlackClient {
        #[from]
        source: SendMessageError,
    },

    #[error("{field} must not be empty")]
    Blank { field: &'static str },

    #[error("interval must be at least one second")]
    ZeroInterval,
}

impl JobArgs {
    pub fn repository_ref(&self) -> Result<RepositoryRef, ConfigError> {
        let owner = self.owner.trim();
        let name = self.repository.trim();
        if owner.is_empty() {
            return Err(ConfigError::Blank { field: "owner" });
        }
        if name.is_empty() {
            return Err(ConfigError::Blank { field: "repository" });
        }
        Ok(RepositoryRef::new(owner, name))
    }

    pub fn policy(&self) -> Result<NotificationPolicy, ConfigError> {
        let window = NotificationWindow::new(self.window_hour, self.window_minutes)?;
        Ok(NotificationPolicy::new(self.milestone, window))
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.fetch_retries,
            delay: Duration::from_secs(self.retry_delay_secs),
        }
    }

    /// Validates everything before any request is made.
    pub fn build_job(&self) -> Result<StargazersJob, ConfigError> {
        let timeout = Duration::from_secs(self.timeout_secs.get());
        let token = ApiToken::new(&self.github_token)?;
        let webhook = WebhookUrl::new(&self.slack_webhook)?;

        Ok(StargazersJob {
            repository: self.repository_ref()?,
            github: GitHubGraphQLClient::new(token, self.graphql_endpoint.clone(), timeout)?,
            slack: SlackWebhookClient::new(webhook, timeout)?,
            policy: self.policy()?,
            retry: self.retry_policy(),
        })
    }
}

impl WatchArgs {
    pub fn schedule(&self) -> Result<Schedule, ConfigError> {
        if self.interval_secs == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(Schedule {
            interval: Duration::from_secs(self.interval_secs),
            weekdays_only: !self.include_weekends,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRETS: [&str; 4] = [
        "--github-token",
        "ghp_test",
        "--slack-webhook",
        "https://hooks.slack.com/services/T0/B0/x",
    ];

    fn parse(args: &[&str]) -> Cli {
        let argv = ["stargazers"].iter().chain(args).chain(SECRETS.iter());
        Cli::try_parse_from(argv).unwrap()
    }

    fn job(cli: Cli) -> JobArgs {
        match cli.command {
            Command::Run(job) => job,
            Command::Watch(watch) => watch.job,
        }
    }

    #[test]
    fn run_defaults_track_prefect() {
        let args = job(parse(&["run"]));

        assert_eq!(
            args.repository_ref().unwrap(),
            RepositoryRef::new("PrefectHQ", "prefect")
        );
        assert_eq!(args.graphql_endpoint, GITHUB_GRAPHQL_ENDPOINT);
        assert_eq!(args.retry_policy(), RetryPolicy::default());
        assert_eq!(args.policy().unwrap(), NotificationPolicy::default());
        assert_eq!(args.timeout_secs.get(), 10);
    }

    #[test]
    fn watch_defaults_to_five_minutes_on_weekdays() {
        let Command::Watch(watch) = parse(&["watch"]).command else {
            panic!("expected watch");
        };
        assert_eq!(watch.schedule().unwrap(), Schedule::default());
    }

    #[test]
    fn zero_milestone_is_rejected_by_the_parser() {
        let argv = ["stargazers", "run", "--milestone", "0"]
            .iter()
            .chain(SECRETS.iter());
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[test]
    fn zero_timeout_is_rejected_by_the_parser() {
        let argv = ["stargazers", "run", "--timeout-secs", "0"]
            .iter()
            .chain(SECRETS.iter());
        assert!(Cli::try_parse_from(argv).is_err());

        let args = job(parse(&["run", "--timeout-secs", "3"]));
        assert_eq!(args.timeout_secs.get(), 3);
    }

    #[test]
    fn blank_owner_and_bad_window_fail_validation() {
        let args = job(parse(&["run", "--owner", "  "]));
        assert!(matches!(
            args.repository_ref(),
            Err(ConfigError::Blank { field: "owner" })
        ));

        let args = job(parse(&["run", "--window-hour", "25"]));
        assert!(matches!(
            args.policy(),
            Err(ConfigError::NotificationWindow { .. })
        ));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let Command::Watch(watch) = parse(&["watch", "--interval-secs", "0"]).command else {
            panic!("expected watch");
        };
        assert!(matches!(watch.schedule(), Err(ConfigError::ZeroInterval)));
    }

    #[tokio::test]
    async fn build_job_wires_clients() {
        let job = job(parse(&["run", "--owner", "octo", "--repository", "hello"]))
            .build_job()
            .unwrap();

        assert_eq!(job.repository.to_string(), "octo/hello");
        assert_eq!(job.github.endpoint(), GITHUB_GRAPHQL_ENDPOINT);
    }
}

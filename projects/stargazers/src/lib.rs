//! Star milestone notifier for a single GitHub repository
//!
//! - `policy`: decides whether a star count is worth announcing
//! - `message`: builds the Slack announcement
//! - `pipeline`: fetch, decide, format, send
//! - `retry` / `schedule`: fixed-delay retries and the weekday interval clock
//! - `config`: CLI flags and env vars (secrets come from GITHUB_AUTH_TOKEN and
//!   STARGAZERS_SLACK_WEBHOOK_TOKEN)

pub mod config;
pub mod message;
pub mod pipeline;
pub mod policy;
pub mod retry;
pub mod schedule;

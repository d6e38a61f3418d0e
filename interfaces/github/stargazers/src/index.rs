use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::repository::{ApiToken, RepositoryRef};

pub const GITHUB_GRAPHQL_ENDPOINT: &str = "https://api.github.com/graphql";

const USER_AGENT: &str = concat!("stargazers-notifier/", env!("CARGO_PKG_VERSION"));

const STARGAZERS_QUERY: &str = r#"
    query Stargazers($repository: String!, $owner: String!) {
        repository(name: $repository, owner: $owner) {
            stargazers {
                totalCount
            }
        }
    }
"#;

/// Total number of stargazers at fetch time.
pub type StarCount = u64;

#[derive(Debug, Deserialize)]
struct GraphQLResponse {
    data: Option<ResponseData>,
    #[serde(default)]
    errors: Vec<GraphQLError>,
}

#[derive(Debug, Deserialize)]
struct ResponseData {
    repository: Option<RepositoryNode>,
}

#[derive(Debug, Deserialize)]
struct RepositoryNode {
    stargazers: Option<StargazerConnection>,
}

#[derive(Debug, Deserialize)]
struct StargazerConnection {
    #[serde(rename = "totalCount")]
    total_count: StarCount,
}

#[derive(Debug, Deserialize)]
struct GraphQLError {
    message: String,
}

#[derive(Debug, Error)]
pub enum FetchStarCountError {
    #[error("BuildClient: {source}")]
    BuildClient { source: reqwest::Error },

    #[error("RequestSend: {source}")]
    RequestSend { source: reqwest::Error },

    #[error("ResponseRead: {source}")]
    ResponseRead { source: reqwest::Error },

    #[error("UnexpectedStatus: {status}: {body}")]
    UnexpectedStatus { status: StatusCode, body: String },

    #[error("DeserializeResponseBody: {source}")]
    DeserializeResponseBody {
        #[from]
        source: serde_json::Error,
    },

    #[error("GraphQLErrors: {messages}")]
    GraphQLErrors { messages: String },

    #[error("Missing repository.stargazers.totalCount in GraphQL response")]
    StargazersFieldMissing,
}

impl FetchStarCountError {
    /// The endpoint could not be reached or answered with a failure status.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::RequestSend { .. } | Self::ResponseRead { .. } | Self::UnexpectedStatus { .. }
        )
    }

    /// The endpoint answered, but not with the shape we asked for.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::DeserializeResponseBody { .. }
                | Self::GraphQLErrors { .. }
                | Self::StargazersFieldMissing
        )
    }
}

/// Issues the stargazer count query against a GraphQL endpoint.
///
/// Performs exactly one request per call; retrying is left to the caller.
#[derive(Debug, Clone)]
pub struct GitHubGraphQLClient {
    http: Client,
    endpoint: String,
    token: ApiToken,
}

impl GitHubGraphQLClient {
    pub fn new(
        token: ApiToken,
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, FetchStarCountError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| FetchStarCountError::BuildClient { source })?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
            token,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn fetch_star_count(
        &self,
        repository: &RepositoryRef,
    ) -> Result<StarCount, FetchStarCountError> {
        let payload = serde_json::json!({
            "query": STARGAZERS_QUERY,
            "variables": {
                "repository": repository.name,
                "owner": repository.owner,
            }
        });

        debug!(%repository, endpoint = %self.endpoint, "querying stargazer count");

        let response = self
            .http
            .post(&self.endpoint)
            .header("Authorization", format!("bearer {}", self.token.expose()))
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|source| FetchStarCountError::RequestSend {
                source: source.without_url(),
            })?;

        let status = response.status();

        let body = response
            .text()
            .await
            .map_err(|source| FetchStarCountError::ResponseRead {
                source: source.without_url(),
            })?;

        if !status.is_success() {
            return Err(FetchStarCountError::UnexpectedStatus { status, body });
        }

        parse_star_count(&body)
    }
}

fn parse_star_count(body: &str) -> Result<StarCount, FetchStarCountError> {
    let parsed: GraphQLResponse = serde_json::from_str(body)?;

    let total_count = parsed
        .data
        .and_then(|data| data.repository)
        .and_then(|repository| repository.stargazers)
        .map(|stargazers| stargazers.total_count);

    match total_count {
        Some(count) => Ok(count),
        None if !parsed.errors.is_empty() => Err(FetchStarCountError::GraphQLErrors {
            messages: parsed
                .errors
                .into_iter()
                .map(|error| error.message)
                .collect::<Vec<_>>()
                .join("; "),
        }),
        None => Err(FetchStarCountError::StargazersFieldMissing),
    }
}

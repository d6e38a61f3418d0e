//! GitHub GraphQL access for repository star counts
//!
//! - `index`: the stargazer count query and its client
//! - `repository`: repository identity and the API bearer token

pub mod index;
pub mod repository;

pub use index::{FetchStarCountError, GitHubGraphQLClient, StarCount, GITHUB_GRAPHQL_ENDPOINT};
pub use repository::{ApiToken, ApiTokenError, RepositoryRef};

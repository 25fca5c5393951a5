#![allow(non_snake_case)]

use std::collections::HashMap;

use anyhow::{Context, anyhow};
use chrono::DateTime;
use gql_client::{Client, GraphQLError};
use log::{debug, info, warn};
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    FetchedRepository, FetcherRateLimit, OwnerRepositoriesRequest, PinnedRepositoriesRequest,
    Repository, RepositoryFetcher, Request, Response, StdResult,
};

const USER_AGENT: &str = "github-showcase";

const PINNED_REPOSITORIES_QUERY: &str = r#"
query ($login: String!, $first: Int!) {
  user(login: $login) {
    pinnedItems(first: $first, types: REPOSITORY) {
      nodes {
        ... on Repository {
          name
          description
          url
          stargazerCount
          forkCount
          owner {
            login
          }
          primaryLanguage {
            name
          }
        }
      }
    }
  }
  rateLimit {
    limit
    cost
    remaining
    resetAt
  }
}
"#;

/// Fetcher error
#[derive(Error, Debug)]
pub enum FetcherError {
    /// Parse error
    #[error("Parsing error: {0}")]
    Parse(String),
    /// Remote error
    #[error("Remote error: {0}")]
    Remote(String),
    /// Unexpected HTTP status
    #[error("Unexpected HTTP status {status} for {url}")]
    Status { status: u16, url: String },
    /// The account does not exist
    #[error("Unknown GitHub account: {0}")]
    UnknownAccount(String),
}

impl From<GraphQLError> for FetcherError {
    fn from(error: GraphQLError) -> Self {
        let message = error.message().to_string();
        match message.contains("Failed to parse response") {
            true => FetcherError::Parse(message),
            false => FetcherError::Remote(message),
        }
    }
}

#[derive(Deserialize, Debug)]
struct PinnedQueryData {
    user: Option<User>,
    rateLimit: Option<RateLimit>,
}

#[derive(Deserialize, Debug)]
struct User {
    pinnedItems: PinnedItems,
}

#[derive(Deserialize, Debug)]
struct PinnedItems {
    nodes: Vec<Option<PinnedRepositoryNode>>,
}

#[derive(Deserialize, Debug)]
struct PinnedRepositoryNode {
    name: String,
    description: Option<String>,
    url: String,
    stargazerCount: u32,
    forkCount: u32,
    owner: Owner,
    primaryLanguage: Option<Language>,
}

#[derive(Deserialize, Debug)]
struct Owner {
    login: String,
}

#[derive(Deserialize, Debug)]
struct Language {
    name: String,
}

#[derive(Deserialize, Debug)]
struct RateLimit {
    limit: i32,
    cost: i32,
    remaining: i32,
    resetAt: String,
}

impl From<RateLimit> for FetcherRateLimit {
    fn from(rate_limit: RateLimit) -> Self {
        Self {
            limit: rate_limit.limit,
            cost: rate_limit.cost,
            remaining: rate_limit.remaining,
            reset_at: rate_limit.resetAt,
        }
    }
}

impl From<PinnedRepositoryNode> for FetchedRepository {
    fn from(node: PinnedRepositoryNode) -> Self {
        FetchedRepository::new(
            Repository::new(
                &node.name,
                node.description.as_deref(),
                &node.owner.login,
                node.primaryLanguage.as_ref().map(|language| language.name.as_str()),
                node.stargazerCount,
                node.forkCount,
                &node.url,
            )
            .pinned(true),
        )
    }
}

/// A repository as listed by the REST API
#[derive(Deserialize, Debug)]
struct RestRepository {
    name: String,
    description: Option<String>,
    owner: Owner,
    language: Option<String>,
    #[serde(default)]
    stargazers_count: u32,
    #[serde(default)]
    forks_count: u32,
    html_url: String,
    #[serde(default)]
    fork: bool,
    #[serde(default)]
    archived: bool,
}

impl From<RestRepository> for FetchedRepository {
    fn from(repository: RestRepository) -> Self {
        Self {
            repository: Repository::new(
                &repository.name,
                repository.description.as_deref(),
                &repository.owner.login,
                repository.language.as_deref(),
                repository.stargazers_count,
                repository.forks_count,
                &repository.html_url,
            ),
            is_fork: repository.fork,
            is_archived: repository.archived,
        }
    }
}

/// The variables of the pinned items GraphQL query
#[derive(Debug, Serialize)]
struct GraphQlPinnedQuery {
    /// The account login.
    pub(super) login: String,
    /// The number of pinned items to return.
    pub(super) first: u16,
}

impl From<&PinnedRepositoriesRequest> for GraphQlPinnedQuery {
    fn from(request: &PinnedRepositoriesRequest) -> Self {
        Self {
            login: request.login.to_owned(),
            first: request.first,
        }
    }
}

fn header_value<T: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
}

/// Reads the `x-ratelimit-*` headers of a REST response.
fn rate_limit_from_headers(headers: &HeaderMap) -> Option<FetcherRateLimit> {
    let limit = header_value::<i32>(headers, "x-ratelimit-limit")?;
    let remaining = header_value::<i32>(headers, "x-ratelimit-remaining")?;
    let reset_at = header_value::<i64>(headers, "x-ratelimit-reset")
        .and_then(|reset| DateTime::from_timestamp(reset, 0))
        .map(|reset| reset.to_rfc3339())
        .unwrap_or_default();

    Some(FetcherRateLimit {
        limit,
        cost: 1,
        remaining,
        reset_at,
    })
}

/// Fetches repository data from the GitHub GraphQL (pinned items) and REST (owner listing) APIs.
pub struct GitHubFetcher {
    graphql_client: Client,
    http_client: reqwest::Client,
    rest_endpoint: String,
    github_token: Option<String>,
}

impl GitHubFetcher {
    /// Creates a new `GitHubFetcher`, authenticated when a token is given.
    pub fn try_new(
        graphql_endpoint: &str,
        rest_endpoint: &str,
        github_token: Option<&str>,
    ) -> StdResult<Self> {
        let mut headers = HashMap::from([("User-Agent".to_string(), USER_AGENT.to_string())]);
        if let Some(github_token) = github_token {
            headers.insert("Authorization".to_string(), format!("Bearer {github_token}"));
        }
        let graphql_client = Client::new_with_headers(graphql_endpoint, headers);
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .with_context(|| "Failed to build the HTTP client")?;

        Ok(Self {
            graphql_client,
            http_client,
            rest_endpoint: rest_endpoint.trim_end_matches('/').to_string(),
            github_token: github_token.map(str::to_string),
        })
    }

    async fn fetch_pinned_repositories(
        &self,
        request: &PinnedRepositoriesRequest,
    ) -> StdResult<Response> {
        let fetched_data = self
            .graphql_client
            .query_with_vars_unwrap::<PinnedQueryData, GraphQlPinnedQuery>(
                PINNED_REPOSITORIES_QUERY,
                request.into(),
            )
            .await
            .map_err(|e| anyhow!(FetcherError::from(e)))?;
        let user = fetched_data
            .user
            .ok_or_else(|| FetcherError::UnknownAccount(request.login.to_owned()))?;
        let rate_limit = fetched_data.rateLimit.map(FetcherRateLimit::from);
        if let Some(rate_limit) = &rate_limit {
            info!("GraphQL {rate_limit}");
        }

        Ok(Response::new(
            user.pinnedItems
                .nodes
                .into_iter()
                .flatten()
                .map(FetchedRepository::from)
                .collect(),
            rate_limit,
        ))
    }

    async fn fetch_owner_repositories(
        &self,
        request: &OwnerRepositoriesRequest,
    ) -> StdResult<Response> {
        let url = format!("{}/users/{}/repos", self.rest_endpoint, request.login);
        let mut request_builder = self.http_client.get(&url).query(&[
            ("per_page", request.per_page.to_string()),
            ("sort", "updated".to_string()),
            ("type", "owner".to_string()),
        ]);
        if let Some(github_token) = &self.github_token {
            request_builder = request_builder.bearer_auth(github_token);
        }
        let response = request_builder
            .send()
            .await
            .map_err(|e| FetcherError::Remote(e.to_string()))?;

        let rate_limit = rate_limit_from_headers(response.headers());
        match &rate_limit {
            Some(rate_limit) if rate_limit.is_exhausted() => warn!("REST {rate_limit}"),
            Some(rate_limit) => info!("REST {rate_limit}"),
            None => debug!("No rate limit headers for {url}"),
        }
        let status = response.status();
        if !status.is_success() {
            return Err(FetcherError::Status {
                status: status.as_u16(),
                url,
            }
            .into());
        }
        let repositories = response
            .json::<Vec<RestRepository>>()
            .await
            .map_err(|e| FetcherError::Parse(e.to_string()))?;

        Ok(Response::new(
            repositories
                .into_iter()
                .map(FetchedRepository::from)
                .collect(),
            rate_limit,
        ))
    }
}

#[async_trait::async_trait]
impl RepositoryFetcher for GitHubFetcher {
    async fn fetch(&self, request: &Request) -> StdResult<Response> {
        match request {
            Request::PinnedRepositories(request) => self.fetch_pinned_repositories(request).await,
            Request::OwnerRepositories(request) => self.fetch_owner_repositories(request).await,
        }
    }
}

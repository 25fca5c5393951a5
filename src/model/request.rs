use std::fmt::Display;

use serde::Serialize;

/// A request to the GitHub API
#[derive(Debug, Serialize, PartialEq, Eq, Clone, Hash)]
pub enum Request {
    /// A request to fetch the pinned repositories of an account (GraphQL API).
    PinnedRepositories(PinnedRepositoriesRequest),

    /// A request to fetch the repositories owned by an account (REST API).
    OwnerRepositories(OwnerRepositoriesRequest),
}

impl Request {
    /// Creates a dummy `PinnedRepositories` request for testing purposes.
    #[cfg(test)]
    pub(crate) fn dummy_pinned_repositories() -> Self {
        Self::PinnedRepositories(PinnedRepositoriesRequest::new("octocat", 6))
    }

    /// Creates a dummy `OwnerRepositories` request for testing purposes.
    #[cfg(test)]
    pub(crate) fn dummy_owner_repositories() -> Self {
        Self::OwnerRepositories(OwnerRepositoriesRequest::new("octocat", 30))
    }
}

impl Display for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Request::PinnedRepositories(request) => write!(f, "{request}"),
            Request::OwnerRepositories(request) => write!(f, "{request}"),
        }
    }
}

/// A pinned items request being made to the GitHub GraphQL API
#[derive(Debug, Serialize, PartialEq, Eq, Clone, Hash)]
pub struct PinnedRepositoriesRequest {
    /// The account login.
    pub(crate) login: String,

    /// The number of pinned items to return.
    pub(crate) first: u16,
}

impl PinnedRepositoriesRequest {
    /// Creates a new `PinnedRepositoriesRequest` with the given login and first values.
    pub fn new(login: &str, first: u16) -> Self {
        Self {
            login: login.to_string(),
            first,
        }
    }
}

impl Display for PinnedRepositoriesRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PinnedRepositoriesRequest: login={}, first={}",
            self.login, self.first
        )
    }
}

/// An owner repositories request being made to the GitHub REST API, most recently updated first
#[derive(Debug, Serialize, PartialEq, Eq, Clone, Hash)]
pub struct OwnerRepositoriesRequest {
    /// The account login.
    pub(crate) login: String,

    /// The number of candidate repositories to return.
    pub(crate) per_page: u16,
}

impl OwnerRepositoriesRequest {
    /// Creates a new `OwnerRepositoriesRequest` with the given login and page size.
    pub fn new(login: &str, per_page: u16) -> Self {
        Self {
            login: login.to_string(),
            per_page,
        }
    }
}

impl Display for OwnerRepositoriesRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "OwnerRepositoriesRequest: login={}, per_page={}",
            self.login, self.per_page
        )
    }
}

use super::{FetchedRepository, FetcherRateLimit};

/// A response containing the repositories returned by one GitHub source.
#[derive(Debug, PartialEq, Eq)]
pub struct Response {
    /// Retrieved repositories, in the order returned by the API
    pub(crate) repositories: Vec<FetchedRepository>,

    /// The API rate limit information, when the source reports it
    pub(crate) rate_limit: Option<FetcherRateLimit>,
}

impl Response {
    /// Creates a new `Response` instance with the given repositories.
    pub fn new(repositories: Vec<FetchedRepository>, rate_limit: Option<FetcherRateLimit>) -> Self {
        Self {
            repositories,
            rate_limit,
        }
    }

    /// Retrieves the list of repositories.
    pub fn repositories(&self) -> &[FetchedRepository] {
        &self.repositories
    }

    /// Consumes the response and returns its repositories.
    pub fn into_repositories(self) -> Vec<FetchedRepository> {
        self.repositories
    }

    /// Retrieves the API rate limit information.
    pub fn rate_limit(&self) -> Option<&FetcherRateLimit> {
        self.rate_limit.as_ref()
    }
}

use std::{fmt::Display, ops::Deref, time::Duration};

use serde::{Deserialize, Serialize};

/// Placeholder used when a repository has no description.
pub const DEFAULT_DESCRIPTION: &str = "No description available";

/// Placeholder used when GitHub reports no primary language.
pub const DEFAULT_LANGUAGE: &str = "Unknown";

/// The name of a repository.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RepositoryName(pub String);

impl RepositoryName {
    /// Returns the key used to compare names across sources (case-insensitive).
    pub fn dedup_key(&self) -> String {
        self.0.to_lowercase()
    }
}

impl Deref for RepositoryName {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for RepositoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A normalized GitHub repository, as displayed by the carousel.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    /// The name of the repository.
    name: RepositoryName,

    /// The description, or a placeholder.
    description: String,

    /// The login of the repository owner.
    author: String,

    /// The primary language, or `Unknown`.
    language: String,

    /// The number of stars the repository has.
    stars: u32,

    /// The number of forks the repository has.
    forks: u32,

    /// The absolute link to the repository page.
    url: String,

    /// Whether the repository comes from the pinned items of the owner.
    is_pinned: bool,
}

impl Repository {
    /// Creates a new `Repository`, applying the placeholders for missing fields.
    pub fn new(
        name: &str,
        description: Option<&str>,
        author: &str,
        language: Option<&str>,
        stars: u32,
        forks: u32,
        url: &str,
    ) -> Self {
        Self {
            name: RepositoryName(name.to_string()),
            description: description
                .filter(|description| !description.trim().is_empty())
                .unwrap_or(DEFAULT_DESCRIPTION)
                .to_string(),
            author: author.to_string(),
            language: language.unwrap_or(DEFAULT_LANGUAGE).to_string(),
            stars,
            forks,
            url: url.to_string(),
            is_pinned: false,
        }
    }

    /// Returns the same repository flagged as pinned (or not).
    pub fn pinned(mut self, is_pinned: bool) -> Self {
        self.is_pinned = is_pinned;
        self
    }

    /// Retrieves the repository name.
    pub fn name(&self) -> &RepositoryName {
        &self.name
    }

    /// Retrieves the description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Retrieves the owner login.
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Retrieves the primary language.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Retrieves the stars counter.
    pub fn stars(&self) -> u32 {
        self.stars
    }

    /// Retrieves the forks counter.
    pub fn forks(&self) -> u32 {
        self.forks
    }

    /// Retrieves the repository page URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Whether the repository is pinned.
    pub fn is_pinned(&self) -> bool {
        self.is_pinned
    }

    /// Creates a dummy `Repository` for testing purposes.
    #[cfg(test)]
    pub(crate) fn dummy(name: &str) -> Self {
        Self::new(
            name,
            Some("A dummy repository"),
            "octocat",
            Some("Rust"),
            1,
            0,
            &format!("https://github.com/octocat/{name}"),
        )
    }
}

impl Display for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Repository: {}, Author: {}, Language: {}, Stars: {}, Forks: {}, Pinned: {}",
            self.name, self.author, self.language, self.stars, self.forks, self.is_pinned
        )
    }
}

/// A repository as returned by a source, before selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedRepository {
    /// The normalized repository.
    pub repository: Repository,

    /// Whether the repository is a fork.
    pub is_fork: bool,

    /// Whether the repository is archived.
    pub is_archived: bool,
}

impl FetchedRepository {
    /// Creates a `FetchedRepository` which is neither a fork nor archived.
    pub fn new(repository: Repository) -> Self {
        Self {
            repository,
            is_fork: false,
            is_archived: false,
        }
    }

    /// Whether the repository may be featured in the showcase.
    pub fn is_showcase_candidate(&self) -> bool {
        !self.is_fork && !self.is_archived
    }
}

/// The timestamped payload stored by the repository cache.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CacheEnvelope {
    /// The cached repositories.
    pub data: Vec<Repository>,

    /// The time of the write, in milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl CacheEnvelope {
    /// Creates a new envelope stamped with the given time.
    pub fn new(data: Vec<Repository>, timestamp: i64) -> Self {
        Self { data, timestamp }
    }

    /// Whether the envelope is still fresh at `now` (epoch millis).
    pub fn is_valid_at(&self, now: i64, cache_duration: Duration) -> bool {
        let max_age = i64::try_from(cache_duration.as_millis()).unwrap_or(i64::MAX);

        now.saturating_sub(self.timestamp) < max_age
    }
}

/// A fetcher API rate limit
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct FetcherRateLimit {
    /// The maximum number of requests that can be made in a given time period.
    pub limit: i32,
    /// The cost of the current request.
    pub cost: i32,
    /// The remaining number of requests that can be made in the current time period.
    pub remaining: i32,
    /// The time at which the rate limit will reset.
    pub reset_at: String,
}

impl FetcherRateLimit {
    /// Whether no request is left in the current period.
    pub fn is_exhausted(&self) -> bool {
        self.limit > 0 && self.remaining <= 0
    }

    #[cfg(test)]
    /// Creates a dummy `FetcherRateLimit` instance for testing purposes.
    pub fn dummy() -> Self {
        Self {
            limit: 5000,
            cost: 1,
            remaining: 4999,
            reset_at: "2025-01-01T00:00:00Z".to_string(),
        }
    }
}

impl Display for FetcherRateLimit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "RateLimit: calls={}/{} (+{}), reset={}",
            self.limit - self.remaining,
            self.limit,
            self.cost,
            self.reset_at
        )
    }
}

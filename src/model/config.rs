use std::{path::PathBuf, time::Duration};

/// The GraphQL production endpoint for GitHub.
pub const GITHUB_GRAPHQL_ENDPOINT: &str = "https://api.github.com/graphql";

/// The REST production endpoint for GitHub.
pub const GITHUB_REST_ENDPOINT: &str = "https://api.github.com";

/// The account showcased when none is configured.
pub const DEFAULT_GITHUB_LOGIN: &str = "octocat";

/// The key under which the repository cache envelope is stored.
pub const CACHE_KEY: &str = "github_repos_cache";

/// The showcase configuration, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowcaseConfig {
    /// The account whose repositories are showcased.
    pub github_login: String,

    /// Optional token sent as a bearer `Authorization` header.
    pub github_token: Option<String>,

    /// The GraphQL endpoint used for pinned items.
    pub graphql_endpoint: String,

    /// The REST endpoint used for the owner repositories listing.
    pub rest_endpoint: String,

    /// How long a cached repository list stays fresh.
    pub cache_duration: Duration,

    /// Directory holding the cache envelope, `None` disables caching.
    pub cache_dir: Option<PathBuf>,

    /// Maximum number of repositories in the carousel.
    pub max_repositories: usize,

    /// Number of pinned items requested.
    pub pinned_first: u16,

    /// Number of candidates requested from the owner listing.
    pub candidates_per_page: u16,

    /// Duration of a carousel transition, during which navigation is ignored.
    pub transition_duration: Duration,
}

impl ShowcaseConfig {
    /// Path of the cache envelope file, if caching is enabled.
    pub fn cache_path(&self) -> Option<PathBuf> {
        self.cache_dir
            .as_ref()
            .map(|cache_dir| cache_dir.join(format!("{CACHE_KEY}.json")))
    }

    /// Link to the showcased profile, used when repositories are unavailable.
    pub fn profile_url(&self) -> String {
        format!("https://github.com/{}", self.github_login)
    }

    /// Default cache directory for the platform.
    pub fn default_cache_dir() -> Option<PathBuf> {
        dirs::cache_dir().map(|cache_dir| cache_dir.join("github-showcase"))
    }
}

impl Default for ShowcaseConfig {
    fn default() -> Self {
        Self {
            github_login: DEFAULT_GITHUB_LOGIN.to_string(),
            github_token: None,
            graphql_endpoint: GITHUB_GRAPHQL_ENDPOINT.to_string(),
            rest_endpoint: GITHUB_REST_ENDPOINT.to_string(),
            cache_duration: Duration::from_secs(10 * 60),
            cache_dir: Self::default_cache_dir(),
            max_repositories: 10,
            pinned_first: 6,
            candidates_per_page: 30,
            transition_duration: Duration::from_millis(500),
        }
    }
}

use std::{collections::HashSet, sync::Arc};

use log::{info, warn};

use crate::{
    FetchedRepository, OwnerRepositoriesRequest, PinnedRepositoriesRequest, Repository,
    RepositoryCache, RepositoryFetcher, RepositoryProvider, Request, ShowcaseConfig,
    ShowcaseError, StdResult,
};

/// Merges pinned repositories with the owner listing candidates.
///
/// Pinned repositories come first, in source order. Candidates that are forks,
/// archived, or share a name (case-insensitive) with an earlier entry are
/// skipped. The result holds at most `max_repositories` entries.
pub fn merge_repositories(
    pinned: Vec<FetchedRepository>,
    candidates: Vec<FetchedRepository>,
    max_repositories: usize,
) -> Vec<Repository> {
    let mut seen_names = HashSet::new();
    let pinned = pinned
        .into_iter()
        .map(|fetched| fetched.repository.pinned(true));
    let additional = candidates
        .into_iter()
        .filter(FetchedRepository::is_showcase_candidate)
        .map(|fetched| fetched.repository.pinned(false));

    pinned
        .chain(additional)
        .filter(|repository| seen_names.insert(repository.name().dedup_key()))
        .take(max_repositories)
        .collect()
}

/// Retrieves the showcased repositories: cache first, then pinned items
/// supplemented by the most recently updated owner repositories.
pub struct RepositoryPipeline {
    fetcher: Arc<dyn RepositoryFetcher>,
    cache: Arc<dyn RepositoryCache>,
    github_login: String,
    max_repositories: usize,
    pinned_first: u16,
    candidates_per_page: u16,
}

impl RepositoryPipeline {
    /// Creates a new `RepositoryPipeline` instance with the given fetcher and cache.
    pub fn new(
        fetcher: Arc<dyn RepositoryFetcher>,
        cache: Arc<dyn RepositoryCache>,
        config: &ShowcaseConfig,
    ) -> Self {
        Self {
            fetcher,
            cache,
            github_login: config.github_login.to_owned(),
            max_repositories: config.max_repositories,
            pinned_first: config.pinned_first,
            candidates_per_page: config.candidates_per_page,
        }
    }

    async fn fetch_source(&self, request: Request) -> Vec<FetchedRepository> {
        match self.fetcher.fetch(&request).await {
            Ok(response) => {
                info!(
                    "Fetched {} repositories for {request}",
                    response.repositories().len()
                );
                response.into_repositories()
            }
            Err(e) => {
                warn!("Source degraded for {request}: {e}");
                vec![]
            }
        }
    }
}

#[async_trait::async_trait]
impl RepositoryProvider for RepositoryPipeline {
    async fn fetch_repositories(&self) -> StdResult<Vec<Repository>> {
        if let Some(repositories) = self
            .cache
            .get()
            .await
            .filter(|repositories| !repositories.is_empty())
        {
            return Ok(repositories);
        }

        let pinned = self
            .fetch_source(Request::PinnedRepositories(PinnedRepositoriesRequest::new(
                &self.github_login,
                self.pinned_first,
            )))
            .await;
        let candidates = if pinned.len() < self.max_repositories {
            self.fetch_source(Request::OwnerRepositories(OwnerRepositoriesRequest::new(
                &self.github_login,
                self.candidates_per_page,
            )))
            .await
        } else {
            vec![]
        };

        let repositories = merge_repositories(pinned, candidates, self.max_repositories);
        if repositories.is_empty() {
            return Err(ShowcaseError::RepositoriesUnavailable.into());
        }
        for repository in &repositories {
            info!("Showcasing {repository}");
        }
        self.cache.set(&repositories).await;

        Ok(repositories)
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use mockall::predicate::eq;

    use crate::{MockRepositoryCache, MockRepositoryFetcher, Response};

    use super::*;

    fn fetched(names: &[&str]) -> Vec<FetchedRepository> {
        names
            .iter()
            .map(|name| FetchedRepository::new(Repository::dummy(name)))
            .collect()
    }

    fn is_pinned_request(request: &Request) -> bool {
        matches!(request, Request::PinnedRepositories(_))
    }

    fn is_owner_request(request: &Request) -> bool {
        matches!(request, Request::OwnerRepositories(_))
    }

    fn empty_cache() -> MockRepositoryCache {
        let mut cache = MockRepositoryCache::new();
        cache.expect_get().returning(|| None).times(1);

        cache
    }

    fn pipeline(fetcher: MockRepositoryFetcher, cache: MockRepositoryCache) -> RepositoryPipeline {
        RepositoryPipeline::new(
            Arc::new(fetcher),
            Arc::new(cache),
            &ShowcaseConfig::default(),
        )
    }

    mod merge {
        use super::*;

        #[test]
        fn pinned_first_and_case_insensitive_dedup() {
            let merged = merge_repositories(fetched(&["A", "B"]), fetched(&["b", "C", "D"]), 10);

            assert_eq!(
                vec![
                    Repository::dummy("A").pinned(true),
                    Repository::dummy("B").pinned(true),
                    Repository::dummy("C"),
                    Repository::dummy("D"),
                ],
                merged
            );
        }

        #[test]
        fn excludes_forks_and_archived_candidates() {
            let mut candidates = fetched(&["fork", "archived", "kept"]);
            candidates[0].is_fork = true;
            candidates[1].is_archived = true;

            let merged = merge_repositories(vec![], candidates, 10);

            assert_eq!(vec![Repository::dummy("kept")], merged);
        }

        #[test]
        fn caps_length_and_keeps_source_order() {
            let candidates = (0..30)
                .map(|index| format!("repository-{index}"))
                .collect::<Vec<_>>();
            let candidates = fetched(&candidates.iter().map(String::as_str).collect::<Vec<_>>());

            let merged = merge_repositories(fetched(&["p1", "p2", "p3"]), candidates, 10);

            assert_eq!(merged.len(), 10);
            assert!(merged[..3].iter().all(Repository::is_pinned));
            assert!(merged[3..].iter().all(|repository| !repository.is_pinned()));
            assert_eq!(merged[3].name().as_str(), "repository-0");
            assert_eq!(merged[9].name().as_str(), "repository-6");
        }

        #[test]
        fn drops_duplicates_within_candidates() {
            let merged = merge_repositories(vec![], fetched(&["X", "x", "y"]), 10);

            assert_eq!(vec![Repository::dummy("X"), Repository::dummy("y")], merged);
        }
    }

    #[tokio::test]
    async fn returns_cached_repositories_without_fetching() {
        let cached = vec![Repository::dummy("cached").pinned(true)];
        let cache = {
            let mut cache = MockRepositoryCache::new();
            let cached = cached.clone();
            cache
                .expect_get()
                .returning(move || Some(cached.clone()))
                .times(1);
            cache.expect_set().times(0);

            cache
        };
        let fetcher = {
            let mut fetcher = MockRepositoryFetcher::new();
            fetcher.expect_fetch().times(0);

            fetcher
        };

        let repositories = pipeline(fetcher, cache).fetch_repositories().await.unwrap();

        assert_eq!(cached, repositories);
    }

    #[tokio::test]
    async fn fetches_when_cache_holds_no_repositories() {
        let cache = {
            let mut cache = MockRepositoryCache::new();
            cache.expect_get().returning(|| Some(vec![])).times(1);
            cache.expect_set().returning(|_| ()).times(1);

            cache
        };
        let fetcher = {
            let mut fetcher = MockRepositoryFetcher::new();
            fetcher
                .expect_fetch()
                .withf(is_pinned_request)
                .returning(|_| Ok(Response::new(fetched(&["A"]), None)))
                .times(1);
            fetcher
                .expect_fetch()
                .withf(is_owner_request)
                .returning(|_| Ok(Response::new(vec![], None)))
                .times(1);

            fetcher
        };

        let repositories = pipeline(fetcher, cache).fetch_repositories().await.unwrap();

        assert_eq!(vec![Repository::dummy("A").pinned(true)], repositories);
    }

    #[tokio::test]
    async fn merges_pinned_and_owner_repositories_and_caches_them() {
        let expected = vec![
            Repository::dummy("A").pinned(true),
            Repository::dummy("B").pinned(true),
            Repository::dummy("C"),
            Repository::dummy("D"),
        ];
        let fetcher = {
            let mut fetcher = MockRepositoryFetcher::new();
            fetcher
                .expect_fetch()
                .withf(is_pinned_request)
                .returning(|_| {
                    Ok(Response::new(
                        fetched(&["A", "B"]),
                        Some(crate::FetcherRateLimit::dummy()),
                    ))
                })
                .times(1);
            fetcher
                .expect_fetch()
                .withf(is_owner_request)
                .returning(|_| Ok(Response::new(fetched(&["b", "C", "D"]), None)))
                .times(1);

            fetcher
        };
        let cache = {
            let mut cache = empty_cache();
            cache
                .expect_set()
                .with(eq(expected.clone()))
                .returning(|_| ())
                .times(1);

            cache
        };

        let repositories = pipeline(fetcher, cache).fetch_repositories().await.unwrap();

        assert_eq!(expected, repositories);
    }

    #[tokio::test]
    async fn degrades_to_owner_repositories_when_pinned_fails() {
        let fetcher = {
            let mut fetcher = MockRepositoryFetcher::new();
            fetcher
                .expect_fetch()
                .withf(is_pinned_request)
                .returning(|_| Err(anyhow!("GraphQL unavailable")))
                .times(1);
            fetcher
                .expect_fetch()
                .withf(is_owner_request)
                .returning(|_| Ok(Response::new(fetched(&["C"]), None)))
                .times(1);

            fetcher
        };
        let cache = {
            let mut cache = empty_cache();
            cache.expect_set().returning(|_| ()).times(1);

            cache
        };

        let repositories = pipeline(fetcher, cache).fetch_repositories().await.unwrap();

        assert_eq!(vec![Repository::dummy("C")], repositories);
    }

    #[tokio::test]
    async fn degrades_to_pinned_repositories_when_owner_listing_fails() {
        let fetcher = {
            let mut fetcher = MockRepositoryFetcher::new();
            fetcher
                .expect_fetch()
                .withf(is_pinned_request)
                .returning(|_| Ok(Response::new(fetched(&["A"]), None)))
                .times(1);
            fetcher
                .expect_fetch()
                .withf(is_owner_request)
                .returning(|_| Err(anyhow!("HTTP 403")))
                .times(1);

            fetcher
        };
        let cache = {
            let mut cache = empty_cache();
            cache.expect_set().returning(|_| ()).times(1);

            cache
        };

        let repositories = pipeline(fetcher, cache).fetch_repositories().await.unwrap();

        assert_eq!(vec![Repository::dummy("A").pinned(true)], repositories);
    }

    #[tokio::test]
    async fn fails_when_both_sources_fail() {
        let fetcher = {
            let mut fetcher = MockRepositoryFetcher::new();
            fetcher
                .expect_fetch()
                .returning(|_| Err(anyhow!("Network down")))
                .times(2);

            fetcher
        };
        let cache = {
            let mut cache = empty_cache();
            cache.expect_set().times(0);

            cache
        };

        let error = pipeline(fetcher, cache)
            .fetch_repositories()
            .await
            .expect_err("Expected unavailable repositories");

        assert_eq!(
            Some(&ShowcaseError::RepositoriesUnavailable),
            error.downcast_ref::<ShowcaseError>()
        );
    }

    #[tokio::test]
    async fn skips_owner_listing_when_pinned_fills_the_carousel() {
        let fetcher = {
            let mut fetcher = MockRepositoryFetcher::new();
            fetcher
                .expect_fetch()
                .withf(is_pinned_request)
                .returning(|_| Ok(Response::new(fetched(&["A", "B"]), None)))
                .times(1);
            fetcher.expect_fetch().withf(is_owner_request).times(0);

            fetcher
        };
        let cache = {
            let mut cache = empty_cache();
            cache.expect_set().returning(|_| ()).times(1);

            cache
        };
        let pipeline = RepositoryPipeline::new(
            Arc::new(fetcher),
            Arc::new(cache),
            &ShowcaseConfig {
                max_repositories: 2,
                ..ShowcaseConfig::default()
            },
        );

        let repositories = pipeline.fetch_repositories().await.unwrap();

        assert_eq!(repositories.len(), 2);
    }
}

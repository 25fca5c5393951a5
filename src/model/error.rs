use thiserror::Error;

/// The standard result type used throughout the application.
pub type StdResult<T> = Result<T, anyhow::Error>;

/// Showcase error
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ShowcaseError {
    /// Neither the pinned items nor the owner listing produced a repository.
    #[error("Repositories currently unavailable")]
    RepositoriesUnavailable,

    /// A carousel needs at least one repository.
    #[error("Cannot build a carousel without repositories")]
    EmptyCarousel,
}

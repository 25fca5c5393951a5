use crate::{CarouselView, Repository, StdResult};

/// A trait for drawing the carousel on an output.
#[cfg_attr(test, mockall::automock)]
pub trait CarouselSurface {
    /// Draws the view, replacing whatever the surface displayed before.
    fn apply(&mut self, view: &CarouselView, repositories: &[Repository]) -> StdResult<()>;

    /// Draws the panel displayed when no repository could be retrieved.
    fn show_unavailable(&mut self, profile_url: &str) -> StdResult<()>;
}

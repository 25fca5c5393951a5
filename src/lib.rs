//! Showcase of a GitHub account's repositories.
//!
//! Pinned repositories are fetched from the GraphQL API and supplemented with
//! the most recently updated owned repositories from the REST API. The merged
//! list is cached for a configurable duration and presented as a carousel.

mod infrastructure;
mod interface;
mod model;

pub use infrastructure::*;
pub use interface::*;
pub use model::*;

mod cache_disabled;
mod cache_file;
mod fetcher_github;
mod pipeline;
mod session;
mod surface_terminal;

pub use cache_disabled::*;
pub use cache_file::*;
pub use fetcher_github::*;
pub use pipeline::*;
pub use session::*;
pub use surface_terminal::*;

mod cache;
mod fetcher;
mod provider;
mod surface;

pub use cache::*;
pub use fetcher::*;
pub use provider::*;
pub use surface::*;

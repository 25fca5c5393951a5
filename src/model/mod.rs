mod carousel;
mod config;
mod entities;
mod error;
mod request;
mod response;

pub use carousel::*;
pub use config::*;
pub use entities::*;
pub use error::*;
pub use request::*;
pub use response::*;

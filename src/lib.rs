pub mod api;
pub mod config;
pub mod error;
pub mod frontmatter;
pub mod logging;

pub use config::{Settings, get_settings};
pub use error::ConfigurationError;

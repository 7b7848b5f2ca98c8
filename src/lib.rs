pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;
pub use config::toml_config::TomlConfig;

pub use adapters::{http::HttpFetcher, storage::LocalStorage};
pub use core::{etl::EtlEngine, pipeline::CitationPipeline};
pub use utils::error::{EtlError, Result};

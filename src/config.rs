//! Runtime configuration for the catalog client

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://pokeapi.co/api/v2";
pub const DEFAULT_LIST_LIMIT: u32 = 50;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LOG_FILTER: &str = "pokegrid=info";

/// Connection settings for [`crate::api::HttpCatalog`]
#[derive(Clone, Debug, PartialEq)]
pub struct CatalogConfig {
    pub base_url: String,
    pub list_limit: u32,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            list_limit: DEFAULT_LIST_LIMIT,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: format!("pokegrid/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl CatalogConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Endpoint for the single list page fetched on activation
    pub fn list_url(&self) -> String {
        format!(
            "{}/pokemon?limit={}",
            self.base_url.trim_end_matches('/'),
            self.list_limit
        )
    }
}

/// Catalog flags, flattened into the binary's `Args`
#[derive(clap::Args, Clone, Debug)]
pub struct CatalogArgs {
    /// Base URL of the PokeAPI compatible catalog
    #[arg(long, env = "POKEGRID_API_URL", default_value = DEFAULT_API_BASE)]
    pub api_url: String,

    /// Number of records requested from the list endpoint
    #[arg(
        long,
        env = "POKEGRID_LIST_LIMIT",
        default_value_t = DEFAULT_LIST_LIMIT,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub limit: u32,

    /// Per-request timeout in seconds (minimum 1)
    #[arg(
        long,
        env = "POKEGRID_TIMEOUT",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: u64,
}

impl CatalogArgs {
    pub fn into_config(self) -> CatalogConfig {
        CatalogConfig {
            base_url: self.api_url,
            list_limit: self.limit,
            timeout: Duration::from_secs(self.timeout),
            ..CatalogConfig::default()
        }
    }
}

/// Logging flags, flattened into the binary's `Args`
#[derive(clap::Args, Clone, Debug)]
pub struct LogArgs {
    /// Write tracing output to this file (the terminal belongs to the UI)
    #[arg(long, env = "POKEGRID_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Filter directives used when RUST_LOG is not set
    #[arg(long, default_value = DEFAULT_LOG_FILTER)]
    pub log_filter: String,
}

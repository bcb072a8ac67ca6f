//! Configuration module for url-scout
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file, and merging command-line flags on top of it.
//!
//! # Example
//!
//! ```no_run
//! use url_scout::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("url-scout.toml")).unwrap();
//! println!("Fetch concurrency: {}", config.crawler.concurrency);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, ConfigOverrides, CrawlerConfig, HttpConfig, OutputConfig, DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{load_config, parse_config, resolve_config};
pub use validation::validate;

//! Crawler settings
//!
//! Pacing, directory selectors, browser launch options, the crawler identity
//! sent to robots.txt hosts, and input and output paths all come from one
//! kebab-case TOML file.
//!
//! # Example
//!
//! ```no_run
//! use district_scout::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scout.toml")).unwrap();
//! println!("Batch size: {}", config.crawler.batch_size);
//! ```

mod parser;
mod types;
mod validation;

pub use types::{
    BrowserConfig, Config, CrawlerConfig, DirectoryConfig, InputConfig, OutputConfig,
    UserAgentConfig,
};

pub use parser::{config_fingerprint, load_config, load_config_with_hash, parse_config};
pub use validation::validate;

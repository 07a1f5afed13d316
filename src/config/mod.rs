//! Configuration module for Stacksight
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. All settings have defaults, so running without a config file is
//! supported.
//!
//! # Example
//!
//! ```no_run
//! use stacksight::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Server will bind to: {}", config.server.bind);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{AnalysisConfig, Config, LookupConfig, ServerConfig};

// Re-export parser functions
pub use parser::load_config;

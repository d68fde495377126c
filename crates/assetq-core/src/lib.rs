//! assetq Core - Foundation crate for the assetq asset-search exporter.
//!
//! This crate provides the shared vocabulary every other assetq crate speaks:
//! provider identity, the schema-tagged result row, per-provider column
//! layouts, error types, and TOML configuration.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths and API keys
//! - [`types`] - The `Provider` enum
//! - [`row`] - `ResultRow`, `Field`, `Column`, and provider layouts
//!
//! # Example
//!
//! ```rust
//! use assetq_core::{Field, Provider, ResultRow};
//!
//! let provider: Provider = "quake".parse().expect("known provider");
//! let row = ResultRow::new()
//!     .with(Field::Ip, "10.0.0.1")
//!     .with(Field::Port, "443");
//!
//! assert_eq!(provider.default_output(), "quake.csv");
//! assert_eq!(row.get(Field::Ip), "10.0.0.1");
//! assert_eq!(row.get(Field::Title), "");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod row;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, HttpConfig, KeyConfig, PacingConfig};
pub use error::{AssetqError, ConfigError, ConfigResult, Result};
pub use row::{Column, Field, ResultRow};
pub use types::Provider;

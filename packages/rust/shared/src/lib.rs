//! Shared types, error model, and configuration for worldcontext.
//!
//! This crate is the foundation depended on by all other worldcontext crates.
//! It provides:
//! - [`WorldContextError`] — the unified error type
//! - Domain types ([`Denizen`], [`FieldValue`])
//! - Configuration ([`AppConfig`], [`ContextLimits`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, ContextConfig, ContextLimits, config_dir, config_file_path, load_config,
    load_config_from,
};
pub use error::{Result, WorldContextError};
pub use types::{Denizen, FieldValue};

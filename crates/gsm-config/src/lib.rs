//! BTS configuration management
//!
//! This crate provides configuration loading and parsing for the GSM BTS:
//! - TOML configuration file parsing
//! - Typed BTS, TRX, capture and PHY link configuration structures
//! - Shared runtime state (capture filter)

pub mod stack_config;
pub mod toml_config;

pub use stack_config::*;
pub use toml_config::*;

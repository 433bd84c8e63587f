//! Core domain model for the kruxdesk support system.
//!
//! Defines the conversation/message/principal data model shared by every
//! crate, the top-level error type, and TOML configuration.

pub mod config;
pub mod error;
pub mod types;

pub use config::{BotConfig, DeskConfig, GeneralConfig, StorageConfig};
pub use error::{DeskError, Result};
pub use types::*;

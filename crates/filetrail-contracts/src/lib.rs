//! # filetrail-contracts
//!
//! Shared types, errors, and configuration for the FILETRAIL audit chain.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate beyond the `current_files` derived view; everything else is
//! data definitions, error types, and configuration schema.

pub mod activity;
pub mod block;
pub mod config;
pub mod error;

pub use activity::{current_files, ActivityAction, ActivityEvent};
pub use block::Block;
pub use config::RuntimeConfig;
pub use error::{TrailError, TrailResult};

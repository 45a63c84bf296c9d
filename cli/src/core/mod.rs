//! # procwrap Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Foundational pieces used across the crate:
//! - `config`: Loading of the user's command alias table
//! - `error`: The `ProcessError` taxonomy and `Result` aliases
//!
//! ```rust
//! use procwrap::core::config; // Alias lookup
//! use procwrap::core::error::{ProcessError, ProcResult, Result}; // Error handling
//! ```
//!
pub mod config;
pub mod error;

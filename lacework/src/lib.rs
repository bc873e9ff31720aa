// lacework/src/lib.rs
//! # Lacework CLI Application
//!
//! This crate provides the command-line front end for `lacework-core`:
//! argument parsing, credential resolution, the HTTP client for the
//! Lacework API and the commands that print tables or JSON.

pub mod api;
pub mod cli;
pub mod commands;
pub mod context;
pub mod logger;
pub mod prompt;
pub mod ui;

pub use commands::dispatch;

//! CLI module for eightfold
//!
//! Handles command-line argument parsing, configuration management and
//! terminal rendering.

pub mod args;
pub mod config;
pub mod render;

pub use args::{Args, Commands, Verbosity};
pub use config::Config;

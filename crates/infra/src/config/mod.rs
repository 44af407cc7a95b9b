//! Configuration loading
//!
//! Environment variables first, then a TOML or JSON file.

pub mod loader;

pub use loader::{load, load_from_env, load_from_file, load_with, parse_tokens, probe_config_paths};

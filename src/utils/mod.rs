//! Utility functions and helpers

pub mod preflight;
pub mod settings;

pub use preflight::check_pr_prerequisites;
pub use settings::{get_env_var, Settings};

//! Preflight validation checks for early failure detection
//!
//! This module provides functions to validate required tools and
//! configuration before starting expensive operations. Commands should
//! call these checks early to fail fast with clear error messages.

use anyhow::{bail, Context, Result};

use crate::config::Config;

/// Validates we're in a valid git repository.
///
/// A lightweight check that opens the repository without loading any
/// commit data.
pub fn check_git_repository() -> Result<()> {
    crate::git::GitRepository::open().context(
        "Not in a git repository. Please run this command from within a git repository.",
    )?;
    Ok(())
}

/// Validates the GitHub CLI is installed and authenticated.
///
/// Checks `gh --version` first so a missing binary gets its own message,
/// then `gh auth status` for credentials.
pub fn check_github_cli() -> Result<()> {
    let gh_check = std::process::Command::new("gh")
        .args(["--version"])
        .output();

    match gh_check {
        Ok(output) if output.status.success() => {}
        _ => bail!(
            "GitHub CLI (gh) is not installed or not in PATH.\n\
             Please install it from https://cli.github.com/"
        ),
    }

    let auth_check = std::process::Command::new("gh")
        .args(["auth", "status"])
        .output();

    match auth_check {
        Ok(output) if output.status.success() => Ok(()),
        Ok(output) => {
            let error_details = String::from_utf8_lossy(&output.stderr);
            bail!(
                "GitHub CLI not authenticated. Run 'gh auth login'.\n\
                 Error: {}",
                error_details.trim()
            )
        }
        Err(e) => bail!("Failed to check GitHub CLI authentication: {}", e),
    }
}

/// Validates the AI model is configured, returning the model name.
///
/// A lightweight configuration check without creating a client, so
/// commands fail before any git or network work when LAZYPR_MODEL is
/// missing.
pub fn check_ai_configuration(config: &Config) -> Result<String> {
    config.model.clone().ok_or_else(|| {
        anyhow::anyhow!(
            "Model not configured.\n\
             Set the LAZYPR_MODEL environment variable (e.g. zai-glm-4.7)."
        )
    })
}

/// Combined preflight check for PR creation.
///
/// Validates:
/// - Git repository access
/// - AI model configuration
/// - GitHub CLI availability and authentication
///
/// Returns the model that will be used.
pub fn check_pr_prerequisites(config: &Config) -> Result<String> {
    check_git_repository()?;
    let model = check_ai_configuration(config)?;
    check_github_cli()?;
    Ok(model)
}

//! Create command — AI-powered pull request creation.

use std::process::Command;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error};

use crate::ai::AiClient;
use crate::config::Config;
use crate::diff;
use crate::git::{self, GitRepository};
use crate::ignore;
use crate::utils::preflight;

/// Create PR command options.
#[derive(Parser)]
pub struct CreateCommand {
    /// Base branch to compare against.
    #[arg(long, value_name = "BRANCH")]
    pub base: String,

    /// Model identifier to use (defaults to LAZYPR_MODEL).
    #[arg(long)]
    pub model: Option<String>,

    /// Language for the generated title and description.
    #[arg(long)]
    pub language: Option<String>,
}

impl CreateCommand {
    /// Executes the create command.
    pub async fn execute(self) -> Result<()> {
        let mut config = Config::from_env();
        if let Some(model) = self.model.clone() {
            config.model = Some(model);
        }
        if let Some(language) = self.language.clone() {
            config.language = language;
        }

        // Preflight: validate all prerequisites before any processing.
        let model = preflight::check_pr_prerequisites(&config)?;
        println!("✓ Model configured: {model}");
        println!("✓ GitHub CLI verified");

        let repo = GitRepository::open()?;

        if !repo.has_remote("origin")? {
            anyhow::bail!("No 'origin' remote found");
        }

        let current_branch = repo.current_branch()?;
        println!("Current branch: {current_branch}");

        let base_ref = repo.resolve_base(&self.base)?;
        if repo.commits_ahead(&base_ref)? == 0 {
            anyhow::bail!("No commits ahead of '{}'", self.base);
        }

        println!("Getting diff from {}...", self.base);
        let raw_diff = git::get_diff(&base_ref)?;
        if raw_diff.trim().is_empty() {
            anyhow::bail!("No changes to include in PR");
        }

        let patterns = ignore::load_ignore_patterns();
        let filtered = diff::filter_diff(&raw_diff, config.max_diff_lines, &patterns);
        if filtered.trim().is_empty() {
            anyhow::bail!("No changes left after filtering");
        }
        debug!(
            "Filtered diff: {} of {} bytes retained",
            filtered.len(),
            raw_diff.len()
        );

        println!("Generating PR content with AI...");
        let client = AiClient::new(&config)?;
        let content = client
            .summarize(&filtered, &config.language)
            .await
            .context("Failed to generate PR content")?;

        println!("\nTitle: {}", content.title);
        println!("Description:\n{}\n", content.description);

        println!("Creating PR and opening browser...");
        self.create_github_pr(&content.title, &content.description)
    }

    /// Creates the pull request via the GitHub CLI, opening the browser
    /// for final review.
    fn create_github_pr(&self, title: &str, description: &str) -> Result<()> {
        debug!("Creating PR with gh CLI - title: '{}'", title);
        debug!("PR description length: {} characters", description.len());

        let status = Command::new("gh")
            .args([
                "pr",
                "create",
                "-w",
                "--base",
                &self.base,
                "--title",
                title,
                "--body",
                description,
            ])
            .status()
            .context("Failed to run gh pr create")?;

        if !status.success() {
            error!("gh CLI failed to create PR");
            anyhow::bail!("Failed to create PR (gh exited with {status})");
        }

        Ok(())
    }
}

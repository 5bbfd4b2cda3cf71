//! Git operations and repository management.

use std::process::Command;

use anyhow::{Context, Result};
use git2::Repository;
use tracing::debug;

/// Wrapper around a git2 repository handle.
pub struct GitRepository {
    repo: Repository,
}

impl GitRepository {
    /// Opens the repository containing the current directory.
    pub fn open() -> Result<Self> {
        let repo = Repository::open(".").context("Failed to open git repository")?;
        Ok(Self { repo })
    }

    /// Gets the current git branch name.
    pub fn current_branch(&self) -> Result<String> {
        let head = self.repo.head().context("Failed to get HEAD reference")?;

        if let Some(name) = head.shorthand() {
            if name != "HEAD" {
                return Ok(name.to_string());
            }
        }

        anyhow::bail!("Repository is in detached HEAD state")
    }

    /// Checks whether a remote with the given name is configured.
    pub fn has_remote(&self, name: &str) -> Result<bool> {
        let remotes = self.repo.remotes().context("Failed to list remotes")?;
        Ok(remotes.iter().flatten().any(|remote| remote == name))
    }

    /// Resolves the base branch to diff against.
    ///
    /// Prefers the local branch; when only the remote-tracking branch
    /// exists, `origin/<base>` is used instead.
    pub fn resolve_base(&self, base: &str) -> Result<String> {
        if self.repo.revparse_single(base).is_ok() {
            return Ok(base.to_string());
        }

        let remote = format!("origin/{base}");
        if self.repo.revparse_single(&remote).is_ok() {
            debug!("Base '{}' not found locally, using '{}'", base, remote);
            return Ok(remote);
        }

        anyhow::bail!("Base branch '{base}' not found locally or on origin")
    }

    /// Counts commits on HEAD that are not reachable from `base_ref`.
    pub fn commits_ahead(&self, base_ref: &str) -> Result<usize> {
        let base = self
            .repo
            .revparse_single(base_ref)
            .with_context(|| format!("Failed to resolve base '{base_ref}'"))?
            .peel_to_commit()
            .with_context(|| format!("Base '{base_ref}' does not point to a commit"))?;

        let mut revwalk = self.repo.revwalk().context("Failed to walk commits")?;
        revwalk.push_head().context("Failed to start from HEAD")?;
        revwalk
            .hide(base.id())
            .context("Failed to hide base commits")?;

        Ok(revwalk.count())
    }
}

/// Gets the diff from the resolved base to the current HEAD.
///
/// Runs `git diff <base>...HEAD` (the three-dot merge-base form) as an
/// external process; the raw text is handed to the filtering pipeline as
/// an opaque string.
pub fn get_diff(base_ref: &str) -> Result<String> {
    let range = format!("{base_ref}...HEAD");
    debug!("Running git diff {}", range);

    let output = Command::new("git")
        .args(["diff", &range])
        .output()
        .context("Failed to run git diff")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!(
            "Failed to get diff from base branch '{base_ref}': {}",
            stderr.trim()
        );
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

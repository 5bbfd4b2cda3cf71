//! Runtime configuration, resolved once at process start.
//!
//! All tunables come from `LAZYPR_*` environment variables (with the
//! settings-file fallback from [`crate::utils::settings`]) and travel as
//! an explicit [`Config`] value instead of being re-read per call.

use crate::utils::settings;

/// Default ceiling on a file's effective diff line count.
pub const DEFAULT_MAX_DIFF_LINES: usize = 1000;

/// Default language for the generated PR title and description.
pub const DEFAULT_LANGUAGE: &str = "English";

/// Resolved configuration handed to the filtering pipeline and the AI
/// client.
#[derive(Debug, Clone)]
pub struct Config {
    /// Files whose effective diff line count exceeds this are dropped.
    pub max_diff_lines: usize,
    /// Model identifier, e.g. `zai-glm-4.7`.
    pub model: Option<String>,
    /// Bearer token for the model endpoint, when the provider needs one.
    pub api_key: Option<String>,
    /// Base URL of the chat-completions endpoint.
    pub base_url: Option<String>,
    /// Language the PR title and description should be written in.
    pub language: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_diff_lines: DEFAULT_MAX_DIFF_LINES,
            model: None,
            api_key: None,
            base_url: None,
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl Config {
    /// Resolves configuration from the environment, applying defaults
    /// for anything unset. An unparseable LAZYPR_MAX_DIFF_LINES falls
    /// back to the default rather than erroring.
    pub fn from_env() -> Self {
        let max_diff_lines = settings::get_env_var("LAZYPR_MAX_DIFF_LINES")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_MAX_DIFF_LINES);

        Self {
            max_diff_lines,
            model: settings::get_env_var("LAZYPR_MODEL").ok(),
            api_key: settings::get_env_var("LAZYPR_API_KEY").ok(),
            base_url: settings::get_env_var("LAZYPR_BASE_URL").ok(),
            language: settings::get_env_var("LAZYPR_LANGUAGE")
                .unwrap_or_else(|_| DEFAULT_LANGUAGE.to_string()),
        }
    }
}

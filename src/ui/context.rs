//! UI context for detecting interactive vs CI environments

use std::io::IsTerminal;

/// CI systems that set one of these are never treated as interactive
const CI_VARS: [&str; 9] = [
    "CI",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "CIRCLECI",
    "TRAVIS",
    "JENKINS_URL",
    "BUILDKITE",
    "TEAMCITY_VERSION",
    "TF_BUILD",
];

/// UI context that determines output behavior
#[derive(Debug, Clone)]
pub struct UiContext {
    interactive: bool,
}

impl UiContext {
    /// Detect the current environment
    pub fn detect() -> Self {
        Self {
            interactive: std::io::stdout().is_terminal()
                && !CI_VARS.iter().any(|var| std::env::var_os(var).is_some()),
        }
    }

    #[cfg(test)]
    pub(crate) fn non_interactive() -> Self {
        Self { interactive: false }
    }

    /// Check if we should use colored output
    pub fn use_fancy_output(&self) -> bool {
        self.interactive
    }
}

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::palette::Accent;

/// Exit codes carried in [`Response::exit_code`]. Shell integrations depend on these.
pub mod exit_code {
    pub const OK: i32 = 0;
    pub const REPOSITORY_LOAD_FAILED: i32 = 1;
    pub const EMPTY_DIRECTORY: i32 = 2;
    pub const MALFORMED_REQUEST: i32 = 100;
    pub const REQUEST_TIMEOUT: i32 = 101;
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Full,
    Prompt,
    StatusLine,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum VcsPreference {
    #[default]
    Detect,
    Git,
    #[serde(rename = "hg", alias = "mercurial")]
    Mercurial,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum VcsKind {
    Git,
    #[serde(rename = "hg")]
    Mercurial,
}

impl VcsKind {
    pub fn label(self) -> &'static str {
        match self {
            VcsKind::Git => "git",
            VcsKind::Mercurial => "hg",
        }
    }
}

impl std::fmt::Display for VcsKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One status request. A status check ignores every other field.
///
/// Absent fields take their defaults; unknown fields make the request malformed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Request {
    pub directory: String,
    pub force_color: bool,
    pub output_format: OutputFormat,
    pub vcs_preference: VcsPreference,
    pub is_status_check: bool,
}

impl Request {
    pub fn status_check() -> Self {
        Self {
            is_status_check: true,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub exit_code: i32,
    pub content: String,
}

impl Response {
    pub fn new(exit_code: i32, content: impl Into<String>) -> Self {
        Self {
            exit_code,
            content: content.into(),
        }
    }

    pub fn ok(content: impl Into<String>) -> Self {
        Self::new(exit_code::OK, content)
    }

    pub fn alive() -> Self {
        Self::ok("OK")
    }

    pub fn empty_directory() -> Self {
        Self::new(exit_code::EMPTY_DIRECTORY, "Directory must be non-empty.")
    }

    pub fn load_failed() -> Self {
        Self::new(
            exit_code::REPOSITORY_LOAD_FAILED,
            "Error loading repository information.",
        )
    }

    pub fn malformed(reason: impl std::fmt::Display) -> Self {
        Self::new(
            exit_code::MALFORMED_REQUEST,
            format!("Error decoding request: {reason}"),
        )
    }

    pub fn request_timeout() -> Self {
        Self::new(exit_code::REQUEST_TIMEOUT, "Timed out waiting for request.")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnsiString {
    pub plain: String,
    pub colored: String,
}

impl AnsiString {
    pub fn uncolored(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            plain: text.clone(),
            colored: text,
        }
    }

    pub fn from_colored(colored: impl Into<String>) -> Self {
        let colored = colored.into();
        Self {
            plain: crate::palette::strip_ansi(&colored),
            colored,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepositoryStatus {
    pub is_repo: bool,
    pub vcs: AnsiString,
    pub vcs_color: Accent,
    pub repo_name: String,
    pub repo_path: String,
    pub current_branch: AnsiString,
    pub tracking: AnsiString,
    pub branches: Vec<AnsiString>,
    pub status_counts: BTreeMap<char, usize>,
    pub status: AnsiString,
}

impl RepositoryStatus {
    pub fn not_a_repository(kind: VcsKind) -> Self {
        Self {
            is_repo: false,
            vcs: AnsiString::uncolored(kind.label()),
            vcs_color: Accent::Plain,
            repo_name: String::new(),
            repo_path: String::new(),
            current_branch: AnsiString::default(),
            tracking: AnsiString::default(),
            branches: Vec::new(),
            status_counts: BTreeMap::new(),
            status: AnsiString::default(),
        }
    }
}

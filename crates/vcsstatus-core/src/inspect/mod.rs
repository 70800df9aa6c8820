//! Repository inspectors: the only place VCS subprocesses are spawned.

mod command;
pub mod git;
pub mod hg;

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use crate::palette::{Accent, Palette};
use crate::types::{RepositoryStatus, VcsKind};

pub use command::{run_command, CommandOutput};
pub use git::GitInspector;
pub use hg::MercurialInspector;

#[derive(Debug, thiserror::Error)]
pub enum InspectError {
    #[error("command io error: {cmd}: {source}")]
    CommandIo { cmd: String, source: std::io::Error },
    #[error("command failed: {cmd} (exit {code:?}): {stderr}")]
    CommandFailed {
        cmd: String,
        code: Option<i32>,
        stderr: String,
    },
    #[error("command output was not utf-8: {cmd}")]
    OutputNotUtf8 { cmd: String },
    #[error("{vcs} inspection timed out after {timeout:?}")]
    Timeout { vcs: VcsKind, timeout: Duration },
}

#[derive(Debug)]
pub enum InspectOutcome {
    Found(RepositoryStatus),
    NotThisVcs,
    Failed(InspectError),
}

pub trait Inspector: Send + Sync {
    fn kind(&self) -> VcsKind;

    fn inspect(
        &self,
        directory: &Path,
        palette: Palette,
    ) -> impl Future<Output = InspectOutcome> + Send;
}

const MAIN_LIKE_BRANCHES: &[&str] = &["main", "master", "mainline"];

/// Accent for the VCS label and branch brackets once the branch is known.
pub(crate) fn vcs_accent_for_branch(branch: &str, extra_main_like: &[&str]) -> Accent {
    if MAIN_LIKE_BRANCHES.contains(&branch) || extra_main_like.contains(&branch) {
        Accent::BrightGreen
    } else {
        Accent::BrightCyan
    }
}

pub(crate) fn repo_name_from_path(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unknown".to_string())
}

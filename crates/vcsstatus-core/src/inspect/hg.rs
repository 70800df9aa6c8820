use std::path::{Path, PathBuf};

use tracing::debug;

use super::{
    repo_name_from_path, run_command, vcs_accent_for_branch, InspectError, InspectOutcome,
    Inspector,
};
use crate::aggregate::aggregate;
use crate::palette::{Accent, Palette};
use crate::schema::MERCURIAL;
use crate::types::{AnsiString, RepositoryStatus, VcsKind};

const MISSING_BRANCH: &str = "!branch!";
const MISSING_STATUS: &str = "!status!";
const DEFAULT_BRANCH: &str = "default";

#[derive(Debug, Clone)]
pub struct MercurialInspector {
    binary: String,
}

impl MercurialInspector {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    async fn load(
        &self,
        directory: &Path,
        palette: Palette,
    ) -> Result<Option<RepositoryStatus>, InspectError> {
        let Some(root) = find_root(directory).await else {
            return Ok(None);
        };
        let dot_hg = root.join(".hg");
        let repo_path = root.display().to_string();

        let branch = read_branch(&dot_hg).await;
        let vcs_color = vcs_accent_for_branch(&branch, &[DEFAULT_BRANCH]);
        let (active_bookmark, bookmarks) = read_bookmarks(&dot_hg).await;

        let branches = bookmarks
            .into_iter()
            .filter(|name| Some(name) != active_bookmark.as_ref())
            .map(|name| AnsiString {
                colored: palette.paint(Accent::White, &name),
                plain: name,
            })
            .collect();

        let color_flag = if palette.enabled() { "always" } else { "never" };
        // A binary that cannot run is a failure; one that runs and exits
        // non-zero degrades the summary.
        let output =
            run_command(&self.binary, directory, &["status", "--color", color_flag]).await?;
        let (status_counts, rendered) = if output.success() {
            let summary = aggregate(output.stdout.lines(), &MERCURIAL, palette);
            (summary.counts, summary.rendered)
        } else {
            debug!(cmd = %output.cmd, code = ?output.code, "hg status failed");
            missing_status(palette)
        };

        Ok(Some(RepositoryStatus {
            is_repo: true,
            vcs: AnsiString {
                plain: MERCURIAL.vcs.to_string(),
                colored: palette.paint(vcs_color, MERCURIAL.vcs),
            },
            vcs_color,
            repo_name: repo_name_from_path(&repo_path),
            repo_path,
            current_branch: AnsiString {
                colored: palette.paint(Accent::Green, &branch),
                plain: branch,
            },
            tracking: AnsiString::default(),
            branches,
            status_counts,
            status: rendered,
        }))
    }
}

impl Default for MercurialInspector {
    fn default() -> Self {
        Self::new("hg")
    }
}

impl Inspector for MercurialInspector {
    fn kind(&self) -> VcsKind {
        VcsKind::Mercurial
    }

    async fn inspect(&self, directory: &Path, palette: Palette) -> InspectOutcome {
        match self.load(directory, palette).await {
            Ok(Some(status)) => InspectOutcome::Found(status),
            Ok(None) => InspectOutcome::NotThisVcs,
            Err(err) => InspectOutcome::Failed(err),
        }
    }
}

/// Nearest ancestor of `directory` (itself included) holding a `.hg` directory.
pub async fn find_root(directory: &Path) -> Option<PathBuf> {
    for candidate in directory.ancestors() {
        let is_repo = tokio::fs::metadata(candidate.join(".hg"))
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false);
        if is_repo {
            return Some(candidate.to_path_buf());
        }
    }
    None
}

async fn read_branch(dot_hg: &Path) -> String {
    match tokio::fs::read_to_string(dot_hg.join("branch")).await {
        Ok(contents) => {
            let branch = contents.trim();
            if branch.is_empty() {
                DEFAULT_BRANCH.to_string()
            } else {
                branch.to_string()
            }
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => DEFAULT_BRANCH.to_string(),
        Err(err) => {
            debug!(error = %err, "reading hg branch failed");
            MISSING_BRANCH.to_string()
        }
    }
}

async fn read_bookmarks(dot_hg: &Path) -> (Option<String>, Vec<String>) {
    let active = tokio::fs::read_to_string(dot_hg.join("bookmarks.current"))
        .await
        .ok()
        .map(|contents| contents.trim().to_string())
        .filter(|name| !name.is_empty());

    let bookmarks = tokio::fs::read_to_string(dot_hg.join("bookmarks"))
        .await
        .map(|contents| parse_bookmarks(&contents))
        .unwrap_or_default();

    (active, bookmarks)
}

/// Each line is `<node> <name>`.
pub fn parse_bookmarks(contents: &str) -> Vec<String> {
    contents
        .lines()
        .filter_map(|line| line.trim().split_once(' '))
        .map(|(_, name)| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

fn missing_status(palette: Palette) -> (std::collections::BTreeMap<char, usize>, AnsiString) {
    let counts = aggregate(std::iter::empty(), &MERCURIAL, palette).counts;
    let rendered = AnsiString {
        plain: MISSING_STATUS.to_string(),
        colored: palette.paint(Accent::BrightRed, MISSING_STATUS),
    };
    (counts, rendered)
}

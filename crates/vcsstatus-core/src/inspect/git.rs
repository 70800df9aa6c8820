use std::path::Path;

use tracing::debug;

use super::{
    repo_name_from_path, run_command, vcs_accent_for_branch, CommandOutput, InspectError,
    InspectOutcome, Inspector,
};
use crate::aggregate::{aggregate, StatusSummary};
use crate::palette::{strip_ansi, Accent, Palette};
use crate::schema::GIT;
use crate::types::{AnsiString, RepositoryStatus, VcsKind};

/// Exit status git uses for "not a git repository".
const NOT_A_REPOSITORY: i32 = 128;

const MISSING_BRANCH: &str = "!branch!";
const MISSING_STATUS: &str = "!status!";

#[derive(Debug, Clone)]
pub struct GitInspector {
    binary: String,
}

impl GitInspector {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    async fn git(&self, directory: &Path, args: &[&str]) -> Result<CommandOutput, InspectError> {
        run_command(&self.binary, directory, args).await
    }

    async fn load(
        &self,
        directory: &Path,
        palette: Palette,
    ) -> Result<Option<RepositoryStatus>, InspectError> {
        let long_status = self
            .git(
                directory,
                &["-c", "color.status=never", "-c", "color.ui=never", "status"],
            )
            .await?;
        match long_status.code {
            Some(0) => {}
            Some(NOT_A_REPOSITORY) => return Ok(None),
            _ => return Err(long_status.into_failure()),
        }

        let branch_accent = branch_accent_for_status(&long_status.stdout);

        let repo_path = match self.git(directory, &["rev-parse", "--show-toplevel"]).await {
            Ok(output) if output.success() => output.stdout.trim().to_string(),
            Ok(output) => {
                debug!(cmd = %output.cmd, code = ?output.code, "git toplevel lookup failed");
                String::new()
            }
            Err(err) => {
                debug!(error = %err, "git toplevel lookup failed");
                String::new()
            }
        };
        let repo_name = if repo_path.is_empty() {
            "unknown".to_string()
        } else {
            repo_name_from_path(&repo_path)
        };

        let mut status = RepositoryStatus {
            is_repo: true,
            repo_name,
            repo_path,
            ..RepositoryStatus::not_a_repository(VcsKind::Git)
        };
        status.vcs_color = Accent::BrightCyan;

        let listing = self
            .git(
                directory,
                &["-c", "color.status=never", "-c", "color.ui=never", "branch"],
            )
            .await
            .ok()
            .filter(CommandOutput::success);

        let Some(listing) = listing else {
            status.current_branch = AnsiString {
                plain: MISSING_BRANCH.to_string(),
                colored: palette.paint(branch_accent, MISSING_BRANCH),
            };
            status.status = missing_status(palette);
            status.status_counts = aggregate(std::iter::empty(), &GIT, palette).counts;
            status.vcs = AnsiString {
                plain: GIT.vcs.to_string(),
                colored: palette.paint(status.vcs_color, GIT.vcs),
            };
            return Ok(Some(status));
        };

        let (current, others) = parse_branch_listing(&listing.stdout);
        if let Some(current) = current {
            status.vcs_color = vcs_accent_for_branch(&current, &[]);
            status.current_branch = AnsiString {
                colored: palette.paint(branch_accent, &current),
                plain: current,
            };
        }
        status.branches = others
            .into_iter()
            .map(|branch| AnsiString {
                colored: palette.paint(Accent::White, &branch),
                plain: branch,
            })
            .collect();
        status.vcs = AnsiString {
            plain: GIT.vcs.to_string(),
            colored: palette.paint(status.vcs_color, GIT.vcs),
        };

        let color_flag = if palette.enabled() { "always" } else { "never" };
        let status_color = format!("color.status={color_flag}");
        let ui_color = format!("color.ui={color_flag}");
        let short = self
            .git(
                directory,
                &["-c", &status_color, "-c", &ui_color, "status", "-s", "-b"],
            )
            .await
            .ok()
            .filter(CommandOutput::success);

        match short {
            Some(short) => {
                let (tracking, summary) = parse_short_status(&short.stdout, palette);
                if let Some(tracking) = tracking {
                    status.tracking = tracking;
                }
                status.status_counts = summary.counts;
                status.status = summary.rendered;
            }
            None => {
                status.status_counts = aggregate(std::iter::empty(), &GIT, palette).counts;
                status.status = missing_status(palette);
            }
        }

        Ok(Some(status))
    }
}

impl Default for GitInspector {
    fn default() -> Self {
        Self::new("git")
    }
}

impl Inspector for GitInspector {
    fn kind(&self) -> VcsKind {
        VcsKind::Git
    }

    async fn inspect(&self, directory: &Path, palette: Palette) -> InspectOutcome {
        match self.load(directory, palette).await {
            Ok(Some(status)) => InspectOutcome::Found(status),
            Ok(None) => InspectOutcome::NotThisVcs,
            Err(err) => InspectOutcome::Failed(err),
        }
    }
}

pub fn branch_accent_for_status(long_status: &str) -> Accent {
    if long_status.contains("still merging") || long_status.contains("Unmerged paths") {
        Accent::BrightMagenta
    } else if long_status.contains("Untracked files") {
        Accent::BrightRed
    } else if long_status.contains("Changes not staged for commit") {
        Accent::BrightYellow
    } else if long_status.contains("Changes to be committed") {
        Accent::Yellow
    } else if long_status.contains("Your branch is ahead of") {
        Accent::Magenta
    } else {
        Accent::Green
    }
}

pub fn parse_branch_listing(output: &str) -> (Option<String>, Vec<String>) {
    let mut current = None;
    let mut others = Vec::new();
    for line in output.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match line.strip_prefix("* ") {
            Some(branch) => current = Some(branch.to_string()),
            None => others.push(line.to_string()),
        }
    }
    (current, others)
}

/// Parse `git status -s -b` into tracking info and aggregated file counts.
pub fn parse_short_status(output: &str, palette: Palette) -> (Option<AnsiString>, StatusSummary) {
    let mut tracking = None;
    let mut files = Vec::new();

    for line in output.lines() {
        let plain = strip_ansi(line);
        if plain.starts_with("##") {
            let colored = match line.find("##") {
                Some(idx) => &line[idx + 2..],
                None => line,
            };
            let colored = colored.strip_prefix(' ').unwrap_or(colored);
            tracking = Some(AnsiString::from_colored(colored));
        } else {
            files.push(line);
        }
    }

    (tracking, aggregate(files, &GIT, palette))
}

fn missing_status(palette: Palette) -> AnsiString {
    AnsiString {
        plain: MISSING_STATUS.to_string(),
        colored: palette.paint(Accent::BrightRed, MISSING_STATUS),
    }
}

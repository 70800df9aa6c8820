use crate::palette::Palette;
use crate::types::{exit_code, OutputFormat, RepositoryStatus, Request, Response};

pub fn render(request: &Request, status: Option<&RepositoryStatus>) -> Response {
    if request.directory.is_empty() {
        return Response::empty_directory();
    }
    let Some(status) = status else {
        return Response::load_failed();
    };

    let palette = Palette::new(request.force_color);
    match request.output_format {
        OutputFormat::Full => match render_full(status) {
            Ok(content) => Response::ok(content),
            Err(err) => Response::new(
                exit_code::REPOSITORY_LOAD_FAILED,
                format!("Error encoding repository information: {err}"),
            ),
        },
        OutputFormat::Prompt => Response::ok(render_prompt(status, palette)),
        OutputFormat::StatusLine => Response::ok(render_status_line(status)),
    }
}

pub fn render_full(status: &RepositoryStatus) -> Result<String, serde_json::Error> {
    let mut output = serde_json::to_string_pretty(status)?;
    output.push('\n');
    Ok(output)
}

/// `vcs:<branch> {other, branches}` then the status summary.
pub fn render_prompt(status: &RepositoryStatus, palette: Palette) -> String {
    let mut output = format!(
        "{}{}{}{}",
        status.vcs.colored,
        palette.paint(status.vcs_color, ":<"),
        status.current_branch.colored,
        palette.paint(status.vcs_color, ">"),
    );
    if !status.branches.is_empty() {
        let others: Vec<&str> = status
            .branches
            .iter()
            .map(|branch| branch.colored.as_str())
            .collect();
        output.push_str(&format!(" {{{}}}", others.join(", ")));
    }
    output.push('\n');
    output.push_str(&status.status.colored);
    output.push('\n');
    output
}

pub fn render_status_line(status: &RepositoryStatus) -> String {
    [
        status.vcs.colored.as_str(),
        status.repo_name.as_str(),
        status.tracking.colored.as_str(),
        status.status.colored.as_str(),
        status.repo_path.as_str(),
    ]
    .iter()
    .map(|line| format!("{line}\n"))
    .collect()
}

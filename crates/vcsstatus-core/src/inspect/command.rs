use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;

use super::InspectError;

#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub cmd: String,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    pub fn into_failure(self) -> InspectError {
        InspectError::CommandFailed {
            cmd: self.cmd,
            code: self.code,
            stderr: self.stderr.trim().to_string(),
        }
    }
}

/// A non-zero exit is not an error here; callers decide what each exit code
/// means. The child is killed if the returned future is dropped early.
pub async fn run_command(
    program: &str,
    directory: &Path,
    args: &[&str],
) -> Result<CommandOutput, InspectError> {
    let cmd_string = format!("{} {}", program, args.join(" "));

    let output = Command::new(program)
        .args(args)
        .current_dir(directory)
        .env("GIT_OPTIONAL_LOCKS", "0")
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|source| InspectError::CommandIo {
            cmd: cmd_string.clone(),
            source,
        })?;

    let stdout = String::from_utf8(output.stdout).map_err(|_| InspectError::OutputNotUtf8 {
        cmd: cmd_string.clone(),
    })?;
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    Ok(CommandOutput {
        cmd: cmd_string,
        code: output.status.code(),
        stdout,
        stderr,
    })
}

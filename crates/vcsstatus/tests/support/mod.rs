#![allow(dead_code)]

use std::os::unix::fs::FileTypeExt;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Output, Stdio};
use std::time::{Duration, Instant};

use tempfile::TempDir;

pub fn vcsstatus_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_vcsstatus"))
}

/// A command with a private HOME and no inherited vcsstatus settings.
pub fn vcsstatus(home: &Path) -> Command {
    let mut cmd = Command::new(vcsstatus_bin());
    cmd.env("HOME", home)
        .env_remove("VCSSTATUS_CONFIG")
        .env_remove("VCSSTATUS_SOCKET_PATH")
        .env_remove("VCSSTATUS_OVERWRITE_SOCKET")
        .env_remove("VCSSTATUS_GIT")
        .env_remove("VCSSTATUS_HG")
        .env_remove("RUST_LOG");
    cmd
}

pub fn run(cmd: &mut Command) -> Output {
    cmd.output().expect("run vcsstatus")
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn run_git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git command");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Repository on branch `topic` with one modified file.
pub fn init_repo_with_change() -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    run_git(dir.path(), &["init", "-q"]);
    run_git(dir.path(), &["config", "user.email", "test@example.com"]);
    run_git(dir.path(), &["config", "user.name", "Vcsstatus Test"]);
    std::fs::write(dir.path().join("file.txt"), "line-1\n").expect("write file");
    run_git(dir.path(), &["add", "file.txt"]);
    run_git(dir.path(), &["-c", "commit.gpgsign=false", "commit", "-qm", "init"]);
    run_git(dir.path(), &["checkout", "-q", "-b", "topic"]);
    std::fs::write(dir.path().join("file.txt"), "line-1\nline-2\n").expect("write change");
    dir
}

pub struct DaemonProcess {
    child: Child,
    pub socket: PathBuf,
}

impl DaemonProcess {
    pub fn spawn(home: &Path, socket: &Path, extra: &[&str]) -> Self {
        let child = vcsstatus(home)
            .args(["--exec", "daemon", "--socketpath"])
            .arg(socket)
            .args(extra)
            .current_dir(home)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .expect("spawn vcsstatus daemon");
        Self {
            child,
            socket: socket.to_path_buf(),
        }
    }

    pub fn pid(&self) -> u32 {
        self.child.id()
    }

    /// Send SIGTERM and wait for the process to exit.
    pub fn terminate(&mut self) -> std::process::ExitStatus {
        let status = Command::new("kill")
            .args(["-TERM", &self.pid().to_string()])
            .status()
            .expect("run kill");
        assert!(status.success());
        self.wait_exit(Duration::from_secs(10))
            .expect("daemon did not exit after SIGTERM")
    }

    pub fn wait_exit(&mut self, limit: Duration) -> Option<std::process::ExitStatus> {
        let deadline = Instant::now() + limit;
        while Instant::now() < deadline {
            if let Some(status) = self.child.try_wait().expect("poll daemon") {
                return Some(status);
            }
            std::thread::sleep(Duration::from_millis(20));
        }
        None
    }
}

impl Drop for DaemonProcess {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

pub fn wait_for_socket(path: &Path) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while Instant::now() < deadline {
        let ready = std::fs::metadata(path)
            .map(|meta| meta.file_type().is_socket())
            .unwrap_or(false);
        if ready {
            return;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    panic!("socket {} never appeared", path.display());
}

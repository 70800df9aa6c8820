use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use vcsstatus_core::types::{OutputFormat, VcsPreference};

#[derive(Parser, Debug)]
#[command(name = "vcsstatus")]
#[command(about = "Version control status for shell prompts and status lines")]
#[command(version)]
pub struct Cli {
    /// Force colored output.
    #[arg(short = 'c', long = "color")]
    pub color: bool,
    /// Directory to inspect. Defaults to the current directory.
    #[arg(short = 'd', long = "dir")]
    pub dir: Option<PathBuf>,
    #[arg(short = 'o', long = "output", value_enum, default_value_t = Output::Full)]
    pub output: Output,
    #[arg(short = 'r', long = "vcs", value_enum, default_value_t = Vcs::Detect)]
    pub vcs: Vcs,
    /// Run once, serve as a daemon, or talk to a running daemon.
    #[arg(short = 'X', long = "exec", value_enum, default_value_t = Execution::Singleuse)]
    pub exec: Execution,
    /// Socket the daemon listens on. Defaults to $HOME/.vcsstatus-sock.
    #[arg(short = 'S', long = "socketpath")]
    pub socket_path: Option<PathBuf>,
    /// Replace whatever already exists at the socket path.
    #[arg(short = 'O', long = "overwritesocket")]
    pub overwrite_socket: bool,
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Full,
    Prompt,
    Statusline,
}

impl From<Output> for OutputFormat {
    fn from(value: Output) -> Self {
        match value {
            Output::Full => OutputFormat::Full,
            Output::Prompt => OutputFormat::Prompt,
            Output::Statusline => OutputFormat::StatusLine,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vcs {
    Detect,
    Git,
    #[value(alias = "mercurial")]
    Hg,
}

impl From<Vcs> for VcsPreference {
    fn from(value: Vcs) -> Self {
        match value {
            Vcs::Detect => VcsPreference::Detect,
            Vcs::Git => VcsPreference::Git,
            Vcs::Hg => VcsPreference::Mercurial,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Execution {
    Singleuse,
    Daemon,
    Client,
    Daemoncheck,
    Clientfallback,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Text,
}

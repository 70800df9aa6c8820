mod cli;
mod logging;

use clap::Parser;
use cli::{Cli, Execution, LogLevel};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::debug;

use vcsstatus_core::client::{self, ClientError};
use vcsstatus_core::config::{resolve_config, ConfigError, PartialConfig, ResolvedConfig};
use vcsstatus_core::daemon::{shutdown_signal, Daemon, DaemonError, DaemonOptions};
use vcsstatus_core::service::DefaultStatusService;
use vcsstatus_core::types::{exit_code, Request, Response};

/// Process exit codes for failures that never produced a daemon response.
const EXIT_CLIENT_CONNECT: u8 = 110;
const EXIT_CLIENT_PROTOCOL: u8 = 111;
const EXIT_DAEMON: u8 = 120;
const EXIT_CONFIG: u8 = 78;
const EXIT_OUTPUT: u8 = 74;

#[derive(Debug, thiserror::Error)]
enum Failure {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Daemon(#[from] DaemonError),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("could not start runtime: {0}")]
    Runtime(std::io::Error),
    #[error("could not determine current directory: {0}")]
    CurrentDir(std::io::Error),
    #[error("error writing output: {0}")]
    Output(std::io::Error),
}

impl Failure {
    fn exit_code(&self) -> ExitCode {
        let code = match self {
            Failure::Config(_) => EXIT_CONFIG,
            Failure::Daemon(_) | Failure::Runtime(_) => EXIT_DAEMON,
            Failure::Client(ClientError::Connect { .. }) => EXIT_CLIENT_CONNECT,
            Failure::Client(_) => EXIT_CLIENT_PROTOCOL,
            Failure::CurrentDir(_) => exit_code::EMPTY_DIRECTORY as u8,
            Failure::Output(_) => EXIT_OUTPUT,
        };
        ExitCode::from(code)
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(failure) => {
            eprintln!("vcsstatus: {failure}");
            failure.exit_code()
        }
    }
}

fn run() -> Result<ExitCode, Failure> {
    let cli = Cli::parse();
    if let Err(err) = logging::init(
        cli.log_level.unwrap_or(default_log_level(cli.exec)),
        cli.log_format,
    ) {
        eprintln!("vcsstatus: logging disabled: {err}");
    }

    let overrides = PartialConfig {
        socket_path: cli.socket_path.clone(),
        overwrite_socket: cli.overwrite_socket.then_some(true),
        ..PartialConfig::default()
    };
    let config = resolve_config(cli.config.clone(), overrides)?;
    let request = build_request(&cli)?;

    let runtime = match cli.exec {
        Execution::Daemon => tokio::runtime::Builder::new_multi_thread(),
        _ => tokio::runtime::Builder::new_current_thread(),
    }
    .enable_all()
    .build()
    .map_err(Failure::Runtime)?;

    runtime.block_on(dispatch(cli.exec, request, config))
}

async fn dispatch(
    exec: Execution,
    request: Request,
    config: ResolvedConfig,
) -> Result<ExitCode, Failure> {
    match exec {
        Execution::Singleuse => {
            let response = single_use(&request, &config).await;
            emit(response)
        }
        Execution::Daemon => {
            let service = Arc::new(DefaultStatusService::from_config(&config));
            let daemon = Daemon::bind(DaemonOptions::from_config(&config), service)?;
            daemon.serve(shutdown_signal()).await;
            Ok(ExitCode::SUCCESS)
        }
        Execution::Client => {
            let response = client::send_request(&config.socket_path, &request).await?;
            emit(response)
        }
        Execution::Clientfallback => {
            let response = match client::send_request(&config.socket_path, &request).await {
                Ok(response) => response,
                Err(ClientError::Connect { path, source }) => {
                    debug!(path = %path.display(), error = %source, "daemon unavailable, running locally");
                    single_use(&request, &config).await
                }
                Err(err) => return Err(err.into()),
            };
            emit(response)
        }
        Execution::Daemoncheck => {
            let response = client::check_daemon(&config.socket_path).await?;
            Ok(exit_code_of(&response))
        }
    }
}

async fn single_use(request: &Request, config: &ResolvedConfig) -> Response {
    DefaultStatusService::from_config(config)
        .respond(request)
        .await
}

/// Print the response body verbatim and adopt its exit code.
fn emit(response: Response) -> Result<ExitCode, Failure> {
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(response.content.as_bytes())
        .and_then(|()| stdout.flush())
        .map_err(Failure::Output)?;
    Ok(exit_code_of(&response))
}

fn exit_code_of(response: &Response) -> ExitCode {
    ExitCode::from(u8::try_from(response.exit_code).unwrap_or(u8::MAX))
}

/// The directory is made absolute here: a daemon resolves relative paths
/// against its own working directory, not the client's.
fn build_request(cli: &Cli) -> Result<Request, Failure> {
    let directory = match &cli.dir {
        Some(dir) if !dir.as_os_str().is_empty() => {
            std::path::absolute(dir).map_err(Failure::CurrentDir)?
        }
        _ => std::env::current_dir().map_err(Failure::CurrentDir)?,
    };

    Ok(Request {
        directory: path_string(directory),
        force_color: cli.color,
        output_format: cli.output.into(),
        vcs_preference: cli.vcs.into(),
        is_status_check: false,
    })
}

fn path_string(path: PathBuf) -> String {
    path.to_string_lossy().into_owned()
}

fn default_log_level(exec: Execution) -> LogLevel {
    match exec {
        Execution::Daemon => LogLevel::Info,
        _ => LogLevel::Warn,
    }
}

//! The long-lived status daemon.
//!
//! Lifecycle: `Initializing` (clear and bind the socket) → `Listening` (accept
//! and spawn one task per connection) → `ShuttingDown` (stop accepting, remove
//! the socket, give in-flight connections a grace period) → `Stopped`.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::UnixListener;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::config::ResolvedConfig;
use crate::handler::handle_connection;
use crate::inspect::Inspector;
use crate::service::StatusService;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaemonState {
    Initializing,
    Listening,
    ShuttingDown,
    Stopped,
}

#[derive(Debug, Clone)]
pub struct DaemonOptions {
    pub socket_path: PathBuf,
    pub overwrite_socket: bool,
    pub shutdown_grace: Duration,
}

impl DaemonOptions {
    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self {
            socket_path: config.socket_path.clone(),
            overwrite_socket: config.overwrite_socket,
            shutdown_grace: Duration::from_secs(config.shutdown_grace_secs),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    #[error("socket path already exists: {path} (use --overwritesocket to replace it)")]
    SocketOccupied { path: PathBuf },
    #[error("error reading socket path: {path}: {source}")]
    SocketPath { path: PathBuf, source: std::io::Error },
    #[error("could not remove existing file at {path}: {source}")]
    RemoveSocket { path: PathBuf, source: std::io::Error },
    #[error("could not bind socket: {path}: {source}")]
    Bind { path: PathBuf, source: std::io::Error },
}

pub struct Daemon<G, H> {
    listener: UnixListener,
    options: DaemonOptions,
    service: Arc<StatusService<G, H>>,
    state: watch::Sender<DaemonState>,
}

impl<G, H> Daemon<G, H>
where
    G: Inspector + 'static,
    H: Inspector + 'static,
{
    /// Must be called from within a tokio runtime.
    pub fn bind(
        options: DaemonOptions,
        service: Arc<StatusService<G, H>>,
    ) -> Result<Self, DaemonError> {
        let (state, _) = watch::channel(DaemonState::Initializing);

        prepare_socket_path(&options.socket_path, options.overwrite_socket)?;
        let listener =
            UnixListener::bind(&options.socket_path).map_err(|source| DaemonError::Bind {
                path: options.socket_path.clone(),
                source,
            })?;

        state.send_replace(DaemonState::Listening);
        info!(path = %options.socket_path.display(), "listening");

        Ok(Self {
            listener,
            options,
            service,
            state,
        })
    }

    pub fn socket_path(&self) -> &Path {
        &self.options.socket_path
    }

    pub fn state(&self) -> watch::Receiver<DaemonState> {
        self.state.subscribe()
    }

    pub async fn serve<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let Daemon {
            listener,
            options,
            service,
            state,
        } = self;
        tokio::pin!(shutdown);

        let mut connections = JoinSet::new();
        loop {
            tokio::select! {
                biased;

                _ = &mut shutdown => {
                    info!("shutting down");
                    state.send_replace(DaemonState::ShuttingDown);
                    break;
                }
                accepted = listener.accept() => match accepted {
                    Ok((stream, _)) => {
                        let service = Arc::clone(&service);
                        connections.spawn(async move {
                            handle_connection(stream, &service).await;
                        });
                    }
                    // Shutdown is polled first and drops the listener, so an
                    // accept error here always happened while still listening.
                    Err(err) => {
                        warn!(error = %err, "error accepting connection");
                    }
                },
                Some(joined) = connections.join_next(), if !connections.is_empty() => {
                    if let Err(err) = joined {
                        warn!(error = %err, "connection task failed");
                    }
                }
            }
        }

        drop(listener);
        remove_socket(&options.socket_path);

        if !connections.is_empty() {
            debug!(in_flight = connections.len(), "waiting for connections");
            let drained =
                tokio::time::timeout(options.shutdown_grace, drain(&mut connections)).await;
            if drained.is_err() {
                warn!(
                    in_flight = connections.len(),
                    "grace period expired, aborting connections"
                );
                connections.shutdown().await;
            }
        }

        state.send_replace(DaemonState::Stopped);
        info!("stopped");
    }
}

async fn drain(connections: &mut JoinSet<()>) {
    while let Some(joined) = connections.join_next().await {
        if let Err(err) = joined {
            warn!(error = %err, "connection task failed");
        }
    }
}

fn prepare_socket_path(path: &Path, overwrite: bool) -> Result<(), DaemonError> {
    let metadata = match std::fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return ensure_parent(path);
        }
        Err(source) => {
            return Err(DaemonError::SocketPath {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    if !overwrite {
        return Err(DaemonError::SocketOccupied {
            path: path.to_path_buf(),
        });
    }

    let removed = if metadata.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };
    removed.map_err(|source| DaemonError::RemoveSocket {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "removed existing socket");
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<(), DaemonError> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(parent).map_err(|source| DaemonError::SocketPath {
        path: path.to_path_buf(),
        source,
    })
}

fn remove_socket(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => debug!(path = %path.display(), "removed socket"),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => warn!(path = %path.display(), error = %err, "could not remove socket"),
    }
}

/// Resolves on SIGINT or SIGTERM.
pub async fn shutdown_signal() {
    let interrupt = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "could not listen for interrupt");
            std::future::pending::<()>().await;
        }
    };

    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "could not listen for terminate");
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        _ = interrupt => info!(signal = "interrupt", "received signal"),
        _ = terminate => info!(signal = "terminate", "received signal"),
    }
}

use std::path::{Path, PathBuf};

use tokio::net::UnixStream;
use tracing::debug;

use crate::protocol::{read_response, write_message, ProtocolError};
use crate::types::{Request, Response};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("error connecting to {path}: {source}")]
    Connect { path: PathBuf, source: std::io::Error },
    #[error("error sending request: {0}")]
    Send(#[source] ProtocolError),
    #[error("error reading response: {0}")]
    Receive(#[source] ProtocolError),
}

pub async fn send_request(socket_path: &Path, request: &Request) -> Result<Response, ClientError> {
    let mut stream =
        UnixStream::connect(socket_path)
            .await
            .map_err(|source| ClientError::Connect {
                path: socket_path.to_path_buf(),
                source,
            })?;
    debug!(path = %socket_path.display(), "connected");

    write_message(&mut stream, request)
        .await
        .map_err(ClientError::Send)?;
    read_response(&mut stream)
        .await
        .map_err(ClientError::Receive)
}

pub async fn check_daemon(socket_path: &Path) -> Result<Response, ClientError> {
    send_request(socket_path, &Request::status_check()).await
}

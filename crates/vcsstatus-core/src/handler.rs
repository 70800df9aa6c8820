use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::inspect::Inspector;
use crate::protocol::{read_request, write_message};
use crate::service::StatusService;
use crate::types::Response;

/// Serve exactly one request on `stream`, then close it.
pub async fn handle_connection<S, G, H>(mut stream: S, service: &StatusService<G, H>)
where
    S: AsyncRead + AsyncWrite + Unpin,
    G: Inspector,
    H: Inspector,
{
    let read = tokio::time::timeout(service.request_timeout(), read_request(&mut stream)).await;

    let response = match read {
        Err(_) => {
            debug!(timeout = ?service.request_timeout(), "timed out waiting for request");
            Response::request_timeout()
        }
        Ok(Err(err)) => {
            debug!(error = %err, "malformed request");
            Response::malformed(err)
        }
        Ok(Ok(request)) if request.is_status_check => Response::alive(),
        Ok(Ok(request)) => {
            debug!(?request, "handling request");
            service.respond(&request).await
        }
    };

    if let Err(err) = write_message(&mut stream, &response).await {
        warn!(error = %err, "error writing response");
    }
    if let Err(err) = stream.shutdown().await {
        debug!(error = %err, "error closing connection");
    }
}

//! Uptime heartbeat sent after a successful run.

use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum HeartbeatError {
    #[error("heartbeat request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("heartbeat endpoint answered {status}")]
    Status { status: u16 },
}

/// GET `url` once. Any non-2xx answer is an error.
#[instrument(skip(client, url))]
pub async fn send_heartbeat(client: &reqwest::Client, url: &str) -> Result<(), HeartbeatError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(HeartbeatError::Status {
            status: status.as_u16(),
        });
    }
    debug!(status = status.as_u16(), "heartbeat delivered");
    Ok(())
}

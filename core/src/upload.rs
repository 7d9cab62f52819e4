//! The upload boundary. The shipped transport only simulates latency; a
//! real backend would implement [`UploadTransport`] over its own wire.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::model::photo::Photo;

/// Round-trip time of the simulated transport.
pub const SIMULATED_UPLOAD_DELAY: Duration = Duration::from_secs(2);

/// Failure kinds a transport can report. The simulated transport never
/// fails; a real one maps its I/O errors onto these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("transport rejected the payload: {0}")]
    Rejected(String),

    #[error("upload timed out after {0:?}")]
    TimedOut(Duration),
}

/// Accepts a photo payload and reports success or failure.
#[async_trait]
pub trait UploadTransport: Send + Sync {
    async fn upload(&self, photo: &Photo) -> Result<(), UploadError>;
}

/// Stand-in transport: sleeps for a fixed delay, then succeeds.
#[derive(Debug, Clone)]
pub struct SimulatedUploadTransport {
    delay: Duration,
}

impl SimulatedUploadTransport {
    pub fn new() -> Self {
        Self {
            delay: SIMULATED_UPLOAD_DELAY,
        }
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedUploadTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UploadTransport for SimulatedUploadTransport {
    async fn upload(&self, photo: &Photo) -> Result<(), UploadError> {
        debug!(bytes = photo.len(), "simulated upload in progress");
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}

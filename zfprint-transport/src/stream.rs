//! Transport over a byte stream supplied by the host
//!
//! Channel setup (pairing an RFCOMM socket, opening a USB-CDC device) is
//! done by the caller; this transport only drives the resulting stream.

use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;
use tracing::{debug, trace, warn};

use crate::{error::*, Transport};

const READ_CHUNK: usize = 512;

/// Transport over any `AsyncRead + AsyncWrite` stream
///
/// The stream is considered open from construction. `connect` after a
/// `disconnect` fails, since the stream cannot be reopened from here.
///
/// ```
/// use zfprint_transport::{StreamTransport, Transport};
///
/// let (client, _device) = tokio::io::duplex(256);
/// let transport = StreamTransport::new(client, "duplex");
/// assert!(transport.is_connected());
/// ```
pub struct StreamTransport<S> {
    stream: Option<S>,
    label: String,
}

impl<S> StreamTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + Sync,
{
    pub fn new(stream: S, label: impl Into<String>) -> Self {
        Self {
            stream: Some(stream),
            label: label.into(),
        }
    }

    /// Take the stream back, if still open
    pub fn into_inner(mut self) -> Option<S> {
        self.stream.take()
    }
}

#[async_trait]
impl<S> Transport for StreamTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + Sync,
{
    async fn connect(&mut self) -> Result<()> {
        if self.stream.is_some() {
            Ok(())
        } else {
            Err(Error::Open {
                endpoint: self.label.clone(),
                reason: "stream already released".into(),
            })
        }
    }

    async fn disconnect(&mut self) -> Result<()> {
        if let Some(mut stream) = self.stream.take() {
            debug!("Releasing stream {}", self.label);
            if let Err(e) = stream.shutdown().await {
                warn!("Stream {} did not shut down cleanly: {}", self.label, e);
            }
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    async fn send(&mut self, data: &[u8]) -> Result<()> {
        let stream = self.stream.as_mut().ok_or(Error::NotConnected)?;

        trace!(bytes = data.len(), data = %hex::encode(data), "Stream send");

        stream.write_all(data).await?;
        stream.flush().await?;
        Ok(())
    }

    async fn receive(&mut self, wait: Duration) -> Result<BytesMut> {
        let stream = self.stream.as_mut().ok_or(Error::NotConnected)?;

        let mut buf = BytesMut::with_capacity(READ_CHUNK);
        let n = timeout(wait, stream.read_buf(&mut buf))
            .await
            .map_err(|_| Error::ReadTimeout)??;

        if n == 0 {
            return Err(Error::ConnectionClosed);
        }

        trace!(bytes = n, data = %hex::encode(&buf), "Stream receive");
        Ok(buf)
    }

    fn endpoint(&self) -> String {
        self.label.clone()
    }
}

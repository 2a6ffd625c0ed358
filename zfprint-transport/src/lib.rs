//! Transport layer for the ZFP protocol
//!
//! A printer is reached over a duplex byte stream. This crate provides the
//! [`Transport`] boundary and its implementations:
//! - [`StreamTransport`] over any stream handed in by the host (RFCOMM
//!   socket, USB-CDC handle, in-memory duplex)
//! - [`TcpTransport`] for serial device servers
//! - `SerialTransport` for local serial ports (feature `serial`)
//! - [`FallbackTransport`] trying one transport, then another

pub mod error;
pub mod fallback;
#[cfg(feature = "serial")]
pub mod serial;
pub mod stream;
pub mod tcp;

pub use error::{Error, Result};
pub use fallback::FallbackTransport;
#[cfg(feature = "serial")]
pub use serial::SerialTransport;
pub use stream::StreamTransport;
pub use tcp::TcpTransport;

use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;

/// Transport trait for different communication channels
#[async_trait]
pub trait Transport: Send + Sync {
    /// Open the channel
    async fn connect(&mut self) -> Result<()>;

    /// Close the channel
    async fn disconnect(&mut self) -> Result<()>;

    /// Check if connected
    fn is_connected(&self) -> bool;

    /// Write all bytes
    async fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Read whatever is available
    ///
    /// Returns as soon as at least one byte has arrived, or
    /// [`Error::ReadTimeout`] if nothing arrives within `timeout`.
    async fn receive(&mut self, timeout: Duration) -> Result<BytesMut>;

    /// Human-readable description of the peer
    fn endpoint(&self) -> String;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Box<T> {
    async fn connect(&mut self) -> Result<()> {
        (**self).connect().await
    }

    async fn disconnect(&mut self) -> Result<()> {
        (**self).disconnect().await
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }

    async fn send(&mut self, data: &[u8]) -> Result<()> {
        (**self).send(data).await
    }

    async fn receive(&mut self, timeout: Duration) -> Result<BytesMut> {
        (**self).receive(timeout).await
    }

    fn endpoint(&self) -> String {
        (**self).endpoint()
    }
}

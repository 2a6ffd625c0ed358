//! High-level printer interface

use std::time::Duration;

use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, info};

use zfprint_core::{Request, Response};
use zfprint_transport::{StreamTransport, TcpTransport, Transport};

use crate::config::PrinterConfig;
use crate::error::{Error, Result};
use crate::link::{DisconnectHandle, Link};

/// ZFP fiscal printer
///
/// One `Printer` owns one exclusive binding to a device. Every operation
/// takes `&mut self`, so commands never overlap; share the printer behind a
/// `tokio::sync::Mutex` when several tasks need it.
///
/// # Examples
///
/// ```no_run
/// use zfprint::Printer;
///
/// #[tokio::main]
/// async fn main() -> zfprint::Result<()> {
///     let mut printer = Printer::tcp("192.168.1.50", 4999);
///     printer.connect().await?;
///
///     let status = printer.status().await?;
///     println!("{}", status);
///
///     printer.disconnect().await?;
///     Ok(())
/// }
/// ```
pub struct Printer {
    link: Link,
}

impl Printer {
    /// Printer over any transport
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            link: Link::new(Box::new(transport), PrinterConfig::default()),
        }
    }

    /// Printer behind a serial device server
    pub fn tcp(host: impl Into<String>, port: u16) -> Self {
        Self::new(TcpTransport::new(host, port))
    }

    /// Printer on a local serial port
    #[cfg(feature = "serial")]
    pub fn serial(path: impl Into<String>, baud_rate: u32) -> Self {
        Self::new(zfprint_transport::SerialTransport::new(path).with_baud_rate(baud_rate))
    }

    /// Printer on a stream opened by the host, e.g. an RFCOMM socket
    pub fn stream<S>(stream: S, label: impl Into<String>) -> Self
    where
        S: AsyncRead + AsyncWrite + Unpin + Send + Sync + 'static,
    {
        Self::new(StreamTransport::new(stream, label))
    }

    pub fn with_config(mut self, config: PrinterConfig) -> Self {
        *self.link.config_mut() = config;
        self
    }

    /// Set how long to wait for a command response
    pub fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.link.config_mut().response_timeout = timeout;
        self
    }

    /// Set how long to wait for each liveness/busy probe
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.link.config_mut().probe_timeout = timeout;
        self
    }

    /// Set how many probes are sent before giving up
    pub fn with_probe_retries(mut self, retries: u32) -> Self {
        self.link.config_mut().probe_retries = retries;
        self
    }

    pub fn config(&self) -> &PrinterConfig {
        self.link.config()
    }

    pub fn endpoint(&self) -> String {
        self.link.endpoint()
    }

    /// Check if connected
    pub fn is_connected(&self) -> bool {
        self.link.is_connected()
    }

    /// Open the transport
    ///
    /// No bytes are exchanged until the first command; every command starts
    /// with its own handshake.
    ///
    /// # Errors
    ///
    /// Returns error if the transport cannot be opened or the printer was
    /// already disconnected. A disconnected printer is never reused.
    pub async fn connect(&mut self) -> Result<()> {
        info!("Connecting to {}...", self.link.endpoint());
        self.link.open().await
    }

    /// Close the session and the transport
    pub async fn disconnect(&mut self) -> Result<()> {
        self.link.close().await;
        info!("Disconnected");
        Ok(())
    }

    /// Handle for disconnecting from another task
    ///
    /// ```no_run
    /// # async fn run() -> zfprint::Result<()> {
    /// let mut printer = zfprint::Printer::tcp("192.168.1.50", 4999);
    /// printer.connect().await?;
    ///
    /// let handle = printer.disconnect_handle();
    /// tokio::spawn(async move {
    ///     tokio::time::sleep(std::time::Duration::from_secs(30)).await;
    ///     handle.disconnect();
    /// });
    ///
    /// printer.report_daily(zfprint::ReportMode::Z, false).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn disconnect_handle(&self) -> DisconnectHandle {
        self.link.disconnect_handle()
    }

    /// Run a command, discarding the acknowledgement
    pub(crate) async fn command(&mut self, request: Request) -> Result<()> {
        self.link.execute(&request).await?;
        Ok(())
    }

    /// Run a query and return the response payload
    ///
    /// A bare acknowledgement carries no payload to parse and is reported
    /// as a bad response.
    pub(crate) async fn query(&mut self, request: Request) -> Result<Bytes> {
        let command = request.command;
        match self.link.execute(&request).await? {
            Response::Data(frame) => Ok(frame.payload),
            Response::Ack { .. } => {
                debug!(%command, "Query answered with a bare acknowledgement");
                Err(Error::Decode(zfprint_types::Error::Parse(format!(
                    "{}: expected a data response, got an acknowledgement",
                    command
                ))))
            }
        }
    }

    /// Write a raw block after the handshake; nothing is read back
    pub(crate) async fn send_unacknowledged(&mut self, data: &[u8]) -> Result<()> {
        self.link.send_unacknowledged(data).await
    }
}

impl std::fmt::Debug for Printer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Printer")
            .field("endpoint", &self.link.endpoint())
            .field("state", &self.link.session().state())
            .field("config", self.link.config())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_config() {
        let printer = Printer::tcp("127.0.0.1", 4999)
            .with_response_timeout(Duration::from_secs(5))
            .with_probe_timeout(Duration::from_millis(200))
            .with_probe_retries(3);

        assert_eq!(printer.config().response_timeout, Duration::from_secs(5));
        assert_eq!(printer.config().probe_timeout, Duration::from_millis(200));
        assert_eq!(printer.config().probe_retries, 3);
        assert_eq!(printer.endpoint(), "127.0.0.1:4999");
        assert!(!printer.is_connected());
    }

    #[tokio::test]
    async fn test_command_before_connect() {
        let mut printer = Printer::tcp("127.0.0.1", 4999);
        let err = printer.status().await.unwrap_err();
        assert!(matches!(err, Error::NotConnected));
    }

    #[tokio::test]
    async fn test_disconnected_printer_is_not_reused() {
        let (client, _device) = tokio::io::duplex(64);
        let mut printer = Printer::stream(client, "duplex");

        printer.connect().await.unwrap();
        assert!(printer.is_connected());

        printer.disconnect().await.unwrap();
        assert!(!printer.is_connected());
        assert!(matches!(printer.connect().await, Err(Error::Closed)));
        assert!(matches!(printer.status().await, Err(Error::Closed)));
    }
}

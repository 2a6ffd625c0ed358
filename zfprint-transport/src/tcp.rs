//! TCP transport for printers behind a serial device server
//!
//! The server forwards the raw byte stream to the printer's serial port,
//! so nothing beyond a plain socket is needed here.

use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, trace, warn};

use crate::{error::*, Transport};

/// Receive buffer size; a ZFP response never exceeds 256 bytes
const READ_CHUNK: usize = 512;

/// Printer reached through `host:port`
pub struct TcpTransport {
    host: String,
    port: u16,
    stream: Option<TcpStream>,
    connect_timeout: Duration,
}

impl TcpTransport {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            stream: None,
            connect_timeout: Duration::from_secs(5),
        }
    }

    /// Bound name resolution plus the TCP handshake
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn connect(&mut self) -> Result<()> {
        if self.stream.is_some() {
            return Err(Error::AlreadyConnected);
        }

        let endpoint = self.endpoint();
        debug!("Opening {}", endpoint);

        let stream = timeout(
            self.connect_timeout,
            TcpStream::connect((self.host.as_str(), self.port)),
        )
        .await
        .map_err(|_| Error::ConnectionTimeout)?
        .map_err(|e| Error::Open {
            endpoint,
            reason: e.to_string(),
        })?;

        // probe bytes go out one or two at a time
        stream.set_nodelay(true)?;

        self.stream = Some(stream);
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        if let Some(mut stream) = self.stream.take() {
            debug!("Closing {}", self.endpoint());
            if let Err(e) = stream.shutdown().await {
                warn!("Socket to {} did not shut down cleanly: {}", self.endpoint(), e);
            }
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    async fn send(&mut self, data: &[u8]) -> Result<()> {
        let stream = self.stream.as_mut().ok_or(Error::NotConnected)?;

        trace!(bytes = data.len(), data = %hex::encode(data), "TCP send");
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

        trace!(bytes = n, data = %hex::encode(&buf), "TCP receive");
        Ok(buf)
    }

    fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_tcp_transport_create() {
        let transport = TcpTransport::new("192.168.1.201", 4001);
        assert!(!transport.is_connected());
        assert_eq!(transport.endpoint(), "192.168.1.201:4001");
    }

    #[tokio::test]
    async fn test_tcp_transport_invalid_address() {
        let mut transport = TcpTransport::new("invalid..address", 4001)
            .with_connect_timeout(Duration::from_millis(100));

        let result = transport.connect().await;
        assert!(matches!(
            result,
            Err(Error::Open { .. } | Error::ConnectionTimeout)
        ));
        assert!(!transport.is_connected());
    }

    #[tokio::test]
    async fn test_refused_connection_names_endpoint() {
        // bind then drop to get a port nobody listens on
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().port()
        };

        let mut transport = TcpTransport::new("127.0.0.1", port);
        match transport.connect().await {
            Err(Error::Open { endpoint, .. }) => {
                assert_eq!(endpoint, format!("127.0.0.1:{}", port))
            }
            other => panic!("expected open error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_tcp_round_trip() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut byte = [0u8; 1];
            socket.read_exact(&mut byte).await.unwrap();
            socket.write_all(&byte).await.unwrap();
        });

        let mut transport = TcpTransport::new("127.0.0.1", port);
        transport.connect().await.unwrap();
        assert!(matches!(transport.connect().await, Err(Error::AlreadyConnected)));

        transport.send(&[0x04]).await.unwrap();
        let echoed = transport.receive(Duration::from_secs(1)).await.unwrap();
        assert_eq!(&echoed[..], &[0x04]);

        server.await.unwrap();
        transport.disconnect().await.unwrap();
        assert!(!transport.is_connected());
        // closing twice is harmless
        transport.disconnect().await.unwrap();
    }

    #[tokio::test]
    async fn test_send_requires_connection() {
        let mut transport = TcpTransport::new("127.0.0.1", 1);
        assert!(matches!(transport.send(&[0x04]).await, Err(Error::NotConnected)));
    }
}

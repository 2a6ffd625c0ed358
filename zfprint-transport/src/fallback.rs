//! Capability selection between two transports
//!
//! Some hosts expose the same printer through more than one channel, for
//! example a secure and an insecure RFCOMM socket, where only one works
//! for a given device. [`FallbackTransport`] tries the primary on
//! `connect` and switches to the secondary when it fails.

use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use tracing::{debug, warn};

use crate::{error::*, Transport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Active {
    Primary,
    Secondary,
}

/// Transport that falls back to a second channel when the first cannot connect
pub struct FallbackTransport {
    primary: Box<dyn Transport>,
    secondary: Box<dyn Transport>,
    active: Option<Active>,
}

impl FallbackTransport {
    pub fn new(primary: impl Transport + 'static, secondary: impl Transport + 'static) -> Self {
        Self {
            primary: Box::new(primary),
            secondary: Box::new(secondary),
            active: None,
        }
    }

    /// Whether the secondary channel is the one in use
    pub fn is_fallback(&self) -> bool {
        self.active == Some(Active::Secondary)
    }

    fn current(&mut self) -> Result<&mut Box<dyn Transport>> {
        match self.active {
            Some(Active::Primary) => Ok(&mut self.primary),
            Some(Active::Secondary) => Ok(&mut self.secondary),
            None => Err(Error::NotConnected),
        }
    }
}

#[async_trait]
impl Transport for FallbackTransport {
    async fn connect(&mut self) -> Result<()> {
        if self.active.is_some() {
            return Err(Error::AlreadyConnected);
        }

        let first = match self.primary.connect().await {
            Ok(()) => {
                debug!("Connected through {}", self.primary.endpoint());
                self.active = Some(Active::Primary);
                return Ok(());
            }
            Err(e) => e,
        };

        warn!(
            primary = %self.primary.endpoint(),
            error = %first,
            "Primary transport failed, trying {}",
            self.secondary.endpoint()
        );

        match self.secondary.connect().await {
            Ok(()) => {
                self.active = Some(Active::Secondary);
                Ok(())
            }
            Err(second) => Err(Error::Exhausted(format!(
                "{}: {}; {}: {}",
                self.primary.endpoint(),
                first,
                self.secondary.endpoint(),
                second
            ))),
        }
    }

    async fn disconnect(&mut self) -> Result<()> {
        let result = match self.active {
            Some(_) => self.current()?.disconnect().await,
            None => Ok(()),
        };
        self.active = None;
        result
    }

    fn is_connected(&self) -> bool {
        match self.active {
            Some(Active::Primary) => self.primary.is_connected(),
            Some(Active::Secondary) => self.secondary.is_connected(),
            None => false,
        }
    }

    async fn send(&mut self, data: &[u8]) -> Result<()> {
        self.current()?.send(data).await
    }

    async fn receive(&mut self, timeout: Duration) -> Result<BytesMut> {
        self.current()?.receive(timeout).await
    }

    fn endpoint(&self) -> String {
        match self.active {
            Some(Active::Secondary) => self.secondary.endpoint(),
            _ => self.primary.endpoint(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{StreamTransport, TcpTransport};

    fn unreachable_tcp() -> TcpTransport {
        TcpTransport::new("invalid..address", 4001).with_connect_timeout(Duration::from_millis(50))
    }

    #[tokio::test]
    async fn test_primary_wins() {
        let (a, _a_peer) = tokio::io::duplex(16);
        let (b, _b_peer) = tokio::io::duplex(16);
        let mut transport =
            FallbackTransport::new(StreamTransport::new(a, "secure"), StreamTransport::new(b, "insecure"));

        transport.connect().await.unwrap();
        assert!(!transport.is_fallback());
        assert_eq!(transport.endpoint(), "secure");
    }

    #[tokio::test]
    async fn test_falls_back_to_secondary() {
        let (b, mut peer) = tokio::io::duplex(16);
        let mut transport = FallbackTransport::new(unreachable_tcp(), StreamTransport::new(b, "insecure"));

        transport.connect().await.unwrap();
        assert!(transport.is_fallback());
        assert!(transport.is_connected());

        transport.send(&[0x05]).await.unwrap();
        let mut byte = [0u8; 1];
        tokio::io::AsyncReadExt::read_exact(&mut peer, &mut byte).await.unwrap();
        assert_eq!(byte, [0x05]);

        transport.disconnect().await.unwrap();
        assert!(!transport.is_connected());
    }

    #[tokio::test]
    async fn test_both_fail() {
        let mut transport = FallbackTransport::new(unreachable_tcp(), unreachable_tcp());
        assert!(matches!(transport.connect().await, Err(Error::Exhausted(_))));
        assert!(matches!(transport.send(&[0x04]).await, Err(Error::NotConnected)));
    }
}

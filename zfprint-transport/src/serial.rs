//! Local serial port transport (USB-CDC or RS-232)

use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use tokio_serial::{DataBits, Parity, SerialStream, StopBits};
use tracing::debug;

use crate::stream::StreamTransport;
use crate::{error::*, Transport};

/// Default ZFP line speed
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Serial port transport, 8N1
pub struct SerialTransport {
    path: String,
    baud_rate: u32,
    inner: Option<StreamTransport<SerialStream>>,
}

impl SerialTransport {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            baud_rate: DEFAULT_BAUD_RATE,
            inner: None,
        }
    }

    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }
}

#[async_trait]
impl Transport for SerialTransport {
    async fn connect(&mut self) -> Result<()> {
        if self.is_connected() {
            return Err(Error::AlreadyConnected);
        }

        debug!("Opening {} at {} baud", self.path, self.baud_rate);

        let builder = tokio_serial::new(&self.path, self.baud_rate)
            .data_bits(DataBits::Eight)
            .stop_bits(StopBits::One)
            .parity(Parity::None);

        let port = SerialStream::open(&builder).map_err(|e| Error::Open {
            endpoint: self.path.clone(),
            reason: e.to_string(),
        })?;

        self.inner = Some(StreamTransport::new(port, self.path.clone()));
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        match self.inner.take() {
            Some(mut inner) => inner.disconnect().await,
            None => Ok(()),
        }
    }

    fn is_connected(&self) -> bool {
        self.inner.as_ref().is_some_and(|inner| inner.is_connected())
    }

    async fn send(&mut self, data: &[u8]) -> Result<()> {
        self.inner
            .as_mut()
            .ok_or(Error::NotConnected)?
            .send(data)
            .await
    }

    async fn receive(&mut self, timeout: Duration) -> Result<BytesMut> {
        self.inner
            .as_mut()
            .ok_or(Error::NotConnected)?
            .receive(timeout)
            .await
    }

    fn endpoint(&self) -> String {
        format!("{}@{}", self.path, self.baud_rate)
    }
}

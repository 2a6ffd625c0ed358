//! Per-command exchange with the printer
//!
//! Every command runs the same cycle:
//! 1. handshake: probe liveness, then busy, each `ANTIECHO, probe` and
//!    waiting for the probe byte to come back
//! 2. send the framed command with the next sequence number
//! 3. read the response: classify its first byte, then collect up to END
//! 4. validate the checksum, the ACK status and the echoed sequence
//!
//! A disconnect requested through a [`DisconnectHandle`] aborts the cycle
//! at whatever await point it is blocked on, and closes the transport even
//! when no command is running.

use std::sync::Arc;
use std::time::Duration;

use bytes::{BufMut, BytesMut};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use zfprint_core::constants::{ANTIECHO, BUSY, END, MAX_RESPONSE_SIZE, PING};
use zfprint_core::{ControlByte, ErrorCode, Frame, Request, Response, Session, SessionState};
use zfprint_transport::{Error as TransportError, Transport};

use crate::config::PrinterConfig;
use crate::error::{Error, Result};

/// Window for discarding late bytes left over by a failed exchange
const STALE_WINDOW: Duration = Duration::from_millis(50);

/// Upper bound on reads while discarding late bytes
const STALE_READS: usize = 16;

type SharedTransport = Arc<Mutex<Box<dyn Transport>>>;

/// Requests a disconnect from another task
///
/// Closing is immediate: a command in flight fails with [`Error::Closed`].
/// The transport is shut down as soon as no exchange holds it.
#[derive(Debug, Clone)]
pub struct DisconnectHandle {
    session: Session,
    cancel: CancellationToken,
}

impl DisconnectHandle {
    pub fn disconnect(&self) {
        let previous = self.session.close();
        self.cancel.cancel();
        if !matches!(previous, SessionState::Idle | SessionState::Closed | SessionState::Disconnected) {
            warn!(state = ?previous, "Disconnect requested while a command is in flight");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.session.is_closed()
    }
}

/// Disconnect if still connected
async fn shutdown(transport: &SharedTransport) {
    let mut transport = transport.lock().await;
    if transport.is_connected() {
        info!("Disconnecting from {}", transport.endpoint());
        if let Err(e) = transport.disconnect().await {
            warn!("Transport did not close cleanly: {}", e);
        }
    }
}

/// Transport plus session: one exclusive binding to a printer
pub(crate) struct Link {
    transport: SharedTransport,
    endpoint: String,
    session: Session,
    config: PrinterConfig,
    cancel: CancellationToken,
    /// A failed exchange may have left bytes in flight
    stale: bool,
}

impl Link {
    pub(crate) fn new(transport: Box<dyn Transport>, config: PrinterConfig) -> Self {
        Self {
            endpoint: transport.endpoint(),
            transport: Arc::new(Mutex::new(transport)),
            session: Session::new(),
            config,
            cancel: CancellationToken::new(),
            stale: false,
        }
    }

    pub(crate) fn config(&self) -> &PrinterConfig {
        &self.config
    }

    pub(crate) fn config_mut(&mut self) -> &mut PrinterConfig {
        &mut self.config
    }

    pub(crate) fn session(&self) -> &Session {
        &self.session
    }

    pub(crate) fn endpoint(&self) -> String {
        self.endpoint.clone()
    }

    pub(crate) fn is_connected(&self) -> bool {
        self.session.is_open()
            && !self.cancel.is_cancelled()
            && self
                .transport
                .try_lock()
                .is_ok_and(|transport| transport.is_connected())
    }

    pub(crate) fn disconnect_handle(&self) -> DisconnectHandle {
        DisconnectHandle {
            session: self.session.clone(),
            cancel: self.cancel.clone(),
        }
    }

    /// Open the transport and bind the session
    ///
    /// Also starts the task that closes the transport once the link is
    /// cancelled, whichever side cancels it.
    pub(crate) async fn open(&mut self) -> Result<()> {
        if self.session.is_closed() || self.cancel.is_cancelled() {
            return Err(Error::Closed);
        }
        if self.session.is_open() {
            return Ok(());
        }

        {
            let mut transport = self.transport.lock().await;
            if !transport.is_connected() {
                transport.connect().await?;
            }
            self.endpoint = transport.endpoint();
        }
        self.session.open()?;

        let cancel = self.cancel.clone();
        let transport = Arc::clone(&self.transport);
        tokio::spawn(async move {
            cancel.cancelled().await;
            shutdown(&transport).await;
        });

        info!("Connected to {}", self.endpoint);
        Ok(())
    }

    /// Close for good
    pub(crate) async fn close(&mut self) {
        self.session.close();
        self.cancel.cancel();
        shutdown(&self.transport).await;
    }

    /// Run one command and return its validated response
    pub(crate) async fn execute(&mut self, request: &Request) -> Result<Response> {
        self.ensure_open().await?;
        if request.payload.len() > Frame::MAX_PAYLOAD_SIZE {
            return Err(zfprint_core::Error::PayloadTooLarge {
                size: request.payload.len(),
                max: Frame::MAX_PAYLOAD_SIZE,
            }
            .into());
        }

        debug!(command = %request.command, "Executing");

        let cancel = self.cancel.clone();
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(Error::Closed),
            result = self.round_trip(request) => result,
        };
        self.settle(result).await
    }

    /// Handshake, then write `data` as is; no response is read
    ///
    /// Used for the logo upload, which is not a regular frame.
    pub(crate) async fn send_unacknowledged(&mut self, data: &[u8]) -> Result<()> {
        self.ensure_open().await?;

        let cancel = self.cancel.clone();
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(Error::Closed),
            result = self.handshake_and_write(data) => result,
        };
        self.settle(result).await
    }

    async fn ensure_open(&mut self) -> Result<()> {
        if self.session.is_closed() || self.cancel.is_cancelled() {
            shutdown(&self.transport).await;
            return Err(Error::Closed);
        }
        if !self.session.is_open() {
            return Err(Error::NotConnected);
        }
        Ok(())
    }

    /// Bring the session back to idle, or tear it down
    async fn settle<T>(&mut self, result: Result<T>) -> Result<T> {
        if self.session.is_closed() || self.cancel.is_cancelled() {
            shutdown(&self.transport).await;
            return Err(Error::Closed);
        }

        if let Err(e) = &result {
            if e.is_fatal() {
                warn!("Transport lost: {}", e);
                self.session.close();
                self.cancel.cancel();
                shutdown(&self.transport).await;
                return result;
            }
            if e.is_transport_fault() {
                self.stale = true;
            }
        }

        self.session.finish();
        result
    }

    async fn round_trip(&mut self, request: &Request) -> Result<Response> {
        let transport = Arc::clone(&self.transport);
        let mut wire = transport.lock().await;
        let mut exchange = Exchange {
            wire: &mut *wire,
            session: &self.session,
            config: &self.config,
        };

        if self.stale {
            exchange.discard_stale().await?;
            self.stale = false;
        }
        exchange.handshake().await?;

        self.session.transition(SessionState::Sending)?;
        let sequence = self.session.next_sequence();
        let frame = Frame::new(sequence, request.command, request.payload.clone()).encode()?;

        trace!(seq = sequence, data = %hex::encode(&frame), "Sending frame");
        exchange.wire.send(&frame).await?;

        self.session.transition(SessionState::AwaitingResponse)?;
        let raw = exchange.read_response().await?;
        trace!(data = %hex::encode(&raw), "Received response");

        let response = Response::decode(&raw).inspect_err(|e| {
            warn!(command = %request.command, "Invalid response: {}", e);
        })?;

        match &response {
            Response::Ack { status } if *status != 0 => {
                let code = ErrorCode::from(*status);
                debug!(command = %request.command, %code, "Device rejected command");
                Err(Error::Device(code))
            }
            Response::Data(frame) if frame.sequence != sequence => Err(Error::OutOfSequence {
                expected: sequence,
                actual: frame.sequence,
            }),
            _ => Ok(response),
        }
    }

    async fn handshake_and_write(&mut self, data: &[u8]) -> Result<()> {
        let transport = Arc::clone(&self.transport);
        let mut wire = transport.lock().await;
        let mut exchange = Exchange {
            wire: &mut *wire,
            session: &self.session,
            config: &self.config,
        };

        if self.stale {
            exchange.discard_stale().await?;
            self.stale = false;
        }
        exchange.handshake().await?;

        self.session.transition(SessionState::Sending)?;
        trace!(bytes = data.len(), "Sending raw block");
        exchange.wire.send(data).await?;
        Ok(())
    }
}

impl Drop for Link {
    fn drop(&mut self) {
        self.session.close();
        self.cancel.cancel();
    }
}

/// One exchange holding the transport
struct Exchange<'a> {
    wire: &'a mut Box<dyn Transport>,
    session: &'a Session,
    config: &'a PrinterConfig,
}

impl Exchange<'_> {
    async fn handshake(&mut self) -> Result<()> {
        self.session.transition(SessionState::Handshaking)?;
        self.probe(PING).await?;
        self.probe(BUSY).await
    }

    /// Drop whatever a previous failed exchange left on the line
    async fn discard_stale(&mut self) -> Result<()> {
        for _ in 0..STALE_READS {
            match self.wire.receive(STALE_WINDOW).await {
                Ok(bytes) => debug!(data = %hex::encode(&bytes), "Discarding late bytes"),
                Err(TransportError::ReadTimeout) => break,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// Send `ANTIECHO, probe` until the device echoes `probe`
    async fn probe(&mut self, probe: u8) -> Result<()> {
        let attempts = self.config.probe_retries;

        for attempt in 1..=attempts {
            self.wire.send(&[ANTIECHO, probe]).await?;

            let deadline = Instant::now() + self.config.probe_timeout;
            loop {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if remaining.is_zero() {
                    break;
                }

                match self.wire.receive(remaining).await {
                    Ok(bytes) if bytes.contains(&ANTIECHO) => {
                        warn!(endpoint = %self.wire.endpoint(), "Probe echoed back");
                        return Err(Error::EchoFault);
                    }
                    Ok(bytes) if bytes.contains(&probe) => return Ok(()),
                    Ok(bytes) => trace!(data = %hex::encode(&bytes), "Ignoring bytes while probing"),
                    Err(TransportError::ReadTimeout) => break,
                    Err(e) => return Err(e.into()),
                }
            }

            warn!(probe = probe, attempt, attempts, "No answer to probe");
        }

        if probe == PING {
            Err(Error::DeviceUnresponsive { attempts })
        } else {
            Err(Error::DeviceBusy { attempts })
        }
    }

    /// Collect one response: ACK or STX up to and including END
    ///
    /// The first RETRY extends the deadline by one more response timeout.
    async fn read_response(&mut self) -> Result<BytesMut> {
        let started = Instant::now();
        let mut deadline = started + self.config.response_timeout;
        let mut extended = false;
        let mut buf = BytesMut::with_capacity(MAX_RESPONSE_SIZE);

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(Error::Timeout {
                    waited: started.elapsed(),
                });
            }

            let chunk = match self.wire.receive(remaining).await {
                Ok(chunk) => chunk,
                Err(TransportError::ReadTimeout) => {
                    return Err(Error::Timeout {
                        waited: started.elapsed(),
                    });
                }
                Err(e) => return Err(e.into()),
            };

            for &byte in chunk.iter() {
                if buf.is_empty() {
                    match ControlByte::classify(byte) {
                        Some(ControlByte::Ack | ControlByte::Stx) => buf.put_u8(byte),
                        Some(ControlByte::Nack) => return Err(Error::CommandRejected),
                        Some(ControlByte::Antiecho) => {
                            warn!("Echo fault while awaiting response");
                            return Err(Error::EchoFault);
                        }
                        Some(ControlByte::Retry) => {
                            if !extended {
                                deadline += self.config.response_timeout;
                                extended = true;
                            }
                            debug!("Device asked to keep waiting");
                        }
                        None => trace!(byte, "Ignoring byte before response"),
                    }
                    continue;
                }

                buf.put_u8(byte);
                if byte == END {
                    return Ok(buf);
                }
                if buf.len() >= MAX_RESPONSE_SIZE {
                    return Err(zfprint_core::Error::ResponseOverflow {
                        max: MAX_RESPONSE_SIZE,
                    }
                    .into());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mockall::mock;
    use zfprint_core::Command;

    mock! {
        pub Wire {}

        #[async_trait]
        impl Transport for Wire {
            async fn connect(&mut self) -> zfprint_transport::Result<()>;
            async fn disconnect(&mut self) -> zfprint_transport::Result<()>;
            fn is_connected(&self) -> bool;
            async fn send(&mut self, data: &[u8]) -> zfprint_transport::Result<()>;
            async fn receive(&mut self, timeout: Duration) -> zfprint_transport::Result<BytesMut>;
            fn endpoint(&self) -> String;
        }
    }

    fn wire() -> MockWire {
        let mut wire = MockWire::new();
        wire.expect_is_connected().return_const(true);
        wire.expect_endpoint().return_const("mock".to_string());
        wire.expect_disconnect().returning(|| Ok(()));
        wire
    }

    /// Answers each receive call with the next script entry, then times out
    fn script(wire: &mut MockWire, replies: Vec<&'static [u8]>) {
        let mut replies = replies.into_iter();
        wire.expect_receive().returning(move |_| match replies.next() {
            Some(bytes) => Ok(BytesMut::from(bytes)),
            None => Err(TransportError::ReadTimeout),
        });
    }

    type Log = Arc<std::sync::Mutex<Vec<String>>>;

    /// Like `script`, but each reply arrives `delay` ms after it is asked for
    ///
    /// A reply slower than the read's timeout stays queued with the time
    /// already waited taken off. An empty reply is one immediate timeout.
    /// Sends and received bytes are appended to the returned log.
    fn timed_script(wire: &mut MockWire, replies: Vec<(u64, &'static [u8])>) -> Log {
        let log: Log = Arc::default();

        let sent = Arc::clone(&log);
        wire.expect_send().returning(move |data| {
            sent.lock().unwrap().push(format!("send {}", hex::encode(data)));
            Ok(())
        });

        let received = Arc::clone(&log);
        let mut replies: std::collections::VecDeque<_> = replies.into_iter().collect();
        wire.expect_receive().returning(move |wait| {
            let Some((delay, bytes)) = replies.front_mut() else {
                return Err(TransportError::ReadTimeout);
            };
            let delay_for = Duration::from_millis(*delay);
            if delay_for > wait {
                std::thread::sleep(wait);
                *delay -= wait.as_millis() as u64;
                return Err(TransportError::ReadTimeout);
            }
            std::thread::sleep(delay_for);
            let bytes = *bytes;
            replies.pop_front();
            if bytes.is_empty() {
                return Err(TransportError::ReadTimeout);
            }
            received.lock().unwrap().push(format!("recv {}", hex::encode(bytes)));
            Ok(BytesMut::from(bytes))
        });

        log
    }

    const ACK_OK: &[u8] = &[0x06, 0x20, 0x30, 0x30, 0x32, 0x30, 0x0A];

    fn config() -> PrinterConfig {
        PrinterConfig {
            probe_timeout: Duration::from_millis(10),
            probe_retries: 3,
            response_timeout: Duration::from_millis(50),
        }
    }

    async fn open(wire: MockWire) -> Link {
        let mut link = Link::new(Box::new(wire), config());
        link.open().await.unwrap();
        link
    }

    fn status() -> Request {
        Request::bare(Command::GetStatus)
    }

    #[tokio::test]
    async fn test_echo_fault() {
        let mut wire = wire();
        wire.expect_send().times(1).returning(|_| Ok(()));
        script(&mut wire, vec![&[0x03, 0x04]]);

        let mut link = open(wire).await;
        let err = link.execute(&status()).await.unwrap_err();

        assert!(matches!(err, Error::EchoFault));
        assert!(err.is_transport_fault());
        assert_eq!(link.session().state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn test_unresponsive_after_all_probes() {
        let mut wire = wire();
        wire.expect_send()
            .withf(|data| data[..] == [0x03, 0x04])
            .times(3)
            .returning(|_| Ok(()));
        script(&mut wire, vec![]);

        let mut link = open(wire).await;
        let err = link.execute(&status()).await.unwrap_err();

        assert!(matches!(err, Error::DeviceUnresponsive { attempts: 3 }));
        assert_eq!(err.code(), ErrorCode::UNRESPONSIVE);
    }

    #[tokio::test]
    async fn test_never_sends_while_busy() {
        let mut wire = wire();
        // one liveness probe, then three busy probes, never a frame
        wire.expect_send()
            .withf(|data| data.len() == 2)
            .times(4)
            .returning(|_| Ok(()));
        script(&mut wire, vec![&[0x04]]);

        let mut link = open(wire).await;
        let err = link.execute(&status()).await.unwrap_err();

        assert!(matches!(err, Error::DeviceBusy { attempts: 3 }));
        assert!(err.is_protocol_error());
    }

    #[tokio::test]
    async fn test_nack_is_command_rejected() {
        let mut wire = wire();
        wire.expect_send().times(3).returning(|_| Ok(()));
        script(&mut wire, vec![&[0x04], &[0x05], &[0x15]]);

        let mut link = open(wire).await;
        let err = link.execute(&status()).await.unwrap_err();

        assert!(matches!(err, Error::CommandRejected));
        assert_eq!(err.code(), ErrorCode::NACK);
    }

    #[tokio::test]
    async fn test_ack_success() {
        let mut wire = wire();
        wire.expect_send().times(3).returning(|_| Ok(()));
        // ACK, one header byte, status "00", checksum over header + status
        script(&mut wire, vec![&[0x04], &[0x05], ACK_OK]);

        let mut link = open(wire).await;
        let response = link.execute(&status()).await.unwrap();

        assert_eq!(response, Response::Ack { status: 0 });
        assert_eq!(link.session().sequence(), 0x21);
    }

    #[tokio::test]
    async fn test_response_timeout() {
        let mut wire = wire();
        wire.expect_send().times(3).returning(|_| Ok(()));
        script(&mut wire, vec![&[0x04], &[0x05]]);

        let mut link = open(wire).await;
        let err = link.execute(&status()).await.unwrap_err();

        assert!(matches!(err, Error::Timeout { .. }));
        assert_eq!(err.code(), ErrorCode::TIMEOUT);
        assert!(link.is_connected());
    }

    #[tokio::test]
    async fn test_oversized_payload_rejected_before_sending() {
        let mut wire = wire();
        wire.expect_send().times(0);

        let mut link = open(wire).await;
        let request = Request::new(Command::PrintText, vec![b'x'; Frame::MAX_PAYLOAD_SIZE + 1]);
        let err = link.execute(&request).await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::INVALID_INPUT);
    }

    #[tokio::test]
    async fn test_closed_link_shuts_transport() {
        let disconnects = Arc::new(std::sync::atomic::AtomicUsize::new(0));

        let mut wire = MockWire::new();
        wire.expect_is_connected().return_const(true);
        wire.expect_endpoint().return_const("mock".to_string());
        wire.expect_send().times(0);
        let counter = Arc::clone(&disconnects);
        wire.expect_disconnect().returning(move || {
            counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(())
        });

        let mut link = open(wire).await;
        link.disconnect_handle().disconnect();

        let err = link.execute(&status()).await.unwrap_err();
        assert!(matches!(err, Error::Closed));
        assert!(matches!(link.open().await, Err(Error::Closed)));
        assert!(disconnects.load(std::sync::atomic::Ordering::SeqCst) >= 1);
        assert!(!link.is_connected());
    }

    #[tokio::test]
    async fn test_connection_loss_closes_session() {
        let mut wire = wire();
        wire.expect_send().times(1).returning(|_| Ok(()));
        wire.expect_receive()
            .returning(|_| Err(TransportError::ConnectionClosed));

        let mut link = open(wire).await;
        let err = link.execute(&status()).await.unwrap_err();

        assert!(matches!(err, Error::Transport(TransportError::ConnectionClosed)));
        assert!(link.session().is_closed());
        assert!(matches!(link.execute(&status()).await, Err(Error::Closed)));
    }

    #[tokio::test]
    async fn test_retry_extends_deadline_once() {
        let mut wire = wire();
        // response timeout is 100 ms; the ACK comes 160 ms after the RETRY
        timed_script(
            &mut wire,
            vec![(0, &[0x04]), (0, &[0x05]), (0, &[0x0E]), (160, ACK_OK)],
        );

        let mut link = Link::new(Box::new(wire), PrinterConfig {
            response_timeout: Duration::from_millis(100),
            ..config()
        });
        link.open().await.unwrap();

        let response = link.execute(&status()).await.unwrap();
        assert_eq!(response, Response::Ack { status: 0 });
    }

    #[tokio::test]
    async fn test_second_retry_does_not_extend_again() {
        let mut wire = wire();
        timed_script(
            &mut wire,
            vec![
                (0, &[0x04]),
                (0, &[0x05]),
                (0, &[0x0E]),
                (0, &[0x0E]),
                (250, ACK_OK),
            ],
        );

        let mut link = Link::new(Box::new(wire), PrinterConfig {
            response_timeout: Duration::from_millis(100),
            ..config()
        });
        link.open().await.unwrap();

        let err = link.execute(&status()).await.unwrap_err();
        match err {
            Error::Timeout { waited } => {
                assert!(waited >= Duration::from_millis(190), "waited {:?}", waited);
                assert!(waited < Duration::from_millis(250), "waited {:?}", waited);
            }
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_late_response_is_discarded_before_next_handshake() {
        let mut wire = wire();
        // the first ACK arrives 20 ms after its command timed out
        let log = timed_script(
            &mut wire,
            vec![
                (0, &[0x04]),
                (0, &[0x05]),
                (70, ACK_OK),
                (0, &[]),
                (0, &[0x04]),
                (0, &[0x05]),
                (0, ACK_OK),
            ],
        );

        let mut link = open(wire).await;

        let err = link.execute(&status()).await.unwrap_err();
        assert!(matches!(err, Error::Timeout { .. }));
        assert!(link.is_connected());

        let response = link.execute(&status()).await.unwrap();
        assert_eq!(response, Response::Ack { status: 0 });
        assert_eq!(link.session().sequence(), 0x22);

        let log = log.lock().unwrap().clone();
        let late = log.iter().position(|e| e == "recv 0620303032300a").unwrap();
        let second_ping = log
            .iter()
            .enumerate()
            .filter(|(_, e)| *e == "send 0304")
            .map(|(i, _)| i)
            .nth(1)
            .unwrap();
        assert!(late < second_ping, "late bytes read after handshake: {:?}", log);
    }
}

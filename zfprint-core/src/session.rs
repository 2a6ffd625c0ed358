//! Session bookkeeping for the ZFP protocol
//!
//! A session represents one exclusive binding to a physical printer and tracks:
//! - The rolling sequence number (NBL)
//! - The state of the command currently in flight
//!
//! It is shared between the command path and disconnect handles, so a
//! disconnect can be requested from another task while a command runs.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use tracing::trace;

use crate::constants::{SEQUENCE_MAX, SEQUENCE_MIN};
use crate::error::{Error, Result};

/// Session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Transport not opened yet
    Disconnected,

    /// Ready for the next command
    Idle,

    /// Liveness and busy probes running
    Handshaking,

    /// Writing the command frame
    Sending,

    /// Waiting for the device response
    AwaitingResponse,

    /// Torn down; never reused
    Closed,
}

/// Session manager
///
/// Thread-safe and can be cloned cheaply (Arc internally).
#[derive(Debug, Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

#[derive(Debug)]
struct SessionInner {
    /// Last sequence number put on the wire
    sequence: AtomicU8,

    /// Current session state
    state: parking_lot::RwLock<SessionState>,
}

impl Session {
    /// Initial sequence number; the first frame carries the next one
    pub const INITIAL_SEQUENCE: u8 = SEQUENCE_MIN;

    /// Create a new disconnected session
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SessionInner {
                sequence: AtomicU8::new(Self::INITIAL_SEQUENCE),
                state: parking_lot::RwLock::new(SessionState::Disconnected),
            }),
        }
    }

    /// Get current state
    pub fn state(&self) -> SessionState {
        *self.inner.state.read()
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.state(), SessionState::Closed)
    }

    /// Check if the transport has been opened and the session not closed
    pub fn is_open(&self) -> bool {
        !matches!(
            self.state(),
            SessionState::Disconnected | SessionState::Closed
        )
    }

    /// Mark the session as bound to an open transport
    pub fn open(&self) -> Result<()> {
        let mut state = self.inner.state.write();

        match *state {
            SessionState::Disconnected => {
                *state = SessionState::Idle;
                Ok(())
            }
            SessionState::Closed => Err(Error::SessionClosed),
            other => Err(Error::InvalidSessionState(format!(
                "Cannot open from state: {:?}",
                other
            ))),
        }
    }

    /// Move to the next step of a command
    ///
    /// Fails once the session has been closed, so a disconnect requested
    /// from elsewhere stops the command at its next step.
    pub fn transition(&self, next: SessionState) -> Result<()> {
        let mut state = self.inner.state.write();

        match (*state, next) {
            (SessionState::Closed, _) => Err(Error::SessionClosed),
            (SessionState::Disconnected, _) => Err(Error::InvalidSessionState(
                "Session not opened - connect to the printer first".into(),
            )),
            (_, SessionState::Closed | SessionState::Disconnected) => {
                Err(Error::InvalidSessionState(format!(
                    "Use close() instead of transitioning to {:?}",
                    next
                )))
            }
            (current, next) => {
                trace!(from = ?current, to = ?next, "Session transition");
                *state = next;
                Ok(())
            }
        }
    }

    /// Return to idle after a command, unless the session was closed meanwhile
    pub fn finish(&self) {
        let mut state = self.inner.state.write();
        if !matches!(*state, SessionState::Closed | SessionState::Disconnected) {
            *state = SessionState::Idle;
        }
    }

    /// Close session for good
    ///
    /// Returns the state the session was in, which tells whether a command
    /// was in flight.
    pub fn close(&self) -> SessionState {
        let mut state = self.inner.state.write();
        std::mem::replace(&mut *state, SessionState::Closed)
    }

    /// Last sequence number put on the wire
    pub fn sequence(&self) -> u8 {
        self.inner.sequence.load(Ordering::Acquire)
    }

    /// Advance and return the sequence number for the next frame
    ///
    /// Stays within 0x20..=0xFF, wrapping from 0xFF back to 0x20.
    pub fn next_sequence(&self) -> u8 {
        let previous = self
            .inner
            .sequence
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                Some(advance(current))
            })
            .unwrap_or(Self::INITIAL_SEQUENCE);

        advance(previous)
    }
}

fn advance(current: u8) -> u8 {
    if current >= SEQUENCE_MAX || current < SEQUENCE_MIN {
        SEQUENCE_MIN
    } else {
        current + 1
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

//! # zfprint-core
//!
//! Core protocol implementation for ZFP fiscal printers.
//!
//! This crate provides the I/O-free protocol primitives:
//! - Frame structure and encoding/decoding
//! - Checksum calculation
//! - Fixed-width field encoding
//! - Command definitions and the request catalog
//! - Error codes and their classification
//! - Session state and sequence bookkeeping

pub mod checksum;
pub mod code;
pub mod command;
pub mod constants;
pub mod encoding;
pub mod error;
pub mod frame;
pub mod request;
pub mod session;

pub use code::{CommandRejection, CommunicationCause, DeviceState, ErrorCode, ErrorKind};
pub use command::Command;
pub use constants::{Align, ReportMode};
pub use error::{Error, Result};
pub use frame::{ControlByte, Frame, Response};
pub use request::{Discount, InvoiceDetails, Request, TaxGroup};
pub use session::{Session, SessionState};

/// Protocol version information
pub const PROTOCOL_VERSION: &str = "ZFP 1.0";

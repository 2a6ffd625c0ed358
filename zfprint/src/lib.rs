//! # zfprint
//!
//! Driver for ZFP fiscal printers.
//!
//! ## Features
//!
//! - Full command catalog: receipts, invoices, reports, device setup
//! - Async/await API using Tokio
//! - TCP, serial (feature `serial`) and host-supplied stream transports
//! - Every error carries its ZFP code, split into device state and command
//!   rejection for device errors
//!
//! ## Quick Start
//!
//! ```no_run
//! use zfprint::{Printer, TaxGroup};
//!
//! #[tokio::main]
//! async fn main() -> zfprint::Result<()> {
//!     let mut printer = Printer::tcp("192.168.1.50", 4999);
//!     printer.connect().await?;
//!
//!     printer.open_fiscal_receipt(1, "0000", false, false).await?;
//!     printer.sell_free("Bread", TaxGroup::new('B')?, 1.20, 2.0, 0.0).await?;
//!     let total = printer.subtotal(false, false, None).await?;
//!     printer.payment(0, total, false).await?;
//!     printer.close_fiscal_receipt().await?;
//!
//!     printer.disconnect().await?;
//!     Ok(())
//! }
//! ```

mod catalog;
pub mod config;
pub mod error;
mod link;
pub mod printer;

// Re-exports
pub use config::PrinterConfig;
pub use error::{Error, Result};
pub use link::DisconnectHandle;
pub use printer::Printer;

pub use zfprint_core::{
    Align, CommandRejection, CommunicationCause, DeviceState, Discount, ErrorCode, ErrorKind,
    InvoiceDetails, ReportMode, TaxGroup,
};
pub use zfprint_transport::{FallbackTransport, StreamTransport, TcpTransport, Transport};
#[cfg(feature = "serial")]
pub use zfprint_transport::SerialTransport;
pub use zfprint_types::{
    Article, DeviceInfo, DeviceParameters, DeviceStatus, OperatorInfo, PaymentTypes, ReceiptInfo,
    StatusFlags, TaxTable,
};

//! Response records for the ZFP protocol
//!
//! Each decoder takes the payload of a validated response frame and either
//! produces a complete record or fails; partially filled records are never
//! returned.

pub mod article;
pub mod datetime;
pub mod device_info;
pub mod error;
mod fields;
pub mod operator;
pub mod parameters;
pub mod payment;
pub mod receipt;
pub mod scalar;
pub mod status;
pub mod tax;
pub mod text;

pub use article::Article;
pub use device_info::DeviceInfo;
pub use error::{Error, Result};
pub use operator::OperatorInfo;
pub use parameters::DeviceParameters;
pub use payment::PaymentTypes;
pub use receipt::ReceiptInfo;
pub use status::{DeviceStatus, StatusFlags};
pub use tax::TaxTable;

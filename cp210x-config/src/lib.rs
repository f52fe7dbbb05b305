#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod commands;
pub mod common;
mod configuration;
pub mod constants;
mod driver;
mod error;
pub mod transfer;

pub use configuration::ConfigurationRequest;
pub use driver::{
    CP210X_FILTERS, CP210x, DeviceFilter, UsbChannel, UsbDeviceInfo, find_devices, list_devices,
};
pub use error::Error;
pub use transfer::{ControlTransferChannel, TransferResult, TransferStatus};

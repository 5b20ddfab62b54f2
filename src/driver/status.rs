use serde::{Deserialize, Serialize};

/// Fine-grained status a driver reports for a failing call.
///
/// Facade operations fold every one of these into
/// [`MvCamError::Driver`](crate::errors::MvCamError::Driver) without
/// interpreting it; the variant survives the trip so callers and logs can
/// still tell a timeout from a bad handle.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DriverStatus {
    #[error("parameter rejected by the driver")]
    InvalidParameter,
    #[error("handle does not refer to an open camera")]
    InvalidHandle,
    #[error("no device matched the requested name")]
    DeviceNotFound,
    #[error("device is already in use")]
    DeviceBusy,
    #[error("operation timed out")]
    Timeout,
    #[error("operation not supported by this device")]
    NotSupported,
    #[error("value outside the range the device accepts")]
    OutOfRange,
    #[error("device I/O failed")]
    IoError,
    #[error("internal driver failure")]
    Internal,
}

impl DriverStatus {
    /// Stable signed code for logs and tooling.
    pub fn code(self) -> i32 {
        match self {
            DriverStatus::InvalidParameter => -1,
            DriverStatus::InvalidHandle => -2,
            DriverStatus::DeviceNotFound => -3,
            DriverStatus::DeviceBusy => -4,
            DriverStatus::Timeout => -5,
            DriverStatus::NotSupported => -6,
            DriverStatus::OutOfRange => -7,
            DriverStatus::IoError => -8,
            DriverStatus::Internal => -99,
        }
    }
}

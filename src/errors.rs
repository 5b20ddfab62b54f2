use crate::driver::DriverStatus;
use std::fmt;

/// Facade-level error taxonomy.
///
/// `InvalidArgument`, `BufferTooSmall` and `NoCameraFound` are raised locally
/// before any driver call is made; `Driver` wraps the first non-success
/// status reported by the underlying driver, unmodified, so callers keep the
/// fine-grained code for diagnostics. The facade never retries and never
/// rolls back partially applied multi-step operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MvCamError {
    InvalidArgument(String),
    Driver(DriverStatus),
    BufferTooSmall { needed: usize, capacity: usize },
    NoCameraFound,
}

impl MvCamError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        MvCamError::InvalidArgument(message.into())
    }

    /// Wrap a driver status. Shaped for `map_err(MvCamError::driver)`.
    pub fn driver(status: DriverStatus) -> Self {
        MvCamError::Driver(status)
    }

    /// The underlying driver status, when this error came from the driver.
    pub fn driver_status(&self) -> Option<DriverStatus> {
        match self {
            MvCamError::Driver(status) => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for MvCamError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MvCamError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            MvCamError::Driver(status) => {
                write!(f, "Driver error: {} (code {})", status, status.code())
            }
            MvCamError::BufferTooSmall { needed, capacity } => write!(
                f,
                "Name buffer too small: need {} bytes, capacity is {}",
                needed, capacity
            ),
            MvCamError::NoCameraFound => write!(f, "No camera found"),
        }
    }
}

impl std::error::Error for MvCamError {}

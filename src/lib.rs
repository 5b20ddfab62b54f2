//! MvCam: a thin control facade for machine-vision cameras
//!
//! This crate wraps a low-level camera driver behind a small, synchronous
//! API: discover cameras, open a session, configure exposure, run a software
//! trigger loop, fetch frames, and save them to disk. The facade holds no
//! state of its own; every call validates its arguments, re-checks the
//! session handle against the driver, and reports the first failure.
//!
//! # Features
//! - Injected driver backends behind the [`CameraDriver`] trait
//! - Always-available [`SimulatedDriver`] for development and testing
//! - Optional `uvc` feature for real webcams via `nokhwa`
//! - Two-level error reporting: argument errors vs. driver status codes
//!
//! # Usage
//! ```rust,ignore
//! use mvcam::{CameraFacade, SimulatedDriver};
//!
//! fn main() -> Result<(), mvcam::MvCamError> {
//!     let facade = CameraFacade::new(SimulatedDriver::demo());
//!     let handle = facade.open_default()?;
//!     let image = facade.get_image(handle, std::time::Duration::from_millis(500))?;
//!     facade.save_image(handle, &image.with_file_name("shot.jpg"), 90)?;
//!     facade.destroy(handle)
//! }
//! ```
pub mod config;
pub mod driver;
pub mod errors;
pub mod facade;
pub mod types;

// Re-exports for convenience
pub use config::MvCamConfig;
pub use driver::{CameraDriver, DriverResult, DriverStatus, SimulatedDriver};
pub use errors::MvCamError;
pub use facade::{CameraFacade, MAX_CAMERA_NAME, SCAN_MAX_DEVICES};
pub use types::{
    AntiFlickerMode, CameraHandle, CapturedImage, DeviceDescriptor, ExposureSettings, FrameBuffer,
    FrameDescriptor, OpenMode, WhiteBalanceMode,
};

#[cfg(feature = "uvc")]
pub use driver::UvcDriver;

/// Initialize logging for the camera tool
pub fn init_logging() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "mvcam=info");
    }
    let _ = env_logger::try_init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Get crate information
pub fn get_info() -> CrateInfo {
    CrateInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: DESCRIPTION.to_string(),
        backends: backend_names(),
    }
}

fn backend_names() -> Vec<String> {
    let mut names = vec!["sim".to_string()];
    if cfg!(feature = "uvc") {
        names.push("uvc".to_string());
    }
    names
}

/// Crate information structure
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CrateInfo {
    pub name: String,
    pub version: String,
    pub description: String,
    pub backends: Vec<String>,
}

#[cfg(test)]
mod lib_tests {
    use super::*;

    #[test]
    fn test_crate_info() {
        let info = get_info();
        assert_eq!(info.name, "mvcam");
        assert!(!info.version.is_empty());
        assert!(!info.description.is_empty());
    }

    #[test]
    fn test_sim_backend_always_present() {
        assert!(backend_names().contains(&"sim".to_string()));
    }
}

//! Camera driver abstraction and the backends that implement it.
//!
//! [`CameraDriver`] is the seam the control facade is generic over: one
//! synchronous method per low-level driver capability, each returning the
//! backend's own [`DriverStatus`] on failure. [`SimulatedDriver`] is always
//! available; [`UvcDriver`] talks to real webcams and is compiled behind the
//! `uvc` feature.

mod simulated;
mod status;
#[cfg(feature = "uvc")]
mod uvc;

pub use simulated::{SessionSnapshot, SimulatedDriver};
pub use status::DriverStatus;
#[cfg(feature = "uvc")]
pub use uvc::UvcDriver;

use crate::types::{
    AntiFlickerMode, CameraHandle, DeviceDescriptor, FrameBuffer, FrameDescriptor, OpenMode,
    WhiteBalanceMode,
};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::Duration;

pub type DriverResult<T> = Result<T, DriverStatus>;

/// Low-level camera backend.
///
/// Implementations hold whatever per-session state they need behind `&self`;
/// handles issued by [`open_by_name`](CameraDriver::open_by_name) identify
/// sessions until [`close`](CameraDriver::close). Methods validate nothing
/// beyond their own arguments; cross-call policy (argument checks, handle
/// re-validation, call ordering) lives in the facade.
pub trait CameraDriver {
    fn open_by_name(&self, name: &str, mode: OpenMode) -> DriverResult<CameraHandle>;

    /// Re-enumerate attached devices and return how many were found.
    fn refresh_device_list(&self) -> DriverResult<u32>;

    /// Descriptor of the `index`-th device from the latest enumeration.
    fn enumerate_device(&self, index: u32) -> DriverResult<DeviceDescriptor>;

    /// Whether `handle` names a live session.
    fn is_valid(&self, handle: CameraHandle) -> DriverResult<bool>;

    fn close(&self, handle: CameraHandle) -> DriverResult<()>;

    fn set_analog_gain(&self, handle: CameraHandle, gain: f32) -> DriverResult<()>;

    fn set_white_balance_mode(
        &self,
        handle: CameraHandle,
        mode: WhiteBalanceMode,
    ) -> DriverResult<()>;

    fn set_anti_flicker(&self, handle: CameraHandle, mode: AntiFlickerMode) -> DriverResult<()>;

    /// Exposure time in microseconds.
    fn set_exposure_value(&self, handle: CameraHandle, exposure_us: f64) -> DriverResult<()>;

    fn set_trigger_delay(&self, handle: CameraHandle, delay: Duration) -> DriverResult<()>;

    fn set_soft_trigger_loop(&self, handle: CameraHandle, interval: Duration) -> DriverResult<()>;

    fn set_soft_trigger_loop_state(&self, handle: CameraHandle, enabled: bool) -> DriverResult<()>;

    fn set_trigger_state(&self, handle: CameraHandle, enabled: bool) -> DriverResult<()>;

    fn start_stream(&self, handle: CameraHandle) -> DriverResult<()>;

    fn stop_stream(&self, handle: CameraHandle) -> DriverResult<()>;

    /// Block up to `timeout` for the next frame. Backends without a bounded
    /// wait treat the timeout as advisory.
    fn get_frame(
        &self,
        handle: CameraHandle,
        timeout: Duration,
    ) -> DriverResult<(FrameDescriptor, FrameBuffer)>;

    /// Encode the frame to `path`; `quality` applies to lossy formats only.
    fn save_picture(
        &self,
        frame: &FrameDescriptor,
        buffer: &FrameBuffer,
        path: &str,
        quality: u8,
    ) -> DriverResult<()>;
}

// Shared persistence path for RGB8 frames. JPEG for .jpg/.jpeg, PNG for
// everything else.
pub(crate) fn encode_rgb8(
    path: &str,
    width: u32,
    height: u32,
    data: &[u8],
    quality: u8,
) -> DriverResult<()> {
    let file = File::create(path).map_err(|_| DriverStatus::IoError)?;
    let writer = BufWriter::new(file);
    let extension = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => JpegEncoder::new_with_quality(writer, quality.clamp(1, 100))
            .write_image(data, width, height, ExtendedColorType::Rgb8)
            .map_err(|_| DriverStatus::IoError),
        _ => PngEncoder::new(writer)
            .write_image(data, width, height, ExtendedColorType::Rgb8)
            .map_err(|_| DriverStatus::IoError),
    }
}

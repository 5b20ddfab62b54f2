//! Value and handle types shared by the facade and the driver boundary.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque identifier for an open camera session.
///
/// Handles are minted by the driver on open and become invalid after
/// destroy; the facade never fabricates one and re-checks validity with the
/// driver before every use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CameraHandle(u32);

impl CameraHandle {
    pub fn from_raw(raw: u32) -> Self {
        CameraHandle(raw)
    }

    pub fn as_raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for CameraHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "camera#{}", self.0)
    }
}

/// Access mode requested when opening a camera.
///
/// `Normal` claims the device exclusively; `ReadOnly` is shared access for
/// diagnostic tooling. The facade always opens in `Normal` mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenMode {
    Normal,
    ReadOnly,
}

/// White-balance operation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WhiteBalanceMode {
    #[default]
    Off,
    /// Run white balance once, then hold the result.
    Once,
    /// Re-balance continuously.
    Continuous,
}

/// Anti-flicker compensation for mains-powered lighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AntiFlickerMode {
    #[default]
    #[serde(rename = "off")]
    Off,
    #[serde(rename = "50hz")]
    Hz50,
    #[serde(rename = "60hz")]
    Hz60,
}

/// Exposure-related parameters applied as one unit by
/// [`CameraFacade::set_exposure`](crate::facade::CameraFacade::set_exposure).
///
/// The sub-settings are applied in a fixed order (gain, white balance,
/// anti-flicker, shutter); a value here is only as applied as the first
/// failing sub-step allows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExposureSettings {
    /// Analog gain multiplier (1.0 = unity).
    pub analog_gain: f32,
    pub white_balance: WhiteBalanceMode,
    pub anti_flicker: AntiFlickerMode,
    /// Shutter / exposure time in microseconds.
    pub exposure_us: f64,
}

impl Default for ExposureSettings {
    fn default() -> Self {
        Self {
            analog_gain: 1.0,
            white_balance: WhiteBalanceMode::Off,
            anti_flicker: AntiFlickerMode::Off,
            exposure_us: 10_000.0,
        }
    }
}

impl ExposureSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_analog_gain(mut self, gain: f32) -> Self {
        self.analog_gain = gain;
        self
    }

    pub fn with_white_balance(mut self, mode: WhiteBalanceMode) -> Self {
        self.white_balance = mode;
        self
    }

    pub fn with_anti_flicker(mut self, mode: AntiFlickerMode) -> Self {
        self.anti_flicker = mode;
        self
    }

    pub fn with_exposure_us(mut self, exposure_us: f64) -> Self {
        self.exposure_us = exposure_us;
        self
    }
}

/// One discovered camera, as reported by the driver's enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    /// Human-readable name; the scan contract matches against this.
    pub friendly_name: String,
    pub model: String,
    pub serial: String,
}

impl DeviceDescriptor {
    pub fn new(friendly_name: impl Into<String>) -> Self {
        Self {
            friendly_name: friendly_name.into(),
            model: String::new(),
            serial: String::new(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_serial(mut self, serial: impl Into<String>) -> Self {
        self.serial = serial.into();
        self
    }
}

/// Driver-defined metadata describing one captured frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameDescriptor {
    pub width: u32,
    pub height: u32,
    /// Pixel format tag, e.g. "RGB8".
    pub format: String,
    /// Monotonic per-session frame counter.
    pub sequence: u64,
    pub timestamp: DateTime<Utc>,
    pub size_bytes: usize,
}

impl FrameDescriptor {
    pub fn new(width: u32, height: u32, format: impl Into<String>) -> Self {
        Self {
            width,
            height,
            format: format.into(),
            sequence: 0,
            timestamp: Utc::now(),
            size_bytes: 0,
        }
    }

    pub fn with_sequence(mut self, sequence: u64) -> Self {
        self.sequence = sequence;
        self
    }

    pub fn with_size_bytes(mut self, size_bytes: usize) -> Self {
        self.size_bytes = size_bytes;
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Shared reference to driver-owned pixel memory.
///
/// Cloning is cheap and never copies the pixels; the underlying allocation
/// lives as long as any reference does.
#[derive(Clone, Default)]
pub struct FrameBuffer(Bytes);

impl FrameBuffer {
    pub fn from_vec(data: Vec<u8>) -> Self {
        FrameBuffer(Bytes::from(data))
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}

impl From<Bytes> for FrameBuffer {
    fn from(bytes: Bytes) -> Self {
        FrameBuffer(bytes)
    }
}

impl fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("len", &self.0.len())
            .finish()
    }
}

/// A captured frame paired with the file name used when saving it.
///
/// Produced by `get_image`, consumed by `save_image`; the buffer memory
/// itself stays with the driver side.
#[derive(Debug, Clone)]
pub struct CapturedImage {
    /// Correlation id for logs; not part of the driver contract.
    pub id: Uuid,
    pub frame: FrameDescriptor,
    pub buffer: FrameBuffer,
    /// Output path handed to the driver's save call. Empty until set.
    pub file_name: String,
}

impl CapturedImage {
    pub fn new(frame: FrameDescriptor, buffer: FrameBuffer) -> Self {
        Self {
            id: Uuid::new_v4(),
            frame,
            buffer,
            file_name: String::new(),
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }
}

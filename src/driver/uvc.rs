//! Webcam driver built on `nokhwa`, compiled behind the `uvc` feature.
//!
//! Sessions wrap one [`nokhwa::Camera`] each. UVC exposes no hardware
//! trigger machinery, so the trigger configuration calls accept their
//! parameters and the stream stays free-running; frames are paced by the
//! backend.

use crate::driver::{encode_rgb8, CameraDriver, DriverResult, DriverStatus};
use crate::types::{
    AntiFlickerMode, CameraHandle, DeviceDescriptor, FrameBuffer, FrameDescriptor, OpenMode,
    WhiteBalanceMode,
};
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    ApiBackend, ControlValueSetter, KnownCameraControl, RequestedFormat, RequestedFormatType,
};
use nokhwa::{query, Camera, NokhwaError};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// Driver over the host's UVC webcams.
pub struct UvcDriver {
    state: Mutex<State>,
}

struct State {
    sessions: HashMap<u32, UvcSession>,
    next_handle: u32,
}

struct UvcSession {
    camera: Camera,
    device_name: String,
    mode: OpenMode,
    streaming: bool,
    next_sequence: u64,
}

impl UvcDriver {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                sessions: HashMap::new(),
                next_handle: 1,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Default for UvcDriver {
    fn default() -> Self {
        Self::new()
    }
}

fn session_mut<'a>(
    state: &'a mut MutexGuard<'_, State>,
    handle: CameraHandle,
) -> Result<&'a mut UvcSession, DriverStatus> {
    state
        .sessions
        .get_mut(&handle.as_raw())
        .ok_or(DriverStatus::InvalidHandle)
}

fn map_status(err: NokhwaError) -> DriverStatus {
    match err {
        NokhwaError::OpenDeviceError(_, _) => DriverStatus::DeviceBusy,
        NokhwaError::GetPropertyError { .. } | NokhwaError::SetPropertyError { .. } => {
            DriverStatus::NotSupported
        }
        NokhwaError::UnsupportedOperationError(_) | NokhwaError::NotImplementedError(_) => {
            DriverStatus::NotSupported
        }
        NokhwaError::OpenStreamError(_)
        | NokhwaError::ReadFrameError(_)
        | NokhwaError::ProcessFrameError { .. }
        | NokhwaError::StreamShutdownError(_) => DriverStatus::IoError,
        _ => DriverStatus::Internal,
    }
}

fn describe(info: &nokhwa::utils::CameraInfo) -> DeviceDescriptor {
    DeviceDescriptor::new(info.human_name()).with_model(info.description().to_string())
}

impl CameraDriver for UvcDriver {
    fn open_by_name(&self, name: &str, mode: OpenMode) -> DriverResult<CameraHandle> {
        let devices = query(ApiBackend::Auto).map_err(map_status)?;
        let info = devices
            .iter()
            .find(|d| d.human_name() == name)
            .ok_or(DriverStatus::DeviceNotFound)?;

        let mut state = self.state();
        let exclusive_held = state
            .sessions
            .values()
            .any(|s| s.device_name == name && s.mode == OpenMode::Normal);
        let any_held = state.sessions.values().any(|s| s.device_name == name);
        let busy = match mode {
            OpenMode::Normal => any_held,
            OpenMode::ReadOnly => exclusive_held,
        };
        if busy {
            return Err(DriverStatus::DeviceBusy);
        }

        let requested =
            RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestResolution);
        let camera = Camera::new(info.index().clone(), requested).map_err(map_status)?;

        let id = state.next_handle;
        state.next_handle += 1;
        state.sessions.insert(
            id,
            UvcSession {
                camera,
                device_name: name.to_string(),
                mode,
                streaming: false,
                next_sequence: 0,
            },
        );
        log::debug!("uvc session {} on {:?}", id, name);
        Ok(CameraHandle::from_raw(id))
    }

    fn refresh_device_list(&self) -> DriverResult<u32> {
        let devices = query(ApiBackend::Auto).map_err(map_status)?;
        Ok(devices.len() as u32)
    }

    fn enumerate_device(&self, index: u32) -> DriverResult<DeviceDescriptor> {
        let devices = query(ApiBackend::Auto).map_err(map_status)?;
        devices
            .get(index as usize)
            .map(describe)
            .ok_or(DriverStatus::OutOfRange)
    }

    fn is_valid(&self, handle: CameraHandle) -> DriverResult<bool> {
        Ok(self.state().sessions.contains_key(&handle.as_raw()))
    }

    fn close(&self, handle: CameraHandle) -> DriverResult<()> {
        // Dropping the session tears down the stream with it.
        self.state()
            .sessions
            .remove(&handle.as_raw())
            .map(|_| ())
            .ok_or(DriverStatus::InvalidHandle)
    }

    fn set_analog_gain(&self, handle: CameraHandle, gain: f32) -> DriverResult<()> {
        if !gain.is_finite() || gain <= 0.0 {
            return Err(DriverStatus::OutOfRange);
        }
        let mut state = self.state();
        let session = session_mut(&mut state, handle)?;
        session
            .camera
            .set_camera_control(
                KnownCameraControl::Gain,
                ControlValueSetter::Integer(gain.round() as i64),
            )
            .map_err(map_status)
    }

    fn set_white_balance_mode(
        &self,
        handle: CameraHandle,
        mode: WhiteBalanceMode,
    ) -> DriverResult<()> {
        let mut state = self.state();
        let session = session_mut(&mut state, handle)?;
        // Auto white balance is the nearest control the backend exposes;
        // one-shot balancing maps onto it.
        let auto = !matches!(mode, WhiteBalanceMode::Off);
        session
            .camera
            .set_camera_control(
                KnownCameraControl::WhiteBalance,
                ControlValueSetter::Boolean(auto),
            )
            .map_err(map_status)
    }

    fn set_anti_flicker(&self, handle: CameraHandle, mode: AntiFlickerMode) -> DriverResult<()> {
        let mut state = self.state();
        session_mut(&mut state, handle)?;
        // No power-line-frequency control in the backend's known set.
        match mode {
            AntiFlickerMode::Off => Ok(()),
            AntiFlickerMode::Hz50 | AntiFlickerMode::Hz60 => Err(DriverStatus::NotSupported),
        }
    }

    fn set_exposure_value(&self, handle: CameraHandle, exposure_us: f64) -> DriverResult<()> {
        if !exposure_us.is_finite() || exposure_us <= 0.0 {
            return Err(DriverStatus::OutOfRange);
        }
        let mut state = self.state();
        let session = session_mut(&mut state, handle)?;
        // UVC absolute exposure counts 100 microsecond units.
        let units = ((exposure_us / 100.0).round() as i64).max(1);
        session
            .camera
            .set_camera_control(
                KnownCameraControl::Exposure,
                ControlValueSetter::Integer(units),
            )
            .map_err(map_status)
    }

    fn set_trigger_delay(&self, handle: CameraHandle, _delay: Duration) -> DriverResult<()> {
        let mut state = self.state();
        session_mut(&mut state, handle)?;
        Ok(())
    }

    fn set_soft_trigger_loop(&self, handle: CameraHandle, _interval: Duration) -> DriverResult<()> {
        let mut state = self.state();
        session_mut(&mut state, handle)?;
        Ok(())
    }

    fn set_soft_trigger_loop_state(&self, handle: CameraHandle, _enabled: bool) -> DriverResult<()> {
        let mut state = self.state();
        session_mut(&mut state, handle)?;
        Ok(())
    }

    fn set_trigger_state(&self, handle: CameraHandle, _enabled: bool) -> DriverResult<()> {
        let mut state = self.state();
        session_mut(&mut state, handle)?;
        Ok(())
    }

    fn start_stream(&self, handle: CameraHandle) -> DriverResult<()> {
        let mut state = self.state();
        let session = session_mut(&mut state, handle)?;
        session.camera.open_stream().map_err(map_status)?;
        session.streaming = true;
        Ok(())
    }

    fn stop_stream(&self, handle: CameraHandle) -> DriverResult<()> {
        let mut state = self.state();
        let session = session_mut(&mut state, handle)?;
        session.camera.stop_stream().map_err(map_status)?;
        session.streaming = false;
        Ok(())
    }

    fn get_frame(
        &self,
        handle: CameraHandle,
        _timeout: Duration,
    ) -> DriverResult<(FrameDescriptor, FrameBuffer)> {
        let mut state = self.state();
        let session = session_mut(&mut state, handle)?;
        if !session.streaming {
            return Err(DriverStatus::Timeout);
        }

        let raw = session.camera.frame().map_err(map_status)?;
        let decoded = raw.decode_image::<RgbFormat>().map_err(map_status)?;

        let sequence = session.next_sequence;
        session.next_sequence += 1;

        let (width, height) = (decoded.width(), decoded.height());
        let data = decoded.into_raw();
        let frame = FrameDescriptor::new(width, height, "RGB8")
            .with_sequence(sequence)
            .with_size_bytes(data.len());
        Ok((frame, FrameBuffer::from_vec(data)))
    }

    fn save_picture(
        &self,
        frame: &FrameDescriptor,
        buffer: &FrameBuffer,
        path: &str,
        quality: u8,
    ) -> DriverResult<()> {
        let expected = frame.width as usize * frame.height as usize * 3;
        if buffer.len() != expected {
            return Err(DriverStatus::InvalidParameter);
        }
        encode_rgb8(path, frame.width, frame.height, buffer.as_slice(), quality)
    }
}

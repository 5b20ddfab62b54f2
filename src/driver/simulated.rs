//! In-memory camera driver with scriptable failures.
//!
//! Backs the CLI's `sim` mode and the integration tests. Sessions, trigger
//! state, and exposure parameters live in a mutex-guarded table; every trait
//! call is recorded by name, and [`SimulatedDriver::fail_next`] arms a
//! one-shot failure for a named call so error paths can be exercised
//! deterministically.

use crate::driver::{encode_rgb8, CameraDriver, DriverResult, DriverStatus};
use crate::types::{
    AntiFlickerMode, CameraHandle, DeviceDescriptor, ExposureSettings, FrameBuffer,
    FrameDescriptor, OpenMode, WhiteBalanceMode,
};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

const SIM_WIDTH: u32 = 640;
const SIM_HEIGHT: u32 = 480;
const SIM_FORMAT: &str = "RGB8";

/// Simulated driver over an in-memory device table.
pub struct SimulatedDriver {
    state: Mutex<State>,
}

struct State {
    devices: Vec<DeviceDescriptor>,
    sessions: HashMap<u32, Session>,
    next_handle: u32,
    fail_plan: HashMap<String, DriverStatus>,
    calls: Vec<String>,
}

struct Session {
    device_index: usize,
    mode: OpenMode,
    streaming: bool,
    trigger_delay: Duration,
    loop_interval: Duration,
    loop_enabled: bool,
    trigger_enabled: bool,
    settings: ExposureSettings,
    next_sequence: u64,
}

impl Session {
    fn new(device_index: usize, mode: OpenMode) -> Self {
        Self {
            device_index,
            mode,
            streaming: false,
            trigger_delay: Duration::ZERO,
            loop_interval: Duration::ZERO,
            loop_enabled: false,
            trigger_enabled: false,
            settings: ExposureSettings::default(),
            next_sequence: 0,
        }
    }
}

/// Point-in-time copy of one session's state, for assertions and status
/// output.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub device_index: usize,
    pub mode: OpenMode,
    pub streaming: bool,
    pub trigger_delay: Duration,
    pub loop_interval: Duration,
    pub loop_enabled: bool,
    pub trigger_enabled: bool,
    pub settings: ExposureSettings,
}

impl SimulatedDriver {
    /// Driver with an empty device table.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                devices: Vec::new(),
                sessions: HashMap::new(),
                next_handle: 1,
                fail_plan: HashMap::new(),
                calls: Vec::new(),
            }),
        }
    }

    /// Driver pre-populated with a single demo device.
    pub fn demo() -> Self {
        let driver = Self::new();
        driver.add_device(
            DeviceDescriptor::new("SimCam-0001")
                .with_model("SimCam 3000")
                .with_serial("SIM0001"),
        );
        driver
    }

    pub fn add_device(&self, descriptor: DeviceDescriptor) {
        self.state().devices.push(descriptor);
    }

    /// Arm a one-shot failure: the next call named `op` returns `status`
    /// after being recorded, without touching session state.
    pub fn fail_next(&self, op: &str, status: DriverStatus) {
        self.state().fail_plan.insert(op.to_string(), status);
    }

    /// Names of every trait call made so far, in order, failed calls
    /// included.
    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    pub fn session_count(&self) -> usize {
        self.state().sessions.len()
    }

    pub fn session_snapshot(&self, handle: CameraHandle) -> Option<SessionSnapshot> {
        let state = self.state();
        state.sessions.get(&handle.as_raw()).map(|s| SessionSnapshot {
            device_index: s.device_index,
            mode: s.mode,
            streaming: s.streaming,
            trigger_delay: s.trigger_delay,
            loop_interval: s.loop_interval,
            loop_enabled: s.loop_enabled,
            trigger_enabled: s.trigger_enabled,
            settings: s.settings.clone(),
        })
    }

    fn state(&self) -> MutexGuard<'_, State> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    // Records the call, then consumes any armed failure for it.
    fn begin(&self, op: &str) -> Result<MutexGuard<'_, State>, DriverStatus> {
        let mut state = self.state();
        state.calls.push(op.to_string());
        if let Some(status) = state.fail_plan.remove(op) {
            return Err(status);
        }
        Ok(state)
    }
}

impl Default for SimulatedDriver {
    fn default() -> Self {
        Self::new()
    }
}

fn session_mut<'a>(
    state: &'a mut MutexGuard<'_, State>,
    handle: CameraHandle,
) -> Result<&'a mut Session, DriverStatus> {
    state
        .sessions
        .get_mut(&handle.as_raw())
        .ok_or(DriverStatus::InvalidHandle)
}

fn synthetic_rgb(width: u32, height: u32, sequence: u64) -> Vec<u8> {
    let mut data = Vec::with_capacity((width * height * 3) as usize);
    let shift = (sequence % 256) as u32;
    for y in 0..height {
        for x in 0..width {
            data.push(((x + shift) % 256) as u8);
            data.push(((y + shift) % 256) as u8);
            data.push((((x + y) / 2) % 256) as u8);
        }
    }
    data
}

impl CameraDriver for SimulatedDriver {
    fn open_by_name(&self, name: &str, mode: OpenMode) -> DriverResult<CameraHandle> {
        let mut state = self.begin("open_by_name")?;

        let device_index = state
            .devices
            .iter()
            .position(|d| d.friendly_name == name)
            .ok_or(DriverStatus::DeviceNotFound)?;

        let exclusive_held = state
            .sessions
            .values()
            .any(|s| s.device_index == device_index && s.mode == OpenMode::Normal);
        let any_held = state
            .sessions
            .values()
            .any(|s| s.device_index == device_index);
        let busy = match mode {
            OpenMode::Normal => any_held,
            OpenMode::ReadOnly => exclusive_held,
        };
        if busy {
            return Err(DriverStatus::DeviceBusy);
        }

        let id = state.next_handle;
        state.next_handle += 1;
        state.sessions.insert(id, Session::new(device_index, mode));
        Ok(CameraHandle::from_raw(id))
    }

    fn refresh_device_list(&self) -> DriverResult<u32> {
        let state = self.begin("refresh_device_list")?;
        Ok(state.devices.len() as u32)
    }

    fn enumerate_device(&self, index: u32) -> DriverResult<DeviceDescriptor> {
        let state = self.begin("enumerate_device")?;
        state
            .devices
            .get(index as usize)
            .cloned()
            .ok_or(DriverStatus::OutOfRange)
    }

    fn is_valid(&self, handle: CameraHandle) -> DriverResult<bool> {
        let state = self.begin("is_valid")?;
        Ok(state.sessions.contains_key(&handle.as_raw()))
    }

    fn close(&self, handle: CameraHandle) -> DriverResult<()> {
        let mut state = self.begin("close")?;
        state
            .sessions
            .remove(&handle.as_raw())
            .map(|_| ())
            .ok_or(DriverStatus::InvalidHandle)
    }

    fn set_analog_gain(&self, handle: CameraHandle, gain: f32) -> DriverResult<()> {
        let mut state = self.begin("set_analog_gain")?;
        if !gain.is_finite() || gain <= 0.0 {
            return Err(DriverStatus::OutOfRange);
        }
        session_mut(&mut state, handle)?.settings.analog_gain = gain;
        Ok(())
    }

    fn set_white_balance_mode(
        &self,
        handle: CameraHandle,
        mode: WhiteBalanceMode,
    ) -> DriverResult<()> {
        let mut state = self.begin("set_white_balance_mode")?;
        session_mut(&mut state, handle)?.settings.white_balance = mode;
        Ok(())
    }

    fn set_anti_flicker(&self, handle: CameraHandle, mode: AntiFlickerMode) -> DriverResult<()> {
        let mut state = self.begin("set_anti_flicker")?;
        session_mut(&mut state, handle)?.settings.anti_flicker = mode;
        Ok(())
    }

    fn set_exposure_value(&self, handle: CameraHandle, exposure_us: f64) -> DriverResult<()> {
        let mut state = self.begin("set_exposure_value")?;
        if !exposure_us.is_finite() || exposure_us <= 0.0 {
            return Err(DriverStatus::OutOfRange);
        }
        session_mut(&mut state, handle)?.settings.exposure_us = exposure_us;
        Ok(())
    }

    fn set_trigger_delay(&self, handle: CameraHandle, delay: Duration) -> DriverResult<()> {
        let mut state = self.begin("set_trigger_delay")?;
        session_mut(&mut state, handle)?.trigger_delay = delay;
        Ok(())
    }

    fn set_soft_trigger_loop(&self, handle: CameraHandle, interval: Duration) -> DriverResult<()> {
        let mut state = self.begin("set_soft_trigger_loop")?;
        session_mut(&mut state, handle)?.loop_interval = interval;
        Ok(())
    }

    fn set_soft_trigger_loop_state(&self, handle: CameraHandle, enabled: bool) -> DriverResult<()> {
        let mut state = self.begin("set_soft_trigger_loop_state")?;
        session_mut(&mut state, handle)?.loop_enabled = enabled;
        Ok(())
    }

    fn set_trigger_state(&self, handle: CameraHandle, enabled: bool) -> DriverResult<()> {
        let mut state = self.begin("set_trigger_state")?;
        session_mut(&mut state, handle)?.trigger_enabled = enabled;
        Ok(())
    }

    fn start_stream(&self, handle: CameraHandle) -> DriverResult<()> {
        let mut state = self.begin("start_stream")?;
        session_mut(&mut state, handle)?.streaming = true;
        Ok(())
    }

    fn stop_stream(&self, handle: CameraHandle) -> DriverResult<()> {
        let mut state = self.begin("stop_stream")?;
        session_mut(&mut state, handle)?.streaming = false;
        Ok(())
    }

    fn get_frame(
        &self,
        handle: CameraHandle,
        _timeout: Duration,
    ) -> DriverResult<(FrameDescriptor, FrameBuffer)> {
        let mut state = self.begin("get_frame")?;
        let session = session_mut(&mut state, handle)?;
        if !session.streaming {
            return Err(DriverStatus::Timeout);
        }

        let sequence = session.next_sequence;
        session.next_sequence += 1;

        let data = synthetic_rgb(SIM_WIDTH, SIM_HEIGHT, sequence);
        let frame = FrameDescriptor::new(SIM_WIDTH, SIM_HEIGHT, SIM_FORMAT)
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
        self.begin("save_picture")?;

        let expected = frame.width as usize * frame.height as usize * 3;
        if buffer.len() != expected {
            return Err(DriverStatus::InvalidParameter);
        }

        encode_rgb8(path, frame.width, frame.height, buffer.as_slice(), quality)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_frames_have_rgb8_layout_and_advance_sequence() {
        let driver = SimulatedDriver::demo();
        let handle = driver
            .open_by_name("SimCam-0001", OpenMode::Normal)
            .unwrap();
        driver.start_stream(handle).unwrap();

        let (first, data) = driver.get_frame(handle, Duration::from_millis(50)).unwrap();
        let (second, _) = driver.get_frame(handle, Duration::from_millis(50)).unwrap();

        assert_eq!(first.width, SIM_WIDTH);
        assert_eq!(first.height, SIM_HEIGHT);
        assert_eq!(data.len(), (SIM_WIDTH * SIM_HEIGHT * 3) as usize);
        assert_eq!(first.sequence, 0);
        assert_eq!(second.sequence, 1);
    }

    #[test]
    fn normal_open_is_exclusive_per_device() {
        let driver = SimulatedDriver::demo();
        let first = driver
            .open_by_name("SimCam-0001", OpenMode::Normal)
            .unwrap();

        assert_eq!(
            driver.open_by_name("SimCam-0001", OpenMode::Normal),
            Err(DriverStatus::DeviceBusy)
        );

        driver.close(first).unwrap();
        assert!(driver.open_by_name("SimCam-0001", OpenMode::Normal).is_ok());
    }

    #[test]
    fn read_only_opens_share_a_device() {
        let driver = SimulatedDriver::demo();
        let a = driver
            .open_by_name("SimCam-0001", OpenMode::ReadOnly)
            .unwrap();
        let b = driver
            .open_by_name("SimCam-0001", OpenMode::ReadOnly)
            .unwrap();
        assert_ne!(a, b);
        assert_eq!(driver.session_count(), 2);
    }

    #[test]
    fn armed_failure_fires_once_and_is_still_recorded() {
        let driver = SimulatedDriver::demo();
        driver.fail_next("refresh_device_list", DriverStatus::Internal);

        assert_eq!(driver.refresh_device_list(), Err(DriverStatus::Internal));
        assert_eq!(driver.refresh_device_list(), Ok(1));
        assert_eq!(
            driver.calls(),
            vec!["refresh_device_list", "refresh_device_list"]
        );
    }
}

//! The camera control facade: argument checks, handle re-validation, and
//! status translation in front of an injected [`CameraDriver`].

use crate::driver::{CameraDriver, DriverStatus};
use crate::errors::MvCamError;
use crate::types::{CameraHandle, CapturedImage, ExposureSettings, OpenMode};
use std::time::Duration;

/// Upper bound on enumerated devices per scan, regardless of what the driver
/// reports.
pub const SCAN_MAX_DEVICES: u32 = 16;

/// Name capacity used by [`CameraFacade::open_default`], terminator included.
pub const MAX_CAMERA_NAME: usize = 64;

/// Thin, stateless control surface over one injected camera driver.
///
/// Every operation is a synchronous sequence of driver calls: validate
/// arguments locally, re-check handle validity with the driver, forward, and
/// wrap the first failing driver status in [`MvCamError::Driver`]. Nothing is
/// cached between calls; the driver stays the single source of truth for
/// handle validity, and a multi-step operation that fails partway leaves the
/// already-applied sub-steps in place.
pub struct CameraFacade<D: CameraDriver> {
    driver: D,
}

impl<D: CameraDriver> CameraFacade<D> {
    pub fn new(driver: D) -> Self {
        Self { driver }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn into_driver(self) -> D {
        self.driver
    }

    /// Open the camera named exactly `name` in normal mode.
    ///
    /// Fails with `InvalidArgument` for an empty name before any driver call.
    /// The handle returned by the driver is re-validated before it is handed
    /// out; a failing validation surfaces as `Driver`.
    pub fn open_by_name(&self, name: &str) -> Result<CameraHandle, MvCamError> {
        if name.is_empty() {
            return Err(MvCamError::invalid_argument("camera name must not be empty"));
        }

        let handle = self
            .driver
            .open_by_name(name, OpenMode::Normal)
            .map_err(MvCamError::driver)?;

        self.ensure_valid(handle)?;
        log::debug!("opened camera {:?} as {}", name, handle);
        Ok(handle)
    }

    /// Discover cameras and return the first enumerated name that fits
    /// `capacity` bytes, terminator included.
    ///
    /// The first enumerated descriptor decides the whole scan: a fitting
    /// name is returned immediately, an oversized one fails with
    /// `BufferTooSmall`, and an enumeration failure fails with `Driver`,
    /// in every case without consulting later devices. Zero discovered
    /// devices yield `NoCameraFound`. The reported device count is capped at
    /// [`SCAN_MAX_DEVICES`].
    pub fn scan(&self, capacity: usize) -> Result<String, MvCamError> {
        if capacity == 0 {
            return Err(MvCamError::invalid_argument("capacity must be positive"));
        }

        let reported = self
            .driver
            .refresh_device_list()
            .map_err(MvCamError::driver)?;
        let count = reported.min(SCAN_MAX_DEVICES);

        // Each outcome of the first enumerated descriptor is final; the loop
        // never reaches a second index.
        #[allow(clippy::never_loop)]
        for index in 0..count {
            let descriptor = self
                .driver
                .enumerate_device(index)
                .map_err(MvCamError::driver)?;

            let needed = descriptor.friendly_name.len() + 1;
            if needed > capacity {
                return Err(MvCamError::BufferTooSmall { needed, capacity });
            }
            return Ok(descriptor.friendly_name);
        }

        Err(MvCamError::NoCameraFound)
    }

    /// Scan with a [`MAX_CAMERA_NAME`]-byte capacity and open whatever name
    /// that produced, propagating either step's error unchanged.
    pub fn open_default(&self) -> Result<CameraHandle, MvCamError> {
        let name = self.scan(MAX_CAMERA_NAME)?;
        self.open_by_name(&name)
    }

    /// Apply exposure parameters in fixed order: analog gain, white-balance
    /// mode, anti-flicker mode, exposure value.
    ///
    /// Aborts at the first failing sub-call; earlier sub-settings stay
    /// applied.
    pub fn set_exposure(
        &self,
        handle: CameraHandle,
        settings: &ExposureSettings,
    ) -> Result<(), MvCamError> {
        self.ensure_valid(handle)?;

        self.driver
            .set_analog_gain(handle, settings.analog_gain)
            .map_err(MvCamError::driver)?;
        self.driver
            .set_white_balance_mode(handle, settings.white_balance)
            .map_err(MvCamError::driver)?;
        self.driver
            .set_anti_flicker(handle, settings.anti_flicker)
            .map_err(MvCamError::driver)?;
        self.driver
            .set_exposure_value(handle, settings.exposure_us)
            .map_err(MvCamError::driver)?;
        Ok(())
    }

    /// Arm the software trigger loop: set the trigger delay, then configure
    /// the loop at `loop_interval`, enable it, enable the trigger state, and
    /// start streaming. Any sub-step failure aborts the remaining steps.
    pub fn start_trigger(
        &self,
        handle: CameraHandle,
        delay: Duration,
        loop_interval: Duration,
    ) -> Result<(), MvCamError> {
        self.set_trigger_delay(handle, delay)?;
        self.start_trigger_loop(handle, loop_interval)?;
        log::debug!("trigger loop running on {}", handle);
        Ok(())
    }

    /// Disable the software trigger loop and stop streaming.
    pub fn stop_trigger(&self, handle: CameraHandle) -> Result<(), MvCamError> {
        self.ensure_valid(handle)?;

        self.driver
            .set_soft_trigger_loop_state(handle, false)
            .map_err(MvCamError::driver)?;
        self.driver
            .stop_stream(handle)
            .map_err(MvCamError::driver)?;
        log::debug!("trigger loop stopped on {}", handle);
        Ok(())
    }

    /// Block up to `timeout` for the next frame.
    pub fn get_image(
        &self,
        handle: CameraHandle,
        timeout: Duration,
    ) -> Result<CapturedImage, MvCamError> {
        self.ensure_valid(handle)?;

        let (frame, buffer) = self
            .driver
            .get_frame(handle, timeout)
            .map_err(MvCamError::driver)?;
        Ok(CapturedImage::new(frame, buffer))
    }

    /// Persist `image` under its file name at the given quality.
    ///
    /// Fails with `InvalidArgument` when the file name is empty, before any
    /// driver call; persistence itself is delegated entirely to the driver.
    pub fn save_image(
        &self,
        handle: CameraHandle,
        image: &CapturedImage,
        quality: u8,
    ) -> Result<(), MvCamError> {
        if image.file_name.is_empty() {
            return Err(MvCamError::invalid_argument(
                "image file name must not be empty",
            ));
        }

        self.ensure_valid(handle)?;
        self.driver
            .save_picture(&image.frame, &image.buffer, &image.file_name, quality)
            .map_err(MvCamError::driver)
    }

    /// Close the camera session; the handle is invalid afterwards.
    pub fn destroy(&self, handle: CameraHandle) -> Result<(), MvCamError> {
        self.ensure_valid(handle)?;
        self.driver.close(handle).map_err(MvCamError::driver)?;
        log::debug!("destroyed {}", handle);
        Ok(())
    }

    /// Handle validity, re-derived from the driver on every operation.
    ///
    /// A check that itself fails propagates its status; a check that comes
    /// back `false` maps to `DriverStatus::InvalidHandle`.
    fn ensure_valid(&self, handle: CameraHandle) -> Result<(), MvCamError> {
        match self.driver.is_valid(handle) {
            Ok(true) => Ok(()),
            Ok(false) => Err(MvCamError::Driver(DriverStatus::InvalidHandle)),
            Err(status) => Err(MvCamError::Driver(status)),
        }
    }

    fn set_trigger_delay(&self, handle: CameraHandle, delay: Duration) -> Result<(), MvCamError> {
        self.ensure_valid(handle)?;
        self.driver
            .set_trigger_delay(handle, delay)
            .map_err(MvCamError::driver)
    }

    fn start_trigger_loop(
        &self,
        handle: CameraHandle,
        interval: Duration,
    ) -> Result<(), MvCamError> {
        self.ensure_valid(handle)?;

        self.driver
            .set_soft_trigger_loop(handle, interval)
            .map_err(MvCamError::driver)?;
        self.driver
            .set_soft_trigger_loop_state(handle, true)
            .map_err(MvCamError::driver)?;
        self.driver
            .set_trigger_state(handle, true)
            .map_err(MvCamError::driver)?;
        self.driver
            .start_stream(handle)
            .map_err(MvCamError::driver)
    }
}

//! Tests for mvcam core types
//!
//! Ensures correct behavior of handles, mode enums, and frame data carriers.

use mvcam::types::{
    AntiFlickerMode, CameraHandle, CapturedImage, DeviceDescriptor, ExposureSettings, FrameBuffer,
    FrameDescriptor, OpenMode, WhiteBalanceMode,
};

#[cfg(test)]
mod handle_tests {
    use super::*;

    #[test]
    fn test_handle_round_trip() {
        let handle = CameraHandle::from_raw(42);
        assert_eq!(handle.as_raw(), 42);
    }

    #[test]
    fn test_handle_equality_and_copy() {
        let a = CameraHandle::from_raw(7);
        let b = a;
        assert_eq!(a, b);
        assert_ne!(a, CameraHandle::from_raw(8));
    }

    #[test]
    fn test_handle_display() {
        assert_eq!(CameraHandle::from_raw(3).to_string(), "camera#3");
    }
}

#[cfg(test)]
mod mode_tests {
    use super::*;

    #[test]
    fn test_white_balance_default_is_off() {
        assert_eq!(WhiteBalanceMode::default(), WhiteBalanceMode::Off);
    }

    #[test]
    fn test_white_balance_serialization() {
        assert_eq!(
            serde_json::to_string(&WhiteBalanceMode::Continuous).unwrap(),
            "\"continuous\""
        );
        let parsed: WhiteBalanceMode = serde_json::from_str("\"once\"").unwrap();
        assert_eq!(parsed, WhiteBalanceMode::Once);
    }

    #[test]
    fn test_anti_flicker_serialization() {
        assert_eq!(
            serde_json::to_string(&AntiFlickerMode::Hz50).unwrap(),
            "\"50hz\""
        );
        let parsed: AntiFlickerMode = serde_json::from_str("\"60hz\"").unwrap();
        assert_eq!(parsed, AntiFlickerMode::Hz60);
    }

    #[test]
    fn test_open_mode_serialization() {
        assert_eq!(
            serde_json::to_string(&OpenMode::ReadOnly).unwrap(),
            "\"read_only\""
        );
    }
}

#[cfg(test)]
mod exposure_settings_tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ExposureSettings::default();
        assert_eq!(settings.analog_gain, 1.0);
        assert_eq!(settings.white_balance, WhiteBalanceMode::Off);
        assert_eq!(settings.anti_flicker, AntiFlickerMode::Off);
        assert_eq!(settings.exposure_us, 10_000.0);
    }

    #[test]
    fn test_builder_pattern() {
        let settings = ExposureSettings::new()
            .with_analog_gain(4.0)
            .with_white_balance(WhiteBalanceMode::Once)
            .with_anti_flicker(AntiFlickerMode::Hz60)
            .with_exposure_us(2_500.0);

        assert_eq!(settings.analog_gain, 4.0);
        assert_eq!(settings.white_balance, WhiteBalanceMode::Once);
        assert_eq!(settings.anti_flicker, AntiFlickerMode::Hz60);
        assert_eq!(settings.exposure_us, 2_500.0);
    }

    #[test]
    fn test_serialization_round_trip() {
        let settings = ExposureSettings::new().with_analog_gain(2.0);
        let json = serde_json::to_string(&settings).unwrap();
        let parsed: ExposureSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, settings);
    }
}

#[cfg(test)]
mod descriptor_tests {
    use super::*;

    #[test]
    fn test_device_descriptor_builder() {
        let descriptor = DeviceDescriptor::new("Cam-0001")
            .with_model("MV-500")
            .with_serial("SN1234");

        assert_eq!(descriptor.friendly_name, "Cam-0001");
        assert_eq!(descriptor.model, "MV-500");
        assert_eq!(descriptor.serial, "SN1234");
    }

    #[test]
    fn test_device_descriptor_defaults_empty_metadata() {
        let descriptor = DeviceDescriptor::new("Cam-0002");
        assert!(descriptor.model.is_empty());
        assert!(descriptor.serial.is_empty());
    }

    #[test]
    fn test_frame_descriptor_builder() {
        let frame = FrameDescriptor::new(1920, 1080, "RGB8")
            .with_sequence(12)
            .with_size_bytes(1920 * 1080 * 3);

        assert_eq!(frame.width, 1920);
        assert_eq!(frame.height, 1080);
        assert_eq!(frame.format, "RGB8");
        assert_eq!(frame.sequence, 12);
        assert_eq!(frame.size_bytes, 1920 * 1080 * 3);
    }

    #[test]
    fn test_frame_descriptor_serialization() {
        let frame = FrameDescriptor::new(640, 480, "RGB8").with_sequence(5);
        let json = serde_json::to_string(&frame).unwrap();
        let parsed: FrameDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, frame);
    }
}

#[cfg(test)]
mod frame_buffer_tests {
    use super::*;

    #[test]
    fn test_buffer_from_vec() {
        let buffer = FrameBuffer::from_vec(vec![1, 2, 3]);
        assert_eq!(buffer.len(), 3);
        assert!(!buffer.is_empty());
        assert_eq!(buffer.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn test_empty_buffer() {
        let buffer = FrameBuffer::default();
        assert_eq!(buffer.len(), 0);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_clone_shares_pixels() {
        let buffer = FrameBuffer::from_vec(vec![9; 1024]);
        let clone = buffer.clone();
        assert_eq!(clone.as_slice(), buffer.as_slice());
    }

    #[test]
    fn test_debug_prints_length_not_pixels() {
        let buffer = FrameBuffer::from_vec(vec![0; 4096]);
        let debug = format!("{:?}", buffer);
        assert!(debug.contains("4096"));
        assert!(debug.len() < 100, "debug output must not dump pixel data");
    }
}

#[cfg(test)]
mod captured_image_tests {
    use super::*;

    fn sample_image() -> CapturedImage {
        let frame = FrameDescriptor::new(4, 4, "RGB8").with_size_bytes(48);
        CapturedImage::new(frame, FrameBuffer::from_vec(vec![0; 48]))
    }

    #[test]
    fn test_new_image_has_no_file_name() {
        let image = sample_image();
        assert!(image.file_name.is_empty());
    }

    #[test]
    fn test_with_file_name() {
        let image = sample_image().with_file_name("out/shot.jpg");
        assert_eq!(image.file_name, "out/shot.jpg");
    }

    #[test]
    fn test_ids_are_unique() {
        let a = sample_image();
        let b = sample_image();
        assert_ne!(a.id, b.id);
    }
}

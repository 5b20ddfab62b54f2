#[cfg(test)]
mod error_tests {
    use mvcam::{DriverStatus, MvCamError};
    use std::error::Error;

    #[test]
    fn test_invalid_argument_display() {
        let error = MvCamError::invalid_argument("name must not be empty");
        assert_eq!(
            error.to_string(),
            "Invalid argument: name must not be empty"
        );
    }

    #[test]
    fn test_driver_error_display_carries_code() {
        let error = MvCamError::Driver(DriverStatus::Timeout);
        let display = error.to_string();
        assert!(display.contains("Driver error"));
        assert!(display.contains("timed out"));
        assert!(display.contains(&DriverStatus::Timeout.code().to_string()));
    }

    #[test]
    fn test_buffer_too_small_display() {
        let error = MvCamError::BufferTooSmall {
            needed: 9,
            capacity: 8,
        };
        let display = error.to_string();
        assert!(display.contains("9"));
        assert!(display.contains("8"));
        assert!(display.contains("too small"));
    }

    #[test]
    fn test_no_camera_found_display() {
        assert_eq!(MvCamError::NoCameraFound.to_string(), "No camera found");
    }

    #[test]
    fn test_debug_format_names_variant() {
        let error = MvCamError::Driver(DriverStatus::DeviceBusy);
        let debug = format!("{:?}", error);
        assert!(debug.contains("Driver"));
        assert!(debug.contains("DeviceBusy"));
    }

    #[test]
    fn test_implements_error_trait() {
        let error = MvCamError::NoCameraFound;
        let _as_trait: &dyn Error = &error;
        assert!(error.source().is_none());
    }

    #[test]
    fn test_driver_status_accessor() {
        assert_eq!(
            MvCamError::Driver(DriverStatus::InvalidHandle).driver_status(),
            Some(DriverStatus::InvalidHandle)
        );
        assert_eq!(MvCamError::NoCameraFound.driver_status(), None);
        assert_eq!(
            MvCamError::invalid_argument("x").driver_status(),
            None
        );
    }

    #[test]
    fn test_driver_status_codes_are_stable() {
        // External tooling keys on these numbers.
        let expected = [
            (DriverStatus::InvalidParameter, -1),
            (DriverStatus::InvalidHandle, -2),
            (DriverStatus::DeviceNotFound, -3),
            (DriverStatus::DeviceBusy, -4),
            (DriverStatus::Timeout, -5),
            (DriverStatus::NotSupported, -6),
            (DriverStatus::OutOfRange, -7),
            (DriverStatus::IoError, -8),
            (DriverStatus::Internal, -99),
        ];

        for (status, code) in expected {
            assert_eq!(status.code(), code, "code changed for {:?}", status);
        }
    }

    #[test]
    fn test_driver_status_serde_names() {
        let json = serde_json::to_string(&DriverStatus::DeviceNotFound).unwrap();
        assert_eq!(json, "\"device_not_found\"");

        let parsed: DriverStatus = serde_json::from_str("\"out_of_range\"").unwrap();
        assert_eq!(parsed, DriverStatus::OutOfRange);
    }

    #[test]
    fn test_all_variants_display_nonempty() {
        let errors = vec![
            MvCamError::invalid_argument("bad input"),
            MvCamError::Driver(DriverStatus::Internal),
            MvCamError::BufferTooSmall {
                needed: 64,
                capacity: 16,
            },
            MvCamError::NoCameraFound,
        ];

        for error in errors {
            assert!(!error.to_string().is_empty());
            assert!(!format!("{:?}", error).is_empty());
        }
    }

    #[test]
    fn test_error_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<MvCamError>();
        assert_sync::<MvCamError>();
        assert_send::<DriverStatus>();
        assert_sync::<DriverStatus>();
    }

    #[test]
    fn test_error_boxing() {
        let _boxed: Box<dyn Error> = Box::new(MvCamError::Driver(DriverStatus::IoError));
        let _boxed_status: Box<dyn Error> = Box::new(DriverStatus::Timeout);
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn discover() -> Result<String, MvCamError> {
            Err(MvCamError::NoCameraFound)
        }

        fn open_first() -> Result<u32, MvCamError> {
            let _name = discover()?;
            Ok(1)
        }

        match open_first() {
            Err(MvCamError::NoCameraFound) => {}
            other => panic!("Expected NoCameraFound to propagate, got {:?}", other),
        }
    }

    #[test]
    fn test_exhaustive_matching() {
        fn classify(error: MvCamError) -> &'static str {
            match error {
                MvCamError::InvalidArgument(_) => "caller bug",
                MvCamError::Driver(_) => "driver",
                MvCamError::BufferTooSmall { .. } => "capacity",
                MvCamError::NoCameraFound => "absent",
            }
        }

        assert_eq!(classify(MvCamError::NoCameraFound), "absent");
        assert_eq!(
            classify(MvCamError::Driver(DriverStatus::DeviceBusy)),
            "driver"
        );
        assert_eq!(
            classify(MvCamError::BufferTooSmall {
                needed: 2,
                capacity: 1
            }),
            "capacity"
        );
    }

    #[test]
    fn test_equality_for_assertions() {
        assert_eq!(
            MvCamError::Driver(DriverStatus::Timeout),
            MvCamError::Driver(DriverStatus::Timeout)
        );
        assert_ne!(
            MvCamError::Driver(DriverStatus::Timeout),
            MvCamError::Driver(DriverStatus::IoError)
        );
        assert_eq!(
            MvCamError::invalid_argument("same"),
            MvCamError::InvalidArgument("same".to_string())
        );
    }
}

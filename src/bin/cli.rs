use mvcam::config::{MvCamConfig, StorageConfig};
use mvcam::{
    AntiFlickerMode, CameraDriver, CameraFacade, SimulatedDriver, WhiteBalanceMode,
    MAX_CAMERA_NAME,
};
use std::env;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[cfg(feature = "uvc")]
use mvcam::UvcDriver;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    mvcam::init_logging();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let command = args[1].clone();
    let driver = flag_value(&args, "--driver").unwrap_or_else(|| "sim".to_string());

    match driver.as_str() {
        "sim" => dispatch(&command, &args, CameraFacade::new(SimulatedDriver::demo())),
        #[cfg(feature = "uvc")]
        "uvc" => dispatch(&command, &args, CameraFacade::new(UvcDriver::new())),
        other => {
            eprintln!("Unknown driver: {} (available: {})", other, backends());
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!("Usage: mvcam-cli <command> [args]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  scan       Report the first discovered camera name");
    eprintln!("  capture    Open a camera, run the trigger loop, save frames");
    eprintln!("  exposure   Apply exposure settings to a camera");
    eprintln!("  info       Print tool information");
    eprintln!();
    eprintln!("Global options:");
    eprintln!("  --driver <{}>  Camera backend (default: sim)", backends());
    eprintln!("  --config <path>    Config file (default: mvcam.toml)");
    eprintln!("  --json             Machine-readable output");
}

fn backends() -> &'static str {
    if cfg!(feature = "uvc") {
        "sim|uvc"
    } else {
        "sim"
    }
}

fn dispatch<D: CameraDriver>(
    command: &str,
    args: &[String],
    facade: CameraFacade<D>,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        "scan" => cmd_scan(&facade, args),
        "capture" => cmd_capture(&facade, args),
        "exposure" => cmd_exposure(&facade, args),
        "info" => cmd_info(args),
        _ => {
            eprintln!("Unknown command: {}", command);
            std::process::exit(1);
        }
    }
}

fn flag_value(args: &[String], name: &str) -> Option<String> {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1).cloned())
}

fn load_config(args: &[String]) -> Result<MvCamConfig, Box<dyn std::error::Error>> {
    let config = match flag_value(args, "--config") {
        Some(path) => MvCamConfig::load_from_file(path)?,
        None => MvCamConfig::load_or_default(),
    };
    config.validate()?;
    Ok(config)
}

fn cmd_scan<D: CameraDriver>(
    facade: &CameraFacade<D>,
    args: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let capacity = match flag_value(args, "--capacity") {
        Some(v) => v.parse()?,
        None => MAX_CAMERA_NAME,
    };

    let name = facade.scan(capacity)?;
    if args.contains(&"--json".to_string()) {
        println!("{}", serde_json::to_string(&serde_json::json!({ "name": name }))?);
    } else {
        println!("{}", name);
    }
    Ok(())
}

fn cmd_capture<D: CameraDriver>(
    facade: &CameraFacade<D>,
    args: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(args)?;
    let json = args.contains(&"--json".to_string());

    let mut name = None;
    let mut frames: u64 = 1;
    let mut timeout_ms: u64 = 1000;
    let mut quality = config.storage.jpeg_quality;
    let mut output = config.storage.output_directory.clone();

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--name" => {
                i += 1;
                name = Some(args[i].clone());
            }
            "--frames" => {
                i += 1;
                frames = args[i].parse()?;
            }
            "--timeout" => {
                i += 1;
                timeout_ms = args[i].parse()?;
            }
            "--quality" => {
                i += 1;
                quality = args[i].parse()?;
            }
            "--output" => {
                i += 1;
                output = args[i].clone();
            }
            _ => {}
        }
        i += 1;
    }

    let handle = match name {
        Some(n) => facade.open_by_name(&n)?,
        None => facade.open_default()?,
    };

    facade.set_exposure(handle, &config.exposure.settings())?;
    facade.start_trigger(handle, config.trigger.delay(), config.trigger.loop_interval())?;

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = running.clone();
        ctrlc::set_handler(move || running.store(false, Ordering::SeqCst))?;
    }

    std::fs::create_dir_all(&output)?;

    for _ in 0..frames {
        if !running.load(Ordering::SeqCst) {
            log::info!("Capture interrupted");
            break;
        }

        let image = facade.get_image(handle, Duration::from_millis(timeout_ms))?;
        let file_name = build_file_name(&config.storage, &output, image.frame.sequence);
        let image = image.with_file_name(file_name);
        facade.save_image(handle, &image, quality)?;

        if json {
            println!("{}", serde_json::to_string(&image.frame)?);
        } else {
            println!(
                "Saved {} ({}x{} seq:{})",
                image.file_name, image.frame.width, image.frame.height, image.frame.sequence
            );
        }
    }

    facade.stop_trigger(handle)?;
    facade.destroy(handle)?;
    Ok(())
}

fn cmd_exposure<D: CameraDriver>(
    facade: &CameraFacade<D>,
    args: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(args)?;
    let mut settings = config.exposure.settings();
    let mut name = None;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--name" => {
                i += 1;
                name = Some(args[i].clone());
            }
            "--gain" => {
                i += 1;
                settings.analog_gain = args[i].parse()?;
            }
            "--wb" => {
                i += 1;
                settings.white_balance = parse_white_balance(&args[i])?;
            }
            "--flicker" => {
                i += 1;
                settings.anti_flicker = parse_anti_flicker(&args[i])?;
            }
            "--exposure-us" => {
                i += 1;
                settings.exposure_us = args[i].parse()?;
            }
            _ => {}
        }
        i += 1;
    }

    let handle = match name {
        Some(n) => facade.open_by_name(&n)?,
        None => facade.open_default()?,
    };

    facade.set_exposure(handle, &settings)?;
    facade.destroy(handle)?;

    if args.contains(&"--json".to_string()) {
        println!("{}", serde_json::to_string(&settings)?);
    } else {
        println!("OK");
    }
    Ok(())
}

fn cmd_info(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let info = mvcam::get_info();
    if args.contains(&"--json".to_string()) {
        println!("{}", serde_json::to_string(&info)?);
    } else {
        println!("{} {} ({})", info.name, info.version, info.description);
        println!("backends: {}", info.backends.join(", "));
    }
    Ok(())
}

fn parse_white_balance(s: &str) -> Result<WhiteBalanceMode, Box<dyn std::error::Error>> {
    match s {
        "off" => Ok(WhiteBalanceMode::Off),
        "once" => Ok(WhiteBalanceMode::Once),
        "continuous" => Ok(WhiteBalanceMode::Continuous),
        _ => Err(format!("Invalid white balance mode: {}", s).into()),
    }
}

fn parse_anti_flicker(s: &str) -> Result<AntiFlickerMode, Box<dyn std::error::Error>> {
    match s {
        "off" => Ok(AntiFlickerMode::Off),
        "50hz" => Ok(AntiFlickerMode::Hz50),
        "60hz" => Ok(AntiFlickerMode::Hz60),
        _ => Err(format!("Invalid anti-flicker mode: {}", s).into()),
    }
}

fn build_file_name(storage: &StorageConfig, dir: &str, sequence: u64) -> String {
    let stem = if storage.timestamp_files {
        format!(
            "{}_{}",
            storage.file_prefix,
            chrono::Utc::now().format("%Y%m%d_%H%M%S%3f")
        )
    } else {
        format!("{}_{:06}", storage.file_prefix, sequence)
    };
    Path::new(dir)
        .join(format!("{}.jpg", stem))
        .to_string_lossy()
        .into_owned()
}

use std::env;

#[derive(Debug, Clone)]
pub enum Mode {
    /// Save the current screen to a local PNG
    Screenshot { output: String },
    /// Locate a template on screen and report the match, no tap
    Find { template: String },
    /// Full pipeline: locate the template and tap its center
    Tap { template: String },
}

#[derive(Debug)]
pub struct Args {
    pub mode: Mode,
    pub device: Option<String>,
    pub threshold: Option<f32>,
}

impl Args {
    pub fn parse() -> Option<Self> {
        let args: Vec<String> = env::args().collect();

        let mut mode: Option<Mode> = None;
        let mut device: Option<String> = None;
        let mut threshold: Option<f32> = None;
        let mut screenshot_output = "screen.png".to_string();

        for arg in args.iter().skip(1) {
            if arg == "--help" || arg == "-h" {
                print_help();
                return None;
            } else if arg == "--version" || arg == "-v" {
                println!("Android UI Tap v{}", env!("APP_VERSION_DISPLAY"));
                return None;
            } else if arg == "--screenshot" || arg == "-s" {
                mode = Some(Mode::Screenshot {
                    output: screenshot_output.clone(),
                });
            } else if let Some(path) = arg.strip_prefix("--out=") {
                screenshot_output = path.to_string();
                if let Some(Mode::Screenshot { output }) = &mut mode {
                    *output = screenshot_output.clone();
                }
            } else if let Some(path) = arg.strip_prefix("--find=") {
                mode = Some(Mode::Find {
                    template: path.to_string(),
                });
            } else if let Some(path) = arg.strip_prefix("--tap=") {
                mode = Some(Mode::Tap {
                    template: path.to_string(),
                });
            } else if let Some(serial) = arg.strip_prefix("--device=") {
                device = Some(serial.to_string());
            } else if let Some(val) = arg.strip_prefix("--threshold=") {
                match val.parse::<f32>() {
                    Ok(t) if (-1.0..=1.0).contains(&t) => threshold = Some(t),
                    Ok(t) => {
                        eprintln!("❌ Threshold out of range (-1.0 to 1.0): {t}");
                        return None;
                    }
                    Err(_) => {
                        eprintln!("❌ Invalid threshold value: {val}");
                        return None;
                    }
                }
            } else {
                eprintln!("❌ Unknown argument: {arg}");
                print_help();
                return None;
            }
        }

        let Some(mode) = mode else {
            eprintln!("❌ No mode selected");
            print_help();
            return None;
        };

        Some(Args {
            mode,
            device,
            threshold,
        })
    }
}

fn print_help() {
    println!("Android UI Tap v{}", env!("APP_VERSION_DISPLAY"));
    println!();
    println!("Usage: android-ui-tap [MODE] [OPTIONS]");
    println!();
    println!("Modes (exactly one required):");
    println!("  --screenshot, -s       Capture the screen to a local PNG");
    println!("  --find=<template.png>  Locate the template on screen, print match");
    println!("  --tap=<template.png>   Locate the template and tap its center");
    println!();
    println!("Options:");
    println!("  --device=<serial>      Target device (default: first attached)");
    println!("  --threshold=<score>    Minimum match score, -1.0 to 1.0 (default: 0.8)");
    println!("  --out=<path>           Screenshot output file (default: screen.png)");
    println!("  --help, -h             Show this help");
    println!("  --version, -v          Show version");
}

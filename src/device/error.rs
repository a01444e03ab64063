use thiserror::Error;

/// Errors while locating and opening a device.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error(
        "'adb' binary not found in PATH. Install Android Platform Tools (https://developer.android.com/tools/adb) or add 'adb' to PATH."
    )]
    AdbNotFound,

    #[error(
        "'adb' command found but returned non-zero ({status}). Ensure Android Platform Tools are properly installed."
    )]
    AdbUnusable { status: String },

    #[error("Failed to execute adb: {source}")]
    CommandFailed {
        #[from]
        source: std::io::Error,
    },

    #[error("adb {subcommand} failed: {stderr}")]
    AdbCommandFailed { subcommand: String, stderr: String },

    #[error("No devices found. Connect a device and authorize USB debugging.")]
    NoDevices,

    #[error("Device '{serial}' not found in 'adb devices' output")]
    DeviceNotFound { serial: String },

    #[error("Could not parse screen size from 'wm size' output")]
    ScreenSizeParseFailed,
}

/// Errors while capturing a screen frame.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Failed to run adb screencap: {source}")]
    CommandFailed {
        #[from]
        source: std::io::Error,
    },

    #[error("adb screencap failed: {stderr}")]
    ScreencapFailed { stderr: String },

    #[error("Could not decode captured frame: {source}")]
    DecodeFailed {
        #[from]
        source: image::ImageError,
    },
}

/// Errors while delivering a tap event.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Tap coordinates are out of bounds: x={x}, y={y} (screen {width}x{height})")]
    TapOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    #[error("Failed to run adb input tap: {source}")]
    CommandFailed {
        #[from]
        source: std::io::Error,
    },

    #[error("adb input tap failed: {stderr}")]
    TapFailed { stderr: String },
}

//! Device access through the `adb` binary
//!
//! Shells out to `adb` for everything: device listing, screen size query,
//! screencap and tap injection. The target serial is fixed at construction
//! so every subsequent command addresses the same device, and capture uses
//! `exec-out screencap -p` so no temp file is left on the device or host.

use super::error::{CaptureError, DeviceError, DispatchError};
use super::types::{ActionDispatcher, Device, ScreenSource};
use crate::template_matching::Point;
use image::GrayImage;
use tokio::process::Command;

pub struct AdbShell {
    device: Device,
    screen_width: u32,
    screen_height: u32,
}

impl AdbShell {
    fn ensure_adb_available() -> Result<(), DeviceError> {
        match std::process::Command::new("adb").arg("version").output() {
            Ok(out) => {
                if !out.status.success() {
                    return Err(DeviceError::AdbUnusable {
                        status: out.status.to_string(),
                    });
                }
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(DeviceError::AdbNotFound),
            Err(e) => Err(DeviceError::CommandFailed { source: e }),
        }
    }

    /// Open a device by serial, or the first attached device when `serial`
    /// is `None`. Queries the screen size up front for tap bounds checks.
    pub async fn connect(serial: Option<&str>) -> Result<Self, DeviceError> {
        Self::ensure_adb_available()?;
        let devices = Self::list_devices().await?;
        let device = match serial {
            Some(wanted) => devices
                .into_iter()
                .find(|d| d.serial == wanted)
                .ok_or_else(|| DeviceError::DeviceNotFound {
                    serial: wanted.to_string(),
                })?,
            None => devices.into_iter().next().ok_or(DeviceError::NoDevices)?,
        };
        let (screen_width, screen_height) = Self::query_screen_size(&device.serial).await?;
        log::info!(
            "Opened device {} ({}x{})",
            device.serial,
            screen_width,
            screen_height
        );
        Ok(Self {
            device,
            screen_width,
            screen_height,
        })
    }

    pub async fn list_devices() -> Result<Vec<Device>, DeviceError> {
        Self::ensure_adb_available()?;
        let output = Command::new("adb").arg("devices").arg("-l").output().await?;
        if !output.status.success() {
            return Err(DeviceError::AdbCommandFailed {
                subcommand: "devices".to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(Self::parse_devices(&stdout))
    }

    pub fn parse_devices(output: &str) -> Vec<Device> {
        output
            .lines()
            .skip(1)
            .filter_map(|line| {
                let parts: Vec<&str> = line.split_whitespace().collect();
                if parts.len() >= 2 && parts[1] == "device" {
                    let serial = parts[0].to_string();
                    let transport_id = line.split_whitespace().find_map(|part| {
                        part.strip_prefix("transport_id:").map(|id| id.to_string())
                    });
                    Some(Device {
                        serial,
                        transport_id,
                    })
                } else {
                    None
                }
            })
            .collect()
    }

    async fn query_screen_size(serial: &str) -> Result<(u32, u32), DeviceError> {
        let output = Command::new("adb")
            .arg("-s")
            .arg(serial)
            .arg("shell")
            .arg("wm")
            .arg("size")
            .output()
            .await?;
        if !output.status.success() {
            return Err(DeviceError::AdbCommandFailed {
                subcommand: "shell wm size".to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        Self::parse_screen_size(&stdout)
    }

    pub fn parse_screen_size(stdout: &str) -> Result<(u32, u32), DeviceError> {
        for line in stdout.lines() {
            if let Some(size_str) = line.strip_prefix("Physical size: ") {
                let parts: Vec<&str> = size_str.trim().split('x').collect();
                if parts.len() == 2
                    && let (Ok(x), Ok(y)) = (parts[0].parse::<u32>(), parts[1].parse::<u32>())
                {
                    return Ok((x, y));
                }
            }
        }
        Err(DeviceError::ScreenSizeParseFailed)
    }

    pub fn serial(&self) -> &str {
        &self.device.serial
    }

    pub fn screen_dimensions(&self) -> (u32, u32) {
        (self.screen_width, self.screen_height)
    }

    /// Raw PNG bytes of the current screen, straight from screencap stdout.
    pub async fn capture_png_bytes(&self) -> Result<Vec<u8>, CaptureError> {
        let start = std::time::Instant::now();
        let output = Command::new("adb")
            .arg("-s")
            .arg(&self.device.serial)
            .arg("exec-out")
            .arg("screencap")
            .arg("-p")
            .output()
            .await?;
        if !output.status.success() {
            return Err(CaptureError::ScreencapFailed {
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }
        log::debug!(
            "screencap returned {} bytes in {}ms",
            output.stdout.len(),
            start.elapsed().as_millis()
        );
        Ok(output.stdout)
    }

    pub(super) fn check_bounds(
        point: Point,
        screen_width: u32,
        screen_height: u32,
    ) -> Result<(), DispatchError> {
        if point.x >= screen_width || point.y >= screen_height {
            return Err(DispatchError::TapOutOfBounds {
                x: point.x,
                y: point.y,
                width: screen_width,
                height: screen_height,
            });
        }
        Ok(())
    }
}

impl ScreenSource for AdbShell {
    async fn capture(&self) -> Result<GrayImage, CaptureError> {
        let bytes = self.capture_png_bytes().await?;
        let image = image::load_from_memory(&bytes)?;
        Ok(image.to_luma8())
    }
}

impl ActionDispatcher for AdbShell {
    async fn tap(&self, point: Point) -> Result<(), DispatchError> {
        Self::check_bounds(point, self.screen_width, self.screen_height)?;
        let output = Command::new("adb")
            .arg("-s")
            .arg(&self.device.serial)
            .arg("shell")
            .arg("input")
            .arg("tap")
            .arg(point.x.to_string())
            .arg(point.y.to_string())
            .output()
            .await?;
        if !output.status.success() {
            return Err(DispatchError::TapFailed {
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }
        log::info!("Tapped ({},{})", point.x, point.y);
        Ok(())
    }
}

// Device module - the capability boundary to the Android device.
// Screen capture and tap injection go through the `adb` binary; everything
// above this module only sees the ScreenSource/ActionDispatcher traits.

pub mod error;
pub mod shell;
pub mod types;


pub use error::{CaptureError, DeviceError, DispatchError};
pub use shell::AdbShell;
pub use types::{ActionDispatcher, Device, ScreenSource};

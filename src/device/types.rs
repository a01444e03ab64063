// Core device types and capability traits

use super::error::{CaptureError, DispatchError};
use crate::template_matching::Point;
use image::GrayImage;
use serde::Serialize;

/// One attached device as reported by `adb devices -l`.
#[derive(Debug, PartialEq, Serialize, Clone)]
pub struct Device {
    pub serial: String,
    pub transport_id: Option<String>,
}

/// Capability to obtain a full-screen grayscale frame from the device.
///
/// The returned image reflects a single screen frame; torn-capture
/// guarantees are whatever the transport provides.
#[allow(async_fn_in_trait)]
pub trait ScreenSource {
    async fn capture(&self) -> Result<GrayImage, CaptureError>;
}

/// Capability to deliver a single tap at a screen coordinate.
#[allow(async_fn_in_trait)]
pub trait ActionDispatcher {
    async fn tap(&self, point: Point) -> Result<(), DispatchError>;
}

impl<T: ScreenSource + ?Sized> ScreenSource for &T {
    async fn capture(&self) -> Result<GrayImage, CaptureError> {
        (**self).capture().await
    }
}

impl<T: ActionDispatcher + ?Sized> ActionDispatcher for &T {
    async fn tap(&self, point: Point) -> Result<(), DispatchError> {
        (**self).tap(point).await
    }
}

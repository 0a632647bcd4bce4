//! Virtual wheel output drivers
//!
//! The tick loop feeds one driver per process. Drivers take `&self` and use
//! interior mutability so they can live behind `Arc<dyn WheelDriver>`.

use async_trait::async_trait;
use thiserror::Error;

pub mod console;

pub use console::ConsoleDriver;

/// Errors at the virtual-device boundary
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("virtual device not acquired")]
    NotAcquired,
    #[error("button index {0} outside the 16 supported slots")]
    BadButton(u8),
    #[error("virtual device rejected update: {0}")]
    Device(String),
}

/// The three axes a wheel-and-pedals device exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelAxis {
    Steering,
    Gas,
    Brake,
}

impl WheelAxis {
    /// HID usage ID of the axis on the virtual device (X, Y, Z)
    pub fn hid_usage(self) -> u32 {
        match self {
            WheelAxis::Steering => 0x30,
            WheelAxis::Gas => 0x31,
            WheelAxis::Brake => 0x32,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            WheelAxis::Steering => "steering",
            WheelAxis::Gas => "gas",
            WheelAxis::Brake => "brake",
        }
    }
}

/// Driver trait - every virtual-device backend implements this
///
/// Note: all methods take &self (not &mut self) to support Arc<dyn WheelDriver>.
/// Drivers should use interior mutability (RwLock, Mutex, etc.) for mutable state.
#[async_trait]
pub trait WheelDriver: Send + Sync {
    /// Get the driver name (e.g. "console")
    fn name(&self) -> &str;

    /// Acquire the virtual device.
    ///
    /// Called once before the tick loop starts; failure here aborts startup.
    /// The feeder never enters the loop against an unacquired device.
    async fn init(&self) -> Result<(), DriverError>;

    /// Feed one axis value in the device's integer domain
    async fn set_axis(&self, axis: WheelAxis, value: i32) -> Result<(), DriverError>;

    /// Feed one button state (index 0..=15)
    async fn set_button(&self, index: u8, pressed: bool) -> Result<(), DriverError>;

    /// Release the virtual device
    async fn shutdown(&self) -> Result<(), DriverError>;
}

//! Gamepad input boundary
//!
//! Provides the raw controller snapshot type and the gilrs-backed polling
//! provider that keeps the latest snapshot available to the tick loop.

pub mod diagnostics;
pub mod provider;
pub mod snapshot;

pub use provider::GamepadProvider;
pub use snapshot::{button_flags, ControllerSnapshot};

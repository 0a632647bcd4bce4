//! GilRs gamepad provider
//!
//! Runs the gilrs event pump on a dedicated blocking thread (gilrs contexts
//! are not Send) and publishes the latest [`ControllerSnapshot`] over a
//! watch channel. The tick loop borrows whatever snapshot is current; if the
//! controller drops out mid-session the channel degrades to neutral input
//! instead of taking the process down.

use anyhow::{Context, Result};
use gilrs::{Axis, Button, Event, EventType, Gilrs};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use super::snapshot::{button_flags, ControllerSnapshot, STICK_FULL_SCALE, TRIGGER_FULL_SCALE};

/// Map a gilrs button to its slot in the XInput-layout bitmask.
///
/// Trigger "buttons" (`LeftTrigger2`/`RightTrigger2`) have no bit - their
/// analog values feed the pedal axes instead.
fn gilrs_button_bit(button: Button) -> Option<u16> {
    match button {
        Button::South => Some(button_flags::A),
        Button::East => Some(button_flags::B),
        Button::West => Some(button_flags::X),
        Button::North => Some(button_flags::Y),
        Button::LeftTrigger => Some(button_flags::LEFT_SHOULDER),
        Button::RightTrigger => Some(button_flags::RIGHT_SHOULDER),
        Button::Select => Some(button_flags::BACK),
        Button::Start => Some(button_flags::START),
        Button::LeftThumb => Some(button_flags::LEFT_THUMB),
        Button::RightThumb => Some(button_flags::RIGHT_THUMB),
        Button::DPadUp => Some(button_flags::DPAD_UP),
        Button::DPadDown => Some(button_flags::DPAD_DOWN),
        Button::DPadLeft => Some(button_flags::DPAD_LEFT),
        Button::DPadRight => Some(button_flags::DPAD_RIGHT),
        _ => None,
    }
}

fn set_button(snapshot: &mut ControllerSnapshot, button: Button, pressed: bool) {
    if let Some(bit) = gilrs_button_bit(button) {
        if pressed {
            snapshot.buttons |= bit;
        } else {
            snapshot.buttons &= !bit;
        }
    }
    snapshot.rate_up = snapshot.buttons & button_flags::X != 0;
    snapshot.rate_down = snapshot.buttons & button_flags::B != 0;
}

fn set_trigger(snapshot: &mut ControllerSnapshot, button: Button, value: f32) {
    let pressure = (value.clamp(0.0, 1.0) * TRIGGER_FULL_SCALE).round() as u8;
    match button {
        Button::RightTrigger2 => snapshot.gas = pressure,
        Button::LeftTrigger2 => snapshot.brake = pressure,
        _ => {}
    }
}

fn set_axis(snapshot: &mut ControllerSnapshot, axis: Axis, value: f32) {
    if axis == Axis::LeftStickX {
        snapshot.steer = (value.clamp(-1.0, 1.0) * (STICK_FULL_SCALE - 1.0)) as i16;
    }
}

/// Gamepad provider handle.
///
/// Owns the shutdown channel for the polling thread; clones of the snapshot
/// receiver are handed out via [`GamepadProvider::subscribe`].
pub struct GamepadProvider {
    snapshot_rx: watch::Receiver<ControllerSnapshot>,
    shutdown_tx: Option<mpsc::Sender<()>>,
}

impl GamepadProvider {
    /// Start the polling thread.
    ///
    /// # Arguments
    /// * `poll_period` - How often the thread drains gilrs events and
    ///   republishes the snapshot; the feeder's tick period is the natural
    ///   choice.
    pub fn start(poll_period: Duration) -> Result<Self> {
        let (snapshot_tx, snapshot_rx) = watch::channel(ControllerSnapshot::neutral());
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);

        std::thread::Builder::new()
            .name("gamepad-poll".into())
            .spawn(move || {
                Self::poll_loop_blocking(poll_period, snapshot_tx, shutdown_rx);
            })
            .context("Failed to spawn gamepad polling thread")?;

        Ok(Self {
            snapshot_rx,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    /// Get a receiver for the latest controller snapshot
    pub fn subscribe(&self) -> watch::Receiver<ControllerSnapshot> {
        self.snapshot_rx.clone()
    }

    /// Stop the polling thread
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.try_send(());
        }
    }

    /// Polling loop (runs on the dedicated blocking thread)
    fn poll_loop_blocking(
        poll_period: Duration,
        snapshot_tx: watch::Sender<ControllerSnapshot>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        // gilrs must be created on the thread that pumps it
        let mut gilrs = match Gilrs::new() {
            Ok(g) => {
                info!("GilRs initialized");
                g
            }
            Err(e) => {
                // Leave the neutral snapshot in place; the feeder keeps
                // ticking with centered input
                warn!("Failed to initialize GilRs: {:?}. Feeding neutral input.", e);
                return;
            }
        };

        let mut active = gilrs
            .gamepads()
            .find(|(_, gp)| gp.is_connected())
            .map(|(id, gp)| {
                info!("Using gamepad: \"{}\" ({:?})", gp.name(), id);
                id
            });
        if active.is_none() {
            warn!("No gamepad connected yet, waiting for one to appear");
        }

        let mut snapshot = ControllerSnapshot::neutral();

        loop {
            while let Some(Event { id, event, .. }) = gilrs.next_event() {
                match event {
                    EventType::Connected => {
                        if active.is_none() {
                            let name = gilrs
                                .connected_gamepad(id)
                                .map(|gp| gp.name().to_string())
                                .unwrap_or_default();
                            info!("Gamepad connected: \"{}\" ({:?})", name, id);
                            active = Some(id);
                            snapshot = ControllerSnapshot::neutral();
                        }
                    }
                    EventType::Disconnected if active == Some(id) => {
                        warn!("Gamepad disconnected, feeding neutral input");
                        active = None;
                        snapshot = ControllerSnapshot::neutral();
                    }
                    _ if active != Some(id) => {
                        // Single-device feeder: ignore other controllers
                        debug!("Ignoring event from inactive gamepad {:?}", id);
                    }
                    EventType::ButtonPressed(button, _) => set_button(&mut snapshot, button, true),
                    EventType::ButtonReleased(button, _) => {
                        set_button(&mut snapshot, button, false)
                    }
                    EventType::ButtonChanged(button, value, _) => {
                        set_trigger(&mut snapshot, button, value)
                    }
                    EventType::AxisChanged(axis, value, _) => {
                        set_axis(&mut snapshot, axis, value)
                    }
                    _ => {}
                }
            }

            snapshot_tx.send_replace(snapshot);

            if shutdown_rx.try_recv().is_ok() {
                debug!("Gamepad polling thread shutting down");
                break;
            }
            std::thread::sleep(poll_period);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_bit_mapping() {
        assert_eq!(gilrs_button_bit(Button::South), Some(button_flags::A));
        assert_eq!(gilrs_button_bit(Button::East), Some(button_flags::B));
        assert_eq!(gilrs_button_bit(Button::West), Some(button_flags::X));
        assert_eq!(gilrs_button_bit(Button::North), Some(button_flags::Y));
        assert_eq!(gilrs_button_bit(Button::DPadUp), Some(button_flags::DPAD_UP));
        // Analog triggers feed the pedal axes, not the bitmask
        assert_eq!(gilrs_button_bit(Button::LeftTrigger2), None);
        assert_eq!(gilrs_button_bit(Button::RightTrigger2), None);
    }

    #[test]
    fn test_modifier_flags_follow_buttons() {
        let mut snapshot = ControllerSnapshot::neutral();

        set_button(&mut snapshot, Button::West, true);
        assert!(snapshot.rate_up);
        assert!(!snapshot.rate_down);

        set_button(&mut snapshot, Button::East, true);
        assert!(snapshot.rate_up);
        assert!(snapshot.rate_down);

        set_button(&mut snapshot, Button::West, false);
        assert!(!snapshot.rate_up);
        assert!(snapshot.rate_down);
    }

    #[test]
    fn test_trigger_values_scale_to_device_units() {
        let mut snapshot = ControllerSnapshot::neutral();

        set_trigger(&mut snapshot, Button::RightTrigger2, 1.0);
        assert_eq!(snapshot.gas, 255);
        assert_eq!(snapshot.brake, 0);

        set_trigger(&mut snapshot, Button::LeftTrigger2, 0.5);
        assert_eq!(snapshot.brake, 128);

        // Out-of-range values from a noisy driver are clamped
        set_trigger(&mut snapshot, Button::RightTrigger2, 1.7);
        assert_eq!(snapshot.gas, 255);
        set_trigger(&mut snapshot, Button::RightTrigger2, -0.3);
        assert_eq!(snapshot.gas, 0);
    }

    #[test]
    fn test_only_left_stick_x_steers() {
        let mut snapshot = ControllerSnapshot::neutral();

        set_axis(&mut snapshot, Axis::LeftStickX, 1.0);
        assert_eq!(snapshot.steer, 32767);

        set_axis(&mut snapshot, Axis::LeftStickY, -1.0);
        assert_eq!(snapshot.steer, 32767);

        set_axis(&mut snapshot, Axis::LeftStickX, -1.0);
        assert_eq!(snapshot.steer, -32767);

        set_axis(&mut snapshot, Axis::LeftStickX, 0.0);
        assert_eq!(snapshot.steer, 0);
    }
}

//! Gamepad diagnostics for troubleshooting detection issues

use gilrs::{Event, EventType, Gilrs};
use std::thread;
use std::time::Duration;
use tracing::info;

/// Print detailed information about all detected gamepads
///
/// Useful when the feeder keeps reporting neutral input: Bluetooth
/// controllers in particular can take a moment to enumerate or show up
/// under a non-obvious name.
pub fn print_device_diagnostics() {
    info!("=== Gamepad Diagnostics ===");
    info!("Platform: {}", std::env::consts::OS);

    let mut gilrs = match Gilrs::new() {
        Ok(g) => {
            info!("✅ gilrs initialized successfully");
            g
        }
        Err(e) => {
            info!("❌ Failed to initialize GilRs: {:?}", e);
            info!("This may indicate missing system libraries or permissions issues.");
            return;
        }
    };

    info!("⏳ Waiting for gamepads to connect (3 seconds)...");

    let start = std::time::Instant::now();
    while start.elapsed() < Duration::from_secs(3) {
        // Pump events so connection detection can fire
        while let Some(Event { event, .. }) = gilrs.next_event() {
            if event == EventType::Connected {
                info!("   📶 Gamepad connection detected...");
            }
        }
        thread::sleep(Duration::from_millis(100));
    }

    let gamepads: Vec<_> = gilrs.gamepads().collect();

    if gamepads.is_empty() {
        info!("⚠️  No gamepads detected");
        info!("   Please check the controller is connected (USB or Bluetooth paired)");
        return;
    }

    info!("✅ Found {} gamepad(s):", gamepads.len());
    let mut first_connected = true;
    for (id, gamepad) in gamepads {
        info!("📋 Gamepad ID: {:?}", id);
        info!("   Name: \"{}\"", gamepad.name());
        info!("   Connected: {}", gamepad.is_connected());
        info!("   Power Info: {:?}", gamepad.power_info());
        if gamepad.is_connected() && first_connected {
            info!("   🎮 This controller would drive the virtual wheel");
            first_connected = false;
        }
    }
}

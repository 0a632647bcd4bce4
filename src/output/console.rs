//! Console driver - logs all device updates for testing and debugging
//!
//! This is useful for:
//! - Tuning filter settings without a virtual-device driver installed
//! - Validating axis/button emission
//! - Development on platforms without the real device backend

use crate::output::{DriverError, WheelAxis, WheelDriver};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// ConsoleDriver logs all updates instead of feeding a real device
pub struct ConsoleDriver {
    name: String,
    /// Track if driver is acquired
    acquired: Arc<RwLock<bool>>,
    /// Update counter for debugging
    update_count: Arc<RwLock<u64>>,
}

impl ConsoleDriver {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            acquired: Arc::new(RwLock::new(false)),
            update_count: Arc::new(RwLock::new(0)),
        }
    }

    async fn bump_count(&self) -> u64 {
        let mut count = self.update_count.write().await;
        *count += 1;
        *count
    }
}

#[async_trait]
impl WheelDriver for ConsoleDriver {
    fn name(&self) -> &str {
        &self.name
    }

    async fn init(&self) -> Result<(), DriverError> {
        *self.acquired.write().await = true;
        *self.update_count.write().await = 0;
        info!("🔌 ConsoleDriver '{}' acquired virtual device", self.name);
        Ok(())
    }

    async fn set_axis(&self, axis: WheelAxis, value: i32) -> Result<(), DriverError> {
        if !*self.acquired.read().await {
            return Err(DriverError::NotAcquired);
        }
        let count = self.bump_count().await;
        debug!(
            "🎮 [{}] {} (usage 0x{:02X}) = {} [update #{}]",
            chrono::Local::now().format("%H:%M:%S%.3f"),
            axis.name(),
            axis.hid_usage(),
            value,
            count
        );
        Ok(())
    }

    async fn set_button(&self, index: u8, pressed: bool) -> Result<(), DriverError> {
        if !*self.acquired.read().await {
            return Err(DriverError::NotAcquired);
        }
        if index >= 16 {
            warn!("⚠️  Button index {} out of range", index);
            return Err(DriverError::BadButton(index));
        }
        let count = self.bump_count().await;
        debug!("🎮 button {} = {} [update #{}]", index, pressed, count);
        Ok(())
    }

    async fn shutdown(&self) -> Result<(), DriverError> {
        let was_acquired = *self.acquired.read().await;
        if was_acquired {
            let final_count = *self.update_count.read().await;
            info!(
                "🛑 ConsoleDriver '{}' released device ({} updates fed)",
                self.name, final_count
            );
        }
        *self.acquired.write().await = false;
        Ok(())
    }
}

//! The tick loop - snapshot in, shaped axes out
//!
//! One tick: borrow the latest controller snapshot, run the shaping
//! pipeline, feed every axis and all sixteen buttons to the virtual device,
//! then wait out the rest of the period. The device holds no defaults, so
//! every channel is fed every tick whether it changed or not.

use anyhow::Result;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::info;

use crate::config::AppConfig;
use crate::input::ControllerSnapshot;
use crate::output::{WheelAxis, WheelDriver};
use crate::shaper::{encode, ShapedFrame, Shaper};

/// Owns the shaper state and drives it at the configured rate.
pub struct Feeder {
    tick_period: Duration,
    shaper: Shaper,
    snapshot_rx: watch::Receiver<ControllerSnapshot>,
    driver: Arc<dyn WheelDriver>,
}

impl Feeder {
    pub fn new(
        config: &AppConfig,
        snapshot_rx: watch::Receiver<ControllerSnapshot>,
        driver: Arc<dyn WheelDriver>,
    ) -> Self {
        Self {
            tick_period: config.general.tick_period(),
            shaper: Shaper::new(config),
            snapshot_rx,
            driver,
        }
    }

    /// Run the loop until the shutdown future resolves.
    ///
    /// The device is primed with a neutral frame before the first tick and
    /// parked neutral again on the way out, so it never ends up holding a
    /// pressed pedal.
    pub async fn run(mut self, shutdown: impl Future<Output = ()>) -> Result<()> {
        self.emit(&ShapedFrame::neutral()).await?;
        info!(
            "Feeder running ({} ms per tick)",
            self.tick_period.as_millis()
        );

        let mut interval = tokio::time::interval(self.tick_period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let snapshot = *self.snapshot_rx.borrow();
                    let frame = self.shaper.tick(&snapshot);
                    self.emit(&frame).await?;
                }
                _ = &mut shutdown => {
                    info!("Shutdown signal received, stopping feeder");
                    break;
                }
            }
        }

        self.emit(&ShapedFrame::neutral()).await?;
        Ok(())
    }

    /// Feed one complete frame: three axes, sixteen buttons.
    async fn emit(&self, frame: &ShapedFrame) -> Result<()> {
        self.driver
            .set_axis(WheelAxis::Steering, encode::to_axis(frame.steer))
            .await?;
        self.driver
            .set_axis(WheelAxis::Gas, encode::to_axis(frame.gas))
            .await?;
        self.driver
            .set_axis(WheelAxis::Brake, encode::to_axis(frame.brake))
            .await?;

        for index in 0..16u8 {
            let pressed = (frame.buttons >> index) & 1 == 1;
            self.driver.set_button(index, pressed).await?;
        }

        Ok(())
    }
}

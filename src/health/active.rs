//! Active health checking.
//!
//! # Responsibilities
//! - Drive `StickyBalancer::health_check_sweep` on a fixed interval
//! - Stop cleanly on the shutdown broadcast
//!
//! The balancer never schedules itself; tests call the sweep directly.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::{self, MissedTickBehavior};

use crate::config::HealthCheckConfig;
use crate::load_balancer::StickyBalancer;

pub struct HealthMonitor<T> {
    balancer: Arc<StickyBalancer<T>>,
    config: HealthCheckConfig,
}

impl<T> HealthMonitor<T>
where
    T: Send + Sync + 'static,
{
    pub fn new(balancer: Arc<StickyBalancer<T>>, config: HealthCheckConfig) -> Self {
        Self { balancer, config }
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        if !self.config.enabled {
            tracing::info!(group = %self.balancer.name(), "Active health checks disabled");
            return;
        }

        tracing::info!(
            group = %self.balancer.name(),
            interval = self.config.interval_secs,
            path = %self.config.path,
            instances = self.balancer.instances().len(),
            "Health monitor starting"
        );

        let interval = Duration::from_secs(self.config.interval_secs.max(1));
        let mut ticker = time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.balancer.health_check_sweep().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!(group = %self.balancer.name(), "Health monitor received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}

//! Recurring connectivity check.

use std::time::Duration;

use letmein_core::game::GameEvent;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::controller::EventSender;

/// Posts [`GameEvent::CheckConnection`] every `period`, starting one period
/// from now (startup runs its own check).
///
/// The task ends when the event receiver is dropped.
pub fn spawn_health_monitor(events: EventSender, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if events.send(GameEvent::CheckConnection).is_err() {
                tracing::debug!("[HealthMonitor] Event channel closed, stopping");
                break;
            }
        }
    })
}

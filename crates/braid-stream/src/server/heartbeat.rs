//! Keep-alive timer.

use std::time::Duration;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

/// Fixed-period ticker for keep-alive writes.
///
/// The first tick comes one full period after creation. A tick that is
/// missed because the writer was busy is delayed rather than replayed in a
/// burst.
#[derive(Debug)]
pub struct Heartbeat {
    interval: Interval,
}

impl Heartbeat {
    pub fn new(period: Duration) -> Self {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Heartbeat { interval }
    }

    #[must_use]
    pub fn period(&self) -> Duration {
        self.interval.period()
    }

    pub async fn tick(&mut self) {
        self.interval.tick().await;
    }
}

/// Tick an optional heartbeat; a disabled heartbeat never fires.
pub(crate) async fn tick(heartbeat: &mut Option<Heartbeat>) {
    match heartbeat {
        Some(heartbeat) => heartbeat.tick().await,
        None => std::future::pending().await,
    }
}

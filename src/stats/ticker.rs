//! Study-time ticker.
//!
//! While a study session is mounted, a background task adds one second of
//! study time per second of wall clock. The ticker is owned by the study
//! view: `stop()` or dropping the handle cancels it, and no tick lands after
//! cancellation. An optional callback sees the totals after every tick, which
//! the app uses to write them back.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::tracker::{SharedStats, UserStats};

/// Wall-clock period of one study-time tick.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Handle to a running study-time ticker.
///
/// Must be created inside a tokio runtime.
#[derive(Debug)]
pub struct StatsTicker {
    token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl StatsTicker {
    /// Start ticking `tick(1, 0)` into `stats` once per `TICK_PERIOD`.
    ///
    /// The first tick fires one full period after start.
    pub fn start(stats: SharedStats) -> Self {
        Self::start_with(stats, |_| {})
    }

    /// Like [`start`](Self::start), calling `on_tick` with the new totals
    /// after each tick.
    pub fn start_with<F>(stats: SharedStats, on_tick: F) -> Self
    where
        F: Fn(&UserStats) + Send + 'static,
    {
        let token = CancellationToken::new();
        let task_token = token.clone();

        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = task_token.cancelled() => break,
                    _ = interval.tick() => {
                        stats.tick(1, 0);
                        on_tick(&stats.snapshot());
                    }
                }
            }
            debug!("stats ticker stopped");
        });

        debug!("stats ticker started");
        Self {
            token,
            handle: Some(handle),
        }
    }

    /// Cancel the ticker. Idempotent.
    pub fn stop(&mut self) {
        self.token.cancel();
    }

    pub fn is_running(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Cancel and wait for the task to exit.
    pub async fn shutdown(mut self) {
        self.token.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for StatsTicker {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[tokio::test(start_paused = true)]
    async fn test_ticks_once_per_second() {
        let stats = SharedStats::default();
        let ticker = StatsTicker::start(stats.clone());

        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(stats.snapshot().today_duration, 3);
        assert_eq!(stats.snapshot().today_count, 0);

        ticker.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_ticks_after_stop() {
        let stats = SharedStats::default();
        let mut ticker = StatsTicker::start(stats.clone());

        tokio::time::sleep(Duration::from_millis(2500)).await;
        ticker.stop();
        assert!(!ticker.is_running());

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(stats.snapshot().today_duration, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_ticker() {
        let stats = SharedStats::default();
        {
            let _ticker = StatsTicker::start(stats.clone());
            tokio::time::sleep(Duration::from_millis(1500)).await;
        }

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(stats.snapshot().today_duration, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_callback_sees_each_tick() {
        let stats = SharedStats::default();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let ticker = StatsTicker::start_with(stats.clone(), move |s| {
            sink.lock().unwrap().push(s.today_duration);
        });

        tokio::time::sleep(Duration::from_millis(3500)).await;
        ticker.shutdown().await;
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_before_first_tick() {
        let stats = SharedStats::default();
        let ticker = StatsTicker::start(stats.clone());
        ticker.shutdown().await;

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(stats.snapshot().today_duration, 0);
    }
}

use std::ops::ControlFlow;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

/// Calls `tick` every `period` until the tick breaks, the timer is cancelled or dropped.
///
/// The first call happens one full period after [`IntervalTimer::start`].
#[derive(Debug)]
pub struct IntervalTimer {
    period: Duration,
    handle: Option<JoinHandle<()>>,
}

impl IntervalTimer {
    pub fn start(period: Duration, mut tick: impl FnMut() -> ControlFlow<()> + Send + 'static) -> Self {
        // tokio panics on a zero period.
        let period = period.max(Duration::from_millis(1));
        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tick().is_break() {
                    break;
                }
            }
        });
        Self {
            period,
            handle: Some(handle),
        }
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }
}

impl Drop for IntervalTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

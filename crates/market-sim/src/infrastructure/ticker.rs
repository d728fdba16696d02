use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

/// Flag shared between a ticker and the work it schedules
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Recurring timer
///
/// Every period the timer hands `on_fire` to a blocking worker and goes back
/// to sleep without waiting for it, so a slow callback can overlap the next
/// fire. Callers that need single-flight execution must guard inside the
/// callback. The first fire happens one full period after `start`.
pub struct Ticker {
    stop: StopSignal,
    task: JoinHandle<()>,
}

impl Ticker {
    pub fn start<F>(runtime: &Handle, period: Duration, on_fire: F) -> Self
    where
        F: Fn(&StopSignal) + Send + Sync + 'static,
    {
        let stop = StopSignal::default();
        let on_fire = Arc::new(on_fire);

        let task = runtime.spawn({
            let stop = stop.clone();
            async move {
                let mut interval = interval_at(Instant::now() + period, period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

                loop {
                    interval.tick().await;
                    if stop.is_stopped() {
                        break;
                    }

                    let on_fire = Arc::clone(&on_fire);
                    let stop = stop.clone();
                    tokio::task::spawn_blocking(move || on_fire(&stop));
                }
            }
        });

        Ticker { stop, task }
    }

    /// Stop scheduling new fires
    ///
    /// Fires already handed to a worker observe the signal and must skip
    /// their work.
    pub fn stop(&self) {
        self.stop.stop();
        self.task.abort();
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.is_stopped()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_ticker_fires_repeatedly() {
        let fires = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fires);

        let ticker = Ticker::start(&Handle::current(), Duration::from_millis(10), move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(120)).await;
        ticker.stop();

        assert!(fires.load(Ordering::SeqCst) >= 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_no_fire_before_first_period() {
        let fires = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fires);

        let ticker = Ticker::start(&Handle::current(), Duration::from_secs(3600), move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(fires.load(Ordering::SeqCst), 0);
        drop(ticker);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_stop_halts_fires() {
        let fires = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fires);

        let ticker = Ticker::start(&Handle::current(), Duration::from_millis(5), move |stop| {
            if !stop.is_stopped() {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_millis(40)).await;
        ticker.stop();
        assert!(ticker.is_stopped());
        tokio::time::sleep(Duration::from_millis(20)).await;
        let after_stop = fires.load(Ordering::SeqCst);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(fires.load(Ordering::SeqCst), after_stop);
    }
}

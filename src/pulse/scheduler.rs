//! Background heartbeat broadcaster

use super::rate::{interval_for, RateCell};
use crate::egress::{CueMessage, CueSink};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Broadcast address for each heartbeat
pub const DEFAULT_PULSE_ADDRESS: &str = "/cue/p/start";

/// Interval used until the first rate sample arrives
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(1000);

/// How often the scheduler wakes to check for samples and due pulses
pub const DEFAULT_QUANTUM: Duration = Duration::from_millis(50);

/// Scheduler settings
#[derive(Debug, Clone, PartialEq)]
pub struct PulseSettings {
    pub address: String,
    pub default_interval: Duration,
    pub quantum: Duration,
}

impl Default for PulseSettings {
    fn default() -> Self {
        Self {
            address: DEFAULT_PULSE_ADDRESS.to_string(),
            default_interval: DEFAULT_INTERVAL,
            quantum: DEFAULT_QUANTUM,
        }
    }
}

/// Pulse interval and the time of the last emitted pulse.
///
/// Owned by the scheduler task alone; rate updates reach it only through
/// [`RateCell`].
#[derive(Debug, Clone)]
pub struct PulseClock {
    interval: Duration,
    last: Instant,
}

impl PulseClock {
    /// Start a clock at `now` with the given interval
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            last: now,
        }
    }

    /// Current pulse interval
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Adopt a new heart rate. Zero is not a rate and leaves the interval
    /// unchanged; returns whether the interval was recomputed.
    pub fn apply_rate(&mut self, bpm: u32) -> bool {
        if bpm == 0 {
            return false;
        }
        self.interval = interval_for(bpm);
        true
    }

    /// Whether a pulse is due at `now`. A due pulse restarts the interval.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last) > self.interval {
            self.last = now;
            true
        } else {
            false
        }
    }
}

/// Long-lived task that broadcasts a heartbeat at the most recent rate
pub struct PulseScheduler {
    settings: PulseSettings,
    rate: Arc<RateCell>,
    sink: Arc<dyn CueSink>,
    running: Arc<AtomicBool>,
    task: Option<JoinHandle<()>>,
}

impl PulseScheduler {
    /// Create a scheduler reading samples from `rate` and emitting to `sink`
    pub fn new(settings: PulseSettings, rate: Arc<RateCell>, sink: Arc<dyn CueSink>) -> Self {
        Self {
            settings,
            rate,
            sink,
            running: Arc::new(AtomicBool::new(false)),
            task: None,
        }
    }

    /// Spawn the scheduler on the current tokio runtime
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }

        self.running.store(true, Ordering::SeqCst);

        let settings = self.settings.clone();
        let rate = Arc::clone(&self.rate);
        let sink = Arc::clone(&self.sink);
        let running = Arc::clone(&self.running);

        self.task = Some(tokio::spawn(run(settings, rate, sink, running)));
    }

    /// Stop the scheduler
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Drop for PulseScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run(
    settings: PulseSettings,
    rate: Arc<RateCell>,
    sink: Arc<dyn CueSink>,
    running: Arc<AtomicBool>,
) {
    info!(
        address = %settings.address,
        interval_ms = settings.default_interval.as_millis() as u64,
        "pulse scheduler started"
    );

    let message = CueMessage::new(settings.address);
    let mut clock = PulseClock::new(settings.default_interval, Instant::now());
    let mut ticker = time::interval(settings.quantum);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    while running.load(Ordering::SeqCst) {
        ticker.tick().await;

        if let Some(bpm) = rate.take() {
            if clock.apply_rate(bpm) {
                debug!(
                    bpm,
                    interval_ms = clock.interval().as_millis() as u64,
                    "pulse interval updated"
                );
            }
        }

        if clock.poll(Instant::now()) {
            match sink.send(&message) {
                Ok(()) => debug!(address = %message.address, "pulse"),
                Err(e) => warn!(error = %e, "unable to deliver pulse"),
            }
        }
    }
}

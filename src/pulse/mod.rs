//! Heart rate driven pulse scheduler
//!
//! Rate samples arrive from request handlers through a [`RateCell`]; the
//! [`PulseScheduler`] picks up the latest one on its own timeline and
//! broadcasts a heartbeat cue at the matching interval.

mod rate;
mod scheduler;

pub use rate::{interval_for, RateCell};
pub use scheduler::{
    PulseClock, PulseScheduler, PulseSettings, DEFAULT_INTERVAL, DEFAULT_PULSE_ADDRESS,
    DEFAULT_QUANTUM,
};

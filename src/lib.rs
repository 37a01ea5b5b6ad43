//! cuebridge - live sensor readings to show-control cues
//!
//! Heart rate drives a pulse cue; galvanic, respiration and other readings
//! are mapped onto banks of numbered cues and fired over OSC. Prop control
//! signals are relayed to a remote controller.

pub mod bridge;
pub mod config;
pub mod egress;
pub mod error;
pub mod ingress;
pub mod mapping;
pub mod pulse;

pub use bridge::{Bridge, BridgeContext};
pub use config::BridgeConfig;

//! Outbound side of the bridge
//!
//! Cue messages go to the cueing software over OSC; control signals go to
//! the prop controller over HTTP.

mod message;
mod osc;
mod prop;

pub use message::{CueArg, CueMessage, CueSink};
pub use osc::{encode, OscEgress};
pub use prop::{PropController, Signal};

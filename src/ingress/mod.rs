//! Inbound side of the bridge
//!
//! Readings and heart rate arrive as HTTP GET requests; prop control signals
//! arrive either over HTTP or as OSC messages.

pub mod http;
mod osc;
mod params;

pub use http::router;
pub use osc::{signals_in, OscListener};
pub use params::{parse_number, required};

use crate::egress::{PropController, Signal};
use std::sync::Arc;
use tracing::warn;

/// Forward a signal to the prop on its own task. Failures are logged and
/// never reach whoever sent the signal.
pub fn forward_signal(prop: &Arc<PropController>, signal: Signal) {
    let prop = Arc::clone(prop);
    tokio::spawn(async move {
        if let Err(e) = prop.forward(signal).await {
            warn!(%signal, error = %e, "unable to contact theatrical polygraph");
        }
    });
}

//! Remote prop controller
//!
//! The prop (a theatrical polygraph) exposes one HTTP endpoint per control
//! signal. Calls are best effort: the caller logs failures and moves on.

use crate::error::EgressError;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Control signals understood by the prop controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Calibrate,
    Interrogate,
    Reset,
}

impl Signal {
    /// Every signal, in route order
    pub const ALL: [Signal; 3] = [Signal::Calibrate, Signal::Interrogate, Signal::Reset];

    /// Signal name as used in paths and OSC addresses
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Calibrate => "calibrate",
            Signal::Interrogate => "interrogate",
            Signal::Reset => "reset",
        }
    }

    /// Path form, e.g. `/calibrate`
    pub fn path(&self) -> String {
        format!("/{}", self.as_str())
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Signal {
    type Err = String;

    /// Accepts `calibrate` or `/calibrate`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_start_matches('/') {
            "calibrate" => Ok(Signal::Calibrate),
            "interrogate" => Ok(Signal::Interrogate),
            "reset" => Ok(Signal::Reset),
            other => Err(format!("unknown prop signal '{}'", other)),
        }
    }
}

/// HTTP client for the prop controller
#[derive(Debug, Clone)]
pub struct PropController {
    client: reqwest::Client,
    base_url: String,
}

impl PropController {
    /// Create a controller client for `base_url` (e.g. `http://10.0.1.3/arduino`)
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, EgressError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// URL a signal is forwarded to
    pub fn url_for(&self, signal: Signal) -> String {
        format!("{}/{}", self.base_url, urlencoding::encode(signal.as_str()))
    }

    /// Forward a signal to the prop
    pub async fn forward(&self, signal: Signal) -> Result<(), EgressError> {
        let url = self.url_for(signal);
        info!(%signal, %url, "polygraph instruction");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(EgressError::Status(response.status()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_parse() {
        assert_eq!("calibrate".parse::<Signal>(), Ok(Signal::Calibrate));
        assert_eq!("/interrogate".parse::<Signal>(), Ok(Signal::Interrogate));
        assert_eq!("/reset".parse::<Signal>(), Ok(Signal::Reset));
        assert!("/detonate".parse::<Signal>().is_err());
    }

    #[test]
    fn test_signal_path() {
        for signal in Signal::ALL {
            assert_eq!(signal.path().parse::<Signal>(), Ok(signal));
        }
    }

    #[test]
    fn test_url_for() {
        let prop = PropController::new("http://10.0.1.3/arduino/", Duration::from_secs(1)).unwrap();
        assert_eq!(prop.url_for(Signal::Calibrate), "http://10.0.1.3/arduino/calibrate");
    }

    #[tokio::test]
    async fn test_forward_unreachable_is_error() {
        // Port 9 on loopback has nothing listening
        let prop =
            PropController::new("http://127.0.0.1:9/arduino", Duration::from_millis(500)).unwrap();
        assert!(prop.forward(Signal::Reset).await.is_err());
    }
}

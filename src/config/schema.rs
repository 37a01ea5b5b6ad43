//! Configuration schema definitions

use crate::egress::Signal;
use crate::mapping::{
    DEFAULT_FALLBACK_MAX, DEFAULT_LOWER_MARGIN, DEFAULT_THRESHOLD, DEFAULT_UPPER_MARGIN,
};
use crate::pulse::{PulseSettings, DEFAULT_PULSE_ADDRESS};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::net::SocketAddr;
use std::time::Duration;

/// Routes the bridge serves itself; channels may not claim them
pub const RATE_ROUTE: &str = "/h";
pub const CALIBRATION_POINT_ROUTE: &str = "/d";
pub const HEALTH_ROUTE: &str = "/health";

/// Main configuration for the bridge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Request ingress
    #[serde(default)]
    pub http: HttpConfig,

    /// OSC ingress and egress endpoints
    #[serde(default)]
    pub osc: OscConfig,

    /// Heartbeat broadcast
    #[serde(default)]
    pub pulse: PulseConfig,

    /// Remote prop controller
    #[serde(default)]
    pub prop: PropConfig,

    /// Reading channels
    #[serde(default = "default_channels")]
    pub channels: Vec<ChannelConfig>,
}

impl BridgeConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.http.bind_addr()?;
        self.osc.listen_addr()?;
        self.osc.target_addr()?;

        if !self.pulse.address.starts_with('/') {
            bail!("Pulse address '{}' must start with '/'", self.pulse.address);
        }
        if self.pulse.default_interval_ms == 0 {
            bail!("Pulse default interval must be greater than zero");
        }
        if self.pulse.quantum_ms == 0 {
            bail!("Pulse quantum must be greater than zero");
        }

        if self.prop.base_url.trim().is_empty() {
            bail!("Prop controller base URL must not be empty");
        }
        if self.prop.timeout_ms == 0 {
            bail!("Prop controller timeout must be greater than zero");
        }

        let mut reserved: HashSet<String> = [RATE_ROUTE, CALIBRATION_POINT_ROUTE, HEALTH_ROUTE]
            .iter()
            .map(|r| r.to_string())
            .collect();
        reserved.extend(Signal::ALL.iter().map(Signal::path));

        let mut routes = HashSet::new();
        for channel in &self.channels {
            channel.validate()?;
            if reserved.contains(&channel.route) {
                bail!("Channel '{}' uses reserved route '{}'", channel.name, channel.route);
            }
            if !routes.insert(channel.route.as_str()) {
                bail!("Route '{}' is used by more than one channel", channel.route);
            }
        }

        Ok(())
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            osc: OscConfig::default(),
            pulse: PulseConfig::default(),
            prop: PropConfig::default(),
            channels: default_channels(),
        }
    }
}

/// HTTP request ingress
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Listen address (default: 0.0.0.0:8080)
    #[serde(default = "default_http_bind")]
    pub bind: String,
}

impl HttpConfig {
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        parse_addr("http.bind", &self.bind)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { bind: default_http_bind() }
    }
}

fn default_http_bind() -> String { "0.0.0.0:8080".to_string() }

/// OSC endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OscConfig {
    /// Where prop control signals are received (default: 127.0.0.1:8765)
    #[serde(default = "default_osc_listen")]
    pub listen: String,

    /// Cueing software endpoint (default: 127.0.0.1:53000)
    #[serde(default = "default_osc_target")]
    pub target: String,
}

impl OscConfig {
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        parse_addr("osc.listen", &self.listen)
    }

    pub fn target_addr(&self) -> Result<SocketAddr> {
        parse_addr("osc.target", &self.target)
    }
}

impl Default for OscConfig {
    fn default() -> Self {
        Self {
            listen: default_osc_listen(),
            target: default_osc_target(),
        }
    }
}

fn default_osc_listen() -> String { "127.0.0.1:8765".to_string() }
fn default_osc_target() -> String { "127.0.0.1:53000".to_string() }

fn parse_addr(field: &str, value: &str) -> Result<SocketAddr> {
    value
        .parse()
        .with_context(|| format!("{} '{}' is not a socket address", field, value))
}

/// Heartbeat broadcast settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PulseConfig {
    /// Cue address broadcast on every beat (default: /cue/p/start)
    #[serde(default = "default_pulse_address")]
    pub address: String,

    /// Interval before any heart rate arrives (default: 1000)
    #[serde(default = "default_interval_ms")]
    pub default_interval_ms: u64,

    /// Scheduler wake-up period (default: 50)
    #[serde(default = "default_quantum_ms")]
    pub quantum_ms: u64,
}

impl PulseConfig {
    /// Scheduler settings for this configuration
    pub fn settings(&self) -> PulseSettings {
        PulseSettings {
            address: self.address.clone(),
            default_interval: Duration::from_millis(self.default_interval_ms),
            quantum: Duration::from_millis(self.quantum_ms),
        }
    }
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            address: default_pulse_address(),
            default_interval_ms: default_interval_ms(),
            quantum_ms: default_quantum_ms(),
        }
    }
}

fn default_pulse_address() -> String { DEFAULT_PULSE_ADDRESS.to_string() }
fn default_interval_ms() -> u64 { 1000 }
fn default_quantum_ms() -> u64 { 50 }

/// Remote prop controller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropConfig {
    /// Base URL; signals are sent to `<base_url>/<signal>`
    #[serde(default = "default_prop_url")]
    pub base_url: String,

    /// Request timeout (default: 2000)
    #[serde(default = "default_prop_timeout_ms")]
    pub timeout_ms: u64,
}

impl PropConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for PropConfig {
    fn default() -> Self {
        Self {
            base_url: default_prop_url(),
            timeout_ms: default_prop_timeout_ms(),
        }
    }
}

fn default_prop_url() -> String { "http://192.168.86.143/arduino".to_string() }
fn default_prop_timeout_ms() -> u64 { 2000 }

/// Reading channel configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Unique name for this channel
    pub name: String,

    /// HTTP route readings arrive on, e.g. `/g`
    pub route: String,

    /// Cue address prefix, e.g. `/cue/g` gives `/cue/g7/start`
    pub prefix: String,

    /// First cue number in the bank
    #[serde(default = "default_dest_min")]
    pub dest_min: i32,

    /// Last cue number in the bank
    pub dest_max: i32,

    /// Source range policy
    pub range: RangeConfig,
}

fn default_dest_min() -> i32 { 1 }

impl ChannelConfig {
    /// Validate a single channel
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            bail!("Channel name must not be empty");
        }
        if !self.route.starts_with('/') || self.route.len() < 2 {
            bail!("Channel '{}' route '{}' must start with '/'", self.name, self.route);
        }
        if self.route.contains([':', '*', '{', '}']) {
            bail!(
                "Channel '{}' route '{}' must be a plain path without captures or wildcards",
                self.name, self.route
            );
        }
        if !self.prefix.starts_with('/') {
            bail!("Channel '{}' prefix '{}' must start with '/'", self.name, self.prefix);
        }
        if self.dest_min > self.dest_max {
            bail!(
                "Channel '{}' cue bank {}..{} is empty",
                self.name, self.dest_min, self.dest_max
            );
        }
        self.range
            .validate()
            .with_context(|| format!("Channel '{}' has an invalid range", self.name))
    }
}

/// Source range policy for a channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RangeConfig {
    /// Same source range for every reading
    Fixed { min: f64, max: f64 },
    /// Window around a baseline sent with each reading
    Adaptive {
        #[serde(default = "default_fallback_max")]
        default_max: f64,
        #[serde(default = "default_threshold")]
        threshold: f64,
        #[serde(default = "default_lower_margin")]
        lower_margin: f64,
        #[serde(default = "default_upper_margin")]
        upper_margin: f64,
    },
}

fn default_fallback_max() -> f64 { DEFAULT_FALLBACK_MAX }
fn default_threshold() -> f64 { DEFAULT_THRESHOLD }
fn default_lower_margin() -> f64 { DEFAULT_LOWER_MARGIN }
fn default_upper_margin() -> f64 { DEFAULT_UPPER_MARGIN }

impl RangeConfig {
    /// Every range this policy can produce must have `min < max`
    pub fn validate(&self) -> Result<()> {
        match *self {
            RangeConfig::Fixed { min, max } => {
                if !min.is_finite() || !max.is_finite() {
                    bail!("Fixed range bounds must be finite");
                }
                if min >= max {
                    bail!("Fixed range min {} must be below max {}", min, max);
                }
            }
            RangeConfig::Adaptive {
                default_max,
                threshold,
                lower_margin,
                upper_margin,
            } => {
                if !default_max.is_finite() || default_max <= 0.0 {
                    bail!("Adaptive default_max must be greater than zero");
                }
                if !threshold.is_finite() || threshold <= 0.0 {
                    bail!("Adaptive threshold must be greater than zero");
                }
                if !(0.0..1.0).contains(&lower_margin) {
                    bail!("Adaptive lower_margin must be between 0.0 and 1.0");
                }
                if !upper_margin.is_finite() || upper_margin <= 0.0 {
                    bail!("Adaptive upper_margin must be greater than zero");
                }
            }
        }
        Ok(())
    }
}

/// Channels of the show: galvanic skin response (adaptive), respiration and
/// the lie meter (fixed)
pub fn default_channels() -> Vec<ChannelConfig> {
    vec![
        ChannelConfig {
            name: "galvanic".to_string(),
            route: "/g".to_string(),
            prefix: "/cue/g".to_string(),
            dest_min: 1,
            dest_max: 20,
            range: RangeConfig::Adaptive {
                default_max: DEFAULT_FALLBACK_MAX,
                threshold: DEFAULT_THRESHOLD,
                lower_margin: DEFAULT_LOWER_MARGIN,
                upper_margin: DEFAULT_UPPER_MARGIN,
            },
        },
        ChannelConfig {
            name: "respiration".to_string(),
            route: "/r".to_string(),
            prefix: "/cue/r".to_string(),
            dest_min: 1,
            dest_max: 20,
            range: RangeConfig::Fixed { min: 0.0, max: 60.0 },
        },
        ChannelConfig {
            name: "lie".to_string(),
            route: "/l".to_string(),
            prefix: "/cue/l".to_string(),
            dest_min: 1,
            dest_max: 100,
            range: RangeConfig::Fixed { min: 0.0, max: 100.0 },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = BridgeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.channels.len(), 3);
    }

    #[test]
    fn test_empty_yaml_gets_show_defaults() {
        let config: BridgeConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.http.bind, "0.0.0.0:8080");
        assert_eq!(config.osc.target, "127.0.0.1:53000");
        assert_eq!(config.pulse.address, "/cue/p/start");
        assert_eq!(config.channels.len(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_channel_config() {
        let yaml = r#"
name: pupil
route: /p2
prefix: /cue/x
dest_max: 12
range:
  kind: adaptive
  default_max: 700
"#;
        let config: ChannelConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.dest_min, 1);
        assert_eq!(
            config.range,
            RangeConfig::Adaptive {
                default_max: 700.0,
                threshold: 0.1,
                lower_margin: 0.05,
                upper_margin: 0.2,
            }
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_fixed_range_must_be_ordered() {
        assert!(RangeConfig::Fixed { min: 10.0, max: 10.0 }.validate().is_err());
        assert!(RangeConfig::Fixed { min: 10.0, max: 0.0 }.validate().is_err());
        assert!(RangeConfig::Fixed { min: 0.0, max: f64::NAN }.validate().is_err());
    }

    #[test]
    fn test_adaptive_range_limits() {
        let adaptive = |default_max, threshold, lower_margin, upper_margin| RangeConfig::Adaptive {
            default_max,
            threshold,
            lower_margin,
            upper_margin,
        };
        assert!(adaptive(1024.0, 0.1, 0.05, 0.2).validate().is_ok());
        assert!(adaptive(0.0, 0.1, 0.05, 0.2).validate().is_err());
        assert!(adaptive(1024.0, -1.0, 0.05, 0.2).validate().is_err());
        assert!(adaptive(1024.0, 0.0, 0.05, 0.2).validate().is_err());
        assert!(adaptive(1024.0, 0.1, 1.0, 0.2).validate().is_err());
        assert!(adaptive(1024.0, 0.1, 0.05, 0.0).validate().is_err());
    }

    #[test]
    fn test_empty_cue_bank_rejected() {
        let mut channel = default_channels().remove(1);
        channel.dest_min = 21;
        assert!(channel.validate().is_err());
    }

    #[test]
    fn test_duplicate_route_rejected() {
        let mut config = BridgeConfig::default();
        config.channels[2].route = "/g".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_reserved_route_rejected() {
        for route in ["/h", "/d", "/calibrate", "/health"] {
            let mut config = BridgeConfig::default();
            config.channels[0].route = route.to_string();
            assert!(config.validate().is_err(), "{} accepted", route);
        }
    }

    #[test]
    fn test_pattern_routes_rejected() {
        for route in ["/a/:x", "/a/*rest", "/a/{x}", "/g:"] {
            let mut config = BridgeConfig::default();
            config.channels[0].route = route.to_string();
            assert!(config.validate().is_err(), "{} accepted", route);
        }

        let mut config = BridgeConfig::default();
        config.channels[0].route = "/a/:x".to_string();
        config.channels[1].route = "/a/:y".to_string();
        assert!(config.validate().is_err());

        let mut config = BridgeConfig::default();
        config.channels[0].route = "/sensors/gsr".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bad_socket_address_rejected() {
        let mut config = BridgeConfig::default();
        config.osc.target = "localhost".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_pulse_settings() {
        let settings = PulseConfig::default().settings();
        assert_eq!(settings, PulseSettings::default());
    }
}

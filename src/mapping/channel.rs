//! Reading channels: a range policy bound to a cue bank and an address prefix

use super::adaptive::AdaptiveWindow;
use super::range::{map_range, CueBank, SourceRange};
use crate::config::{ChannelConfig, RangeConfig};
use crate::egress::CueMessage;

/// How a channel normalizes its readings
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RangePolicy {
    /// Same source range for every reading
    Fixed(SourceRange),
    /// Source range derived from a baseline sent with each reading
    Adaptive(AdaptiveWindow),
}

impl RangePolicy {
    /// Effective source range for one reading
    pub fn source_range(&self, baseline: Option<f64>) -> SourceRange {
        match self {
            RangePolicy::Fixed(range) => *range,
            RangePolicy::Adaptive(window) => match baseline {
                Some(b) => window.source_range(b),
                None => window.fallback(),
            },
        }
    }

    /// Whether readings must carry a baseline
    pub fn needs_baseline(&self) -> bool {
        matches!(self, RangePolicy::Adaptive(_))
    }
}

impl From<&RangeConfig> for RangePolicy {
    fn from(config: &RangeConfig) -> Self {
        match *config {
            RangeConfig::Fixed { min, max } => RangePolicy::Fixed(SourceRange::new(min, max)),
            RangeConfig::Adaptive {
                default_max,
                threshold,
                lower_margin,
                upper_margin,
            } => RangePolicy::Adaptive(
                AdaptiveWindow::new(default_max)
                    .with_threshold(threshold)
                    .with_margins(lower_margin, upper_margin),
            ),
        }
    }
}

/// One sensor channel feeding a bank of cues
#[derive(Debug, Clone)]
pub struct CueChannel {
    name: String,
    route: String,
    prefix: String,
    bank: CueBank,
    policy: RangePolicy,
}

impl CueChannel {
    /// Create a new channel
    pub fn new(
        name: impl Into<String>,
        route: impl Into<String>,
        prefix: impl Into<String>,
        bank: CueBank,
        policy: RangePolicy,
    ) -> Self {
        Self {
            name: name.into(),
            route: route.into(),
            prefix: prefix.into(),
            bank,
            policy,
        }
    }

    /// Build a channel from validated configuration
    pub fn from_config(config: &ChannelConfig) -> Self {
        Self::new(
            &config.name,
            &config.route,
            &config.prefix,
            CueBank::new(config.dest_min, config.dest_max),
            RangePolicy::from(&config.range),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// HTTP route readings arrive on
    pub fn route(&self) -> &str {
        &self.route
    }

    /// Cue address prefix, e.g. `/cue/g`
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn policy(&self) -> &RangePolicy {
        &self.policy
    }

    /// Cue number for a reading
    pub fn cue(&self, value: f64, baseline: Option<f64>) -> i32 {
        map_range(value, self.policy.source_range(baseline), self.bank)
    }

    /// Cue address for a cue number, e.g. `/cue/g7/start`
    pub fn address(&self, cue: i32) -> String {
        format!("{}{}/start", self.prefix, cue)
    }

    /// Message that fires the cue selected by a reading
    pub fn trigger(&self, value: f64, baseline: Option<f64>) -> CueMessage {
        CueMessage::new(self.address(self.cue(value, baseline)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn galvanic() -> CueChannel {
        CueChannel::new(
            "galvanic",
            "/g",
            "/cue/g",
            CueBank::new(1, 20),
            RangePolicy::Adaptive(AdaptiveWindow::default()),
        )
    }

    fn respiration() -> CueChannel {
        CueChannel::new(
            "respiration",
            "/r",
            "/cue/r",
            CueBank::new(1, 20),
            RangePolicy::Fixed(SourceRange::new(0.0, 60.0)),
        )
    }

    #[test]
    fn test_adaptive_channel_trigger() {
        let msg = galvanic().trigger(60.0, Some(100.0));
        assert_eq!(msg.address, "/cue/g1/start");
        assert!(msg.args.is_empty());
    }

    #[test]
    fn test_adaptive_channel_without_baseline_uses_fallback() {
        let channel = galvanic();
        assert_eq!(channel.cue(1024.0, None), 20);
        assert_eq!(channel.cue(512.0, None), channel.cue(512.0, Some(0.0)));
    }

    #[test]
    fn test_fixed_channel_ignores_baseline() {
        let channel = respiration();
        assert_eq!(channel.cue(30.0, None), channel.cue(30.0, Some(100.0)));
        assert_eq!(channel.trigger(60.0, None).address, "/cue/r20/start");
        assert_eq!(channel.trigger(30.0, None).address, "/cue/r10/start");
    }

    #[test]
    fn test_needs_baseline() {
        assert!(galvanic().policy().needs_baseline());
        assert!(!respiration().policy().needs_baseline());
    }

    #[test]
    fn test_policy_from_config() {
        let fixed = RangePolicy::from(&RangeConfig::Fixed { min: 0.0, max: 100.0 });
        assert_eq!(fixed, RangePolicy::Fixed(SourceRange::new(0.0, 100.0)));

        let adaptive = RangePolicy::from(&RangeConfig::Adaptive {
            default_max: 700.0,
            threshold: 0.1,
            lower_margin: 0.05,
            upper_margin: 0.2,
        });
        assert_eq!(adaptive, RangePolicy::Adaptive(AdaptiveWindow::new(700.0)));
    }
}

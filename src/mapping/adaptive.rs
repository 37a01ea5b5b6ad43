//! Baseline-relative source window
//!
//! Some sensors drift between performers and between shows. Rather than a
//! fixed range, the window is recomputed on every reading from a baseline
//! measured alongside it.

use super::range::{map_to_cue, SourceRange};

/// Baseline below which the window falls back to the fixed default range
pub const DEFAULT_THRESHOLD: f64 = 0.1;

/// Fraction of the baseline the window extends below it
pub const DEFAULT_LOWER_MARGIN: f64 = 0.05;

/// Fraction of the baseline the window extends above it
pub const DEFAULT_UPPER_MARGIN: f64 = 0.2;

/// Upper bound of the fallback range `[0, default_max]`
pub const DEFAULT_FALLBACK_MAX: f64 = 1024.0;

/// Window around a live baseline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveWindow {
    /// Fallback range upper bound when no usable baseline is present
    pub default_max: f64,
    /// Baselines at or below this are treated as noise
    pub threshold: f64,
    pub lower_margin: f64,
    pub upper_margin: f64,
}

impl AdaptiveWindow {
    /// Create a window with the standard margins and the given fallback
    pub fn new(default_max: f64) -> Self {
        Self {
            default_max,
            ..Self::default()
        }
    }

    /// Set the proportional margins below and above the baseline
    pub fn with_margins(mut self, lower: f64, upper: f64) -> Self {
        self.lower_margin = lower;
        self.upper_margin = upper;
        self
    }

    /// Set the noise threshold
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Effective source range for a baseline. A window that collapses or
    /// overflows is replaced by the fallback, so the result always has
    /// `min < max`.
    pub fn source_range(&self, baseline: f64) -> SourceRange {
        if baseline > self.threshold {
            let window = SourceRange::new(
                (baseline - baseline * self.lower_margin).max(0.0),
                baseline + baseline * self.upper_margin,
            );
            if window.is_valid() {
                return window;
            }
        }
        self.fallback()
    }

    /// Range used when no usable baseline is available
    pub fn fallback(&self) -> SourceRange {
        SourceRange::new(0.0, self.default_max)
    }
}

impl Default for AdaptiveWindow {
    fn default() -> Self {
        Self {
            default_max: DEFAULT_FALLBACK_MAX,
            threshold: DEFAULT_THRESHOLD,
            lower_margin: DEFAULT_LOWER_MARGIN,
            upper_margin: DEFAULT_UPPER_MARGIN,
        }
    }
}

/// Map a reading through a window derived from `baseline`, using the
/// standard threshold and margins.
pub fn map_adaptive(
    value: f64,
    baseline: f64,
    default_max: f64,
    dest_min: i32,
    dest_max: i32,
) -> i32 {
    let range = AdaptiveWindow::new(default_max).source_range(baseline);
    map_to_cue(value, range.min, range.max, dest_min, dest_max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_around_baseline() {
        let range = AdaptiveWindow::default().source_range(100.0);
        assert_eq!(range, SourceRange::new(95.0, 120.0));
    }

    #[test]
    fn test_window_edges_hit_bank_edges() {
        assert_eq!(map_adaptive(95.0, 100.0, 1024.0, 1, 20), 1);
        assert_eq!(map_adaptive(120.0, 100.0, 1024.0, 1, 20), 20);
    }

    #[test]
    fn test_reading_below_window_clamps_to_first_cue() {
        assert_eq!(map_adaptive(60.0, 100.0, 1024.0, 1, 20), 1);
    }

    #[test]
    fn test_zero_baseline_falls_back_to_fixed_range() {
        let mut value = -50.0;
        while value < 1100.0 {
            assert_eq!(
                map_adaptive(value, 0.0, 1024.0, 1, 20),
                map_to_cue(value, 0.0, 1024.0, 1, 20),
            );
            value += 7.5;
        }
    }

    #[test]
    fn test_noise_baseline_falls_back() {
        let window = AdaptiveWindow::default();
        assert_eq!(window.source_range(0.1), window.fallback());
        assert_eq!(window.source_range(0.05), window.fallback());
        assert_eq!(window.source_range(-4.0), window.fallback());
        assert_ne!(window.source_range(0.11), window.fallback());
    }

    #[test]
    fn test_custom_margins() {
        let window = AdaptiveWindow::new(700.0).with_margins(0.1, 0.5);
        assert_eq!(window.source_range(200.0), SourceRange::new(180.0, 300.0));
        assert_eq!(window.fallback(), SourceRange::new(0.0, 700.0));
    }

    #[test]
    fn test_window_never_goes_negative() {
        let window = AdaptiveWindow::default().with_margins(1.5, 0.2);
        let range = window.source_range(10.0);
        assert_eq!(range.min, 0.0);
        assert!(range.is_valid());
    }

    #[test]
    fn test_collapsed_window_falls_back() {
        let window = AdaptiveWindow::default().with_margins(0.0, 1e-17);
        assert_eq!(window.source_range(1.0), window.fallback());

        let window = AdaptiveWindow::default().with_threshold(0.0);
        assert_eq!(window.source_range(5e-324), window.fallback());
    }

    #[test]
    fn test_overflowing_window_falls_back() {
        let window = AdaptiveWindow::default();
        let range = window.source_range(1.7e308);
        assert_eq!(range, window.fallback());
        assert_eq!(map_adaptive(1.79e308, 1.7e308, 1024.0, 1, 20), 20);
    }

    #[test]
    fn test_window_always_valid() {
        let window = AdaptiveWindow::default();
        for baseline in [0.0, 0.11, 1.0, 100.0, 1e6, 1e300, f64::MAX, f64::INFINITY, f64::NAN] {
            assert!(window.source_range(baseline).is_valid(), "baseline {}", baseline);
        }
    }
}

//! Fixed-range mapping from a reading to a cue number

/// Source-domain bounds for a reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceRange {
    pub min: f64,
    pub max: f64,
}

impl SourceRange {
    /// Create a new source range
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// A usable range is finite with `min < max`
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min < self.max
    }
}

/// Inclusive bank of cue numbers a channel can fire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CueBank {
    pub first: i32,
    pub last: i32,
}

impl CueBank {
    /// Create a new cue bank
    pub fn new(first: i32, last: i32) -> Self {
        Self { first, last }
    }

    /// Check whether a cue number lies inside this bank
    pub fn contains(&self, cue: i32) -> bool {
        (self.first..=self.last).contains(&cue)
    }
}

/// Map a reading onto a cue number.
///
/// The reading is clamped into `[source_min, source_max]` before it is
/// normalized, so the result always lies in `[dest_min, dest_max]`. A `NaN`
/// reading lands on `dest_min`.
pub fn map_to_cue(
    value: f64,
    source_min: f64,
    source_max: f64,
    dest_min: i32,
    dest_max: i32,
) -> i32 {
    let clamped = value.max(source_min).min(source_max);
    let ratio = (clamped - source_min) / (source_max - source_min);

    let span = f64::from(dest_max) - f64::from(dest_min);
    let offset = (ratio * span).floor();

    // `as` saturates and sends NaN to zero
    let cue = dest_min.saturating_add(offset as i32);
    cue.min(dest_max).max(dest_min)
}

/// Map a reading through typed bounds
pub fn map_range(value: f64, source: SourceRange, bank: CueBank) -> i32 {
    map_to_cue(value, source.min, source.max, bank.first, bank.last)
}

//! Mapping from continuous sensor readings to discrete cue numbers
//!
//! Every reading is clamped into its channel's source range before being
//! scaled onto the cue bank, so a mapped cue is always one the show has.

mod adaptive;
mod channel;
mod range;

pub use adaptive::{
    map_adaptive, AdaptiveWindow, DEFAULT_FALLBACK_MAX, DEFAULT_LOWER_MARGIN, DEFAULT_THRESHOLD,
    DEFAULT_UPPER_MARGIN,
};
pub use channel::{CueChannel, RangePolicy};
pub use range::{map_range, map_to_cue, CueBank, SourceRange};

//! Structural location recognizers.
//!
//! Used when a scan's suffix is not a registered location: a suffix that has
//! the shape of a location code is still accepted as one. All patterns are
//! anchored at the end of the input only, so `"XR12-A-3"` is recognized
//! through its trailing `"R12-A-3"`.

use once_cell::sync::Lazy;
use regex::RegexSet;
use serde::{Deserialize, Serialize};

/// The four location code shapes, in recognition order.
///
/// `R` + 1–3 digits, an optional uppercase letter, `-`, an uppercase letter,
/// `-`, then either 1–3 digits or one uppercase letter.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationShape {
    /// `R12A-B-3`
    LetteredRackNumericSlot,
    /// `R12A-B-C`
    LetteredRackLetterSlot,
    /// `R12-B-3`
    RackNumericSlot,
    /// `R12-B-C`
    RackLetterSlot,
}

impl LocationShape {
    const ALL: [LocationShape; 4] = [
        LocationShape::LetteredRackNumericSlot,
        LocationShape::LetteredRackLetterSlot,
        LocationShape::RackNumericSlot,
        LocationShape::RackLetterSlot,
    ];
}

static LOCATION_PATTERNS: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new([
        r"R[0-9]{1,3}[A-Z]-[A-Z]-[0-9]{1,3}$",
        r"R[0-9]{1,3}[A-Z]-[A-Z]-[A-Z]$",
        r"R[0-9]{1,3}-[A-Z]-[0-9]{1,3}$",
        r"R[0-9]{1,3}-[A-Z]-[A-Z]$",
    ])
    .expect("location patterns are valid")
});

/// First shape (in [`LocationShape`] order) the end of `s` matches.
pub fn location_shape(s: &str) -> Option<LocationShape> {
    LOCATION_PATTERNS
        .matches(s)
        .iter()
        .next()
        .map(|idx| LocationShape::ALL[idx])
}

/// Does `s` end like a location code?
pub fn looks_like_location(s: &str) -> bool {
    LOCATION_PATTERNS.is_match(s)
}

//! Leak sources the player can fix
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::constants::{SHOWER_LEAK, TAP_LEAK, TOILET_LEAK};

/// Ordered collection of sources; the mission ships with three.
pub type SourceList = SmallVec<[LeakSource; 4]>;

/// Rendering hint in percent of the house panel. Not used by the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
}

/// A named leak point that can be independently fixed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeakSource {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub glyph: String,
    #[serde(default)]
    pub placement: Placement,
    /// Drain added per tick while the source is active
    pub leak_amount: f64,
    #[serde(default = "default_leaking")]
    pub is_leaking: bool,
    #[serde(default)]
    pub fixed: bool,
}

const fn default_leaking() -> bool {
    true
}

impl LeakSource {
    #[must_use]
    pub fn new(id: &str, name: &str, glyph: &str, placement: Placement, leak_amount: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            glyph: glyph.to_string(),
            placement,
            leak_amount,
            is_leaking: true,
            fixed: false,
        }
    }

    /// Whether this source adds to the drain this tick.
    #[must_use]
    pub const fn is_draining(&self) -> bool {
        self.is_leaking && !self.fixed
    }

    /// Counts toward the "all fixed" win requirement.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        !self.is_leaking || self.fixed
    }

    /// Contribution to the current drain rate.
    #[must_use]
    pub fn active_leak(&self) -> f64 {
        if self.is_draining() {
            self.leak_amount
        } else {
            0.0
        }
    }

    pub(crate) fn mark_fixed(&mut self) {
        self.fixed = true;
        self.is_leaking = false;
    }
}

/// Reference household used when no data file is available.
#[must_use]
pub fn default_sources() -> SourceList {
    smallvec::smallvec![
        LeakSource::new(
            "tap",
            "Kitchen Tap",
            "🚰",
            Placement { x: 20.0, y: 30.0 },
            TAP_LEAK,
        ),
        LeakSource::new(
            "shower",
            "Bathroom Shower",
            "🚿",
            Placement { x: 50.0, y: 25.0 },
            SHOWER_LEAK,
        ),
        LeakSource::new(
            "toilet",
            "Toilet Leak",
            "🚽",
            Placement { x: 80.0, y: 35.0 },
            TOILET_LEAK,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draining_requires_leaking_and_unfixed() {
        let mut source = LeakSource::new("tap", "Tap", "", Placement::default(), 5.0);
        assert!(source.is_draining());
        assert!(!source.is_resolved());
        assert!((source.active_leak() - 5.0).abs() < f64::EPSILON);

        source.mark_fixed();
        assert!(!source.is_draining());
        assert!(source.is_resolved());
        assert!(source.active_leak().abs() < f64::EPSILON);

        source.mark_fixed();
        assert!(source.fixed);
        assert!(!source.is_leaking);
    }

    #[test]
    fn non_leaking_source_counts_as_resolved() {
        let mut source = LeakSource::new("sink", "Sink", "", Placement::default(), 3.0);
        source.is_leaking = false;
        assert!(source.is_resolved());
        assert!(!source.is_draining());
    }

    #[test]
    fn deserializes_with_leaking_default() {
        let json = r#"{ "id": "tap", "name": "Kitchen Tap", "leak_amount": 5.0 }"#;
        let source: LeakSource = serde_json::from_str(json).unwrap();
        assert!(source.is_leaking);
        assert!(!source.fixed);
        assert_eq!(source.placement, Placement::default());
    }

    #[test]
    fn default_household_totals_nineteen() {
        let total: f64 = default_sources().iter().map(LeakSource::active_leak).sum();
        assert!((total - 19.0).abs() < f64::EPSILON);
    }
}

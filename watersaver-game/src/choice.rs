//! Smart water choices that reduce the drain while adopted
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

use crate::constants::{BUCKET_OFFSET, SHORT_SHOWER_OFFSET};
use crate::error::{MissionError, MissionResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChoiceId {
    /// Wash with a bucket instead of a running tap
    Bucket,
    /// Quick five-minute showers
    Shower,
}

impl ChoiceId {
    pub const ALL: [Self; 2] = [Self::Bucket, Self::Shower];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bucket => "bucket",
            Self::Shower => "shower",
        }
    }
}

impl fmt::Display for ChoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChoiceId {
    type Err = MissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bucket" => Ok(Self::Bucket),
            "shower" => Ok(Self::Shower),
            other => Err(MissionError::UnknownChoice(other.to_string())),
        }
    }
}

/// Static description of a choice, loaded from mission data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceSpec {
    pub id: ChoiceId,
    pub label: String,
    #[serde(default)]
    pub glyph: String,
    pub drain_offset: f64,
    #[serde(default)]
    pub adopted_hint: String,
    #[serde(default)]
    pub idle_hint: String,
    #[serde(default)]
    pub adopt_message: String,
    #[serde(default)]
    pub drop_message: String,
}

impl ChoiceSpec {
    /// Notification text for the state the choice just moved into.
    #[must_use]
    pub fn message_for(&self, adopted: bool) -> &str {
        if adopted {
            &self.adopt_message
        } else {
            &self.drop_message
        }
    }
}

#[must_use]
pub fn default_choices() -> Vec<ChoiceSpec> {
    vec![
        ChoiceSpec {
            id: ChoiceId::Bucket,
            label: "Use a Bucket".to_string(),
            glyph: "💧".to_string(),
            drain_offset: BUCKET_OFFSET,
            adopted_hint: "✓ Saving 8L per day".to_string(),
            idle_hint: "Click to use bucket for washing".to_string(),
            adopt_message: "💧 Using bucket instead of tap - water saved!".to_string(),
            drop_message: "🪣 Back to the running tap".to_string(),
        },
        ChoiceSpec {
            id: ChoiceId::Shower,
            label: "Short Showers".to_string(),
            glyph: "⏰".to_string(),
            drain_offset: SHORT_SHOWER_OFFSET,
            adopted_hint: "✓ Saving 6L per day".to_string(),
            idle_hint: "Click for quick 5-minute showers".to_string(),
            adopt_message: "⏰ Short showers - saving water!".to_string(),
            drop_message: "🚿 Back to long showers".to_string(),
        },
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChoiceEntry {
    pub id: ChoiceId,
    pub drain_offset: f64,
    pub adopted: bool,
}

/// Adopted flag per choice. Reductions are idempotent: an adopted choice
/// subtracts its offset once per tick no matter how often it was toggled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ChoiceSet {
    entries: SmallVec<[ChoiceEntry; 2]>,
}

impl ChoiceSet {
    #[must_use]
    pub fn from_specs(specs: &[ChoiceSpec]) -> Self {
        Self {
            entries: specs
                .iter()
                .map(|spec| ChoiceEntry {
                    id: spec.id,
                    drain_offset: spec.drain_offset,
                    adopted: false,
                })
                .collect(),
        }
    }

    #[must_use]
    pub fn is_adopted(&self, id: ChoiceId) -> bool {
        self.entries.iter().any(|e| e.id == id && e.adopted)
    }

    /// Flip a choice, returning its new adopted state.
    ///
    /// # Errors
    ///
    /// Returns [`MissionError::UnknownChoice`] if the mission was configured
    /// without this choice.
    pub fn toggle(&mut self, id: ChoiceId) -> MissionResult<bool> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| MissionError::UnknownChoice(id.to_string()))?;
        entry.adopted = !entry.adopted;
        Ok(entry.adopted)
    }

    /// Sum of offsets for every adopted choice.
    #[must_use]
    pub fn total_offset(&self) -> f64 {
        self.entries
            .iter()
            .filter(|e| e.adopted)
            .map(|e| e.drain_offset)
            .sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChoiceEntry> {
        self.entries.iter()
    }
}

//! Resource model: the tank, its leak sources and the adopted choices
use serde::{Deserialize, Serialize};

use crate::choice::{ChoiceId, ChoiceSet};
use crate::config::MissionConfig;
use crate::error::{MissionError, MissionResult};
use crate::source::{LeakSource, SourceList};

/// Result of applying one tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    pub tick: u32,
    pub drain: f64,
    pub level: f64,
    pub saved_delta: f64,
}

/// Everything one run of the mission mutates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    /// Tank level. Floored at zero, deliberately unclamped above 100.
    pub resource_level: f64,
    pub elapsed_ticks: u32,
    pub base_drain_rate: f64,
    pub saved_factor: f64,
    pub sources: SourceList,
    pub choices: ChoiceSet,
    /// Informational metric; never feeds back into the drain.
    pub resource_saved_estimate: f64,
}

impl SimulationState {
    /// Fresh state for a new run.
    #[must_use]
    pub fn from_config(config: &MissionConfig) -> Self {
        Self {
            resource_level: config.initial_level,
            elapsed_ticks: 0,
            base_drain_rate: config.base_drain_rate,
            saved_factor: config.saved_factor,
            sources: config.sources.clone(),
            choices: ChoiceSet::from_specs(&config.choices),
            resource_saved_estimate: 0.0,
        }
    }

    /// Drain applied by the next tick: base plus active leaks minus adopted
    /// choice offsets. May be negative, in which case the tank fills.
    #[must_use]
    pub fn drain_rate(&self) -> f64 {
        let leaks: f64 = self.sources.iter().map(LeakSource::active_leak).sum();
        self.base_drain_rate + leaks - self.choices.total_offset()
    }

    /// Advance one tick.
    pub fn tick(&mut self) -> TickReport {
        let drain = self.drain_rate();
        self.resource_level = (self.resource_level - drain).max(0.0);

        let saved_delta = if drain < self.base_drain_rate {
            (self.base_drain_rate - drain) * self.saved_factor
        } else {
            0.0
        };
        self.resource_saved_estimate += saved_delta;
        self.elapsed_ticks += 1;

        TickReport {
            tick: self.elapsed_ticks,
            drain,
            level: self.resource_level,
            saved_delta,
        }
    }

    /// Neutralize a source. Fixing it again is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`MissionError::UnknownSource`] and leaves the state untouched
    /// when no source has this id.
    pub fn fix_leak(&mut self, source_id: &str) -> MissionResult<&LeakSource> {
        let source = self
            .sources
            .iter_mut()
            .find(|s| s.id == source_id)
            .ok_or_else(|| MissionError::UnknownSource(source_id.to_string()))?;
        source.mark_fixed();
        Ok(source)
    }

    /// Flip a choice, returning whether it is now adopted.
    ///
    /// # Errors
    ///
    /// Returns [`MissionError::UnknownChoice`] if the choice is not configured.
    pub fn toggle_choice(&mut self, choice: ChoiceId) -> MissionResult<bool> {
        self.choices.toggle(choice)
    }

    #[must_use]
    pub fn all_sources_resolved(&self) -> bool {
        self.sources.iter().all(LeakSource::is_resolved)
    }

    #[must_use]
    pub fn resolved_count(&self) -> usize {
        self.sources.iter().filter(|s| s.is_resolved()).count()
    }
}

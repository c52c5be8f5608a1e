//! Read-only view handed to the presentation layer
use serde::{Deserialize, Serialize};

use crate::choice::ChoiceId;
use crate::lifecycle::{MissionController, MissionHooks, Phase};
use crate::notifications::Notification;
use crate::numbers::floor_f64_to_i32;
use crate::outcome::{RunOutcome, TankStatus, tank_status};
use crate::source::LeakSource;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceView {
    pub id: ChoiceId,
    pub label: String,
    pub glyph: String,
    pub adopted: bool,
    pub hint: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionSnapshot {
    pub phase: Phase,
    pub generation: u64,
    pub level: f64,
    /// Level as displayed: floored, not clamped.
    pub level_percent: i32,
    pub tank: TankStatus,
    pub drain_rate: f64,
    pub elapsed_ticks: u32,
    pub saved_estimate: f64,
    pub fixed_count: usize,
    pub source_count: usize,
    pub sources: Vec<LeakSource>,
    pub choices: Vec<ChoiceView>,
    pub notifications: Vec<Notification>,
    pub outcome: RunOutcome,
    pub completion_message: Option<String>,
}

impl MissionSnapshot {
    pub(crate) fn capture<H: MissionHooks>(mission: &MissionController<H>) -> Self {
        let state = mission.state();
        let config = mission.config();
        let outcome = mission.outcome();

        let choices = state
            .choices
            .iter()
            .map(|entry| {
                let spec = config.choice(entry.id);
                let hint = spec
                    .map(|s| {
                        if entry.adopted {
                            s.adopted_hint.clone()
                        } else {
                            s.idle_hint.clone()
                        }
                    })
                    .unwrap_or_default();
                ChoiceView {
                    id: entry.id,
                    label: spec.map_or_else(|| entry.id.to_string(), |s| s.label.clone()),
                    glyph: spec.map(|s| s.glyph.clone()).unwrap_or_default(),
                    adopted: entry.adopted,
                    hint,
                }
            })
            .collect();

        let completion_message = match outcome {
            RunOutcome::InProgress => None,
            RunOutcome::Won(_) => Some(config.briefing.won_message.clone()),
            RunOutcome::Lost(_) => Some(config.briefing.lost_message.clone()),
        };

        Self {
            phase: mission.phase(),
            generation: mission.generation(),
            level: state.resource_level,
            level_percent: floor_f64_to_i32(state.resource_level),
            tank: tank_status(state.resource_level, outcome),
            drain_rate: state.drain_rate(),
            elapsed_ticks: state.elapsed_ticks,
            saved_estimate: state.resource_saved_estimate,
            fixed_count: state.resolved_count(),
            source_count: state.sources.len(),
            sources: state.sources.to_vec(),
            choices,
            notifications: mission.notifications().live().cloned().collect(),
            outcome,
            completion_message,
        }
    }

    /// "Leaks Fixed" counter text, e.g. `2/3`.
    #[must_use]
    pub fn fixed_label(&self) -> String {
        format!("{}/{}", self.fixed_count, self.source_count)
    }
}

//! Win/lose evaluation and reward payloads
use serde::{Deserialize, Serialize};

use crate::config::RewardTable;
use crate::constants::{FILLING_TANK_LEVEL, LOW_TANK_LEVEL};
use crate::state::SimulationState;

/// Fixed payload granted on a terminal outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub coins: u32,
    pub xp: u32,
}

impl Reward {
    /// Score reported to the completion hook.
    #[must_use]
    pub const fn score(self) -> u32 {
        self.xp
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    #[default]
    InProgress,
    Won(Reward),
    Lost(Reward),
}

impl RunOutcome {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::InProgress)
    }

    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Won(_))
    }

    #[must_use]
    pub const fn reward(self) -> Option<Reward> {
        match self {
            Self::InProgress => None,
            Self::Won(reward) | Self::Lost(reward) => Some(reward),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub win_level: f64,
    pub lose_level: f64,
}

/// Decide whether the run is over. Won is checked before Lost.
#[must_use]
pub fn evaluate(
    state: &SimulationState,
    thresholds: Thresholds,
    rewards: &RewardTable,
) -> RunOutcome {
    let all_resolved = state.all_sources_resolved();
    if state.resource_level >= thresholds.win_level && all_resolved {
        return RunOutcome::Won(rewards.won);
    }
    if state.resource_level <= thresholds.lose_level && !all_resolved {
        return RunOutcome::Lost(rewards.lost);
    }
    RunOutcome::InProgress
}

/// Banner state shown over the tank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TankStatus {
    Low,
    Steady,
    Filling,
}

#[must_use]
pub fn tank_status(level: f64, outcome: RunOutcome) -> TankStatus {
    if level >= FILLING_TANK_LEVEL {
        TankStatus::Filling
    } else if level < LOW_TANK_LEVEL && !outcome.is_success() {
        TankStatus::Low
    } else {
        TankStatus::Steady
    }
}

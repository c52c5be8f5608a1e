//! Mission tuning and content configuration
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

use crate::choice::{ChoiceId, ChoiceSpec, default_choices};
use crate::constants::{
    BASE_DRAIN_RATE, INITIAL_LEVEL, LOSE_LEVEL, LOST_COINS, LOST_XP, NOTIFICATION_TTL_MS,
    SAVED_FACTOR, TICK_INTERVAL_MS, WIN_LEVEL, WON_COINS, WON_XP,
};
use crate::error::{MissionError, MissionResult};
use crate::outcome::{Reward, Thresholds};
use crate::source::{SourceList, default_sources};

const DEFAULT_MISSION_DATA: &str = include_str!("../data/mission.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardTable {
    pub won: Reward,
    pub lost: Reward,
}

impl Default for RewardTable {
    fn default() -> Self {
        Self {
            won: Reward {
                coins: WON_COINS,
                xp: WON_XP,
            },
            lost: Reward {
                coins: LOST_COINS,
                xp: LOST_XP,
            },
        }
    }
}

/// Copy shown on the start and completion popups
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Briefing {
    pub title: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub discover: String,
    #[serde(default)]
    pub challenge: String,
    #[serde(default)]
    pub success: String,
    #[serde(default)]
    pub won_message: String,
    #[serde(default)]
    pub lost_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionConfig {
    pub base_drain_rate: f64,
    #[serde(default)]
    pub initial_level: f64,
    pub win_level: f64,
    #[serde(default)]
    pub lose_level: f64,
    #[serde(default = "default_saved_factor")]
    pub saved_factor: f64,
    pub tick_interval_ms: u32,
    pub notification_ttl_ms: u32,
    #[serde(default)]
    pub rewards: RewardTable,
    pub sources: SourceList,
    #[serde(default = "default_choices")]
    pub choices: Vec<ChoiceSpec>,
    #[serde(default)]
    pub briefing: Briefing,
}

const fn default_saved_factor() -> f64 {
    SAVED_FACTOR
}

impl Default for MissionConfig {
    fn default() -> Self {
        Self::from_json(DEFAULT_MISSION_DATA).unwrap_or_else(|err| {
            log::warn!("embedded mission data rejected, using compiled balance: {err}");
            Self::compiled()
        })
    }
}

impl MissionConfig {
    /// Reference balance built from compiled constants only.
    #[must_use]
    pub fn compiled() -> Self {
        Self {
            base_drain_rate: BASE_DRAIN_RATE,
            initial_level: INITIAL_LEVEL,
            win_level: WIN_LEVEL,
            lose_level: LOSE_LEVEL,
            saved_factor: SAVED_FACTOR,
            tick_interval_ms: TICK_INTERVAL_MS,
            notification_ttl_ms: NOTIFICATION_TTL_MS,
            rewards: RewardTable::default(),
            sources: default_sources(),
            choices: default_choices(),
            briefing: Briefing {
                title: "Water Saver Mission".to_string(),
                ..Briefing::default()
            },
        }
    }

    /// Parse and validate a mission definition.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or fails [`Self::validate`].
    pub fn from_json(json: &str) -> MissionResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check structural invariants the simulation relies on.
    ///
    /// # Errors
    ///
    /// Returns [`MissionError::InvalidConfig`] describing the first violation.
    pub fn validate(&self) -> MissionResult<()> {
        if self.sources.is_empty() {
            return Err(MissionError::InvalidConfig(
                "at least one leak source is required".into(),
            ));
        }
        let mut seen = HashSet::new();
        for source in &self.sources {
            if !seen.insert(source.id.as_str()) {
                return Err(MissionError::InvalidConfig(format!(
                    "duplicate source id '{}'",
                    source.id
                )));
            }
        }
        let mut seen_choices: HashSet<ChoiceId> = HashSet::new();
        for choice in &self.choices {
            if !seen_choices.insert(choice.id) {
                return Err(MissionError::InvalidConfig(format!(
                    "duplicate choice '{}'",
                    choice.id
                )));
            }
        }
        if self.tick_interval_ms == 0 {
            return Err(MissionError::InvalidConfig(
                "tick interval must be positive".into(),
            ));
        }
        if self.win_level <= self.lose_level {
            return Err(MissionError::InvalidConfig(format!(
                "win level {} must exceed lose level {}",
                self.win_level, self.lose_level
            )));
        }
        Ok(())
    }

    #[must_use]
    pub const fn thresholds(&self) -> Thresholds {
        Thresholds {
            win_level: self.win_level,
            lose_level: self.lose_level,
        }
    }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.tick_interval_ms))
    }

    #[must_use]
    pub fn notification_ttl(&self) -> Duration {
        Duration::from_millis(u64::from(self.notification_ttl_ms))
    }

    #[must_use]
    pub fn choice(&self, id: ChoiceId) -> Option<&ChoiceSpec> {
        self.choices.iter().find(|c| c.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_data_matches_compiled_balance() {
        let embedded = MissionConfig::default();
        let compiled = MissionConfig::compiled();
        assert!((embedded.base_drain_rate - compiled.base_drain_rate).abs() < f64::EPSILON);
        assert_eq!(embedded.sources, compiled.sources);
        assert_eq!(embedded.choices, compiled.choices);
        assert_eq!(embedded.rewards, compiled.rewards);
        assert_eq!(embedded.tick_interval_ms, 800);
        assert_eq!(embedded.notification_ttl_ms, 2_000);
        assert_eq!(embedded.briefing.title, "Water Saver Mission");
    }

    #[test]
    fn durations_follow_millis() {
        let cfg = MissionConfig::compiled();
        assert_eq!(cfg.tick_interval(), Duration::from_millis(800));
        assert_eq!(cfg.notification_ttl(), Duration::from_secs(2));
    }

    #[test]
    fn rejects_duplicate_sources() {
        let mut cfg = MissionConfig::compiled();
        let dup = cfg.sources[0].clone();
        cfg.sources.push(dup);
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate source id 'tap'"));
    }

    #[test]
    fn rejects_inverted_thresholds_and_zero_cadence() {
        let mut cfg = MissionConfig::compiled();
        cfg.win_level = 0.0;
        assert!(cfg.validate().is_err());

        let mut cfg = MissionConfig::compiled();
        cfg.tick_interval_ms = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = MissionConfig::compiled();
        cfg.sources.clear();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn from_json_applies_defaults() {
        let json = r#"{
            "base_drain_rate": 6.0,
            "win_level": 90.0,
            "tick_interval_ms": 100,
            "notification_ttl_ms": 250,
            "sources": [{ "id": "tap", "name": "Tap", "leak_amount": 5.0 }]
        }"#;
        let cfg = MissionConfig::from_json(json).unwrap();
        assert!(cfg.initial_level.abs() < f64::EPSILON);
        assert!((cfg.saved_factor - 0.5).abs() < f64::EPSILON);
        assert_eq!(cfg.choices.len(), 2);
        assert_eq!(cfg.rewards.won.xp, 100);
    }

    #[test]
    fn from_json_surfaces_parse_errors() {
        let err = MissionConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, MissionError::Parse(_)));
    }
}

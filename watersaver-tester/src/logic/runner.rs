use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use watersaver_game::clock::ticker::{SharedMission, lock, spawn_expiry, spawn_ticker};
use watersaver_game::{MissionConfig, MissionController, Phase};

use super::event_loop::{RecordingHooks, VirtualLoop};
use super::scenarios::{Action, RunRecord, Scenario, Tuning};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockMode {
    Virtual,
    Realtime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub description: String,
    pub tuning: Tuning,
    pub clock: ClockMode,
    pub passed: bool,
    pub failures: Vec<String>,
    pub record: RunRecord,
    pub started_at: DateTime<Utc>,
    #[serde(with = "duration_serde")]
    pub duration: Duration,
}

pub struct ScenarioRunner {
    base_config: MissionConfig,
    max_ticks: u32,
    verbose: bool,
}

impl ScenarioRunner {
    pub const fn new(base_config: MissionConfig, max_ticks: u32, verbose: bool) -> Self {
        Self {
            base_config,
            max_ticks,
            verbose,
        }
    }

    fn config_for(&self, scenario: &Scenario) -> MissionConfig {
        let mut config = self.base_config.clone();
        scenario.tuning.apply(&mut config);
        config
    }

    fn announce(&self, scenario: &Scenario, clock: ClockMode) {
        if self.verbose {
            println!(
                "🧪 Testing scenario: {} (tuning: {:?}, clock: {:?})",
                scenario.name.bright_white(),
                scenario.tuning,
                clock
            );
        }
    }

    fn finish(
        scenario: &Scenario,
        clock: ClockMode,
        record: RunRecord,
        started_at: DateTime<Utc>,
        duration: Duration,
    ) -> ScenarioResult {
        let failures = scenario.expect.check(&record);
        ScenarioResult {
            scenario_name: scenario.name.to_string(),
            description: scenario.description.to_string(),
            tuning: scenario.tuning,
            clock,
            passed: failures.is_empty(),
            failures,
            record,
            started_at,
            duration,
        }
    }

    /// Play a scenario on the virtual clock.
    pub fn run(&self, scenario: &Scenario) -> ScenarioResult {
        self.announce(scenario, ClockMode::Virtual);
        let started_at = Utc::now();
        let start = Instant::now();

        let mut mission =
            MissionController::new(self.config_for(scenario), RecordingHooks::default());
        let record = VirtualLoop::new(&scenario.script, self.max_ticks, self.verbose)
            .run(&mut mission);

        Self::finish(
            scenario,
            ClockMode::Virtual,
            record,
            started_at,
            start.elapsed(),
        )
    }

    /// Play a scenario against the tokio ticker at wall-clock speed.
    ///
    /// # Errors
    ///
    /// Returns an error if an expiry task panics or is cancelled.
    pub async fn run_realtime(&self, scenario: &Scenario) -> Result<ScenarioResult> {
        self.announce(scenario, ClockMode::Realtime);
        let started_at = Utc::now();
        let start = Instant::now();

        let config = self.config_for(scenario);
        let cadence = config.tick_interval();
        let mission: SharedMission<RecordingHooks> = Arc::new(Mutex::new(
            MissionController::new(config, RecordingHooks::default()),
        ));
        let origin = tokio::time::Instant::now();
        let mut record = RunRecord::default();
        let mut expiries = Vec::new();

        for step in &scenario.script {
            tokio::time::sleep_until(origin + Duration::from_millis(step.at_ms)).await;
            let applied = step.action.apply(&mut *lock(&mission));
            let started = step.action == Action::Start && applied.is_ok();
            match applied {
                Ok(Some(id)) => expiries.push(spawn_expiry(Arc::clone(&mission), id)),
                Ok(None) => {}
                Err(err) => record.rejected_actions.push(format!("{}: {err}", step.action)),
            }
            if started {
                let clock = spawn_ticker(Arc::clone(&mission));
                lock(&mission).attach_clock(clock);
            }
        }

        loop {
            let (phase, ticks) = {
                let m = lock(&mission);
                (m.phase(), m.state().elapsed_ticks)
            };
            if phase != Phase::Active {
                break;
            }
            if ticks >= self.max_ticks {
                record.halted = true;
                break;
            }
            tokio::time::sleep(cadence / 2).await;
        }
        lock(&mission).release_clock();

        record.expiries_fired = expiries.len();
        for expiry in expiries {
            if expiry.await.context("notification expiry task failed")? {
                record.expiries_removed += 1;
            }
        }

        {
            let m = lock(&mission);
            record.final_phase = m.phase();
            record.outcome = m.outcome();
            record.elapsed_ticks = m.state().elapsed_ticks;
            record.final_level = m.state().resource_level;
            record.completions = m.hooks().completions.clone();
            record.exits = m.hooks().exits;
        }
        record.elapsed_ms = u64::try_from(origin.elapsed().as_millis()).unwrap_or(u64::MAX);

        Ok(Self::finish(
            scenario,
            ClockMode::Realtime,
            record,
            started_at,
            start.elapsed(),
        ))
    }
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u128::deserialize(deserializer)?;
        Ok(Duration::from_millis(u64::try_from(millis).unwrap_or(0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::scenarios::{catalog, get_scenario};

    fn runner() -> ScenarioRunner {
        ScenarioRunner::new(MissionConfig::default(), 40, false)
    }

    #[test]
    fn every_builtin_scenario_passes_on_the_virtual_clock() {
        let runner = runner();
        for scenario in catalog() {
            let result = runner.run(&scenario);
            assert!(
                result.passed,
                "{} failed: {:?}",
                scenario.name,
                result.failures
            );
        }
    }

    #[test]
    fn stall_is_halted_by_the_tick_cap() {
        let runner = ScenarioRunner::new(MissionConfig::default(), 15, false);
        let result = runner.run(&get_scenario("stall").unwrap());
        assert!(result.passed);
        assert!(result.record.halted);
        assert_eq!(result.record.elapsed_ticks, 15);
        // -1.5 per tick from empty
        assert!((result.record.final_level - 22.5).abs() < 1e-9);
    }

    #[test]
    fn changed_tuning_is_reported_as_failure() {
        let mut config = MissionConfig::default();
        config.initial_level = 100.0;
        let runner = ScenarioRunner::new(config, 40, false);
        let result = runner.run(&get_scenario("idle").unwrap());
        assert!(!result.passed);
        assert_eq!(result.record.elapsed_ticks, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn realtime_clock_agrees_with_the_virtual_one() {
        let runner = runner();
        for name in ["idle", "eager-fix", "replay-cycle", "late-notifications"] {
            let scenario = get_scenario(name).unwrap();
            let result = runner.run_realtime(&scenario).await.unwrap();
            assert!(result.passed, "{name} failed: {:?}", result.failures);
        }
    }

    #[test]
    fn results_serialize_with_millisecond_durations() {
        let result = runner().run(&get_scenario("idle").unwrap());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["scenario_name"], "idle");
        assert_eq!(json["clock"], "virtual");
        assert_eq!(json["record"]["outcome"]["status"], "lost");
        assert!(json["duration"].is_u64());
    }
}

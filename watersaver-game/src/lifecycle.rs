//! Lifecycle controller sequencing instructions, the active run and the result
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::choice::ChoiceId;
use crate::clock::ClockGuard;
use crate::config::MissionConfig;
use crate::error::{MissionError, MissionResult};
use crate::notifications::{NotificationId, NotificationQueue};
use crate::outcome::{RunOutcome, evaluate};
use crate::snapshot::MissionSnapshot;
use crate::state::{SimulationState, TickReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    /// Instructions shown, clock stopped
    #[default]
    PreGame,
    /// Clock running, evaluator live
    Active,
    /// Result shown, awaiting replay or exit
    Terminal,
    /// Control handed back to the host for good
    Exited,
}

impl Phase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PreGame => "pre-game",
            Self::Active => "active",
            Self::Terminal => "terminal",
            Self::Exited => "exited",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outbound calls to whoever embeds the mission.
pub trait MissionHooks {
    /// Called once per run when it reaches a terminal outcome.
    fn on_complete(&mut self, _success: bool, _score: u32) {}

    /// Called when the player leaves from the instructions or result screen.
    fn on_exit(&mut self) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl MissionHooks for NoHooks {}

/// What a player action produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionReport {
    pub notification: NotificationId,
    pub outcome: RunOutcome,
}

/// Owns the single [`SimulationState`] of a mission and every transition on it.
#[derive(Debug)]
pub struct MissionController<H: MissionHooks = NoHooks> {
    config: MissionConfig,
    state: SimulationState,
    notifications: NotificationQueue,
    phase: Phase,
    outcome: RunOutcome,
    generation: u64,
    clock: Option<ClockGuard>,
    hooks: H,
}

impl MissionController<NoHooks> {
    #[must_use]
    pub fn with_config(config: MissionConfig) -> Self {
        Self::new(config, NoHooks)
    }
}

impl<H: MissionHooks> MissionController<H> {
    #[must_use]
    pub fn new(config: MissionConfig, hooks: H) -> Self {
        let state = SimulationState::from_config(&config);
        Self {
            config,
            state,
            notifications: NotificationQueue::new(),
            phase: Phase::PreGame,
            outcome: RunOutcome::InProgress,
            generation: 0,
            clock: None,
            hooks,
        }
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub const fn outcome(&self) -> RunOutcome {
        self.outcome
    }

    #[must_use]
    pub const fn state(&self) -> &SimulationState {
        &self.state
    }

    #[must_use]
    pub const fn config(&self) -> &MissionConfig {
        &self.config
    }

    #[must_use]
    pub const fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    /// Incremented on every replay; lets hosts tell runs apart.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub const fn hooks(&self) -> &H {
        &self.hooks
    }

    pub const fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    /// Leave the instructions and begin ticking.
    ///
    /// # Errors
    ///
    /// Returns [`MissionError::InvalidPhase`] unless the mission is in
    /// [`Phase::PreGame`].
    pub fn start(&mut self) -> MissionResult<()> {
        self.require(Phase::PreGame, "start")?;
        self.phase = Phase::Active;
        log::info!("mission run {} started", self.generation);
        Ok(())
    }

    /// Take ownership of the host timer driving this run. The guard is
    /// dropped, and the timer cancelled, by whichever call ends the run. A
    /// guard offered outside an active run is cancelled straight away.
    pub fn attach_clock(&mut self, clock: ClockGuard) {
        if self.phase == Phase::Active {
            self.clock = Some(clock);
        } else {
            log::debug!("cancelling clock offered while {}", self.phase);
            drop(clock);
        }
    }

    #[must_use]
    pub const fn has_clock(&self) -> bool {
        self.clock.is_some()
    }

    /// Cancel the attached timer, if any, without changing phase.
    pub fn release_clock(&mut self) {
        if let Some(clock) = self.clock.take() {
            clock.cancel();
        }
    }

    /// Apply one clock tick. Ticks outside the active phase are ignored and
    /// return `None`.
    pub fn tick(&mut self) -> Option<TickReport> {
        if self.phase != Phase::Active {
            log::trace!("ignoring tick while {}", self.phase);
            return None;
        }
        let report = self.state.tick();
        log::debug!(
            "tick {}: drain {:.1}, level {:.1}, saved +{:.1}",
            report.tick,
            report.drain,
            report.level,
            report.saved_delta
        );
        self.evaluate_outcome();
        Some(report)
    }

    /// Fix a leak source and announce it.
    ///
    /// # Errors
    ///
    /// Returns [`MissionError::InvalidPhase`] outside an active run, or
    /// [`MissionError::UnknownSource`] for an unknown id. Neither changes state.
    pub fn fix_leak(&mut self, source_id: &str) -> MissionResult<ActionReport> {
        self.require(Phase::Active, "fix a leak")?;
        let name = match self.state.fix_leak(source_id) {
            Ok(source) => source.name.clone(),
            Err(err) => {
                log::warn!("rejected fix: {err}");
                return Err(err);
            }
        };
        let notification = self.notifications.enqueue(format!("✓ Fixed {name}!"));
        self.evaluate_outcome();
        Ok(ActionReport {
            notification,
            outcome: self.outcome,
        })
    }

    /// Adopt or drop a water choice and announce the new state.
    ///
    /// # Errors
    ///
    /// Returns [`MissionError::InvalidPhase`] outside an active run, or
    /// [`MissionError::UnknownChoice`] if the choice is not configured.
    pub fn toggle_choice(&mut self, choice: ChoiceId) -> MissionResult<ActionReport> {
        self.require(Phase::Active, "toggle a choice")?;
        let adopted = match self.state.toggle_choice(choice) {
            Ok(adopted) => adopted,
            Err(err) => {
                log::warn!("rejected toggle: {err}");
                return Err(err);
            }
        };
        let text = self.config.choice(choice).map_or_else(
            || format!("{choice}: {}", if adopted { "on" } else { "off" }),
            |spec| spec.message_for(adopted).to_string(),
        );
        let notification = self.notifications.enqueue(text);
        Ok(ActionReport {
            notification,
            outcome: self.outcome,
        })
    }

    /// Timer-driven removal. Safe in every phase and for stale ids.
    pub fn expire_notification(&mut self, id: NotificationId) -> bool {
        self.notifications.dequeue(id)
    }

    /// Reset everything and return to the instructions.
    ///
    /// # Errors
    ///
    /// Returns [`MissionError::InvalidPhase`] unless the run has finished.
    pub fn replay(&mut self) -> MissionResult<()> {
        self.require(Phase::Terminal, "replay")?;
        self.release_clock();
        self.state = SimulationState::from_config(&self.config);
        self.notifications.clear();
        self.outcome = RunOutcome::InProgress;
        self.phase = Phase::PreGame;
        self.generation += 1;
        log::info!("mission reset for run {}", self.generation);
        Ok(())
    }

    /// Hand control back to the host.
    ///
    /// # Errors
    ///
    /// Returns [`MissionError::InvalidPhase`] during an active run or after a
    /// previous exit.
    pub fn exit(&mut self) -> MissionResult<()> {
        if !matches!(self.phase, Phase::PreGame | Phase::Terminal) {
            return Err(MissionError::InvalidPhase {
                action: "exit",
                phase: self.phase,
            });
        }
        log::info!("mission exited from {}", self.phase);
        self.release_clock();
        self.phase = Phase::Exited;
        self.hooks.on_exit();
        Ok(())
    }

    #[must_use]
    pub fn snapshot(&self) -> MissionSnapshot {
        MissionSnapshot::capture(self)
    }

    fn require(&self, expected: Phase, action: &'static str) -> MissionResult<()> {
        if self.phase == expected {
            Ok(())
        } else {
            log::warn!("cannot {action} while {}", self.phase);
            Err(MissionError::InvalidPhase {
                action,
                phase: self.phase,
            })
        }
    }

    fn evaluate_outcome(&mut self) {
        if self.outcome.is_terminal() {
            return;
        }
        let outcome = evaluate(
            &self.state,
            self.config.thresholds(),
            &self.config.rewards,
        );
        let Some(reward) = outcome.reward() else {
            return;
        };
        self.outcome = outcome;
        self.phase = Phase::Terminal;
        self.release_clock();
        log::info!(
            "mission run {} ended after {} ticks: {} ({} coins, {} xp)",
            self.generation,
            self.state.elapsed_ticks,
            if outcome.is_success() { "won" } else { "lost" },
            reward.coins,
            reward.xp
        );
        self.hooks.on_complete(outcome.is_success(), reward.score());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::Reward;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct Recorder {
        completions: Vec<(bool, u32)>,
        exits: u32,
    }

    impl MissionHooks for Recorder {
        fn on_complete(&mut self, success: bool, score: u32) {
            self.completions.push((success, score));
        }

        fn on_exit(&mut self) {
            self.exits += 1;
        }
    }

    fn controller() -> MissionController<Recorder> {
        MissionController::new(MissionConfig::compiled(), Recorder::default())
    }

    fn half_full() -> MissionController<Recorder> {
        let mut config = MissionConfig::compiled();
        config.initial_level = 50.0;
        MissionController::new(config, Recorder::default())
    }

    #[test]
    fn starts_in_pre_game_and_ignores_ticks() {
        let mut mission = controller();
        assert_eq!(mission.phase(), Phase::PreGame);
        assert!(mission.tick().is_none());
        assert_eq!(mission.state().elapsed_ticks, 0);
    }

    #[test]
    fn actions_require_active_phase() {
        let mut mission = controller();
        assert!(matches!(
            mission.fix_leak("tap"),
            Err(MissionError::InvalidPhase {
                phase: Phase::PreGame,
                ..
            })
        ));
        assert!(mission.toggle_choice(ChoiceId::Bucket).is_err());
        assert!(mission.replay().is_err());
        mission.start().unwrap();
        assert!(mission.start().is_err());
        assert!(mission.exit().is_err());
    }

    #[test]
    fn first_tick_with_open_leaks_loses_once() {
        let mut mission = controller();
        mission.start().unwrap();
        mission.tick().unwrap();
        assert_eq!(mission.phase(), Phase::Terminal);
        assert_eq!(
            mission.outcome(),
            RunOutcome::Lost(Reward { coins: 10, xp: 30 })
        );
        assert!(mission.tick().is_none());
        assert!(mission.tick().is_none());
        assert_eq!(mission.hooks().completions, vec![(false, 30)]);
    }

    #[test]
    fn fixing_on_an_empty_tank_loses_immediately() {
        let mut mission = controller();
        mission.start().unwrap();
        let report = mission.fix_leak("tap").unwrap();
        assert!(!report.outcome.is_success());
        assert_eq!(mission.phase(), Phase::Terminal);
        assert_eq!(mission.state().elapsed_ticks, 0);
        assert_eq!(mission.notifications().len(), 1);
        assert_eq!(mission.hooks().completions, vec![(false, 30)]);
    }

    #[test]
    fn unknown_source_leaves_run_untouched() {
        let mut mission = controller();
        mission.start().unwrap();
        let err = mission.fix_leak("garden-hose").unwrap_err();
        assert!(matches!(err, MissionError::UnknownSource(_)));
        assert!(mission.notifications().is_empty());
        assert_eq!(mission.phase(), Phase::Active);
    }

    #[test]
    fn fixes_and_toggles_enqueue_messages() {
        let mut mission = half_full();
        mission.start().unwrap();
        mission.fix_leak("tap").unwrap();
        mission.fix_leak("tap").unwrap();
        mission.toggle_choice(ChoiceId::Bucket).unwrap();
        mission.toggle_choice(ChoiceId::Bucket).unwrap();
        let texts: Vec<_> = mission
            .notifications()
            .live()
            .map(|n| n.text.clone())
            .collect();
        assert_eq!(
            texts,
            [
                "✓ Fixed Kitchen Tap!",
                "✓ Fixed Kitchen Tap!",
                "💧 Using bucket instead of tap - water saved!",
                "🪣 Back to the running tap",
            ]
        );
        assert_eq!(mission.phase(), Phase::Active);
    }

    #[test]
    fn fixing_the_last_leak_on_a_full_tank_wins() {
        let mut config = MissionConfig::compiled();
        config.initial_level = 95.0;
        let mut mission = MissionController::new(config, Recorder::default());
        mission.start().unwrap();
        mission.fix_leak("tap").unwrap();
        mission.fix_leak("shower").unwrap();
        assert_eq!(mission.phase(), Phase::Active);
        let report = mission.fix_leak("toilet").unwrap();
        assert_eq!(report.outcome, RunOutcome::Won(Reward { coins: 50, xp: 100 }));
        assert_eq!(mission.hooks().completions, vec![(true, 100)]);
        assert!(mission.tick().is_none());
    }

    #[test]
    fn exit_from_pre_game_calls_hook_without_completion() {
        let mut mission = controller();
        mission.exit().unwrap();
        assert_eq!(mission.phase(), Phase::Exited);
        assert_eq!(mission.hooks().exits, 1);
        assert!(mission.hooks().completions.is_empty());
        assert!(mission.exit().is_err());
        assert!(mission.start().is_err());
    }

    #[test]
    fn replay_resets_and_bumps_generation() {
        let mut mission = controller();
        mission.start().unwrap();
        mission.toggle_choice(ChoiceId::Shower).unwrap();
        mission.tick();
        assert_eq!(mission.phase(), Phase::Terminal);

        mission.replay().unwrap();
        assert_eq!(mission.phase(), Phase::PreGame);
        assert_eq!(mission.generation(), 1);
        assert_eq!(mission.outcome(), RunOutcome::InProgress);
        assert_eq!(mission.state().elapsed_ticks, 0);
        assert!(!mission.state().choices.is_adopted(ChoiceId::Shower));
        assert!(mission.notifications().is_empty());

        mission.start().unwrap();
        mission.tick();
        assert_eq!(mission.hooks().completions, vec![(false, 30), (false, 30)]);
    }

    fn counting_clock() -> (ClockGuard, Arc<AtomicUsize>) {
        let cancels = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&cancels);
        let guard = ClockGuard::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (guard, cancels)
    }

    #[test]
    fn clock_is_cancelled_by_the_fix_that_ends_the_run() {
        let mut config = MissionConfig::compiled();
        config.initial_level = 95.0;
        let mut mission = MissionController::new(config, Recorder::default());
        mission.start().unwrap();
        let (clock, cancels) = counting_clock();
        mission.attach_clock(clock);

        mission.fix_leak("tap").unwrap();
        mission.fix_leak("toilet").unwrap();
        assert_eq!(cancels.load(Ordering::SeqCst), 0);
        assert!(mission.has_clock());

        let report = mission.fix_leak("shower").unwrap();
        assert!(report.outcome.is_success());
        assert_eq!(mission.phase(), Phase::Terminal);
        assert_eq!(cancels.load(Ordering::SeqCst), 1);
        assert!(!mission.has_clock());
    }

    #[test]
    fn clock_is_cancelled_by_the_losing_tick() {
        let mut mission = controller();
        mission.start().unwrap();
        let (clock, cancels) = counting_clock();
        mission.attach_clock(clock);
        mission.tick().unwrap();
        assert_eq!(cancels.load(Ordering::SeqCst), 1);
        assert_eq!(mission.hooks().completions, vec![(false, 30)]);

        mission.replay().unwrap();
        mission.exit().unwrap();
        assert_eq!(cancels.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn clock_offered_outside_a_run_is_cancelled() {
        let mut mission = controller();
        let (clock, cancels) = counting_clock();
        mission.attach_clock(clock);
        assert_eq!(cancels.load(Ordering::SeqCst), 1);
        assert!(!mission.has_clock());
    }

    #[test]
    fn attaching_a_second_clock_cancels_the_first() {
        let mut mission = half_full();
        mission.start().unwrap();
        let (first, first_cancels) = counting_clock();
        let (second, second_cancels) = counting_clock();
        mission.attach_clock(first);
        mission.attach_clock(second);
        assert_eq!(first_cancels.load(Ordering::SeqCst), 1);
        assert_eq!(second_cancels.load(Ordering::SeqCst), 0);

        mission.release_clock();
        assert_eq!(second_cancels.load(Ordering::SeqCst), 1);
        assert_eq!(mission.phase(), Phase::Active);
    }

    #[test]
    fn phase_labels() {
        assert_eq!(Phase::PreGame.to_string(), "pre-game");
        assert_eq!(
            serde_json::to_string(&Phase::Terminal).unwrap(),
            "\"terminal\""
        );
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use watersaver_game::{
    ChoiceId, MissionConfig, MissionController, MissionHooks, MissionResult, NotificationId,
    Phase, RunOutcome,
};

/// A player or host action issued at a scripted moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Start,
    Fix(&'static str),
    Toggle(ChoiceId),
    Replay,
    Exit,
}

impl Action {
    /// Apply the action, returning the notification it enqueued, if any.
    ///
    /// # Errors
    ///
    /// Propagates the controller's rejection unchanged.
    pub fn apply<H: MissionHooks>(
        self,
        mission: &mut MissionController<H>,
    ) -> MissionResult<Option<NotificationId>> {
        match self {
            Self::Start => mission.start().map(|()| None),
            Self::Fix(id) => mission.fix_leak(id).map(|r| Some(r.notification)),
            Self::Toggle(choice) => mission.toggle_choice(choice).map(|r| Some(r.notification)),
            Self::Replay => mission.replay().map(|()| None),
            Self::Exit => mission.exit().map(|()| None),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::Fix(id) => write!(f, "fix {id}"),
            Self::Toggle(choice) => write!(f, "toggle {choice}"),
            Self::Replay => f.write_str("replay"),
            Self::Exit => f.write_str("exit"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptedStep {
    /// Virtual milliseconds since the scenario began.
    pub at_ms: u64,
    pub action: Action,
}

const fn at(at_ms: u64, action: Action) -> ScriptedStep {
    ScriptedStep { at_ms, action }
}

/// Tuning adjustments layered over the loaded mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tuning {
    /// Loaded mission as-is.
    Reference,
    /// Gentle drain and a tank that cannot run dry.
    Practice,
    /// Gentle drain starting from a half-full tank.
    HeadStart,
}

impl Tuning {
    pub fn apply(self, config: &mut MissionConfig) {
        match self {
            Self::Reference => {}
            Self::Practice => {
                config.base_drain_rate = 6.5;
                config.lose_level = -1.0;
            }
            Self::HeadStart => {
                config.base_drain_rate = 6.5;
                config.initial_level = 50.0;
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedOutcome {
    Won,
    Lost,
    Unresolved,
}

impl ExpectedOutcome {
    const fn matches(self, outcome: RunOutcome) -> bool {
        matches!(
            (self, outcome),
            (Self::Won, RunOutcome::Won(_))
                | (Self::Lost, RunOutcome::Lost(_))
                | (Self::Unresolved, RunOutcome::InProgress)
        )
    }
}

/// What the run must look like when the script and the clock are exhausted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expectation {
    pub outcome: ExpectedOutcome,
    /// Ticks elapsed in the last run; `None` skips the check.
    pub ticks: Option<u32>,
    /// `(success, score)` pairs passed to the completion hook, in order.
    pub completions: Vec<(bool, u32)>,
    pub final_phase: Phase,
    pub exits: u32,
    /// Expiries that still found their notification live.
    pub removed_expiries: Option<usize>,
}

/// Everything observed while playing a scenario.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub final_phase: Phase,
    pub outcome: RunOutcome,
    pub elapsed_ticks: u32,
    pub final_level: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lowest_level: Option<f64>,
    pub completions: Vec<(bool, u32)>,
    pub exits: u32,
    pub expiries_fired: usize,
    pub expiries_removed: usize,
    pub elapsed_ms: u64,
    pub halted: bool,
    pub rejected_actions: Vec<String>,
}

impl Expectation {
    /// Every mismatch between the record and this expectation.
    #[must_use]
    pub fn check(&self, record: &RunRecord) -> Vec<String> {
        let mut failures = Vec::new();
        if !self.outcome.matches(record.outcome) {
            failures.push(format!(
                "expected outcome {:?}, got {:?}",
                self.outcome, record.outcome
            ));
        }
        if let Some(ticks) = self.ticks
            && ticks != record.elapsed_ticks
        {
            failures.push(format!(
                "expected {ticks} ticks, got {}",
                record.elapsed_ticks
            ));
        }
        if self.completions != record.completions {
            failures.push(format!(
                "expected completions {:?}, got {:?}",
                self.completions, record.completions
            ));
        }
        if self.final_phase != record.final_phase {
            failures.push(format!(
                "expected to finish in {}, finished in {}",
                self.final_phase, record.final_phase
            ));
        }
        if self.exits != record.exits {
            failures.push(format!(
                "expected {} exit calls, got {}",
                self.exits, record.exits
            ));
        }
        if let Some(removed) = self.removed_expiries
            && removed != record.expiries_removed
        {
            failures.push(format!(
                "expected {removed} live expiries, got {}",
                record.expiries_removed
            ));
        }
        if let Some(lowest) = record.lowest_level
            && lowest < 0.0
        {
            failures.push(format!("tank level dropped to {lowest}"));
        }
        for rejected in &record.rejected_actions {
            failures.push(format!("action rejected: {rejected}"));
        }
        failures
    }
}

#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: &'static str,
    pub description: &'static str,
    pub tuning: Tuning,
    pub script: Vec<ScriptedStep>,
    pub expect: Expectation,
}

const LOSS: (bool, u32) = (false, 30);
const WIN: (bool, u32) = (true, 100);

fn fix_everything(at_ms: u64) -> impl Iterator<Item = ScriptedStep> {
    [
        Action::Fix("tap"),
        Action::Fix("shower"),
        Action::Fix("toilet"),
        Action::Toggle(ChoiceId::Bucket),
        Action::Toggle(ChoiceId::Shower),
    ]
    .into_iter()
    .map(move |action| at(at_ms, action))
}

#[must_use]
pub fn catalog() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "idle",
            description: "Start and never act; the empty tank loses on the first tick",
            tuning: Tuning::Reference,
            script: vec![at(0, Action::Start)],
            expect: Expectation {
                outcome: ExpectedOutcome::Lost,
                ticks: Some(1),
                completions: vec![LOSS],
                final_phase: Phase::Terminal,
                exits: 0,
                removed_expiries: Some(0),
            },
        },
        Scenario {
            name: "eager-fix",
            description: "Fix the tap before the first tick; the fix itself is judged and loses",
            tuning: Tuning::Reference,
            script: vec![at(0, Action::Start), at(0, Action::Fix("tap"))],
            expect: Expectation {
                outcome: ExpectedOutcome::Lost,
                ticks: Some(0),
                completions: vec![LOSS],
                final_phase: Phase::Terminal,
                exits: 0,
                removed_expiries: Some(1),
            },
        },
        Scenario {
            name: "choices-only",
            description: "Adopt both choices but leave every leak open",
            tuning: Tuning::Reference,
            script: vec![
                at(0, Action::Start),
                at(100, Action::Toggle(ChoiceId::Bucket)),
                at(200, Action::Toggle(ChoiceId::Shower)),
            ],
            expect: Expectation {
                outcome: ExpectedOutcome::Lost,
                ticks: Some(1),
                completions: vec![LOSS],
                final_phase: Phase::Terminal,
                exits: 0,
                removed_expiries: Some(2),
            },
        },
        Scenario {
            name: "practice-run",
            description: "Practice tuning, fix everything at once, win on tick 12 and leave",
            tuning: Tuning::Practice,
            script: [at(0, Action::Start)]
                .into_iter()
                .chain(fix_everything(0))
                .chain([at(12_000, Action::Exit)])
                .collect(),
            expect: Expectation {
                outcome: ExpectedOutcome::Won,
                ticks: Some(12),
                completions: vec![WIN],
                final_phase: Phase::Exited,
                exits: 1,
                removed_expiries: Some(5),
            },
        },
        Scenario {
            name: "stall",
            description: "Practice tuning with the toilet left leaking; the run never resolves",
            tuning: Tuning::Practice,
            script: vec![
                at(0, Action::Start),
                at(0, Action::Fix("tap")),
                at(0, Action::Fix("shower")),
                at(0, Action::Toggle(ChoiceId::Bucket)),
                at(0, Action::Toggle(ChoiceId::Shower)),
            ],
            expect: Expectation {
                outcome: ExpectedOutcome::Unresolved,
                ticks: None,
                completions: Vec::new(),
                final_phase: Phase::Active,
                exits: 0,
                removed_expiries: Some(4),
            },
        },
        Scenario {
            name: "replay-cycle",
            description: "Head-start tuning: idle into a loss, replay, then fix everything and win",
            tuning: Tuning::HeadStart,
            script: [
                at(0, Action::Start),
                at(2_000, Action::Replay),
                at(2_000, Action::Start),
            ]
            .into_iter()
            .chain(fix_everything(2_000))
            .collect(),
            expect: Expectation {
                outcome: ExpectedOutcome::Won,
                ticks: Some(6),
                completions: vec![LOSS, WIN],
                final_phase: Phase::Terminal,
                exits: 0,
                removed_expiries: Some(5),
            },
        },
        Scenario {
            name: "late-notifications",
            description: "Reset while a message is live; its expiry lands in the next run harmlessly",
            tuning: Tuning::Reference,
            script: vec![
                at(0, Action::Start),
                at(300, Action::Toggle(ChoiceId::Bucket)),
                at(1_000, Action::Replay),
            ],
            expect: Expectation {
                outcome: ExpectedOutcome::Unresolved,
                ticks: Some(0),
                completions: vec![LOSS],
                final_phase: Phase::PreGame,
                exits: 0,
                removed_expiries: Some(0),
            },
        },
    ]
}

#[must_use]
pub fn get_scenario(name: &str) -> Option<Scenario> {
    catalog().into_iter().find(|s| s.name == name)
}

#[must_use]
pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    catalog()
        .into_iter()
        .map(|s| (s.name, s.description))
        .collect()
}

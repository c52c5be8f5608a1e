//! Deterministic stand-in for the host timers.
//!
//! Ticks fire every cadence while a run is active, expiries fire one
//! time-to-live after their notification was enqueued, and scripted actions
//! fire at their scheduled moment. Events sharing a timestamp run in that
//! order: tick, expiry, action.

use std::collections::VecDeque;

use watersaver_game::{MissionController, MissionHooks, NotificationId, Phase};

use super::scenarios::{RunRecord, ScriptedStep};

/// Records hook calls so scenarios can assert on them.
#[derive(Debug, Clone, Default)]
pub struct RecordingHooks {
    pub completions: Vec<(bool, u32)>,
    pub exits: u32,
}

impl MissionHooks for RecordingHooks {
    fn on_complete(&mut self, success: bool, score: u32) {
        self.completions.push((success, score));
    }

    fn on_exit(&mut self) {
        self.exits += 1;
    }
}

pub struct VirtualLoop<'a> {
    script: &'a [ScriptedStep],
    max_ticks: u32,
    verbose: bool,
}

impl<'a> VirtualLoop<'a> {
    pub const fn new(script: &'a [ScriptedStep], max_ticks: u32, verbose: bool) -> Self {
        Self {
            script,
            max_ticks,
            verbose,
        }
    }

    /// Play the script to exhaustion against `mission`.
    pub fn run(&self, mission: &mut MissionController<RecordingHooks>) -> RunRecord {
        let cadence = u64::from(mission.config().tick_interval_ms);
        let ttl = u64::from(mission.config().notification_ttl_ms);

        let mut record = RunRecord::default();
        let mut lowest = mission.state().resource_level;
        let mut next_step = 0;
        let mut next_tick: Option<u64> = None;
        // constant ttl and a monotonic clock keep this queue sorted
        let mut expiries: VecDeque<(u64, NotificationId)> = VecDeque::new();
        let mut now = 0;

        loop {
            let tick_due = next_tick;
            let expiry_due = expiries.front().map(|&(due, _)| due);
            let step_due = self.script.get(next_step).map(|s| s.at_ms);
            let Some(due) = [tick_due, expiry_due, step_due].into_iter().flatten().min() else {
                break;
            };
            now = due;

            if tick_due == Some(due) {
                if mission.state().elapsed_ticks >= self.max_ticks {
                    log::info!("tick cap {} reached at {now} ms", self.max_ticks);
                    record.halted = true;
                    next_tick = None;
                    continue;
                }
                if let Some(report) = mission.tick() {
                    lowest = lowest.min(report.level);
                    if self.verbose {
                        println!(
                            "   ⏱  {now:>6} ms tick {:>3} level {:>6.1} drain {:>5.1}",
                            report.tick, report.level, report.drain
                        );
                    }
                }
                next_tick = (mission.phase() == Phase::Active).then_some(due + cadence);
            } else if expiry_due == Some(due) {
                if let Some((_, id)) = expiries.pop_front() {
                    record.expiries_fired += 1;
                    if mission.expire_notification(id) {
                        record.expiries_removed += 1;
                    }
                }
            } else {
                let step = self.script[next_step];
                next_step += 1;
                match step.action.apply(mission) {
                    Ok(notification) => {
                        if let Some(id) = notification {
                            expiries.push_back((due + ttl, id));
                        }
                    }
                    Err(err) => record.rejected_actions.push(format!("{}: {err}", step.action)),
                }
                if self.verbose {
                    println!("   ▶  {now:>6} ms {} → {}", step.action, mission.phase());
                }
                next_tick = match (mission.phase(), next_tick) {
                    (Phase::Active, None) => Some(due + cadence),
                    (Phase::Active, pending) => pending,
                    _ => None,
                };
                lowest = lowest.min(mission.state().resource_level);
            }
        }

        record.final_phase = mission.phase();
        record.outcome = mission.outcome();
        record.elapsed_ticks = mission.state().elapsed_ticks;
        record.final_level = mission.state().resource_level;
        record.lowest_level = Some(lowest);
        record.completions = mission.hooks().completions.clone();
        record.exits = mission.hooks().exits;
        record.elapsed_ms = now;
        record
    }
}

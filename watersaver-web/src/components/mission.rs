//! Browser host for a mission: owns the controller, arms the tick clock while
//! a run is active and schedules notification expiry. The controller holds
//! the clock's cancel handle and clears the interval in the call that ends
//! the run.

pub mod board;
pub mod popups;

use std::cell::RefCell;
use std::rc::Rc;

use crate::dom;
use wasm_bindgen::closure::Closure;
use board::MissionBoard;
use popups::{BriefingPopup, ResultPopup};
use watersaver_game::numbers::floor_f64_to_i32;
use watersaver_game::{
    ChoiceId, MissionConfig, MissionController, MissionError, MissionHooks,
    NotificationId, Phase, RunOutcome,
};
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    /// Read once when the component mounts.
    #[prop_or_default]
    pub config: Option<Rc<MissionConfig>>,
    #[prop_or_default]
    pub on_game_complete: Option<Callback<(bool, u32)>>,
    #[prop_or_default]
    pub on_exit: Option<Callback<()>>,
}

/// Forwards engine hooks to the embedding page's callbacks.
#[derive(Debug, Default)]
pub struct WebHooks {
    on_game_complete: Option<Callback<(bool, u32)>>,
    on_exit: Option<Callback<()>>,
}

impl WebHooks {
    fn from_props(props: &Props) -> Self {
        Self {
            on_game_complete: props.on_game_complete.clone(),
            on_exit: props.on_exit.clone(),
        }
    }
}

impl MissionHooks for WebHooks {
    fn on_complete(&mut self, success: bool, score: u32) {
        if let Some(cb) = &self.on_game_complete {
            cb.emit((success, score));
        }
    }

    fn on_exit(&mut self) {
        if let Some(cb) = &self.on_exit {
            cb.emit(());
        }
    }
}

type SharedMission = Rc<RefCell<MissionController<WebHooks>>>;

fn log_rejection(err: &MissionError) {
    let stale = matches!(err, MissionError::InvalidPhase { .. });
    if stale {
        log::warn!("ignored board action: {err}");
    } else {
        log::error!("board sent an unknown id: {err}");
    }
    debug_assert!(stale, "board sent an unknown id: {err}");
}

/// Starts the tick interval and hands its cancel handle to the controller.
/// The returned callback has to stay alive until the effect is cleaned up.
fn arm_clock(
    mission: &SharedMission,
    redraw: UseForceUpdateHandle,
) -> Option<Closure<dyn FnMut()>> {
    let cadence = mission.borrow().config().tick_interval_ms;
    let ticking = Rc::clone(mission);
    let armed = dom::set_interval(cadence, move || {
        let report = ticking.borrow_mut().tick();
        if report.is_some() {
            redraw.force_update();
        }
    });
    match armed {
        Ok(interval) => {
            mission.borrow_mut().attach_clock(interval.cancel);
            Some(interval.callback)
        }
        Err(err) => {
            dom::console_error(&format!(
                "Failed to start mission clock: {}",
                dom::js_error_message(&err)
            ));
            None
        }
    }
}

fn schedule_expiry(mission: &SharedMission, id: NotificationId, redraw: UseForceUpdateHandle) {
    let ttl = mission.borrow().config().notification_ttl_ms;
    let mission = Rc::clone(mission);
    let scheduled = dom::set_timeout(ttl, move || {
        let removed = mission.borrow_mut().expire_notification(id);
        if removed {
            redraw.force_update();
        }
    });
    if let Err(err) = scheduled {
        dom::console_error(&format!(
            "Failed to schedule message expiry: {}",
            dom::js_error_message(&err)
        ));
    }
}

#[function_component(WaterSaverMission)]
pub fn water_saver_mission(props: &Props) -> Html {
    let mission: SharedMission = {
        let config = props.config.clone();
        let hooks = WebHooks::from_props(props);
        use_mut_ref(move || {
            let config = config.map_or_else(MissionConfig::default, |c| (*c).clone());
            MissionController::new(config, hooks)
        })
    };
    *mission.borrow_mut().hooks_mut() = WebHooks::from_props(props);

    let redraw = use_force_update();
    let fullscreen = use_state(|| false);
    let snapshot = mission.borrow().snapshot();

    {
        let mission = Rc::clone(&mission);
        let redraw = redraw.clone();
        use_effect_with(
            (snapshot.phase, snapshot.generation),
            move |(phase, _generation)| {
                let callback = if *phase == Phase::Active {
                    arm_clock(&mission, redraw)
                } else {
                    None
                };
                move || {
                    mission.borrow_mut().release_clock();
                    drop(callback);
                }
            },
        );
    }

    let on_start = {
        let mission = Rc::clone(&mission);
        let redraw = redraw.clone();
        Callback::from(move |()| {
            let started = mission.borrow_mut().start();
            if let Err(err) = started {
                log_rejection(&err);
            }
            redraw.force_update();
        })
    };

    // exit and replay share one shape: a lifecycle call then a redraw
    let lifecycle = |call: fn(&mut MissionController<WebHooks>) -> Result<(), MissionError>| {
        let mission = Rc::clone(&mission);
        let redraw = redraw.clone();
        let fullscreen = fullscreen.clone();
        Callback::from(move |()| {
            let result = call(&mut mission.borrow_mut());
            if let Err(err) = result {
                log_rejection(&err);
            }
            fullscreen.set(false);
            redraw.force_update();
        })
    };
    let on_exit = lifecycle(MissionController::exit);
    let on_replay = lifecycle(MissionController::replay);

    let on_fix = {
        let mission = Rc::clone(&mission);
        let redraw = redraw.clone();
        Callback::from(move |source_id: String| {
            let fixed = mission.borrow_mut().fix_leak(&source_id);
            match fixed {
                Ok(report) => schedule_expiry(&mission, report.notification, redraw.clone()),
                Err(err) => log_rejection(&err),
            }
            redraw.force_update();
        })
    };

    let on_toggle = {
        let mission = Rc::clone(&mission);
        let redraw = redraw.clone();
        Callback::from(move |choice: ChoiceId| {
            let toggled = mission.borrow_mut().toggle_choice(choice);
            match toggled {
                Ok(report) => schedule_expiry(&mission, report.notification, redraw.clone()),
                Err(err) => log_rejection(&err),
            }
            redraw.force_update();
        })
    };

    let on_toggle_fullscreen = {
        let fullscreen = fullscreen.clone();
        Callback::from(move |()| fullscreen.set(!*fullscreen))
    };

    let guard = mission.borrow();
    let config = guard.config();
    let body = match (snapshot.phase, snapshot.outcome) {
        (Phase::PreGame, _) => html! {
            <BriefingPopup
                briefing={config.briefing.clone()}
                on_start={on_start}
                on_cancel={on_exit}
            />
        },
        (Phase::Active, _) => html! {
            <MissionBoard
                snapshot={snapshot.clone()}
                title={AttrValue::from(config.briefing.title.clone())}
                tagline={AttrValue::from(config.briefing.tagline.clone())}
                win_level={floor_f64_to_i32(config.win_level)}
                fullscreen={*fullscreen}
                on_fix={on_fix}
                on_toggle={on_toggle}
                on_toggle_fullscreen={on_toggle_fullscreen}
            />
        },
        (Phase::Terminal, RunOutcome::Won(reward) | RunOutcome::Lost(reward)) => html! {
            <ResultPopup
                title={AttrValue::from(config.briefing.title.clone())}
                message={AttrValue::from(snapshot.completion_message.clone().unwrap_or_default())}
                success={snapshot.outcome.is_success()}
                reward={reward}
                on_replay={on_replay}
                on_exit={on_exit}
            />
        },
        (Phase::Terminal, RunOutcome::InProgress) | (Phase::Exited, _) => Html::default(),
    };

    html! {
        <div class="water-saver-mission" data-phase={snapshot.phase.as_str()}>
            { body }
        </div>
    }
}

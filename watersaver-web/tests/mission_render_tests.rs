use futures::executor::block_on;
use std::rc::Rc;
use watersaver_game::{
    Briefing, ChoiceId, MissionConfig, MissionController, MissionSnapshot, Reward,
};
use watersaver_web::components::mission::board::{BoardProps, MissionBoard};
use watersaver_web::components::mission::popups::{
    BriefingPopup, BriefingProps, ResultPopup, ResultProps,
};
use watersaver_web::components::mission::{Props, WaterSaverMission};
use yew::{AttrValue, Callback, LocalServerRenderer};

fn board_props(snapshot: MissionSnapshot) -> BoardProps {
    BoardProps {
        snapshot,
        title: AttrValue::from("Water Saver Mission"),
        tagline: AttrValue::from("Fix leaks and save water for your village"),
        win_level: 90,
        fullscreen: false,
        on_fix: Callback::noop(),
        on_toggle: Callback::noop(),
        on_toggle_fullscreen: Callback::noop(),
    }
}

fn running_at(level: f64) -> MissionController {
    let mut config = MissionConfig::default();
    config.initial_level = level;
    let mut mission = MissionController::with_config(config);
    mission.start().unwrap();
    mission
}

#[test]
fn mission_opens_on_the_briefing() {
    let props = Props {
        config: None,
        on_game_complete: None,
        on_exit: None,
    };
    let html = block_on(LocalServerRenderer::<WaterSaverMission>::with_props(props).render());
    assert!(html.contains("data-phase=\"pre-game\""));
    assert!(html.contains("Start Mission"));
    assert!(html.contains("Where water is wasted in your home"));
    assert!(!html.contains("mission-board"));
}

#[test]
fn mission_uses_supplied_briefing() {
    let mut config = MissionConfig::default();
    config.briefing.title = "Dry Season Drill".to_string();
    let props = Props {
        config: Some(Rc::new(config)),
        on_game_complete: Some(Callback::noop()),
        on_exit: Some(Callback::noop()),
    };
    let html = block_on(LocalServerRenderer::<WaterSaverMission>::with_props(props).render());
    assert!(html.contains("Dry Season Drill"));
}

#[test]
fn board_shows_metrics_sources_and_messages() {
    let mut mission = running_at(85.0);
    mission.fix_leak("tap").unwrap();
    mission.toggle_choice(ChoiceId::Bucket).unwrap();
    let props = board_props(mission.snapshot());
    let html = block_on(LocalServerRenderer::<MissionBoard>::with_props(props).render());

    assert!(html.contains("85%"));
    assert!(html.contains("height: 85.0%"));
    assert!(html.contains("1/3"));
    assert!(html.contains("0s"));
    assert!(html.contains("✓ Tank Filling Up!"));
    assert!(!html.contains("Tank Running Low"));
    assert!(html.contains("✓ Fixed Kitchen Tap!"));
    assert!(html.contains("💧 Using bucket instead of tap - water saved!"));
    assert!(html.contains("✓ Saving 8L per day"));
    assert!(html.contains("Click for quick 5-minute showers"));
    assert!(html.contains("data-source=\"toilet\""));
    assert!(html.contains("Fill the tank to 90%"));
    assert!(html.contains("Enter Fullscreen"));
}

#[test]
fn board_warns_when_tank_runs_low() {
    let mut mission = running_at(60.0);
    mission.tick();
    let mut props = board_props(mission.snapshot());
    props.fullscreen = true;
    let html = block_on(LocalServerRenderer::<MissionBoard>::with_props(props).render());
    assert!(html.contains("26%"));
    assert!(html.contains("height: 26.0%"));
    assert!(html.contains("1s"));
    assert!(html.contains("⚠️ Tank Running Low!"));
    assert!(html.contains("mission-board--fullscreen"));
    assert!(html.contains("Exit Fullscreen"));
}

#[test]
fn briefing_popup_lists_goals() {
    let props = BriefingProps {
        briefing: Briefing {
            title: "Water Saver Mission".to_string(),
            discover: "Where the drips are".to_string(),
            challenge: "Stop them".to_string(),
            success: "Fill the tank".to_string(),
            ..Briefing::default()
        },
        on_start: Callback::noop(),
        on_cancel: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<BriefingPopup>::with_props(props).render());
    assert!(html.contains("Where the drips are"));
    assert!(html.contains("Stop them"));
    assert!(html.contains("mission-start"));
    assert!(html.contains("mission-cancel"));
}

#[test]
fn result_popup_reports_reward() {
    let won = ResultProps {
        title: AttrValue::from("Water Saver Mission"),
        message: AttrValue::from("You saved water for your village! 💧"),
        success: true,
        reward: Reward {
            coins: 50,
            xp: 100,
        },
        on_replay: Callback::noop(),
        on_exit: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<ResultPopup>::with_props(won).render());
    assert!(html.contains("mission-popup--won"));
    assert!(html.contains("+50 coins"));
    assert!(html.contains("+100 XP"));
    assert!(html.contains("Play Again"));

    let lost = ResultProps {
        title: AttrValue::from("Water Saver Mission"),
        message: AttrValue::from("Tank emptied. Your village needs more water!"),
        success: false,
        reward: Reward { coins: 10, xp: 30 },
        on_replay: Callback::noop(),
        on_exit: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<ResultPopup>::with_props(lost).render());
    assert!(html.contains("mission-popup--lost"));
    assert!(html.contains("Tank emptied."));
    assert!(html.contains("+10 coins"));
}

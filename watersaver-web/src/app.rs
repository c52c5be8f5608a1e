#[cfg(target_arch = "wasm32")]
use crate::components::mission::WaterSaverMission;
#[cfg(target_arch = "wasm32")]
use crate::dom::InlineConfigLoader;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;
#[cfg(target_arch = "wasm32")]
use watersaver_game::{MissionConfig, MissionLoader};
#[cfg(target_arch = "wasm32")]
use yew::prelude::*;

/// Running tally the standalone page keeps across missions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionTally {
    pub played: u32,
    pub won: u32,
    pub xp: u32,
}

impl SessionTally {
    #[must_use]
    pub fn record(self, success: bool, score: u32) -> Self {
        Self {
            played: self.played + 1,
            won: self.won + u32::from(success),
            xp: self.xp.saturating_add(score),
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn load_config() -> MissionConfig {
    InlineConfigLoader::default()
        .load_config()
        .unwrap_or_else(|err| {
            log::error!("Ignoring mission override: {err}");
            MissionConfig::default()
        })
}

#[cfg(target_arch = "wasm32")]
#[function_component(App)]
pub fn app() -> Html {
    let config = use_state(|| Rc::new(load_config()));
    let tally = use_state(SessionTally::default);
    let exited = use_state(|| false);

    let on_game_complete = {
        let tally = tally.clone();
        Callback::from(move |(success, score): (bool, u32)| {
            tally.set(tally.record(success, score));
        })
    };
    let on_exit = {
        let exited = exited.clone();
        Callback::from(move |()| exited.set(true))
    };

    html! {
        <main class="watersaver-app">
            if *exited {
                <p class="watersaver-app__goodbye">{"Thanks for playing! Reload to try again."}</p>
            } else {
                <WaterSaverMission
                    config={Some(Rc::clone(&config))}
                    on_game_complete={on_game_complete}
                    on_exit={on_exit}
                />
            }
            <footer class="watersaver-app__tally">
                { format!("Missions: {} · Won: {} · XP: {}", tally.played, tally.won, tally.xp) }
            </footer>
        </main>
    }
}

use watersaver_game::{ChoiceId, ChoiceView, LeakSource, MissionSnapshot, TankStatus};
use yew::prelude::*;

/// Properties for the in-run mission board
#[derive(Properties, PartialEq, Clone)]
pub struct BoardProps {
    pub snapshot: MissionSnapshot,
    pub title: AttrValue,
    #[prop_or_default]
    pub tagline: AttrValue,
    pub win_level: i32,
    #[prop_or_default]
    pub fullscreen: bool,
    pub on_fix: Callback<String>,
    pub on_toggle: Callback<ChoiceId>,
    pub on_toggle_fullscreen: Callback<()>,
}

#[function_component(MissionBoard)]
pub fn mission_board(props: &BoardProps) -> Html {
    let snap = &props.snapshot;
    let outer = if props.fullscreen {
        "mission-board mission-board--fullscreen"
    } else {
        "mission-board"
    };
    let fullscreen_title = if props.fullscreen {
        "Exit Fullscreen"
    } else {
        "Enter Fullscreen"
    };
    let on_fullscreen = props.on_toggle_fullscreen.reform(|_: MouseEvent| ());

    html! {
        <div class={outer}>
            <div class="mission-board__inner">
                <button
                    type="button"
                    class="mission-board__fullscreen"
                    title={fullscreen_title}
                    aria-pressed={props.fullscreen.to_string()}
                    onclick={on_fullscreen}
                >
                    {"⛶"}
                </button>
                <header class="mission-board__title">
                    <h2>{ format!("💧 {}", props.title) }</h2>
                    <p>{ props.tagline.clone() }</p>
                </header>
                { metrics(snap) }
                { tank(snap) }
                <div class="mission-messages" aria-live="polite">
                    { for snap.notifications.iter().map(|note| html! {
                        <div key={note.id.to_string()} class="mission-messages__item">{ note.text.clone() }</div>
                    }) }
                </div>
                <div class="mission-house">
                    <div class="mission-house__hint">{"🏠 Find and fix the leaks!"}</div>
                    { for snap.sources.iter().map(|source| leak_spot(source, &props.on_fix)) }
                </div>
                <section class="mission-choices">
                    <h3>{"🎯 Smart Water Choices"}</h3>
                    { for snap.choices.iter().map(|choice| choice_button(choice, &props.on_toggle)) }
                </section>
                { how_to_play(props.win_level) }
            </div>
        </div>
    }
}

fn metrics(snap: &MissionSnapshot) -> Html {
    html! {
        <div class="mission-metrics">
            <div class="mission-metrics__cell mission-metrics__cell--level">
                <div class="mission-metrics__value">{ format!("{}%", snap.level_percent) }</div>
                <div class="mission-metrics__label">{"Tank Level"}</div>
            </div>
            <div class="mission-metrics__cell mission-metrics__cell--fixed">
                <div class="mission-metrics__value">{ snap.fixed_label() }</div>
                <div class="mission-metrics__label">{"Leaks Fixed"}</div>
            </div>
            <div class="mission-metrics__cell mission-metrics__cell--time">
                <div class="mission-metrics__value">{ format!("{}s", snap.elapsed_ticks) }</div>
                <div class="mission-metrics__label">{"Time"}</div>
            </div>
        </div>
    }
}

fn tank(snap: &MissionSnapshot) -> Html {
    let fill = format!("height: {:.1}%", snap.level.max(0.0));
    let banner = match snap.tank {
        TankStatus::Low => html! {
            <div class="mission-tank__banner mission-tank__banner--low">{"⚠️ Tank Running Low!"}</div>
        },
        TankStatus::Filling => html! {
            <div class="mission-tank__banner mission-tank__banner--filling">{"✓ Tank Filling Up!"}</div>
        },
        TankStatus::Steady => Html::default(),
    };
    html! {
        <div class="mission-tank">
            <div class="mission-tank__water" style={fill}></div>
            { banner }
        </div>
    }
}

fn leak_spot(source: &LeakSource, on_fix: &Callback<String>) -> Html {
    let id = source.id.clone();
    let onclick = on_fix.reform(move |_: MouseEvent| id.clone());
    let style = format!(
        "left: {}%; top: {}%",
        source.placement.x, source.placement.y
    );
    let class = if source.fixed {
        "mission-leak mission-leak--fixed"
    } else {
        "mission-leak"
    };
    html! {
        <div key={source.id.clone()} class="mission-house__spot" style={style}>
            <button
                type="button"
                class={class}
                data-source={source.id.clone()}
                aria-label={source.name.clone()}
                disabled={source.fixed}
                {onclick}
            >
                if source.is_draining() {
                    <span class="mission-leak__pulse"></span>
                }
                <span class="mission-leak__glyph">{ source.glyph.clone() }</span>
                if source.fixed {
                    <span class="mission-leak__badge">{"✓"}</span>
                }
                <span class="mission-leak__tooltip">
                    { if source.fixed { "✓ Fixed" } else { "Click to fix" } }
                </span>
            </button>
        </div>
    }
}

fn choice_button(choice: &ChoiceView, on_toggle: &Callback<ChoiceId>) -> Html {
    let id = choice.id;
    let onclick = on_toggle.reform(move |_: MouseEvent| id);
    let class = if choice.adopted {
        "mission-choice mission-choice--adopted"
    } else {
        "mission-choice"
    };
    html! {
        <button
            key={choice.id.as_str()}
            type="button"
            class={class}
            data-choice={choice.id.as_str()}
            aria-pressed={choice.adopted.to_string()}
            {onclick}
        >
            <span class="mission-choice__glyph">{ choice.glyph.clone() }</span>
            <span class="mission-choice__text">
                <span class="mission-choice__label">{ choice.label.clone() }</span>
                <span class="mission-choice__hint">{ choice.hint.clone() }</span>
            </span>
            if choice.adopted {
                <span class="mission-choice__check">{"✓"}</span>
            }
        </button>
    }
}

fn how_to_play(win_level: i32) -> Html {
    html! {
        <div class="mission-guide">
            <section class="mission-guide__card">
                <h3>{"🧭 How to Play"}</h3>
                <ul>
                    <li>{"✓ Click on leaks to fix them"}</li>
                    <li>{"✓ Make smart water choices"}</li>
                    <li>{ format!("✓ Fill the tank to {win_level}%") }</li>
                    <li>{"✓ Fix all leaks to win!"}</li>
                </ul>
            </section>
            <section class="mission-guide__card">
                <h3>{"🧠 What You Learn"}</h3>
                <p>
                    {"Saving water saves life. Small actions like fixing leaks and taking short showers have a big impact on your village."}
                </p>
            </section>
        </div>
    }
}

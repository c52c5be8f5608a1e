use watersaver_game::{Briefing, Reward};
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct BriefingProps {
    pub briefing: Briefing,
    pub on_start: Callback<()>,
    pub on_cancel: Callback<()>,
}

/// Instructions shown before the clock starts
#[function_component(BriefingPopup)]
pub fn briefing_popup(props: &BriefingProps) -> Html {
    let b = &props.briefing;
    let on_start = props.on_start.reform(|_: MouseEvent| ());
    let on_cancel = props.on_cancel.reform(|_: MouseEvent| ());
    html! {
        <div class="mission-popup mission-popup--briefing" role="dialog" aria-modal="true" aria-labelledby="mission-briefing-title">
            <div class="mission-popup__card">
                <h2 id="mission-briefing-title">{ b.title.clone() }</h2>
                <dl class="mission-popup__briefing">
                    <dt>{"🔍 Discover"}</dt>
                    <dd>{ b.discover.clone() }</dd>
                    <dt>{"⚡ Challenge"}</dt>
                    <dd>{ b.challenge.clone() }</dd>
                    <dt>{"🏆 Success"}</dt>
                    <dd>{ b.success.clone() }</dd>
                </dl>
                <div class="mission-popup__actions">
                    <button type="button" class="mission-popup__primary" id="mission-start" onclick={on_start}>
                        {"Start Mission"}
                    </button>
                    <button type="button" class="mission-popup__secondary" id="mission-cancel" onclick={on_cancel}>
                        {"Maybe Later"}
                    </button>
                </div>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct ResultProps {
    pub title: AttrValue,
    pub message: AttrValue,
    pub success: bool,
    pub reward: Reward,
    pub on_replay: Callback<()>,
    pub on_exit: Callback<()>,
}

/// Outcome and reward, with replay and exit
#[function_component(ResultPopup)]
pub fn result_popup(props: &ResultProps) -> Html {
    let on_replay = props.on_replay.reform(|_: MouseEvent| ());
    let on_exit = props.on_exit.reform(|_: MouseEvent| ());
    let (class, heading) = if props.success {
        ("mission-popup mission-popup--won", "🎉 Mission Complete!")
    } else {
        ("mission-popup mission-popup--lost", "Mission Failed")
    };
    html! {
        <div class={class} role="dialog" aria-modal="true" aria-labelledby="mission-result-title">
            <div class="mission-popup__card">
                <p class="mission-popup__eyebrow">{ props.title.clone() }</p>
                <h2 id="mission-result-title">{ heading }</h2>
                <p class="mission-popup__message">{ props.message.clone() }</p>
                <div class="mission-popup__rewards">
                    <span class="mission-popup__coins">{ format!("🪙 +{} coins", props.reward.coins) }</span>
                    <span class="mission-popup__xp">{ format!("⭐ +{} XP", props.reward.xp) }</span>
                </div>
                <div class="mission-popup__actions">
                    <button type="button" class="mission-popup__primary" id="mission-replay" onclick={on_replay}>
                        {"Play Again"}
                    </button>
                    <button type="button" class="mission-popup__secondary" id="mission-exit" onclick={on_exit}>
                        {"Exit"}
                    </button>
                </div>
            </div>
        </div>
    }
}

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use watersaver_game::{ClockGuard, MissionConfig, MissionError, MissionLoader};
use web_sys::{Document, Window};

/// Retrieve the global `window` object, if running in a browser.
#[must_use]
pub fn window() -> Option<Window> {
    web_sys::window()
}

/// Retrieve the document object for DOM interactions.
#[must_use]
pub fn document() -> Option<Document> {
    window().and_then(|win| win.document())
}

/// Convert a JavaScript value into a readable string for error reporting.
#[must_use]
pub fn js_error_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|err| err.message().into())
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

/// Log an error message to the browser console.
pub fn console_error(message: &str) {
    web_sys::console::error_1(&JsValue::from(message));
}

fn timeout_ms(ms: u32) -> Result<i32, JsValue> {
    i32::try_from(ms).map_err(|_| JsValue::from_str("timer delay out of range"))
}

/// A running browser interval.
///
/// `cancel` clears the timer and may be handed to the engine. `callback` must
/// outlive every invocation, so it is released separately, after the timer
/// is cleared and outside the callback itself.
pub struct Interval {
    pub cancel: ClockGuard,
    pub callback: Closure<dyn FnMut()>,
}

/// Run `tick` every `ms` milliseconds until `cancel` is dropped.
///
/// # Errors
/// Returns an error if no window is available or the browser refuses the timer.
pub fn set_interval(ms: u32, tick: impl FnMut() + 'static) -> Result<Interval, JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("window unavailable"))?;
    let callback = Closure::wrap(Box::new(tick) as Box<dyn FnMut()>);
    let id = win.set_interval_with_callback_and_timeout_and_arguments_0(
        callback.as_ref().unchecked_ref(),
        timeout_ms(ms)?,
    )?;
    let cancel = ClockGuard::new(move || {
        if let Some(win) = window() {
            win.clear_interval_with_handle(id);
        }
    });
    Ok(Interval { cancel, callback })
}

/// Run `f` once after `ms` milliseconds. The timer is not cancellable.
///
/// # Errors
/// Returns an error if no window is available or the browser refuses the timer.
pub fn set_timeout(ms: u32, f: impl FnOnce() + 'static) -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("window unavailable"))?;
    let closure = Closure::once(f);
    win.set_timeout_with_callback_and_timeout_and_arguments_0(
        closure.as_ref().unchecked_ref(),
        timeout_ms(ms)?,
    )?;
    closure.forget();
    Ok(())
}

/// Reads a mission override from `<script type="application/json" id="...">`
/// and falls back to the embedded mission when the element is absent.
#[derive(Debug, Clone, Copy)]
pub struct InlineConfigLoader {
    pub element_id: &'static str,
}

impl Default for InlineConfigLoader {
    fn default() -> Self {
        Self {
            element_id: "mission-config",
        }
    }
}

impl MissionLoader for InlineConfigLoader {
    type Error = MissionError;

    fn load_config(&self) -> Result<MissionConfig, Self::Error> {
        let text = document()
            .and_then(|doc| doc.get_element_by_id(self.element_id))
            .and_then(|el| el.text_content());
        match text {
            Some(json) if !json.trim().is_empty() => MissionConfig::from_json(&json),
            _ => Ok(MissionConfig::default()),
        }
    }
}


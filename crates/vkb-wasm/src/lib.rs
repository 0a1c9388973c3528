//! WASM bridge for VKB: exposes the touch-to-mouse engine to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. The page forwards its
//! `touchstart`/`touchmove`/`touchend`/`touchcancel` listeners to a
//! `VkbTouchSurface` and calls `advance` whenever `next_deadline` passes
//! (typically from a `setTimeout`). Synthetic events are realized here as
//! DOM `MouseEvent`s; the engine itself never sees a platform event.

use vkb_core::{
    GestureConfig, Millis, ModifierKey, ModifierSnapshot, ModifierStateProvider, Point,
    SyntheticEventSpec, VirtualModifiers,
};
use vkb_touch::{HapticError, PointerHost, TouchEngine, TouchId};
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, MouseEvent, MouseEventInit, Window};

// ─── DOM host ────────────────────────────────────────────────────────────

/// Realizes engine output against the live document.
struct DomHost {
    window: Window,
    document: Document,
    /// Sticky modifier state of the on-screen keyboard.
    modifiers: VirtualModifiers,
}

impl ModifierStateProvider for DomHost {
    fn snapshot(&self) -> ModifierSnapshot {
        self.modifiers.snapshot()
    }
}

impl PointerHost for DomHost {
    type Target = Element;

    fn element_at(&self, at: Point) -> Option<Element> {
        self.document.element_from_point(at.x as f32, at.y as f32)
    }

    fn is_attached(&self, target: &Element) -> bool {
        target.is_connected()
    }

    fn dispatch(&mut self, target: &Element, event: SyntheticEventSpec) {
        let mouse = match build_mouse_event(&self.window, &event) {
            Ok(mouse) => mouse,
            Err(err) => {
                log::warn!("cannot construct {} event: {err:?}", event.kind);
                return;
            }
        };
        if let Err(err) = target.dispatch_event(&mouse) {
            log::warn!("{} listener threw: {err:?}", event.kind);
        }
    }

    fn vibrate(&mut self, duration_ms: Millis) -> Result<(), HapticError> {
        let duration = u32::try_from(duration_ms).unwrap_or(u32::MAX);
        if self.window.navigator().vibrate_with_duration(duration) {
            Ok(())
        } else {
            Err(HapticError::Denied("navigator.vibrate returned false".into()))
        }
    }
}

/// Map a `SyntheticEventSpec` onto `MouseEventInit`. Events bubble and are
/// cancelable, matching what a physical mouse produces.
fn build_mouse_event(window: &Window, event: &SyntheticEventSpec) -> Result<MouseEvent, JsValue> {
    let init = MouseEventInit::new();
    init.set_bubbles(true);
    init.set_cancelable(true);
    init.set_composed(true);
    init.set_view(Some(window));
    init.set_detail(event.detail);
    init.set_client_x(event.x.round() as i32);
    init.set_client_y(event.y.round() as i32);
    init.set_button(event.button);
    init.set_buttons(event.buttons);
    init.set_ctrl_key(event.modifiers.ctrl);
    init.set_alt_key(event.modifiers.alt);
    init.set_shift_key(event.modifiers.shift);
    init.set_meta_key(event.modifiers.meta);
    MouseEvent::new_with_mouse_event_init_dict(event.kind.as_str(), &init)
}

// ─── Surface ─────────────────────────────────────────────────────────────

/// The main WASM-facing touch surface.
///
/// Holds the gesture engine and the DOM host. Each touch method returns
/// the number of mouse events dispatched.
#[wasm_bindgen]
pub struct VkbTouchSurface {
    engine: TouchEngine<Element>,
    host: DomHost,
}

#[wasm_bindgen]
impl VkbTouchSurface {
    /// Create a surface. `options_json` uses the toolkit's camelCase
    /// option names; omitted fields keep their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(options_json: Option<String>) -> Result<VkbTouchSurface, JsValue> {
        // Set up panic hook for better error messages in console
        console_error_panic_hook_setup();
        console_logger_setup();

        let config = match options_json.as_deref() {
            Some(json) => GestureConfig::from_json(json).map_err(to_js_error)?,
            None => GestureConfig::default(),
        };
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("window has no document"))?;

        Ok(Self {
            engine: TouchEngine::new(config),
            host: DomHost {
                window,
                document,
                modifiers: VirtualModifiers::new(),
            },
        })
    }

    pub fn touch_start(&mut self, id: i32, x: f64, y: f64, time_ms: f64) -> u32 {
        let out = self.engine.touch_start(
            &mut self.host,
            touch_id(id),
            Point::new(x, y),
            to_millis(time_ms),
        );
        out.len() as u32
    }

    pub fn touch_move(&mut self, id: i32, x: f64, y: f64, time_ms: f64) -> u32 {
        let out = self.engine.touch_move(
            &mut self.host,
            touch_id(id),
            Point::new(x, y),
            to_millis(time_ms),
        );
        out.len() as u32
    }

    pub fn touch_end(&mut self, id: i32, x: f64, y: f64, time_ms: f64) -> u32 {
        let out = self.engine.touch_end(
            &mut self.host,
            touch_id(id),
            Point::new(x, y),
            to_millis(time_ms),
        );
        out.len() as u32
    }

    pub fn touch_cancel(&mut self, id: i32) -> u32 {
        self.engine.touch_cancel(&mut self.host, touch_id(id)).len() as u32
    }

    /// Release every live touch (e.g. when the keyboard is hidden).
    pub fn cancel_all(&mut self) -> u32 {
        self.engine.cancel_all(&mut self.host).len() as u32
    }

    /// Run timers due at or before `time_ms`.
    pub fn advance(&mut self, time_ms: f64) -> u32 {
        self.engine.advance(&mut self.host, to_millis(time_ms)).len() as u32
    }

    /// When the page should next call `advance`, on the touch clock.
    pub fn next_deadline(&self) -> Option<f64> {
        self.engine.next_deadline().map(|ms| ms as f64)
    }

    pub fn live_touches(&self) -> u32 {
        self.engine.live_sessions() as u32
    }

    // ─── Modifier keys ───────────────────────────────────────────────────

    /// Tap a modifier key on the virtual keyboard (`"Shift"`, `"Control"`,
    /// `"CapsLock"`, ...). Returns whether the key is now active.
    pub fn tap_modifier(&mut self, key: &str) -> Result<bool, JsValue> {
        let key: ModifierKey = key.parse().map_err(|e: String| JsValue::from_str(&e))?;
        Ok(self.host.modifiers.tap(key))
    }

    /// Release latched (one-shot) modifiers after a regular key press.
    pub fn consume_modifiers(&mut self) {
        self.host.modifiers.consume_latched();
    }

    pub fn release_modifiers(&mut self) {
        self.host.modifiers.release_all();
    }

    /// Current modifier state as `{ctrl, alt, shift, meta, capsLock}`.
    pub fn modifier_state(&self) -> Result<JsValue, JsValue> {
        let snapshot = self.host.modifiers.snapshot();
        let state = js_sys::Object::new();
        for (name, active) in [
            ("ctrl", snapshot.ctrl),
            ("alt", snapshot.alt),
            ("shift", snapshot.shift),
            ("meta", snapshot.meta),
            ("capsLock", self.host.modifiers.caps_lock),
        ] {
            js_sys::Reflect::set(&state, &JsValue::from_str(name), &JsValue::from_bool(active))?;
        }
        Ok(state.into())
    }
}

// ─── Private helpers ─────────────────────────────────────────────────────

fn touch_id(id: i32) -> TouchId {
    TouchId(i64::from(id))
}

/// Touch timestamps are fractional milliseconds; the engine works in
/// whole milliseconds.
fn to_millis(time_ms: f64) -> Millis {
    if time_ms.is_finite() && time_ms > 0.0 {
        time_ms.floor() as Millis
    } else {
        0
    }
}

fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("VKB WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

// ─── Console logging ─────────────────────────────────────────────────────

/// Route `log` records (refused haptics, dispatch failures) to the console.
fn console_logger_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_LOGGER: Once = Once::new();
        SET_LOGGER.call_once(|| {
            if let Err(err) = console_log::init_with_level(log::Level::Info) {
                let msg = format!("VKB: console logger not installed: {err}");
                web_sys::console::warn_1(&msg.into());
            }
        });
    }
}

// ─── Standalone validation (no DOM needed) ───────────────────────────────

/// Validate toolkit options. Returns JSON: `{"ok":true,"config":{...}}` with
/// defaults filled in, or `{"ok":false,"error":"..."}`.
#[wasm_bindgen]
pub fn validate_options(options_json: &str) -> String {
    let result = match GestureConfig::from_json(options_json) {
        Ok(config) => serde_json::json!({ "ok": true, "config": config }),
        Err(e) => serde_json::json!({ "ok": false, "error": e.to_string() }),
    };
    result.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn timestamps_floor_to_whole_millis() {
        assert_eq!(to_millis(1234.9), 1234);
        assert_eq!(to_millis(0.4), 0);
        assert_eq!(to_millis(-5.0), 0);
        assert_eq!(to_millis(f64::NAN), 0);
    }

    #[test]
    fn validate_options_fills_defaults() {
        let json: serde_json::Value =
            serde_json::from_str(&validate_options(r#"{"vibrationEnabled": false}"#)).unwrap();
        assert_eq!(json["ok"], true);
        assert_eq!(json["config"]["vibrationEnabled"], false);
        assert_eq!(json["config"]["rightClickThresholdTimeMs"], 800);
    }

    #[test]
    fn validate_options_reports_errors() {
        let json: serde_json::Value =
            serde_json::from_str(&validate_options(r#"{"moveThresholdDistance": -1}"#)).unwrap();
        assert_eq!(json["ok"], false);
        assert!(
            json["error"]
                .as_str()
                .unwrap()
                .contains("moveThresholdDistance")
        );
    }
}

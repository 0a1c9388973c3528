//! Touch-to-mouse gesture translator.
//!
//! Each touch is tracked by a `TouchSession` and classified from elapsed
//! time and displacement alone:
//!
//! | Gesture | Classified when | Emits |
//! |---------|-----------------|-------|
//! | Tap | lifted while still `Pending` | `mousedown`, `mouseup`, `click` (+ `dblclick`) |
//! | Hover move | moved within the drag threshold | `mousemove` with no buttons |
//! | Drag | moved after the drag threshold | `mousedown`, `mousemove`s, `mouseup` |
//! | Right click | held still past the right-click threshold | `mousedown`, `mouseup`, `contextmenu` (button 2) |
//!
//! Every emission goes to the element found under the touch at start,
//! with a modifier snapshot taken at emission time. Timers only run when
//! the host calls [`TouchEngine::advance`].

use crate::correlator::DoubleClickCorrelator;
use crate::host::PointerHost;
use crate::input::TouchInput;
use crate::session::{TimerKind, TimerTask, TouchId, TouchMode, TouchSession};
use crate::timer::TimerQueue;
use crate::vibration::VibrationScheduler;
use smallvec::SmallVec;
use std::collections::BTreeMap;
use vkb_core::event::{
    BUTTON_PRIMARY, BUTTON_SECONDARY, BUTTONS_NONE, BUTTONS_PRIMARY, BUTTONS_SECONDARY,
};
use vkb_core::{EventKind, GestureConfig, Millis, Point, SyntheticEventSpec};

/// Events dispatched by one engine call, in dispatch order.
pub type Emitted = SmallVec<[SyntheticEventSpec; 4]>;

// ─── Event shapes ────────────────────────────────────────────────────────

/// A mouse event before position and modifiers are filled in.
#[derive(Debug, Clone, Copy)]
struct Shape {
    kind: EventKind,
    button: i16,
    buttons: u16,
    detail: i32,
}

const fn shape(kind: EventKind, button: i16, buttons: u16, detail: i32) -> Shape {
    Shape {
        kind,
        button,
        buttons,
        detail,
    }
}

const PRIMARY_DOWN: Shape = shape(EventKind::MouseDown, BUTTON_PRIMARY, BUTTONS_PRIMARY, 0);
const PRIMARY_UP: Shape = shape(EventKind::MouseUp, BUTTON_PRIMARY, BUTTONS_NONE, 0);
const CLICK: Shape = shape(EventKind::Click, BUTTON_PRIMARY, BUTTONS_NONE, 1);
const DBLCLICK: Shape = shape(EventKind::DblClick, BUTTON_PRIMARY, BUTTONS_NONE, 2);
const HOVER_MOVE: Shape = shape(EventKind::MouseMove, BUTTON_PRIMARY, BUTTONS_NONE, 0);
const DRAG_MOVE: Shape = shape(EventKind::MouseMove, BUTTON_PRIMARY, BUTTONS_PRIMARY, 0);
const SECONDARY_DOWN: Shape = shape(EventKind::MouseDown, BUTTON_SECONDARY, BUTTONS_SECONDARY, 0);
const SECONDARY_UP: Shape = shape(EventKind::MouseUp, BUTTON_SECONDARY, BUTTONS_NONE, 0);
const CONTEXT_MENU: Shape = shape(EventKind::ContextMenu, BUTTON_SECONDARY, BUTTONS_NONE, 0);

const TAP: [Shape; 3] = [PRIMARY_DOWN, PRIMARY_UP, CLICK];
const LONG_PRESS: [Shape; 3] = [SECONDARY_DOWN, SECONDARY_UP, CONTEXT_MENU];

/// Build and dispatch one event. A missing or detached target drops the
/// event and nothing else.
fn emit<H: PointerHost>(
    host: &mut H,
    out: &mut Emitted,
    touch: TouchId,
    target: Option<&H::Target>,
    at: Point,
    shape: Shape,
) {
    let Some(target) = target.filter(|t| host.is_attached(t)) else {
        log::debug!("{touch}: dropped {} (no attached target)", shape.kind);
        return;
    };
    let event = SyntheticEventSpec::new(shape.kind, at, host.snapshot())
        .with_button(shape.button, shape.buttons)
        .with_detail(shape.detail);
    host.dispatch(target, event);
    out.push(event);
}

// ─── Engine ──────────────────────────────────────────────────────────────

/// Translates touch samples into synthetic mouse events.
///
/// `T` is the host's target handle type (`PointerHost::Target`).
#[derive(Debug)]
pub struct TouchEngine<T> {
    config: GestureConfig,
    sessions: BTreeMap<TouchId, TouchSession<T>>,
    timers: TimerQueue<TimerTask>,
    correlator: DoubleClickCorrelator,
    vibration: VibrationScheduler,
}

impl<T: Clone> Default for TouchEngine<T> {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

impl<T: Clone> TouchEngine<T> {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            correlator: DoubleClickCorrelator::from_config(&config),
            vibration: VibrationScheduler::from_config(&config),
            sessions: BTreeMap::new(),
            timers: TimerQueue::new(),
            config,
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn session(&self, id: TouchId) -> Option<&TouchSession<T>> {
        self.sessions.get(&id)
    }

    pub fn live_sessions(&self) -> usize {
        self.sessions.len()
    }

    pub fn correlator(&self) -> &DoubleClickCorrelator {
        &self.correlator
    }

    /// Earliest pending timer deadline. Hosts should call `advance` then.
    pub fn next_deadline(&self) -> Option<Millis> {
        self.timers.next_deadline()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Feed one normalized sample.
    pub fn handle<H>(&mut self, host: &mut H, input: TouchInput) -> Emitted
    where
        H: PointerHost<Target = T>,
    {
        match input {
            TouchInput::Start { id, x, y, t } => {
                self.touch_start(host, TouchId(id), Point::new(x, y), t)
            }
            TouchInput::Move { id, x, y, t } => {
                self.touch_move(host, TouchId(id), Point::new(x, y), t)
            }
            TouchInput::End { id, x, y, t } => {
                self.touch_end(host, TouchId(id), Point::new(x, y), t)
            }
            TouchInput::Cancel { id } => self.touch_cancel(host, TouchId(id)),
            TouchInput::Advance { t } => self.advance(host, t),
        }
    }

    /// Begin a session and arm its timers.
    ///
    /// A start for an identifier that is already live first cleans up the
    /// stale session as if it had been cancelled.
    pub fn touch_start<H>(&mut self, host: &mut H, id: TouchId, at: Point, time: Millis) -> Emitted
    where
        H: PointerHost<Target = T>,
    {
        let mut out = Emitted::new();
        if self.sessions.contains_key(&id) {
            log::debug!("{id}: restarted while live, cleaning up");
            self.cancel_session(host, id, &mut out);
        }

        let mut session = TouchSession::new(id, at, time, host.element_at(at));
        for (kind, delay) in [
            (TimerKind::DragAvailable, self.config.drag_threshold_time_ms),
            (TimerKind::RightClick, self.config.right_click_threshold_time_ms),
        ] {
            let handle = self
                .timers
                .schedule(time.saturating_add(delay), TimerTask { touch: id, kind });
            session.timers.set(kind, handle);
        }
        self.vibration.arm(&mut session, &mut self.timers);

        log::trace!("{id}: start at ({}, {}) t={time}", at.x, at.y);
        self.sessions.insert(id, session);
        out
    }

    /// Track movement, classify a pending touch once it leaves the move
    /// threshold, and emit `mousemove` for the current mode.
    pub fn touch_move<H>(&mut self, host: &mut H, id: TouchId, at: Point, time: Millis) -> Emitted
    where
        H: PointerHost<Target = T>,
    {
        let mut out = Emitted::new();
        let Some(session) = self.sessions.get_mut(&id) else {
            log::debug!("{id}: move for unknown session ignored");
            return out;
        };
        session.last = at;

        if session.displacement(at) > self.config.move_threshold_distance {
            session.has_moved = true;
            self.vibration.cancel(session, &mut self.timers);

            if session.mode == TouchMode::Pending {
                let elapsed = session.elapsed(time);
                let mode = TouchMode::classify_motion(elapsed, &self.config);
                session.mode = mode;
                session.timers.cancel_all(&mut self.timers);
                log::trace!("{id}: classified as {mode:?} after {elapsed}ms");

                if mode == TouchMode::Drag {
                    emit(host, &mut out, id, session.target.as_ref(), at, PRIMARY_DOWN);
                }
            }
        }

        match session.mode {
            TouchMode::Move => emit(host, &mut out, id, session.target.as_ref(), at, HOVER_MOVE),
            TouchMode::Drag => emit(host, &mut out, id, session.target.as_ref(), at, DRAG_MOVE),
            TouchMode::Pending | TouchMode::RightClick => {}
        }
        out
    }

    /// Finish a session: release a drag, or resolve a pending touch as a
    /// tap (with double-click correlation).
    pub fn touch_end<H>(&mut self, host: &mut H, id: TouchId, at: Point, time: Millis) -> Emitted
    where
        H: PointerHost<Target = T>,
    {
        let mut out = Emitted::new();
        let Some(mut session) = self.take_session(id) else {
            log::debug!("{id}: end for unknown session ignored");
            return out;
        };
        session.last = at;

        match session.mode {
            TouchMode::Drag => {
                emit(host, &mut out, id, session.target.as_ref(), at, PRIMARY_UP);
            }
            TouchMode::Pending => {
                for shape in TAP {
                    emit(host, &mut out, id, session.target.as_ref(), at, shape);
                }
                if self.correlator.record_and_check(at, time) {
                    let under = host.element_at(at);
                    emit(host, &mut out, id, under.as_ref(), at, DBLCLICK);
                }
            }
            TouchMode::Move | TouchMode::RightClick => {}
        }
        log::trace!("{id}: end as {:?} t={time}", session.mode);
        out
    }

    /// Abort a session, releasing the primary button at the last known
    /// position. Unknown identifiers are ignored, so repeated cancels are
    /// harmless.
    pub fn touch_cancel<H>(&mut self, host: &mut H, id: TouchId) -> Emitted
    where
        H: PointerHost<Target = T>,
    {
        let mut out = Emitted::new();
        self.cancel_session(host, id, &mut out);
        out
    }

    /// Cancel every live session, in identifier order.
    pub fn cancel_all<H>(&mut self, host: &mut H) -> Emitted
    where
        H: PointerHost<Target = T>,
    {
        let mut out = Emitted::new();
        let ids: Vec<TouchId> = self.sessions.keys().copied().collect();
        for id in ids {
            self.cancel_session(host, id, &mut out);
        }
        out
    }

    /// Run every timer due at or before `now`, in deadline order.
    pub fn advance<H>(&mut self, host: &mut H, now: Millis) -> Emitted
    where
        H: PointerHost<Target = T>,
    {
        let mut out = Emitted::new();
        while let Some((handle, deadline, task)) = self.timers.pop_due(now) {
            let Some(session) = self.sessions.get_mut(&task.touch) else {
                log::trace!("{}: timer for ended session ignored", task.touch);
                continue;
            };
            if !session.timers.owns(task.kind, handle) {
                continue;
            }
            session.timers.clear(task.kind);

            match task.kind {
                TimerKind::DragAvailable => {
                    log::trace!("{}: drag available at t={deadline}", session.id);
                }
                TimerKind::Vibrate => {
                    if self.vibration.fire(session, host) {
                        log::trace!("{}: vibrated at t={deadline}", session.id);
                    }
                }
                TimerKind::RightClick => {
                    if session.mode != TouchMode::Pending
                        || session.displacement(session.last) > self.config.move_threshold_distance
                    {
                        continue;
                    }
                    session.mode = TouchMode::RightClick;
                    session.timers.cancel(TimerKind::DragAvailable, &mut self.timers);
                    log::trace!("{}: right click at t={deadline}", session.id);
                    for shape in LONG_PRESS {
                        emit(
                            host,
                            &mut out,
                            session.id,
                            session.target.as_ref(),
                            session.last,
                            shape,
                        );
                    }
                }
            }
        }
        out
    }

    // ─── Private helpers ─────────────────────────────────────────────────

    /// Cancel a session's timers, then remove it.
    fn take_session(&mut self, id: TouchId) -> Option<TouchSession<T>> {
        let session = self.sessions.get_mut(&id)?;
        session.timers.cancel_all(&mut self.timers);
        self.sessions.remove(&id)
    }

    fn cancel_session<H>(&mut self, host: &mut H, id: TouchId, out: &mut Emitted)
    where
        H: PointerHost<Target = T>,
    {
        let Some(session) = self.take_session(id) else {
            log::debug!("{id}: cancel for unknown session ignored");
            return;
        };
        log::trace!("{id}: cancelled as {:?}", session.mode);
        emit(host, out, id, session.target.as_ref(), session.last, PRIMARY_UP);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HapticError;
    use pretty_assertions::assert_eq;
    use vkb_core::{ModifierSnapshot, ModifierStateProvider};

    /// Host with a single full-screen target that can be detached.
    #[derive(Default)]
    struct Screen {
        detached: bool,
        dispatched: Vec<SyntheticEventSpec>,
        pulses: Vec<Millis>,
        modifiers: ModifierSnapshot,
    }

    impl ModifierStateProvider for Screen {
        fn snapshot(&self) -> ModifierSnapshot {
            self.modifiers
        }
    }

    impl PointerHost for Screen {
        type Target = &'static str;

        fn element_at(&self, _at: Point) -> Option<Self::Target> {
            Some("screen")
        }

        fn is_attached(&self, _target: &Self::Target) -> bool {
            !self.detached
        }

        fn dispatch(&mut self, _target: &Self::Target, event: SyntheticEventSpec) {
            self.dispatched.push(event);
        }

        fn vibrate(&mut self, duration_ms: Millis) -> Result<(), HapticError> {
            self.pulses.push(duration_ms);
            Ok(())
        }
    }

    fn shapes(events: &[SyntheticEventSpec]) -> Vec<(EventKind, i16, u16, i32)> {
        events
            .iter()
            .map(|e| (e.kind, e.button, e.buttons, e.detail))
            .collect()
    }

    const ID: TouchId = TouchId(1);

    #[test]
    fn start_arms_three_timers() {
        let mut engine = TouchEngine::default();
        let mut host = Screen::default();
        let out = engine.touch_start(&mut host, ID, Point::new(5.0, 5.0), 1_000);
        assert!(out.is_empty());
        assert_eq!(engine.pending_timers(), 3);
        assert_eq!(engine.next_deadline(), Some(1_400));
        let session = engine.session(ID).unwrap();
        assert_eq!(session.mode, TouchMode::Pending);
        assert_eq!(session.target, Some("screen"));
    }

    #[test]
    fn tap_emits_down_up_click() {
        let mut engine = TouchEngine::default();
        let mut host = Screen::default();
        engine.touch_start(&mut host, ID, Point::new(100.0, 100.0), 0);
        let out = engine.touch_end(&mut host, ID, Point::new(100.0, 100.0), 150);
        assert_eq!(
            shapes(&out),
            vec![
                (EventKind::MouseDown, 0, 1, 0),
                (EventKind::MouseUp, 0, 0, 0),
                (EventKind::Click, 0, 0, 1),
            ]
        );
        assert_eq!(engine.live_sessions(), 0);
        assert_eq!(engine.pending_timers(), 0);
    }

    #[test]
    fn small_jitter_stays_pending() {
        let mut engine = TouchEngine::default();
        let mut host = Screen::default();
        engine.touch_start(&mut host, ID, Point::new(0.0, 0.0), 0);
        let out = engine.touch_move(&mut host, ID, Point::new(6.0, 8.0), 100);
        assert!(out.is_empty(), "displacement 10 is not above the threshold");
        let session = engine.session(ID).unwrap();
        assert_eq!(session.mode, TouchMode::Pending);
        assert!(!session.has_moved);
        assert_eq!(engine.pending_timers(), 3);
    }

    #[test]
    fn drag_press_is_emitted_once() {
        let mut engine = TouchEngine::default();
        let mut host = Screen::default();
        engine.touch_start(&mut host, ID, Point::new(0.0, 0.0), 0);
        let first = engine.touch_move(&mut host, ID, Point::new(20.0, 0.0), 450);
        let second = engine.touch_move(&mut host, ID, Point::new(30.0, 0.0), 500);
        assert_eq!(
            shapes(&first),
            vec![(EventKind::MouseDown, 0, 1, 0), (EventKind::MouseMove, 0, 1, 0)]
        );
        assert_eq!(shapes(&second), vec![(EventKind::MouseMove, 0, 1, 0)]);
        assert_eq!(engine.pending_timers(), 0);
    }

    #[test]
    fn late_move_falls_back_to_hover() {
        let mut engine = TouchEngine::default();
        let mut host = Screen::default();
        engine.touch_start(&mut host, ID, Point::new(0.0, 0.0), 0);
        // Right-click timer has not been run yet.
        let out = engine.touch_move(&mut host, ID, Point::new(40.0, 0.0), 900);
        assert_eq!(shapes(&out), vec![(EventKind::MouseMove, 0, 0, 0)]);
        assert_eq!(engine.session(ID).unwrap().mode, TouchMode::Move);
        assert!(engine.advance(&mut host, 900).is_empty());
    }

    #[test]
    fn right_click_moves_are_silent() {
        let mut engine = TouchEngine::default();
        let mut host = Screen::default();
        engine.touch_start(&mut host, ID, Point::new(0.0, 0.0), 0);
        assert_eq!(engine.advance(&mut host, 800).len(), 3);
        let out = engine.touch_move(&mut host, ID, Point::new(50.0, 0.0), 900);
        assert!(out.is_empty());
        let session = engine.session(ID).unwrap();
        assert_eq!(session.mode, TouchMode::RightClick);
        assert!(session.has_moved);
    }

    #[test]
    fn detached_target_drops_only_that_emission() {
        let mut engine = TouchEngine::default();
        let mut host = Screen::default();
        engine.touch_start(&mut host, ID, Point::new(0.0, 0.0), 0);
        host.detached = true;
        let out = engine.touch_move(&mut host, ID, Point::new(20.0, 0.0), 450);
        assert!(out.is_empty());
        assert_eq!(engine.session(ID).unwrap().mode, TouchMode::Drag);

        host.detached = false;
        let out = engine.touch_end(&mut host, ID, Point::new(20.0, 0.0), 600);
        assert_eq!(shapes(&out), vec![(EventKind::MouseUp, 0, 0, 0)]);
    }

    #[test]
    fn modifiers_are_sampled_per_event() {
        let mut engine = TouchEngine::default();
        let mut host = Screen::default();
        engine.touch_start(&mut host, ID, Point::new(0.0, 0.0), 0);
        engine.touch_move(&mut host, ID, Point::new(20.0, 0.0), 100);
        host.modifiers.shift = true;
        engine.touch_move(&mut host, ID, Point::new(30.0, 0.0), 120);

        let shifts: Vec<bool> = host.dispatched.iter().map(|e| e.modifiers.shift).collect();
        assert_eq!(shifts, vec![false, true]);
    }

    #[test]
    fn restart_cleans_up_stale_session() {
        let mut engine = TouchEngine::default();
        let mut host = Screen::default();
        engine.touch_start(&mut host, ID, Point::new(0.0, 0.0), 0);
        let out = engine.touch_start(&mut host, ID, Point::new(50.0, 50.0), 100);
        assert_eq!(shapes(&out), vec![(EventKind::MouseUp, 0, 0, 0)]);
        assert_eq!(out[0].position(), Point::new(0.0, 0.0));
        assert_eq!(engine.live_sessions(), 1);
        assert_eq!(engine.pending_timers(), 3);
        assert_eq!(engine.session(ID).unwrap().start, Point::new(50.0, 50.0));
    }

    #[test]
    fn cancel_all_releases_every_session() {
        let mut engine = TouchEngine::default();
        let mut host = Screen::default();
        engine.touch_start(&mut host, TouchId(2), Point::new(0.0, 0.0), 0);
        engine.touch_start(&mut host, TouchId(1), Point::new(9.0, 9.0), 0);
        let out = engine.cancel_all(&mut host);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].position(), Point::new(9.0, 9.0), "identifier order");
        assert_eq!(engine.live_sessions(), 0);
        assert_eq!(engine.next_deadline(), None);
    }

    #[test]
    fn handle_routes_samples() {
        let mut engine = TouchEngine::default();
        let mut host = Screen::default();
        engine.handle(&mut host, TouchInput::start(ID, Point::new(1.0, 1.0), 0));
        let out = engine.handle(&mut host, TouchInput::Advance { t: 800 });
        assert_eq!(
            shapes(&out),
            vec![
                (EventKind::MouseDown, 2, 2, 0),
                (EventKind::MouseUp, 2, 0, 0),
                (EventKind::ContextMenu, 2, 0, 0),
            ]
        );
        assert_eq!(host.pulses, vec![30]);
        assert!(engine.handle(&mut host, TouchInput::Cancel { id: 1 }).len() == 1);
        assert!(engine.handle(&mut host, TouchInput::Cancel { id: 1 }).is_empty());
    }
}

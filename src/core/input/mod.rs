//=========================================================================
// Input System
//
// Keyboard and mouse state, fed by the event manager.
//
// Responsibilities:
// - Observe key/mouse/window events at `Priority::MONITOR`
// - Never consume: overlays and game layers still see every event
// - Expose held state and per-frame deltas to gameplay code
//
//=========================================================================

//=== Submodules ==========================================================

mod state_tracker;

pub use state_tracker::StateTracker;

//=== External Dependencies ===============================================

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::event::{
    bind_mut, CursorEntered, CursorLeft, EventManager, FrameEnded, KeyCode, KeyPressed,
    KeyReleased, KeyTyped, Modifiers, ModifiersChanged, MouseButton, MouseMoved, MousePressed,
    MouseReleased, MouseScrolled, MultiHandler, Priority, WindowFocused,
};

//=== InputState ==========================================================

/// Input state kept current by subscribing to engine events.
///
/// Per-frame deltas accumulate until [`FrameEnded`], so frame code reading
/// them from a `FrameStarted` subscriber sees everything since the last
/// frame. Without a platform driving frames, call
/// [`begin_frame`](Self::begin_frame) by hand.
pub struct InputState {
    tracker: Rc<RefCell<StateTracker>>,
    _handlers: MultiHandler,
}

impl InputState {
    /// Subscribes a new tracker to `manager`.
    pub fn new(manager: &EventManager) -> Self {
        let tracker = Rc::new(RefCell::new(StateTracker::new()));
        let mut handlers = MultiHandler::with_priority(manager, Priority::MONITOR);

        handlers.register(bind_mut(&tracker, |t: &mut StateTracker, e: &KeyPressed| {
            t.record_key_down(e.key, e.modifiers);
            false
        }));
        handlers.register(bind_mut(&tracker, |t: &mut StateTracker, e: &KeyReleased| {
            t.record_key_up(e.key, e.modifiers);
            false
        }));
        handlers.register(bind_mut(&tracker, |t: &mut StateTracker, e: &KeyTyped| {
            t.record_text(e.character);
            false
        }));
        handlers.register(bind_mut(&tracker, |t: &mut StateTracker, e: &MousePressed| {
            t.record_button_down(e.button, e.modifiers);
            false
        }));
        handlers.register(bind_mut(&tracker, |t: &mut StateTracker, e: &MouseReleased| {
            t.record_button_up(e.button, e.modifiers);
            false
        }));
        handlers.register(bind_mut(&tracker, |t: &mut StateTracker, e: &MouseMoved| {
            t.record_cursor(e.x, e.y);
            false
        }));
        handlers.register(bind_mut(&tracker, |t: &mut StateTracker, e: &MouseScrolled| {
            t.record_scroll(e.delta_x, e.delta_y);
            false
        }));
        handlers.register(bind_mut(&tracker, |t: &mut StateTracker, _: &CursorEntered| {
            t.record_cursor_inside(true);
            false
        }));
        handlers.register(bind_mut(&tracker, |t: &mut StateTracker, _: &CursorLeft| {
            t.record_cursor_inside(false);
            false
        }));
        handlers.register(bind_mut(&tracker, |t: &mut StateTracker, e: &ModifiersChanged| {
            t.record_modifiers(e.modifiers);
            false
        }));
        handlers.register(bind_mut(&tracker, |t: &mut StateTracker, _: &FrameEnded| {
            t.begin_frame();
            false
        }));
        handlers.register(bind_mut(&tracker, |t: &mut StateTracker, e: &WindowFocused| {
            if !e.focused {
                debug!(target: "input", "Focus lost, releasing held input");
                t.release_all();
            }
            false
        }));

        Self {
            tracker,
            _handlers: handlers,
        }
    }

    /// Clears per-frame deltas.
    pub fn begin_frame(&self) {
        self.tracker.borrow_mut().begin_frame();
    }

    /// Borrow of the full tracker for queries not wrapped below.
    pub fn tracker(&self) -> Ref<'_, StateTracker> {
        self.tracker.borrow()
    }

    //--- Query Methods ----------------------------------------------------

    /// Returns `true` while `key` is held.
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.tracker.borrow().is_key_down(key)
    }

    /// Returns `true` if `key` went down this frame.
    pub fn was_key_pressed(&self, key: KeyCode) -> bool {
        self.tracker.borrow().was_key_pressed(key)
    }

    /// Returns `true` if `key` went up this frame.
    pub fn was_key_released(&self, key: KeyCode) -> bool {
        self.tracker.borrow().was_key_released(key)
    }

    /// Returns `true` while `button` is held.
    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.tracker.borrow().is_button_down(button)
    }

    /// Returns `true` if `button` went down this frame.
    pub fn was_button_pressed(&self, button: MouseButton) -> bool {
        self.tracker.borrow().was_button_pressed(button)
    }

    /// Last cursor position in window coordinates.
    pub fn cursor_position(&self) -> (f32, f32) {
        self.tracker.borrow().cursor_position()
    }

    /// Scroll accumulated this frame.
    pub fn scroll_delta(&self) -> (f32, f32) {
        self.tracker.borrow().scroll_delta()
    }

    /// Current modifier state.
    pub fn modifiers(&self) -> Modifiers {
        self.tracker.borrow().modifiers()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event::{bind, EventTypeId, FrameStarted, Handler};

    fn key_pressed(key: KeyCode) -> KeyPressed {
        KeyPressed { key, modifiers: Modifiers::NONE }
    }

    fn key_released(key: KeyCode) -> KeyReleased {
        KeyReleased { key, modifiers: Modifiers::NONE }
    }

    #[test]
    fn tracks_keys_through_dispatch() {
        let manager = EventManager::new();
        let input = InputState::new(&manager);

        input.begin_frame();
        manager.dispatch(&key_pressed(KeyCode::Space));
        assert!(input.is_key_down(KeyCode::Space));
        assert!(input.was_key_pressed(KeyCode::Space));

        input.begin_frame();
        manager.dispatch(&key_released(KeyCode::Space));
        assert!(!input.is_key_down(KeyCode::Space));
        assert!(input.was_key_released(KeyCode::Space));
    }

    #[test]
    fn observes_events_consumed_by_overlays() {
        let manager = EventManager::new();
        let input = InputState::new(&manager);
        let _overlay = Handler::with_callback(&manager, |_: &MousePressed| true, Priority::HIGH);

        manager.dispatch(&MousePressed {
            button: MouseButton::Left,
            modifiers: Modifiers::CTRL,
        });

        assert!(input.is_button_down(MouseButton::Left));
        assert!(input.was_button_pressed(MouseButton::Left));
        assert_eq!(input.modifiers(), Modifiers::CTRL);
    }

    #[test]
    fn never_consumes() {
        let manager = EventManager::new();
        let _input = InputState::new(&manager);
        let reached = Rc::new(RefCell::new(false));

        let flag = reached.clone();
        let _game = Handler::with_callback(
            &manager,
            move |_: &KeyPressed| {
                *flag.borrow_mut() = true;
                false
            },
            Priority::NORMAL,
        );

        manager.dispatch(&key_pressed(KeyCode::KeyA));
        assert!(*reached.borrow());
    }

    #[test]
    fn tracks_cursor_scroll_and_text() {
        let manager = EventManager::new();
        let input = InputState::new(&manager);

        manager.dispatch(&CursorEntered);
        manager.dispatch(&MouseMoved { x: 12.0, y: 34.0 });
        manager.dispatch(&MouseScrolled { delta_x: 0.0, delta_y: -1.0 });
        manager.dispatch(&KeyTyped { character: 'q' });

        assert_eq!(input.cursor_position(), (12.0, 34.0));
        assert_eq!(input.scroll_delta(), (0.0, -1.0));
        assert_eq!(input.tracker().text(), "q");
        assert!(input.tracker().is_cursor_inside());

        manager.dispatch(&CursorLeft);
        assert!(!input.tracker().is_cursor_inside());
    }

    #[test]
    fn frame_code_sees_deltas_from_before_the_frame() {
        let manager = EventManager::new();
        let input = Rc::new(InputState::new(&manager));
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = seen.clone();
        let _game = Handler::with_callback(
            &manager,
            bind(&input, move |input: &InputState, _: &FrameStarted| {
                sink.borrow_mut().push((
                    input.was_key_pressed(KeyCode::Space),
                    input.scroll_delta(),
                ));
                false
            }),
            Priority::NORMAL,
        );

        manager.dispatch(&key_pressed(KeyCode::Space));
        manager.dispatch(&MouseScrolled { delta_x: 0.0, delta_y: 2.0 });
        manager.dispatch(&FrameStarted { frame: 0 });
        manager.dispatch(&FrameEnded { frame: 0 });
        manager.dispatch(&FrameStarted { frame: 1 });

        assert_eq!(
            *seen.borrow(),
            vec![(true, (0.0, 2.0)), (false, (0.0, 0.0))]
        );
        assert!(input.is_key_down(KeyCode::Space));
    }

    #[test]
    fn consuming_frame_started_does_not_block_reset() {
        let manager = EventManager::new();
        let input = InputState::new(&manager);
        let _greedy = Handler::with_callback(&manager, |_: &FrameStarted| true, Priority::HIGH);

        manager.dispatch(&key_pressed(KeyCode::Enter));
        manager.dispatch(&FrameStarted { frame: 0 });
        assert!(input.was_key_pressed(KeyCode::Enter));

        manager.dispatch(&FrameEnded { frame: 0 });
        assert!(!input.was_key_pressed(KeyCode::Enter));
    }

    #[test]
    fn modifiers_follow_modifier_changes() {
        let manager = EventManager::new();
        let input = InputState::new(&manager);

        manager.dispatch(&KeyPressed { key: KeyCode::KeyC, modifiers: Modifiers::CTRL });
        assert_eq!(input.modifiers(), Modifiers::CTRL);

        manager.dispatch(&ModifiersChanged { modifiers: Modifiers::NONE });
        assert_eq!(input.modifiers(), Modifiers::NONE);
    }

    #[test]
    fn focus_loss_releases_held_keys() {
        let manager = EventManager::new();
        let input = InputState::new(&manager);

        manager.dispatch(&key_pressed(KeyCode::KeyW));
        manager.dispatch(&WindowFocused { focused: false });

        assert!(!input.is_key_down(KeyCode::KeyW));
        assert!(input.was_key_released(KeyCode::KeyW));
    }

    #[test]
    fn dropping_input_state_unsubscribes() {
        let manager = EventManager::new();
        let input = InputState::new(&manager);
        assert!(manager.has_subscribers(EventTypeId::of::<KeyPressed>()));

        drop(input);
        assert!(!manager.has_subscribers(EventTypeId::of::<KeyPressed>()));
        assert!(!manager.has_subscribers(EventTypeId::of::<MouseMoved>()));
    }
}

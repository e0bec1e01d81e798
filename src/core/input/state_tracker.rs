//=========================================================================
// State Tracker
//=========================================================================
//
// Low-level input state tracking with per-frame delta tracking.
//
// Architecture:
//   KeyPressed / MousePressed / ... → record_*() → HashSet (held) → query
//
// Frame lifecycle: begin_frame() → record_*() (during dispatch) → query
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

//=== Internal Dependencies ===============================================

use crate::core::event::{KeyCode, Modifiers, MouseButton};

//=== StateTracker ========================================================

/// Tracks persistent state (keys held) and per-frame deltas (keys pressed/released).
pub struct StateTracker {
    //--- Persistent State (survives frame boundary) ----------------------
    keys_down: HashSet<KeyCode>,
    mouse_buttons_down: HashSet<MouseButton>,
    cursor_position: (f32, f32),
    cursor_inside: bool,
    modifiers: Modifiers,

    //--- Frame Deltas (reset each frame via begin_frame()) ---------------
    keys_pressed_this_frame: HashSet<KeyCode>,
    keys_released_this_frame: HashSet<KeyCode>,
    mouse_buttons_pressed_this_frame: HashSet<MouseButton>,
    mouse_buttons_released_this_frame: HashSet<MouseButton>,
    text_this_frame: String,

    //--- Continuous Input (accumulated) ----------------------------------
    scroll_delta: (f32, f32),
}

impl StateTracker {
    /// Creates a new state tracker with empty state.
    pub fn new() -> Self {
        Self {
            keys_down: HashSet::new(),
            mouse_buttons_down: HashSet::new(),
            cursor_position: (0.0, 0.0),
            cursor_inside: false,
            modifiers: Modifiers::NONE,
            keys_pressed_this_frame: HashSet::new(),
            keys_released_this_frame: HashSet::new(),
            mouse_buttons_pressed_this_frame: HashSet::new(),
            mouse_buttons_released_this_frame: HashSet::new(),
            text_this_frame: String::new(),
            scroll_delta: (0.0, 0.0),
        }
    }

    //--- Frame Processing -------------------------------------------------

    /// Clears frame-specific deltas (pressed/released, text, scroll).
    pub fn begin_frame(&mut self) {
        self.keys_pressed_this_frame.clear();
        self.keys_released_this_frame.clear();
        self.mouse_buttons_pressed_this_frame.clear();
        self.mouse_buttons_released_this_frame.clear();
        self.text_this_frame.clear();
        self.scroll_delta = (0.0, 0.0);
    }

    /// Releases everything held, e.g. when the window loses focus and
    /// release events will never arrive.
    pub fn release_all(&mut self) {
        self.keys_released_this_frame.extend(self.keys_down.drain());
        self.mouse_buttons_released_this_frame
            .extend(self.mouse_buttons_down.drain());
        self.modifiers = Modifiers::NONE;
    }

    //--- Recording --------------------------------------------------------

    pub(super) fn record_key_down(&mut self, key: KeyCode, modifiers: Modifiers) {
        self.modifiers = modifiers;
        // Only mark as pressed if it wasn't already down
        if self.keys_down.insert(key) {
            self.keys_pressed_this_frame.insert(key);
        }
    }

    pub(super) fn record_key_up(&mut self, key: KeyCode, modifiers: Modifiers) {
        self.modifiers = modifiers;
        // Only mark as released if it was actually down
        if self.keys_down.remove(&key) {
            self.keys_released_this_frame.insert(key);
        }
    }

    pub(super) fn record_button_down(&mut self, button: MouseButton, modifiers: Modifiers) {
        self.modifiers = modifiers;
        if self.mouse_buttons_down.insert(button) {
            self.mouse_buttons_pressed_this_frame.insert(button);
        }
    }

    pub(super) fn record_button_up(&mut self, button: MouseButton, modifiers: Modifiers) {
        self.modifiers = modifiers;
        if self.mouse_buttons_down.remove(&button) {
            self.mouse_buttons_released_this_frame.insert(button);
        }
    }

    pub(super) fn record_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    pub(super) fn record_cursor(&mut self, x: f32, y: f32) {
        self.cursor_position = (x, y);
    }

    pub(super) fn record_cursor_inside(&mut self, inside: bool) {
        self.cursor_inside = inside;
    }

    pub(super) fn record_scroll(&mut self, delta_x: f32, delta_y: f32) {
        self.scroll_delta.0 += delta_x;
        self.scroll_delta.1 += delta_y;
    }

    pub(super) fn record_text(&mut self, character: char) {
        self.text_this_frame.push(character);
    }

    //=====================================================================
    // Query API - Keyboard
    //=====================================================================

    /// Returns `true` if key transitioned UP → DOWN this frame.
    pub fn was_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed_this_frame.contains(&key)
    }

    /// Returns `true` while key is held.
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Returns `true` if key transitioned DOWN → UP this frame.
    pub fn was_key_released(&self, key: KeyCode) -> bool {
        self.keys_released_this_frame.contains(&key)
    }

    /// Text typed since the frame began.
    pub fn text(&self) -> &str {
        &self.text_this_frame
    }

    //=====================================================================
    // Query API - Mouse
    //=====================================================================

    /// Like [`was_key_pressed`](Self::was_key_pressed) but for mouse buttons.
    pub fn was_button_pressed(&self, button: MouseButton) -> bool {
        self.mouse_buttons_pressed_this_frame.contains(&button)
    }

    /// Like [`is_key_down`](Self::is_key_down) but for mouse buttons.
    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.mouse_buttons_down.contains(&button)
    }

    /// Like [`was_key_released`](Self::was_key_released) but for mouse buttons.
    pub fn was_button_released(&self, button: MouseButton) -> bool {
        self.mouse_buttons_released_this_frame.contains(&button)
    }

    /// Last cursor position in window coordinates.
    pub fn cursor_position(&self) -> (f32, f32) {
        self.cursor_position
    }

    /// Returns `true` while the cursor is over the window.
    pub fn is_cursor_inside(&self) -> bool {
        self.cursor_inside
    }

    /// Scroll accumulated since the frame began.
    pub fn scroll_delta(&self) -> (f32, f32) {
        self.scroll_delta
    }

    //=====================================================================
    // Query API - Modifiers
    //=====================================================================

    /// Modifier state reported by the most recent key, button or
    /// modifier-change event.
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Returns an iterator over all keys currently held.
    pub fn keys_down(&self) -> impl Iterator<Item = &KeyCode> {
        self.keys_down.iter()
    }

    /// Returns an iterator over all mouse buttons currently held.
    pub fn buttons_down(&self) -> impl Iterator<Item = &MouseButton> {
        self.mouse_buttons_down.iter()
    }
}

//--- Trait Implementations -----------------------------------------------

impl Default for StateTracker {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

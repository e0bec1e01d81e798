//=========================================================================
// Input Translator
//=========================================================================
//
// Converts Winit window events into engine event records and dispatches
// them.
//
// Architecture:
//   WindowEvent → InputTranslator → KeyPressed / MouseMoved / ... → EventManager
//
// Stateful modifier tracking: caches modifier state from ModifiersChanged,
// forwards every change as an engine `ModifiersChanged`, and stamps it on
// every key and button event. Unmapped physical keys
// produce no key event, but their text still produces KeyTyped.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::trace;
use winit::{
    event::{ElementState, KeyEvent, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent},
    keyboard::{KeyCode as WinitKeyCode, ModifiersState, PhysicalKey},
};

//=== Internal Dependencies ===============================================

use crate::core::event::{
    CursorEntered, CursorLeft, EventManager, KeyCode, KeyPressed, KeyReleased, KeyRepeated,
    KeyTyped, Modifiers, ModifiersChanged, MouseButton, MouseMoved, MousePressed, MouseReleased, MouseScrolled,
    WindowClosed, WindowFocused, WindowMoved, WindowResized,
};

/// Pixel scroll deltas (trackpads) are reported to subscribers in lines.
const PIXELS_PER_LINE: f32 = 20.0;

//=== InputTranslator =====================================================

/// Turns Winit events into dispatched engine events.
pub(crate) struct InputTranslator {
    current_modifiers: Modifiers,
}

impl InputTranslator {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new() -> Self {
        Self {
            current_modifiers: Modifiers::NONE,
        }
    }

    //--- Modifier State Management ----------------------------------------

    /// Updates cached modifier state (applied to subsequent events) and
    /// dispatches it, so observers see releases that carry no key event.
    pub(crate) fn update_modifiers(&mut self, state: ModifiersState, events: &EventManager) {
        self.set_modifiers(Modifiers::from(state), events);
    }

    fn set_modifiers(&mut self, modifiers: Modifiers, events: &EventManager) {
        if modifiers == self.current_modifiers {
            return;
        }
        self.current_modifiers = modifiers;
        trace!(target: "platform::input", "Modifiers now {:?}", modifiers);
        events.dispatch(&ModifiersChanged { modifiers });
    }

    //--- Event Processing -------------------------------------------------

    /// Dispatches the engine events corresponding to `event`.
    ///
    /// Returns `false` for window events with no engine counterpart.
    pub(crate) fn translate(&mut self, event: &WindowEvent, events: &EventManager) -> bool {
        match event {
            WindowEvent::ModifiersChanged(modifiers) => {
                self.update_modifiers(modifiers.state(), events);
            }
            WindowEvent::KeyboardInput { event: key_event, .. } => {
                self.key_event(key_event, events);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.mouse_button(*button, *state, events);
            }
            WindowEvent::CursorMoved { position, .. } => {
                events.dispatch(&MouseMoved {
                    x: position.x as f32,
                    y: position.y as f32,
                });
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.scroll(*delta, events);
            }
            WindowEvent::CursorEntered { .. } => events.dispatch(&CursorEntered),
            WindowEvent::CursorLeft { .. } => events.dispatch(&CursorLeft),
            WindowEvent::Resized(size) => {
                events.dispatch(&WindowResized::new(size.width, size.height));
            }
            WindowEvent::Moved(position) => {
                events.dispatch(&WindowMoved {
                    x: position.x,
                    y: position.y,
                });
            }
            WindowEvent::Focused(focused) => {
                if !focused {
                    // Held modifiers are not reported again after focus returns.
                    self.set_modifiers(Modifiers::NONE, events);
                }
                events.dispatch(&WindowFocused { focused: *focused });
            }
            WindowEvent::CloseRequested => events.dispatch(&WindowClosed),
            _ => return false,
        }
        true
    }

    /// Dispatches key press/repeat/release and any typed text.
    pub(crate) fn key_event(&self, key_event: &KeyEvent, events: &EventManager) {
        self.key(
            key_event.physical_key,
            key_event.state,
            key_event.repeat,
            key_event.text.as_deref(),
            events,
        );
    }

    pub(crate) fn key(
        &self,
        physical_key: PhysicalKey,
        state: ElementState,
        repeat: bool,
        text: Option<&str>,
        events: &EventManager,
    ) {
        let key = match physical_key {
            PhysicalKey::Code(code) => KeyCode::from(code),
            PhysicalKey::Unidentified(_) => KeyCode::Unidentified,
        };
        let modifiers = self.current_modifiers;

        if key == KeyCode::Unidentified {
            trace!(target: "platform::input", "Unmapped key ignored");
        } else {
            match (state, repeat) {
                (ElementState::Pressed, false) => events.dispatch(&KeyPressed { key, modifiers }),
                (ElementState::Pressed, true) => events.dispatch(&KeyRepeated { key, modifiers }),
                (ElementState::Released, _) => events.dispatch(&KeyReleased { key, modifiers }),
            }
        }

        if state == ElementState::Pressed {
            for character in text.unwrap_or_default().chars().filter(|c| !c.is_control()) {
                events.dispatch(&KeyTyped { character });
            }
        }
    }

    /// Dispatches a mouse button press or release (with modifiers).
    pub(crate) fn mouse_button(
        &self,
        button: WinitMouseButton,
        state: ElementState,
        events: &EventManager,
    ) {
        let button = MouseButton::from(button);
        let modifiers = self.current_modifiers;

        match state {
            ElementState::Pressed => events.dispatch(&MousePressed { button, modifiers }),
            ElementState::Released => events.dispatch(&MouseReleased { button, modifiers }),
        }
    }

    /// Dispatches a scroll, normalized to lines.
    pub(crate) fn scroll(&self, delta: MouseScrollDelta, events: &EventManager) {
        let (delta_x, delta_y) = match delta {
            MouseScrollDelta::LineDelta(x, y) => (x, y),
            MouseScrollDelta::PixelDelta(position) => (
                position.x as f32 / PIXELS_PER_LINE,
                position.y as f32 / PIXELS_PER_LINE,
            ),
        };

        events.dispatch(&MouseScrolled { delta_x, delta_y });
    }

    //--- Test Accessors ---------------------------------------------------

    #[cfg(test)]
    pub(crate) fn current_modifiers(&self) -> Modifiers {
        self.current_modifiers
    }
}

//=========================================================================
// Winit Conversions
//=========================================================================

/// Winit normalizes platform keys (macOS Option → Alt, Command → Super).
impl From<ModifiersState> for Modifiers {
    fn from(state: ModifiersState) -> Self {
        Self {
            shift: state.shift_key(),
            ctrl: state.control_key(),
            alt: state.alt_key(),
            logo: state.super_key(),
        }
    }
}

impl From<WinitMouseButton> for MouseButton {
    fn from(button: WinitMouseButton) -> Self {
        match button {
            WinitMouseButton::Left => MouseButton::Left,
            WinitMouseButton::Right => MouseButton::Right,
            WinitMouseButton::Middle => MouseButton::Middle,
            WinitMouseButton::Back => MouseButton::Back,
            WinitMouseButton::Forward => MouseButton::Forward,
            WinitMouseButton::Other(index) => MouseButton::Other(index),
        }
    }
}

/// Converts Winit physical key codes to engine key codes.
///
/// Unmapped keys (F13-F24, numpad, media keys) return `KeyCode::Unidentified`.
impl From<WinitKeyCode> for KeyCode {
    fn from(code: WinitKeyCode) -> Self {
        use WinitKeyCode::*;
        match code {
            //--- Digits -------------------------------------------------------

            Digit0 => KeyCode::Digit0, Digit1 => KeyCode::Digit1,
            Digit2 => KeyCode::Digit2, Digit3 => KeyCode::Digit3,
            Digit4 => KeyCode::Digit4, Digit5 => KeyCode::Digit5,
            Digit6 => KeyCode::Digit6, Digit7 => KeyCode::Digit7,
            Digit8 => KeyCode::Digit8, Digit9 => KeyCode::Digit9,

            //--- Letters ------------------------------------------------------

            KeyA => KeyCode::KeyA, KeyB => KeyCode::KeyB, KeyC => KeyCode::KeyC,
            KeyD => KeyCode::KeyD, KeyE => KeyCode::KeyE, KeyF => KeyCode::KeyF,
            KeyG => KeyCode::KeyG, KeyH => KeyCode::KeyH, KeyI => KeyCode::KeyI,
            KeyJ => KeyCode::KeyJ, KeyK => KeyCode::KeyK, KeyL => KeyCode::KeyL,
            KeyM => KeyCode::KeyM, KeyN => KeyCode::KeyN, KeyO => KeyCode::KeyO,
            KeyP => KeyCode::KeyP, KeyQ => KeyCode::KeyQ, KeyR => KeyCode::KeyR,
            KeyS => KeyCode::KeyS, KeyT => KeyCode::KeyT, KeyU => KeyCode::KeyU,
            KeyV => KeyCode::KeyV, KeyW => KeyCode::KeyW, KeyX => KeyCode::KeyX,
            KeyY => KeyCode::KeyY, KeyZ => KeyCode::KeyZ,

            //--- Function Keys ------------------------------------------------

            F1 => KeyCode::F1, F2 => KeyCode::F2, F3 => KeyCode::F3,
            F4 => KeyCode::F4, F5 => KeyCode::F5, F6 => KeyCode::F6,
            F7 => KeyCode::F7, F8 => KeyCode::F8, F9 => KeyCode::F9,
            F10 => KeyCode::F10, F11 => KeyCode::F11, F12 => KeyCode::F12,

            //--- Arrows -------------------------------------------------------

            ArrowUp => KeyCode::ArrowUp,
            ArrowDown => KeyCode::ArrowDown,
            ArrowLeft => KeyCode::ArrowLeft,
            ArrowRight => KeyCode::ArrowRight,

            //--- Editing & Navigation -----------------------------------------

            Space => KeyCode::Space,
            Enter => KeyCode::Enter,
            Escape => KeyCode::Escape,
            Tab => KeyCode::Tab,
            Backspace => KeyCode::Backspace,
            Delete => KeyCode::Delete,
            Insert => KeyCode::Insert,
            Home => KeyCode::Home,
            End => KeyCode::End,
            PageUp => KeyCode::PageUp,
            PageDown => KeyCode::PageDown,

            //--- Modifiers ----------------------------------------------------

            ShiftLeft => KeyCode::ShiftLeft,
            ShiftRight => KeyCode::ShiftRight,
            ControlLeft => KeyCode::ControlLeft,
            ControlRight => KeyCode::ControlRight,
            AltLeft => KeyCode::AltLeft,
            AltRight => KeyCode::AltRight,
            SuperLeft => KeyCode::SuperLeft,
            SuperRight => KeyCode::SuperRight,

            //--- Punctuation --------------------------------------------------

            Backquote => KeyCode::Backquote,
            Minus => KeyCode::Minus,
            Equal => KeyCode::Equal,
            BracketLeft => KeyCode::BracketLeft,
            BracketRight => KeyCode::BracketRight,
            Backslash => KeyCode::Backslash,
            Semicolon => KeyCode::Semicolon,
            Quote => KeyCode::Quote,
            Comma => KeyCode::Comma,
            Period => KeyCode::Period,
            Slash => KeyCode::Slash,

            //--- Unmapped -----------------------------------------------------

            _ => KeyCode::Unidentified,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

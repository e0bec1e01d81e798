//=========================================================================
// Engine Event Types
//
// Plain value records produced by the platform layer and dispatched
// through the `EventManager`. Each record is its own dispatch type, so
// subscribers pick exactly the events they care about.
//
// Event Flow:
// ```text
// Platform Layer (Winit)
//         ↓
//    InputTranslator
//         ↓
//    EventManager::dispatch::<KeyPressed>(..)
//         ↓
//    UI overlay (HIGH) → game layer (NORMAL) → ...
// ```
//
//=========================================================================

//=== MouseButton =========================================================

/// Physical mouse button identifier.
///
/// The `Other` variant covers side buttons, macro buttons, and any
/// non-standard inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button (typically left).
    Left,

    /// Secondary button (typically right).
    Right,

    /// Middle button (wheel click).
    Middle,

    /// Browser-style back button.
    Back,

    /// Browser-style forward button.
    Forward,

    /// Any other button, by platform index.
    Other(u16),
}

//=== KeyCode =============================================================

/// Physical keyboard key identifier.
///
/// Represents the physical key location, not the character produced.
/// Text input arrives separately as [`KeyTyped`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Numeric Keys -----------------------------------------------------

    /// Number row: 0-9
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Alphabetic Keys --------------------------------------------------

    /// Letter keys: A-Z (physical location, not character)
    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Function Keys ----------------------------------------------------

    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,

    //--- Arrow Keys -------------------------------------------------------

    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,

    //--- Editing & Navigation ---------------------------------------------

    Space,
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,
    Insert,
    Home,
    End,
    PageUp,
    PageDown,

    //--- Modifier Keys ----------------------------------------------------

    ShiftLeft,
    ShiftRight,
    ControlLeft,
    ControlRight,
    AltLeft,
    AltRight,
    SuperLeft,
    SuperRight,

    //--- Punctuation ------------------------------------------------------

    Backquote,
    Minus,
    Equal,
    BracketLeft,
    BracketRight,
    Backslash,
    Semicolon,
    Quote,
    Comma,
    Period,
    Slash,

    /// Fallback for keys not explicitly mapped by the platform layer.
    Unidentified,
}

//=== Modifiers ===========================================================

/// Modifier key state at the time an event was produced.
///
/// Left and right variants are not distinguished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    /// Shift key held.
    pub shift: bool,

    /// Ctrl key held.
    pub ctrl: bool,

    /// Alt key held (Option on macOS).
    pub alt: bool,

    /// Super key held (Command on macOS, Windows key elsewhere).
    pub logo: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        logo: false,
    };

    /// Shift only.
    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    /// Ctrl only.
    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };

    /// Alt only.
    pub const ALT: Self = Self {
        alt: true,
        ..Self::NONE
    };

    /// Super only.
    pub const LOGO: Self = Self {
        logo: true,
        ..Self::NONE
    };

    /// Returns true if no modifier is held.
    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

//=== Mouse Events ========================================================

/// A mouse button went down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MousePressed {
    pub button: MouseButton,
    pub modifiers: Modifiers,
}

/// A mouse button was released.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseReleased {
    pub button: MouseButton,
    pub modifiers: Modifiers,
}

/// The cursor moved. Window coordinates, pixels, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseMoved {
    pub x: f32,
    pub y: f32,
}

/// Wheel or trackpad scroll, in lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseScrolled {
    pub delta_x: f32,
    pub delta_y: f32,
}

/// The cursor entered the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorEntered;

/// The cursor left the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorLeft;

//=== Keyboard Events =====================================================

/// A key went down (first press, not auto-repeat).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPressed {
    pub key: KeyCode,
    pub modifiers: Modifiers,
}

/// A held key produced an auto-repeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyRepeated {
    pub key: KeyCode,
    pub modifiers: Modifiers,
}

/// A key was released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyReleased {
    pub key: KeyCode,
    pub modifiers: Modifiers,
}

/// The set of held modifier keys changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModifiersChanged {
    pub modifiers: Modifiers,
}

/// Text input: one character produced by the keyboard layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyTyped {
    pub character: char,
}

//=== Window Events =======================================================

/// The window's drawable area changed size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowResized {
    pub width: u32,
    pub height: u32,
    pub aspect_ratio: f32,
}

impl WindowResized {
    /// Builds the event, deriving `aspect_ratio` (0.0 for a zero height,
    /// e.g. a minimized window).
    pub fn new(width: u32, height: u32) -> Self {
        let aspect_ratio = if height == 0 {
            0.0
        } else {
            width as f32 / height as f32
        };

        Self {
            width,
            height,
            aspect_ratio,
        }
    }
}

/// The window moved. Desktop coordinates of the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowMoved {
    pub x: i32,
    pub y: i32,
}

/// The window gained or lost input focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowFocused {
    pub focused: bool,
}

/// The user or OS asked to close the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowClosed;

//=== Frame Events ========================================================

/// A new frame began. Dispatched before queued events are pumped.
///
/// Per-frame input deltas (presses, releases, text, scroll) gathered since
/// the previous frame are readable here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameStarted {
    /// Frames started since the window was created, starting at 0.
    pub frame: u64,
}

/// The frame is over. Dispatched after queued events are pumped; per-frame
/// input deltas are reset here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameEnded {
    /// Same index as the matching [`FrameStarted`].
    pub frame: u64,
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_resized_computes_aspect_ratio() {
        let event = WindowResized::new(1920, 1080);
        assert_eq!(event.width, 1920);
        assert_eq!(event.height, 1080);
        assert!((event.aspect_ratio - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn window_resized_zero_height_has_zero_ratio() {
        let event = WindowResized::new(800, 0);
        assert_eq!(event.aspect_ratio, 0.0);
    }

    #[test]
    fn modifiers_default_is_none() {
        assert_eq!(Modifiers::default(), Modifiers::NONE);
        assert!(Modifiers::NONE.is_empty());
        assert!(!Modifiers::CTRL.is_empty());
    }

    #[test]
    fn modifier_constants_set_single_flag() {
        assert!(Modifiers::SHIFT.shift && !Modifiers::SHIFT.ctrl);
        assert!(Modifiers::CTRL.ctrl && !Modifiers::CTRL.alt);
        assert!(Modifiers::ALT.alt && !Modifiers::ALT.logo);
        assert!(Modifiers::LOGO.logo && !Modifiers::LOGO.shift);
    }

    #[test]
    fn key_events_compare_by_payload() {
        let a = KeyPressed { key: KeyCode::KeyA, modifiers: Modifiers::NONE };
        let b = KeyPressed { key: KeyCode::KeyA, modifiers: Modifiers::CTRL };
        assert_ne!(a, b);
        assert_eq!(a, KeyPressed { key: KeyCode::KeyA, modifiers: Modifiers::NONE });
    }
}

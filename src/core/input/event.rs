//=========================================================================
// Input Event Types
//
// Platform-neutral representation of keyboard and mouse input.
//
// Platform backends translate their native events into `InputEvent` and
// deliver them to the shell as `PlatformMessage::Input`; the shell hands
// them to the input collaborator between frames.
//
// Event Flow:
// ```text
// Platform (winit / headless)
//         ↓
//    InputEvent (this module)
//         ↓
//    InputSubsystem::handle_event
//         ↓
//    StateTracker (committed on frame())
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
    Left,
    Right,
    Middle,
    Other,
}

//=== KeyCode =============================================================

/// Physical keyboard key identifier.
///
/// Represents the physical key location, not the character produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Numeric Keys -----------------------------------------------------

    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Alphabetic Keys --------------------------------------------------

    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Arrow Keys -------------------------------------------------------

    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,

    //--- Special Keys -----------------------------------------------------

    Space,
    Enter,
    /// Quits the run loop while held.
    Escape,
    Tab,
    Backspace,
    Delete,

    /// Key the platform reported but the input layer does not map.
    Unidentified,
}

//=== Modifiers ===========================================================

/// Modifier key state (Shift, Ctrl, Alt).
///
/// Left and right variants are not distinguished. Ctrl covers Command on
/// macOS and Alt covers Option.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self { shift: false, ctrl: false, alt: false };
    pub const SHIFT: Self = Self { shift: true, ctrl: false, alt: false };
    pub const CTRL: Self = Self { shift: false, ctrl: true, alt: false };
    pub const ALT: Self = Self { shift: false, ctrl: false, alt: true };
}

//=== InputEvent ==========================================================

/// Low-level input event from the platform layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown {
        key: KeyCode,
        modifiers: Modifiers,
    },

    KeyUp {
        key: KeyCode,
        modifiers: Modifiers,
    },

    MouseButtonDown {
        button: MouseButton,
        modifiers: Modifiers,
    },

    MouseButtonUp {
        button: MouseButton,
        modifiers: Modifiers,
    },

    /// Cursor moved to a new position.
    ///
    /// Coordinates are window-relative pixels with a top-left origin.
    MouseMoved { x: f32, y: f32 },

    /// Wheel rotated.
    ///
    /// `delta` is in wheel units, [`WHEEL_DELTA`] per detent; positive
    /// values scroll away from the user.
    MouseWheel { delta: f32 },

    /// Unrecognized event, ignored by the input layer.
    Unidentified,
}

/// Wheel units reported for one detent of a notched mouse wheel.
pub const WHEEL_DELTA: f32 = 120.0;

impl InputEvent {
    /// Returns `true` for key and button transitions.
    pub fn is_discrete(&self) -> bool {
        matches!(
            self,
            Self::KeyDown { .. }
                | Self::KeyUp { .. }
                | Self::MouseButtonDown { .. }
                | Self::MouseButtonUp { .. }
        )
    }

    /// Modifier state attached to the event, if it carries one.
    pub fn modifiers(&self) -> Option<Modifiers> {
        match self {
            Self::KeyDown { modifiers, .. }
            | Self::KeyUp { modifiers, .. }
            | Self::MouseButtonDown { modifiers, .. }
            | Self::MouseButtonUp { modifiers, .. } => Some(*modifiers),
            _ => None,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discrete_classification() {
        assert!(InputEvent::KeyDown { key: KeyCode::KeyA, modifiers: Modifiers::NONE }.is_discrete());
        assert!(InputEvent::MouseButtonUp { button: MouseButton::Left, modifiers: Modifiers::NONE }.is_discrete());
        assert!(!InputEvent::MouseMoved { x: 1.0, y: 2.0 }.is_discrete());
        assert!(!InputEvent::MouseWheel { delta: WHEEL_DELTA }.is_discrete());
        assert!(!InputEvent::Unidentified.is_discrete());
    }

    #[test]
    fn modifiers_only_on_discrete_events() {
        let event = InputEvent::KeyUp { key: KeyCode::KeyS, modifiers: Modifiers::CTRL };
        assert_eq!(event.modifiers(), Some(Modifiers::CTRL));
        assert_eq!(InputEvent::MouseMoved { x: 0.0, y: 0.0 }.modifiers(), None);
    }

    #[test]
    fn modifiers_default_is_none() {
        assert_eq!(Modifiers::default(), Modifiers::NONE);
    }

    #[test]
    fn events_compare_by_payload() {
        let a = InputEvent::MouseMoved { x: 1.0, y: 2.0 };
        let b = InputEvent::MouseMoved { x: 1.0, y: 3.0 };
        assert_ne!(a, b);
        assert_eq!(a, InputEvent::MouseMoved { x: 1.0, y: 2.0 });
    }
}

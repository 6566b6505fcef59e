//=========================================================================
// State Tracker
//=========================================================================
//
// Keyboard and mouse state with per-frame transitions.
//
// Architecture:
//   InputEvent → process_events() → HashSet (keys/buttons held) → query
//
// Frame lifecycle: begin_frame() → process_events() → end_frame() → query
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::collections::HashSet;

//=== Internal Dependencies ===============================================

use super::event::{InputEvent, KeyCode, Modifiers, MouseButton};

//=== StateTracker ========================================================

/// Tracks held keys/buttons, their per-frame transitions, the pointer
/// and the wheel movement accumulated during the current frame.
#[derive(Debug, Default)]
pub struct StateTracker {
    //--- Persistent State (survives frame boundary) ----------------------
    keys_down: HashSet<KeyCode>,
    buttons_down: HashSet<MouseButton>,
    pointer: (f32, f32),
    modifiers: Modifiers,

    //--- Frame Deltas (reset by begin_frame()) ---------------------------
    keys_pressed: HashSet<KeyCode>,
    keys_released: HashSet<KeyCode>,
    buttons_pressed: HashSet<MouseButton>,
    buttons_released: HashSet<MouseButton>,
    wheel_accumulator: f32,

    //--- Frame Results (computed by end_frame()) -------------------------
    wheel_delta: f32,
    pointer_delta: (f32, f32),
    frame_start_pointer: (f32, f32),
}

impl StateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Frame Processing -------------------------------------------------

    /// Clears the previous frame's transitions.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();
        self.wheel_accumulator = 0.0;
        self.frame_start_pointer = self.pointer;
    }

    pub fn process_events(&mut self, events: &[InputEvent]) {
        for event in events {
            self.process_event(event);
        }
    }

    /// Publishes the frame's wheel and pointer movement.
    pub fn end_frame(&mut self) {
        self.wheel_delta = self.wheel_accumulator;
        self.pointer_delta = (
            self.pointer.0 - self.frame_start_pointer.0,
            self.pointer.1 - self.frame_start_pointer.1,
        );
    }

    /// Drops all held state (e.g. when the window loses focus).
    pub fn reset(&mut self) {
        *self = Self {
            pointer: self.pointer,
            frame_start_pointer: self.pointer,
            ..Self::default()
        };
    }

    fn process_event(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::KeyDown { key, modifiers } => {
                self.modifiers = modifiers;
                if self.keys_down.insert(key) {
                    self.keys_pressed.insert(key);
                }
            }
            InputEvent::KeyUp { key, modifiers } => {
                self.modifiers = modifiers;
                if self.keys_down.remove(&key) {
                    self.keys_released.insert(key);
                }
            }
            InputEvent::MouseButtonDown { button, modifiers } => {
                self.modifiers = modifiers;
                if self.buttons_down.insert(button) {
                    self.buttons_pressed.insert(button);
                }
            }
            InputEvent::MouseButtonUp { button, modifiers } => {
                self.modifiers = modifiers;
                if self.buttons_down.remove(&button) {
                    self.buttons_released.insert(button);
                }
            }
            InputEvent::MouseMoved { x, y } => {
                self.pointer = (x, y);
            }
            InputEvent::MouseWheel { delta } => {
                self.wheel_accumulator += delta;
            }
            InputEvent::Unidentified => {}
        }
    }

    //=====================================================================
    // Query API
    //=====================================================================

    /// `true` while the key is held.
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// `true` only in the frame the key went down.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    pub fn is_key_released(&self, key: KeyCode) -> bool {
        self.keys_released.contains(&key)
    }

    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.buttons_pressed.contains(&button)
    }

    pub fn is_button_released(&self, button: MouseButton) -> bool {
        self.buttons_released.contains(&button)
    }

    /// Pointer position in window pixels (top-left origin).
    pub fn pointer(&self) -> (f32, f32) {
        self.pointer
    }

    /// Pointer movement over the last completed frame.
    pub fn pointer_delta(&self) -> (f32, f32) {
        self.pointer_delta
    }

    /// Wheel movement over the last completed frame, in wheel units.
    pub fn wheel_delta(&self) -> f32 {
        self.wheel_delta
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

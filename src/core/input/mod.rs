//=========================================================================
// Input
//
// Keyboard/mouse input collaborator fed from the platform message stream.
//
// Responsibilities:
// - Queue translated platform input between frames
// - Commit queued input into the `StateTracker` on `frame()`
// - Answer the shell's per-frame queries (escape, pointer, buttons)
//
// Notes:
// Events arriving between two `frame()` calls become visible together,
// so every query made during one frame sees the same state.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod event;
pub mod state_tracker;

//=== External Crates =====================================================

use log::{debug, info, trace};

//=== Internal Imports ====================================================

use crate::core::error::SubsystemError;
use crate::core::subsystem::{InputSubsystem, PointerLocation, Subsystem};

pub use event::{InputEvent, KeyCode, Modifiers, MouseButton, WHEEL_DELTA};
pub use state_tracker::StateTracker;

//=== KeyboardMouseInput ==================================================

/// Input collaborator backed by a [`StateTracker`].
///
/// Works with any platform window type; it only needs the surface size
/// to clamp the pointer.
#[derive(Debug, Default)]
pub struct KeyboardMouseInput {
    tracker: StateTracker,
    pending: Vec<InputEvent>,
    bounds: Option<(u32, u32)>,
    frames: u64,
}

impl KeyboardMouseInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access to the committed input state.
    pub fn state(&self) -> &StateTracker {
        &self.tracker
    }

    /// Number of frames committed since initialization.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    fn clamp_pointer(&self, (x, y): (f32, f32)) -> (i32, i32) {
        let (width, height) = self.bounds.unwrap_or((0, 0));
        let x = (x.round() as i64).clamp(0, i64::from(width)) as i32;
        let y = (y.round() as i64).clamp(0, i64::from(height)) as i32;
        (x, y)
    }
}

//--- Subsystem -----------------------------------------------------------

impl Subsystem for KeyboardMouseInput {
    const NAME: &'static str = "input";

    fn shutdown(&mut self) {
        if self.bounds.take().is_some() {
            info!(target: "input", "Input shut down after {} frames", self.frames);
        }
        self.pending.clear();
        self.tracker = StateTracker::new();
    }
}

//--- InputSubsystem ------------------------------------------------------

impl<W: ?Sized> InputSubsystem<W> for KeyboardMouseInput {
    fn initialize(&mut self, _window: &W, width: u32, height: u32) -> Result<(), SubsystemError> {
        if width == 0 || height == 0 {
            return Err(SubsystemError::new(format!(
                "input surface has zero area ({}x{})",
                width, height
            )));
        }

        self.bounds = Some((width, height));
        self.frames = 0;
        info!(target: "input", "Input initialized for {}x{} surface", width, height);
        Ok(())
    }

    fn frame(&mut self) -> Result<(), SubsystemError> {
        if self.bounds.is_none() {
            return Err(SubsystemError::new("input frame before initialization"));
        }

        self.tracker.begin_frame();
        self.tracker.process_events(&self.pending);
        self.tracker.end_frame();

        if !self.pending.is_empty() {
            trace!(target: "input", "Committed {} events", self.pending.len());
            self.pending.clear();
        }

        self.frames += 1;
        Ok(())
    }

    fn is_escape_pressed(&self) -> bool {
        self.tracker.is_key_down(KeyCode::Escape)
    }

    fn pointer_location(&self) -> PointerLocation {
        let (x, y) = self.clamp_pointer(self.tracker.pointer());
        PointerLocation {
            x,
            y,
            wheel_delta: self.tracker.wheel_delta().round() as i32,
        }
    }

    fn is_left_button_pressed(&self) -> bool {
        self.tracker.is_button_down(MouseButton::Left)
    }

    fn is_right_button_pressed(&self) -> bool {
        self.tracker.is_button_down(MouseButton::Right)
    }

    fn handle_event(&mut self, event: &InputEvent) {
        if matches!(event, InputEvent::Unidentified) {
            debug!(target: "input", "Dropping unidentified event");
            return;
        }
        self.pending.push(*event);
    }

    fn focus_lost(&mut self) {
        debug!(target: "input", "Focus lost, releasing held input");
        self.pending.clear();
        self.tracker.reset();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

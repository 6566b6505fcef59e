//=========================================================================
// Collaborator Interfaces
//=========================================================================
//
// Narrow contracts between the shell and its two collaborators.
//
// Architecture:
// ```text
//   Shell ──owns──> SubsystemHandle<I: InputSubsystem>
//         ──owns──> SubsystemHandle<G: GraphicsSubsystem>
//
//   per frame:  input.frame() → pointer_location() + PressState
//                             → graphics.frame(&FrameInput)
// ```
//
// `SubsystemHandle` is the exclusive owner of a collaborator; dropping it
// runs the collaborator's `shutdown()` exactly once.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::ops::{Deref, DerefMut};

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::error::SubsystemError;
use crate::core::input::event::InputEvent;

//=== Subsystem ===========================================================

/// Common teardown contract for shell collaborators.
pub trait Subsystem {
    /// Name used in log output.
    const NAME: &'static str;

    /// Releases all resources held by the collaborator.
    ///
    /// Called once by [`SubsystemHandle`] when the collaborator is
    /// released, including after a failed `initialize()`.
    fn shutdown(&mut self);
}

//=== InputSubsystem ======================================================

/// Input collaborator consumed by the shell.
///
/// `W` is the platform window type lent during initialization.
pub trait InputSubsystem<W: ?Sized>: Subsystem {
    fn initialize(&mut self, window: &W, width: u32, height: u32) -> Result<(), SubsystemError>;

    /// Advances the input state by one tick.
    fn frame(&mut self) -> Result<(), SubsystemError>;

    fn is_escape_pressed(&self) -> bool;

    fn pointer_location(&self) -> PointerLocation;

    fn is_left_button_pressed(&self) -> bool;

    fn is_right_button_pressed(&self) -> bool;

    /// Receives translated platform input between frames.
    ///
    /// Collaborators that read devices directly can ignore this.
    fn handle_event(&mut self, _event: &InputEvent) {}

    /// Called when the window loses keyboard focus. Held keys and buttons
    /// will get no release events until focus returns.
    fn focus_lost(&mut self) {}
}

//=== GraphicsSubsystem ===================================================

/// Rendering collaborator consumed by the shell.
pub trait GraphicsSubsystem<W: ?Sized>: Subsystem {
    fn initialize(&mut self, width: u32, height: u32, window: &W) -> Result<(), SubsystemError>;

    /// Renders one frame for the given input snapshot.
    fn frame(&mut self, input: &FrameInput) -> Result<(), SubsystemError>;
}

//=== PointerLocation =====================================================

/// Pointer position in window pixels plus wheel movement this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointerLocation {
    pub x: i32,
    pub y: i32,
    pub wheel_delta: i32,
}

//=== PressState ==========================================================

/// Mouse press signal forwarded to graphics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PressState {
    #[default]
    None,
    Left,
    Right,
}

impl PressState {
    /// Resolves the press state with left-over-right priority.
    ///
    /// `right` is only evaluated when `left` is false.
    pub fn resolve(left: bool, right: impl FnOnce() -> bool) -> Self {
        if left {
            Self::Left
        } else if right() {
            Self::Right
        } else {
            Self::None
        }
    }
}

//=== FrameInput ==========================================================

/// Per-frame snapshot handed to the graphics collaborator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub x: i32,
    pub y: i32,
    pub wheel_delta: i32,
    pub press: PressState,
}

impl FrameInput {
    pub fn new(pointer: PointerLocation, press: PressState) -> Self {
        Self {
            x: pointer.x,
            y: pointer.y,
            wheel_delta: pointer.wheel_delta,
            press,
        }
    }
}

//=== SubsystemHandle =====================================================

/// Exclusive owner of a collaborator that shuts it down on drop.
pub struct SubsystemHandle<T: Subsystem> {
    inner: T,
}

impl<T: Subsystem> SubsystemHandle<T> {
    pub fn new(inner: T) -> Self {
        debug!(target: "shell", "Acquired {} subsystem", T::NAME);
        Self { inner }
    }
}

impl<T: Subsystem> Deref for SubsystemHandle<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner
    }
}

impl<T: Subsystem> DerefMut for SubsystemHandle<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.inner
    }
}

impl<T: Subsystem> Drop for SubsystemHandle<T> {
    fn drop(&mut self) {
        debug!(target: "shell", "Releasing {} subsystem", T::NAME);
        self.inner.shutdown();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

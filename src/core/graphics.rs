//=========================================================================
// Null Graphics
//=========================================================================
//
// Headless graphics collaborator.
//
// Validates the surface it is given, counts frames and remembers the last
// input snapshot. Lets the shell run end-to-end without a GPU backend;
// real renderers implement `GraphicsSubsystem` the same way.
//
//=========================================================================

use log::{info, trace};

use crate::core::error::SubsystemError;
use crate::core::subsystem::{FrameInput, GraphicsSubsystem, PressState, Subsystem};

//=== NullGraphics ========================================================

#[derive(Debug, Default)]
pub struct NullGraphics {
    surface: Option<(u32, u32)>,
    frames: u64,
    last_input: Option<FrameInput>,
}

impl NullGraphics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn last_input(&self) -> Option<&FrameInput> {
        self.last_input.as_ref()
    }

    pub fn surface_size(&self) -> Option<(u32, u32)> {
        self.surface
    }
}

impl Subsystem for NullGraphics {
    const NAME: &'static str = "graphics";

    fn shutdown(&mut self) {
        if self.surface.take().is_some() {
            info!(target: "graphics", "Graphics shut down after {} frames", self.frames);
        }
        self.last_input = None;
    }
}

impl<W: ?Sized> GraphicsSubsystem<W> for NullGraphics {
    fn initialize(&mut self, width: u32, height: u32, _window: &W) -> Result<(), SubsystemError> {
        if width == 0 || height == 0 {
            return Err(SubsystemError::new(format!(
                "cannot create a {}x{} render surface",
                width, height
            )));
        }

        self.surface = Some((width, height));
        self.frames = 0;
        info!(target: "graphics", "Null graphics initialized ({}x{})", width, height);
        Ok(())
    }

    fn frame(&mut self, input: &FrameInput) -> Result<(), SubsystemError> {
        if self.surface.is_none() {
            return Err(SubsystemError::new("graphics frame before initialization"));
        }

        if input.press != PressState::None || input.wheel_delta != 0 {
            trace!(
                target: "graphics",
                "Frame {}: pointer ({}, {}) wheel {} press {:?}",
                self.frames, input.x, input.y, input.wheel_delta, input.press
            );
        }

        self.frames += 1;
        self.last_input = Some(*input);
        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

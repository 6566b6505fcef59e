//=========================================================================
// Frame Dispatcher
//=========================================================================
//
// One tick of per-frame work:
//
//   input.frame() ──fail──> error, graphics untouched
//        │
//        ├─ pointer_location()
//        ├─ PressState (left wins; right not queried when left is down)
//        ↓
//   graphics.frame(&FrameInput) ──> result propagated as-is
//
//=========================================================================

use log::trace;

use crate::core::error::ShellError;
use crate::core::subsystem::{FrameInput, GraphicsSubsystem, InputSubsystem, PressState};

/// Runs one frame and returns the snapshot handed to graphics.
pub(crate) fn dispatch<W, I, G>(input: &mut I, graphics: &mut G) -> Result<FrameInput, ShellError>
where
    W: ?Sized,
    I: InputSubsystem<W>,
    G: GraphicsSubsystem<W>,
{
    input.frame().map_err(ShellError::InputFrame)?;

    let pointer = input.pointer_location();
    let press = PressState::resolve(input.is_left_button_pressed(), || input.is_right_button_pressed());
    let snapshot = FrameInput::new(pointer, press);

    trace!(target: "shell::frame", "Dispatching {:?}", snapshot);

    graphics.frame(&snapshot).map_err(ShellError::GraphicsFrame)?;
    Ok(snapshot)
}

//=========================================================================
// Unit Tests
//=========================================================================

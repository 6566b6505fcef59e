//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use aetheric_shell::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Shell lifecycle
pub use crate::shell::{ExitReason, Shell, ShellBuilder};

// Configuration and errors
pub use crate::core::config::ShellConfig;
pub use crate::core::error::{PlatformError, ShellError, SubsystemError};

// Collaborator contracts
pub use crate::core::subsystem::{
    FrameInput, GraphicsSubsystem, InputSubsystem, PointerLocation, PressState, Subsystem,
};

// Bundled collaborators
pub use crate::core::graphics::NullGraphics;
pub use crate::core::input::{InputEvent, KeyCode, KeyboardMouseInput, Modifiers, MouseButton};

// Platform
pub use crate::platform::{Platform, PlatformMessage};

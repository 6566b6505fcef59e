//=========================================================================
// Core
//
// Platform-independent building blocks of the shell.
//
// Responsibilities:
// - Collaborator contracts (`subsystem`) and their ownership guard
// - Error taxonomy (`error`) and configuration (`config`)
// - Window geometry resolution (`geometry`)
// - The bundled input and headless graphics collaborators
//
// Nothing in this module touches the OS; platform backends live in
// `crate::platform`.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod config;
pub mod error;
pub mod geometry;
pub mod graphics;
pub mod input;
pub mod subsystem;

//=== Public API ==========================================================

pub use config::{ConfigError, ShellConfig};
pub use error::{PlatformError, ShellError, SubsystemError};
pub use geometry::{DisplayMode, WindowGeometry};
pub use graphics::NullGraphics;
pub use input::KeyboardMouseInput;
pub use subsystem::{
    FrameInput, GraphicsSubsystem, InputSubsystem, PointerLocation, PressState, Subsystem,
    SubsystemHandle,
};

//=========================================================================
// Aetheric Shell — Library Root
//
// This crate defines the public API surface of the Aetheric Shell.
//
// Responsibilities:
// - Expose the shell lifecycle (`ShellBuilder`, `Shell`)
// - Expose the collaborator contracts an application implements
//   (`InputSubsystem`, `GraphicsSubsystem`)
// - Provide platform backends: a winit window and a headless queue
//
// Typical usage:
// ```no_run
// use aetheric_shell::{KeyboardMouseInput, NullGraphics, ShellBuilder};
// use aetheric_shell::platform::winit_backend::WinitPlatform;
//
// fn main() {
//     let platform = WinitPlatform::new().expect("event loop");
//     let mut shell = ShellBuilder::new()
//         .build(platform, KeyboardMouseInput::new(), NullGraphics::new());
//
//     if shell.initialize().is_ok() {
//         let _ = shell.run();
//     }
//     shell.shutdown();
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the platform-independent pieces: configuration, errors,
// geometry and the collaborator traits with their bundled implementations.
//
// `platform` owns the window and the message queue. It is public so that
// applications can pick a backend and post messages in tests.
//
pub mod core;
pub mod platform;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `shell` defines the lifecycle controller and the frame dispatcher.
//
mod shell;

//--- Public Exports ------------------------------------------------------

pub use crate::core::{
    GraphicsSubsystem, InputSubsystem, KeyboardMouseInput, NullGraphics, ShellConfig, ShellError,
};
pub use shell::{ExitReason, Shell, ShellBuilder};

//=========================================================================
// Platform Subsystem
//
// Window ownership and the platform message queue.
//
// Architecture:
// ```text
//   Shell (single thread)
//     │
//     ├─ desktop_size() / create_window()      once, in initialize()
//     │
//     ├─ peek_message() ──> PlatformMessage     once per pump iteration
//     │        │
//     │        └─ route_message()
//     │             ├─ CloseRequested / Destroyed → post_quit()
//     │             └─ everything else → MessageHandler (instance level)
//     │
//     └─ restore_display_mode() / destroy_window()   in shutdown()
// ```
//
// Key Design Decisions:
// - **Non-blocking poll**: `peek_message()` never waits; an empty queue
//   lets the shell run a frame instead
// - **Quit is a message**: `post_quit()` doesn't stop anything by itself,
//   it queues `PlatformMessage::Quit`, delivered after the messages that
//   were already pending
// - **Context passing**: the instance-level handler is handed to
//   `route_message()` explicitly, so no global application pointer exists
//
// Backends:
// - `headless`: scripted queue over a crossbeam channel (tests, tools)
// - `winit_backend`: real OS window driven through winit's pump API
//
//=========================================================================

//=== Submodules ==========================================================

pub mod headless;

#[cfg(not(any(target_arch = "wasm32", target_os = "ios")))]
mod input_processor;
#[cfg(not(any(target_arch = "wasm32", target_os = "ios")))]
pub mod winit_backend;

//=== External Crates =====================================================

use log::{debug, trace};

//=== Internal Imports ====================================================

use crate::core::error::PlatformError;
use crate::core::geometry::WindowGeometry;
use crate::core::input::event::InputEvent;

//=== PlatformMessage =====================================================

/// Translated platform message.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformMessage {
    /// User or OS asked the window to close.
    CloseRequested,

    /// The window was destroyed.
    Destroyed,

    /// Quit signal posted by [`Platform::post_quit`].
    Quit,

    /// Keyboard or mouse input.
    Input(InputEvent),

    /// Client area resized (physical pixels).
    Resized { width: u32, height: u32 },

    /// Window gained (`true`) or lost (`false`) keyboard focus.
    Focused(bool),
}

//=== WindowRequest =======================================================

/// Everything a backend needs to create the shell's window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowRequest {
    pub title: String,
    pub geometry: WindowGeometry,
    pub show_cursor: bool,
}

//=== Platform ============================================================

/// Window and message-queue backend driven by the shell.
pub trait Platform {
    /// Window type lent to collaborators during initialization.
    type Window: ?Sized;

    /// Resolution of the primary display, in physical pixels.
    fn desktop_size(&mut self) -> Result<(u32, u32), PlatformError>;

    /// Creates, shows and focuses the window.
    fn create_window(&mut self, request: &WindowRequest) -> Result<(), PlatformError>;

    /// The live window, if one exists.
    fn window(&self) -> Option<&Self::Window>;

    /// Removes and returns the next pending message without blocking.
    fn peek_message(&mut self) -> Option<PlatformMessage>;

    /// Queues a [`PlatformMessage::Quit`].
    fn post_quit(&mut self);

    /// Puts the display back into the desktop mode after fullscreen.
    fn restore_display_mode(&mut self);

    /// Destroys the window. No-op when none exists.
    fn destroy_window(&mut self);

    /// Shows a blocking message box.
    fn show_error_dialog(&self, title: &str, text: &str);
}

//=== Message Routing =====================================================

/// What happened to a routed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Fully handled; no default processing.
    Handled,

    /// Left to the platform's default processing.
    Default,
}

/// Instance-level message handler.
///
/// Receives every message that the routing function doesn't consume
/// itself.
pub trait MessageHandler {
    fn handle_message(&mut self, _message: &PlatformMessage) -> Disposition {
        Disposition::Default
    }
}

/// Routes one message.
///
/// Close and destroy post the quit signal and stop there; all other
/// messages go to `handler`.
pub fn route_message<P, H>(platform: &mut P, handler: &mut H, message: &PlatformMessage) -> Disposition
where
    P: Platform + ?Sized,
    H: MessageHandler + ?Sized,
{
    match message {
        PlatformMessage::CloseRequested | PlatformMessage::Destroyed => {
            debug!(target: "platform", "{:?} received, posting quit", message);
            platform.post_quit();
            Disposition::Handled
        }
        _ => {
            trace!(target: "platform", "Forwarding {:?}", message);
            handler.handle_message(message)
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

//=========================================================================
// Headless Platform
//=========================================================================
//
// Window-less platform backend with a channel-backed message queue.
//
// Architecture:
//   MessagePoster (any thread) ──crossbeam──> HeadlessPlatform::peek_message()
//
// Used by tests and tooling to drive the shell without an OS window.
// The desktop size is fixed at construction; window creation can be made
// to fail on demand.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;

//=== External Dependencies ===============================================

use crossbeam_channel::{unbounded, Receiver, SendError, Sender, TryRecvError};
use log::{debug, error, info, warn};

//=== Internal Dependencies ===============================================

use super::{Platform, PlatformMessage, WindowRequest};
use crate::core::error::PlatformError;
use crate::core::geometry::WindowGeometry;

//=== MessagePoster =======================================================

/// Sending half of a headless message queue.
///
/// Cloneable and `Send`, so messages can be posted from other threads.
#[derive(Debug, Clone)]
pub struct MessagePoster {
    sender: Sender<PlatformMessage>,
}

impl MessagePoster {
    /// Appends a message to the queue.
    ///
    /// Fails only when the platform has been dropped.
    pub fn post(&self, message: PlatformMessage) -> Result<(), SendError<PlatformMessage>> {
        self.sender.send(message)
    }
}

//=== HeadlessWindow ======================================================

/// Stand-in window created by [`HeadlessPlatform`].
#[derive(Debug)]
pub struct HeadlessWindow {
    title: String,
    geometry: WindowGeometry,
    cursor_visible: bool,
    alive: Rc<Cell<bool>>,
}

impl HeadlessWindow {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn geometry(&self) -> WindowGeometry {
        self.geometry
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    /// Handle that reports whether this window still exists.
    ///
    /// Collaborators can keep it past initialization to check that the
    /// window outlives them.
    pub fn liveness(&self) -> WindowLiveness {
        WindowLiveness(self.alive.clone())
    }
}

/// Shared view of a [`HeadlessWindow`]'s lifetime.
#[derive(Debug, Clone)]
pub struct WindowLiveness(Rc<Cell<bool>>);

impl WindowLiveness {
    pub fn is_alive(&self) -> bool {
        self.0.get()
    }
}

//=== HeadlessPlatform ====================================================

/// Platform backend without an OS window.
pub struct HeadlessPlatform {
    desktop: (u32, u32),
    receiver: Receiver<PlatformMessage>,
    window: Option<HeadlessWindow>,
    quit_posted: bool,
    fail_window_creation: bool,
    display_restores: u32,
    dialogs: RefCell<Vec<(String, String)>>,
}

impl HeadlessPlatform {
    //--- Construction -----------------------------------------------------

    /// Creates a platform reporting `desktop` as the primary display size,
    /// together with the poster feeding its queue.
    pub fn new(desktop: (u32, u32)) -> (Self, MessagePoster) {
        let (sender, receiver) = unbounded();
        let platform = Self {
            desktop,
            receiver,
            window: None,
            quit_posted: false,
            fail_window_creation: false,
            display_restores: 0,
            dialogs: RefCell::new(Vec::new()),
        };
        (platform, MessagePoster { sender })
    }

    /// Makes the next `create_window()` calls fail.
    pub fn fail_window_creation(&mut self, fail: bool) {
        self.fail_window_creation = fail;
    }

    //--- Inspection -------------------------------------------------------

    pub fn quit_posted(&self) -> bool {
        self.quit_posted
    }

    /// How many times the display mode was restored.
    pub fn display_restores(&self) -> u32 {
        self.display_restores
    }

    /// `(title, text)` of every dialog shown so far.
    pub fn dialogs(&self) -> Vec<(String, String)> {
        self.dialogs.borrow().clone()
    }
}

//--- Platform ------------------------------------------------------------

impl Platform for HeadlessPlatform {
    type Window = HeadlessWindow;

    fn desktop_size(&mut self) -> Result<(u32, u32), PlatformError> {
        match self.desktop {
            (0, _) | (_, 0) => Err(PlatformError::NoMonitor),
            size => Ok(size),
        }
    }

    fn create_window(&mut self, request: &WindowRequest) -> Result<(), PlatformError> {
        if self.fail_window_creation {
            return Err(PlatformError::WindowCreation("headless creation disabled".to_string()));
        }
        if self.window.is_some() {
            warn!(target: "platform", "Replacing existing headless window");
            self.destroy_window();
        }

        info!(
            target: "platform",
            "Headless window '{}' created: {}x{} at ({}, {})",
            request.title,
            request.geometry.width,
            request.geometry.height,
            request.geometry.x,
            request.geometry.y
        );

        self.window = Some(HeadlessWindow {
            title: request.title.clone(),
            geometry: request.geometry,
            cursor_visible: request.show_cursor,
            alive: Rc::new(Cell::new(true)),
        });
        Ok(())
    }

    fn window(&self) -> Option<&HeadlessWindow> {
        self.window.as_ref()
    }

    fn peek_message(&mut self) -> Option<PlatformMessage> {
        match self.receiver.try_recv() {
            Ok(message) => Some(message),
            // The platform holds no sender, so disconnection only means
            // every poster is gone; treat it like an empty queue.
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => {
                if std::mem::take(&mut self.quit_posted) {
                    Some(PlatformMessage::Quit)
                } else {
                    None
                }
            }
        }
    }

    fn post_quit(&mut self) {
        debug!(target: "platform", "Quit posted");
        self.quit_posted = true;
    }

    fn restore_display_mode(&mut self) {
        self.display_restores += 1;
        debug!(target: "platform", "Display mode restored");
    }

    fn destroy_window(&mut self) {
        if let Some(window) = self.window.take() {
            window.alive.set(false);
            info!(target: "platform", "Headless window '{}' destroyed", window.title);
        }
    }

    fn show_error_dialog(&self, title: &str, text: &str) {
        error!(target: "platform", "{}: {}", title, text);
        self.dialogs.borrow_mut().push((title.to_string(), text.to_string()));
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

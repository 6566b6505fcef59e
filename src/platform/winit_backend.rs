//=========================================================================
// Winit Platform
//=========================================================================
//
// Real OS window driven through winit's pump API.
//
// Architecture:
// ```text
//   WinitPlatform
//     ├─ EventLoop<()>            pumped with a zero timeout (never blocks)
//     └─ PumpState: ApplicationHandler
//          ├─ new_events / resumed   → desktop metrics, pending window
//          ├─ window_event           → InputProcessor → message queue
//          └─ VecDeque<PlatformMessage>
// ```
//
// winit only hands out an `ActiveEventLoop` inside its callbacks, so
// desktop queries and window creation are recorded as requests and
// serviced by the next pump.
//
// Fullscreen prefers an exclusive video mode matching the desktop size
// and requested colour depth, falling back to borderless fullscreen.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::collections::VecDeque;
use std::time::Duration;

//=== External Dependencies ===============================================

use log::{debug, error, info, trace, warn};
use winit::{
    application::ApplicationHandler,
    dpi::{PhysicalPosition, PhysicalSize},
    event::{StartCause, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    monitor::MonitorHandle,
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::{Fullscreen, Window, WindowAttributes, WindowId},
};

//=== Internal Dependencies ===============================================

use super::input_processor::InputProcessor;
use super::{Platform, PlatformMessage, WindowRequest};
use crate::core::error::PlatformError;
use crate::core::geometry::DisplayMode;

//=== Constants ===========================================================

/// Pumps allowed while waiting for winit to service a startup request.
const STARTUP_PUMP_LIMIT: usize = 200;

/// Pump timeout while waiting on startup requests.
const STARTUP_PUMP_TIMEOUT: Duration = Duration::from_millis(5);

//=== WinitPlatform =======================================================

/// Platform backend owning a winit event loop and at most one window.
///
/// Must be created and driven on the main thread (winit requirement on
/// macOS). The event loop can only be created once per process.
pub struct WinitPlatform {
    event_loop: EventLoop<()>,
    state: PumpState,
}

impl WinitPlatform {
    /// Creates the event loop. No window exists until
    /// [`Platform::create_window`].
    pub fn new() -> Result<Self, PlatformError> {
        let event_loop =
            EventLoop::new().map_err(|e| PlatformError::EventLoopCreation(e.to_string()))?;

        info!(target: "platform", "Winit event loop created");
        Ok(Self {
            event_loop,
            state: PumpState::new(),
        })
    }

    /// Runs one non-blocking pump, queueing translated messages.
    fn pump(&mut self, timeout: Duration) {
        if self.state.exited {
            return;
        }

        if let PumpStatus::Exit(code) = self.event_loop.pump_app_events(Some(timeout), &mut self.state) {
            warn!(target: "platform", "Event loop exited with code {}", code);
            self.state.exited = true;
            self.state.quit_posted = true;
        }
    }

    /// Pumps until `done` holds or the startup budget runs out.
    fn pump_until(&mut self, done: impl Fn(&PumpState) -> bool) -> Result<(), PlatformError> {
        for _ in 0..STARTUP_PUMP_LIMIT {
            if done(&self.state) {
                return Ok(());
            }
            if self.state.exited {
                return Err(PlatformError::EventLoopExited(
                    "event loop exited during startup".to_string(),
                ));
            }
            self.pump(STARTUP_PUMP_TIMEOUT);
        }

        if done(&self.state) {
            Ok(())
        } else {
            Err(PlatformError::EventLoopExited(
                "event loop did not service startup request".to_string(),
            ))
        }
    }
}

//--- Platform ------------------------------------------------------------

impl Platform for WinitPlatform {
    type Window = Window;

    fn desktop_size(&mut self) -> Result<(u32, u32), PlatformError> {
        self.pump_until(|state| state.desktop.is_some())?;
        match self.state.desktop {
            Some(Some(size)) => Ok(size),
            _ => Err(PlatformError::NoMonitor),
        }
    }

    fn create_window(&mut self, request: &WindowRequest) -> Result<(), PlatformError> {
        if self.state.window.is_some() {
            warn!(target: "platform", "Replacing existing window");
            self.destroy_window();
        }

        self.state.pending_window = Some(request.clone());
        self.pump_until(|state| state.pending_window.is_none())?;

        match self.state.window_error.take() {
            Some(err) => Err(err),
            None if self.state.window.is_some() => Ok(()),
            None => Err(PlatformError::WindowMissing),
        }
    }

    fn window(&self) -> Option<&Window> {
        self.state.window.as_ref()
    }

    fn peek_message(&mut self) -> Option<PlatformMessage> {
        if self.state.queue.is_empty() {
            self.pump(Duration::ZERO);
        }

        if let Some(message) = self.state.queue.pop_front() {
            return Some(message);
        }

        if std::mem::take(&mut self.state.quit_posted) {
            return Some(PlatformMessage::Quit);
        }

        None
    }

    fn post_quit(&mut self) {
        debug!(target: "platform", "Quit posted");
        self.state.quit_posted = true;
    }

    fn restore_display_mode(&mut self) {
        if let Some(window) = &self.state.window {
            if window.fullscreen().is_some() {
                window.set_fullscreen(None);
                info!(target: "platform", "Display mode restored");
            }
        }
    }

    fn destroy_window(&mut self) {
        if let Some(window) = self.state.window.take() {
            info!(target: "platform", "Destroying window {:?}", window.id());
            drop(window);
            // Let the OS process the destruction before the loop goes idle.
            self.pump(Duration::ZERO);
            self.state.discard_pending();
        }
    }

    fn show_error_dialog(&self, title: &str, text: &str) {
        error!(target: "platform", "{}: {}", title, text);
        let _ = rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Error)
            .set_title(title)
            .set_description(text)
            .set_buttons(rfd::MessageButtons::Ok)
            .show();
    }
}

//=== PumpState ===========================================================

/// winit-facing half of the platform; receives callbacks during pumps.
struct PumpState {
    /// `None` until queried; `Some(None)` when no monitor exists.
    desktop: Option<Option<(u32, u32)>>,

    pending_window: Option<WindowRequest>,
    window: Option<Window>,
    window_error: Option<PlatformError>,

    queue: VecDeque<PlatformMessage>,
    input_processor: InputProcessor,
    quit_posted: bool,
    exited: bool,
}

impl PumpState {
    fn new() -> Self {
        Self {
            desktop: None,
            pending_window: None,
            window: None,
            window_error: None,
            queue: VecDeque::with_capacity(64),
            input_processor: InputProcessor::new(),
            quit_posted: false,
            exited: false,
        }
    }

    /// Drops queued messages and any posted quit belonging to a window
    /// that no longer exists.
    fn discard_pending(&mut self) {
        if !self.queue.is_empty() {
            debug!(target: "platform", "Discarding {} stale messages", self.queue.len());
        }
        self.queue.clear();
        self.quit_posted = false;
    }

    //--- Startup Requests -------------------------------------------------

    fn service_requests(&mut self, event_loop: &ActiveEventLoop) {
        if self.desktop.is_none() {
            let size = primary_monitor(event_loop).map(|m| {
                let size = m.size();
                (size.width, size.height)
            });
            debug!(target: "platform", "Desktop metrics: {:?}", size);
            self.desktop = Some(size);
        }

        if let Some(request) = self.pending_window.take() {
            match create_window(event_loop, &request) {
                Ok(window) => self.window = Some(window),
                Err(err) => {
                    error!(target: "platform", "Window creation failed: {}", err);
                    self.window_error = Some(err);
                }
            }
        }
    }
}

//--- Winit Integration ---------------------------------------------------

impl ApplicationHandler for PumpState {
    fn new_events(&mut self, event_loop: &ActiveEventLoop, cause: StartCause) {
        if matches!(cause, StartCause::Init) {
            trace!(target: "platform", "Event loop initialized");
        }
        self.service_requests(event_loop);
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        self.service_requests(event_loop);
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let message = match event {
            WindowEvent::CloseRequested => Some(PlatformMessage::CloseRequested),
            WindowEvent::Destroyed => Some(PlatformMessage::Destroyed),
            WindowEvent::Resized(size) => Some(PlatformMessage::Resized {
                width: size.width,
                height: size.height,
            }),
            WindowEvent::Focused(focused) => Some(PlatformMessage::Focused(focused)),

            WindowEvent::ModifiersChanged(modifiers) => {
                trace!(target: "platform::input", "Modifiers changed: {:?}", modifiers);
                self.input_processor.update_modifiers(modifiers.state());
                None
            }
            WindowEvent::KeyboardInput { event, .. } => {
                let translated = self.input_processor.process_key_event(&event);
                if translated.is_none() {
                    trace!(target: "platform::input", "Unmapped key ignored");
                }
                translated.map(PlatformMessage::Input)
            }
            WindowEvent::MouseInput { state, button, .. } => Some(PlatformMessage::Input(
                self.input_processor.process_mouse_button(button, state),
            )),
            WindowEvent::CursorMoved { position, .. } => Some(PlatformMessage::Input(
                self.input_processor.process_mouse_move(position.x, position.y),
            )),
            WindowEvent::MouseWheel { delta, .. } => {
                Some(PlatformMessage::Input(self.input_processor.process_wheel(delta)))
            }

            _ => None,
        };

        if let Some(message) = message {
            self.queue.push_back(message);
        }
    }
}

//=== Helpers =============================================================

fn primary_monitor(event_loop: &ActiveEventLoop) -> Option<MonitorHandle> {
    event_loop
        .primary_monitor()
        .or_else(|| event_loop.available_monitors().next())
}

/// Picks an exclusive mode at the monitor's resolution and `color_depth`,
/// preferring the highest refresh rate; borderless when none matches.
fn fullscreen_mode(event_loop: &ActiveEventLoop, color_depth: u16) -> Option<Fullscreen> {
    let monitor = primary_monitor(event_loop)?;
    let size = monitor.size();

    let exclusive = monitor
        .video_modes()
        .filter(|mode| mode.size() == size && mode.bit_depth() == color_depth)
        .max_by_key(|mode| mode.refresh_rate_millihertz());

    Some(match exclusive {
        Some(mode) => {
            debug!(
                target: "platform",
                "Exclusive fullscreen {}x{} @ {} bpp",
                size.width, size.height, color_depth
            );
            Fullscreen::Exclusive(mode)
        }
        None => {
            warn!(
                target: "platform",
                "No {} bpp mode at {}x{}, using borderless fullscreen",
                color_depth, size.width, size.height
            );
            Fullscreen::Borderless(Some(monitor))
        }
    })
}

fn create_window(event_loop: &ActiveEventLoop, request: &WindowRequest) -> Result<Window, PlatformError> {
    let geometry = &request.geometry;

    let mut attrs = WindowAttributes::default()
        .with_title(request.title.clone())
        .with_inner_size(PhysicalSize::new(geometry.width, geometry.height))
        .with_position(PhysicalPosition::new(geometry.x, geometry.y))
        .with_visible(true);

    if let DisplayMode::Fullscreen { color_depth } = geometry.mode {
        attrs = attrs.with_fullscreen(fullscreen_mode(event_loop, color_depth));
    }

    let window = event_loop
        .create_window(attrs)
        .map_err(|e| PlatformError::WindowCreation(e.to_string()))?;

    window.focus_window();
    window.set_cursor_visible(request.show_cursor);

    info!(
        target: "platform",
        "Window created: {}x{} at ({}, {}) @ {}x DPI",
        window.inner_size().width,
        window.inner_size().height,
        geometry.x,
        geometry.y,
        window.scale_factor()
    );
    Ok(window)
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discard_pending_clears_stale_destroy_and_quit() {
        let mut state = PumpState::new();
        state.queue.push_back(PlatformMessage::Destroyed);
        state.queue.push_back(PlatformMessage::Focused(false));
        state.quit_posted = true;

        state.discard_pending();

        assert!(state.queue.is_empty());
        assert!(!state.quit_posted);
    }

    #[test]
    fn discard_pending_keeps_exit_and_desktop_state() {
        let mut state = PumpState::new();
        state.desktop = Some(Some((1920, 1080)));
        state.exited = true;

        state.discard_pending();

        assert_eq!(state.desktop, Some(Some((1920, 1080))));
        assert!(state.exited);
    }
}

//=========================================================================
// Aetheric Shell
//
// Lifecycle controller and message pump.
//
// Architecture:
// ```text
//     ShellBuilder ──build()──> Shell ──initialize()──> run() ──> shutdown()
//         │                       │
//         ├─ with_title()         ├─ Platform (window + message queue)
//         ├─ with_fullscreen()    ├─ SubsystemHandle<Input>
//         └─ with_config()        └─ SubsystemHandle<Graphics>
// ```
//
// Pump iteration:
// ```text
//   peek_message() ─┬─ Some(Quit) ───────────────────────> QUIT
//                   ├─ Some(msg) → route_message() ─┐
//                   └─ None ────────────────────────┴─> frame::dispatch()
//                                                           │ Err → stop
//   input.is_escape_pressed() ──────────────────────────> QUIT
// ```
//
// Contract: always call `shutdown()` after `initialize()`, whether or not
// it succeeded. Dropping the shell does it automatically.
//
//=========================================================================

//=== Submodules ==========================================================

mod frame;

//=== Standard Library Imports ============================================

use std::marker::PhantomData;

//=== External Dependencies ===============================================

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use crate::core::config::ShellConfig;
use crate::core::error::{PlatformError, ShellError};
use crate::core::geometry::WindowGeometry;
use crate::core::subsystem::{GraphicsSubsystem, InputSubsystem, SubsystemHandle};
use crate::platform::{route_message, Disposition, MessageHandler, Platform, PlatformMessage, WindowRequest};

//=== Constants ===========================================================

const INPUT_FAILURE_TITLE: &str = "Error";
const INPUT_FAILURE_TEXT: &str = "Could not initialize the input object";

//=== ExitReason ==========================================================

/// Why the run loop stopped without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// The platform delivered the quit signal (window closed/destroyed).
    PlatformQuit,

    /// The input collaborator reported Escape held.
    EscapePressed,
}

/// State of the pump state machine after one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopState {
    Running,
    Quit(ExitReason),
}

//=== ShellBuilder ========================================================

/// Builder for configuring and constructing a [`Shell`].
///
/// # Default Values
///
/// - **Title**: `"Engine"`
/// - **Fullscreen**: the `fullscreen` cargo feature
/// - **Windowed size**: 800×600, centered
///
/// # Examples
///
/// ```no_run
/// use aetheric_shell::{KeyboardMouseInput, NullGraphics, ShellBuilder};
/// use aetheric_shell::platform::winit_backend::WinitPlatform;
///
/// let platform = WinitPlatform::new().expect("event loop");
/// let mut shell = ShellBuilder::new()
///     .with_title("Sandbox")
///     .with_fullscreen(false)
///     .build(platform, KeyboardMouseInput::new(), NullGraphics::new());
///
/// if shell.initialize().is_ok() {
///     let _ = shell.run();
/// }
/// shell.shutdown();
/// ```
#[derive(Debug, Clone, Default)]
pub struct ShellBuilder {
    config: ShellConfig,
}

impl ShellBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole configuration.
    ///
    /// # Panics
    ///
    /// Panics if `config` fails [`ShellConfig::validate`].
    pub fn with_config(mut self, config: ShellConfig) -> Self {
        if let Err(err) = config.validate() {
            panic!("Invalid shell configuration: {}", err);
        }
        self.config = config;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    /// Overrides the compile-time fullscreen default.
    pub fn with_fullscreen(mut self, fullscreen: bool) -> Self {
        self.config.fullscreen = fullscreen;
        self
    }

    /// Sets the window size used in windowed mode.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_windowed_size(mut self, width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "Windowed size must be positive, got {}x{}", width, height);
        self.config.windowed_width = width;
        self.config.windowed_height = height;
        self
    }

    pub fn with_cursor_visible(mut self, visible: bool) -> Self {
        self.config.show_cursor = visible;
        self
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    /// Builds the shell. Nothing is created until [`Shell::initialize`].
    pub fn build<P, I, G>(self, platform: P, input: I, graphics: G) -> Shell<P, I, G>
    where
        P: Platform,
        I: InputSubsystem<P::Window>,
        G: GraphicsSubsystem<P::Window>,
    {
        debug!(target: "shell", "Building shell with {:?}", self.config);

        Shell {
            config: self.config,
            platform,
            input_source: Some(input),
            graphics_source: Some(graphics),
            input: None,
            graphics: None,
            geometry: None,
            started: false,
            ready: false,
            iterations: 0,
        }
    }
}

//=== Shell ===============================================================

/// Owns the window, the message pump and both collaborators.
///
/// Not `Clone`: there is exactly one owner of the window and the
/// collaborators for the shell's whole life.
pub struct Shell<P, I, G>
where
    P: Platform,
    I: InputSubsystem<P::Window>,
    G: GraphicsSubsystem<P::Window>,
{
    config: ShellConfig,
    platform: P,

    /// Collaborators waiting for `initialize()`.
    input_source: Option<I>,
    graphics_source: Option<G>,

    /// Installed collaborators; released Graphics first, then Input.
    input: Option<SubsystemHandle<I>>,
    graphics: Option<SubsystemHandle<G>>,

    geometry: Option<WindowGeometry>,
    /// Set by the first `initialize()`, whatever its outcome.
    started: bool,
    ready: bool,
    iterations: u64,
}

impl<P, I, G> Shell<P, I, G>
where
    P: Platform,
    I: InputSubsystem<P::Window>,
    G: GraphicsSubsystem<P::Window>,
{
    //--- Lifecycle --------------------------------------------------------

    /// Creates the window and initializes both collaborators.
    ///
    /// # Errors
    ///
    /// - [`ShellError::Platform`] if desktop metrics or the window can't
    ///   be obtained
    /// - [`ShellError::InputInitialization`] after showing an error dialog
    /// - [`ShellError::GraphicsInitialization`]
    /// - [`ShellError::AlreadyInitialized`] on any later call, including
    ///   after a failed one
    ///
    /// Nothing is rolled back on failure; call [`Shell::shutdown`].
    pub fn initialize(&mut self) -> Result<(), ShellError> {
        if self.started {
            return Err(ShellError::AlreadyInitialized);
        }
        self.started = true;

        info!(target: "shell", "Initializing '{}'", self.config.title);

        //--- 1. Window ----------------------------------------------------
        let desktop = self.platform.desktop_size()?;
        let geometry = WindowGeometry::compute(&self.config, desktop);
        let request = WindowRequest {
            title: self.config.title.clone(),
            geometry,
            show_cursor: self.config.show_cursor,
        };

        self.platform.create_window(&request)?;
        self.geometry = Some(geometry);

        let (width, height) = geometry.size();
        let window = self.platform.window().ok_or(PlatformError::WindowMissing)?;

        //--- 2. Input -----------------------------------------------------
        let input = self.input_source.take().ok_or(ShellError::AlreadyInitialized)?;
        let input = self.input.insert(SubsystemHandle::new(input));

        if let Err(err) = input.initialize(window, width, height) {
            self.platform.show_error_dialog(INPUT_FAILURE_TITLE, INPUT_FAILURE_TEXT);
            return Err(ShellError::InputInitialization(err));
        }

        //--- 3. Graphics --------------------------------------------------
        let graphics = self.graphics_source.take().ok_or(ShellError::AlreadyInitialized)?;
        let graphics = self.graphics.insert(SubsystemHandle::new(graphics));

        graphics
            .initialize(width, height, window)
            .map_err(ShellError::GraphicsInitialization)?;

        self.ready = true;
        info!(
            target: "shell",
            "Shell initialized ({}x{}, {:?})",
            width, height, geometry.mode
        );
        Ok(())
    }

    /// Pumps messages and frames until a quit condition.
    ///
    /// Returns why the loop stopped, or the frame error that stopped it.
    /// No cleanup happens here; call [`Shell::shutdown`] afterwards.
    pub fn run(&mut self) -> Result<ExitReason, ShellError> {
        if !self.ready {
            return Err(ShellError::NotInitialized);
        }

        info!(target: "shell", "Entering run loop");
        let start = self.iterations;

        loop {
            match self.pump_iteration() {
                Ok(LoopState::Running) => {}
                Ok(LoopState::Quit(reason)) => {
                    info!(
                        target: "shell",
                        "Run loop exited ({:?}) after {} iterations",
                        reason,
                        self.iterations - start
                    );
                    return Ok(reason);
                }
                Err(err) => {
                    warn!(
                        target: "shell",
                        "Run loop stopped by {} after {} iterations",
                        err,
                        self.iterations - start
                    );
                    return Err(err);
                }
            }
        }
    }

    /// Releases Graphics, then Input, then the window.
    ///
    /// Safe to call any number of times, and after a failed
    /// `initialize()`.
    pub fn shutdown(&mut self) {
        self.ready = false;

        if let Some(graphics) = self.graphics.take() {
            drop(graphics);
        }
        if let Some(input) = self.input.take() {
            drop(input);
        }

        if self.platform.window().is_some() {
            if self.geometry.is_some_and(|g| g.mode.is_fullscreen()) {
                self.platform.restore_display_mode();
            }
            self.platform.destroy_window();
            info!(target: "shell", "Shell shut down");
        }
        self.geometry = None;
    }

    //--- Pump -------------------------------------------------------------

    /// One pump iteration: poll, route or frame, then the escape check.
    pub(crate) fn pump_iteration(&mut self) -> Result<LoopState, ShellError> {
        self.iterations += 1;

        let message = self.platform.peek_message();
        let mut state = LoopState::Running;

        match &message {
            Some(PlatformMessage::Quit) => {
                debug!(target: "shell", "Quit message received");
                state = LoopState::Quit(ExitReason::PlatformQuit);
            }
            Some(message) => {
                let mut handler = InstanceHandler::<P::Window, I>::new(self.input.as_deref_mut());
                route_message(&mut self.platform, &mut handler, message);
            }
            None => {}
        }

        if state == LoopState::Running {
            let (Some(input), Some(graphics)) = (self.input.as_deref_mut(), self.graphics.as_deref_mut())
            else {
                return Err(ShellError::NotInitialized);
            };
            frame::dispatch::<P::Window, I, G>(input, graphics)?;
        }

        if state == LoopState::Running && self.input.as_deref().is_some_and(|i| i.is_escape_pressed()) {
            debug!(target: "shell", "Escape pressed");
            state = LoopState::Quit(ExitReason::EscapePressed);
        }

        Ok(state)
    }

    //--- Accessors --------------------------------------------------------

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    /// Geometry of the live window.
    pub fn geometry(&self) -> Option<WindowGeometry> {
        self.geometry
    }

    /// `true` between window creation and shutdown.
    pub fn is_window_live(&self) -> bool {
        self.platform.window().is_some()
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    /// The installed input collaborator.
    pub fn input(&self) -> Option<&I> {
        self.input.as_deref()
    }

    /// The installed graphics collaborator.
    pub fn graphics(&self) -> Option<&G> {
        self.graphics.as_deref()
    }

    /// Total pump iterations run so far.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }
}

impl<P, I, G> Drop for Shell<P, I, G>
where
    P: Platform,
    I: InputSubsystem<P::Window>,
    G: GraphicsSubsystem<P::Window>,
{
    fn drop(&mut self) {
        self.shutdown();
    }
}

//=== InstanceHandler =====================================================

/// Instance-level handler: hands input messages and focus loss to the
/// input collaborator, leaves everything to default processing.
struct InstanceHandler<'a, W: ?Sized, I> {
    input: Option<&'a mut I>,
    _window: PhantomData<fn(&W)>,
}

impl<'a, W: ?Sized, I> InstanceHandler<'a, W, I> {
    fn new(input: Option<&'a mut I>) -> Self {
        Self { input, _window: PhantomData }
    }
}

impl<W: ?Sized, I: InputSubsystem<W>> MessageHandler for InstanceHandler<'_, W, I> {
    fn handle_message(&mut self, message: &PlatformMessage) -> Disposition {
        let Some(input) = self.input.as_deref_mut() else {
            return Disposition::Default;
        };

        match message {
            PlatformMessage::Input(event) => input.handle_event(event),
            PlatformMessage::Focused(false) => input.focus_lost(),
            _ => {}
        }
        Disposition::Default
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::SubsystemError;
    use crate::core::graphics::NullGraphics;
    use crate::core::input::{InputEvent, KeyCode, KeyboardMouseInput, Modifiers};
    use crate::core::subsystem::{FrameInput, PointerLocation, PressState, Subsystem};
    use crate::platform::headless::{HeadlessPlatform, HeadlessWindow, MessagePoster, WindowLiveness};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    //=====================================================================
    // Fakes
    //=====================================================================

    type Log = Rc<RefCell<Vec<String>>>;

    fn entries(log: &Log) -> Vec<String> {
        log.borrow().clone()
    }

    #[derive(Default)]
    struct ScriptedInput {
        log: Log,
        fail_init: bool,
        fail_frame_on: Option<u32>,
        escape_from: Option<u32>,
        left: bool,
        right: bool,
        right_queries: Rc<Cell<u32>>,
        pointer: PointerLocation,
        ticks: u32,
        window: Option<WindowLiveness>,
    }

    impl Subsystem for ScriptedInput {
        const NAME: &'static str = "scripted input";

        fn shutdown(&mut self) {
            let alive = self.window.as_ref().is_some_and(|w| w.is_alive());
            self.log.borrow_mut().push(format!("input.shutdown window_alive={}", alive));
        }
    }

    impl InputSubsystem<HeadlessWindow> for ScriptedInput {
        fn initialize(&mut self, window: &HeadlessWindow, width: u32, height: u32) -> Result<(), SubsystemError> {
            self.log.borrow_mut().push(format!("input.initialize {}x{}", width, height));
            self.window = Some(window.liveness());
            if self.fail_init {
                Err(SubsystemError::new("no keyboard"))
            } else {
                Ok(())
            }
        }

        fn frame(&mut self) -> Result<(), SubsystemError> {
            self.ticks += 1;
            self.log.borrow_mut().push(format!("input.frame {}", self.ticks));
            if self.fail_frame_on == Some(self.ticks) {
                Err(SubsystemError::new("device lost"))
            } else {
                Ok(())
            }
        }

        fn is_escape_pressed(&self) -> bool {
            self.escape_from.is_some_and(|tick| self.ticks >= tick)
        }

        fn pointer_location(&self) -> PointerLocation {
            self.pointer
        }

        fn is_left_button_pressed(&self) -> bool {
            self.left
        }

        fn is_right_button_pressed(&self) -> bool {
            self.right_queries.set(self.right_queries.get() + 1);
            self.right
        }
    }

    #[derive(Default)]
    struct RecordingGraphics {
        log: Log,
        fail_init: bool,
        fail_frame_on: Option<u32>,
        received: Vec<FrameInput>,
        window: Option<WindowLiveness>,
    }

    impl Subsystem for RecordingGraphics {
        const NAME: &'static str = "recording graphics";

        fn shutdown(&mut self) {
            let alive = self.window.as_ref().is_some_and(|w| w.is_alive());
            self.log.borrow_mut().push(format!("graphics.shutdown window_alive={}", alive));
        }
    }

    impl GraphicsSubsystem<HeadlessWindow> for RecordingGraphics {
        fn initialize(&mut self, width: u32, height: u32, window: &HeadlessWindow) -> Result<(), SubsystemError> {
            self.log.borrow_mut().push(format!("graphics.initialize {}x{}", width, height));
            self.window = Some(window.liveness());
            if self.fail_init {
                Err(SubsystemError::new("no adapter"))
            } else {
                Ok(())
            }
        }

        fn frame(&mut self, input: &FrameInput) -> Result<(), SubsystemError> {
            self.received.push(*input);
            self.log.borrow_mut().push(format!("graphics.frame {}", self.received.len()));
            if self.fail_frame_on == Some(self.received.len() as u32) {
                Err(SubsystemError::new("surface lost"))
            } else {
                Ok(())
            }
        }
    }

    //--- Harness ----------------------------------------------------------

    type TestShell = Shell<HeadlessPlatform, ScriptedInput, RecordingGraphics>;

    fn shell_with(
        builder: ShellBuilder,
        desktop: (u32, u32),
        input: ScriptedInput,
        graphics: RecordingGraphics,
    ) -> (TestShell, MessagePoster) {
        let (platform, poster) = HeadlessPlatform::new(desktop);
        (builder.build(platform, input, graphics), poster)
    }

    fn windowed() -> ShellBuilder {
        ShellBuilder::new().with_fullscreen(false)
    }

    fn logged() -> (Log, ScriptedInput, RecordingGraphics) {
        let log = Log::default();
        let input = ScriptedInput { log: log.clone(), ..ScriptedInput::default() };
        let graphics = RecordingGraphics { log: log.clone(), ..RecordingGraphics::default() };
        (log, input, graphics)
    }

    //=====================================================================
    // ShellBuilder
    //=====================================================================

    #[test]
    fn builder_defaults() {
        let builder = ShellBuilder::new();
        assert_eq!(builder.config(), &ShellConfig::default());
    }

    #[test]
    fn builder_fluent_api_chaining() {
        let builder = ShellBuilder::new()
            .with_title("Viewer")
            .with_fullscreen(true)
            .with_windowed_size(1024, 768)
            .with_cursor_visible(false);

        let config = builder.config();
        assert_eq!(config.title, "Viewer");
        assert!(config.fullscreen);
        assert_eq!((config.windowed_width, config.windowed_height), (1024, 768));
        assert!(!config.show_cursor);
    }

    #[test]
    #[should_panic(expected = "Windowed size must be positive")]
    fn builder_windowed_size_panics_on_zero() {
        ShellBuilder::new().with_windowed_size(0, 600);
    }

    //=====================================================================
    // Initialize
    //=====================================================================

    #[test]
    fn windowed_initialize_uses_800x600() {
        let (log, input, graphics) = logged();
        let (mut shell, _poster) = shell_with(windowed(), (2560, 1440), input, graphics);

        shell.initialize().unwrap();

        let geometry = shell.geometry().unwrap();
        assert_eq!(geometry.size(), (800, 600));
        assert_eq!((geometry.x, geometry.y), (880, 420));
        assert!(shell.is_window_live());
        assert_eq!(
            entries(&log),
            vec!["input.initialize 800x600", "graphics.initialize 800x600"]
        );
    }

    #[test]
    fn fullscreen_initialize_uses_desktop_size() {
        let (log, input, graphics) = logged();
        let builder = ShellBuilder::new().with_fullscreen(true);
        let (mut shell, _poster) = shell_with(builder, (1920, 1200), input, graphics);

        shell.initialize().unwrap();

        assert_eq!(shell.geometry().unwrap().size(), (1920, 1200));
        assert_eq!(shell.platform().window().unwrap().geometry().size(), (1920, 1200));
        assert_eq!(entries(&log)[0], "input.initialize 1920x1200");
    }

    #[test]
    fn window_uses_configured_title() {
        let (_log, input, graphics) = logged();
        let (mut shell, _poster) = shell_with(windowed().with_title("Engine"), (1920, 1080), input, graphics);

        shell.initialize().unwrap();

        assert_eq!(shell.platform().window().unwrap().title(), "Engine");
    }

    #[test]
    fn input_failure_shows_dialog_and_skips_graphics() {
        let (log, mut input, graphics) = logged();
        input.fail_init = true;
        let (mut shell, _poster) = shell_with(windowed(), (1920, 1080), input, graphics);

        let result = shell.initialize();

        assert!(matches!(result, Err(ShellError::InputInitialization(_))));
        assert_eq!(
            shell.platform().dialogs(),
            vec![("Error".to_string(), "Could not initialize the input object".to_string())]
        );
        assert_eq!(entries(&log), vec!["input.initialize 800x600"]);
        assert!(shell.is_window_live(), "No rollback before shutdown");

        shell.shutdown();
        assert_eq!(
            entries(&log),
            vec!["input.initialize 800x600", "input.shutdown window_alive=true"]
        );
        assert!(!shell.is_window_live());
    }

    #[test]
    fn graphics_failure_is_silent() {
        let (log, input, mut graphics) = logged();
        graphics.fail_init = true;
        let (mut shell, _poster) = shell_with(windowed(), (1920, 1080), input, graphics);

        let result = shell.initialize();

        assert!(matches!(result, Err(ShellError::GraphicsInitialization(_))));
        assert!(shell.platform().dialogs().is_empty());
        assert!(matches!(shell.run(), Err(ShellError::NotInitialized)));

        shell.shutdown();
        let log = entries(&log);
        assert_eq!(log[2], "graphics.shutdown window_alive=true");
        assert_eq!(log[3], "input.shutdown window_alive=true");
    }

    #[test]
    fn window_creation_failure_is_reported() {
        let (log, input, graphics) = logged();
        let (mut shell, _poster) = shell_with(windowed(), (1920, 1080), input, graphics);
        shell.platform_mut().fail_window_creation(true);

        let result = shell.initialize();

        assert!(matches!(result, Err(ShellError::Platform(PlatformError::WindowCreation(_)))));
        assert!(!shell.is_window_live());
        assert!(entries(&log).is_empty());
    }

    #[test]
    fn missing_monitor_is_reported() {
        let (_log, input, graphics) = logged();
        let (mut shell, _poster) = shell_with(windowed(), (0, 0), input, graphics);

        assert!(matches!(shell.initialize(), Err(ShellError::Platform(PlatformError::NoMonitor))));
    }

    #[test]
    fn second_initialize_is_rejected() {
        let (_log, input, graphics) = logged();
        let (mut shell, _poster) = shell_with(windowed(), (1920, 1080), input, graphics);

        shell.initialize().unwrap();

        assert!(matches!(shell.initialize(), Err(ShellError::AlreadyInitialized)));
    }

    #[test]
    fn initialize_after_platform_failure_is_rejected() {
        let (log, input, graphics) = logged();
        let (mut shell, _poster) = shell_with(windowed(), (1920, 1080), input, graphics);
        shell.platform_mut().fail_window_creation(true);
        assert!(shell.initialize().is_err());

        shell.platform_mut().fail_window_creation(false);

        assert!(matches!(shell.initialize(), Err(ShellError::AlreadyInitialized)));
        assert!(!shell.is_window_live());
        assert!(entries(&log).is_empty());
    }

    #[test]
    #[should_panic(expected = "Invalid shell configuration")]
    fn builder_rejects_zero_sized_config() {
        let config = ShellConfig { windowed_width: 0, ..ShellConfig::default() };
        ShellBuilder::new().with_config(config);
    }

    #[test]
    fn run_before_initialize_is_rejected() {
        let (_log, input, graphics) = logged();
        let (mut shell, _poster) = shell_with(windowed(), (1920, 1080), input, graphics);

        assert!(matches!(shell.run(), Err(ShellError::NotInitialized)));
    }

    //=====================================================================
    // Run Loop
    //=====================================================================

    #[test]
    fn escape_alone_terminates_loop() {
        let (_log, mut input, graphics) = logged();
        input.escape_from = Some(3);
        let (mut shell, _poster) = shell_with(windowed(), (1920, 1080), input, graphics);
        shell.initialize().unwrap();

        let reason = shell.run().unwrap();

        assert_eq!(reason, ExitReason::EscapePressed);
        assert_eq!(shell.iterations(), 3);
        assert_eq!(shell.graphics().unwrap().received.len(), 3);
        assert!(!shell.platform().quit_posted());
    }

    #[test]
    fn input_failure_on_tick_three_skips_graphics_and_stops() {
        let (log, mut input, graphics) = logged();
        input.fail_frame_on = Some(3);
        let (mut shell, _poster) = shell_with(windowed(), (1920, 1080), input, graphics);
        shell.initialize().unwrap();

        let result = shell.run();

        assert!(matches!(result, Err(ShellError::InputFrame(_))));
        assert!(shell.iterations() <= 4);
        assert_eq!(shell.graphics().unwrap().received.len(), 2);

        let log = entries(&log);
        let tick_three = log.iter().position(|e| e == "input.frame 3").unwrap();
        assert!(!log[tick_three..].iter().any(|e| e.starts_with("graphics.frame")));
    }

    #[test]
    fn loop_stops_in_iteration_of_first_failed_frame() {
        for failing_frame in 1..=5 {
            let (_log, input, mut graphics) = logged();
            graphics.fail_frame_on = Some(failing_frame);
            let (mut shell, _poster) = shell_with(windowed(), (1920, 1080), input, graphics);
            shell.initialize().unwrap();

            let result = shell.run();

            assert!(matches!(result, Err(ShellError::GraphicsFrame(_))));
            assert_eq!(shell.iterations(), u64::from(failing_frame));
        }
    }

    #[test]
    fn close_request_quits_on_next_iteration() {
        let (_log, input, graphics) = logged();
        let (mut shell, poster) = shell_with(windowed(), (1920, 1080), input, graphics);
        shell.initialize().unwrap();
        poster.post(PlatformMessage::CloseRequested).unwrap();

        let reason = shell.run().unwrap();

        assert_eq!(reason, ExitReason::PlatformQuit);
        assert_eq!(shell.iterations(), 2);
        assert_eq!(shell.graphics().unwrap().received.len(), 1, "Close iteration still renders");
    }

    #[test]
    fn destroy_quits_after_pending_messages() {
        let (_log, input, graphics) = logged();
        let (mut shell, poster) = shell_with(windowed(), (1920, 1080), input, graphics);
        shell.initialize().unwrap();
        poster.post(PlatformMessage::Destroyed).unwrap();
        poster.post(PlatformMessage::Focused(true)).unwrap();

        assert_eq!(shell.run().unwrap(), ExitReason::PlatformQuit);
        assert_eq!(shell.iterations(), 3);
    }

    #[test]
    fn press_state_prefers_left() {
        let (_log, mut input, graphics) = logged();
        input.left = true;
        input.right = true;
        input.escape_from = Some(1);
        let right_queries = input.right_queries.clone();
        let (mut shell, _poster) = shell_with(windowed(), (1920, 1080), input, graphics);
        shell.initialize().unwrap();

        shell.run().unwrap();

        assert_eq!(shell.graphics().unwrap().received[0].press, PressState::Left);
        assert_eq!(right_queries.get(), 0);
    }

    #[test]
    fn pointer_snapshot_reaches_graphics() {
        let (_log, mut input, graphics) = logged();
        input.pointer = PointerLocation { x: 10, y: 20, wheel_delta: -120 };
        input.right = true;
        input.escape_from = Some(1);
        let (mut shell, _poster) = shell_with(windowed(), (1920, 1080), input, graphics);
        shell.initialize().unwrap();

        shell.run().unwrap();

        assert_eq!(
            shell.graphics().unwrap().received,
            vec![FrameInput { x: 10, y: 20, wheel_delta: -120, press: PressState::Right }]
        );
    }

    #[test]
    fn posted_input_reaches_keyboard_mouse_input() {
        let (platform, poster) = HeadlessPlatform::new((1920, 1080));
        let mut shell = windowed().build(platform, KeyboardMouseInput::new(), NullGraphics::new());
        shell.initialize().unwrap();

        poster
            .post(PlatformMessage::Input(InputEvent::MouseMoved { x: 100.0, y: 50.0 }))
            .unwrap();
        poster
            .post(PlatformMessage::Input(InputEvent::KeyDown { key: KeyCode::Escape, modifiers: Modifiers::NONE }))
            .unwrap();

        let reason = shell.run().unwrap();

        // Iteration 1 routes the move, iteration 2 routes Escape and its
        // frame commits it.
        assert_eq!(reason, ExitReason::EscapePressed);
        assert_eq!(shell.iterations(), 2);
        let graphics = shell.graphics().unwrap();
        assert_eq!(graphics.frames(), 2);
        assert_eq!(graphics.last_input().map(|i| (i.x, i.y)), Some((100, 50)));
    }

    #[test]
    fn focus_loss_releases_held_keys() {
        let (platform, poster) = HeadlessPlatform::new((1920, 1080));
        let mut shell = windowed().build(platform, KeyboardMouseInput::new(), NullGraphics::new());
        shell.initialize().unwrap();

        poster
            .post(PlatformMessage::Input(InputEvent::KeyDown { key: KeyCode::Space, modifiers: Modifiers::NONE }))
            .unwrap();
        assert_eq!(shell.pump_iteration().unwrap(), LoopState::Running);
        assert!(shell.input().unwrap().state().is_key_down(KeyCode::Space));

        poster.post(PlatformMessage::Focused(false)).unwrap();
        assert_eq!(shell.pump_iteration().unwrap(), LoopState::Running);
        assert!(!shell.input().unwrap().state().is_key_down(KeyCode::Space));
    }

    #[test]
    fn focus_gain_keeps_held_keys() {
        let (platform, poster) = HeadlessPlatform::new((1920, 1080));
        let mut shell = windowed().build(platform, KeyboardMouseInput::new(), NullGraphics::new());
        shell.initialize().unwrap();

        poster
            .post(PlatformMessage::Input(InputEvent::KeyDown { key: KeyCode::Space, modifiers: Modifiers::NONE }))
            .unwrap();
        poster.post(PlatformMessage::Focused(true)).unwrap();
        shell.pump_iteration().unwrap();
        shell.pump_iteration().unwrap();

        assert!(shell.input().unwrap().state().is_key_down(KeyCode::Space));
    }

    //=====================================================================
    // Shutdown
    //=====================================================================

    #[test]
    fn shutdown_releases_graphics_input_then_window() {
        let (log, input, graphics) = logged();
        let (mut shell, _poster) = shell_with(windowed(), (1920, 1080), input, graphics);
        shell.initialize().unwrap();

        shell.shutdown();

        assert_eq!(
            entries(&log)[2..],
            [
                "graphics.shutdown window_alive=true".to_string(),
                "input.shutdown window_alive=true".to_string(),
            ]
        );
        assert!(!shell.is_window_live());
        assert!(shell.input().is_none() && shell.graphics().is_none());
    }

    #[test]
    fn shutdown_twice_is_noop() {
        let (log, input, graphics) = logged();
        let (mut shell, _poster) = shell_with(windowed(), (1920, 1080), input, graphics);
        shell.initialize().unwrap();

        shell.shutdown();
        shell.shutdown();

        let shutdowns = entries(&log).iter().filter(|e| e.contains("shutdown")).count();
        assert_eq!(shutdowns, 2, "Each collaborator released exactly once");
    }

    #[test]
    fn shutdown_restores_display_only_for_fullscreen() {
        let (_log, input, graphics) = logged();
        let (mut shell, _poster) = shell_with(ShellBuilder::new().with_fullscreen(true), (1920, 1080), input, graphics);
        shell.initialize().unwrap();
        shell.shutdown();
        shell.shutdown();
        assert_eq!(shell.platform().display_restores(), 1);

        let (_log, input, graphics) = logged();
        let (mut shell, _poster) = shell_with(windowed(), (1920, 1080), input, graphics);
        shell.initialize().unwrap();
        shell.shutdown();
        assert_eq!(shell.platform().display_restores(), 0);
    }

    #[test]
    fn shutdown_without_initialize_is_safe() {
        let (log, input, graphics) = logged();
        let (mut shell, _poster) = shell_with(windowed(), (1920, 1080), input, graphics);

        shell.shutdown();

        assert!(entries(&log).is_empty());
    }

    #[test]
    fn drop_runs_shutdown() {
        let (log, input, graphics) = logged();
        let (mut shell, _poster) = shell_with(windowed(), (1920, 1080), input, graphics);
        shell.initialize().unwrap();

        drop(shell);

        assert_eq!(entries(&log).len(), 4);
        assert!(entries(&log)[2].starts_with("graphics.shutdown"));
    }
}

//=========================================================================
// Shell Errors
//=========================================================================
//
// Error taxonomy for the shell and its collaborators.
//
// Architecture:
//   PlatformError ─┐
//   SubsystemError ┼──> ShellError ──> caller of initialize()/run()
//   (collaborators)┘
//
// Initialization failures and per-frame failures both surface as
// `ShellError`; user-requested termination is not an error and is
// reported through `ExitReason` instead.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== PlatformError =======================================================

/// Window and event loop failures raised by a platform backend.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Failed to create the event loop (OS-level issue).
    #[error("event loop creation failed: {0}")]
    EventLoopCreation(String),

    /// Event loop stopped before it could service a request.
    #[error("event loop exited unexpectedly: {0}")]
    EventLoopExited(String),

    /// The OS refused to create the window.
    #[error("window creation failed: {0}")]
    WindowCreation(String),

    /// No monitor is attached, so desktop metrics are unknown.
    #[error("no monitor available to query desktop metrics")]
    NoMonitor,

    /// An operation required a live window but none exists.
    #[error("no window has been created")]
    WindowMissing,
}

//=== SubsystemError ======================================================

/// Failure reported by an input or graphics collaborator.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct SubsystemError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl SubsystemError {
    /// Creates an error carrying only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an error wrapping an underlying cause.
    pub fn with_source<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

//=== ShellError ==========================================================

/// Errors surfaced by [`crate::Shell`] lifecycle operations.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error("input initialization failed: {0}")]
    InputInitialization(#[source] SubsystemError),

    #[error("graphics initialization failed: {0}")]
    GraphicsInitialization(#[source] SubsystemError),

    #[error("input frame failed: {0}")]
    InputFrame(#[source] SubsystemError),

    #[error("graphics frame failed: {0}")]
    GraphicsFrame(#[source] SubsystemError),

    /// `run()` was called before a successful `initialize()`.
    #[error("shell is not initialized")]
    NotInitialized,

    /// `initialize()` was called on a shell whose collaborators were
    /// already consumed.
    #[error("shell was already initialized")]
    AlreadyInitialized,
}

impl ShellError {
    /// Returns `true` for failures raised inside the run loop.
    pub fn is_frame_failure(&self) -> bool {
        matches!(self, Self::InputFrame(_) | Self::GraphicsFrame(_))
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

//=========================================================================
// Window Geometry
//=========================================================================
//
// Resolves window size and position from the display mode and the
// desktop metrics reported by the platform.
//
//   fullscreen: desktop size at (0, 0)
//   windowed:   configured size, centered on the primary display
//
//=========================================================================

use crate::core::config::ShellConfig;

//=== DisplayMode =========================================================

/// How the window occupies the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// Desktop resolution, requested colour depth.
    Fullscreen { color_depth: u16 },

    Windowed,
}

impl DisplayMode {
    pub fn from_config(config: &ShellConfig) -> Self {
        if config.fullscreen {
            Self::Fullscreen { color_depth: config.color_depth }
        } else {
            Self::Windowed
        }
    }

    pub fn is_fullscreen(&self) -> bool {
        matches!(self, Self::Fullscreen { .. })
    }
}

//=== WindowGeometry ======================================================

/// Outer window rectangle in physical pixels.
///
/// Position is signed: a windowed size larger than the desktop centers
/// to a negative origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowGeometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub mode: DisplayMode,
}

impl WindowGeometry {
    /// Computes the geometry for `config` on a desktop of `desktop` size.
    pub fn compute(config: &ShellConfig, desktop: (u32, u32)) -> Self {
        let (desktop_width, desktop_height) = desktop;

        match DisplayMode::from_config(config) {
            mode @ DisplayMode::Fullscreen { .. } => Self {
                x: 0,
                y: 0,
                width: desktop_width,
                height: desktop_height,
                mode,
            },
            DisplayMode::Windowed => {
                let width = config.windowed_width;
                let height = config.windowed_height;
                Self {
                    x: centered(desktop_width, width),
                    y: centered(desktop_height, height),
                    width,
                    height,
                    mode: DisplayMode::Windowed,
                }
            }
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

fn centered(outer: u32, inner: u32) -> i32 {
    ((i64::from(outer) - i64::from(inner)) / 2) as i32
}

//=========================================================================
// Unit Tests
//=========================================================================

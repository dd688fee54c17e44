//! Panel geometry for the supported e-paper displays.
//!
//! A panel describes the size every page is scaled to, the rotation that maps
//! the scaled page onto the physically mounted display, and the resolution the
//! PDF is rasterized at. Pixel traversal for packing always happens after the
//! rotation, so the packed bytes follow the display's own row-major layout.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::CoreError;
use crate::pack::bytes_for_pixels;

/// A fixed rotation applied after scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Rotation {
    None,
    /// 90 degrees clockwise.
    Clockwise,
    Half,
    /// 90 degrees counter-clockwise (`-90`).
    CounterClockwise,
}

/// Target geometry of one display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PanelGeometry {
    /// Width every page is stretched to, before rotation.
    pub width: u32,
    /// Height every page is stretched to, before rotation.
    pub height: u32,
    pub rotation: Rotation,
    pub dpi: u32,
}

impl PanelGeometry {
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Size of one packed page record.
    pub fn bytes_per_page(&self) -> usize {
        bytes_for_pixels(self.pixel_count())
    }

    pub fn with_dpi(self, dpi: u32) -> Self {
        Self { dpi, ..self }
    }
}

/// The displays this tool knows how to target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Panel {
    /// 7.5" 800x480 panel mounted in portrait.
    #[default]
    Epd7in5,
    /// 4.2" 400x300 panel mounted in portrait.
    Epd4in2,
}

impl Panel {
    pub fn geometry(&self) -> PanelGeometry {
        match self {
            Panel::Epd7in5 => PanelGeometry {
                width: 480,
                height: 800,
                rotation: Rotation::CounterClockwise,
                dpi: 300,
            },
            Panel::Epd4in2 => PanelGeometry {
                width: 300,
                height: 400,
                rotation: Rotation::CounterClockwise,
                dpi: 300,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Panel::Epd7in5 => "epd7in5",
            Panel::Epd4in2 => "epd4in2",
        }
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Panel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "epd7in5" | "7in5" => Ok(Panel::Epd7in5),
            "epd4in2" | "4in2" => Ok(Panel::Epd4in2),
            other => Err(CoreError::UnknownPanel(other.to_string())),
        }
    }
}

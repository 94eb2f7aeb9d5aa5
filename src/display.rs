//! Display adapter - colour and text for a charge accumulator

use std::fmt;
use std::sync::Mutex;

use tracing::info;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::accumulator::ChargeAccumulator;
use crate::clock::Clock;
use crate::observer::{ChargeEvent, ChargeObserver};

/// RGB colour, 0-255 per channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const CYAN: Self = Self::rgb(0, 255, 255);
    pub const YELLOW: Self = Self::rgb(255, 235, 4);
    pub const RED: Self = Self::rgb(255, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Colours for each display state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Palette {
    pub normal: Color,
    pub started: Color,
    pub ready: Color,
    pub full: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            normal: Color::WHITE,
            started: Color::CYAN,
            ready: Color::YELLOW,
            full: Color::RED,
        }
    }
}

/// One rendered frame.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayFrame {
    pub color: Color,
    pub charge: f32,
    pub elapsed: f32,
}

impl fmt::Display for DisplayFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}] Charge: {:.2}", self.color, self.charge)?;
        write!(f, "[{}] Elapsed Time: {:.2}", self.color, self.elapsed)
    }
}

/// Observer that tracks which colour the charge should be drawn in.
pub struct ChargeDisplay {
    palette: Palette,
    color: Mutex<Color>,
}

impl ChargeDisplay {
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            color: Mutex::new(palette.normal),
        }
    }

    pub fn color(&self) -> Color {
        *self.color.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Read the accumulator for the current render pass.
    pub fn render<C: Clock>(&self, accumulator: &ChargeAccumulator<C>) -> DisplayFrame {
        DisplayFrame {
            color: self.color(),
            charge: accumulator.current_charge(),
            elapsed: accumulator.elapsed_time(),
        }
    }

    fn set_color(&self, color: Color) {
        *self.color.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = color;
    }
}

impl Default for ChargeDisplay {
    fn default() -> Self {
        Self::new(Palette::default())
    }
}

impl ChargeObserver for ChargeDisplay {
    fn on_event(&self, event: ChargeEvent) {
        info!(%event);
        let color = match event {
            ChargeEvent::Started => self.palette.started,
            ChargeEvent::ReadyToRelease { .. } => self.palette.ready,
            ChargeEvent::FullyCharged { .. } => self.palette.full,
            ChargeEvent::Released { .. } | ChargeEvent::Stopped | ChargeEvent::Reset => {
                self.palette.normal
            }
        };
        self.set_color(color);
    }
}

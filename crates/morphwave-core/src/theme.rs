//! Color themes and their gradient stops.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of color stops in every theme gradient.
pub const STOP_COUNT: usize = 4;

/// An opaque RGB color with byte channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Create a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a color from a packed `0xRRGGBB` value.
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
        }
    }
}

const OCEAN: [Rgb; STOP_COUNT] = [
    Rgb::from_hex(0x001a4d),
    Rgb::from_hex(0x0066cc),
    Rgb::from_hex(0x0099ff),
    Rgb::from_hex(0x66ccff),
];

const SUNSET: [Rgb; STOP_COUNT] = [
    Rgb::from_hex(0x660000),
    Rgb::from_hex(0xcc3300),
    Rgb::from_hex(0xff6600),
    Rgb::from_hex(0xffcc00),
];

const FOREST: [Rgb; STOP_COUNT] = [
    Rgb::from_hex(0x003300),
    Rgb::from_hex(0x006600),
    Rgb::from_hex(0x009900),
    Rgb::from_hex(0x66cc66),
];

const COSMIC: [Rgb; STOP_COUNT] = [
    Rgb::from_hex(0x330066),
    Rgb::from_hex(0x6600cc),
    Rgb::from_hex(0x9933ff),
    Rgb::from_hex(0xcc66ff),
];

/// Available color themes for the wave background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTheme {
    #[default]
    Ocean,
    Sunset,
    Forest,
    Cosmic,
}

impl ColorTheme {
    /// Every theme, in cycling order.
    pub const ALL: [ColorTheme; 4] = [
        ColorTheme::Ocean,
        ColorTheme::Sunset,
        ColorTheme::Forest,
        ColorTheme::Cosmic,
    ];

    /// Gradient stops from darkest to lightest.
    pub const fn stops(self) -> &'static [Rgb; STOP_COUNT] {
        match self {
            ColorTheme::Ocean => &OCEAN,
            ColorTheme::Sunset => &SUNSET,
            ColorTheme::Forest => &FOREST,
            ColorTheme::Cosmic => &COSMIC,
        }
    }

    /// Identifier used in config files and on the command line.
    pub const fn id(self) -> &'static str {
        match self {
            ColorTheme::Ocean => "ocean",
            ColorTheme::Sunset => "sunset",
            ColorTheme::Forest => "forest",
            ColorTheme::Cosmic => "cosmic",
        }
    }

    /// Human readable name.
    pub const fn name(self) -> &'static str {
        match self {
            ColorTheme::Ocean => "Ocean",
            ColorTheme::Sunset => "Sunset",
            ColorTheme::Forest => "Forest",
            ColorTheme::Cosmic => "Cosmic",
        }
    }

    /// One-line description shown in the overlay.
    pub const fn description(self) -> &'static str {
        match self {
            ColorTheme::Ocean => "Deep blue waves",
            ColorTheme::Sunset => "Warm orange glow",
            ColorTheme::Forest => "Emerald green nature",
            ColorTheme::Cosmic => "Purple space vibes",
        }
    }

    /// Cycle to the next theme.
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Theme at a 1-based position in [`ColorTheme::ALL`], for number keys.
    pub fn from_position(position: usize) -> Option<Self> {
        position
            .checked_sub(1)
            .and_then(|idx| Self::ALL.get(idx).copied())
    }
}

impl fmt::Display for ColorTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Error returned when a theme identifier is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown color theme `{0}` (expected one of: ocean, sunset, forest, cosmic)")]
pub struct ParseThemeError(pub String);

impl FromStr for ColorTheme {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.id().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseThemeError(s.to_string()))
    }
}

//! Core types shared by the morphwave crates.
//!
//! Holds the closed set of color themes with their gradient stops and the
//! animation speed presets. Nothing here knows how a field is rendered.

mod speed;
mod theme;

pub use speed::{AnimationSpeed, ParseSpeedError};
pub use theme::{ColorTheme, ParseThemeError, Rgb, STOP_COUNT};

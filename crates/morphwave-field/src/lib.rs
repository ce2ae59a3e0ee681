//! Procedural gradient wave field renderer.
//!
//! Each accepted frame fills a low-resolution RGBA field from layered sine
//! noise mapped through a theme's four color stops, then presents it
//! upscaled over a terminal area. Sines come from a precomputed table, frames
//! are paced by a [`FrameScheduler`] fed from a host [`RefreshSource`], and
//! all state lives in one [`WaveBackground`] per instance.

mod field;
mod gradient;
mod presenter;
mod scheduler;
mod sine;
mod state;

pub use field::{
    BASE_LIGHTNESS, FLOW, FlowTerm, FramePhases, LAYERS, NoiseLayer, PixelField, lightness_at,
    pixel_at,
};
pub use gradient::{SEGMENTS, clamp_lightness, gradient_position, map_lightness};
pub use presenter::{
    DEFAULT_SCALE, FieldView, MAX_SCALE, MIN_SCALE, Presenter, sample_bilinear, surface_pixels,
};
pub use scheduler::{
    AnimationClock, DEFAULT_TARGET_FPS, FrameScheduler, RefreshSource, TickHandle, TickOutcome,
};
pub use sine::{DEFAULT_TABLE_SIZE, SineTable};
pub use state::{WaveBackground, WaveSettings};

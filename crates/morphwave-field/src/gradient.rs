//! Mapping lightness values onto a theme's color stops.

use morphwave_core::{Rgb, STOP_COUNT};

/// Number of interpolation segments between the stops.
pub const SEGMENTS: usize = STOP_COUNT - 1;

/// Lightness used when the noise sum is not a number.
const FALLBACK_LIGHTNESS: f32 = 0.5;

/// Clamp a raw noise sum into `[0, 1]`.
#[inline]
pub fn clamp_lightness(lightness: f32) -> f32 {
    if lightness.is_nan() {
        FALLBACK_LIGHTNESS
    } else {
        lightness.clamp(0.0, 1.0)
    }
}

/// Segment index and blend weight for a lightness value.
///
/// The segment is always a valid index into a pair of neighbouring stops and
/// the blend lies in `[0, 1]`, whatever the input.
#[inline]
pub fn gradient_position(lightness: f32) -> (usize, f32) {
    let pos = clamp_lightness(lightness) * SEGMENTS as f32;
    let segment = (pos as usize).min(SEGMENTS - 1);
    (segment, pos - segment as f32)
}

/// Map a lightness value to a color along the gradient.
#[inline]
pub fn map_lightness(stops: &[Rgb; STOP_COUNT], lightness: f32) -> Rgb {
    let (segment, blend) = gradient_position(lightness);
    let from = stops[segment];
    let to = stops[segment + 1];
    Rgb::new(
        lerp_channel(from.r, to.r, blend),
        lerp_channel(from.g, to.g, blend),
        lerp_channel(from.b, to.b, blend),
    )
}

/// Interpolate one channel. Exact at `t = 0` and `t = 1` and never leaves
/// the range spanned by `a` and `b`.
#[inline]
fn lerp_channel(a: u8, b: u8, t: f32) -> u8 {
    let a = a as f32;
    // Truncating cast stands in for floor; the value is non-negative.
    (a + (b as f32 - a) * t) as u8
}

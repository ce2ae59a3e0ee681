//! Layered sine noise and the RGBA pixel field it fills.
//!
//! Everything here is pure: the same table, stops, size and elapsed time
//! always produce the same pixels.

use std::f64::consts::TAU;

use morphwave_core::{AnimationSpeed, Rgb, STOP_COUNT};

use crate::gradient::map_lightness;
use crate::sine::SineTable;

/// Lightness every noise sum is centered on.
pub const BASE_LIGHTNESS: f32 = 0.5;

/// One band of the layered noise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseLayer {
    /// Cycles per field height.
    pub y_freq: f32,
    /// Phase advance per unit of scaled time.
    pub time_rate: f64,
    /// Cycles per field width.
    pub x_freq: f32,
    /// Constant phase offset in radians.
    pub offset: f64,
    pub amplitude: f32,
}

/// Noise bands, dominant first.
pub const LAYERS: [NoiseLayer; 3] = [
    NoiseLayer {
        y_freq: 8.0,
        time_rate: 2.4,
        x_freq: 10.0,
        offset: 0.0,
        amplitude: 0.3,
    },
    NoiseLayer {
        y_freq: 12.0,
        time_rate: 1.8,
        x_freq: 14.0,
        offset: 50.0,
        amplitude: 0.2,
    },
    NoiseLayer {
        y_freq: 6.0,
        time_rate: 3.2,
        x_freq: 18.0,
        offset: 100.0,
        amplitude: 0.15,
    },
];

/// Slow diagonal drift added on top of the layers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowTerm {
    pub x_freq: f32,
    pub y_freq: f32,
    pub time_rate: f64,
    pub amplitude: f32,
}

pub const FLOW: FlowTerm = FlowTerm {
    x_freq: 4.0,
    y_freq: 3.0,
    time_rate: 1.5,
    amplitude: 0.1,
};

/// Time-dependent phases for one frame, reduced into `[0, 2pi)`.
///
/// Reduction happens in `f64` so a clock that has run for days still feeds
/// small, precise values into the `f32` pixel loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FramePhases {
    layers: [f32; LAYERS.len()],
    flow: f32,
}

impl FramePhases {
    /// Phases at `elapsed_secs` for the given speed. Non-finite times count as 0.
    pub fn at(elapsed_secs: f64, speed: AnimationSpeed) -> Self {
        let elapsed = if elapsed_secs.is_finite() {
            elapsed_secs
        } else {
            0.0
        };
        let time = elapsed * speed.time_scale();
        let reduce = |phase: f64| phase.rem_euclid(TAU) as f32;

        Self {
            layers: LAYERS.map(|layer| reduce(time * layer.time_rate + layer.offset)),
            flow: reduce(time * FLOW.time_rate),
        }
    }
}

/// Per-row part of the noise, shared by every pixel in a row.
#[derive(Debug, Clone, Copy)]
struct RowPhases {
    layers: [f32; LAYERS.len()],
    flow: f32,
}

impl RowPhases {
    fn new(phases: &FramePhases, ny: f32) -> Self {
        let mut layers = phases.layers;
        for (phase, layer) in layers.iter_mut().zip(LAYERS.iter()) {
            *phase += ny * layer.y_freq;
        }
        Self {
            layers,
            flow: phases.flow + ny * FLOW.y_freq,
        }
    }

    #[inline]
    fn lightness(&self, table: &SineTable, nx: f32) -> f32 {
        let mut sum = BASE_LIGHTNESS;
        for (phase, layer) in self.layers.iter().zip(LAYERS.iter()) {
            sum += table.lookup(nx * layer.x_freq + phase) * layer.amplitude;
        }
        sum + table.lookup(nx * FLOW.x_freq + self.flow) * FLOW.amplitude
    }
}

/// Normalized coordinate of `index` along an axis of `extent` pixels.
#[inline]
fn normalized(index: u16, extent: u16) -> f32 {
    index as f32 / extent.max(1) as f32
}

/// Unclamped noise sum at normalized coordinates.
pub fn lightness_at(table: &SineTable, phases: &FramePhases, nx: f32, ny: f32) -> f32 {
    RowPhases::new(phases, ny).lightness(table, nx)
}

/// Color of a single pixel.
///
/// Reference form of [`PixelField::compute`]; both produce identical bits.
#[allow(clippy::too_many_arguments)]
pub fn pixel_at(
    table: &SineTable,
    stops: &[Rgb; STOP_COUNT],
    x: u16,
    y: u16,
    width: u16,
    height: u16,
    elapsed_secs: f64,
    speed: AnimationSpeed,
) -> Rgb {
    let phases = FramePhases::at(elapsed_secs, speed);
    let lightness = lightness_at(
        table,
        &phases,
        normalized(x, width),
        normalized(y, height),
    );
    map_lightness(stops, lightness)
}

/// RGBA8 pixel buffer at the renderer's internal resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PixelField {
    width: u16,
    height: u16,
    data: Vec<u8>,
}

impl PixelField {
    /// Bytes per pixel.
    pub const CHANNELS: usize = 4;

    /// Create a field of the given size, filled with transparent black.
    pub fn new(width: u16, height: u16) -> Self {
        let mut field = Self::default();
        field.resize(width, height);
        field
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// True when either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Change the backing dimensions. Returns true if they changed.
    ///
    /// Contents are cleared on a change; the next [`PixelField::compute`]
    /// fills them again.
    pub fn resize(&mut self, width: u16, height: u16) -> bool {
        if width == self.width && height == self.height {
            return false;
        }
        self.width = width;
        self.height = height;
        self.data.clear();
        self.data
            .resize(width as usize * height as usize * Self::CHANNELS, 0);
        true
    }

    /// Wrap existing RGBA bytes. `None` if the length does not match.
    pub fn from_rgba(width: u16, height: u16, data: Vec<u8>) -> Option<Self> {
        (data.len() == width as usize * height as usize * Self::CHANNELS).then_some(Self {
            width,
            height,
            data,
        })
    }

    /// RGBA bytes in row-major order.
    pub fn as_rgba(&self) -> &[u8] {
        &self.data
    }

    /// RGBA value at `(x, y)`, if inside the field.
    pub fn pixel(&self, x: u16, y: u16) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.offset(x, y);
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// RGB value at `(x, y)`. Callers keep coordinates in range.
    #[inline]
    pub(crate) fn rgb(&self, x: u16, y: u16) -> Rgb {
        let i = self.offset(x, y);
        Rgb::new(self.data[i], self.data[i + 1], self.data[i + 2])
    }

    #[inline]
    fn offset(&self, x: u16, y: u16) -> usize {
        (y as usize * self.width as usize + x as usize) * Self::CHANNELS
    }

    /// Recompute every pixel for one frame.
    pub fn compute(
        &mut self,
        table: &SineTable,
        stops: &[Rgb; STOP_COUNT],
        elapsed_secs: f64,
        speed: AnimationSpeed,
    ) {
        if self.is_empty() {
            return;
        }
        let phases = FramePhases::at(elapsed_secs, speed);
        let (width, height) = (self.width, self.height);
        let row_len = width as usize * Self::CHANNELS;

        for (y, row) in self.data.chunks_exact_mut(row_len).enumerate() {
            let row_phases = RowPhases::new(&phases, normalized(y as u16, height));
            for (x, px) in row.chunks_exact_mut(Self::CHANNELS).enumerate() {
                let lightness = row_phases.lightness(table, normalized(x as u16, width));
                let color = map_lightness(stops, lightness);
                px.copy_from_slice(&[color.r, color.g, color.b, u8::MAX]);
            }
        }
    }
}

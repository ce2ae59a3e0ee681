//! Presenting the low-resolution field on a terminal surface.
//!
//! A terminal cell holds two surface pixels stacked vertically: the upper
//! half block's foreground is the top pixel and its background the bottom
//! one. The field is upscaled to that grid with bilinear sampling.

use morphwave_core::Rgb;
use ratatui::{
    buffer::Buffer,
    layout::{Rect, Size},
    style::Color,
    widgets::Widget,
};
use tracing::debug;

use crate::field::PixelField;

/// Default fraction of the surface resolution the field is computed at.
pub const DEFAULT_SCALE: f32 = 0.35;
/// Smallest accepted scale.
pub const MIN_SCALE: f32 = 0.05;
/// Largest accepted scale.
pub const MAX_SCALE: f32 = 1.0;

const UPPER_HALF: &str = "▀";

/// Pixel size of a grid of terminal cells (two pixels per cell row).
pub fn surface_pixels(cells: Size) -> Size {
    Size::new(cells.width, cells.height.saturating_mul(2))
}

/// Keeps the field's dimensions in step with the display surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Presenter {
    /// Scale in whole percent, so internal sizes are exact integer floors.
    scale_percent: u16,
    surface: Option<Size>,
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new(DEFAULT_SCALE)
    }
}

impl Presenter {
    /// Create a presenter. `scale` is clamped to `[MIN_SCALE, MAX_SCALE]`
    /// and rounded to the nearest percent; a non-finite scale falls back to
    /// [`DEFAULT_SCALE`].
    pub fn new(scale: f32) -> Self {
        let scale = if scale.is_finite() {
            scale.clamp(MIN_SCALE, MAX_SCALE)
        } else {
            DEFAULT_SCALE
        };
        Self {
            scale_percent: (scale * 100.0).round() as u16,
            surface: None,
        }
    }

    pub fn scale(&self) -> f32 {
        f32::from(self.scale_percent) / 100.0
    }

    pub fn scale_percent(&self) -> u16 {
        self.scale_percent
    }

    /// Last observed surface size, if a surface is attached.
    pub fn surface(&self) -> Option<Size> {
        self.surface
    }

    /// Internal field size for a surface of `surface` pixels.
    pub fn internal_size(&self, surface: Size) -> Size {
        let percent = u32::from(self.scale_percent);
        let shrink = |extent: u16| (u32::from(extent) * percent / 100) as u16;
        Size::new(shrink(surface.width), shrink(surface.height))
    }

    /// Record the current surface and resize `field` to match.
    ///
    /// `None` means no surface is attached; the field is emptied so frames
    /// become no-ops. Returns true if the field's dimensions changed.
    pub fn observe(&mut self, surface: Option<Size>, field: &mut PixelField) -> bool {
        if surface == self.surface {
            return false;
        }
        self.surface = surface;
        let internal = surface.map_or(Size::new(0, 0), |s| self.internal_size(s));
        let changed = field.resize(internal.width, internal.height);
        if changed {
            debug!(
                surface = ?surface,
                width = internal.width,
                height = internal.height,
                "pixel field resized"
            );
        }
        changed
    }
}

/// Bilinear sample of `field` for surface pixel `(sx, sy)` of a
/// `surface`-sized grid. Samples at pixel centers and clamps at the edges.
pub fn sample_bilinear(field: &PixelField, sx: u16, sy: u16, surface: Size) -> Rgb {
    if field.is_empty() {
        return Rgb::default();
    }
    let (fw, fh) = (field.width(), field.height());
    let u = source_coord(sx, surface.width, fw);
    let v = source_coord(sy, surface.height, fh);

    let x0 = u.floor() as u16;
    let y0 = v.floor() as u16;
    let x1 = (x0 + 1).min(fw - 1);
    let y1 = (y0 + 1).min(fh - 1);
    let tx = u - x0 as f32;
    let ty = v - y0 as f32;

    let top = mix(field.rgb(x0, y0), field.rgb(x1, y0), tx);
    let bottom = mix(field.rgb(x0, y1), field.rgb(x1, y1), tx);
    mix_round(top, bottom, ty)
}

/// Source coordinate in `[0, src - 1]` for destination pixel `dst` of `dst_len`.
fn source_coord(dst: u16, dst_len: u16, src_len: u16) -> f32 {
    let ratio = src_len as f32 / dst_len.max(1) as f32;
    ((dst as f32 + 0.5) * ratio - 0.5).clamp(0.0, (src_len - 1) as f32)
}

#[derive(Debug, Clone, Copy)]
struct Mixed {
    r: f32,
    g: f32,
    b: f32,
}

fn mix(a: Rgb, b: Rgb, t: f32) -> Mixed {
    let lerp = |a: u8, b: u8| a as f32 + (b as f32 - a as f32) * t;
    Mixed {
        r: lerp(a.r, b.r),
        g: lerp(a.g, b.g),
        b: lerp(a.b, b.b),
    }
}

fn mix_round(a: Mixed, b: Mixed, t: f32) -> Rgb {
    let lerp = |a: f32, b: f32| (a + (b - a) * t).round().clamp(0.0, 255.0) as u8;
    Rgb::new(lerp(a.r, b.r), lerp(a.g, b.g), lerp(a.b, b.b))
}

fn to_color(c: Rgb) -> Color {
    Color::Rgb(c.r, c.g, c.b)
}

/// Widget drawing a [`PixelField`] stretched over its whole area.
#[derive(Debug, Clone, Copy)]
pub struct FieldView<'a> {
    field: &'a PixelField,
}

impl<'a> FieldView<'a> {
    pub fn new(field: &'a PixelField) -> Self {
        Self { field }
    }
}

impl Widget for FieldView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = area.intersection(buf.area);
        if self.field.is_empty() || area.is_empty() {
            return;
        }
        let surface = surface_pixels(Size::from(area));
        for row in 0..area.height {
            for col in 0..area.width {
                let top = sample_bilinear(self.field, col, row * 2, surface);
                let bottom = sample_bilinear(self.field, col, row * 2 + 1, surface);
                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_symbol(UPPER_HALF)
                        .set_fg(to_color(top))
                        .set_bg(to_color(bottom));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use morphwave_core::{AnimationSpeed, ColorTheme};

    use crate::sine::SineTable;

    fn solid(width: u16, height: u16, color: Rgb) -> PixelField {
        // Lightness pinned by using a single-color gradient.
        let stops = [color; 4];
        let mut field = PixelField::new(width, height);
        field.compute(&SineTable::new(), &stops, 0.0, AnimationSpeed::Normal);
        field
    }

    #[test]
    fn test_internal_size_is_floored_fraction() {
        let presenter = Presenter::default();
        assert_eq!(presenter.internal_size(Size::new(80, 48)), Size::new(28, 16));
        assert_eq!(presenter.internal_size(Size::new(2, 2)), Size::new(0, 0));
    }

    #[test]
    fn test_internal_size_is_exact_for_every_percent() {
        for percent in 5..=100u16 {
            let presenter = Presenter::new(f32::from(percent) / 100.0);
            assert_eq!(presenter.scale_percent(), percent);
            for extent in [1u16, 7, 99, 100, 333, 1000, u16::MAX] {
                let expected = (u32::from(extent) * u32::from(percent) / 100) as u16;
                let size = presenter.internal_size(Size::new(extent, extent));
                assert_eq!(size, Size::new(expected, expected), "{percent}% of {extent}");
            }
        }
    }

    #[test]
    fn test_scale_is_clamped() {
        assert_eq!(Presenter::new(4.0).scale(), MAX_SCALE);
        assert_eq!(Presenter::new(0.0).scale(), MIN_SCALE);
        assert_eq!(Presenter::new(f32::NAN).scale(), DEFAULT_SCALE);
        assert_eq!(Presenter::new(0.354).scale_percent(), 35);
    }

    #[test]
    fn test_observe_resizes_on_change_only() {
        let mut presenter = Presenter::default();
        let mut field = PixelField::default();

        assert!(presenter.observe(Some(Size::new(100, 60)), &mut field));
        assert_eq!((field.width(), field.height()), (35, 21));
        assert!(!presenter.observe(Some(Size::new(100, 60)), &mut field));

        assert!(presenter.observe(Some(Size::new(200, 100)), &mut field));
        assert_eq!((field.width(), field.height()), (70, 35));

        assert!(presenter.observe(None, &mut field));
        assert!(field.is_empty());
        assert_eq!(presenter.surface(), None);
    }

    #[test]
    fn test_bilinear_of_solid_field_is_solid() {
        let color = Rgb::new(12, 200, 99);
        let field = solid(5, 3, color);
        let surface = Size::new(17, 11);
        for y in 0..surface.height {
            for x in 0..surface.width {
                assert_eq!(sample_bilinear(&field, x, y, surface), color);
            }
        }
    }

    #[test]
    fn test_bilinear_blends_neighbours() {
        let field = PixelField::from_rgba(2, 1, vec![0, 0, 0, 255, 255, 255, 255, 255]).unwrap();
        let surface = Size::new(4, 1);
        // Centers of surface pixels 0 and 3 fall past the field's edge pixels.
        assert_eq!(sample_bilinear(&field, 0, 0, surface), Rgb::new(0, 0, 0));
        assert_eq!(sample_bilinear(&field, 3, 0, surface), Rgb::new(255, 255, 255));
        // Inner pixels are smooth blends, not a hard step.
        assert_eq!(sample_bilinear(&field, 1, 0, surface), Rgb::new(64, 64, 64));
        assert_eq!(sample_bilinear(&field, 2, 0, surface), Rgb::new(191, 191, 191));
    }

    #[test]
    fn test_bilinear_of_empty_field() {
        let field = PixelField::default();
        assert_eq!(sample_bilinear(&field, 3, 3, Size::new(8, 8)), Rgb::default());
    }

    #[test]
    fn test_field_view_fills_area() {
        let field = solid(4, 4, Rgb::new(1, 2, 3));
        let area = Rect::new(0, 0, 6, 3);
        let mut buf = Buffer::empty(area);
        FieldView::new(&field).render(area, &mut buf);
        for y in 0..3 {
            for x in 0..6 {
                let cell = &buf[(x, y)];
                assert_eq!(cell.symbol(), UPPER_HALF);
                assert_eq!(cell.fg, Color::Rgb(1, 2, 3));
                assert_eq!(cell.bg, Color::Rgb(1, 2, 3));
            }
        }
    }

    #[test]
    fn test_field_view_skips_empty_field() {
        let field = PixelField::default();
        let area = Rect::new(0, 0, 4, 2);
        let mut buf = Buffer::empty(area);
        FieldView::new(&field).render(area, &mut buf);
        assert_eq!(buf, Buffer::empty(area));
    }

    #[test]
    fn test_themed_field_renders() {
        let table = SineTable::new();
        let mut field = PixelField::new(8, 6);
        field.compute(&table, ColorTheme::Ocean.stops(), 1.0, AnimationSpeed::Normal);
        let area = Rect::new(0, 0, 20, 8);
        let mut buf = Buffer::empty(area);
        FieldView::new(&field).render(area, &mut buf);
        assert!(matches!(buf[(19, 7)].bg, Color::Rgb(..)));
    }
}

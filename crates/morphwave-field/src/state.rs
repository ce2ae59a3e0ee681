//! Wave background state management.

use std::time::Duration;

use morphwave_core::{AnimationSpeed, ColorTheme};
use ratatui::layout::Size;
use tracing::debug;

use crate::field::PixelField;
use crate::presenter::{DEFAULT_SCALE, FieldView, Presenter};
use crate::scheduler::{
    AnimationClock, DEFAULT_TARGET_FPS, FrameScheduler, RefreshSource, TickHandle, TickOutcome,
};
use crate::sine::{DEFAULT_TABLE_SIZE, SineTable};

/// Construction parameters for a [`WaveBackground`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveSettings {
    pub theme: ColorTheme,
    pub speed: AnimationSpeed,
    /// Fraction of the surface resolution the field is computed at.
    pub scale: f32,
    pub target_fps: u32,
    pub table_size: usize,
}

impl Default for WaveSettings {
    fn default() -> Self {
        Self {
            theme: ColorTheme::default(),
            speed: AnimationSpeed::default(),
            scale: DEFAULT_SCALE,
            target_fps: DEFAULT_TARGET_FPS,
            table_size: DEFAULT_TABLE_SIZE,
        }
    }
}

/// One animated gradient background.
///
/// Owns its sine table, clock, scheduler and pixel field, so independent
/// instances never share timing or buffers.
#[derive(Debug)]
pub struct WaveBackground {
    table: SineTable,
    theme: ColorTheme,
    speed: AnimationSpeed,
    scheduler: FrameScheduler,
    clock: AnimationClock,
    presenter: Presenter,
    field: PixelField,
    /// Number of full field computations so far.
    frames: u64,
    /// The field was resized after it had been drawn and needs refilling.
    resized: bool,
}

impl Default for WaveBackground {
    fn default() -> Self {
        Self::new(WaveSettings::default())
    }
}

impl WaveBackground {
    /// Create a new wave background. Nothing is scheduled until [`start`].
    ///
    /// [`start`]: WaveBackground::start
    pub fn new(settings: WaveSettings) -> Self {
        Self {
            table: SineTable::with_size(settings.table_size),
            theme: settings.theme,
            speed: settings.speed,
            scheduler: FrameScheduler::new(settings.target_fps),
            clock: AnimationClock::default(),
            presenter: Presenter::new(settings.scale),
            field: PixelField::default(),
            frames: 0,
            resized: false,
        }
    }

    pub fn theme(&self) -> ColorTheme {
        self.theme
    }

    /// Switch themes. Takes effect on the next computed frame.
    pub fn set_theme(&mut self, theme: ColorTheme) {
        if theme != self.theme {
            debug!(%theme, "theme changed");
            self.theme = theme;
        }
    }

    pub fn speed(&self) -> AnimationSpeed {
        self.speed
    }

    pub fn set_speed(&mut self, speed: AnimationSpeed) {
        if speed != self.speed {
            debug!(%speed, "speed changed");
            self.speed = speed;
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.clock.elapsed_secs()
    }

    pub fn frames_computed(&self) -> u64 {
        self.frames
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn field(&self) -> &PixelField {
        &self.field
    }

    /// Begin requesting ticks from `source`.
    pub fn start<S: RefreshSource + ?Sized>(&mut self, source: &mut S) {
        self.scheduler.start(source);
    }

    /// Stop for good: the pending tick is cancelled and later ticks ignored.
    pub fn teardown<S: RefreshSource + ?Sized>(&mut self, source: &mut S) {
        self.scheduler.teardown(source);
    }

    /// Report the current surface size in pixels, or `None` if detached.
    ///
    /// A size change resizes the field. While running, the next tick
    /// refills it even if that tick is throttled, so a resize costs one
    /// computation and never shows a blank frame. Nothing is computed here.
    pub fn observe_surface(&mut self, surface: Option<Size>) {
        if self.presenter.observe(surface, &mut self.field) && self.is_running() {
            self.resized = self.frames > 0;
        }
    }

    /// Handle a tick from the host. Returns true if a new field was computed
    /// and should be presented.
    pub fn on_refresh<S: RefreshSource + ?Sized>(
        &mut self,
        handle: TickHandle,
        timestamp: Duration,
        source: &mut S,
    ) -> bool {
        match self.scheduler.on_tick(handle, timestamp, source) {
            TickOutcome::Accepted { elapsed_secs } => {
                self.clock.advance_to(elapsed_secs);
                // Without a surface the tick is a no-op.
                if self.field.is_empty() {
                    return false;
                }
                self.compute();
                true
            }
            TickOutcome::Throttled if self.resized && !self.field.is_empty() => {
                self.compute();
                true
            }
            TickOutcome::Throttled | TickOutcome::Ignored => false,
        }
    }

    fn compute(&mut self) {
        self.field.compute(
            &self.table,
            self.theme.stops(),
            self.clock.elapsed_secs(),
            self.speed,
        );
        self.frames += 1;
        self.resized = false;
    }

    /// Widget presenting the current field.
    pub fn view(&self) -> FieldView<'_> {
        FieldView::new(&self.field)
    }
}

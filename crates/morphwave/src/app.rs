//! The terminal application: event loop, key handling and the info overlay.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use morphwave_config::Config;
use morphwave_core::ColorTheme;
use morphwave_field::{WaveBackground, surface_pixels};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style, Stylize},
    text::Line,
    widgets::{Block, BorderType, Clear, Paragraph},
};
use tracing::{debug, info};

use crate::refresh::TerminalRefresh;

/// Width of the overlay panel in cells.
const PANEL_WIDTH: u16 = 40;

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    /// Animated background.
    background: WaveBackground,
    /// Tick source standing in for display refresh.
    refresh: TerminalRefresh,
    /// Settings, updated as the user changes them.
    config: Config,
    /// Overlay or theme changed since the last draw.
    needs_redraw: bool,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(config: Config) -> Self {
        Self {
            running: false,
            background: WaveBackground::new(config.wave_settings()),
            refresh: TerminalRefresh::new(config.refresh_hz),
            config,
            needs_redraw: true,
        }
    }

    /// Run the application's main loop. Returns the settings as the user
    /// left them.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<Config> {
        self.running = true;
        self.background.start(&mut self.refresh);
        info!(theme = %self.config.theme, "wave background started");

        let result = self.event_loop(&mut terminal);

        self.background.teardown(&mut self.refresh);
        info!(
            frames = self.background.frames_computed(),
            elapsed = self.background.elapsed_secs(),
            "wave background stopped"
        );
        result.map(|()| self.config)
    }

    fn event_loop(&mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        while self.running {
            let Some(wait) = self.refresh.time_until_due(self.refresh.now()) else {
                break;
            };
            self.handle_crossterm_events(wait)?;
            if !self.running {
                break;
            }

            let Some((handle, slot)) = self.refresh.fire_due(self.refresh.now()) else {
                continue;
            };
            let size = terminal.size()?;
            self.background.observe_surface(Some(surface_pixels(size)));

            let fresh = self.background.on_refresh(handle, slot, &mut self.refresh);
            if fresh || self.needs_redraw {
                terminal.draw(|frame| self.render(frame))?;
                self.needs_redraw = false;
            }
        }
        Ok(())
    }

    /// Renders the user interface.
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(self.background.view(), area);
        if self.config.show_overlay {
            self.render_overlay(frame, area);
        }
    }

    /// Draw the theme panel and key help over the background.
    fn render_overlay(&self, frame: &mut Frame, area: Rect) {
        let theme = self.background.theme();
        let accent = accent_color(theme);

        let [_, panel_row, _, help_row] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(6),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);
        let [_, panel, _] = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Length(PANEL_WIDTH),
            Constraint::Fill(1),
        ])
        .areas(panel_row);

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::new().fg(accent))
            .title(Line::from(" Wave Background ").bold().centered())
            .style(Style::new().bg(Color::Black).fg(Color::White));
        let body = Paragraph::new(vec![
            Line::from(theme.name()).bold().fg(accent),
            Line::from(theme.description()).dark_gray(),
            Line::from(""),
            Line::from(format!("speed {}", self.background.speed())).dark_gray(),
        ])
        .alignment(Alignment::Center)
        .block(block);

        frame.render_widget(Clear, panel);
        frame.render_widget(body, panel);

        let help = Line::from(vec![
            "q".bold().fg(accent),
            " quit  ".white(),
            "t".bold().fg(accent),
            " theme  ".white(),
            "1-4".bold().fg(accent),
            " pick  ".white(),
            "s".bold().fg(accent),
            " speed  ".white(),
            "h".bold().fg(accent),
            " hide".white(),
        ])
        .centered()
        .bg(Color::Black);
        frame.render_widget(help, help_row);
    }

    /// Reads the crossterm events and updates the state of [`App`].
    /// Waits at most `timeout` so the next refresh is not delayed.
    fn handle_crossterm_events(&mut self, timeout: Duration) -> color_eyre::Result<()> {
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Resize(width, height) => {
                    debug!(width, height, "terminal resized");
                    self.needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char('t') | KeyCode::Char('c')) => self.set_theme(self.config.theme.next()),
            (_, KeyCode::Char(digit @ '1'..='9')) => {
                let picked = digit
                    .to_digit(10)
                    .and_then(|d| ColorTheme::from_position(d as usize));
                if let Some(theme) = picked {
                    self.set_theme(theme);
                }
            }
            (_, KeyCode::Char('s')) => self.cycle_speed(),
            (_, KeyCode::Char('h')) => self.toggle_overlay(),
            _ => {}
        }
    }

    fn set_theme(&mut self, theme: ColorTheme) {
        self.config.theme = theme;
        self.background.set_theme(theme);
        self.needs_redraw = true;
    }

    fn cycle_speed(&mut self) {
        self.config.speed = self.config.speed.next();
        self.background.set_speed(self.config.speed);
        self.needs_redraw = true;
    }

    fn toggle_overlay(&mut self) {
        self.config.show_overlay = !self.config.show_overlay;
        self.needs_redraw = true;
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}

/// Lightest stop of the theme, used for highlights.
fn accent_color(theme: ColorTheme) -> Color {
    let stop = theme.stops()[3];
    Color::Rgb(stop.r, stop.g, stop.b)
}

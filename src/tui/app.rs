use anyhow::Result;
use chrono::{Local, NaiveDate, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use log::warn;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};
use rusqlite::Connection;
use std::time::Duration;

use crate::config::AppConfig;
use crate::db::repository::{BookmarkRepo, KhatamRepo};
use crate::models::{ClockMinutes, KhatamPlan, PrayerTimes, ReadingPosition};
use crate::prayer_times::{compute_window, PrayerCalculator, PrayerWindow, QiblaBearing};
use crate::reading::ReadingTracker;
use crate::tui::events::{Event, EventHandler};
use crate::tui::labels::{labels, Labels};
use crate::tui::theme;
use crate::tui::widgets::{header, khatam, next_prayer, prayers, reading, statusbar};
use crate::utils::hijri::today_hijri_string;

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Dashboard,
    Help,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    KhatamInput,
}

pub struct App {
    pub view: View,
    pub config: AppConfig,
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub input_error: Option<String>,
    pub flash: Option<String>,

    // Refreshed on load, on `r`, and when the date rolls over
    pub today: NaiveDate,
    pub hijri_str: String,
    pub qibla: QiblaBearing,
    pub times: Option<PrayerTimes>,
    pub window: Option<PrayerWindow>,
    pub window_error: Option<String>,
    pub last_read: Option<ReadingPosition>,
    pub bookmark_count: i64,
    pub khatam: Option<KhatamPlan>,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let hijri_str =
            today_hijri_string(config.location.hijri_offset, config.display.app_language);

        let qibla = QiblaBearing::from_location(&config.location);

        App {
            view: View::Dashboard,
            config,
            should_quit: false,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            input_error: None,
            flash: None,
            today: Local::now().date_naive(),
            hijri_str,
            qibla,
            times: None,
            window: None,
            window_error: None,
            last_read: None,
            bookmark_count: 0,
            khatam: None,
        }
    }

    fn labels(&self) -> &'static Labels {
        labels(self.config.display.app_language)
    }

    pub fn load(&mut self, conn: &Connection) -> Result<()> {
        self.refresh_times();

        let tracker = ReadingTracker::load(conn)?;
        self.last_read = tracker.last_read().cloned();
        self.bookmark_count = BookmarkRepo::count(conn)?;
        self.khatam = KhatamRepo::active(conn)?;
        Ok(())
    }

    /// Recalculate today's times. Failures are shown in the next-prayer card.
    fn refresh_times(&mut self) {
        self.today = Local::now().date_naive();
        self.hijri_str = today_hijri_string(
            self.config.location.hijri_offset,
            self.config.display.app_language,
        );

        let computed = PrayerCalculator::from_location(&self.config.location)
            .and_then(|calc| calc.times_for_date(self.today));
        match computed {
            Ok(times) => {
                self.times = Some(times);
                self.window_error = None;
            }
            Err(e) => {
                warn!("prayer time calculation failed: {:#}", e);
                self.times = None;
                self.window = None;
                self.window_error = Some(e.to_string());
            }
        }
        self.recompute_window();
    }

    fn recompute_window(&mut self) {
        let Some(times) = &self.times else {
            return;
        };
        let now = ClockMinutes::from_time(Local::now().time());
        match compute_window(times, now) {
            Ok(w) => {
                self.window = Some(w);
                self.window_error = None;
            }
            Err(e) => {
                self.window = None;
                self.window_error = Some(e.to_string());
            }
        }
    }

    pub fn tick(&mut self) {
        if Local::now().date_naive() != self.today {
            self.refresh_times();
        } else {
            self.recompute_window();
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, conn: &Connection) {
        // Only handle actual key presses, ignore release/repeat events from some terminals
        if key.kind != KeyEventKind::Press {
            return;
        }
        match self.input_mode {
            InputMode::KhatamInput => self.handle_khatam_input(key, conn),
            InputMode::Normal => match self.view {
                View::Dashboard => self.handle_dashboard_key(key, conn),
                View::Help => self.handle_help_key(key),
            },
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent, conn: &Connection) {
        self.flash = None;
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Char('?') => {
                self.view = View::Help;
            }
            KeyCode::Char('r') => {
                if let Err(e) = self.load(conn) {
                    warn!("reload failed: {:#}", e);
                    self.window_error = Some(e.to_string());
                }
            }
            KeyCode::Char('l') => {
                self.input_mode = InputMode::KhatamInput;
                self.input_buffer.clear();
                self.input_error = if self.khatam.is_none() {
                    Some("No active plan: run `tilawah khatam start <days>`".to_string())
                } else {
                    None
                };
            }
            _ => {}
        }
    }

    fn handle_help_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('?') => {
                self.view = View::Dashboard;
            }
            _ => {}
        }
    }

    fn handle_khatam_input(&mut self, key: KeyEvent, conn: &Connection) {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.input_buffer.clear();
                self.input_error = None;
            }
            KeyCode::Enter => {
                let trimmed = self.input_buffer.trim().to_string();
                if trimmed.is_empty() {
                    self.input_error = Some("Enter a number of pages first".to_string());
                    return;
                }
                let pages = match trimmed.parse::<u32>() {
                    Ok(p) => p,
                    Err(_) => {
                        self.input_error = Some(format!("'{}' is not a valid number", trimmed));
                        return;
                    }
                };
                match self.log_khatam_pages(conn, pages) {
                    Ok(()) => {
                        self.input_mode = InputMode::Normal;
                        self.input_buffer.clear();
                        self.input_error = None;
                        self.flash = Some(format!("✓ Logged {} pages", pages));
                    }
                    Err(e) => {
                        self.input_error = Some(e.to_string());
                    }
                }
            }
            KeyCode::Backspace => {
                self.input_buffer.pop();
                self.input_error = None;
            }
            KeyCode::Char(c) if c.is_ascii_digit() => {
                self.input_buffer.push(c);
                self.input_error = None;
            }
            _ => {}
        }
    }

    fn log_khatam_pages(&mut self, conn: &Connection, pages: u32) -> Result<()> {
        let mut plan = self
            .khatam
            .clone()
            .ok_or_else(|| anyhow::anyhow!("No active plan"))?;
        plan.log_pages(Local::now().date_naive(), pages)?;
        KhatamRepo::save(conn, &plan)?;
        self.khatam = Some(plan);
        Ok(())
    }

    pub fn draw(&self, frame: &mut Frame) {
        self.draw_dashboard(frame);

        if self.view == View::Help {
            self.draw_help_overlay(frame);
        }

        if self.input_mode == InputMode::KhatamInput {
            self.draw_khatam_input(frame);
        }
    }

    fn draw_dashboard(&self, frame: &mut Frame) {
        let area = frame.area();
        let labels = self.labels();
        let accent = self.config.display.theme_color;

        frame.render_widget(Block::default().style(theme::base()), area);

        let outer_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5), // header
                Constraint::Min(0),    // body
                Constraint::Length(1), // status bar
            ])
            .split(area);

        header::render(
            frame,
            outer_chunks[0],
            &self.hijri_str,
            &self.config.location.name,
            self.qibla,
            labels,
            accent,
        );
        statusbar::render(frame, outer_chunks[2], self.flash.as_deref());

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(outer_chunks[1]);

        // Left column: prayer list + next prayer
        let left_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(8), // six prayers + borders
                Constraint::Min(7),    // next prayer
            ])
            .split(columns[0]);

        prayers::render(
            frame,
            left_chunks[0],
            self.times.as_ref(),
            self.window.as_ref(),
            labels,
            accent,
        );
        next_prayer::render(
            frame,
            left_chunks[1],
            self.window.as_ref(),
            self.window_error.as_deref(),
            labels,
        );

        // Right column: last read + khatam
        let right_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(7), Constraint::Min(0)])
            .split(columns[1]);

        reading::render(
            frame,
            right_chunks[0],
            self.last_read.as_ref(),
            self.bookmark_count,
            labels,
            accent,
        );
        khatam::render(frame, right_chunks[1], self.khatam.as_ref(), Utc::now(), labels);
    }

    fn draw_help_overlay(&self, frame: &mut Frame) {
        let area = frame.area();
        let popup_area = centered(area, area.width / 2, 12);

        frame.render_widget(Clear, popup_area);

        let key_line = |key: &'static str, what: &'static str| {
            Line::from(vec![
                Span::styled(key, theme::gold()),
                Span::styled(what, theme::dim()),
            ])
        };

        let help_text = vec![
            Line::from(Span::styled(
                "  Keybindings",
                theme::gold().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            key_line("  [r]        ", "Reload times, last read and plan"),
            key_line("  [l]        ", "Log khatam pages for today"),
            key_line("  [?]        ", "Toggle help"),
            key_line("  [Esc] [q]  ", "Quit"),
            Line::from(""),
            Line::from(Span::styled(
                "  Record reading with `tilawah read <surah> <ayah>`",
                theme::dim(),
            )),
        ];

        let block = Block::default()
            .title(Span::styled(" Help ", theme::gold()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::gold())
            .style(theme::surface());

        let paragraph = Paragraph::new(help_text).block(block);
        frame.render_widget(paragraph, popup_area);
    }

    fn draw_khatam_input(&self, frame: &mut Frame) {
        let area = frame.area();
        let height = if self.input_error.is_some() { 7 } else { 5 };
        let popup_area = centered(area, area.width / 2, height);

        frame.render_widget(Clear, popup_area);

        let mut text = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("  Pages read today: ", theme::dim()),
                Span::styled(
                    self.input_buffer.as_str(),
                    theme::gold().add_modifier(Modifier::BOLD),
                ),
                Span::styled("█", theme::amber()),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "  Type a number, then [Enter]  ·  [Esc] cancel",
                theme::dim(),
            )),
        ];

        if let Some(err) = &self.input_error {
            text.push(Line::from(""));
            text.push(Line::from(Span::styled(format!("  ✗ {}", err), theme::red())));
        }

        let border_style = if self.input_error.is_some() {
            theme::red()
        } else {
            theme::amber()
        };

        let block = Block::default()
            .title(Span::styled(" Log Khatam Pages ", theme::gold()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .style(theme::surface());

        let paragraph = Paragraph::new(text).block(block);
        frame.render_widget(paragraph, popup_area);
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Run the TUI event loop.
pub fn run(conn: Connection, config: AppConfig) -> Result<()> {
    let mut app = App::new(config);
    app.load(&conn)?;

    let mut terminal = ratatui::init();
    let events = EventHandler::new(Duration::from_millis(1000));

    let result = (|| -> Result<()> {
        loop {
            terminal.draw(|frame| app.draw(frame))?;

            match events.next()? {
                Event::Key(key) => {
                    app.handle_key(key, &conn);
                    if app.should_quit {
                        return Ok(());
                    }
                }
                Event::Resize => {}
                Event::Tick => app.tick(),
            }
        }
    })();

    ratatui::restore();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crossterm::event::KeyModifiers;
    use ratatui::{backend::TestBackend, Terminal};

    fn db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn load_computes_a_window() {
        let conn = db();
        let mut app = App::new(AppConfig::default());
        app.load(&conn).unwrap();
        assert!(app.times.is_some());
        assert!(app.window.is_some());
        assert!(app.window_error.is_none());
        assert!(app.last_read.is_none());
        assert_eq!(app.qibla.compass_point(), "WNW");
    }

    #[test]
    fn bad_method_is_reported_not_fatal() {
        let conn = db();
        let mut config = AppConfig::default();
        config.location.calc_method = "Nope".into();
        let mut app = App::new(config);
        app.load(&conn).unwrap();
        assert!(app.window.is_none());
        assert!(app.window_error.is_some());
    }

    #[test]
    fn log_pages_through_popup() {
        let conn = db();
        let mut plan = KhatamPlan::new(30, Utc::now()).unwrap();
        plan.id = Some(KhatamRepo::create(&conn, &plan).unwrap());

        let mut app = App::new(AppConfig::default());
        app.load(&conn).unwrap();
        app.handle_key(press(KeyCode::Char('l')), &conn);
        assert_eq!(app.input_mode, InputMode::KhatamInput);
        app.handle_key(press(KeyCode::Char('1')), &conn);
        app.handle_key(press(KeyCode::Char('2')), &conn);
        app.handle_key(press(KeyCode::Enter), &conn);

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.khatam.as_ref().map(|p| p.pages_read), Some(12));
        let stored = KhatamRepo::active(&conn).unwrap().unwrap();
        assert_eq!(stored.pages_read, 12);
    }

    #[test]
    fn oversized_page_log_stays_in_popup() {
        let conn = db();
        let mut plan = KhatamPlan::new(30, Utc::now()).unwrap();
        plan.id = Some(KhatamRepo::create(&conn, &plan).unwrap());

        let mut app = App::new(AppConfig::default());
        app.load(&conn).unwrap();
        app.handle_key(press(KeyCode::Char('l')), &conn);
        for c in "9999".chars() {
            app.handle_key(press(KeyCode::Char(c)), &conn);
        }
        app.handle_key(press(KeyCode::Enter), &conn);

        assert_eq!(app.input_mode, InputMode::KhatamInput);
        assert!(app.input_error.is_some());
        assert_eq!(KhatamRepo::active(&conn).unwrap().unwrap().pages_read, 0);
    }

    #[test]
    fn quit_keys() {
        let conn = db();
        let mut app = App::new(AppConfig::default());
        app.handle_key(press(KeyCode::Char('?')), &conn);
        assert_eq!(app.view, View::Help);
        app.handle_key(press(KeyCode::Esc), &conn);
        assert_eq!(app.view, View::Dashboard);
        assert!(!app.should_quit);
        app.handle_key(press(KeyCode::Esc), &conn);
        assert!(app.should_quit);
    }

    #[test]
    fn draws_without_panicking() {
        let conn = db();
        let mut app = App::new(AppConfig::default());
        app.load(&conn).unwrap();
        app.view = View::Help;
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();

        let screen: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(screen.contains("Qibla"));
        assert!(screen.contains("WNW"));
    }
}

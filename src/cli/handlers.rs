use anyhow::{anyhow, Context, Result};
use chrono::{Datelike, Local, Utc};
use log::info;
use rusqlite::Connection;
use std::path::Path;

use crate::cli::args::{BookmarkCommands, KhatamCommands, SetupArgs};
use crate::config::AppConfig;
use crate::db::repository::{BookmarkRepo, KhatamRepo};
use crate::error::KhatamError;
use crate::models::{
    AyahNumber, Bookmark, ClockMinutes, JuzIndex, KhatamPlan, PrayerName, PrayerTimes,
    ReadingLocation, ReadingPosition, SurahIndex, MUSHAF_PAGES,
};
use crate::prayer_times::calculator::{CALC_METHODS, MADHABS};
use crate::prayer_times::{compute_window, PrayerCalculator, QiblaBearing};
use crate::reading::ReadingTracker;
use crate::utils::format::{pad_display, progress_bar};
use crate::utils::hijri::month_calendar;

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const GOLD: &str = "\x1b[38;2;196;160;68m";

// ─── Setup ───────────────────────────────────────────────────────────────────

pub fn handle_setup(config: &mut AppConfig, args: &SetupArgs) -> Result<()> {
    apply_setup(config, args)?;
    config.save()?;

    let loc = &config.location;
    println_colored!(GREEN, "  ✓ Settings saved");
    println!();
    println!("  Location:  {} ({:.4}, {:.4})", loc.name, loc.latitude, loc.longitude);
    println!("  Method:    {} / {}", loc.calc_method, loc.madhab);
    println!("  UTC:       {}", format_tz_offset(loc.timezone_offset));
    println!("  Hijri:     {:+} days", loc.hijri_offset);
    println!(
        "  Display:   {} / {}",
        config.display.app_language.as_str(),
        config.display.theme_color.hex()
    );
    println!();
    Ok(())
}

/// Apply the given flags on top of `config`, validating each before anything changes.
fn apply_setup(config: &mut AppConfig, args: &SetupArgs) -> Result<()> {
    let mut next = if args.reset {
        AppConfig::default()
    } else {
        config.clone()
    };

    if let Some(name) = &args.name {
        next.location.name = name.clone();
    }
    if let Some(lat) = args.lat {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(anyhow!("Latitude must be between -90 and 90, got {}", lat));
        }
        next.location.latitude = lat;
    }
    if let Some(lng) = args.lng {
        if !(-180.0..=180.0).contains(&lng) {
            return Err(anyhow!("Longitude must be between -180 and 180, got {}", lng));
        }
        next.location.longitude = lng;
    }
    if let Some(tz) = &args.tz {
        next.location.timezone_offset =
            parse_tz_offset(tz).with_context(|| format!("Invalid UTC offset '{}'", tz))?;
    }
    if let Some(method) = &args.method {
        if !CALC_METHODS.contains(&method.as_str()) {
            return Err(anyhow!(
                "Unknown method '{}'. Use one of: {}",
                method,
                CALC_METHODS.join(", ")
            ));
        }
        next.location.calc_method = method.clone();
    }
    if let Some(madhab) = &args.madhab {
        if !MADHABS.contains(&madhab.as_str()) {
            return Err(anyhow!("Unknown madhab '{}'. Use Shafi or Hanafi", madhab));
        }
        next.location.madhab = madhab.clone();
    }
    if let Some(offset) = args.hijri_offset {
        next.location.hijri_offset = offset;
    }
    if let Some(lang) = &args.language {
        next.display.app_language = lang.parse()?;
    }
    if let Some(theme) = &args.theme {
        next.display.theme_color = theme.parse()?;
    }

    PrayerCalculator::from_location(&next.location)?;
    *config = next;
    Ok(())
}

// ─── Times ───────────────────────────────────────────────────────────────────

pub fn handle_times(config: &AppConfig, at: Option<&str>, timings: Option<&Path>) -> Result<()> {
    let today = Local::now().date_naive();
    let times = match timings {
        Some(path) => load_timings_file(path)?,
        None => PrayerCalculator::from_location(&config.location)?.times_for_date(today)?,
    };
    let now = match at {
        Some(s) => resolve_at(s, &times)?,
        None => ClockMinutes::from_time(Local::now().time()),
    };
    let window = compute_window(&times, now)?;

    println!();
    println_colored!(
        GOLD,
        "  Prayer Times — {} ({})",
        config.location.name,
        today.format("%Y-%m-%d")
    );
    println!();

    for (name, time) in times.entries() {
        let marker = if name == window.current.name {
            "◆"
        } else if name == window.next.name {
            "›"
        } else {
            " "
        };
        let line = format!("{} {}  {}", marker, pad_display(name.display_name(), 10), time);
        if name == window.current.name {
            println_colored!(GREEN, "  {}", line);
        } else if name == window.next.name {
            println_colored!(BOLD, "  {}", line);
        } else {
            println_colored!(DIM, "  {}", line);
        }
    }

    println!();
    println!("  Now:  {} (since {})", window.current.name, window.current.time);
    let when = if window.next.tomorrow { " tomorrow" } else { "" };
    println_colored!(
        AMBER,
        "  Next: {}{} at {} — in {}",
        window.next.name,
        when,
        window.next.time,
        window.next.countdown()
    );
    println!();
    Ok(())
}

/// `--at` takes either a clock time or a prayer name, which stands for that
/// prayer's time today.
fn resolve_at(at: &str, times: &PrayerTimes) -> Result<ClockMinutes> {
    if let Ok(t) = ClockMinutes::parse(at) {
        return Ok(t);
    }
    let name: PrayerName = at
        .parse()
        .with_context(|| format!("'{}' is neither HH:MM nor a prayer name", at))?;
    Ok(times.minutes_of(name)?)
}

pub fn load_timings_file(path: &Path) -> Result<PrayerTimes> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Reading {:?}", path))?;
    PrayerTimes::from_json(&content).with_context(|| format!("Loading timings from {:?}", path))
}

// ─── Reading progress ────────────────────────────────────────────────────────

pub fn handle_read(
    conn: &Connection,
    surah: u32,
    ayah: u32,
    juz: Option<u32>,
    label: Option<String>,
) -> Result<()> {
    let surah = SurahIndex::new(surah)?;
    let ayah = AyahNumber::new(ayah)?;
    let now = Utc::now();

    let candidate = match juz {
        Some(j) => {
            let juz = JuzIndex::new(j)?;
            let label = label.unwrap_or_else(|| format!("Juz {} Surah {}", juz, surah));
            ReadingPosition::juz(juz, surah, ayah, label, now)
        }
        None => {
            let label = label.unwrap_or_else(|| format!("Surah {}", surah));
            ReadingPosition::surah(surah, ayah, label, now)
        }
    };

    let mut tracker = ReadingTracker::load(conn)?;
    if tracker.observe(candidate)? {
        println_colored!(GREEN, "  ✓ Last read moved to {}:{}", surah, ayah);
    } else if let Some(last) = tracker.last_read() {
        println_colored!(
            DIM,
            "  ○ Kept last read at {}:{} ({})",
            last.surah_index(),
            last.ayah(),
            last.label
        );
    }
    Ok(())
}

pub fn handle_last(conn: &Connection) -> Result<()> {
    let tracker = ReadingTracker::load(conn)?;
    println!();
    match tracker.last_read() {
        None => println_colored!(DIM, "  No reading recorded yet. Use `tilawah read <surah> <ayah>`"),
        Some(pos) => {
            println_colored!(GOLD, "  Last read");
            println!();
            let star = if BookmarkRepo::is_bookmarked(conn, pos.surah_index(), pos.ayah())? {
                "  ★"
            } else {
                ""
            };
            println_colored!(BOLD, "  {}{}", pos.label, star);
            match pos.location {
                ReadingLocation::Surah { surah, ayah } => {
                    println!("  Surah {}, ayah {}", surah, ayah);
                }
                ReadingLocation::Juz { juz, surah, ayah } => {
                    println!("  Juz {} · surah {}, ayah {}", juz, surah, ayah);
                }
            }
            let local = pos.updated_at.with_timezone(&Local);
            println_colored!(DIM, "  {}", local.format("%Y-%m-%d %H:%M"));
        }
    }
    println!();
    Ok(())
}

// ─── Bookmarks ───────────────────────────────────────────────────────────────

pub fn handle_bookmark(conn: &Connection, action: &BookmarkCommands) -> Result<()> {
    match action {
        BookmarkCommands::Add { surah, ayah, label } => {
            let surah = SurahIndex::new(*surah)?;
            let ayah = AyahNumber::new(*ayah)?;
            let label = label
                .clone()
                .unwrap_or_else(|| format!("Surah {} ayah {}", surah, ayah));
            let bookmark = Bookmark::new(surah, ayah, label, Utc::now());
            if BookmarkRepo::add(conn, &bookmark)? {
                println_colored!(GREEN, "  ✓ Bookmarked {}:{}", surah, ayah);
            } else {
                println_colored!(DIM, "  {}:{} is already bookmarked", surah, ayah);
            }
        }
        BookmarkCommands::Remove { surah, ayah } => {
            let id = Bookmark::make_id(SurahIndex::new(*surah)?, AyahNumber::new(*ayah)?);
            if BookmarkRepo::remove(conn, &id)? {
                println_colored!(GREEN, "  ✓ Removed bookmark {}:{}", surah, ayah);
            } else {
                println_colored!(DIM, "  No bookmark at {}:{}", surah, ayah);
            }
        }
        BookmarkCommands::List => {
            let bookmarks = BookmarkRepo::list(conn)?;
            println!();
            if bookmarks.is_empty() {
                println_colored!(DIM, "  No bookmarks yet");
            } else {
                println_colored!(GOLD, "  Bookmarks ({})", bookmarks.len());
                println!();
                for b in &bookmarks {
                    println!(
                        "  {}  {}",
                        pad_display(&format!("{}:{}", b.surah, b.ayah), 8),
                        b.label
                    );
                }
            }
            println!();
        }
    }
    Ok(())
}

// ─── Khatam ──────────────────────────────────────────────────────────────────

pub fn handle_khatam(conn: &Connection, action: &KhatamCommands) -> Result<()> {
    let now = Utc::now();
    match action {
        KhatamCommands::Start { days } => {
            if KhatamRepo::active(conn)?.is_some() {
                return Err(KhatamError::AlreadyActive.into());
            }
            let mut plan = KhatamPlan::new(*days, now)?;
            plan.id = Some(KhatamRepo::create(conn, &plan)?);
            info!("started khatam plan {:?} for {} days", plan.id, days);
            println_colored!(
                GREEN,
                "  ✓ Khatam plan started: {} days, about {} pages a day",
                days,
                plan.daily_target_pages()
            );
        }
        KhatamCommands::Log { pages } => {
            let mut plan = require_active(conn)?;
            let finished = plan.log_pages(Local::now().date_naive(), *pages)?;
            KhatamRepo::save(conn, &plan)?;
            println_colored!(
                GREEN,
                "  ✓ Logged {} pages — {} / {}",
                pages,
                plan.pages_read.min(MUSHAF_PAGES),
                MUSHAF_PAGES
            );
            if finished {
                println_colored!(GOLD, "  All {} pages read. Run `tilawah khatam complete`", MUSHAF_PAGES);
            }
        }
        KhatamCommands::Status => {
            println!();
            match KhatamRepo::active(conn)? {
                None => println_colored!(DIM, "  No active plan. Start one with `tilawah khatam start 30`"),
                Some(plan) => print_plan(&plan, now),
            }
            println!();
        }
        KhatamCommands::Complete => {
            let mut plan = require_active(conn)?;
            plan.complete(now)?;
            KhatamRepo::save(conn, &plan)?;
            info!("completed khatam plan {:?}", plan.id);
            println_colored!(
                GOLD,
                "  ✓ Khatam complete in {} days. Alhamdulillah!",
                plan.duration_days()
            );
        }
        KhatamCommands::Abandon => {
            let mut plan = require_active(conn)?;
            plan.abandon(now)?;
            KhatamRepo::save(conn, &plan)?;
            info!("abandoned khatam plan {:?}", plan.id);
            println_colored!(AMBER, "  Khatam plan dropped");
        }
        KhatamCommands::History => {
            let done = KhatamRepo::completed(conn)?;
            println!();
            if done.is_empty() {
                println_colored!(DIM, "  No completed khatam yet");
            } else {
                println_colored!(GOLD, "  Completed khatam ({})", done.len());
                println!();
                for plan in &done {
                    let ended = plan
                        .ended_at
                        .map(|t| t.with_timezone(&Local).format("%Y-%m-%d").to_string())
                        .unwrap_or_else(|| "—".to_string());
                    println!(
                        "  {}  {} days  (target {})",
                        ended,
                        plan.duration_days(),
                        plan.target_days
                    );
                }
            }
            println!();
        }
    }
    Ok(())
}

fn require_active(conn: &Connection) -> Result<KhatamPlan> {
    KhatamRepo::active(conn)?
        .ok_or_else(|| anyhow!("No active khatam plan. Start one with `tilawah khatam start <days>`"))
}

fn print_plan(plan: &KhatamPlan, now: chrono::DateTime<Utc>) {
    println_colored!(GOLD, "  Khatam plan");
    println!();
    println_colored!(
        BOLD,
        "  Day {} / {}  ·  goal {} pages a day",
        plan.day_number(now),
        plan.target_days,
        plan.daily_target_pages()
    );
    println!(
        "  {}  {} / {} pages  ·  juz {}",
        progress_bar(plan.progress_ratio(), 24),
        plan.pages_read.min(MUSHAF_PAGES),
        MUSHAF_PAGES,
        plan.current_juz()
    );
    if !plan.is_finished() {
        println_colored!(DIM, "  {} pages to go", plan.pages_remaining());
    }
    if let Some(last) = plan.history.last() {
        println_colored!(DIM, "  Last logged: {} pages on {}", last.pages, last.date);
    }
}

// ─── Calendar ────────────────────────────────────────────────────────────────

pub fn handle_calendar(config: &AppConfig, month: Option<u32>, year: Option<i32>) -> Result<()> {
    let today = Local::now().date_naive();
    let month = month.unwrap_or(today.month());
    let year = year.unwrap_or(today.year());
    let days = month_calendar(
        year,
        month,
        config.location.hijri_offset,
        config.display.app_language,
    )?;

    let (Some((first, first_h)), Some((_, last_h))) = (days.first(), days.last()) else {
        return Ok(());
    };
    let hijri_span = if first_h.month == last_h.month {
        format!("{} {} AH", first_h.month_name, first_h.year)
    } else {
        format!(
            "{} {} – {} {} AH",
            first_h.month_name, first_h.year, last_h.month_name, last_h.year
        )
    };

    println!();
    println_colored!(GOLD, "  {}  ·  {}", first.format("%B %Y"), hijri_span);
    println!();
    for (date, h) in &days {
        let line = format!(
            "{} {}  {}",
            date.format("%a"),
            date.format("%d"),
            pad_display(&h.formatted(), 24)
        );
        if *date == today {
            println_colored!(GREEN, "  ◆ {}", line);
        } else if h.day == 1 {
            println_colored!(AMBER, "  › {}", line);
        } else {
            println_colored!(DIM, "    {}", line);
        }
    }
    println!();
    Ok(())
}

// ─── Qibla ───────────────────────────────────────────────────────────────────

pub fn handle_qibla(config: &AppConfig) -> Result<()> {
    let loc = &config.location;
    let bearing = QiblaBearing::from_location(loc);
    println!();
    println_colored!(GOLD, "  Qibla from {}", loc.name);
    println!();
    println_colored!(BOLD, "  {}", bearing);
    println_colored!(
        DIM,
        "  degrees clockwise from true North at ({:.4}, {:.4})",
        loc.latitude,
        loc.longitude
    );
    println!();
    Ok(())
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Parse a UTC offset string into total minutes.
/// Accepts: "5:30", "+5:30", "-5:30", "5", "+5", "5.5"
fn parse_tz_offset(s: &str) -> Result<i32> {
    let s = s.trim().trim_start_matches('+');
    let negative = s.starts_with('-');
    let s = s.trim_start_matches('-');
    let sign = if negative { -1 } else { 1 };

    let minutes = if let Some((h, m)) = s.split_once(':') {
        let hours: i32 = h.parse()?;
        let mins: i32 = m.parse()?;
        hours * 60 + mins
    } else if s.contains('.') {
        let hours: f64 = s.parse()?;
        (hours * 60.0).round() as i32
    } else {
        let hours: i32 = s.parse()?;
        hours * 60
    };

    if minutes >= 24 * 60 {
        return Err(anyhow!("Offset out of range: {}", s));
    }
    Ok(sign * minutes)
}

/// Format total minutes as "+H:MM" string
fn format_tz_offset(minutes: i32) -> String {
    let sign = if minutes < 0 { "-" } else { "+" };
    let abs = minutes.abs();
    let h = abs / 60;
    let m = abs % 60;
    if m == 0 {
        format!("{}{}", sign, h)
    } else {
        format!("{}{}:{:02}", sign, h, m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::{AppLanguage, ThemeColor};

    #[test]
    fn tz_offsets() {
        assert_eq!(parse_tz_offset("+7").unwrap(), 420);
        assert_eq!(parse_tz_offset("5:30").unwrap(), 330);
        assert_eq!(parse_tz_offset("-3:30").unwrap(), -210);
        assert_eq!(parse_tz_offset("5.75").unwrap(), 345);
        assert!(parse_tz_offset("abc").is_err());
        assert!(parse_tz_offset("25").is_err());
        assert_eq!(format_tz_offset(330), "+5:30");
        assert_eq!(format_tz_offset(-240), "-4");
    }

    #[test]
    fn setup_applies_only_given_flags() {
        let mut config = AppConfig::default();
        let args = SetupArgs {
            name: Some("Makassar".into()),
            tz: Some("+8".into()),
            theme: Some("blue".into()),
            language: Some("id".into()),
            ..Default::default()
        };
        apply_setup(&mut config, &args).unwrap();
        assert_eq!(config.location.name, "Makassar");
        assert_eq!(config.location.timezone_offset, 480);
        assert_eq!(config.location.latitude, -6.2088);
        assert_eq!(config.display.theme_color, ThemeColor::Blue);
        assert_eq!(config.display.app_language, AppLanguage::Id);
    }

    #[test]
    fn setup_rejects_bad_values_without_partial_update() {
        let mut config = AppConfig::default();
        let args = SetupArgs {
            name: Some("Nowhere".into()),
            method: Some("Lunar".into()),
            ..Default::default()
        };
        assert!(apply_setup(&mut config, &args).is_err());
        assert_eq!(config, AppConfig::default());

        let args = SetupArgs {
            lat: Some(95.0),
            ..Default::default()
        };
        assert!(apply_setup(&mut config, &args).is_err());
    }

    #[test]
    fn setup_reset() {
        let mut config = AppConfig::default();
        config.location.name = "Old".into();
        let args = SetupArgs {
            reset: true,
            ..Default::default()
        };
        apply_setup(&mut config, &args).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    fn sample_times() -> PrayerTimes {
        PrayerTimes {
            fajr: "04:30".into(),
            sunrise: "06:00".into(),
            dhuhr: "12:00".into(),
            asr: "15:30".into(),
            maghrib: "18:00".into(),
            isha: "19:30".into(),
        }
    }

    #[test]
    fn at_accepts_clock_or_prayer_name() {
        let times = sample_times();
        assert_eq!(resolve_at("13:05", &times).unwrap().to_string(), "13:05");
        assert_eq!(resolve_at("zuhr", &times).unwrap().to_string(), "12:00");
        assert_eq!(resolve_at("Isya", &times).unwrap().to_string(), "19:30");
        assert!(resolve_at("tahajjud", &times).is_err());

        let w = compute_window(&times, resolve_at("ashar", &times).unwrap()).unwrap();
        assert_eq!(w.current.name, PrayerName::Asr);
        assert_eq!(w.next.name, PrayerName::Maghrib);
    }

    #[test]
    fn timings_file_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timings.json");
        std::fs::write(
            &path,
            r#"{"Fajr":"04:30","Sunrise":"06:00","Dhuhr":"12:00","Asr":"15:30","Maghrib":"18:00","Isha":"19:30"}"#,
        )
        .unwrap();
        let times = load_timings_file(&path).unwrap();
        assert_eq!(times.asr, "15:30");
        assert!(load_timings_file(&dir.path().join("missing.json")).is_err());
    }
}

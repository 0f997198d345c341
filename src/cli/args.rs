use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tilawah", version, author, about = "A terminal companion for Quran reading progress and daily prayer times")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Edit location, calculation and display settings
    Setup(SetupArgs),
    /// Show today's prayer times and countdown to next prayer
    Times {
        /// Pretend the current local time is HH:MM, or the time of a prayer (e.g. asr, isya)
        #[arg(long)]
        at: Option<String>,
        /// Read times from a timings JSON file instead of calculating them
        #[arg(long)]
        timings: Option<PathBuf>,
    },
    /// Record a reading position; only forward progress replaces the last-read bookmark
    Read {
        /// Surah number (1-114)
        surah: u32,
        /// Ayah number
        ayah: u32,
        /// Reading in juz mode (1-30)
        #[arg(long)]
        juz: Option<u32>,
        /// Display label, e.g. the surah name
        #[arg(long)]
        label: Option<String>,
    },
    /// Show the last-read position
    Last,
    /// Ayah bookmarks
    Bookmark {
        #[command(subcommand)]
        action: BookmarkCommands,
    },
    /// Khatam (complete reading) planner
    Khatam {
        #[command(subcommand)]
        action: KhatamCommands,
    },
    /// Show a Gregorian month alongside its Hijri dates
    Calendar {
        /// Month 1-12 (default: current month)
        #[arg(long)]
        month: Option<u32>,
        /// Gregorian year (default: current year)
        #[arg(long)]
        year: Option<i32>,
    },
    /// Show the Qibla direction for the configured location
    Qibla,
}

#[derive(Args, Debug, Default)]
pub struct SetupArgs {
    /// Location name shown in the header
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub lat: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    pub lng: Option<f64>,
    /// UTC offset, e.g. +7, 5:30, -4
    #[arg(long, allow_hyphen_values = true)]
    pub tz: Option<String>,
    /// Calculation method (MuslimWorldLeague, Singapore, NorthAmerica, ...)
    #[arg(long)]
    pub method: Option<String>,
    /// Shafi or Hanafi
    #[arg(long)]
    pub madhab: Option<String>,
    /// Days to shift the Hijri date for local moon sighting
    #[arg(long, allow_hyphen_values = true)]
    pub hijri_offset: Option<i32>,
    /// Interface language: en or id
    #[arg(long)]
    pub language: Option<String>,
    /// Accent color: teal, blue, purple or orange
    #[arg(long)]
    pub theme: Option<String>,
    /// Reset everything to defaults first
    #[arg(long)]
    pub reset: bool,
}

#[derive(Subcommand, Debug)]
pub enum BookmarkCommands {
    /// Bookmark an ayah
    Add {
        surah: u32,
        ayah: u32,
        #[arg(long)]
        label: Option<String>,
    },
    /// Remove a bookmark
    Remove { surah: u32, ayah: u32 },
    /// List bookmarks
    List,
}

#[derive(Subcommand, Debug)]
pub enum KhatamCommands {
    /// Start a plan to finish the Quran in DAYS days
    Start { days: u32 },
    /// Log pages read today
    Log { pages: u32 },
    /// Show the active plan
    Status,
    /// Mark the active plan as completed
    Complete,
    /// Drop the active plan
    Abandon,
    /// List completed plans
    History,
}

mod cli;
mod config;
mod db;
mod error;
mod models;
mod prayer_times;
mod reading;
mod tui;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use rusqlite::Connection;

use cli::args::{Cli, Commands};
use cli::handlers;
use config::AppConfig;
use db::migrations::run_migrations;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = AppConfig::load().context("Loading config")?;

    match cli.command {
        // Setup only touches the config file
        Some(Commands::Setup(args)) => {
            handlers::handle_setup(&mut config, &args)?;
        }
        Some(Commands::Times { at, timings }) => {
            handlers::handle_times(&config, at.as_deref(), timings.as_deref())?;
        }
        Some(Commands::Read {
            surah,
            ayah,
            juz,
            label,
        }) => {
            handlers::handle_read(&open_db()?, surah, ayah, juz, label)?;
        }
        Some(Commands::Last) => {
            handlers::handle_last(&open_db()?)?;
        }
        Some(Commands::Bookmark { action }) => {
            handlers::handle_bookmark(&open_db()?, &action)?;
        }
        Some(Commands::Khatam { action }) => {
            handlers::handle_khatam(&open_db()?, &action)?;
        }
        Some(Commands::Calendar { month, year }) => {
            handlers::handle_calendar(&config, month, year)?;
        }
        Some(Commands::Qibla) => {
            handlers::handle_qibla(&config)?;
        }

        // No subcommand → launch TUI
        None => {
            tui::app::run(open_db()?, config)?;
        }
    }

    Ok(())
}

/// Open the database in the data directory, migrating it on every start.
fn open_db() -> Result<Connection> {
    AppConfig::ensure_data_dir()?;
    let db_path = AppConfig::db_path()?;
    let conn = Connection::open(&db_path)
        .with_context(|| format!("Opening database at {:?}", db_path))?;

    // Enable WAL mode for better concurrent access
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    run_migrations(&conn)?;
    Ok(conn)
}

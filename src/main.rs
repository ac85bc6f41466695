//! Store Inventory Manager
//!
//! Seeds product data from a CSV file into a local SQLite database, then
//! serves an interactive console for viewing, adding and backing up
//! products.

use clap::Parser;
use rusqlite::Connection;
use std::io;
use std::path::PathBuf;
use store_inventory::{loader, menu, store};

/// Store inventory manager - seeds products from CSV and serves a console
#[derive(Parser, Debug)]
#[command(name = "store_inventory")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file
    #[arg(short, long, default_value_t = default_db_path())]
    database: String,

    /// Seed CSV loaded once at startup
    #[arg(short, long, default_value = "inventory.csv")]
    seed: PathBuf,

    /// Destination file for the backup command
    #[arg(short, long, default_value = "bu_inventory.csv")]
    backup: PathBuf,
}

/// Returns the default database path: <data_dir>/store_inventory/inventory.db
fn default_db_path() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("store_inventory")
        .join("inventory.db")
        .to_string_lossy()
        .to_string()
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let db_path = PathBuf::from(&args.database);
    log::info!("Database path: {}", db_path.display());

    if let Some(parent) = db_path.parent() {
        if !parent.exists() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                log::error!("Failed to create database directory: {}", e);
                std::process::exit(1);
            }
            log::info!("Created directory: {}", parent.display());
        }
    }

    let conn = match Connection::open(&db_path) {
        Ok(conn) => conn,
        Err(e) => {
            log::error!("Failed to open database: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = store::init_schema(&conn) {
        log::error!("Failed to initialize database schema: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = loader::load_file(&conn, &args.seed) {
        log::error!("Failed to load seed file {}: {}", args.seed.display(), e);
        std::process::exit(1);
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    if let Err(e) = menu::run(&conn, &mut stdin.lock(), &mut stdout.lock(), &args.backup) {
        log::error!("Command loop failed: {}", e);
        std::process::exit(1);
    }
}

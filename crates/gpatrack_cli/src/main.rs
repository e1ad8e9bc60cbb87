//! CLI diagnostics entry point.
//!
//! # Responsibility
//! - Verify `gpatrack_core` linkage and storage bootstrap without a UI.
//! - Print a read-only summary of a tracker database.
//!
//! # Invariants
//! - Never writes to the ledger or theme keys.
//! - Output lines are deterministic `key=value` pairs.

use gpatrack_core::{LedgerStore, SqliteKeyValueStore, TrackerConfig};
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut config = TrackerConfig::from_env();
    if let Some(path) = std::env::args().nth(1) {
        config.db_path = PathBuf::from(path);
    }
    if let Err(err) = config.start_logging() {
        eprintln!("logging_error={err}");
    }

    println!("gpatrack_core ping={}", gpatrack_core::ping());
    println!("gpatrack_core version={}", gpatrack_core::core_version());
    println!("db_path={}", config.db_path.display());

    match summarize(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error={message}");
            ExitCode::FAILURE
        }
    }
}

fn summarize(config: &TrackerConfig) -> Result<(), String> {
    let store = SqliteKeyValueStore::open(&config.db_path).map_err(|err| err.to_string())?;
    let ledger = LedgerStore::new(store);
    let courses = ledger.load_courses().map_err(|err| err.to_string())?;
    let theme = ledger
        .load_theme()
        .map_err(|err| err.to_string())?
        .unwrap_or_default();
    let totals = gpatrack_core::aggregate(&courses);

    println!("grade_scale={}", config.grade_scale.as_str());
    println!("courses={}", totals.course_count);
    println!("gpa={}", totals.gpa_display());
    println!("credits={}", totals.credits_display());
    println!("theme={theme}");
    Ok(())
}

//! Thin wrapper: opens a named Metamath database and calls `ingest`.
//!
//! This binary owns no verification logic — argument parsing, log setup
//! and reporting the first error to stderr is all it does. See
//! `metamath-verifier` for the actual tokenizer, scoping and proof
//! checker.

use clap::{App, Arg};
use log::{info, LevelFilter};
use metamath_verifier::Database;
use std::fs::File;
use std::process;

/// `metamath-verifier-cli [-v]... <DATABASE>`
///
/// `-v` is repeatable; each occurrence raises the installed log level by
/// one notch (warn -> info -> debug -> trace), mirroring `mmverify.py`'s
/// integer `verbosity` without threading it explicitly through every call.
pub fn main() {
    let matches = App::new("Metamath Verifier")
        .version("0.1.0")
        .author("Thierry A.")
        .about("Verifies a Metamath database")
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("Increases diagnostic verbosity; may be repeated"),
        )
        .arg(
            Arg::with_name("database")
                .help("Path to the top-level Metamath (.mm) file")
                .required(true)
                .index(1),
        )
        .get_matches();

    let level = match matches.occurrences_of("verbose") {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    simple_logger::init_with_level(level.to_level().unwrap_or(log::Level::Warn))
        .expect("logger can only be initialized once");

    let db_file_name = matches.value_of("database").unwrap_or("");
    info!("parsing database {}", db_file_name);

    let file = File::open(db_file_name).unwrap_or_else(|e| {
        eprintln!("{}: {}", db_file_name, e);
        process::exit(1);
    });

    let mut db = Database::new();
    match db.ingest(db_file_name, file, true) {
        Ok(()) => println!("verified {} assertions", db.verified_count()),
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}

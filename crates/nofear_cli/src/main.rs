//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `nofear_core` linkage without the Flutter/FFI runtime.
//! - Report where the place file lives and what it currently holds.
//!
//! Usage: `nofear_cli [DATA_DIR]`. Without an argument the directory comes
//! from `NOFEAR_DATA_DIR` or the platform data directory.

use nofear_core::{PlaceFile, PlaceStore, StoreConfig};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("nofear_core ping={}", nofear_core::ping());
    println!("nofear_core version={}", nofear_core::core_version());

    let config = match std::env::args().nth(1) {
        Some(dir) => StoreConfig::in_dir(dir),
        None => match StoreConfig::from_env() {
            Ok(config) => config,
            Err(err) => {
                eprintln!("nofear_cli: {err}");
                return ExitCode::FAILURE;
            }
        },
    };

    let file = PlaceFile::from_config(&config);
    println!("place_file={}", file.path().display());
    println!("place_file_exists={}", file.path().is_file());

    let store = PlaceStore::initialize(file);
    println!("places={}", store.places().len());
    println!("gate={}", store.gate().as_str());
    ExitCode::SUCCESS
}

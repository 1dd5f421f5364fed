//! Redwall command-line entry point.
//!
//! `redwall --start` runs the catalog updater and wallpaper rotator until
//! interrupted; `redwall --clear-catalog` wipes the catalog; with no
//! arguments the usage help is printed.

fn main() {
    redwall_lib::logging::init();

    if let Err(err) = redwall_lib::cli::run() {
        eprintln!("redwall: {err}");
        std::process::exit(1);
    }
}

//! Command-line interface.

mod commands;

pub use commands::run;

/// Check argv for the verbose flag before clap parsing, so logging can be
/// initialized first.
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

//----------------------------------------------------------------------------------------- std lib
use std::io::Write;
use std::time::Instant;
//--------------------------------------------------------------------------------- other libraries
use log::info;
use once_cell::sync::Lazy;

// This will get initialized below.
/// Returns the init [`Instant`]
pub static INIT_INSTANT: Lazy<Instant> = Lazy::new(Instant::now);

/// Returns the seconds since [`INIT_INSTANT`].
pub fn uptime() -> u64 {
    INIT_INSTANT.elapsed().as_secs()
}

//---------------------------------------------------------------------------------------------------- Logger init function
#[allow(clippy::module_name_repetitions)]
/// Initializes the logger.
///
/// This enables console logging on all the internals of `shabon`.
///
/// Functionality is provided by [`log`].
///
/// The levels are:
/// - ERROR
/// - WARN
/// - INFO
/// - DEBUG
/// - TRACE
///
/// # Panics
/// This must only be called _once_.
pub fn init_logger(filter: log::LevelFilter) {
    // Initialize timer.
    let now = Lazy::force(&INIT_INSTANT);

    // If `RUST_LOG` isn't set, disable all library
    // crate logs except for shabon and its sub-crates.
    let env = std::env::var("RUST_LOG").unwrap_or_default();

    let mut builder = env_logger::Builder::new();
    builder.format(move |buf, record| {
        let level = match record.level() {
            log::Level::Debug => "D",
            log::Level::Trace => "T",
            log::Level::Info => "I",
            log::Level::Warn => "W",
            log::Level::Error => "E",
        };
        writeln!(
            buf,
            "| {} | {: >10.3} | {: >28} @ {: <4} | {}",
            level,
            now.elapsed().as_secs_f64(),
            record.file_static().unwrap_or("???"),
            record.line().unwrap_or(0),
            record.args(),
        )
    });

    if env.is_empty() {
        builder.parse_filters(&format!("off,shabon={filter}"));
    } else {
        builder.parse_filters(&env);
    }

    builder.init();

    if env.is_empty() {
        info!("Log Level (Flag) ... {filter}");
    } else {
        info!("Log Level (RUST_LOG) ... {env}");
    }
}

use std::io::Write;
use std::str::FromStr;

use log::LevelFilter;

/// Routes core logs to stdout, where the mobile shell collects them. Dependencies
/// such as sqlx stay at `warn` unless the core itself is quieter.
fn init_logger(level: LevelFilter) {
    let mut builder = env_logger::Builder::new();
    builder
        .format(|buf, record| {
            writeln!(
                buf,
                "[forge] {:<5} {} - {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .target(env_logger::Target::Stdout)
        .filter_level(level.min(LevelFilter::Warn))
        .filter_module("forge", level);

    // Only the first call installs the logger; later calls just move the ceiling.
    let _ = builder.try_init();
    log::set_max_level(level);
}

/// Accepts `off`, `error`, `warn`/`warning`, `info`, `debug` or `trace`.
#[uniffi::export]
pub fn set_log_level(level: &str) -> bool {
    let level = level.trim();
    let parsed = if level.eq_ignore_ascii_case("warning") {
        Ok(LevelFilter::Warn)
    } else {
        LevelFilter::from_str(level)
    };
    match parsed {
        Ok(filter) => {
            init_logger(filter);
            true
        }
        Err(_) => false,
    }
}

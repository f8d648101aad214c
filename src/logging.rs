//! Minimal `log` backend.
//!
//! In the browser records go to the devtools console (warnings and errors
//! through `console.warn`/`console.error` so they stand out); natively they
//! go to stderr. Hosts with their own logger simply skip `init`.

use log::{Level, LevelFilter, Log, Metadata, Record};

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!("[{}] {}: {}", record.level(), record.target(), record.args());
        write_line(record.level(), &line);
    }

    fn flush(&self) {}
}

#[cfg(target_arch = "wasm32")]
fn write_line(level: Level, line: &str) {
    match level {
        Level::Error => web_sys::console::error_1(&line.into()),
        Level::Warn => web_sys::console::warn_1(&line.into()),
        _ => web_sys::console::log_1(&line.into()),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn write_line(_level: Level, line: &str) {
    eprintln!("{line}");
}

/// Install the console logger at `level`. Calling it again is harmless.
///
/// On wasm32 this also routes panics to the console, so contract
/// violations (such as an unknown upgrade id) show a readable message.
pub fn init(level: LevelFilter) {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

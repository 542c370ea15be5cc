//! In-memory log sink for tests. Records are kept per thread so parallel
//! tests only ever see what they emitted themselves.

use std::cell::RefCell;

thread_local! {
    static RECORDS: RefCell<Vec<(log::Level, String)>> = const { RefCell::new(Vec::new()) };
}

struct Capture;

static CAPTURE: Capture = Capture;

impl log::Log for Capture {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.target().starts_with(env!("CARGO_CRATE_NAME"))
    }
    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            RECORDS.with(|r| r.borrow_mut().push((record.level(), record.args().to_string())));
        }
    }
    fn flush(&self) {}
}

/// Install the sink (once per process) and forget anything this thread logged so far.
pub fn start() {
    static INSTALL: std::sync::Once = std::sync::Once::new();
    INSTALL.call_once(|| {
        let _ = log::set_logger(&CAPTURE);
        log::set_max_level(log::LevelFilter::Trace);
    });
    RECORDS.with(|r| r.borrow_mut().clear());
}

/// Everything this thread logged since [`start`].
pub fn records() -> Vec<(log::Level, String)> {
    RECORDS.with(|r| r.borrow().clone())
}

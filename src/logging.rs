//! Leveled diagnostic logging.
//!
//! The map emits `tracing` events at operation boundaries. Which of them
//! reach the output is decided by one process-wide [`LogLevel`] threshold,
//! read on every event by the subscriber installed with [`init`]. The
//! threshold is a verbosity ladder, `NoLog < Info < Warning < Error < Debug`:
//! a threshold admits its own level and every level below it.
//!
//! Nothing in the map reads the threshold; it only affects output.

use core::sync::atomic::{AtomicU8, Ordering};
use tracing::Level;
use tracing_subscriber::filter::{filter_fn, FilterFn};
use tracing_subscriber::prelude::*;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(u8)]
pub enum LogLevel {
    NoLog = 0,
    Info = 1,
    Warning = 2,
    Error = 3,
    Debug = 4,
}

impl LogLevel {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => LogLevel::NoLog,
            1 => LogLevel::Info,
            2 => LogLevel::Warning,
            3 => LogLevel::Error,
            _ => LogLevel::Debug,
        }
    }

    /// Ladder position of a `tracing` level. TRACE sits with DEBUG.
    pub fn of(level: &Level) -> Self {
        match *level {
            Level::INFO => LogLevel::Info,
            Level::WARN => LogLevel::Warning,
            Level::ERROR => LogLevel::Error,
            _ => LogLevel::Debug,
        }
    }
}

static THRESHOLD: AtomicU8 = AtomicU8::new(LogLevel::Debug as u8);

pub fn set_level(level: LogLevel) {
    THRESHOLD.store(level as u8, Ordering::Relaxed);
}

pub fn level() -> LogLevel {
    LogLevel::from_u8(THRESHOLD.load(Ordering::Relaxed))
}

/// Whether an event at `level` passes `threshold`.
pub fn admits(threshold: LogLevel, level: &Level) -> bool {
    let lv = LogLevel::of(level);
    threshold != LogLevel::NoLog && lv <= threshold
}

/// Filter consulting the process-wide threshold, for callers composing their
/// own subscriber.
pub fn threshold_filter() -> FilterFn<impl Fn(&tracing::Metadata<'_>) -> bool> {
    filter_fn(|meta| admits(level(), meta.level()))
}

/// Install a formatting subscriber gated by the threshold. Returns `false`
/// when a global subscriber was already installed.
pub fn init() -> bool {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(threshold_filter()))
        .try_init()
        .is_ok()
}

//! In-memory log ring plus single-line sanitizing for console output.
//!
//! Every recorded failure lands in a capped ring buffer (last [`MAX_ENTRIES`]
//! entries) so the `log` debug command can dump recent history without a log
//! file, and is mirrored to the `log` crate for normal logging sinks. Nothing
//! here is fatal: the buffer exists so a user can retry and an operator can
//! still see what went wrong.

use std::collections::VecDeque;
use std::sync::{Mutex, OnceLock};

use chrono::{DateTime, Utc};
use log::Level;

/// Maximum retained entries; older entries are dropped first.
pub const MAX_ENTRIES: usize = 100;

static BUFFER: OnceLock<Mutex<VecDeque<LogEntry>>> = OnceLock::new();

/// One captured log line.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: Level,
    /// Short origin tag, e.g. `login`, `admin-stats`, `search`.
    pub context: String,
    pub message: String,
}

fn buffer_lock() -> &'static Mutex<VecDeque<LogEntry>> {
    BUFFER.get_or_init(|| Mutex::new(VecDeque::with_capacity(MAX_ENTRIES)))
}

/// Record an entry and mirror it to the `log` crate.
pub fn record(level: Level, context: &str, message: &str) {
    let clean = escape_line(message);
    log::log!(target: "ebus", level, "[{}] {}", context, clean);
    let mut guard = buffer_lock().lock().expect("log buffer mutex poisoned");
    if guard.len() >= MAX_ENTRIES {
        guard.pop_front();
    }
    guard.push_back(LogEntry {
        timestamp: Utc::now(),
        level,
        context: context.to_string(),
        message: clean,
    });
}

/// Record a failure. All error paths funnel through here per the error
/// handling design: buffered, logged, never propagated as a panic.
pub fn failure(context: &str, message: &str) {
    record(Level::Error, context, message);
}

pub fn warning(context: &str, message: &str) {
    record(Level::Warn, context, message);
}

pub fn info(context: &str, message: &str) {
    record(Level::Info, context, message);
}

/// Most recent `n` entries, oldest first.
pub fn recent(n: usize) -> Vec<LogEntry> {
    let guard = buffer_lock().lock().expect("log buffer mutex poisoned");
    let skip = guard.len().saturating_sub(n);
    guard.iter().skip(skip).cloned().collect()
}

/// Full buffer snapshot, oldest first.
pub fn snapshot() -> Vec<LogEntry> {
    let guard = buffer_lock().lock().expect("log buffer mutex poisoned");
    guard.iter().cloned().collect()
}

pub fn clear() {
    let mut guard = buffer_lock().lock().expect("log buffer mutex poisoned");
    guard.clear();
}

/// Escape a string for single-line logging:
/// - `\n` => `\\n`
/// - `\r` => `\\r`
/// - `\t` => `\\t`
/// - backslash => `\\\\`
///   Truncates very long strings (over `MAX_PREVIEW`) with an ellipsis to cap log noise.
pub fn escape_line(s: &str) -> String {
    const MAX_PREVIEW: usize = 300;
    let mut out = String::with_capacity(s.len().min(MAX_PREVIEW) + 8);
    for (count, ch) in s.chars().enumerate() {
        if count >= MAX_PREVIEW {
            out.push('…');
            break;
        }
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                use std::fmt::Write;
                let _ = write!(&mut out, "\\x{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_newlines_and_tabs() {
        let s = "Line1\nLine2\r\tEnd";
        assert_eq!(escape_line(s), "Line1\\nLine2\\r\\tEnd");
    }

    // Single test for the shared buffer: unit tests run in parallel threads,
    // so assertions stay relative to entries tagged by this test.
    #[test]
    fn ring_orders_and_caps_entries() {
        for i in 0..10 {
            info("ring-test", &format!("m{}", i));
        }
        let ours: Vec<String> = recent(MAX_ENTRIES)
            .into_iter()
            .filter(|e| e.context == "ring-test")
            .map(|e| e.message)
            .collect();
        let expected: Vec<String> = (0..10).map(|i| format!("m{}", i)).collect();
        assert_eq!(ours, expected, "insertion order must be preserved");

        for i in 0..(MAX_ENTRIES + 25) {
            failure("ring-test", &format!("entry {}", i));
        }
        let all = snapshot();
        assert!(all.len() <= MAX_ENTRIES, "buffer must stay capped");
        assert!(
            !all.iter().any(|e| e.message == "m0"),
            "oldest entries must be evicted once the cap is exceeded"
        );
        let newest = all
            .iter()
            .rfind(|e| e.context == "ring-test")
            .expect("ring-test entries present");
        assert_eq!(newest.message, format!("entry {}", MAX_ENTRIES + 24));
    }
}

//! Log capture for asserting on emitted tracing events.

use parking_lot::Mutex;
use std::io;
use std::sync::Arc;
use tracing_subscriber::fmt::MakeWriter;

/// Formatted log output collected while a closure ran.
#[derive(Debug, Clone, Default)]
pub struct CapturedLogs {
    text: String,
}

impl CapturedLogs {
    /// Returns the full captured output.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns `true` if any line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.text.contains(needle)
    }

    /// Returns the lines logged at `level` (`"WARN"`, `"INFO"`, ...).
    pub fn at_level(&self, level: &str) -> Vec<&str> {
        self.text
            .lines()
            .filter(|line| line.split_whitespace().next() == Some(level))
            .collect()
    }
}

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for SharedBuffer {
    type Writer = SharedBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Runs `f` with a subscriber that records every event on this thread.
///
/// Events are formatted without timestamps or colours, one per line,
/// starting with the level.
///
/// # Example
///
/// ```rust
/// use docmap_testkit::capture_logs;
///
/// let (value, logs) = capture_logs(|| {
///     tracing::warn!(matched = 2, "expected one document");
///     7
/// });
/// assert_eq!(value, 7);
/// assert_eq!(logs.at_level("WARN").len(), 1);
/// assert!(logs.contains("matched=2"));
/// ```
pub fn capture_logs<F, R>(f: F) -> (R, CapturedLogs)
where
    F: FnOnce() -> R,
{
    let buffer = SharedBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);
    let text = String::from_utf8_lossy(&buffer.0.lock()).into_owned();
    (result, CapturedLogs { text })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_levels_and_fields() {
        let ((), logs) = capture_logs(|| {
            tracing::info!(id = "abc", "saved entity");
            tracing::debug!("resolved collection binding");
        });

        assert_eq!(logs.at_level("INFO").len(), 1);
        assert_eq!(logs.at_level("DEBUG").len(), 1);
        assert!(logs.contains("id=\"abc\""));
        assert!(logs.at_level("WARN").is_empty());
    }

    #[test]
    fn capture_is_scoped() {
        let ((), first) = capture_logs(|| tracing::warn!("inside"));
        tracing::warn!("outside");
        assert!(first.contains("inside"));
        assert!(!first.contains("outside"));
    }
}

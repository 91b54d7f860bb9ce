//! Log capture for the demo player
//!
//! While the alternate screen is up, tracing output goes into a small
//! in-memory tail instead of stderr. The status bar shows the newest line.

use std::collections::VecDeque;
use std::io::Write;
use std::sync::{Arc, Mutex};

use tracing_subscriber::fmt::MakeWriter;

/// Lines kept in memory.
const TAIL_CAPACITY: usize = 200;

/// Shared, bounded tail of formatted log lines.
#[derive(Clone, Default)]
pub struct LogTail {
    lines: Arc<Mutex<VecDeque<String>>>,
}

impl LogTail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line, evicting the oldest beyond capacity. A poisoned lock
    /// is recovered; losing log lines must not take the UI down.
    pub fn push(&self, line: String) {
        let mut lines = self.lines.lock().unwrap_or_else(|e| e.into_inner());
        while lines.len() >= TAIL_CAPACITY {
            lines.pop_front();
        }
        lines.push_back(line);
    }

    /// Newest line, if any.
    pub fn latest(&self) -> Option<String> {
        let lines = self.lines.lock().unwrap_or_else(|e| e.into_inner());
        lines.back().cloned()
    }

    /// Everything captured so far, oldest first. Used to replay the session
    /// log to stderr once the terminal is restored.
    pub fn take_all(&self) -> Vec<String> {
        let mut lines = self.lines.lock().unwrap_or_else(|e| e.into_inner());
        lines.drain(..).collect()
    }
}

/// Per-event writer: collects bytes and commits whole lines to the tail.
pub struct TailWriter {
    tail: LogTail,
    partial: Vec<u8>,
}

impl TailWriter {
    fn commit_complete_lines(&mut self) {
        while let Some(pos) = self.partial.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.partial.drain(..=pos).collect();
            let text = String::from_utf8_lossy(&line[..line.len() - 1]).trim_end().to_string();
            self.tail.push(text);
        }
    }
}

impl Write for TailWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.partial.extend_from_slice(buf);
        self.commit_complete_lines();
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        if !self.partial.is_empty() {
            let text = String::from_utf8_lossy(&self.partial).trim_end().to_string();
            self.partial.clear();
            self.tail.push(text);
        }
        Ok(())
    }
}

impl Drop for TailWriter {
    fn drop(&mut self) {
        let _ = Write::flush(self);
    }
}

impl<'a> MakeWriter<'a> for LogTail {
    type Writer = TailWriter;

    fn make_writer(&'a self) -> Self::Writer {
        TailWriter {
            tail: self.clone(),
            partial: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_and_take_all() {
        let tail = LogTail::new();
        assert_eq!(tail.latest(), None);
        tail.push("first".to_string());
        tail.push("second".to_string());
        assert_eq!(tail.latest().as_deref(), Some("second"));
        assert_eq!(tail.take_all(), vec!["first", "second"]);
        assert_eq!(tail.latest(), None);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let tail = LogTail::new();
        for i in 0..(TAIL_CAPACITY + 5) {
            tail.push(format!("line {}", i));
        }
        let all = tail.take_all();
        assert_eq!(all.len(), TAIL_CAPACITY);
        assert_eq!(all[0], "line 5");
    }

    #[test]
    fn test_writer_splits_lines_and_flushes_on_drop() {
        let tail = LogTail::new();
        {
            let mut writer = tail.make_writer();
            write!(writer, "one\ntwo\nthr").unwrap();
            assert_eq!(tail.latest().as_deref(), Some("two"));
        }
        assert_eq!(tail.take_all(), vec!["one", "two", "thr"]);
    }
}

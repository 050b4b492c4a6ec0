//! Log-backed display sink.
//!
//! Tracks what the panel currently shows and mirrors each update to the
//! logger.  Stands in for the OLED until a panel driver is wired.

use log::info;

use crate::app::ports::DisplaySink;
use crate::display::truncate;

pub struct LogDisplay {
    capacity: usize,
    current: String,
    writes: u64,
}

impl LogDisplay {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            current: String::new(),
            writes: 0,
        }
    }

    pub fn current_text(&self) -> &str {
        &self.current
    }

    pub fn writes(&self) -> u64 {
        self.writes
    }
}

impl DisplaySink for LogDisplay {
    fn display(&mut self, text: &str) {
        // Producers should already have truncated; the panel cannot wrap.
        let text = truncate(text, self.capacity);
        info!("OLED | {}", text);
        self.current.clear();
        self.current.push_str(text);
        self.writes += 1;
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

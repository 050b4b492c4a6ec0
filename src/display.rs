//! Rotating status display.
//!
//! The panel is shared by several independent status producers.  The
//! [`StatusDisplayRing`] holds an ordered set of producer *handles* and, on a
//! fixed cadence, advances to the next one and asks the owning
//! [`ProducerRegistry`] to render it.  Producers push text into the
//! [`DisplaySink`] themselves; a producer that has nothing to say renders
//! nothing and the previous text stays on screen (used for alert overlays).
//!
//! The ring never owns a producer.  Handles are plain `Copy` tags resolved by
//! the registry at render time, so whoever owns the state behind a producer
//! also owns its lifetime.

use log::debug;

use crate::app::ports::DisplaySink;
use crate::error::DisplayError;

/// Characters per line on the 128 px OLED at the default font.
pub const DEFAULT_DISPLAY_CHARS: usize = 21;

/// Maximum producers in one rotation (stack-allocated).
pub const MAX_PRODUCERS: usize = 8;

/// A status producer: renders (or declines to render) one screen.
pub trait DisplayProducer {
    fn render(&self, sink: &mut dyn DisplaySink);
}

/// Resolves ring handles to producers and renders them.
pub trait ProducerRegistry<H> {
    fn render(&self, handle: H, sink: &mut dyn DisplaySink);
}

/// Cut `text` to at most `capacity` characters, on a char boundary.
pub fn truncate(text: &str, capacity: usize) -> &str {
    match text.char_indices().nth(capacity) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Write `text` to `sink`, truncated to the sink's capacity.
pub fn show(sink: &mut dyn DisplaySink, text: &str) {
    let capacity = sink.capacity();
    sink.display(truncate(text, capacity));
}

/// Ordered rotation of producer handles switched on a fixed interval.
pub struct StatusDisplayRing<H: Copy> {
    producers: heapless::Vec<H, MAX_PRODUCERS>,
    /// Always a valid position when `producers` is non-empty.
    index: usize,
    switch_interval_ms: u64,
    last_switch_ms: u64,
    rotations: u64,
}

impl<H: Copy> StatusDisplayRing<H> {
    /// Build an empty ring created at `now_ms`.
    pub fn new(switch_interval_ms: u64, now_ms: u64) -> Result<Self, DisplayError> {
        if switch_interval_ms == 0 {
            return Err(DisplayError::ZeroInterval);
        }
        Ok(Self {
            producers: heapless::Vec::new(),
            index: 0,
            switch_interval_ms,
            last_switch_ms: now_ms,
            rotations: 0,
        })
    }

    /// Append a producer to the end of the rotation.
    ///
    /// Added after rotation has started, it is reached only once the ring
    /// wraps past its current position.
    pub fn add_display_fn(&mut self, handle: H) -> Result<(), DisplayError> {
        self.producers.push(handle).map_err(|_| DisplayError::Full)
    }

    /// Check the switch interval and rotate at most one step.
    ///
    /// Returns the index of the producer invoked, or `None` when nothing was
    /// due or the ring is empty.
    pub fn tick(
        &mut self,
        now_ms: u64,
        registry: &impl ProducerRegistry<H>,
        sink: &mut dyn DisplaySink,
    ) -> Option<usize> {
        if self.producers.is_empty() {
            return None;
        }
        if now_ms.saturating_sub(self.last_switch_ms) < self.switch_interval_ms {
            return None;
        }

        self.index = (self.index + 1) % self.producers.len();
        self.last_switch_ms = now_ms;
        self.rotations += 1;
        debug!("Display: rotate to producer {} at {}ms", self.index, now_ms);
        registry.render(self.producers[self.index], sink);
        Some(self.index)
    }

    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn rotations(&self) -> u64 {
        self.rotations
    }

    pub fn switch_interval_ms(&self) -> u64 {
        self.switch_interval_ms
    }

    pub fn len(&self) -> usize {
        self.producers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.producers.is_empty()
    }
}

//! Port traits: the boundary between the monitoring core and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Monitor / BoilerApp (core)
//! ```
//!
//! Driven adapters (clock, telemetry transport, display panel, discovery,
//! config storage) implement these traits.  The core consumes them via
//! generics or `dyn` references passed at call sites, so it never touches
//! the network stack or the panel directly.
//!
//! Sinks are best-effort: the core calls them, logs a failure, and moves on.
//! Nothing here is retried.

use crate::config::MonitorConfig;
use crate::scheduler::TaskId;
use crate::variables::{Variable, VariableGroup};

// ───────────────────────────────────────────────────────────────
// Clock (tick source)
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock.  Read once per control-loop iteration.
pub trait Clock {
    /// Milliseconds since boot.  Must never go backwards.
    fn now_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Telemetry sink (core → transport)
// ───────────────────────────────────────────────────────────────

/// Transports a snapshot of a variable group off-device.
///
/// Called once per telemetry period.  The returned error is only logged;
/// a missed publish is never buffered or retried.
pub trait TelemetrySink {
    fn publish(&mut self, group: &VariableGroup) -> Result<(), SinkError>;
}

// ───────────────────────────────────────────────────────────────
// Display sink (core → panel)
// ───────────────────────────────────────────────────────────────

/// Renders one short line of text, overwriting whatever was shown.
pub trait DisplaySink {
    fn display(&mut self, text: &str);

    /// Character capacity of the panel.  Producers truncate to this.
    fn capacity(&self) -> usize {
        crate::display::DEFAULT_DISPLAY_CHARS
    }
}

// ───────────────────────────────────────────────────────────────
// Discovery sink (core → home-automation registry)
// ───────────────────────────────────────────────────────────────

/// Semantic class attached to a discovered entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    Moisture,
    Temperature,
    Humidity,
}

impl DeviceClass {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Moisture => "moisture",
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
        }
    }
}

/// Registers publishable variables for external presentation.
///
/// Invoked once at initialisation, never on the hot path.
pub trait DiscoverySink {
    /// Register an on/off entity backed by a boolean variable.
    fn add_binary_sensor(
        &mut self,
        group: &VariableGroup,
        variable: &Variable,
        class: DeviceClass,
    ) -> Result<(), SinkError>;

    /// Register a numeric entity backed by a float variable.
    fn add_sensor(
        &mut self,
        group: &VariableGroup,
        variable: &Variable,
        class: DeviceClass,
    ) -> Result<(), SinkError>;
}

// ───────────────────────────────────────────────────────────────
// Scheduler delegate (decouples scheduler from what a task does)
// ───────────────────────────────────────────────────────────────

/// Callback trait that the [`Scheduler`](crate::scheduler::Scheduler)
/// invokes when a periodic task comes due.
///
/// The scheduler only knows ids, labels and times; the delegate decides
/// what a firing means.  The callback runs to completion inside the tick.
pub trait SchedulerDelegate {
    fn on_task_fired(&mut self, task: TaskId, label: &str);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (core ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists [`MonitorConfig`].
pub trait ConfigPort {
    /// Load configuration.  Returns [`MonitorConfig::default()`] if nothing
    /// has been stored yet.
    fn load(&self) -> Result<MonitorConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &MonitorConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations and config validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

/// Errors reported by external sinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkError {
    /// Transport is down (no Wi-Fi, broker unreachable, panel absent).
    Unavailable,
    /// The payload could not be encoded or was refused.
    Rejected,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl core::fmt::Display for SinkError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Unavailable => write!(f, "sink unavailable"),
            Self::Rejected => write!(f, "payload rejected"),
        }
    }
}

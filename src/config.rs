//! Monitor configuration parameters
//!
//! All tunable timing and identity parameters for the boiler monitor.
//! Values can be overridden from NVS (see [`crate::adapters::nvs`]).

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

/// Upper bound for every configured delay, period and interval (one day).
pub const MAX_TIMING_MS: u64 = 24 * 60 * 60 * 1_000;

/// Core monitor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    // --- Identity ---
    /// Default device name used for topics and discovery ids
    pub device_name: heapless::String<32>,

    // --- Telemetry ---
    /// Delay from boot to the first sample-and-publish (milliseconds)
    pub telemetry_initial_delay_ms: u64,
    /// Period between sample-and-publish cycles (milliseconds)
    pub telemetry_period_ms: u64,

    // --- Display ---
    /// Interval between status display rotations (milliseconds)
    pub display_switch_ms: u64,

    // --- Hardware ---
    /// Water detector reports present on a LOW pin
    pub water_input_inverted: bool,

    // --- Loop ---
    /// Pause between control-loop iterations (milliseconds)
    pub loop_tick_ms: u32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        let mut device_name = heapless::String::new();
        // "boiler" always fits in 32 bytes.
        let _ = device_name.push_str("boiler");
        Self {
            device_name,

            // Telemetry: every minute, starting 10 s after boot
            telemetry_initial_delay_ms: 10_000,
            telemetry_period_ms: 60_000,

            // Display
            display_switch_ms: 5_000,

            // Hardware
            water_input_inverted: true,

            // Loop
            loop_tick_ms: 10,
        }
    }
}

impl MonitorConfig {
    /// Reject values the scheduler or ring cannot honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.telemetry_period_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "telemetry_period_ms must be > 0",
            ));
        }
        if self.display_switch_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "display_switch_ms must be > 0",
            ));
        }
        if self.telemetry_initial_delay_ms > MAX_TIMING_MS
            || self.telemetry_period_ms > MAX_TIMING_MS
            || self.display_switch_ms > MAX_TIMING_MS
        {
            return Err(ConfigError::ValidationFailed(
                "timing values must not exceed one day",
            ));
        }
        if u64::from(self.loop_tick_ms) >= self.display_switch_ms {
            return Err(ConfigError::ValidationFailed(
                "loop_tick_ms must be shorter than display_switch_ms",
            ));
        }
        if self.device_name.is_empty() {
            return Err(ConfigError::ValidationFailed("device_name must not be empty"));
        }
        Ok(())
    }
}

/// Software banner shown on the display at start-up.
pub fn software_name() -> String {
    format!("Boiler v{}", env!("CARGO_PKG_VERSION"))
}

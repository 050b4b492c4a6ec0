//! Log-based telemetry and discovery sinks.
//!
//! Write the JSON payload (or the discovery registration) to the logger,
//! which goes to UART / USB-CDC on the device.  A network transport would
//! implement the same traits.

use log::info;

use crate::app::ports::{DeviceClass, DiscoverySink, SinkError, TelemetrySink};
use crate::variables::{Variable, VariableGroup};

/// Logs every telemetry snapshot as `<device>/<group>` JSON.
pub struct LogTelemetrySink {
    device: String,
    published: u64,
    last_payload: Option<String>,
}

impl LogTelemetrySink {
    pub fn new(device: &str) -> Self {
        Self {
            device: device.to_string(),
            published: 0,
            last_payload: None,
        }
    }

    pub fn published(&self) -> u64 {
        self.published
    }

    pub fn last_payload(&self) -> Option<&str> {
        self.last_payload.as_deref()
    }
}

impl TelemetrySink for LogTelemetrySink {
    fn publish(&mut self, group: &VariableGroup) -> Result<(), SinkError> {
        let payload = group.to_json().map_err(|_| SinkError::Rejected)?;
        info!("TELEM | {}/{} | {}", self.device, group.name(), payload);
        self.published += 1;
        self.last_payload = Some(payload);
        Ok(())
    }
}

/// Logs every discovery registration.
pub struct LogDiscoverySink {
    device: String,
    registered: Vec<(String, DeviceClass)>,
}

impl LogDiscoverySink {
    pub fn new(device: &str) -> Self {
        Self {
            device: device.to_string(),
            registered: Vec::new(),
        }
    }

    /// `(unique id, class)` of every entity registered so far.
    pub fn registered(&self) -> &[(String, DeviceClass)] {
        &self.registered
    }

    fn record(&mut self, kind: &str, group: &VariableGroup, var: &Variable, class: DeviceClass) {
        let unique_id = format!("{}_{}_{}", self.device, group.name(), var.name());
        info!(
            "DISCOVERY | {} '{}' ({}) class={} units={}",
            kind,
            unique_id,
            var.description(),
            class.as_str(),
            var.units().unwrap_or("-")
        );
        self.registered.push((unique_id, class));
    }
}

impl DiscoverySink for LogDiscoverySink {
    fn add_binary_sensor(
        &mut self,
        group: &VariableGroup,
        variable: &Variable,
        class: DeviceClass,
    ) -> Result<(), SinkError> {
        self.record("binary_sensor", group, variable, class);
        Ok(())
    }

    fn add_sensor(
        &mut self,
        group: &VariableGroup,
        variable: &Variable,
        class: DeviceClass,
    ) -> Result<(), SinkError> {
        self.record("sensor", group, variable, class);
        Ok(())
    }
}

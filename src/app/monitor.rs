//! Boiler monitor: owns the sensors and their variable group.
//!
//! Two independent cycles share the cached sensor state:
//!
//! ```text
//!   telemetry task fires ──▶ read_sensors() ──▶ TelemetrySink::publish(vg)
//!   display ring rotates ──▶ render(page)   ──▶ DisplaySink::display(text)
//! ```
//!
//! The display never reads hardware; it shows whatever the last telemetry
//! sampling produced, so it may lag by up to one telemetry period.

use embedded_hal::digital::InputPin;
use log::{debug, info, warn};

use super::ports::{DeviceClass, DiscoverySink, DisplaySink, TelemetrySink};
use crate::config::MonitorConfig;
use crate::display::{DisplayProducer, ProducerRegistry, StatusDisplayRing, show};
use crate::error::{DisplayError, Result};
use crate::scheduler::{Scheduler, TaskId};
use crate::sensors::ClimateSensor;
use crate::sensors::water::WaterCheck;
use crate::variables::VariableGroup;

pub const TELEMETRY_TASK: &str = "telemetry";

/// Screens the monitor contributes to the status display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusPage {
    /// Water state plus temperature and humidity.
    Readings,
    /// "Fill boiler tank.", rendered only when the tank is empty.
    WaterAlert,
}

pub struct Monitor<P, C> {
    vg: VariableGroup,
    water: WaterCheck<P>,
    climate: C,
    telemetry_task: TaskId,
    publish_count: u64,
}

impl<P: InputPin, C: ClimateSensor> Monitor<P, C> {
    /// Take ownership of the sensors and register the telemetry task.
    ///
    /// `water` and `climate` must have registered their variables in `vg`.
    pub fn new(
        vg: VariableGroup,
        water: WaterCheck<P>,
        climate: C,
        scheduler: &mut Scheduler,
        config: &MonitorConfig,
        now_ms: u64,
    ) -> Result<Self> {
        let telemetry_task = scheduler.add(
            TELEMETRY_TASK,
            config.telemetry_initial_delay_ms,
            config.telemetry_period_ms,
            now_ms,
        )?;
        Ok(Self {
            vg,
            water,
            climate,
            telemetry_task,
            publish_count: 0,
        })
    }

    /// Append this monitor's screens to the rotation.
    pub fn register_displays(
        &self,
        ring: &mut StatusDisplayRing<StatusPage>,
    ) -> core::result::Result<(), DisplayError> {
        ring.add_display_fn(StatusPage::Readings)?;
        ring.add_display_fn(StatusPage::WaterAlert)
    }

    /// Announce the published variables.  Failures are logged and skipped.
    pub fn register_discovery(&self, discovery: &mut dyn DiscoverySink) {
        self.water.register_discovery(&self.vg, discovery);

        let climate = [
            (self.climate.temperature_var(), DeviceClass::Temperature),
            (self.climate.humidity_var(), DeviceClass::Humidity),
        ];
        for (var, class) in climate {
            if let Err(e) = discovery.add_sensor(&self.vg, self.vg.get(var), class) {
                warn!("Monitor: discovery of '{}' failed: {}", class.as_str(), e);
            }
        }
    }

    /// Sample every owned sensor, synchronously.
    pub fn read_sensors(&mut self) {
        // The driver keeps its previous values and logs the failure.
        if let Err(e) = self.climate.read(&mut self.vg) {
            debug!("Monitor: sampling with stale climate values ({})", e);
        }
        self.water.read(&mut self.vg);
    }

    /// One telemetry cycle: sample, then publish the fresh snapshot.
    ///
    /// Delivery is best-effort; a failed publish is logged and forgotten.
    pub fn send_telemetry(&mut self, sink: &mut dyn TelemetrySink) {
        self.read_sensors();
        self.publish_count += 1;
        match sink.publish(&self.vg) {
            Ok(()) => info!(
                "Monitor: telemetry #{} sent ({})",
                self.publish_count,
                self.status_line()
            ),
            Err(e) => warn!("Monitor: telemetry #{} dropped: {}", self.publish_count, e),
        }
    }

    /// Short human-readable summary of the cached readings.
    pub fn status_line(&self) -> String {
        format!(
            "{} {:.1}C {:.1}RH",
            if self.water.have_water() { "OK" } else { "EMPTY!" },
            self.climate.temperature(),
            self.climate.humidity()
        )
    }

    pub fn have_water(&self) -> bool {
        self.water.have_water()
    }

    pub fn temperature(&self) -> f32 {
        self.climate.temperature()
    }

    pub fn humidity(&self) -> f32 {
        self.climate.humidity()
    }

    pub fn vg(&self) -> &VariableGroup {
        &self.vg
    }

    pub fn telemetry_task(&self) -> TaskId {
        self.telemetry_task
    }

    /// Telemetry cycles run so far, successful or not.
    pub fn publish_count(&self) -> u64 {
        self.publish_count
    }
}

impl<P: InputPin, C: ClimateSensor> ProducerRegistry<StatusPage> for Monitor<P, C> {
    fn render(&self, page: StatusPage, sink: &mut dyn DisplaySink) {
        match page {
            StatusPage::Readings => {
                let text = self.status_line();
                show(sink, &text);
                info!("{}", text);
            }
            StatusPage::WaterAlert => self.water.render(sink),
        }
    }
}

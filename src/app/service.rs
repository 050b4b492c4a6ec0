//! Application service: the composition root.
//!
//! [`BoilerApp`] owns the scheduler, the status display ring and the
//! monitor.  Sinks and the clock are injected at call sites, so the whole
//! service runs on the host against fakes.
//!
//! ```text
//!   Clock ──▶ ┌──────────────────────────────┐ ──▶ TelemetrySink
//!             │          BoilerApp           │
//!             │  Scheduler · Ring · Monitor  │ ──▶ DisplaySink
//!             └──────────────────────────────┘
//! ```
//!
//! One [`tick`](BoilerApp::tick) per control-loop iteration runs, in this
//! order: every due scheduled task, then the display rotation check.

use embedded_hal::digital::InputPin;
use log::{debug, info};

use super::monitor::{Monitor, StatusPage};
use super::ports::{Clock, DiscoverySink, DisplaySink, SchedulerDelegate, TelemetrySink};
use crate::config::{MonitorConfig, software_name};
use crate::display::{StatusDisplayRing, show};
use crate::error::Result;
use crate::scheduler::{Scheduler, TaskId};
use crate::sensors::ClimateSensor;
use crate::sensors::water::WaterCheck;
use crate::variables::VariableGroup;

// ───────────────────────────────────────────────────────────────
// Scheduler delegate
// ───────────────────────────────────────────────────────────────

/// Bridges scheduler firings to the monitor's telemetry cycle.
struct TelemetryDelegate<'a, P, C> {
    monitor: &'a mut Monitor<P, C>,
    sink: &'a mut dyn TelemetrySink,
}

impl<P: InputPin, C: ClimateSensor> SchedulerDelegate for TelemetryDelegate<'_, P, C> {
    fn on_task_fired(&mut self, task: TaskId, label: &str) {
        if task == self.monitor.telemetry_task() {
            self.monitor.send_telemetry(self.sink);
        } else {
            debug!("BoilerApp: no handler for task '{}'", label);
        }
    }
}

/// What one [`BoilerApp::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickOutcome {
    pub tasks_fired: usize,
    /// Ring position rendered this tick, if the display rotated.
    pub rotated_to: Option<usize>,
}

// ───────────────────────────────────────────────────────────────
// BoilerApp
// ───────────────────────────────────────────────────────────────

pub struct BoilerApp<P, C> {
    scheduler: Scheduler,
    ring: StatusDisplayRing<StatusPage>,
    monitor: Monitor<P, C>,
}

impl<P: InputPin, C: ClimateSensor> BoilerApp<P, C> {
    /// Wire the monitor, its telemetry task and its display pages.
    ///
    /// Rejects a config the scheduler or ring could not honour.
    pub fn new(
        config: &MonitorConfig,
        vg: VariableGroup,
        water: WaterCheck<P>,
        climate: C,
        now_ms: u64,
    ) -> Result<Self> {
        config.validate()?;

        let mut scheduler = Scheduler::new();
        let monitor = Monitor::new(vg, water, climate, &mut scheduler, config, now_ms)?;
        let mut ring = StatusDisplayRing::new(config.display_switch_ms, now_ms)?;
        monitor.register_displays(&mut ring)?;

        Ok(Self {
            scheduler,
            ring,
            monitor,
        })
    }

    /// One-time start-up: discovery registration and the software banner.
    pub fn start(&mut self, discovery: &mut dyn DiscoverySink, display: &mut dyn DisplaySink) {
        self.monitor.register_discovery(discovery);
        let banner = software_name();
        show(display, &banner);
        info!(
            "BoilerApp: {} started ({} task(s), {} screen(s))",
            banner,
            self.scheduler.len(),
            self.ring.len()
        );
    }

    /// Run one cooperative control-loop iteration.
    ///
    /// The clock is read once; every check in this tick sees the same `now`.
    pub fn tick(
        &mut self,
        clock: &impl Clock,
        telemetry: &mut dyn TelemetrySink,
        display: &mut dyn DisplaySink,
    ) -> TickOutcome {
        let now_ms = clock.now_ms();

        let mut delegate = TelemetryDelegate {
            monitor: &mut self.monitor,
            sink: telemetry,
        };
        let tasks_fired = self.scheduler.tick(now_ms, &mut delegate);
        let rotated_to = self.ring.tick(now_ms, &self.monitor, display);

        TickOutcome {
            tasks_fired,
            rotated_to,
        }
    }

    /// Fresh sensor read for an on-demand status page.
    pub fn status_snapshot(&mut self) -> &VariableGroup {
        self.monitor.read_sensors();
        self.monitor.vg()
    }

    pub fn monitor(&self) -> &Monitor<P, C> {
        &self.monitor
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn ring(&self) -> &StatusDisplayRing<StatusPage> {
        &self.ring
    }
}

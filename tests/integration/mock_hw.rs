//! Mock hardware and recording sinks for integration tests.
//!
//! The climate sensor is the real SHTC3 driver talking to a fake I²C bus,
//! so every test also exercises the wire protocol.  Handles returned from
//! [`rig`] let a test change the room and the boiler pin between ticks.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use boiler::app::ports::{
    Clock, DeviceClass, DiscoverySink, DisplaySink, SinkError, TelemetrySink,
};
use boiler::app::service::BoilerApp;
use boiler::config::MonitorConfig;
use boiler::display::DEFAULT_DISPLAY_CHARS;
use boiler::sensors::digital_input::SimPin;
use boiler::sensors::shtc3::{SHTC3_ADDR, Shtc3, crc8};
use boiler::sensors::water::WaterCheck;
use boiler::variables::{Variable, VariableGroup};
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, Operation};

// ── Clock ─────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeClock {
    now: Cell<u64>,
}

#[allow(dead_code)]
impl FakeClock {
    pub fn set(&self, now_ms: u64) {
        self.now.set(now_ms);
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for FakeClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

// ── SHTC3 on a fake bus ───────────────────────────────────────

pub struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

#[derive(Default)]
struct RoomState {
    frame: [u8; 6],
    offline: bool,
}

/// Test-side handle on the simulated room.
#[derive(Clone, Default)]
pub struct RoomHandle {
    state: Rc<RefCell<RoomState>>,
}

#[allow(dead_code)]
impl RoomHandle {
    pub fn set(&self, celsius: f32, humidity: f32) {
        let raw_t = (((celsius + 45.0) / 175.0) * 65_536.0).round() as u16;
        let raw_rh = ((humidity / 100.0) * 65_536.0).round() as u16;
        let t = raw_t.to_be_bytes();
        let rh = raw_rh.to_be_bytes();
        self.state.borrow_mut().frame = [t[0], t[1], crc8(&t), rh[0], rh[1], crc8(&rh)];
    }

    /// Make every bus transaction fail.
    pub fn set_offline(&self, offline: bool) {
        self.state.borrow_mut().offline = offline;
    }
}

#[derive(Default)]
pub struct MockBus {
    room: RoomHandle,
}

impl ErrorType for MockBus {
    type Error = ErrorKind;
}

impl I2c for MockBus {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let state = self.room.state.borrow();
        if state.offline || address != SHTC3_ADDR {
            return Err(ErrorKind::Other);
        }
        for op in operations {
            if let Operation::Read(buf) = op {
                buf.copy_from_slice(&state.frame[..buf.len()]);
            }
        }
        Ok(())
    }
}

// ── Recording sinks ───────────────────────────────────────────

#[derive(Default)]
pub struct RecordingTelemetry {
    pub payloads: Vec<String>,
    pub attempts: usize,
    pub unavailable: bool,
}

impl TelemetrySink for RecordingTelemetry {
    fn publish(&mut self, group: &VariableGroup) -> Result<(), SinkError> {
        self.attempts += 1;
        if self.unavailable {
            return Err(SinkError::Unavailable);
        }
        self.payloads.push(group.to_json().map_err(|_| SinkError::Rejected)?);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingDisplay {
    pub shown: Vec<String>,
}

impl RecordingDisplay {
    pub fn last(&self) -> Option<&str> {
        self.shown.last().map(String::as_str)
    }
}

impl DisplaySink for RecordingDisplay {
    fn display(&mut self, text: &str) {
        assert!(text.chars().count() <= DEFAULT_DISPLAY_CHARS);
        self.shown.push(text.to_string());
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub kind: &'static str,
    pub name: &'static str,
    pub class: DeviceClass,
}

#[derive(Default)]
pub struct RecordingDiscovery {
    pub registrations: Vec<Registration>,
    pub unavailable: bool,
}

impl RecordingDiscovery {
    fn record(
        &mut self,
        kind: &'static str,
        variable: &Variable,
        class: DeviceClass,
    ) -> Result<(), SinkError> {
        if self.unavailable {
            return Err(SinkError::Unavailable);
        }
        self.registrations.push(Registration {
            kind,
            name: variable.name(),
            class,
        });
        Ok(())
    }
}

impl DiscoverySink for RecordingDiscovery {
    fn add_binary_sensor(
        &mut self,
        _group: &VariableGroup,
        variable: &Variable,
        class: DeviceClass,
    ) -> Result<(), SinkError> {
        self.record("binary_sensor", variable, class)
    }

    fn add_sensor(
        &mut self,
        _group: &VariableGroup,
        variable: &Variable,
        class: DeviceClass,
    ) -> Result<(), SinkError> {
        self.record("sensor", variable, class)
    }
}

// ── Test rig ──────────────────────────────────────────────────

pub type TestApp = BoilerApp<SimPin, Shtc3<MockBus, NoDelay>>;

pub struct Rig {
    pub app: TestApp,
    pub clock: FakeClock,
    /// Boiler level switch: LOW = water present.
    pub pin: SimPin,
    pub room: RoomHandle,
    pub telemetry: RecordingTelemetry,
    pub display: RecordingDisplay,
}

#[allow(dead_code)]
impl Rig {
    /// Tick every `step_ms` from the current time up to and including `until_ms`.
    pub fn run_until(&mut self, until_ms: u64, step_ms: u64) {
        while self.clock.now_ms() + step_ms <= until_ms {
            self.clock.advance(step_ms);
            self.tick();
        }
    }

    pub fn tick(&mut self) -> boiler::app::service::TickOutcome {
        self.app
            .tick(&self.clock, &mut self.telemetry, &mut self.display)
    }

    pub fn set_water(&self, present: bool) {
        self.pin.set_high(!present);
    }
}

/// Build an app at t = 0 with water present and a 21.5 °C / 40 % room.
pub fn rig(config: &MonitorConfig) -> Rig {
    let pin = SimPin::new(false);
    let room = RoomHandle::default();
    room.set(21.5, 40.0);

    let mut vg = VariableGroup::new("room");
    let water = WaterCheck::new(pin.clone(), config.water_input_inverted, &mut vg).unwrap();
    let bus = MockBus { room: room.clone() };
    let climate = Shtc3::new(bus, NoDelay, "temperature", "humidity", &mut vg).unwrap();

    let clock = FakeClock::default();
    let app = BoilerApp::new(config, vg, water, climate, clock.now_ms()).unwrap();

    Rig {
        app,
        clock,
        pin,
        room,
        telemetry: RecordingTelemetry::default(),
        display: RecordingDisplay::default(),
    }
}

//! `BoilerApp` wiring: start-up, discovery, config validation and the log
//! adapters the firmware binary uses.

use boiler::adapters::display::LogDisplay;
use boiler::adapters::log_sink::{LogDiscoverySink, LogTelemetrySink};
use boiler::app::ports::{ConfigError, DeviceClass};
use boiler::app::service::{BoilerApp, TickOutcome};
use boiler::config::{MonitorConfig, software_name};
use boiler::error::Error;
use boiler::sensors::digital_input::SimPin;
use boiler::sensors::shtc3::Shtc3;
use boiler::sensors::water::WaterCheck;
use boiler::variables::VariableGroup;

use crate::mock_hw::{MockBus, NoDelay, RecordingDiscovery, Registration, TestApp, rig};

#[test]
fn start_registers_discovery_and_shows_banner() {
    let mut rig = rig(&MonitorConfig::default());
    let mut discovery = RecordingDiscovery::default();

    rig.app.start(&mut discovery, &mut rig.display);

    assert_eq!(rig.display.shown, vec![software_name()]);
    assert_eq!(
        discovery.registrations,
        vec![
            Registration {
                kind: "binary_sensor",
                name: "boiler",
                class: DeviceClass::Moisture,
            },
            Registration {
                kind: "sensor",
                name: "temperature",
                class: DeviceClass::Temperature,
            },
            Registration {
                kind: "sensor",
                name: "humidity",
                class: DeviceClass::Humidity,
            },
        ]
    );
}

#[test]
fn discovery_failure_does_not_block_start() {
    let mut rig = rig(&MonitorConfig::default());
    let mut discovery = RecordingDiscovery {
        unavailable: true,
        ..RecordingDiscovery::default()
    };

    rig.app.start(&mut discovery, &mut rig.display);
    assert!(discovery.registrations.is_empty());
    assert_eq!(rig.display.shown.len(), 1);

    rig.run_until(10_000, 100);
    assert_eq!(rig.telemetry.payloads.len(), 1);
}

#[test]
fn new_wires_one_task_and_two_pages() {
    let rig = rig(&MonitorConfig::default());

    assert_eq!(rig.app.scheduler().len(), 1);
    assert_eq!(rig.app.ring().len(), 2);
    assert_eq!(rig.app.ring().switch_interval_ms(), 5_000);

    let task = rig.app.monitor().telemetry_task();
    let task = rig.app.scheduler().task(task).unwrap();
    assert_eq!(task.label(), "telemetry");
    assert_eq!(task.next_fire_ms(), 10_000);
    assert_eq!(task.period_ms(), 60_000);
}

fn build(config: &MonitorConfig) -> boiler::error::Result<TestApp> {
    let mut vg = VariableGroup::new("room");
    let water = WaterCheck::new(SimPin::new(false), true, &mut vg).unwrap();
    let climate = Shtc3::new(
        MockBus::default(),
        NoDelay,
        "temperature",
        "humidity",
        &mut vg,
    )
    .unwrap();
    BoilerApp::new(config, vg, water, climate, 0)
}

#[test]
fn invalid_config_is_rejected() {
    let config = MonitorConfig {
        telemetry_period_ms: 0,
        ..MonitorConfig::default()
    };
    assert!(matches!(
        build(&config),
        Err(Error::Config(ConfigError::ValidationFailed(_)))
    ));
}

#[test]
fn out_of_range_timing_is_rejected_at_construction() {
    let configs = [
        MonitorConfig {
            telemetry_initial_delay_ms: u64::MAX,
            ..MonitorConfig::default()
        },
        MonitorConfig {
            telemetry_period_ms: u64::MAX,
            ..MonitorConfig::default()
        },
        MonitorConfig {
            display_switch_ms: u64::MAX,
            ..MonitorConfig::default()
        },
    ];
    for config in &configs {
        assert!(matches!(
            build(config),
            Err(Error::Config(ConfigError::ValidationFailed(_)))
        ));
    }
}

#[test]
fn tick_reports_what_happened() {
    let mut rig = rig(&MonitorConfig::default());

    assert_eq!(rig.tick(), TickOutcome::default());

    rig.run_until(9_900, 100);
    rig.clock.advance(100);
    assert_eq!(
        rig.tick(),
        TickOutcome {
            tasks_fired: 1,
            rotated_to: Some(0),
        }
    );

    // Same instant again: nothing is due.
    assert_eq!(rig.tick(), TickOutcome::default());
}

#[test]
fn custom_timing_is_honoured() {
    let config = MonitorConfig {
        telemetry_initial_delay_ms: 0,
        telemetry_period_ms: 1_000,
        display_switch_ms: 500,
        ..MonitorConfig::default()
    };
    let mut rig = rig(&config);

    rig.tick();
    assert_eq!(rig.telemetry.payloads.len(), 1);

    rig.run_until(5_000, 50);
    assert_eq!(rig.telemetry.payloads.len(), 6);
    assert_eq!(rig.app.ring().rotations(), 10);
}

#[test]
fn log_adapters_drive_a_full_cycle() {
    let config = MonitorConfig::default();
    let mut rig = rig(&config);
    let mut telemetry = LogTelemetrySink::new(&config.device_name);
    let mut discovery = LogDiscoverySink::new(&config.device_name);
    let mut display = LogDisplay::new(21);

    rig.app.start(&mut discovery, &mut display);
    assert_eq!(discovery.registered().len(), 3);
    assert_eq!(discovery.registered()[0].0, "boiler_room_boiler");

    for now in (0..=10_000).step_by(100) {
        rig.clock.set(now);
        rig.app.tick(&rig.clock, &mut telemetry, &mut display);
    }

    assert_eq!(telemetry.published(), 1);
    assert_eq!(
        telemetry.last_payload(),
        Some(r#"{"boiler":true,"temperature":21.5,"humidity":40.0}"#)
    );
    assert_eq!(display.current_text(), "OK 21.5C 40.0RH");
}

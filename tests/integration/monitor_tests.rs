//! Telemetry cycle and status display, end to end through `BoilerApp`.

use boiler::app::ports::Clock;
use boiler::config::MonitorConfig;
use boiler::sensors::water::FILL_ALERT;

use crate::mock_hw::rig;

const STEP_MS: u64 = 100;

#[test]
fn first_publish_waits_for_initial_delay() {
    let mut rig = rig(&MonitorConfig::default());

    rig.tick();
    rig.run_until(9_900, STEP_MS);
    assert!(rig.telemetry.payloads.is_empty());
    assert_eq!(rig.app.monitor().publish_count(), 0);

    rig.run_until(10_000, STEP_MS);
    assert_eq!(
        rig.telemetry.payloads,
        vec![r#"{"boiler":true,"temperature":21.5,"humidity":40.0}"#]
    );
}

#[test]
fn publish_carries_readings_taken_at_fire_time() {
    let mut rig = rig(&MonitorConfig::default());
    rig.tick();

    rig.run_until(69_900, STEP_MS);
    assert_eq!(rig.telemetry.payloads.len(), 1);

    // Change the room after the first cycle; only the next cycle sees it.
    rig.room.set(23.0, 55.0);
    rig.set_water(false);
    assert_eq!(rig.telemetry.payloads.len(), 1);

    rig.run_until(70_000, STEP_MS);
    assert_eq!(rig.telemetry.payloads.len(), 2);
    assert_eq!(
        rig.telemetry.payloads[1],
        r#"{"boiler":false,"temperature":23.0,"humidity":55.0}"#
    );
}

#[test]
fn failed_publishes_still_advance_the_cycle() {
    let mut rig = rig(&MonitorConfig::default());
    rig.telemetry.unavailable = true;
    rig.tick();

    rig.run_until(130_000, STEP_MS);
    assert_eq!(rig.telemetry.attempts, 3);
    assert!(rig.telemetry.payloads.is_empty());
    assert_eq!(rig.app.monitor().publish_count(), 3);

    // Delivery recovers on the next cycle with no catch-up burst.
    rig.telemetry.unavailable = false;
    rig.run_until(190_000, STEP_MS);
    assert_eq!(rig.telemetry.attempts, 4);
    assert_eq!(rig.telemetry.payloads.len(), 1);
}

#[test]
fn climate_bus_failure_keeps_previous_values() {
    let mut rig = rig(&MonitorConfig::default());
    rig.tick();
    rig.run_until(10_000, STEP_MS);

    rig.room.set_offline(true);
    rig.room.set(35.0, 90.0);
    rig.set_water(false);
    rig.run_until(70_000, STEP_MS);

    // The water detector is still sampled after the climate read fails.
    assert_eq!(rig.telemetry.payloads.len(), 2);
    assert_eq!(
        rig.telemetry.payloads[1],
        r#"{"boiler":false,"temperature":21.5,"humidity":40.0}"#
    );
    assert!((rig.app.monitor().temperature() - 21.5).abs() < 0.01);
    assert!(!rig.app.monitor().have_water());
}

#[test]
fn display_rotates_once_per_interval() {
    let mut rig = rig(&MonitorConfig::default());
    rig.tick();

    rig.run_until(4_900, STEP_MS);
    assert_eq!(rig.app.ring().rotations(), 0);
    assert!(rig.display.shown.is_empty());

    rig.run_until(12_000, STEP_MS);
    assert_eq!(rig.app.ring().rotations(), 2);
    assert_eq!(rig.app.ring().current_index(), 0);
    // The water alert page at 5 s is silent while the tank is full; the
    // readings page at 10 s sees the sample taken in the same tick.
    assert_eq!(rig.display.shown, vec!["OK 21.5C 40.0RH"]);
}

#[test]
fn display_shows_cached_state_between_samples() {
    let mut rig = rig(&MonitorConfig::default());
    rig.tick();
    rig.run_until(10_000, STEP_MS);

    rig.room.set(30.0, 40.0);
    rig.run_until(20_000, STEP_MS);
    assert_eq!(rig.display.last(), Some("OK 21.5C 40.0RH"));

    // An on-demand snapshot refreshes the cache without publishing.
    let temperature = rig
        .app
        .status_snapshot()
        .find("temperature")
        .map(|v| v.value().to_string());
    assert_eq!(temperature.as_deref(), Some("30.0"));
    assert_eq!(rig.telemetry.payloads.len(), 1);

    rig.run_until(30_000, STEP_MS);
    assert_eq!(rig.display.last(), Some("OK 30.0C 40.0RH"));
}

#[test]
fn empty_tank_raises_alert_page() {
    let mut rig = rig(&MonitorConfig::default());
    rig.set_water(false);
    rig.tick();

    rig.run_until(15_000, STEP_MS);
    assert!(!rig.app.monitor().have_water());
    assert_eq!(rig.display.shown, vec!["EMPTY! 21.5C 40.0RH", FILL_ALERT]);
}

#[test]
fn clock_stall_coalesces_missed_cycles() {
    let mut rig = rig(&MonitorConfig::default());
    rig.tick();
    rig.run_until(10_000, STEP_MS);

    rig.clock.set(200_000);
    let outcome = rig.tick();
    assert_eq!(outcome.tasks_fired, 1);
    assert_eq!(rig.telemetry.payloads.len(), 2);
    // One display step per tick, however long the stall.
    assert_eq!(rig.app.ring().rotations(), 3);

    let task = rig.app.monitor().telemetry_task();
    let next = rig.app.scheduler().task(task).map(|t| t.next_fire_ms());
    assert_eq!(next, Some(250_000));
    assert_eq!(rig.clock.now_ms(), 200_000);
}

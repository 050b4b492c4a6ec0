//! Boiler Monitor Firmware: main entry point
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  SystemClock   LogTelemetrySink   LogDisplay   NvsConfigStore  │
//! │  (Clock)       (Telemetry)        (Display)    (ConfigPort)    │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              BoilerApp (pure logic)                    │    │
//! │  │  Scheduler · StatusDisplayRing · Monitor               │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::{info, warn};

use esp_idf_hal::delay::{Delay, FreeRtos};
use esp_idf_hal::gpio::PinDriver;
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::units::Hertz;
use esp_idf_svc::nvs::EspDefaultNvsPartition;

use boiler::adapters::display::LogDisplay;
use boiler::adapters::log_sink::{LogDiscoverySink, LogTelemetrySink};
use boiler::adapters::nvs::NvsConfigStore;
use boiler::adapters::time::SystemClock;
use boiler::app::ports::{Clock, ConfigPort};
use boiler::app::service::BoilerApp;
use boiler::config::{MonitorConfig, software_name};
use boiler::display::DEFAULT_DISPLAY_CHARS;
use boiler::error::Error;
use boiler::pins;
use boiler::sensors::shtc3::Shtc3;
use boiler::sensors::water::WaterCheck;
use boiler::variables::VariableGroup;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;
    info!("{} starting", software_name());

    // ── 2. Load config from NVS (or defaults) ─────────────────
    let config = match NvsConfigStore::new(EspDefaultNvsPartition::take()?) {
        Ok(store) => store.load().unwrap_or_else(|e| {
            warn!("NVS config load failed ({}), using defaults", e);
            MonitorConfig::default()
        }),
        Err(e) => {
            warn!("NVS init failed ({}), running with defaults", e);
            MonitorConfig::default()
        }
    };

    // ── 3. Peripherals ────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    info!(
        "Pins: boiler=GPIO{} sda=GPIO{} scl=GPIO{}",
        pins::BOILER_WATER_GPIO,
        pins::I2C_SDA_GPIO,
        pins::I2C_SCL_GPIO
    );
    let water_pin = PinDriver::input(peripherals.pins.gpio23)?;
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio21,
        peripherals.pins.gpio22,
        &I2cConfig::new().baudrate(Hertz(pins::I2C_BAUD_HZ)),
    )?;

    // ── 4. Sensors and composition root ───────────────────────
    let mut vg = VariableGroup::new("room");
    let water =
        WaterCheck::new(water_pin, config.water_input_inverted, &mut vg).map_err(Error::from)?;
    let climate = Shtc3::new(i2c, Delay::new_default(), "temperature", "humidity", &mut vg)
        .map_err(Error::from)?;

    let clock = SystemClock::new();
    let mut app = BoilerApp::new(&config, vg, water, climate, clock.now_ms())?;

    let mut telemetry = LogTelemetrySink::new(config.device_name.as_str());
    let mut discovery = LogDiscoverySink::new(config.device_name.as_str());
    let mut display = LogDisplay::new(DEFAULT_DISPLAY_CHARS);
    app.start(&mut discovery, &mut display);

    info!("System ready. Entering control loop.");

    // ── 5. Control loop ───────────────────────────────────────
    loop {
        app.tick(&clock, &mut telemetry, &mut display);
        FreeRtos::delay_ms(config.loop_tick_ms);
    }
}

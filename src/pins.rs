//! GPIO / peripheral pin assignments for the boiler monitor board.
//!
//! Single source of truth for the wiring.  `main` takes the typed
//! `esp_idf_hal` pins that match these numbers.

// ---------------------------------------------------------------------------
// Sensors: digital
// ---------------------------------------------------------------------------

/// Boiler tank level switch.  LOW = water present (input is inverted).
pub const BOILER_WATER_GPIO: i32 = 23;

// ---------------------------------------------------------------------------
// I²C bus (SHTC3 climate sensor, OLED)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 21;
pub const I2C_SCL_GPIO: i32 = 22;
/// Standard-mode I²C; the SHTC3 supports up to 1 MHz.
pub const I2C_BAUD_HZ: u32 = 100_000;

//! Sensirion SHTC3 temperature / relative-humidity sensor (I²C, addr 0x70).
//!
//! One measurement cycle: wake → measure (T first, normal mode, no clock
//! stretching) → wait 12.1 ms → read 6 bytes → sleep.  Each 16-bit word is
//! followed by a CRC-8 (poly 0x31, init 0xFF).
//!
//! A failed cycle keeps the previous good values in both the driver and the
//! variable group; the failure is logged and reported to the caller, who is
//! free to ignore it.

use crc::{CRC_8_NRSC_5, Crc};
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::warn;

use super::ClimateSensor;
use crate::error::{SensorError, VariableError};
use crate::variables::{VarFlags, VarId, Variable, VariableGroup};

pub const SHTC3_ADDR: u8 = 0x70;

const CMD_WAKEUP: [u8; 2] = [0x35, 0x17];
const CMD_SLEEP: [u8; 2] = [0xB0, 0x98];
const CMD_MEASURE_T_FIRST: [u8; 2] = [0x78, 0x66];

/// Wake-up time, datasheet max 240 µs.
const WAKEUP_US: u32 = 240;
/// Normal-mode measurement time, datasheet max 12.1 ms.
const MEASURE_US: u32 = 12_100;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateReading {
    pub celsius: f32,
    pub relative_humidity: f32,
}

pub struct Shtc3<I, D> {
    i2c: I,
    delay: D,
    temperature_var: VarId,
    humidity_var: VarId,
    last: ClimateReading,
    last_ok: bool,
}

impl<I: I2c, D: DelayNs> Shtc3<I, D> {
    /// Register `temperature` (°C) and `humidity` (%) variables in `vg`.
    pub fn new(
        i2c: I,
        delay: D,
        temperature_name: &'static str,
        humidity_name: &'static str,
        vg: &mut VariableGroup,
    ) -> Result<Self, VariableError> {
        let temperature_var = vg.add(Variable::float(
            temperature_name,
            "temperature",
            "°C",
            VarFlags::PUBLISH,
            1,
        ))?;
        let humidity_var = vg.add(Variable::float(
            humidity_name,
            "humidity",
            "%",
            VarFlags::PUBLISH,
            1,
        ))?;
        Ok(Self {
            i2c,
            delay,
            temperature_var,
            humidity_var,
            last: ClimateReading {
                celsius: 0.0,
                relative_humidity: 0.0,
            },
            last_ok: false,
        })
    }

    fn measure(&mut self) -> Result<ClimateReading, SensorError> {
        self.i2c
            .write(SHTC3_ADDR, &CMD_WAKEUP)
            .map_err(|_| SensorError::BusError)?;
        self.delay.delay_us(WAKEUP_US);

        self.i2c
            .write(SHTC3_ADDR, &CMD_MEASURE_T_FIRST)
            .map_err(|_| SensorError::BusError)?;
        self.delay.delay_us(MEASURE_US);

        let mut frame = [0u8; 6];
        let read = self.i2c.read(SHTC3_ADDR, &mut frame);

        // Put the sensor back to sleep even if the read failed.
        if self.i2c.write(SHTC3_ADDR, &CMD_SLEEP).is_err() {
            warn!("SHTC3: sleep command failed");
        }
        read.map_err(|_| SensorError::BusError)?;

        let raw_t = checked_word(&frame[0..3])?;
        let raw_rh = checked_word(&frame[3..6])?;
        Ok(ClimateReading {
            celsius: raw_to_celsius(raw_t),
            relative_humidity: raw_to_humidity(raw_rh),
        })
    }
}

impl<I: I2c, D: DelayNs> ClimateSensor for Shtc3<I, D> {
    fn read(&mut self, vg: &mut VariableGroup) -> Result<ClimateReading, SensorError> {
        match self.measure() {
            Ok(reading) => {
                self.last = reading;
                self.last_ok = true;
                vg.set_float(self.temperature_var, reading.celsius);
                vg.set_float(self.humidity_var, reading.relative_humidity);
                Ok(reading)
            }
            Err(e) => {
                self.last_ok = false;
                warn!("SHTC3: read failed ({}), keeping previous values", e);
                Err(e)
            }
        }
    }

    fn temperature(&self) -> f32 {
        self.last.celsius
    }

    fn humidity(&self) -> f32 {
        self.last.relative_humidity
    }

    fn last_read_ok(&self) -> bool {
        self.last_ok
    }

    fn temperature_var(&self) -> VarId {
        self.temperature_var
    }

    fn humidity_var(&self) -> VarId {
        self.humidity_var
    }
}

/// Sensirion CRC-8: polynomial 0x31, init 0xFF, no reflection.
const SENSIRION_CRC: Crc<u8> = Crc::<u8>::new(&CRC_8_NRSC_5);

pub fn crc8(data: &[u8]) -> u8 {
    SENSIRION_CRC.checksum(data)
}

fn checked_word(chunk: &[u8]) -> Result<u16, SensorError> {
    if crc8(&chunk[..2]) != chunk[2] {
        return Err(SensorError::CrcMismatch);
    }
    Ok(u16::from_be_bytes([chunk[0], chunk[1]]))
}

fn raw_to_celsius(raw: u16) -> f32 {
    -45.0 + 175.0 * f32::from(raw) / 65_536.0
}

fn raw_to_humidity(raw: u16) -> f32 {
    100.0 * f32::from(raw) / 65_536.0
}

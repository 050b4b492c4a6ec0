//! Sensor subsystem: the boiler water detector and the room climate sensor.
//!
//! Every driver writes its readings into a [`VariableGroup`] owned by the
//! monitor; consumers (telemetry, display, discovery) read from there.

pub mod digital_input;
pub mod shtc3;
pub mod water;

use crate::error::SensorError;
use crate::variables::{VarId, VariableGroup};
use shtc3::ClimateReading;

/// Temperature / humidity source sampled on each telemetry cycle.
pub trait ClimateSensor {
    /// Take one measurement and store it in `vg`.  On failure the previous
    /// values stay in place.
    fn read(&mut self, vg: &mut VariableGroup) -> Result<ClimateReading, SensorError>;

    /// Last good temperature in °C.
    fn temperature(&self) -> f32;

    /// Last good relative humidity in %.
    fn humidity(&self) -> f32;

    fn last_read_ok(&self) -> bool;

    fn temperature_var(&self) -> VarId;

    fn humidity_var(&self) -> VarId;
}

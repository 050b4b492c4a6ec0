//! Boiler water detector.
//!
//! The level switch on the boiler tank pulls its GPIO LOW when water is
//! present, so the digital input is normally inverted: `have_water() == true`
//! means the tank is fine.
//!
//! Besides its reading, the check contributes an alert screen to the status
//! display that only renders when the tank is empty.

use embedded_hal::digital::InputPin;
use log::warn;

use super::digital_input::DigitalInput;
use crate::app::ports::{DeviceClass, DiscoverySink, DisplaySink};
use crate::display::{DisplayProducer, show};
use crate::error::VariableError;
use crate::variables::{VarId, VariableGroup};

pub const WATER_VAR_NAME: &str = "boiler";
pub const WATER_VAR_DESCRIPTION: &str = "boiler has water";
pub const FILL_ALERT: &str = "Fill boiler tank.";

pub struct WaterCheck<P> {
    din: DigitalInput<P>,
}

impl<P: InputPin> WaterCheck<P> {
    /// Water is assumed present until the first read.
    pub fn new(pin: P, inverted: bool, vg: &mut VariableGroup) -> Result<Self, VariableError> {
        let din = DigitalInput::new(
            pin,
            WATER_VAR_NAME,
            WATER_VAR_DESCRIPTION,
            vg,
            true,
            inverted,
            true,
        )?;
        Ok(Self { din })
    }

    pub fn read(&mut self, vg: &mut VariableGroup) {
        self.din.read(vg);
        if self.din.changed() && !self.din.is_high() {
            warn!("WaterCheck: boiler tank is empty");
        }
    }

    pub fn have_water(&self) -> bool {
        self.din.is_high()
    }

    pub fn var(&self) -> VarId {
        self.din.var()
    }

    /// Register the detector as a moisture binary sensor.  Best-effort.
    pub fn register_discovery(&self, vg: &VariableGroup, discovery: &mut dyn DiscoverySink) {
        if let Err(e) = discovery.add_binary_sensor(vg, vg.get(self.var()), DeviceClass::Moisture)
        {
            warn!("WaterCheck: discovery registration failed: {}", e);
        }
    }
}

impl<P: InputPin> DisplayProducer for WaterCheck<P> {
    fn render(&self, sink: &mut dyn DisplaySink) {
        if !self.have_water() {
            show(sink, FILL_ALERT);
        }
    }
}

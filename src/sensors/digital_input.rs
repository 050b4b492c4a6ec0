//! Digital input sensor with optional inversion.
//!
//! Wraps any `embedded_hal::digital::InputPin` and mirrors its level into a
//! boolean variable.  `read()` does one synchronous pin read; `is_high()`
//! returns the cached result without touching hardware.
//!
//! No debouncing is done here.  A failed pin read is folded into a logical
//! LOW before inversion is applied: the layer above cannot tell the two
//! apart, by design of the hardware contract.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: wraps an `esp_idf_hal::gpio::PinDriver` configured as input.
//! On host/test: [`SimPin`] provides an injectable level.

use embedded_hal::digital::InputPin;
use log::{debug, warn};

use crate::error::VariableError;
use crate::variables::{VarFlags, VarId, Variable, VariableGroup};

pub struct DigitalInput<P> {
    pin: P,
    name: &'static str,
    var: VarId,
    inverted: bool,
    state: bool,
    previous: bool,
}

impl<P: InputPin> DigitalInput<P> {
    /// Register the state variable in `vg` and wrap `pin`.
    ///
    /// * `publish`: export the variable to telemetry and discovery.
    /// * `inverted`: report `!raw` (active-low wiring).
    /// * `default_state`: value reported until the first `read()`.
    pub fn new(
        pin: P,
        name: &'static str,
        description: &'static str,
        vg: &mut VariableGroup,
        publish: bool,
        inverted: bool,
        default_state: bool,
    ) -> Result<Self, VariableError> {
        let flags = if publish { VarFlags::PUBLISH } else { VarFlags::NONE };
        let var = vg.add(Variable::boolean(name, description, flags, default_state))?;
        Ok(Self {
            pin,
            name,
            var,
            inverted,
            state: default_state,
            previous: default_state,
        })
    }

    /// Sample the pin once and update the cached state and its variable.
    pub fn read(&mut self, vg: &mut VariableGroup) -> bool {
        let raw = self.pin.is_high().unwrap_or_else(|_| {
            warn!("DIn '{}': pin read failed, treating as LOW", self.name);
            false
        });
        self.previous = self.state;
        self.state = raw ^ self.inverted;
        if vg.set_bool(self.var, self.state) {
            debug!("DIn '{}': {} -> {}", self.name, self.previous, self.state);
        }
        self.state
    }

    /// Last computed state.  No I/O.
    pub fn is_high(&self) -> bool {
        self.state
    }

    /// Whether the last `read()` flipped the state.
    pub fn changed(&self) -> bool {
        self.state != self.previous
    }

    pub fn var(&self) -> VarId {
        self.var
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_inverted(&self) -> bool {
        self.inverted
    }
}

// ── Simulation pin ────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
pub use sim::SimPin;

#[cfg(not(target_os = "espidf"))]
mod sim {
    use core::convert::Infallible;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use embedded_hal::digital::{ErrorType, InputPin};

    /// Host-side input pin whose level is set from tests.
    ///
    /// Clones share the same level, so a test keeps one handle while the
    /// sensor owns the other.
    #[derive(Debug, Clone, Default)]
    pub struct SimPin {
        level: Arc<AtomicBool>,
    }

    impl SimPin {
        pub fn new(high: bool) -> Self {
            Self {
                level: Arc::new(AtomicBool::new(high)),
            }
        }

        pub fn set_high(&self, high: bool) {
            self.level.store(high, Ordering::Relaxed);
        }
    }

    impl ErrorType for SimPin {
        type Error = Infallible;
    }

    impl InputPin for SimPin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(self.level.load(Ordering::Relaxed))
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.level.load(Ordering::Relaxed))
        }
    }
}

//! Application core: monitoring logic, zero direct I/O.
//!
//! The [`service::BoilerApp`] composition root drives the scheduler and the
//! status display; the [`monitor::Monitor`] owns the sensors.  All
//! interaction with the outside world goes through the **port traits** in
//! [`ports`], keeping this layer testable without real peripherals.

pub mod monitor;
pub mod ports;
pub mod service;

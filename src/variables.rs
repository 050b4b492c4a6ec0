//! Variable groups: named, insertion-ordered sets of current values.
//!
//! A [`VariableGroup`] is the hand-off point between sensors and every
//! consumer of their readings: the telemetry sink serialises it, the
//! discovery sink registers its entries, the status display reads it.
//! Sensors own a [`VarId`] into the group and write through it on each read.

use core::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::VariableError;

/// Maximum variables in one group (stack-allocated).
pub const MAX_VARIABLES: usize = 8;

/// Per-variable behaviour flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VarFlags(u8);

impl VarFlags {
    pub const NONE: Self = Self(0);
    /// Exported to telemetry and discovery.
    pub const PUBLISH: Self = Self(0b001);

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

/// A typed current value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Bool(bool),
    /// Float rendered with a fixed number of decimals.
    Float { value: f32, decimals: u8 },
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", if *b { "on" } else { "off" }),
            Self::Float { value, decimals } => write!(f, "{:.*}", *decimals as usize, value),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Self::Bool(b) => serializer.serialize_bool(b),
            Self::Float { value, decimals } => {
                let scale = 10f64.powi(i32::from(decimals));
                serializer.serialize_f64((f64::from(value) * scale).round() / scale)
            }
        }
    }
}

/// One named entry in a [`VariableGroup`].
#[derive(Debug, Clone)]
pub struct Variable {
    name: &'static str,
    description: &'static str,
    units: Option<&'static str>,
    flags: VarFlags,
    value: Value,
}

impl Variable {
    pub fn boolean(
        name: &'static str,
        description: &'static str,
        flags: VarFlags,
        initial: bool,
    ) -> Self {
        Self {
            name,
            description,
            units: None,
            flags,
            value: Value::Bool(initial),
        }
    }

    pub fn float(
        name: &'static str,
        description: &'static str,
        units: &'static str,
        flags: VarFlags,
        decimals: u8,
    ) -> Self {
        Self {
            name,
            description,
            units: Some(units),
            flags,
            value: Value::Float { value: 0.0, decimals },
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    pub fn units(&self) -> Option<&'static str> {
        self.units
    }

    pub fn flags(&self) -> VarFlags {
        self.flags
    }

    pub fn value(&self) -> Value {
        self.value
    }

    pub fn is_published(&self) -> bool {
        self.flags.contains(VarFlags::PUBLISH)
    }
}

/// Handle to a variable inside the group that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarId(usize);

/// A named, insertion-ordered mapping from variable name to current value.
#[derive(Debug, Clone)]
pub struct VariableGroup {
    name: &'static str,
    vars: heapless::Vec<Variable, MAX_VARIABLES>,
}

impl VariableGroup {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            vars: heapless::Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Append a variable.  Order of insertion is the order of serialisation.
    pub fn add(&mut self, variable: Variable) -> Result<VarId, VariableError> {
        let id = VarId(self.vars.len());
        self.vars.push(variable).map_err(|_| VariableError::Full)?;
        Ok(id)
    }

    /// Panics if `id` was issued by a different group.
    pub fn get(&self, id: VarId) -> &Variable {
        &self.vars[id.0]
    }

    pub fn find(&self, name: &str) -> Option<&Variable> {
        self.vars.iter().find(|v| v.name == name)
    }

    /// Store a boolean.  Returns `true` if the value changed.
    pub fn set_bool(&mut self, id: VarId, value: bool) -> bool {
        let var = &mut self.vars[id.0];
        let changed = var.value != Value::Bool(value);
        var.value = Value::Bool(value);
        changed
    }

    /// Store a float, keeping the variable's display precision.
    pub fn set_float(&mut self, id: VarId, value: f32) {
        let var = &mut self.vars[id.0];
        let decimals = match var.value {
            Value::Float { decimals, .. } => decimals,
            Value::Bool(_) => 0,
        };
        var.value = Value::Float { value, decimals };
    }

    pub fn bool_value(&self, id: VarId) -> Option<bool> {
        match self.vars[id.0].value {
            Value::Bool(b) => Some(b),
            Value::Float { .. } => None,
        }
    }

    pub fn float_value(&self, id: VarId) -> Option<f32> {
        match self.vars[id.0].value {
            Value::Float { value, .. } => Some(value),
            Value::Bool(_) => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.vars.iter()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// JSON object of every published variable, in insertion order.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Serialises as a flat `{ name: value }` map of the published variables.
impl Serialize for VariableGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let published = self.vars.iter().filter(|v| v.is_published()).count();
        let mut map = serializer.serialize_map(Some(published))?;
        for var in self.vars.iter().filter(|v| v.is_published()) {
            map.serialize_entry(var.name, &var.value)?;
        }
        map.end()
    }
}

//! Static descriptors for module parameters, ports and lights.

#[cfg(feature = "serde")]
use serde::Serialize;
use tracing::debug;

use crate::{
    error::{RackError, Result},
    modules::module::ParamId,
};

/// Declared range, default and display scaling of one parameter.
///
/// Display scaling follows the usual module-host convention:
/// - `display_base == 0`: linear, `value × multiplier`
/// - `display_base < 0`: logarithmic, `log_{-base}(value) × multiplier`
/// - `display_base > 0`: exponential, `base^value × multiplier`
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamConfig {
    pub name: &'static str,
    pub min: f32,
    pub max: f32,
    pub default: f32,
    pub unit: &'static str,
    pub display_base: f32,
    pub display_multiplier: f32,
}

impl ParamConfig {
    pub const fn new(name: &'static str, min: f32, max: f32, default: f32) -> Self {
        Self {
            name,
            min,
            max,
            default,
            unit: "",
            display_base: 0.0,
            display_multiplier: 1.0,
        }
    }

    pub const fn with_display(self, unit: &'static str, base: f32, multiplier: f32) -> Self {
        Self {
            unit,
            display_base: base,
            display_multiplier: multiplier,
            ..self
        }
    }

    /// Clamp a value into the declared range. NaN falls back to the default.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            self.default
        } else {
            value.clamp(self.min, self.max)
        }
    }

    /// Value as shown to a user (e.g. decibels for level faders).
    pub fn display_value(&self, value: f32) -> f32 {
        if self.display_base == 0.0 {
            value * self.display_multiplier
        } else if self.display_base < 0.0 {
            value.log(-self.display_base) * self.display_multiplier
        } else {
            self.display_base.powf(value) * self.display_multiplier
        }
    }
}

/// Name of an input, output or light.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortInfo {
    pub name: &'static str,
}

impl PortInfo {
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }
}

/// Ordered lists of everything a module exposes to its host.
///
/// The position of an entry is its id: `params[2]` is `ParamId(2)`.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug)]
pub struct ModuleLayout {
    pub name: &'static str,
    pub params: &'static [ParamConfig],
    pub inputs: &'static [PortInfo],
    pub outputs: &'static [PortInfo],
    pub lights: &'static [PortInfo],
}

impl ModuleLayout {
    /// Look up a parameter by name (ASCII case-insensitive).
    pub fn param_index(&self, name: &str) -> Result<ParamId> {
        let found = self
            .params
            .iter()
            .position(|p| p.name.eq_ignore_ascii_case(name.trim()));

        match found {
            Some(index) => Ok(ParamId(index)),
            None => {
                debug!(module = self.name, name, "parameter lookup failed");
                Err(RackError::UnknownParam {
                    module: self.name,
                    name: name.to_string(),
                })
            }
        }
    }

    pub fn param(&self, id: ParamId) -> Result<&ParamConfig> {
        self.params.get(id.0).ok_or(RackError::ParamOutOfRange {
            index: id.0,
            count: self.params.len(),
        })
    }

    /// Default values for every parameter, in layout order.
    pub fn default_params(&self) -> impl Iterator<Item = f32> + '_ {
        self.params.iter().map(|p| p.default)
    }
}

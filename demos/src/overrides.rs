//! `cube.field=value` parameter overrides from the command line.

use std::fmt;
use std::str::FromStr;

use tinted_core::Rgb;
use tinted_graphics::{EffectField, ParameterValue};

/// One parameter edit addressed to a cube by name.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterOverride {
    pub cube: String,
    pub field: EffectField,
    pub value: ParameterValue,
}

impl FromStr for ParameterOverride {
    type Err = String;

    /// Parse `red.cornerExponent=5` or `blue.topColor=#00ff00`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (target, value) = s
            .split_once('=')
            .ok_or_else(|| format!("expected CUBE.FIELD=VALUE, got '{s}'"))?;
        let (cube, field) = target
            .split_once('.')
            .ok_or_else(|| format!("expected CUBE.FIELD before '=', got '{target}'"))?;
        let field = EffectField::from_uniform_name(field.trim())
            .ok_or_else(|| format!("unknown field '{field}'"))?;

        let value = value.trim();
        let value = if field.is_color() {
            ParameterValue::Color(Rgb::parse_hex(value).map_err(|e| e.to_string())?)
        } else {
            ParameterValue::Scalar(
                value
                    .parse::<f32>()
                    .map_err(|e| format!("invalid number '{value}': {e}"))?,
            )
        };

        Ok(Self {
            cube: cube.trim().to_ascii_lowercase(),
            field,
            value,
        })
    }
}

impl fmt::Display for ParameterOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}={}", self.cube, self.field, self.value)
    }
}

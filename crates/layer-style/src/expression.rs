//! Map-style expressions produced by the compiler.

use serde::{Serialize, Serializer};
use serde_json::Value;

/// One `(zoom, value)` stop of an interpolation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stop {
    pub zoom: f64,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    Linear,
}

impl Interpolation {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Zoom,
}

impl Input {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Zoom => "zoom",
        }
    }
}

/// A declarative expression evaluated by the map renderer.
///
/// Serializes to the renderer's array form, e.g.
/// `["interpolate", ["linear"], ["zoom"], 6.0, 0.0, 12.0, 0.8]`.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Interpolate {
        interpolation: Interpolation,
        input: Input,
        /// Never empty, sorted by zoom.
        stops: Vec<Stop>,
    },
}

impl Expression {
    pub fn stops(&self) -> &[Stop] {
        match self {
            Self::Interpolate { stops, .. } => stops,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Self::Interpolate {
                interpolation,
                input,
                stops,
            } => {
                let mut items = Vec::with_capacity(3 + stops.len() * 2);
                items.push(Value::from("interpolate"));
                items.push(Value::Array(vec![Value::from(interpolation.as_str())]));
                items.push(Value::Array(vec![Value::from(input.as_str())]));
                for stop in stops {
                    items.push(Value::from(stop.zoom));
                    items.push(Value::from(stop.value));
                }
                Value::Array(items)
            }
        }
    }
}

impl Serialize for Expression {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

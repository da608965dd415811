use serde::{Deserialize, Serialize};

use crate::nullable::null_as_default;

/// Initial map camera used when zooming to a group or layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Camera {
    #[serde(deserialize_with = "null_as_default")]
    pub longitude: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub latitude: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub zoom: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub bearing: f64,
}

impl Camera {
    pub fn new(longitude: f64, latitude: f64, zoom: f64, bearing: f64) -> Self {
        Self {
            longitude,
            latitude,
            zoom,
            bearing,
        }
    }
}

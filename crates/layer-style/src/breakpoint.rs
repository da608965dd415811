//! Zoom breakpoints and their conversion to interpolation expressions.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StyleError};
use crate::expression::{Expression, Input, Interpolation, Stop};

/// Highest zoom level accepted by the renderer.
pub const MAX_ZOOM: f64 = 22.0;

/// A `(zoom, value)` pair defining one stop of a zoom-dependent property.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub zoom: f64,
    pub value: f64,
}

impl Breakpoint {
    pub const fn new(zoom: f64, value: f64) -> Self {
        Self { zoom, value }
    }
}

/// Breakpoints as entered in the editor, in any order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BreakpointSet(Vec<Breakpoint>);

impl BreakpointSet {
    pub fn new(breakpoints: Vec<Breakpoint>) -> Self {
        Self(breakpoints)
    }

    pub fn from_pairs(pairs: &[(f64, f64)]) -> Self {
        Self(
            pairs
                .iter()
                .map(|&(zoom, value)| Breakpoint::new(zoom, value))
                .collect(),
        )
    }

    pub fn as_slice(&self) -> &[Breakpoint] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check every zoom is within `0..=22` and every value is finite.
    ///
    /// `set` names the list in the error, e.g. `"text size"`.
    pub fn validate(&self, set: &'static str) -> Result<()> {
        for (index, bp) in self.0.iter().enumerate() {
            if !bp.zoom.is_finite() || !(0.0..=MAX_ZOOM).contains(&bp.zoom) {
                return Err(StyleError::ZoomOutOfRange {
                    set,
                    index,
                    zoom: bp.zoom,
                });
            }
            if !bp.value.is_finite() {
                return Err(StyleError::NonFiniteValue { set, index });
            }
        }
        Ok(())
    }

    /// Sorted copy of the breakpoints; see [`sort`].
    pub fn sorted(&self) -> Vec<Breakpoint> {
        sort(&self.0)
    }

    /// Linear zoom interpolation over these breakpoints, or `None` when empty.
    pub fn to_interpolation(&self) -> Option<Expression> {
        to_interpolation(&self.0)
    }
}

impl FromIterator<Breakpoint> for BreakpointSet {
    fn from_iter<I: IntoIterator<Item = Breakpoint>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Stable ascending sort by zoom. Equal zooms keep their submitted order and
/// are not deduplicated.
pub fn sort(breakpoints: &[Breakpoint]) -> Vec<Breakpoint> {
    let mut sorted = breakpoints.to_vec();
    sorted.sort_by(|a, b| a.zoom.total_cmp(&b.zoom));
    sorted
}

/// Build `["interpolate", ["linear"], ["zoom"], z0, v0, ...]` from the sorted
/// breakpoints.
///
/// Returns `None` for an empty set: callers fall back to their scalar default
/// instead of emitting an interpolation with no stops.
pub fn to_interpolation(breakpoints: &[Breakpoint]) -> Option<Expression> {
    if breakpoints.is_empty() {
        return None;
    }
    let stops = sort(breakpoints)
        .into_iter()
        .map(|bp| Stop {
            zoom: bp.zoom,
            value: bp.value,
        })
        .collect();
    Some(Expression::Interpolate {
        interpolation: Interpolation::Linear,
        input: Input::Zoom,
        stops,
    })
}

/// Editor defaults for each breakpoint list.
pub mod defaults {
    use super::BreakpointSet;

    /// Shared zoom list (opacity / icon size).
    pub fn zoom_levels() -> BreakpointSet {
        BreakpointSet::from_pairs(&[(6.0, 0.0), (8.0, 0.3), (12.0, 0.8), (15.0, 1.0)])
    }

    pub fn text_zoom_levels() -> BreakpointSet {
        BreakpointSet::from_pairs(&[(8.0, 7.0), (15.0, 17.0), (20.0, 25.0)])
    }

    pub fn circle_radius_zoom_levels() -> BreakpointSet {
        BreakpointSet::from_pairs(&[(6.0, 0.0), (10.0, 3.0), (14.0, 7.0), (18.0, 12.0)])
    }

    pub fn line_width_zoom_levels() -> BreakpointSet {
        BreakpointSet::from_pairs(&[(6.0, 0.0), (8.0, 0.5), (12.0, 1.5), (15.0, 2.5)])
    }
}

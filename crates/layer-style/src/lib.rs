//! Style compilation for map layers.
//!
//! Turns the flat field set submitted by the layer editor ([`StyleForm`]) into
//! the paint and layout property maps the map renderer consumes. Zoom
//! dependent properties are emitted as linear interpolation expressions built
//! from [`BreakpointSet`]s.
//!
//! # Example
//!
//! ```
//! use layer_model::VisualType;
//! use layer_style::{StyleForm, compile_form};
//!
//! let form = StyleForm { use_fill_zoom_styling: true, ..StyleForm::default() };
//! let compiled = compile_form(VisualType::Fill, &form).unwrap();
//! assert!(compiled.paint["fill-opacity"].is_array());
//! ```

pub mod breakpoint;
pub mod compiler;
pub mod error;
pub mod expression;
pub mod form;
pub mod source;

pub use breakpoint::{Breakpoint, BreakpointSet, MAX_ZOOM, sort, to_interpolation};
pub use compiler::{
    CircleStyle, CompiledStyle, FillStyle, LineStyle, SymbolStyle, VisualStyle, ZoomValue,
    compile, compile_form,
};
pub use error::{Result, StyleError};
pub use expression::{Expression, Input, Interpolation, Stop};
pub use form::StyleForm;
pub use source::{KNOWN_SOURCE_TYPES, resolve_source};

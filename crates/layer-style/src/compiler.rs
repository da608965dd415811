//! Per-visual-type compilation of editor fields into paint/layout maps.
//!
//! Compilation happens in two steps. [`StyleForm::narrow`] picks the fields
//! belonging to the layer's visual type into a [`VisualStyle`], and
//! [`compile`] turns that into property maps with a total match. Both steps
//! are pure: identical input yields byte-identical output.

use serde::Serialize;
use serde_json::{Map, Value};

use layer_model::VisualType;

use crate::breakpoint::BreakpointSet;
use crate::error::Result;
use crate::form::{DEFAULT_ICON_IMAGE, DEFAULT_TEXT_FIELD, DEFAULT_TEXT_FONT, StyleForm};

/// A numeric property that is either fixed or driven by zoom breakpoints.
#[derive(Debug, Clone, PartialEq)]
pub enum ZoomValue {
    Scalar(f64),
    /// Interpolates over `stops`; an empty set emits `fallback`.
    ByZoom { stops: BreakpointSet, fallback: f64 },
}

impl ZoomValue {
    /// `ByZoom` when enabled and the set has stops, otherwise the scalar.
    pub fn choose(enabled: bool, set: &BreakpointSet, scalar: f64) -> Self {
        if enabled && !set.is_empty() {
            Self::ByZoom {
                stops: set.clone(),
                fallback: scalar,
            }
        } else {
            Self::Scalar(scalar)
        }
    }

    fn validate(&self, set: &'static str) -> Result<()> {
        match self {
            Self::Scalar(_) => Ok(()),
            Self::ByZoom { stops, .. } => stops.validate(set),
        }
    }

    fn to_value(&self) -> Value {
        match self {
            Self::Scalar(value) => Value::from(*value),
            Self::ByZoom { stops, fallback } => match stops.to_interpolation() {
                Some(expr) => expr.to_value(),
                None => Value::from(*fallback),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FillStyle {
    pub color: String,
    pub opacity: ZoomValue,
    pub outline_color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SymbolStyle {
    pub text_color: String,
    pub text_halo_color: String,
    pub text_halo_width: f64,
    pub text_field: String,
    pub text_size: ZoomValue,
    pub icon_image: String,
    pub icon_size: ZoomValue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CircleStyle {
    pub color: String,
    pub opacity: ZoomValue,
    pub radius: ZoomValue,
    pub stroke_color: String,
    pub stroke_width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    pub color: String,
    pub width: ZoomValue,
    pub blur: f64,
    pub opacity: f64,
}

/// Style inputs narrowed to a single visual type.
#[derive(Debug, Clone, PartialEq)]
pub enum VisualStyle {
    Fill(FillStyle),
    Symbol(SymbolStyle),
    Circle(CircleStyle),
    Line(LineStyle),
    /// Types without a dedicated compiler keep their raw maps.
    Passthrough {
        visual_type: VisualType,
        paint: Map<String, Value>,
        layout: Map<String, Value>,
    },
}

impl VisualStyle {
    pub fn visual_type(&self) -> VisualType {
        match self {
            Self::Fill(_) => VisualType::Fill,
            Self::Symbol(_) => VisualType::Symbol,
            Self::Circle(_) => VisualType::Circle,
            Self::Line(_) => VisualType::Line,
            Self::Passthrough { visual_type, .. } => *visual_type,
        }
    }

    /// Check the breakpoint lists this style will actually interpolate over.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Fill(fill) => fill.opacity.validate("fill opacity"),
            Self::Symbol(symbol) => {
                symbol.text_size.validate("text size")?;
                symbol.icon_size.validate("icon size")
            }
            Self::Circle(circle) => {
                circle.opacity.validate("circle opacity")?;
                circle.radius.validate("circle radius")
            }
            Self::Line(line) => line.width.validate("line width"),
            Self::Passthrough { .. } => Ok(()),
        }
    }
}

impl StyleForm {
    /// Pick out the fields used by `visual_type`.
    pub fn narrow(&self, visual_type: VisualType) -> VisualStyle {
        match visual_type {
            VisualType::Fill => VisualStyle::Fill(FillStyle {
                color: self.fill_color.clone(),
                opacity: ZoomValue::choose(
                    self.use_fill_zoom_styling,
                    &self.zoom_levels,
                    self.fill_opacity,
                ),
                outline_color: self.fill_outline_color.clone(),
            }),
            VisualType::Symbol => VisualStyle::Symbol(SymbolStyle {
                text_color: self.text_color.clone(),
                text_halo_color: self.text_halo_color.clone(),
                text_halo_width: self.text_halo_width,
                text_field: non_blank(&self.text_field).unwrap_or(DEFAULT_TEXT_FIELD).to_string(),
                text_size: ZoomValue::choose(true, &self.text_zoom_levels, self.text_size_default),
                icon_image: non_blank(&self.custom_icon_image)
                    .or_else(|| non_blank(&self.icon_image))
                    .unwrap_or(DEFAULT_ICON_IMAGE)
                    .to_string(),
                icon_size: ZoomValue::choose(
                    self.use_icon_size_zoom_styling,
                    &self.zoom_levels,
                    self.icon_size_default,
                ),
            }),
            VisualType::Circle => VisualStyle::Circle(CircleStyle {
                color: self.circle_color.clone(),
                opacity: ZoomValue::choose(true, &self.zoom_levels, self.circle_opacity),
                radius: ZoomValue::choose(
                    true,
                    &self.circle_radius_zoom_levels,
                    self.circle_radius,
                ),
                stroke_color: self.circle_stroke_color.clone(),
                stroke_width: self.circle_stroke_width,
            }),
            VisualType::Line => VisualStyle::Line(LineStyle {
                color: self.line_color.clone(),
                width: ZoomValue::choose(true, &self.line_width_zoom_levels, self.line_width),
                blur: self.line_blur,
                opacity: self.line_opacity,
            }),
            other => VisualStyle::Passthrough {
                visual_type: other,
                paint: self.paint.clone(),
                layout: self.layout.clone(),
            },
        }
    }
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

/// Compiled paint and layout maps. Keys serialize in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompiledStyle {
    pub paint: Map<String, Value>,
    pub layout: Map<String, Value>,
}

impl CompiledStyle {
    /// Paint map in the serialized form stored on a layer record.
    pub fn paint_json(&self) -> String {
        Value::Object(self.paint.clone()).to_string()
    }

    /// Layout map in the serialized form stored on a layer record.
    pub fn layout_json(&self) -> String {
        Value::Object(self.layout.clone()).to_string()
    }
}

/// Compile a narrowed style into paint/layout maps.
pub fn compile(style: &VisualStyle) -> CompiledStyle {
    let mut paint = Map::new();
    let mut layout = Map::new();

    match style {
        VisualStyle::Fill(fill) => {
            paint.insert("fill-color".into(), Value::from(fill.color.as_str()));
            paint.insert("fill-opacity".into(), fill.opacity.to_value());
            paint.insert(
                "fill-outline-color".into(),
                Value::from(fill.outline_color.as_str()),
            );
        }
        VisualStyle::Symbol(symbol) => {
            paint.insert("text-color".into(), Value::from(symbol.text_color.as_str()));
            paint.insert(
                "text-halo-color".into(),
                Value::from(symbol.text_halo_color.as_str()),
            );
            paint.insert("text-halo-width".into(), Value::from(symbol.text_halo_width));

            layout.insert("visibility".into(), Value::from("visible"));
            layout.insert(
                "text-font".into(),
                Value::Array(vec![Value::from(DEFAULT_TEXT_FONT)]),
            );
            layout.insert("text-field".into(), Value::from(symbol.text_field.as_str()));
            layout.insert("text-size".into(), symbol.text_size.to_value());
            layout.insert("icon-image".into(), Value::from(symbol.icon_image.as_str()));
            layout.insert("icon-size".into(), symbol.icon_size.to_value());
        }
        VisualStyle::Circle(circle) => {
            paint.insert("circle-color".into(), Value::from(circle.color.as_str()));
            paint.insert("circle-opacity".into(), circle.opacity.to_value());
            paint.insert("circle-radius".into(), circle.radius.to_value());
            paint.insert(
                "circle-stroke-color".into(),
                Value::from(circle.stroke_color.as_str()),
            );
            paint.insert(
                "circle-stroke-width".into(),
                Value::from(circle.stroke_width),
            );
        }
        VisualStyle::Line(line) => {
            paint.insert("line-color".into(), Value::from(line.color.as_str()));
            paint.insert("line-width".into(), line.width.to_value());
            paint.insert("line-blur".into(), Value::from(line.blur));
            paint.insert("line-opacity".into(), Value::from(line.opacity));
        }
        VisualStyle::Passthrough {
            paint: raw_paint,
            layout: raw_layout,
            ..
        } => {
            paint = raw_paint.clone();
            layout = raw_layout.clone();
        }
    }

    tracing::trace!(
        visual_type = %style.visual_type(),
        paint_keys = paint.len(),
        layout_keys = layout.len(),
        "compiled layer style"
    );
    CompiledStyle { paint, layout }
}

/// Validate and compile the fields `visual_type` uses.
pub fn compile_form(visual_type: VisualType, form: &StyleForm) -> Result<CompiledStyle> {
    let style = form.narrow(visual_type);
    style.validate()?;
    Ok(compile(&style))
}

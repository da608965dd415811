//! Source descriptor resolution.

use layer_model::SourceDescriptor;

pub const GEOJSON: &str = "geojson";

/// Source types offered by the layer editor.
pub const KNOWN_SOURCE_TYPES: [&str; 9] = [
    "vector",
    "raster",
    "raster-dem",
    "raster-array",
    GEOJSON,
    "video",
    "image",
    "model",
    "batched-model",
];

/// Build the descriptor the renderer loads features from.
///
/// GeoJSON sources take `source_url` as their inline `data`; every other
/// type (including ones the editor does not list) fetches from `url`.
pub fn resolve_source(source_type: &str, source_url: &str) -> SourceDescriptor {
    let kind = source_type.trim();
    if kind.eq_ignore_ascii_case(GEOJSON) {
        SourceDescriptor::Inline {
            kind: GEOJSON.to_string(),
            data: source_url.to_string(),
        }
    } else {
        SourceDescriptor::Remote {
            kind: kind.to_string(),
            url: source_url.to_string(),
        }
    }
}

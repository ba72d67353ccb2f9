use super::primitives::{RectPrimitive, TextPrimitive};
use crate::geom::{self, Rect};
use crate::options::SvgImportOptions;

/// A large background band grouping components, in raw SVG coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub name: String,
    pub bounds: Rect,
    pub background_color: String,
    /// Indices of member components, in component order. Empty until hierarchy assembly.
    pub members: Vec<usize>,
}

pub const DEFAULT_LAYER_FILL: &str = "#ffffff";

fn is_layer_title(text: &TextPrimitive, bounds: &Rect, band: f64) -> bool {
    let in_band = text.y >= bounds.min_y() && text.y <= bounds.min_y() + band;
    let prominent = text.font_size >= 16.0 || text.is_bold();
    in_band && prominent && text.content.trim().chars().count() > 3
}

/// Finds layer rectangles and names each from the prominent text along its top edge.
///
/// Layers come back sorted top to bottom. Overlapping layers are kept as-is.
pub fn detect_layers(
    rects: &[RectPrimitive],
    texts: &[TextPrimitive],
    options: &SvgImportOptions,
) -> Vec<Layer> {
    let mut candidates: Vec<&RectPrimitive> = rects
        .iter()
        .filter(|r| r.width > options.layer_min_width && r.height > options.layer_min_height)
        .collect();
    candidates.sort_by(|a, b| a.y.total_cmp(&b.y));

    candidates
        .into_iter()
        .enumerate()
        .map(|(idx, r)| {
            let bounds = geom::rect(r.x, r.y, r.width, r.height);
            // Last qualifying text wins.
            let name = texts
                .iter()
                .rfind(|t| is_layer_title(t, &bounds, options.layer_title_band))
                .map(|t| t.content.trim().to_string())
                .unwrap_or_else(|| format!("Layer {}", idx + 1));
            tracing::debug!(layer = %name, y = r.y, "detected layer");
            Layer {
                name,
                bounds,
                background_color: r
                    .fill
                    .clone()
                    .unwrap_or_else(|| DEFAULT_LAYER_FILL.to_string()),
                members: Vec::new(),
            }
        })
        .collect()
}

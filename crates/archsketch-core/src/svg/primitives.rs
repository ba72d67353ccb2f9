//! Structural extraction of `rect`, `text` and `path` elements.
//!
//! No interpretation happens here: attribute values are read, missing ones are defaulted, and the
//! results are returned in document order.

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RectPrimitive {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: f64,
    pub corner_radius: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextPrimitive {
    pub x: f64,
    pub y: f64,
    pub content: String,
    pub font_size: f64,
    pub font_weight: String,
    pub fill: String,
    pub text_anchor: String,
}

impl TextPrimitive {
    pub fn is_bold(&self) -> bool {
        match self.font_weight.trim() {
            "bold" | "bolder" => true,
            w => w.parse::<f64>().is_ok_and(|n| n >= 600.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathPrimitive {
    pub path_data: String,
    pub stroke: Option<String>,
    pub stroke_width: f64,
    pub marker_end_ref: Option<String>,
    pub dash_pattern: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Primitives {
    pub rects: Vec<RectPrimitive>,
    pub texts: Vec<TextPrimitive>,
    pub paths: Vec<PathPrimitive>,
}

pub const DEFAULT_FONT_SIZE: f64 = 12.0;

fn re_leading_number() -> &'static Regex {
    static ONCE: OnceLock<Regex> = OnceLock::new();
    ONCE.get_or_init(|| {
        Regex::new(r"^\s*[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("valid regex")
    })
}

/// Reads the numeric prefix of an attribute value the way browsers do for presentation
/// attributes (`"12px"` is 12, `"abc"` is nothing).
pub fn parse_leading_number(raw: &str) -> Option<f64> {
    let m = re_leading_number().find(raw)?;
    m.as_str().trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn style_declaration<'a>(style: &'a str, name: &str) -> Option<&'a str> {
    style.split(';').find_map(|decl| {
        let (key, value) = decl.split_once(':')?;
        (key.trim() == name).then(|| value.trim())
    })
}

/// Attribute lookup that falls back to the inline `style` declarations.
fn attr<'a>(node: roxmltree::Node<'a, '_>, name: &str) -> Option<&'a str> {
    if let Some(v) = node.attribute(name).map(str::trim).filter(|v| !v.is_empty()) {
        return Some(v);
    }
    node.attribute("style")
        .and_then(|style| style_declaration(style, name))
        .filter(|v| !v.is_empty())
}

fn number_attr(node: roxmltree::Node<'_, '_>, name: &str, default: f64) -> f64 {
    attr(node, name)
        .and_then(parse_leading_number)
        .unwrap_or(default)
}

fn string_attr(node: roxmltree::Node<'_, '_>, name: &str) -> Option<String> {
    attr(node, name).map(str::to_string)
}

fn text_content(node: roxmltree::Node<'_, '_>) -> String {
    let raw: String = node
        .descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn extract_rect(node: roxmltree::Node<'_, '_>) -> RectPrimitive {
    RectPrimitive {
        x: number_attr(node, "x", 0.0),
        y: number_attr(node, "y", 0.0),
        width: number_attr(node, "width", 0.0),
        height: number_attr(node, "height", 0.0),
        fill: string_attr(node, "fill"),
        stroke: string_attr(node, "stroke"),
        stroke_width: number_attr(node, "stroke-width", 1.0),
        corner_radius: attr(node, "rx").and_then(parse_leading_number),
    }
}

fn extract_text(node: roxmltree::Node<'_, '_>) -> TextPrimitive {
    TextPrimitive {
        x: number_attr(node, "x", 0.0),
        y: number_attr(node, "y", 0.0),
        content: text_content(node),
        // Font sizes are whole units for matching purposes.
        font_size: number_attr(node, "font-size", DEFAULT_FONT_SIZE).trunc(),
        font_weight: string_attr(node, "font-weight").unwrap_or_else(|| "normal".to_string()),
        fill: string_attr(node, "fill").unwrap_or_else(|| "#000000".to_string()),
        text_anchor: string_attr(node, "text-anchor").unwrap_or_else(|| "start".to_string()),
    }
}

fn extract_path(node: roxmltree::Node<'_, '_>) -> Option<PathPrimitive> {
    let path_data = string_attr(node, "d")?;
    Some(PathPrimitive {
        path_data,
        stroke: string_attr(node, "stroke"),
        stroke_width: number_attr(node, "stroke-width", 1.0),
        marker_end_ref: string_attr(node, "marker-end"),
        dash_pattern: string_attr(node, "stroke-dasharray"),
    })
}

/// Collects every `rect`, `text` and `path` element of `doc` in document order.
pub fn extract_primitives(doc: &roxmltree::Document<'_>) -> Primitives {
    let mut out = Primitives::default();
    for node in doc.descendants().filter(|n| n.is_element()) {
        match node.tag_name().name() {
            "rect" => out.rects.push(extract_rect(node)),
            "text" => out.texts.push(extract_text(node)),
            "path" => {
                if let Some(path) = extract_path(node) {
                    out.paths.push(path);
                }
            }
            _ => {}
        }
    }
    tracing::trace!(
        rects = out.rects.len(),
        texts = out.texts.len(),
        paths = out.paths.len(),
        "extracted svg primitives"
    );
    out
}

/// Parses SVG markup. Exported drawings often carry a `<!DOCTYPE svg ...>`, so DTDs are allowed.
pub fn parse_document(svg: &str) -> crate::Result<roxmltree::Document<'_>> {
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..Default::default()
    };
    Ok(roxmltree::Document::parse_with_options(svg, options)?)
}

/// Parses `svg` and extracts its primitives.
pub fn extract_primitives_from_str(svg: &str) -> crate::Result<Primitives> {
    let doc = parse_document(svg)?;
    Ok(extract_primitives(&doc))
}

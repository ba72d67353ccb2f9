//! Component synthesis from component-sized rectangles and the text they enclose.

use super::primitives::{RectPrimitive, TextPrimitive};
use crate::color::contrast_text_color;
use crate::geom::{self, Rect};
use crate::model::{
    Component, ComponentType, ContentSection, Position, RichContent, Size, Styling,
};
use crate::options::SvgImportOptions;
use regex::Regex;
use std::sync::OnceLock;

pub const DEFAULT_COMPONENT_FILL: &str = "#4CAF50";
pub const DEFAULT_COMPONENT_STROKE: &str = "#333333";
const DEFAULT_CORNER_RADIUS: f64 = 4.0;
const COMPONENT_FONT_SIZE: f64 = 12.0;

/// Keyword table for type inference; earlier rows take priority.
const TYPE_KEYWORDS: &[(ComponentType, &[&str])] = &[
    (
        ComponentType::Database,
        &["database", "storage", "cache", "vector", "postgresql", "redis", "s3"],
    ),
    (
        ComponentType::Api,
        &["api", "gateway", "endpoint", "rest", "graphql"],
    ),
    (
        ComponentType::Service,
        &["service", "microservice", "handler", "controller", "manager"],
    ),
    (
        ComponentType::Agent,
        &["agent", "ai", "ml", "intelligence", "learning", "analysis"],
    ),
    (ComponentType::Queue, &["queue", "message", "broker", "event"]),
    (ComponentType::User, &["user", "editor", "input", "interface"]),
    (
        ComponentType::External,
        &["external", "third-party", "integration"],
    ),
    (
        ComponentType::Gateway,
        &["gateway", "router", "orchestration", "dispatcher"],
    ),
];

/// Infers a component type from its visible text by substring match.
pub fn infer_component_type(text: &str) -> ComponentType {
    let text = text.to_lowercase();
    TYPE_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
        .map(|(kind, _)| *kind)
        .unwrap_or(ComponentType::Generic)
}

fn re_list_marker() -> &'static Regex {
    static ONCE: OnceLock<Regex> = OnceLock::new();
    ONCE.get_or_init(|| {
        Regex::new(r"^(?:(?:[•◦▪‣●○■]\s*|[-*–]\s+)(?:\d+\.\s*)?|\d+\.\s+)").expect("valid regex")
    })
}

/// Removes a leading bullet glyph or `1.` style numbering.
pub fn strip_list_marker(line: &str) -> &str {
    let line = line.trim();
    match re_list_marker().find(line) {
        Some(m) => line[m.end()..].trim_start(),
        None => line,
    }
}

/// Orders texts top to bottom; texts sharing a line (within `tolerance` of the line's first
/// text) are ordered by descending font size.
fn order_texts<'a>(mut texts: Vec<&'a TextPrimitive>, tolerance: f64) -> Vec<&'a TextPrimitive> {
    texts.sort_by(|a, b| a.y.total_cmp(&b.y));

    let mut out = Vec::with_capacity(texts.len());
    let mut start = 0;
    while start < texts.len() {
        let line_y = texts[start].y;
        let end = texts[start + 1..]
            .iter()
            .position(|t| t.y - line_y >= tolerance)
            .map_or(texts.len(), |offset| start + 1 + offset);
        let mut line = texts[start..end].to_vec();
        line.sort_by(|a, b| b.font_size.total_cmp(&a.font_size));
        out.extend(line);
        start = end;
    }
    out
}

fn scaled_box(bounds: &Rect, options: &SvgImportOptions) -> (Position, Size) {
    let f = options.scale;
    (
        Position::new(bounds.origin.x * f, bounds.origin.y * f),
        Size::new(
            (bounds.size.width * f).max(options.min_component_width),
            (bounds.size.height * f).max(options.min_component_height),
        ),
    )
}

fn synthesize_one(
    rect: &RectPrimitive,
    texts: &[TextPrimitive],
    options: &SvgImportOptions,
) -> Option<Component> {
    let bounds = geom::rect(rect.x, rect.y, rect.width, rect.height);
    let inside: Vec<&TextPrimitive> = texts
        .iter()
        .filter(|t| geom::contains_inclusive(&bounds, geom::point(t.x, t.y)))
        .collect();
    if inside.is_empty() {
        return None;
    }

    let ordered = order_texts(inside, options.same_line_tolerance);
    let (first, rest) = ordered.split_first()?;

    let all_text = ordered
        .iter()
        .map(|t| t.content.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let kind = infer_component_type(&all_text);

    let title = match first.content.trim() {
        "" => "Component".to_string(),
        t => t.to_string(),
    };
    let bullets: Vec<String> = rest
        .iter()
        .map(|t| strip_list_marker(&t.content))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    let fill = rect
        .fill
        .clone()
        .unwrap_or_else(|| DEFAULT_COMPONENT_FILL.to_string());
    let stroke = rect
        .stroke
        .clone()
        .unwrap_or_else(|| DEFAULT_COMPONENT_STROKE.to_string());

    let (position, size) = scaled_box(&bounds, options);
    let mut component = Component::new(kind, title.clone(), position, size);
    if !bullets.is_empty() {
        component.description = Some(bullets.join("; "));
        component.content = Some(RichContent {
            header: Some(title),
            sections: vec![ContentSection {
                title: None,
                items: bullets.clone(),
            }],
            ..Default::default()
        });
        component.bullet_points = Some(bullets);
    }
    component.text_color = Some(contrast_text_color(&fill).to_string());
    component.styling = Some(Styling {
        background_color: Some(fill.clone()),
        border_color: Some(stroke),
        border_width: Some(rect.stroke_width),
        border_radius: Some(rect.corner_radius.unwrap_or(DEFAULT_CORNER_RADIUS)),
        font_size: Some(COMPONENT_FONT_SIZE),
    });
    component.color = Some(fill);
    Some(component)
}

/// Builds one component per component-sized rectangle that encloses at least one text.
///
/// Positions are scaled but still absolute; nesting happens later.
pub fn synthesize_components(
    rects: &[RectPrimitive],
    texts: &[TextPrimitive],
    options: &SvgImportOptions,
) -> Vec<Component> {
    let out: Vec<Component> = rects
        .iter()
        .filter(|r| {
            options.component_width.contains(r.width) && options.component_height.contains(r.height)
        })
        .filter_map(|r| {
            let component = synthesize_one(r, texts, options);
            if component.is_none() {
                tracing::trace!(x = r.x, y = r.y, "skipping rect without text");
            }
            component
        })
        .collect();
    tracing::debug!(count = out.len(), "synthesized components");
    out
}

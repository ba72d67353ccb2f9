//! Connection inference from arrow-marked paths.

use super::primitives::PathPrimitive;
use crate::geom::{self, Point};
use crate::model::{Component, Connection, ConnectionType};
use crate::options::{EndpointPolicy, SvgImportOptions};
use regex::Regex;
use std::sync::OnceLock;

fn re_first_segment() -> &'static Regex {
    static ONCE: OnceLock<Regex> = OnceLock::new();
    ONCE.get_or_init(|| {
        const NUM: &str = r"([+-]?(?:\d+\.?\d*|\.\d+))";
        Regex::new(&format!(
            r"(?s)M\s*{NUM}[\s,]*{NUM}.*?L\s*{NUM}[\s,]*{NUM}"
        ))
        .expect("valid regex")
    })
}

/// Start and end of the first straight segment (`M x y ... L x y`) of a path.
///
/// Only the first `L` after the first `M` is read; curves and later segments are ignored.
pub fn first_segment(path_data: &str) -> Option<(Point, Point)> {
    let caps = re_first_segment().captures(path_data)?;
    let n = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<f64>().ok());
    Some((geom::point(n(1)?, n(2)?), geom::point(n(3)?, n(4)?)))
}

/// Dash arrays containing `5,5` mean a dependency, other dashes a data flow, solid lines a
/// generic link.
///
/// The `5,5` test is a plain substring match, so `15,5` and `5,50` count while `5 5` does not.
pub fn classify_dash_pattern(pattern: Option<&str>) -> ConnectionType {
    let Some(pattern) = pattern
        .map(str::trim)
        .filter(|p| !p.is_empty() && !p.eq_ignore_ascii_case("none"))
    else {
        return ConnectionType::Generic;
    };
    if pattern.contains("5,5") {
        ConnectionType::Dependency
    } else {
        ConnectionType::DataFlow
    }
}

fn resolve_endpoint(
    p: Point,
    components: &[Component],
    options: &SvgImportOptions,
) -> Option<usize> {
    let tol = options.endpoint_tolerance;
    let mut hits = components.iter().enumerate().filter(|(_, c)| {
        let area = geom::rect(c.position.x, c.position.y, c.size.width, c.size.height)
            .inflate(tol, tol);
        geom::contains_inclusive(&area, p)
    });

    match options.endpoint_policy {
        EndpointPolicy::FirstMatch => hits.next().map(|(idx, _)| idx),
        EndpointPolicy::NearestCenter => hits
            .map(|(idx, c)| {
                let center = geom::point(
                    c.position.x + c.size.width / 2.0,
                    c.position.y + c.size.height / 2.0,
                );
                (idx, (center - p).square_length())
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(idx, _)| idx),
    }
}

/// Turns arrow-marked paths into connections between already synthesized components.
///
/// Paths whose endpoints do not both land on a component, or land on the same one, are dropped.
pub fn infer_connections(
    paths: &[PathPrimitive],
    components: &[Component],
    options: &SvgImportOptions,
) -> Vec<Connection> {
    let f = options.scale;
    let mut out = Vec::new();

    for path in paths {
        let is_arrow = path
            .marker_end_ref
            .as_deref()
            .is_some_and(|m| m.contains(options.arrow_marker_hint.as_str()));
        if !is_arrow {
            continue;
        }
        let Some((start, end)) = first_segment(&path.path_data) else {
            tracing::trace!(d = %path.path_data, "arrow path without a straight first segment");
            continue;
        };
        let start = geom::point(start.x * f, start.y * f);
        let end = geom::point(end.x * f, end.y * f);

        let (Some(src), Some(dst)) = (
            resolve_endpoint(start, components, options),
            resolve_endpoint(end, components, options),
        ) else {
            tracing::trace!(d = %path.path_data, "arrow path endpoint not near any component");
            continue;
        };
        if src == dst {
            continue;
        }

        let source = &components[src];
        let target = &components[dst];
        out.push(Connection::new(
            source.id.clone(),
            target.id.clone(),
            Some(format!("{} → {}", source.title, target.title)),
            Some(classify_dash_pattern(path.dash_pattern.as_deref())),
        ));
    }

    tracing::debug!(count = out.len(), "inferred connections");
    out
}

/// Returns `components` with each connection's endpoints recorded as partners of each other.
pub fn with_partners(mut components: Vec<Component>, connections: &[Connection]) -> Vec<Component> {
    for conn in connections {
        for comp in &mut components {
            if comp.id == conn.source_id {
                comp.add_partner(&conn.target_id);
            } else if comp.id == conn.target_id {
                comp.add_partner(&conn.source_id);
            }
        }
    }
    components
}

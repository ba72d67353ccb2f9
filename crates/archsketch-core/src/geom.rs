#![forbid(unsafe_code)]

pub type Unit = euclid::UnknownUnit;

pub type Point = euclid::Point2D<f64, Unit>;
pub type Size = euclid::Size2D<f64, Unit>;
pub type Rect = euclid::Rect<f64, Unit>;

pub fn point(x: f64, y: f64) -> Point {
    euclid::point2(x, y)
}

pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Rect {
    euclid::rect(x, y, width, height)
}

/// Containment with both edges included.
///
/// `euclid::Rect::contains` excludes the max edge; the import heuristics treat a point sitting
/// exactly on the right/bottom border as inside.
pub fn contains_inclusive(r: &Rect, p: Point) -> bool {
    p.x >= r.min_x() && p.x <= r.max_x() && p.y >= r.min_y() && p.y <= r.max_y()
}

pub fn scale_rect(r: &Rect, factor: f64) -> Rect {
    rect(
        r.origin.x * factor,
        r.origin.y * factor,
        r.size.width * factor,
        r.size.height * factor,
    )
}

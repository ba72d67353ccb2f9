use serde::{Deserialize, Serialize};

/// Closed interval used for the component-size band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub min: f64,
    pub max: f64,
}

impl Band {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, v: f64) -> bool {
        v >= self.min && v <= self.max
    }
}

/// How a component is assigned when its position falls inside several layers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayerPolicy {
    /// First layer in top-to-bottom order.
    #[default]
    FirstMatch,
    /// Innermost layer, i.e. the one with the smallest area.
    SmallestArea,
}

/// How a path endpoint is resolved when it lands near several components.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EndpointPolicy {
    /// First component in synthesis order.
    #[default]
    FirstMatch,
    /// Component whose center is closest to the endpoint.
    NearestCenter,
}

impl std::str::FromStr for LayerPolicy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" | "first-match" | "firstmatch" => Ok(Self::FirstMatch),
            "smallest" | "smallest-area" | "smallestarea" => Ok(Self::SmallestArea),
            _ => Err(()),
        }
    }
}

impl std::str::FromStr for EndpointPolicy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" | "first-match" | "firstmatch" => Ok(Self::FirstMatch),
            "nearest" | "nearest-center" | "nearestcenter" => Ok(Self::NearestCenter),
            _ => Err(()),
        }
    }
}

/// Tuning knobs for SVG reconstruction.
///
/// Every field has a default, so a config file only needs to name what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SvgImportOptions {
    /// Multiplier from raw SVG coordinates to diagram coordinates.
    pub scale: f64,
    /// Post-scale minimum width of a synthesized component.
    pub min_component_width: f64,
    /// Post-scale minimum height of a synthesized component.
    pub min_component_height: f64,
    /// Raw width band for component-sized rectangles.
    pub component_width: Band,
    /// Raw height band for component-sized rectangles.
    pub component_height: Band,
    /// Layer rectangles must be strictly wider than this.
    pub layer_min_width: f64,
    /// Layer rectangles must be strictly taller than this.
    pub layer_min_height: f64,
    /// Height of the band at the top of a layer searched for its title.
    pub layer_title_band: f64,
    /// Texts closer than this vertically are treated as one line.
    pub same_line_tolerance: f64,
    /// Margin around a component inside which a path endpoint attaches to it.
    pub endpoint_tolerance: f64,
    /// Substring a path's `marker-end` must contain to count as a connector.
    pub arrow_marker_hint: String,
    pub layer_policy: LayerPolicy,
    pub endpoint_policy: EndpointPolicy,
}

impl Default for SvgImportOptions {
    fn default() -> Self {
        Self::standard()
    }
}

impl SvgImportOptions {
    /// Half-scale import used for arbitrary documents.
    pub fn standard() -> Self {
        Self {
            scale: 0.5,
            min_component_width: 140.0,
            min_component_height: 80.0,
            component_width: Band::new(50.0, 400.0),
            component_height: Band::new(30.0, 200.0),
            layer_min_width: 500.0,
            layer_min_height: 80.0,
            layer_title_band: 50.0,
            same_line_tolerance: 5.0,
            endpoint_tolerance: 50.0,
            arrow_marker_hint: "arrowhead".to_string(),
            layer_policy: LayerPolicy::FirstMatch,
            endpoint_policy: EndpointPolicy::FirstMatch,
        }
    }

    /// Tighter import for large poster-style architecture sheets.
    ///
    /// Only the geometry changes (scale, size floors, size bands). Titles, connections and
    /// layers are still read the same way as under [`SvgImportOptions::standard`].
    pub fn compact() -> Self {
        Self {
            scale: 0.4,
            min_component_width: 150.0,
            min_component_height: 80.0,
            component_width: Band::new(100.0, 400.0),
            component_height: Band::new(40.0, 200.0),
            ..Self::standard()
        }
    }

    pub fn with_layer_policy(mut self, policy: LayerPolicy) -> Self {
        self.layer_policy = policy;
        self
    }

    pub fn with_endpoint_policy(mut self, policy: EndpointPolicy) -> Self {
        self.endpoint_policy = policy;
        self
    }
}

//! Heuristic reconstruction of an architecture diagram from an arbitrary SVG document.
//!
//! The pipeline runs in fixed order, each stage a function of the previous stages' output:
//! - [`primitives`]: raw `rect`/`text`/`path` records
//! - [`layers`]: large background bands and their titles
//! - [`components`]: component-sized boxes with enclosed text
//! - [`connections`]: arrow-marked paths resolved to component pairs
//! - [`hierarchy`]: layer membership and container nesting

pub mod components;
pub mod connections;
pub mod hierarchy;
pub mod layers;
pub mod primitives;

use crate::Result;
use crate::model::{DEFAULT_BACKGROUND, Diagram, Theme};
use crate::options::SvgImportOptions;
use primitives::TextPrimitive;

pub const IMPORTED_DESCRIPTION: &str = "Imported from SVG";
pub const DEFAULT_IMPORTED_TITLE: &str = "Imported Diagram";

/// First prominent text in the document (font size >= 20 or bold).
pub fn document_title(texts: &[TextPrimitive]) -> Option<&str> {
    texts
        .iter()
        .find(|t| t.font_size >= 20.0 || t.is_bold())
        .map(|t| t.content.as_str())
        .filter(|t| !t.is_empty())
}

#[derive(Debug, Clone, Default)]
pub struct SvgImporter {
    options: SvgImportOptions,
}

impl SvgImporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(mut self, options: SvgImportOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &SvgImportOptions {
        &self.options
    }

    /// Parses `svg` and reconstructs a diagram from it.
    ///
    /// Malformed markup is an error; well-formed markup without usable shapes yields an empty
    /// diagram.
    pub fn import_str(&self, svg: &str) -> Result<Diagram> {
        let doc = primitives::parse_document(svg)?;
        Ok(self.import_document(&doc))
    }

    pub fn import_document(&self, doc: &roxmltree::Document<'_>) -> Diagram {
        let opts = &self.options;
        let prims = primitives::extract_primitives(doc);

        let mut layers = layers::detect_layers(&prims.rects, &prims.texts, opts);
        let components = components::synthesize_components(&prims.rects, &prims.texts, opts);
        let connections = connections::infer_connections(&prims.paths, &components, opts);
        let components = connections::with_partners(components, &connections);
        let components = hierarchy::assemble_hierarchy(components, &mut layers, opts);

        let title = document_title(&prims.texts).unwrap_or(DEFAULT_IMPORTED_TITLE);
        tracing::debug!(
            title,
            layers = layers.len(),
            components = components.len(),
            connections = connections.len(),
            "reconstructed diagram from svg"
        );

        let mut diagram = Diagram::new(title);
        diagram.description = Some(IMPORTED_DESCRIPTION.to_string());
        diagram.components = components;
        diagram.connections = connections;
        diagram.background_color = Some(DEFAULT_BACKGROUND.to_string());
        diagram.theme = Some(Theme::Light);
        diagram
    }
}

/// Imports `svg` with the standard options.
pub fn import_svg(svg: &str) -> Result<Diagram> {
    SvgImporter::new().import_str(svg)
}

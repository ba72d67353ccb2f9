#![forbid(unsafe_code)]

//! Architecture diagram model + heuristic SVG reconstruction (headless).
//!
//! The crate owns everything an interactive editor needs below the UI:
//! - the diagram model and its JSON form ([`model`])
//! - SVG-to-diagram reconstruction ([`svg`]), tuned through [`SvgImportOptions`]
//! - editing operations that keep the model consistent ([`edit`])
//!
//! Rendering, interaction and persistence beyond whole-diagram JSON are left to the caller.

pub mod color;
pub mod edit;
pub mod error;
pub mod geom;
pub mod library;
pub mod model;
pub mod options;
pub mod svg;

pub use edit::{ComponentPatch, ConnectionPatch, FocusState};
pub use error::{Error, Result};
pub use library::{ComponentLibrary, ComponentTemplate};
pub use model::{
    Component, ComponentType, Connection, ConnectionType, Diagram, Position, Size, Theme,
};
pub use options::{Band, EndpointPolicy, LayerPolicy, SvgImportOptions};
pub use svg::{SvgImporter, import_svg};

#[cfg(test)]
mod tests;

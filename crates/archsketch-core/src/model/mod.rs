//! Diagram data model and its JSON form.

mod diagram;
mod types;

pub use diagram::{Component, Connection, DEFAULT_BACKGROUND, Diagram, new_id};
pub use types::{
    ComponentType, ConnectionType, ContentSection, Position, RichContent, Size, Styling, Theme,
};

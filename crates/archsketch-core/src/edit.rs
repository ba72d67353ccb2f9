//! Field-level editing operations on a [`Diagram`].
//!
//! Every mutation keeps the structural invariants intact (no dangling connection endpoints,
//! partner lists mirror connections, parent/child links agree) and bumps `updatedAt`.

use crate::color::contrast_text_color;
use crate::library::ComponentLibrary;
use crate::model::{
    Component, ComponentType, Connection, ConnectionType, Diagram, Position, RichContent, Size,
    Styling, new_id,
};
use crate::{Error, Result};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const NEW_COMPONENT_SIZE: Size = Size {
    width: 140.0,
    height: 80.0,
};

/// Partial update for a component; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComponentPatch {
    #[serde(rename = "type")]
    pub kind: Option<ComponentType>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub subtitle: Option<String>,
    pub position: Option<Position>,
    pub size: Option<Size>,
    pub bullet_points: Option<Vec<String>>,
    pub content: Option<RichContent>,
    pub metadata: Option<Map<String, Value>>,
    pub color: Option<String>,
    pub text_color: Option<String>,
    pub styling: Option<Styling>,
}

/// Partial update for a connection; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConnectionPatch {
    pub label: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<ConnectionType>,
    pub metadata: Option<Map<String, Value>>,
}

/// What the canvas highlights when a component is focused.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusState {
    pub focused_component_id: Option<String>,
    pub highlighted_connections: Vec<String>,
    pub dimmed_components: Vec<String>,
}

fn unknown_component(id: &str) -> Error {
    Error::UnknownComponent { id: id.to_string() }
}

impl Diagram {
    /// Adds a component of `kind` at `position`, styled from `library`. Returns its id.
    pub fn add_component(
        &mut self,
        library: &ComponentLibrary,
        kind: ComponentType,
        position: Position,
    ) -> String {
        let mut component =
            Component::new(kind, format!("New {kind}"), position, NEW_COMPONENT_SIZE);
        if let Some(template) = library.template(kind) {
            component.text_color = Some(contrast_text_color(&template.color).to_string());
            component.color = Some(template.color.clone());
        }
        let id = component.id.clone();
        self.components.push(component);
        self.touch();
        id
    }

    pub fn update_component(&mut self, id: &str, patch: ComponentPatch) -> Result<()> {
        let component = self.component_mut(id).ok_or_else(|| unknown_component(id))?;
        let ComponentPatch {
            kind,
            title,
            description,
            subtitle,
            position,
            size,
            bullet_points,
            content,
            metadata,
            color,
            text_color,
            styling,
        } = patch;
        if let Some(v) = kind {
            component.kind = v;
        }
        if let Some(v) = title {
            component.title = v;
        }
        if description.is_some() {
            component.description = description;
        }
        if subtitle.is_some() {
            component.subtitle = subtitle;
        }
        if let Some(v) = position {
            component.position = v;
        }
        if let Some(v) = size {
            component.size = v;
        }
        if bullet_points.is_some() {
            component.bullet_points = bullet_points;
        }
        if content.is_some() {
            component.content = content;
        }
        if let Some(v) = metadata {
            component.metadata_mut().extend(v);
        }
        if color.is_some() {
            component.color = color;
        }
        if text_color.is_some() {
            component.text_color = text_color;
        }
        if styling.is_some() {
            component.styling = styling;
        }
        self.touch();
        Ok(())
    }

    /// Removes a component together with every connection touching it.
    ///
    /// Its children move up to its own parent (or become roots) with their coordinates rebased
    /// so they stay where they were drawn.
    pub fn remove_component(&mut self, id: &str) -> Result<Component> {
        let idx = self
            .components
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| unknown_component(id))?;
        let removed = self.components.remove(idx);

        self.connections
            .retain(|conn| conn.source_id != id && conn.target_id != id);

        for comp in &mut self.components {
            comp.connections.retain(|p| p != id);
            comp.children.retain(|c| c != id);
            if comp.parent_id.as_deref() == Some(id) {
                comp.parent_id = removed.parent_id.clone();
                comp.position.x += removed.position.x;
                comp.position.y += removed.position.y;
            }
        }
        if let Some(grandparent_id) = removed.parent_id.as_deref() {
            if let Some(grandparent) = self.component_mut(grandparent_id) {
                grandparent.children.extend(removed.children.iter().cloned());
            }
        }

        self.touch();
        Ok(removed)
    }

    /// Connects two existing, distinct components. Returns the new connection's id.
    pub fn connect(
        &mut self,
        source_id: &str,
        target_id: &str,
        label: Option<String>,
        kind: Option<ConnectionType>,
    ) -> Result<String> {
        let invalid = |reason| Error::InvalidConnection {
            source_id: source_id.to_string(),
            target_id: target_id.to_string(),
            reason,
        };
        if source_id == target_id {
            return Err(invalid("source and target are the same component"));
        }
        if self.component(source_id).is_none() {
            return Err(invalid("source component does not exist"));
        }
        if self.component(target_id).is_none() {
            return Err(invalid("target component does not exist"));
        }

        let connection = Connection::new(source_id, target_id, label, kind);
        let id = connection.id.clone();
        self.connections.push(connection);
        if let Some(source) = self.component_mut(source_id) {
            source.add_partner(target_id);
        }
        if let Some(target) = self.component_mut(target_id) {
            target.add_partner(source_id);
        }
        self.touch();
        Ok(id)
    }

    pub fn update_connection(&mut self, id: &str, patch: ConnectionPatch) -> Result<()> {
        let connection = self
            .connections
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| Error::UnknownConnection { id: id.to_string() })?;
        if patch.label.is_some() {
            connection.label = patch.label;
        }
        if patch.kind.is_some() {
            connection.kind = patch.kind;
        }
        if let Some(v) = patch.metadata {
            connection.metadata.get_or_insert_with(Map::new).extend(v);
        }
        self.touch();
        Ok(())
    }

    /// Removes a connection. Partner ids are dropped once no connection links the pair anymore.
    pub fn remove_connection(&mut self, id: &str) -> Result<Connection> {
        let idx = self
            .connections
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| Error::UnknownConnection { id: id.to_string() })?;
        let removed = self.connections.remove(idx);

        let (a, b) = (removed.source_id.as_str(), removed.target_id.as_str());
        let still_linked = self.connections.iter().any(|c| {
            (c.source_id == a && c.target_id == b) || (c.source_id == b && c.target_id == a)
        });
        if !still_linked {
            for comp in &mut self.components {
                if comp.id == a {
                    comp.connections.retain(|p| p != b);
                } else if comp.id == b {
                    comp.connections.retain(|p| p != a);
                }
            }
        }
        self.touch();
        Ok(removed)
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.touch();
    }

    /// Highlights the connections touching `component_id` and dims every component that is
    /// neither focused nor directly connected. `None` clears the focus.
    pub fn focus(&self, component_id: Option<&str>) -> FocusState {
        let Some(focused) = component_id else {
            return FocusState::default();
        };

        let related: Vec<&Connection> = self
            .connections
            .iter()
            .filter(|c| c.source_id == focused || c.target_id == focused)
            .collect();
        let neighbours: FxHashSet<&str> = related
            .iter()
            .flat_map(|c| [c.source_id.as_str(), c.target_id.as_str()])
            .collect();

        FocusState {
            focused_component_id: Some(focused.to_string()),
            highlighted_connections: related.iter().map(|c| c.id.clone()).collect(),
            dimmed_components: self
                .components
                .iter()
                .filter(|c| c.id != focused && !neighbours.contains(c.id.as_str()))
                .map(|c| c.id.clone())
                .collect(),
        }
    }

    /// Diagram-absolute position of a component, following its parent chain.
    pub fn absolute_position(&self, id: &str) -> Option<Position> {
        let mut comp = self.component(id)?;
        let mut pos = comp.position;
        let mut hops = 0usize;
        while let Some(parent_id) = comp.parent_id.as_deref() {
            comp = self.component(parent_id)?;
            pos.x += comp.position.x;
            pos.y += comp.position.y;
            hops += 1;
            if hops > self.components.len() {
                // Cyclic parent chain.
                return None;
            }
        }
        Some(pos)
    }

    /// Additive union: appends `other`'s components and connections.
    ///
    /// Ids that already exist here are regenerated and every reference to them rewritten, so
    /// merging a diagram into itself duplicates it instead of aliasing it.
    pub fn merge(&mut self, other: Diagram) {
        let mut taken: FxHashSet<String> = self
            .components
            .iter()
            .map(|c| c.id.clone())
            .chain(self.connections.iter().map(|c| c.id.clone()))
            .collect();
        let mut renamed: FxHashMap<String, String> = FxHashMap::default();
        for id in other.components.iter().map(|c| &c.id) {
            if taken.contains(id) {
                renamed.insert(id.clone(), new_id());
            } else {
                taken.insert(id.clone());
            }
        }
        let rename = |id: &String| renamed.get(id).cloned().unwrap_or_else(|| id.clone());

        for mut comp in other.components {
            comp.id = rename(&comp.id);
            comp.parent_id = comp.parent_id.as_ref().map(rename);
            comp.children = comp.children.iter().map(rename).collect();
            comp.connections = comp.connections.iter().map(rename).collect();
            self.components.push(comp);
        }
        for mut conn in other.connections {
            if taken.contains(&conn.id) {
                conn.id = new_id();
            }
            conn.source_id = rename(&conn.source_id);
            conn.target_id = rename(&conn.target_id);
            self.connections.push(conn);
        }
        tracing::debug!(renamed = renamed.len(), "merged diagram");
        self.touch();
    }
}

use super::types::{ComponentType, ConnectionType, Position, RichContent, Size, Styling, Theme};
use crate::Result;
use chrono::{DateTime, Utc};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_BACKGROUND: &str = "#f8f9fa";

/// Generates an opaque identifier for components, connections and diagrams.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ComponentType,
    pub position: Position,
    pub size: Size,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bullet_points: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<RichContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styling: Option<Styling>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<String>,
    /// Ids of components this one is connected to (either direction).
    #[serde(default)]
    pub connections: Vec<String>,
}

impl Component {
    pub fn new(kind: ComponentType, title: impl Into<String>, position: Position, size: Size) -> Self {
        Self {
            id: new_id(),
            kind,
            position,
            size,
            title: title.into(),
            description: None,
            subtitle: None,
            bullet_points: None,
            content: None,
            metadata: None,
            color: None,
            text_color: None,
            styling: None,
            parent_id: None,
            children: Vec::new(),
            connections: Vec::new(),
        }
    }

    /// Records `partner_id` as a connection partner, ignoring duplicates.
    pub fn add_partner(&mut self, partner_id: &str) {
        if !self.connections.iter().any(|p| p == partner_id) {
            self.connections.push(partner_id.to_string());
        }
    }

    pub fn metadata_mut(&mut self) -> &mut Map<String, Value> {
        self.metadata.get_or_insert_with(Map::new)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: String,
    pub source_id: String,
    pub target_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(rename = "type")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ConnectionType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl Connection {
    pub fn new(
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        label: Option<String>,
        kind: Option<ConnectionType>,
    ) -> Self {
        Self {
            id: new_id(),
            source_id: source_id.into(),
            target_id: target_id.into(),
            label,
            kind,
            metadata: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagram {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub components: Vec<Component>,
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
}

impl Diagram {
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            title: title.into(),
            description: None,
            components: Vec::new(),
            connections: Vec::new(),
            created_at: now,
            updated_at: now,
            background_color: Some(DEFAULT_BACKGROUND.to_string()),
            theme: Some(Theme::Light),
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn component(&self, id: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }

    pub fn component_mut(&mut self, id: &str) -> Option<&mut Component> {
        self.components.iter_mut().find(|c| c.id == id)
    }

    pub fn connection(&self, id: &str) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id == id)
    }

    /// Serializes the whole diagram.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        Ok(if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        })
    }

    /// Loads a previously exported diagram, keeping its identity.
    ///
    /// References that point outside the diagram are pruned (see [`Diagram::prune_dangling`]).
    pub fn from_json(json: &str) -> Result<Self> {
        let mut diagram: Diagram = serde_json::from_str(json)?;
        diagram.prune_dangling();
        Ok(diagram)
    }

    /// Opens a diagram file as a new document: same content, fresh id and timestamps.
    pub fn import_json(json: &str) -> Result<Self> {
        let mut diagram = Self::from_json(json)?;
        let now = Utc::now();
        diagram.id = new_id();
        diagram.created_at = now;
        diagram.updated_at = now;
        Ok(diagram)
    }

    /// Drops connections whose endpoints are missing, and partner/child/parent ids that no
    /// longer resolve. Returns the number of connections removed.
    pub fn prune_dangling(&mut self) -> usize {
        let ids: FxHashSet<String> = self.components.iter().map(|c| c.id.clone()).collect();

        let before = self.connections.len();
        self.connections.retain(|conn| {
            let keep = ids.contains(&conn.source_id)
                && ids.contains(&conn.target_id)
                && conn.source_id != conn.target_id;
            if !keep {
                tracing::warn!(
                    connection = %conn.id,
                    source = %conn.source_id,
                    target = %conn.target_id,
                    "dropping connection with a missing endpoint"
                );
            }
            keep
        });
        let removed = before - self.connections.len();

        let parent_of: Vec<(String, Option<String>)> = self
            .components
            .iter()
            .map(|c| (c.id.clone(), c.parent_id.clone()))
            .collect();

        for comp in &mut self.components {
            comp.connections.retain(|p| ids.contains(p));
            if comp.parent_id.as_ref().is_some_and(|p| !ids.contains(p)) {
                tracing::warn!(component = %comp.id, "clearing unknown parent reference");
                comp.parent_id = None;
            }
            let own_id = comp.id.as_str();
            comp.children.retain(|child| {
                parent_of
                    .iter()
                    .any(|(id, parent)| id == child && parent.as_deref() == Some(own_id))
            });
        }

        // Children that name a parent which does not list them yet.
        let unlisted: Vec<(String, String)> = self
            .components
            .iter()
            .filter_map(|c| {
                let parent_id = c.parent_id.as_ref()?;
                let parent = self.component(parent_id)?;
                (!parent.children.contains(&c.id)).then(|| (parent_id.clone(), c.id.clone()))
            })
            .collect();
        for (parent_id, child_id) in unlisted {
            if let Some(parent) = self.component_mut(&parent_id) {
                parent.children.push(child_id);
            }
        }

        removed
    }
}

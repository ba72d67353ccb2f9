use crate::model::ComponentType;
use serde::{Deserialize, Serialize};

/// Palette entry used when a component is created from scratch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentTemplate {
    #[serde(rename = "type")]
    pub kind: ComponentType,
    pub label: String,
    pub color: String,
    pub icon: String,
}

impl ComponentTemplate {
    fn new(kind: ComponentType, label: &str, color: &str, icon: &str) -> Self {
        Self {
            kind,
            label: label.to_string(),
            color: color.to_string(),
            icon: icon.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComponentLibrary {
    templates: Vec<ComponentTemplate>,
}

impl Default for ComponentLibrary {
    fn default() -> Self {
        use ComponentType as T;
        Self {
            templates: vec![
                ComponentTemplate::new(T::Service, "Service", "#4CAF50", "SVC"),
                ComponentTemplate::new(T::Database, "Database", "#2196F3", "DB"),
                ComponentTemplate::new(T::Api, "API", "#FF9800", "API"),
                ComponentTemplate::new(T::Gateway, "Gateway", "#9C27B0", "GW"),
                ComponentTemplate::new(T::Cache, "Cache", "#F44336", "CH"),
                ComponentTemplate::new(T::Queue, "Queue", "#795548", "Q"),
                ComponentTemplate::new(T::Storage, "Storage", "#607D8B", "ST"),
                ComponentTemplate::new(T::User, "User", "#E91E63", "U"),
                ComponentTemplate::new(T::External, "External", "#757575", "EXT"),
                ComponentTemplate::new(T::Generic, "Generic", "#666666", "GEN"),
                ComponentTemplate::new(T::Agent, "Agent", "#00897B", "AI"),
                ComponentTemplate::new(T::Microservice, "Microservice", "#43A047", "MS"),
                ComponentTemplate::new(T::Container, "Container", "#90A4AE", "BOX"),
            ],
        }
    }
}

impl ComponentLibrary {
    pub fn templates(&self) -> &[ComponentTemplate] {
        &self.templates
    }

    pub fn template(&self, kind: ComponentType) -> Option<&ComponentTemplate> {
        self.templates.iter().find(|t| t.kind == kind)
    }

    /// Replaces the template for `template.kind`, or adds it.
    pub fn upsert(&mut self, template: ComponentTemplate) {
        match self.templates.iter_mut().find(|t| t.kind == template.kind) {
            Some(existing) => *existing = template,
            None => self.templates.push(template),
        }
    }

    pub fn remove(&mut self, kind: ComponentType) -> Option<ComponentTemplate> {
        let idx = self.templates.iter().position(|t| t.kind == kind)?;
        Some(self.templates.remove(idx))
    }
}

//! Layer membership and container synthesis.

use super::layers::Layer;
use crate::color::contrast_text_color;
use crate::geom::{self, Rect};
use crate::model::{Component, ComponentType, Position, Size, Styling};
use crate::options::{LayerPolicy, SvgImportOptions};
use serde_json::Value;

const CONTAINER_BORDER_RADIUS: f64 = 8.0;
const CONTAINER_FONT_SIZE: f64 = 16.0;

/// For each component, the index of the layer it belongs to, if any.
///
/// Membership is decided by the component's top-left corner against the scaled layer bounds.
pub fn assign_layers(
    components: &[Component],
    layers: &[Layer],
    options: &SvgImportOptions,
) -> Vec<Option<usize>> {
    let scaled: Vec<Rect> = layers
        .iter()
        .map(|l| geom::scale_rect(&l.bounds, options.scale))
        .collect();

    components
        .iter()
        .map(|c| {
            let p = geom::point(c.position.x, c.position.y);
            let mut hits = scaled
                .iter()
                .enumerate()
                .filter(|(_, b)| geom::contains_inclusive(b, p));
            let chosen = match options.layer_policy {
                LayerPolicy::FirstMatch => hits.next(),
                // `min_by` keeps the first of equal areas.
                LayerPolicy::SmallestArea => {
                    hits.min_by(|a, b| a.1.area().total_cmp(&b.1.area()))
                }
            };
            chosen.map(|(idx, _)| idx)
        })
        .collect()
}

/// Records layer membership on each component and nests the members of every layer holding
/// more than one component under a synthesized container.
///
/// Each layer's `members` is overwritten with the indices of its components. Members get
/// `parentId` and parent-relative coordinates; containers are appended after all existing
/// components, in layer order.
pub fn assemble_hierarchy(
    mut components: Vec<Component>,
    layers: &mut [Layer],
    options: &SvgImportOptions,
) -> Vec<Component> {
    let assignment = assign_layers(&components, layers, options);

    for layer in layers.iter_mut() {
        layer.members.clear();
    }
    for (comp_idx, layer_idx) in assignment.into_iter().enumerate() {
        let Some(layer_idx) = layer_idx else {
            continue;
        };
        let layer = &mut layers[layer_idx];
        let meta = components[comp_idx].metadata_mut();
        meta.insert("layer".to_string(), Value::String(layer.name.clone()));
        meta.insert(
            "layerColor".to_string(),
            Value::String(layer.background_color.clone()),
        );
        layer.members.push(comp_idx);
    }

    let mut containers = Vec::new();
    for layer in layers.iter() {
        let member_idxs = &layer.members;
        if member_idxs.len() < 2 {
            continue;
        }
        let bounds = geom::scale_rect(&layer.bounds, options.scale);
        let mut container = Component::new(
            ComponentType::Generic,
            layer.name.clone(),
            Position::new(bounds.origin.x, bounds.origin.y),
            Size::new(bounds.size.width, bounds.size.height),
        );
        container.description = Some(format!("Container for {} components", member_idxs.len()));
        container.color = Some(layer.background_color.clone());
        container.text_color = Some(contrast_text_color(&layer.background_color).to_string());
        container.styling = Some(Styling {
            background_color: Some(layer.background_color.clone()),
            border_radius: Some(CONTAINER_BORDER_RADIUS),
            font_size: Some(CONTAINER_FONT_SIZE),
            ..Default::default()
        });

        for &idx in member_idxs {
            let child = &mut components[idx];
            child.parent_id = Some(container.id.clone());
            child.position.x -= container.position.x;
            child.position.y -= container.position.y;
            container.children.push(child.id.clone());
        }
        tracing::debug!(
            layer = %layer.name,
            children = container.children.len(),
            "nested layer members under a container"
        );
        containers.push(container);
    }

    components.extend(containers);
    components
}

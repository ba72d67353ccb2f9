use super::{assert_consistent, by_title, svg, two_agents_svg};
use crate::geom;
use crate::model::{Component, ComponentType, Position, Size};
use crate::svg::hierarchy::{assemble_hierarchy, assign_layers};
use crate::svg::layers::Layer;
use crate::{LayerPolicy, SvgImportOptions, SvgImporter, import_svg};
use serde_json::json;

fn layer(name: &str, x: f64, y: f64, w: f64, h: f64) -> Layer {
    Layer {
        name: name.to_string(),
        bounds: geom::rect(x, y, w, h),
        background_color: "#e3f2fd".to_string(),
        members: Vec::new(),
    }
}

fn leaf(title: &str, x: f64, y: f64) -> Component {
    Component::new(
        ComponentType::Service,
        title,
        Position::new(x, y),
        Size::new(140.0, 80.0),
    )
}

#[test]
fn layer_members_are_nested_with_relative_coordinates() {
    let diagram = import_svg(&two_agents_svg(None)).unwrap();
    assert_eq!(diagram.components.len(), 3);
    assert_consistent(&diagram);

    let container = by_title(&diagram, "AGENT LAYER");
    assert_eq!(container.kind, ComponentType::Generic);
    assert_eq!(
        (container.position.x, container.position.y),
        (25.0, 50.0)
    );
    assert_eq!(
        (container.size.width, container.size.height),
        (300.0, 100.0)
    );
    assert_eq!(
        container.description.as_deref(),
        Some("Container for 2 components")
    );
    assert_eq!(container.text_color.as_deref(), Some("#333333"));
    assert_eq!(container.parent_id, None);

    let research = by_title(&diagram, "Research Agent");
    let rag = by_title(&diagram, "Content RAG Agent");
    assert_eq!(container.children, vec![research.id.clone(), rag.id.clone()]);
    assert_eq!((research.position.x, research.position.y), (25.0, 40.0));
    assert_eq!((rag.position.x, rag.position.y), (200.0, 40.0));
    assert_eq!(
        diagram.absolute_position(&rag.id),
        Some(Position::new(225.0, 90.0))
    );

    // Containers come after the components they hold.
    assert_eq!(diagram.components.last().map(|c| &c.id), Some(&container.id));

    let value = serde_json::to_value(research).unwrap();
    assert_eq!(
        value["metadata"],
        json!({ "layer": "AGENT LAYER", "layerColor": "#fff3e0" })
    );
    let value = serde_json::to_value(container).unwrap();
    assert_eq!(
        value["styling"],
        json!({ "backgroundColor": "#fff3e0", "borderRadius": 8.0, "fontSize": 16.0 })
    );
}

#[test]
fn single_member_layer_only_tags_metadata() {
    let mut layers = [layer("Edge", 0.0, 0.0, 800.0, 200.0)];
    let comps = vec![leaf("Lonely", 20.0, 20.0), leaf("Outside", 20.0, 300.0)];
    let out = assemble_hierarchy(comps, &mut layers, &SvgImportOptions::default());
    assert_eq!(layers[0].members, vec![0]);

    assert_eq!(out.len(), 2);
    assert!(out.iter().all(|c| c.parent_id.is_none()));
    assert_eq!((out[0].position.x, out[0].position.y), (20.0, 20.0));
    let meta = out[0].metadata.as_ref().unwrap();
    assert_eq!(meta["layer"], json!("Edge"));
    assert_eq!(meta["layerColor"], json!("#e3f2fd"));
    assert!(out[1].metadata.is_none());
}

#[test]
fn assembly_records_member_indices_on_each_layer() {
    // Scaled bounds: (0, 0)-(400, 100) and (0, 150)-(400, 250).
    let mut layers = [
        layer("Top", 0.0, 0.0, 800.0, 200.0),
        layer("Bottom", 0.0, 300.0, 800.0, 200.0),
    ];
    layers[1].members = vec![7];
    let comps = vec![
        leaf("a", 10.0, 10.0),
        leaf("b", 10.0, 160.0),
        leaf("c", 200.0, 10.0),
        leaf("d", 10.0, 400.0),
    ];
    let out = assemble_hierarchy(comps, &mut layers, &SvgImportOptions::default());

    assert_eq!(layers[0].members, vec![0, 2]);
    assert_eq!(layers[1].members, vec![1]);
    // One container for the two-member layer.
    assert_eq!(out.len(), 5);
    assert_eq!(out[4].children, vec![out[0].id.clone(), out[2].id.clone()]);
}

#[test]
fn membership_uses_the_top_left_corner_inclusively() {
    // Scaled bounds: (50, 50) to (250, 150).
    let layers = [layer("Band", 100.0, 100.0, 400.0, 200.0)];
    let comps = [
        leaf("corner", 50.0, 50.0),
        leaf("edge", 250.0, 150.0),
        leaf("overhang", 200.0, 100.0),
        leaf("outside", 49.9, 60.0),
    ];
    let assignment = assign_layers(&comps, &layers, &SvgImportOptions::default());
    assert_eq!(assignment, vec![Some(0), Some(0), Some(0), None]);
}

#[test]
fn overlapping_layers_follow_the_layer_policy() {
    let layers = [
        layer("Outer", 0.0, 0.0, 1000.0, 600.0),
        layer("Inner", 50.0, 100.0, 600.0, 200.0),
    ];
    let comps = [leaf("a", 50.0, 90.0)];

    let first = assign_layers(&comps, &layers, &SvgImportOptions::default());
    assert_eq!(first, vec![Some(0)]);

    let smallest = assign_layers(
        &comps,
        &layers,
        &SvgImportOptions::default().with_layer_policy(LayerPolicy::SmallestArea),
    );
    assert_eq!(smallest, vec![Some(1)]);
}

#[test]
fn nested_layers_end_to_end() {
    let doc = svg(
        r##"<rect x="0" y="0" width="1000" height="600" fill="#fafafa"/>
<rect x="50" y="100" width="600" height="200" fill="#fff3e0"/>
<text x="350" y="125" font-size="18" font-weight="bold">AGENT LAYER</text>
<rect x="100" y="180" width="150" height="80"/>
<text x="175" y="210">Research Agent</text>
<rect x="450" y="180" width="150" height="80"/>
<text x="525" y="210">Content RAG Agent</text>"##,
    );

    let diagram = import_svg(&doc).unwrap();
    assert_eq!(diagram.components.len(), 3);
    assert_eq!(diagram.components[2].title, "Layer 1");

    let importer = SvgImporter::new().with_options(
        SvgImportOptions::default().with_layer_policy(LayerPolicy::SmallestArea),
    );
    let diagram = importer.import_str(&doc).unwrap();
    assert_eq!(diagram.components.len(), 3);
    assert_eq!(diagram.components[2].title, "AGENT LAYER");
    assert_consistent(&diagram);
}

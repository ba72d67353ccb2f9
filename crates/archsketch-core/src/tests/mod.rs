mod hierarchy;

use crate::Diagram;
use rustc_hash::FxHashMap;

pub(crate) fn svg(body: &str) -> String {
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="1400" height="900">
<defs>
  <marker id="arrowhead" markerWidth="10" markerHeight="7" refX="9" refY="3.5" orient="auto">
    <polygon points="0 0, 10 3.5, 0 7" fill="#333"/>
  </marker>
</defs>
{body}
</svg>"##
    )
}

/// One 600x200 layer holding two agents wired left to right.
pub(crate) fn two_agents_svg(dash: Option<&str>) -> String {
    let dash_attr = dash
        .map(|d| format!(r#" stroke-dasharray="{d}""#))
        .unwrap_or_default();
    svg(&format!(
        r##"<rect x="50" y="100" width="600" height="200" fill="#fff3e0" stroke="#f57c00"/>
<text x="350" y="125" font-size="18" font-weight="bold">AGENT LAYER</text>
<rect x="100" y="180" width="150" height="80" fill="#ffffff" stroke="#4caf50"/>
<text x="175" y="210" font-size="12" font-weight="bold">Research Agent</text>
<rect x="450" y="180" width="150" height="80" fill="#ffffff" stroke="#4caf50"/>
<text x="525" y="210" font-size="12" font-weight="bold">Content RAG Agent</text>
<path d="M 175 220 L 525 220" stroke="#333" marker-end="url(#arrowhead)"{dash_attr}/>"##
    ))
}

pub(crate) fn by_title<'a>(diagram: &'a Diagram, title: &str) -> &'a crate::Component {
    diagram
        .components
        .iter()
        .find(|c| c.title == title)
        .unwrap_or_else(|| panic!("no component titled {title:?}"))
}

/// Endpoints resolve, partner lists mirror connections, parent/child links agree both ways.
pub(crate) fn assert_consistent(diagram: &Diagram) {
    let by_id: FxHashMap<&str, &crate::Component> = diagram
        .components
        .iter()
        .map(|c| (c.id.as_str(), c))
        .collect();

    for conn in &diagram.connections {
        assert!(by_id.contains_key(conn.source_id.as_str()), "orphan source");
        assert!(by_id.contains_key(conn.target_id.as_str()), "orphan target");
        assert!(
            by_id[conn.source_id.as_str()]
                .connections
                .contains(&conn.target_id)
        );
        assert!(
            by_id[conn.target_id.as_str()]
                .connections
                .contains(&conn.source_id)
        );
    }

    for comp in &diagram.components {
        for child in &comp.children {
            let child = by_id.get(child.as_str()).expect("child exists");
            assert_eq!(child.parent_id.as_deref(), Some(comp.id.as_str()));
        }
        if let Some(parent) = comp.parent_id.as_deref() {
            let parent = by_id.get(parent).expect("parent exists");
            assert!(parent.children.contains(&comp.id));
        }
    }
}

//! Text rendering for composition queries
//!
//! Output only depends on the nodes passed in and their stored order, so an
//! unchanged forest always renders byte-identically.

use crate::composition::model::CompositionNode;

/// Spaces per depth level in text output
pub const DEFAULT_INDENT: usize = 2;

/// Render subtrees as indented `<kind>/<name>` lines
///
/// Separate subtrees are divided by a blank line. No trailing newline.
pub fn render(nodes: &[&CompositionNode]) -> String {
    render_with_indent(nodes, DEFAULT_INDENT)
}

pub fn render_with_indent(nodes: &[&CompositionNode], indent: usize) -> String {
    let trees: Vec<String> = nodes
        .iter()
        .map(|node| {
            node.walk()
                .map(|(depth, n)| {
                    format!(
                        "{:width$}{}/{}",
                        "",
                        n.resource.kind,
                        n.resource.name,
                        width = depth * indent
                    )
                })
                .collect::<Vec<_>>()
                .join("\n")
        })
        .collect();
    trees.join("\n\n")
}

/// Render subtrees as a pretty-printed JSON array
pub fn render_json(nodes: &[&CompositionNode]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(nodes)
}

/// Multi-line description of a single node and its direct children
pub fn describe(node: &CompositionNode) -> String {
    let owner = match &node.owner {
        Some(link) => format!("{} ({})", link.owner_kind, link.owner_uid),
        None => "<none>".to_string(),
    };

    let mut lines = vec![
        format!("Kind: {}", node.resource.kind),
        format!("Name: {}", node.resource.name),
        format!("Namespace: {}", node.resource.namespace),
        format!("UID: {}", node.resource.uid),
        format!("Owner: {}", owner),
    ];
    if node.children.is_empty() {
        lines.push("Children: <none>".to_string());
    } else {
        lines.push("Children:".to_string());
        for child in &node.children {
            lines.push(format!("  {}", child.resource));
        }
    }
    lines.join("\n")
}

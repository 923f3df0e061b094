//! Query filtering with synonym ("thematic") expansion.

use selectie_nace_models::{ClassificationNode, FilteredNode, SynonymMap};

/// Queries shorter than this (in characters) leave the tree unfiltered.
pub const MIN_QUERY_CHARS: usize = 2;

/// Code prefixes the synonym table maps `query` to.
#[must_use]
pub fn thematic_codes<'a>(query: &str, synonyms: &'a SynonymMap) -> &'a [String] {
    synonyms.lookup(query)
}

/// Bidirectional prefix match between a node code and thematic codes.
///
/// A node matches a thematic code when it is that code, a dotted
/// descendant of it, or an ancestor of it.
#[must_use]
pub fn is_thematic_match(code: &str, thematic: &[String]) -> bool {
    thematic.iter().any(|tc| {
        code == tc
            || code
                .strip_prefix(tc.as_str())
                .is_some_and(|rest| rest.starts_with('.'))
            || tc.starts_with(code)
    })
}

/// Whether a node matches on its own, ignoring descendants.
///
/// `query_lower` must already be lowercased. Any translation of the label
/// counts.
#[must_use]
pub fn node_matches(node: &ClassificationNode, query_lower: &str, thematic: &[String]) -> bool {
    node.label
        .all()
        .any(|label| label.to_lowercase().contains(query_lower))
        || node.code.to_lowercase().contains(query_lower)
        || is_thematic_match(&node.code, thematic)
}

/// Filters the tree for `query`.
///
/// Short queries return every node with no flags set. Otherwise a node
/// is kept (and shown expanded) when it or a descendant matches; hidden
/// nodes are pruned along with their subtrees.
#[must_use]
pub fn filter_tree(
    nodes: &[ClassificationNode],
    query: &str,
    synonyms: &SynonymMap,
) -> Vec<FilteredNode> {
    if query.chars().count() < MIN_QUERY_CHARS {
        return nodes.iter().map(FilteredNode::passthrough).collect();
    }

    let thematic = thematic_codes(query, synonyms);
    if !thematic.is_empty() {
        log::debug!("Thematic search active: {query:?} -> {thematic:?}");
    }

    filter_nodes(nodes, &query.to_lowercase(), thematic)
}

fn filter_nodes(
    nodes: &[ClassificationNode],
    query_lower: &str,
    thematic: &[String],
) -> Vec<FilteredNode> {
    nodes
        .iter()
        .map(|node| {
            let children = filter_nodes(&node.children, query_lower, thematic);
            let children_match = children.iter().any(|c| !c.hidden);
            let self_matches = node_matches(node, query_lower, thematic);

            FilteredNode {
                code: node.code.clone(),
                label: node.label.clone(),
                count: node.count,
                children,
                hidden: !self_matches && !children_match,
                expanded: self_matches || children_match,
                thematic_match: is_thematic_match(&node.code, thematic),
            }
        })
        .filter(|node| !node.hidden)
        .collect()
}

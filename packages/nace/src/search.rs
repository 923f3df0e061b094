//! User state layered over the filtered tree: query, selected codes and
//! manually expanded codes.
//!
//! None of these operations change the tree or the filter result;
//! selection and expansion are looked up by code at render time.

use std::collections::BTreeSet;

use selectie_nace_models::{ClassificationNode, FilteredNode, SynonymMap, flatten};

use crate::filter::{filter_tree, thematic_codes};

/// Codes expanded when the demo first renders.
pub const DEFAULT_EXPANDED: &[&str] = &["I", "56"];

/// Number of selected codes at which the call-to-action prompt appears.
pub const PROMPT_THRESHOLD: usize = 2;

/// A node as it would be rendered, with its depth and effective state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRow<'a> {
    /// Nesting level, 0 for sections.
    pub depth: usize,
    /// The node.
    pub node: &'a FilteredNode,
    /// Whether the node's children are shown.
    pub expanded: bool,
    /// Whether the node's checkbox is ticked.
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState {
    query: String,
    selected: BTreeSet<String>,
    expanded: BTreeSet<String>,
    prompt: bool,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            query: String::new(),
            selected: BTreeSet::new(),
            expanded: DEFAULT_EXPANDED.iter().map(|c| (*c).to_string()).collect(),
            prompt: false,
        }
    }
}

impl SearchState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// The filtered tree for the current query.
    #[must_use]
    pub fn view(&self, tree: &[ClassificationNode], synonyms: &SynonymMap) -> Vec<FilteredNode> {
        filter_tree(tree, &self.query, synonyms)
    }

    /// Thematic codes for the current query, for the "thematic search
    /// active" indicator.
    #[must_use]
    pub fn thematic_codes<'a>(&self, synonyms: &'a SynonymMap) -> &'a [String] {
        thematic_codes(&self.query, synonyms)
    }

    /// Ticks or unticks a code. Reaching [`PROMPT_THRESHOLD`] selected
    /// codes raises the prompt.
    pub fn toggle_select(&mut self, code: &str) {
        if !self.selected.remove(code) {
            self.selected.insert(code.to_string());
            if self.selected.len() >= PROMPT_THRESHOLD {
                self.prompt = true;
            }
        }
    }

    pub fn toggle_expand(&mut self, code: &str) {
        if !self.expanded.remove(code) {
            self.expanded.insert(code.to_string());
        }
    }

    /// Selects every code in the full tree, regardless of the query.
    pub fn select_all(&mut self, tree: &[ClassificationNode]) {
        self.selected = flatten(tree).into_iter().map(|n| n.code.clone()).collect();
        if self.selected.len() >= PROMPT_THRESHOLD {
            self.prompt = true;
        }
    }

    /// Expands every node that has children in the full tree.
    pub fn expand_all(&mut self, tree: &[ClassificationNode]) {
        self.expanded = flatten(tree)
            .into_iter()
            .filter(|n| !n.is_leaf())
            .map(|n| n.code.clone())
            .collect();
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    #[must_use]
    pub fn is_selected(&self, code: &str) -> bool {
        self.selected.contains(code)
    }

    /// Selected codes in code order.
    pub fn selected(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }

    /// A node is shown expanded when the user opened it or the filter
    /// forced it open.
    #[must_use]
    pub fn is_expanded(&self, node: &FilteredNode) -> bool {
        self.expanded.contains(&node.code) || node.expanded
    }

    /// Sum of the counts of all selected codes, looked up in the full
    /// tree. Nested selections are counted independently.
    #[must_use]
    pub fn total_selected(&self, tree: &[ClassificationNode]) -> u64 {
        flatten(tree)
            .into_iter()
            .filter(|n| self.selected.contains(&n.code))
            .map(|n| n.count)
            .sum()
    }

    /// Whether the call-to-action prompt is showing.
    #[must_use]
    pub const fn should_prompt(&self) -> bool {
        self.prompt
    }

    pub fn dismiss_prompt(&mut self) {
        self.prompt = false;
    }

    /// Flattens a filtered view into render order, descending only into
    /// expanded nodes.
    #[must_use]
    pub fn visible_rows<'a>(&self, view: &'a [FilteredNode]) -> Vec<VisibleRow<'a>> {
        let mut rows = Vec::new();
        self.push_rows(view, 0, &mut rows);
        rows
    }

    fn push_rows<'a>(&self, nodes: &'a [FilteredNode], depth: usize, rows: &mut Vec<VisibleRow<'a>>) {
        for node in nodes {
            let expanded = self.is_expanded(node);
            rows.push(VisibleRow {
                depth,
                node,
                expanded,
                selected: self.is_selected(&node.code),
            });
            if expanded {
                self.push_rows(&node.children, depth + 1, rows);
            }
        }
    }
}

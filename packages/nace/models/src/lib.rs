#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Types for the industry classification (NACE-BEL) search demo.
//!
//! A [`ClassificationNode`] tree is static data. Filtering produces a
//! parallel tree of [`FilteredNode`]s carrying the per-query flags used
//! for display.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Display language for labels.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Locale {
    /// Dutch; every label has one.
    #[default]
    Nl,
    /// English; falls back to Dutch when missing.
    En,
}

/// A localized label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Labels {
    /// Dutch label.
    pub nl: String,
    /// English label, if translated.
    #[serde(default)]
    pub en: Option<String>,
}

impl Labels {
    /// The label for `locale`, falling back to Dutch.
    #[must_use]
    pub fn get(&self, locale: Locale) -> &str {
        match locale {
            Locale::Nl => &self.nl,
            Locale::En => self.en.as_deref().unwrap_or(&self.nl),
        }
    }

    /// Every available translation.
    pub fn all(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.nl.as_str()).chain(self.en.as_deref())
    }
}

/// A node of the classification tree.
///
/// Section codes are single letters (`"I"`), everything below them is
/// dotted numeric (`"56"`, `"56.10"`) and extends its parent's code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationNode {
    /// Classification code.
    pub code: String,
    /// Localized description.
    pub label: Labels,
    /// Synthetic number of companies registered under this code.
    pub count: u64,
    /// Sub-codes, in display order.
    #[serde(default)]
    pub children: Vec<Self>,
}

impl ClassificationNode {
    /// Whether this node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Whether this node is a lettered section rather than a numeric
    /// division, group or class.
    #[must_use]
    pub fn is_section(&self) -> bool {
        self.code.chars().all(|c| c.is_ascii_alphabetic())
    }

    /// This node and all descendants, depth-first pre-order.
    #[must_use]
    pub fn descendants(&self) -> Vec<&Self> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.descendants());
        }
        out
    }
}

/// Every node of a forest, depth-first pre-order.
#[must_use]
pub fn flatten(nodes: &[ClassificationNode]) -> Vec<&ClassificationNode> {
    nodes.iter().flat_map(ClassificationNode::descendants).collect()
}

/// A classification node annotated for one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilteredNode {
    /// Classification code.
    pub code: String,
    /// Localized description.
    pub label: Labels,
    /// Synthetic company count.
    pub count: u64,
    /// Visible children.
    pub children: Vec<Self>,
    /// Neither this node nor any descendant matched.
    pub hidden: bool,
    /// This node or a descendant matched, so it is shown expanded.
    pub expanded: bool,
    /// Matched through synonym expansion.
    pub thematic_match: bool,
}

impl FilteredNode {
    /// Unfiltered view of a node: nothing hidden, nothing forced open.
    #[must_use]
    pub fn passthrough(node: &ClassificationNode) -> Self {
        Self {
            code: node.code.clone(),
            label: node.label.clone(),
            count: node.count,
            children: node.children.iter().map(Self::passthrough).collect(),
            hidden: false,
            expanded: false,
            thematic_match: false,
        }
    }
}

/// Colloquial term to classification code prefixes.
///
/// Keys are stored lowercase. Lookups are exact after lowercasing and
/// trimming; there is no partial matching.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SynonymMap(BTreeMap<String, Vec<String>>);

impl SynonymMap {
    /// Builds a map, lowercasing every term.
    #[must_use]
    pub fn new(entries: BTreeMap<String, Vec<String>>) -> Self {
        Self(
            entries
                .into_iter()
                .map(|(term, codes)| (term.trim().to_lowercase(), codes))
                .collect(),
        )
    }

    /// Code prefixes for `term`, or an empty slice.
    #[must_use]
    pub fn lookup(&self, term: &str) -> &[String] {
        self.0
            .get(&term.trim().to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of terms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map has no terms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// All `(term, codes)` pairs in term order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

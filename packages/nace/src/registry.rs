//! Embedded classification tree and synonym table.
//!
//! Both files live in `data/` and are compiled in via `include_str!`.
//! [`parse_tree`] and [`parse_synonyms`] accept any TOML of the same
//! shape so alternate data sets can be loaded at runtime.

use std::collections::{BTreeMap, BTreeSet};

use selectie_nace_models::{ClassificationNode, SynonymMap};
use serde::Deserialize;

use crate::NaceError;

const TREE_TOML: &str = include_str!("../data/tree.toml");
const SYNONYMS_TOML: &str = include_str!("../data/synonyms.toml");

#[derive(Debug, Deserialize)]
struct TreeFile {
    nodes: Vec<ClassificationNode>,
}

#[derive(Debug, Deserialize)]
struct SynonymFile {
    synonyms: BTreeMap<String, Vec<String>>,
}

/// Parses and validates a classification tree.
///
/// # Errors
///
/// * [`NaceError::Toml`] if the TOML is malformed
/// * [`NaceError::InvalidHierarchy`] if a child code does not extend its
///   parent (sections may only contain numeric divisions)
/// * [`NaceError::DuplicateCode`] if a code appears twice
pub fn parse_tree(toml_str: &str) -> Result<Vec<ClassificationNode>, NaceError> {
    let file: TreeFile = toml::de::from_str(toml_str)?;

    let mut seen = BTreeSet::new();
    for node in &file.nodes {
        validate(node, &mut seen)?;
    }

    log::debug!("Loaded classification tree with {} codes", seen.len());
    Ok(file.nodes)
}

fn validate<'a>(node: &'a ClassificationNode, seen: &mut BTreeSet<&'a str>) -> Result<(), NaceError> {
    if !seen.insert(node.code.as_str()) {
        return Err(NaceError::DuplicateCode {
            code: node.code.clone(),
        });
    }

    for child in &node.children {
        let valid = if node.is_section() {
            !child.is_section()
        } else {
            child.code.len() > node.code.len() && child.code.starts_with(node.code.as_str())
        };
        if !valid {
            return Err(NaceError::InvalidHierarchy {
                parent: node.code.clone(),
                child: child.code.clone(),
            });
        }
        validate(child, seen)?;
    }

    Ok(())
}

/// Parses a synonym table.
///
/// # Errors
///
/// Returns [`NaceError::Toml`] if the TOML is malformed.
pub fn parse_synonyms(toml_str: &str) -> Result<SynonymMap, NaceError> {
    let file: SynonymFile = toml::de::from_str(toml_str)?;
    Ok(SynonymMap::new(file.synonyms))
}

/// The embedded NACE-BEL demo tree.
///
/// # Panics
///
/// Panics if the embedded TOML fails to parse or validate. Since it is a
/// compile-time constant, a failure is a development error caught by
/// tests.
#[must_use]
pub fn default_tree() -> Vec<ClassificationNode> {
    parse_tree(TREE_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse embedded classification tree: {e}"))
}

/// The embedded Dutch synonym table.
///
/// # Panics
///
/// Panics if the embedded TOML fails to parse.
#[must_use]
pub fn default_synonyms() -> SynonymMap {
    parse_synonyms(SYNONYMS_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse embedded synonym table: {e}"))
}

#[cfg(test)]
mod tests {
    use selectie_nace_models::flatten;

    use super::*;

    #[test]
    fn embedded_tree_is_valid() {
        let tree = default_tree();
        assert_eq!(tree.len(), 10);
        assert_eq!(flatten(&tree).len(), 51);
    }

    #[test]
    fn every_embedded_label_is_translated() {
        for node in flatten(&default_tree()) {
            assert!(!node.label.nl.is_empty(), "{} has no Dutch label", node.code);
            assert!(node.label.en.is_some(), "{} has no English label", node.code);
        }
    }

    #[test]
    fn embedded_synonyms_load() {
        let synonyms = default_synonyms();
        assert_eq!(synonyms.len(), 53);
        assert_eq!(synonyms.lookup("bakker"), ["10.71", "47.24"]);
        assert_eq!(synonyms.lookup("Café"), ["56.30"]);
        assert_eq!(synonyms.lookup("taxi's"), ["49.32"]);
    }

    #[test]
    fn child_must_extend_parent_code() {
        let result = parse_tree(
            r#"
            [[nodes]]
            code = "47"
            label = { nl = "Detailhandel" }
            count = 1

            [[nodes.children]]
            code = "56.10"
            label = { nl = "Restaurants" }
            count = 1
            "#,
        );
        assert!(matches!(
            result,
            Err(NaceError::InvalidHierarchy { ref parent, ref child }) if parent == "47" && child == "56.10"
        ));
    }

    #[test]
    fn section_cannot_contain_section() {
        let result = parse_tree(
            r#"
            [[nodes]]
            code = "G"
            label = { nl = "Handel" }
            count = 1

            [[nodes.children]]
            code = "I"
            label = { nl = "Horeca" }
            count = 1
            "#,
        );
        assert!(matches!(result, Err(NaceError::InvalidHierarchy { .. })));
    }

    #[test]
    fn duplicate_codes_are_rejected() {
        let result = parse_tree(
            r#"
            [[nodes]]
            code = "J"
            label = { nl = "Informatie" }
            count = 1

            [[nodes]]
            code = "J"
            label = { nl = "Informatie" }
            count = 1
            "#,
        );
        assert!(matches!(result, Err(NaceError::DuplicateCode { .. })));
    }
}

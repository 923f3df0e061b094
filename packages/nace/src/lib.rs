#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Free-text and synonym search over the industry classification tree.
//!
//! The tree and the synonym table are embedded TOML assets (see
//! [`registry`]). [`filter::filter_tree`] produces the per-query view and
//! [`search::SearchState`] tracks the user's selection and expansion on
//! top of it.

pub mod filter;
pub mod registry;
pub mod search;

use thiserror::Error;

pub use filter::{filter_tree, is_thematic_match, thematic_codes};
pub use search::SearchState;

/// Errors loading classification data.
#[derive(Debug, Error)]
pub enum NaceError {
    /// TOML parse error.
    #[error("Classification data parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A child code does not extend its parent's code.
    #[error("Code {child} is not a valid child of {parent}")]
    InvalidHierarchy {
        /// Parent code.
        parent: String,
        /// Offending child code.
        child: String,
    },

    /// The same code appears twice in the tree.
    #[error("Duplicate classification code {code}")]
    DuplicateCode {
        /// Repeated code.
        code: String,
    },
}

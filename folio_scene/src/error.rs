// Copyright 2025 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for properties, persistence, and scene edits.

use folio_tree::NodeId;
use thiserror::Error;

/// Rejected property write. The store is left unchanged.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum PropertyError {
    /// The name is not one of the store's declared properties.
    #[error("unknown property: {0}")]
    Unknown(String),

    /// The value kind differs from the declared default's kind.
    #[error("property {name} expects {expected}, got {found}")]
    TypeMismatch {
        /// Property name.
        name: &'static str,
        /// Kind of the declared default.
        expected: &'static str,
        /// Kind of the rejected value.
        found: &'static str,
    },
}

/// Failure to write or read a persisted [`Blob`](crate::Blob).
#[derive(Debug, Error)]
pub enum StoreError {
    /// Conversion to or from JSON failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The blob's type tag is missing or names a different node type.
    #[error("expected a {expected} blob, found {found:?}")]
    UnexpectedTag {
        /// Tag the reader required.
        expected: &'static str,
        /// Tag present in the blob, if any.
        found: Option<String>,
    },

    /// A child blob names an element type this crate does not know.
    #[error("unknown element type: {0}")]
    UnknownElement(String),

    /// A numeric value that cannot be persisted faithfully.
    #[error("value for {key} is not finite")]
    NonFinite {
        /// Offending key.
        key: String,
    },

    /// A key holds data of the wrong shape.
    #[error("malformed value for {key}")]
    Malformed {
        /// Offending key.
        key: String,
    },
}

/// Rejected scene edit. The scene is left unchanged.
#[derive(Debug, Error)]
pub enum SceneError {
    /// A metadata or element property write was rejected.
    #[error(transparent)]
    Property(#[from] PropertyError),

    /// The id does not refer to a live node of this scene.
    #[error("no such node: {0:?}")]
    UnknownNode(NodeId),

    /// The node exists but is not a page.
    #[error("node {0:?} is not a page")]
    NotAPage(NodeId),

    /// The node exists but is not a shape.
    #[error("node {0:?} is not a shape")]
    NotAShape(NodeId),

    /// The scene root cannot be removed or reparented.
    #[error("the scene root cannot be removed")]
    RootRemoval,

    /// The candidate page rectangle conflicts with another page.
    #[error("page {page:?} would overlap another page")]
    PageOverlap {
        /// Page that was being moved or resized.
        page: NodeId,
    },

    /// Persisting or restoring the scene failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

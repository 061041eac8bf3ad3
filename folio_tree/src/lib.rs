// Copyright 2025 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Folio Tree: an ordered, generational arena tree.
//!
//! Folio Tree is the container layer underneath the Folio document model.
//!
//! - Holds an ordered forest of nodes, each carrying a payload `T`.
//! - Provides parent, child, and sibling navigation in document order.
//! - Visits subtrees depth-first with per-node control over descent.
//! - Keeps a non-owning back-reference from every attached node to the root of its tree.
//!
//! It does not know anything about geometry or rendering; higher layers (like a scene) decide
//! what the payloads mean.
//!
//! ## API overview
//!
//! - [`Tree`]: the container.
//! - [`NodeId`]: generational handle of a node.
//! - [`Visit`]: traversal control for [`Tree::visit`].
//!
//! ## Owners
//!
//! A root created with [`Tree::insert_root`] is its own owner. Nodes appended beneath it share
//! that owner. [`Tree::detach`] clears the owner for the whole detached subtree and
//! [`Tree::attach`] re-establishes it. The owner is a plain [`NodeId`], never a second
//! ownership edge, so removing the root invalidates it like any other id.
//!
//! # Example
//!
//! ```rust
//! use folio_tree::{Tree, Visit};
//!
//! let mut tree = Tree::new();
//! let root = tree.insert_root("document");
//! let layer = tree.append_child(root, "layer").unwrap();
//! let shape = tree.append_child(layer, "shape").unwrap();
//! let page = tree.append_child(root, "page").unwrap();
//!
//! assert_eq!(tree.owner(shape), Some(root));
//! assert_eq!(tree.descendants(root), vec![layer, shape, page]);
//!
//! // Skip everything below the layer.
//! let mut names = Vec::new();
//! tree.visit(root, |id, name| {
//!     names.push(*name);
//!     if id == layer { Visit::SkipChildren } else { Visit::Continue }
//! });
//! assert_eq!(names, ["layer", "page"]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod tree;
mod types;

pub use tree::Tree;
pub use types::{NodeId, Visit};

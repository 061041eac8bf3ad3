// Copyright 2025 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the tree: node identifiers and traversal control.

/// Identifier for a node in the tree.
///
/// This is a small, copyable handle that stays stable while the node is alive but becomes
/// invalid when the node is removed.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `NodeId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `NodeId`.
///
/// ### Liveness
///
/// Use [`Tree::is_alive`](crate::Tree::is_alive) to check whether a `NodeId` still refers to a live node.
/// Stale `NodeId`s never alias a different live node because the generation must match.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    /// Slot index of this identifier, for diagnostics.
    pub const fn slot(self) -> u32 {
        self.0
    }

    /// Generation of this identifier, for diagnostics.
    pub const fn generation(self) -> u32 {
        self.1
    }
}

/// Traversal control returned by the callback of [`Tree::visit`](crate::Tree::visit).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Visit {
    /// Keep going, descending into the children of the current node.
    Continue,
    /// Keep going, but do not descend into the children of the current node.
    SkipChildren,
    /// End the traversal.
    Stop,
}

// Copyright 2025 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: structure, navigation, traversal.

use alloc::vec::Vec;

use crate::types::{NodeId, Visit};

/// Ordered tree of payload-carrying nodes stored in generational slots.
pub struct Tree<T> {
    nodes: Vec<Option<Node<T>>>, // slots
    generations: Vec<u32>,       // last generation per slot (persists across frees)
    free_list: Vec<usize>,
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> core::fmt::Debug for Tree<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.len();
        let free = self.free_list.len();
        f.debug_struct("Tree")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &free)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
struct Node<T> {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    // Root of the tree this node is attached to. Not an ownership edge.
    owner: Option<NodeId>,
    payload: T,
}

impl<T> Tree<T> {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// True if the tree holds no live nodes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert a new root node. A root is its own owner.
    pub fn insert_root(&mut self, payload: T) -> NodeId {
        let id = self.alloc(payload);
        self.node_mut(id).owner = Some(id);
        id
    }

    /// Append a new node as the last child of `parent`.
    ///
    /// Returns `None` if `parent` is stale.
    pub fn append_child(&mut self, parent: NodeId, payload: T) -> Option<NodeId> {
        if !self.is_alive(parent) {
            return None;
        }
        let id = self.alloc(payload);
        let owner = self.node(parent).owner;
        self.node_mut(parent).children.push(id);
        let node = self.node_mut(id);
        node.parent = Some(parent);
        node.owner = owner;
        Some(id)
    }

    /// Insert a new node directly before `sibling` under the same parent.
    ///
    /// Returns `None` if `sibling` is stale or has no parent.
    pub fn insert_before(&mut self, sibling: NodeId, payload: T) -> Option<NodeId> {
        let parent = self.parent(sibling)?;
        let pos = self.position_in_parent(parent, sibling)?;
        let id = self.alloc(payload);
        let owner = self.node(parent).owner;
        self.node_mut(parent).children.insert(pos, id);
        let node = self.node_mut(id);
        node.parent = Some(parent);
        node.owner = owner;
        Some(id)
    }

    /// Remove a node and its subtree, returning the payload of `id`.
    ///
    /// Every identifier in the removed subtree becomes stale.
    pub fn remove(&mut self, id: NodeId) -> Option<T> {
        if !self.is_alive(id) {
            return None;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        let mut stack = self.node(id).children.clone();
        while let Some(child) = stack.pop() {
            if let Some(node) = self.free(child) {
                stack.extend(node.children);
            }
        }
        self.free(id).map(|node| node.payload)
    }

    /// Detach `id` (and its subtree) from its parent.
    ///
    /// The owner of every node in the subtree is cleared. Returns false if `id` is stale
    /// or already detached.
    pub fn detach(&mut self, id: NodeId) -> bool {
        let Some(parent) = self.parent(id) else {
            return false;
        };
        self.unlink_parent(id, parent);
        self.set_subtree_owner(id, None);
        true
    }

    /// Attach a detached subtree rooted at `id` as the last child of `parent`.
    ///
    /// The owner of every node in the subtree becomes the owner of `parent`.
    /// Returns false if either id is stale, `id` already has a parent, or `parent`
    /// lies inside the subtree of `id`.
    pub fn attach(&mut self, parent: NodeId, id: NodeId) -> bool {
        if !self.is_alive(parent) || !self.is_alive(id) || self.node(id).parent.is_some() {
            return false;
        }
        if self.is_ancestor_or_self(id, parent) {
            return false;
        }
        self.node_mut(parent).children.push(id);
        self.node_mut(id).parent = Some(parent);
        let owner = self.node(parent).owner;
        self.set_subtree_owner(id, owner);
        true
    }

    /// Returns true if `id` refers to a live node.
    ///
    /// A `NodeId` is considered live if its slot exists and its generation matches
    /// the current generation stored in that slot.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node_opt(id).is_some()
    }

    /// Payload of a live node.
    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.node_opt(id).map(|n| &n.payload)
    }

    /// Mutable payload of a live node.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.node_opt_mut(id).map(|n| &mut n.payload)
    }

    /// Parent of `id`, or `None` for roots, detached nodes, and stale ids.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id)?.parent
    }

    /// Root of the tree `id` is attached to; a root is its own owner.
    pub fn owner(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id)?.owner
    }

    /// First child of `id`.
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id)?.children.first().copied()
    }

    /// Last child of `id`.
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id)?.children.last().copied()
    }

    /// Sibling directly before `id`.
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let pos = self.position_in_parent(parent, id)?;
        let prev = pos.checked_sub(1)?;
        self.node(parent).children.get(prev).copied()
    }

    /// Sibling directly after `id`.
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let pos = self.position_in_parent(parent, id)?;
        self.node(parent).children.get(pos + 1).copied()
    }

    /// Children of `id` in document order. Empty for stale ids.
    pub fn children(&self, id: NodeId) -> impl DoubleEndedIterator<Item = NodeId> + '_ {
        self.node_opt(id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
            .iter()
            .copied()
    }

    /// Depth-first, pre-order traversal over the descendants of `id` (not `id` itself).
    ///
    /// Nodes are visited in document order. Returns false if the callback stopped the
    /// traversal early.
    pub fn visit<F>(&self, id: NodeId, mut f: F) -> bool
    where
        F: FnMut(NodeId, &T) -> Visit,
    {
        let mut stack: Vec<NodeId> = self.children(id).rev().collect();
        while let Some(current) = stack.pop() {
            let Some(node) = self.node_opt(current) else {
                continue;
            };
            match f(current, &node.payload) {
                Visit::Continue => stack.extend(node.children.iter().rev().copied()),
                Visit::SkipChildren => {}
                Visit::Stop => return false,
            }
        }
        true
    }

    /// Descendants of `id` in the order [`Tree::visit`] reports them.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.visit(id, |n, _| {
            out.push(n);
            Visit::Continue
        });
        out
    }

    // --- internals ---

    fn alloc(&mut self, payload: T) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, payload));
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, payload)));
            self.generations.push(generation);
            (self.nodes.len() - 1, generation)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "NodeId uses 32-bit indices by design."
        )]
        let idx = idx as u32;
        NodeId::new(idx, generation)
    }

    fn free(&mut self, id: NodeId) -> Option<Node<T>> {
        let node = self.nodes.get_mut(id.idx())?.take()?;
        self.free_list.push(id.idx());
        Some(node)
    }

    /// Access a node; panics if `id` is stale. Only used after a liveness check.
    fn node(&self, id: NodeId) -> &Node<T> {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    /// Access a node mutably; panics if `id` is stale. Only used after a liveness check.
    fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    fn node_opt(&self, id: NodeId) -> Option<&Node<T>> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node<T>> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn position_in_parent(&self, parent: NodeId, id: NodeId) -> Option<usize> {
        self.node_opt(parent)?.children.iter().position(|c| *c == id)
    }

    fn unlink_parent(&mut self, id: NodeId, parent: NodeId) {
        let p = self.node_mut(parent);
        p.children.retain(|c| *c != id);
        self.node_mut(id).parent = None;
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, mut id: NodeId) -> bool {
        loop {
            if id == ancestor {
                return true;
            }
            match self.parent(id) {
                Some(p) => id = p,
                None => return false,
            }
        }
    }

    fn set_subtree_owner(&mut self, id: NodeId, owner: Option<NodeId>) {
        let mut stack = alloc::vec![id];
        while let Some(current) = stack.pop() {
            let node = self.node_mut(current);
            node.owner = owner;
            stack.extend(node.children.iter().copied());
        }
    }
}

impl<T> Node<T> {
    fn new(generation: u32, payload: T) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            owner: None,
            payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn sample() -> (Tree<&'static str>, NodeId, [NodeId; 4]) {
        // root
        // ├── a
        // │   └── a1
        // ├── b
        // └── c
        let mut tree = Tree::new();
        let root = tree.insert_root("root");
        let a = tree.append_child(root, "a").unwrap();
        let a1 = tree.append_child(a, "a1").unwrap();
        let b = tree.append_child(root, "b").unwrap();
        let c = tree.append_child(root, "c").unwrap();
        (tree, root, [a, a1, b, c])
    }

    #[test]
    fn visit_is_preorder_document_order() {
        let (tree, root, [a, a1, b, c]) = sample();
        assert_eq!(tree.descendants(root), vec![a, a1, b, c]);
        assert_eq!(tree.descendants(a), vec![a1]);
        assert!(tree.descendants(c).is_empty());
    }

    #[test]
    fn visit_skip_and_stop() {
        let (tree, root, [a, _a1, b, c]) = sample();
        let mut seen = Vec::new();
        let finished = tree.visit(root, |id, _| {
            seen.push(id);
            if id == a {
                Visit::SkipChildren
            } else {
                Visit::Continue
            }
        });
        assert!(finished);
        assert_eq!(seen, vec![a, b, c]);

        let mut seen = Vec::new();
        let finished = tree.visit(root, |id, _| {
            seen.push(id);
            if id == b { Visit::Stop } else { Visit::Continue }
        });
        assert!(!finished, "stop must be reported");
        assert_eq!(seen.last().copied(), Some(b));
    }

    #[test]
    fn sibling_navigation() {
        let (tree, root, [a, a1, b, c]) = sample();
        assert_eq!(tree.first_child(root), Some(a));
        assert_eq!(tree.last_child(root), Some(c));
        assert_eq!(tree.next_sibling(a), Some(b));
        assert_eq!(tree.prev_sibling(b), Some(a));
        assert_eq!(tree.prev_sibling(a), None);
        assert_eq!(tree.next_sibling(c), None);
        assert_eq!(tree.parent(a1), Some(a));
        assert_eq!(tree.parent(root), None);
        let reversed: Vec<_> = tree.children(root).rev().collect();
        assert_eq!(reversed, vec![c, b, a]);
    }

    #[test]
    fn insert_before_keeps_order() {
        let (mut tree, root, [a, _a1, b, c]) = sample();
        let x = tree.insert_before(b, "x").unwrap();
        let order: Vec<_> = tree.children(root).collect();
        assert_eq!(order, vec![a, x, b, c]);
        assert_eq!(tree.insert_before(root, "orphan"), None, "roots have no siblings");
    }

    #[test]
    fn owner_tracks_attachment() {
        let (mut tree, root, [a, a1, _b, _c]) = sample();
        assert_eq!(tree.owner(root), Some(root), "a root owns itself");
        assert_eq!(tree.owner(a1), Some(root));

        assert!(tree.detach(a));
        assert_eq!(tree.owner(a), None);
        assert_eq!(tree.owner(a1), None);
        assert!(!tree.detach(a), "already detached");

        assert!(tree.attach(root, a));
        assert_eq!(tree.owner(a1), Some(root));
        assert_eq!(tree.last_child(root), Some(a));
    }

    #[test]
    fn attach_rejects_cycles() {
        let (mut tree, _root, [a, a1, _b, _c]) = sample();
        assert!(tree.detach(a));
        assert!(!tree.attach(a1, a), "cannot attach a node beneath itself");
        assert!(!tree.attach(a, a), "cannot attach a node to itself");
    }

    #[test]
    fn remove_subtree_makes_ids_stale() {
        let (mut tree, root, [a, a1, b, _c]) = sample();
        assert_eq!(tree.len(), 5);
        assert_eq!(tree.remove(a), Some("a"));
        assert!(!tree.is_alive(a));
        assert!(!tree.is_alive(a1));
        assert!(tree.is_alive(b));
        assert_eq!(tree.first_child(root), Some(b));
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.remove(a), None, "removing twice is a no-op");
    }

    #[test]
    fn liveness_insert_remove_reuse() {
        let mut tree = Tree::new();
        let root = tree.insert_root(0);
        let a = tree.append_child(root, 1).unwrap();
        assert!(tree.is_alive(root));
        assert!(tree.is_alive(a));

        // Remove child; id becomes stale.
        tree.remove(a);
        assert!(!tree.is_alive(a));
        assert_eq!(tree.get(a), None);

        // Reuse slot by inserting a new node; old id must remain stale; new id is live.
        let b = tree.append_child(root, 2).unwrap();
        assert!(tree.is_alive(b));
        assert!(!tree.is_alive(a));
        if a.slot() == b.slot() {
            assert!(
                b.generation() > a.generation(),
                "generation must increase on reuse"
            );
        }
        assert_eq!(tree.append_child(a, 3), None, "stale parents are rejected");
    }

    #[test]
    fn payload_access() {
        let (mut tree, _root, [a, ..]) = sample();
        if let Some(p) = tree.get_mut(a) {
            *p = "renamed";
        }
        assert_eq!(tree.get(a), Some(&"renamed"));
    }
}

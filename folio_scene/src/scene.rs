// Copyright 2025 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The document root: metadata, element tree, layout helpers, queries, and invalidation.

use std::collections::HashMap;

use folio_events::EventBus;
use folio_tree::{NodeId, Tree, Visit};
use folio_units::{Length, Unit, format_number};
use kurbo::{Point, Rect, Size};
use serde_json::Value as Json;

use crate::blob::{Blob, CHILDREN_KEY, Store, TAG_KEY};
use crate::element::{Element, Layer, Node, Page, Shape};
use crate::error::{SceneError, StoreError};
use crate::geom;
use crate::meta::{self, SCHEMA_VERSION, SceneConfig};
use crate::props::{ChangeSet, PropertyFlags, PropertyStore, Value};

/// Type tag of a persisted scene.
pub const SCENE_TAG: &str = "scene";

/// Fractional digits shown when rendering lengths.
const DISPLAY_DECIMALS: usize = 3;

/// Request to repaint part of the scene.
///
/// Published on the scene's [`EventBus`]. An absent `area` means the whole scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InvalidationRequest {
    /// Region to repaint, in document coordinates; `None` for everything.
    pub area: Option<Rect>,
}

/// Root of a vector document.
///
/// Owns the element tree, the document metadata, and the event bus renderers subscribe to.
#[derive(Debug)]
pub struct Scene {
    tree: Tree<Node>,
    root: NodeId,
    meta: PropertyStore,
    events: EventBus,
    config: SceneConfig,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create an empty scene with default metadata and configuration.
    pub fn new() -> Self {
        Self::with_config(SceneConfig::default())
    }

    /// Create an empty scene with default metadata and the given configuration.
    pub fn with_config(config: SceneConfig) -> Self {
        let mut tree = Tree::new();
        let root = tree.insert_root(Node::Scene);
        Self {
            tree,
            root,
            meta: PropertyStore::new(meta::declarations()),
            events: EventBus::new(),
            config,
        }
    }

    /// Layout configuration.
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Id of the scene node itself.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Read access to the element tree.
    pub fn tree(&self) -> &Tree<Node> {
        &self.tree
    }

    /// Payload of a node.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.tree.get(id)
    }

    /// The scene `id` belongs to: the root id if `id` is attached to this scene.
    pub fn owner_scene(&self, id: NodeId) -> Option<NodeId> {
        self.tree.owner(id).filter(|owner| *owner == self.root)
    }

    /// The event bus invalidation requests are published on.
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Mutable event bus, for subscribing.
    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    // --- tree edits ---

    /// Append a page covering `rect` as the last child of the scene.
    pub fn add_page(&mut self, rect: Rect) -> Result<NodeId, SceneError> {
        self.add_node(self.root, Node::Page(Page::new(rect)))
    }

    /// Append a layer under `parent`.
    pub fn add_layer(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
    ) -> Result<NodeId, SceneError> {
        self.add_node(parent, Node::Layer(Layer::new(name)))
    }

    /// Append a shape under `parent`.
    pub fn add_shape(
        &mut self,
        parent: NodeId,
        geometry: Option<Rect>,
        stroke_width: f64,
    ) -> Result<NodeId, SceneError> {
        self.add_node(parent, Node::Shape(Shape::new(geometry, stroke_width)))
    }

    /// Remove an element and its subtree, returning the element.
    pub fn remove(&mut self, id: NodeId) -> Result<Node, SceneError> {
        if id == self.root {
            return Err(SceneError::RootRemoval);
        }
        if self.owner_scene(id).is_none() {
            return Err(SceneError::UnknownNode(id));
        }
        let area = self.subtree_bbox(id);
        let node = self.tree.remove(id).ok_or(SceneError::UnknownNode(id))?;
        if area.is_some() {
            self.invalidate_area(area);
        }
        Ok(node)
    }

    /// Replace a page's geometry without any overlap check.
    pub fn set_page_geometry(&mut self, page: NodeId, rect: Rect) -> Result<(), SceneError> {
        let before = self.subtree_bbox(page);
        let changes = self
            .tree
            .get_mut(page)
            .ok_or(SceneError::UnknownNode(page))?
            .as_page_mut()
            .ok_or(SceneError::NotAPage(page))?
            .set_geometry(rect)?;
        if !changes.is_empty() {
            self.invalidate_changed(page, before);
        }
        Ok(())
    }

    /// Move or resize a page, refusing rectangles that would crowd another page.
    ///
    /// The scene is left untouched when [`Scene::will_page_intersect_with_others`] reports a
    /// conflict.
    pub fn try_move_page(&mut self, page: NodeId, rect: Rect) -> Result<(), SceneError> {
        self.page(page)?;
        if self.will_page_intersect_with_others(page, rect) {
            tracing::debug!(?page, ?rect, "page move rejected: overlaps another page");
            return Err(SceneError::PageOverlap { page });
        }
        self.set_page_geometry(page, rect)
    }

    /// Replace a shape's geometry.
    pub fn set_shape_geometry(
        &mut self,
        shape: NodeId,
        geometry: Option<Rect>,
    ) -> Result<(), SceneError> {
        let before = self.subtree_bbox(shape);
        let target = self
            .tree
            .get_mut(shape)
            .ok_or(SceneError::UnknownNode(shape))?
            .as_shape_mut()
            .ok_or(SceneError::NotAShape(shape))?;
        let geometry = geometry.map(|r| r.abs());
        if target.geometry != geometry {
            target.geometry = geometry;
            self.invalidate_changed(shape, before);
        }
        Ok(())
    }

    /// The page at `id`.
    pub fn page(&self, id: NodeId) -> Result<&Page, SceneError> {
        self.tree
            .get(id)
            .ok_or(SceneError::UnknownNode(id))?
            .as_page()
            .ok_or(SceneError::NotAPage(id))
    }

    // --- metadata ---

    /// The metadata store.
    pub fn metadata(&self) -> &PropertyStore {
        &self.meta
    }

    /// Current value of a metadata property.
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.meta.get(name)
    }

    /// Write a metadata property.
    pub fn set_property(&mut self, name: &str, value: impl Into<Value>) -> Result<(), SceneError> {
        let changes = self.meta.set(name, value)?;
        self.after_properties_changed(&changes);
        Ok(())
    }

    /// Write several metadata properties; the change hook runs once for the batch.
    pub fn set_properties<'a, I>(&mut self, entries: I) -> Result<(), SceneError>
    where
        I: IntoIterator<Item = (&'a str, Value)>,
    {
        let changes = self.meta.set_many(entries)?;
        self.after_properties_changed(&changes);
        Ok(())
    }

    /// Restore every metadata default.
    pub fn reset_metadata(&mut self) {
        let changes = self.meta.reset();
        self.after_properties_changed(&changes);
    }

    /// Schema version of the document.
    pub fn version(&self) -> i64 {
        self.meta.int(meta::VERSION).unwrap_or(SCHEMA_VERSION)
    }

    /// Displayed measurement unit.
    pub fn unit(&self) -> Unit {
        self.meta.unit(meta::UNIT).unwrap_or_default()
    }

    /// Change the displayed measurement unit. Repaints the whole scene if it changed.
    pub fn set_unit(&mut self, unit: Unit) -> Result<(), SceneError> {
        self.set_property(meta::UNIT, unit)
    }

    /// Snapping tolerance.
    pub fn snap_dist(&self) -> f64 {
        self.meta.number(meta::SNAP_DIST).unwrap_or(3.0)
    }

    /// Selection-picking tolerance.
    pub fn pick_dist(&self) -> f64 {
        self.meta.number(meta::PICK_DIST).unwrap_or(3.0)
    }

    /// Small cursor-nudge distance.
    pub fn cursor_distance_small(&self) -> f64 {
        self.meta.number(meta::CR_DIST_SMALL).unwrap_or(1.0)
    }

    /// Large cursor-nudge distance.
    pub fn cursor_distance_big(&self) -> f64 {
        self.meta.number(meta::CR_DIST_BIG).unwrap_or(10.0)
    }

    /// Angular constraint for constrained cursor movement, in radians.
    pub fn cursor_constraint(&self) -> f64 {
        self.meta.number(meta::CR_CONSTRAINT).unwrap_or(0.0)
    }

    /// Grid spacing.
    pub fn grid_size(&self) -> Size {
        Size::new(
            self.meta.number(meta::GRID_SIZE_X).unwrap_or(10.0),
            self.meta.number(meta::GRID_SIZE_Y).unwrap_or(10.0),
        )
    }

    /// Whether the grid is shown and snapped to.
    pub fn grid_active(&self) -> bool {
        self.meta.bool(meta::GRID_ACTIVE).unwrap_or(false)
    }

    fn after_properties_changed(&mut self, changes: &ChangeSet) {
        if self.meta.any_flagged(changes, PropertyFlags::REPAINT) {
            self.invalidate_area(None);
        }
    }

    // --- units ---

    /// Parse a number, length, or length expression in the current unit.
    pub fn string_to_length(&self, text: &str) -> Option<Length> {
        Length::parse(text, self.unit())
            .map_err(|err| tracing::debug!(%err, text, "length did not parse"))
            .ok()
    }

    /// Parse like [`Scene::string_to_length`] and convert the result to points.
    pub fn string_to_point(&self, text: &str) -> Option<f64> {
        self.string_to_length(text).map(Length::to_points)
    }

    /// Render `length` in the current unit, without a suffix.
    pub fn length_to_string(&self, length: Length) -> String {
        format_number(length.to_unit(self.unit()), DISPLAY_DECIMALS)
    }

    /// Render a value in points in the current unit, without a suffix.
    pub fn point_to_string(&self, value: f64) -> String {
        self.length_to_string(Length::points(value))
    }

    // --- spatial queries ---

    /// Paint box of the element at `id`.
    ///
    /// A layer paints through its descendants, so its box is their union. Pages and shapes
    /// use their own box; content hanging off a page does not widen it.
    pub fn paint_bbox(&self, id: NodeId) -> Option<Rect> {
        match self.tree.get(id)? {
            Node::Layer(_) => self.subtree_bbox(id),
            node => node.own_paint_bbox(),
        }
    }

    /// Union of the paint boxes of `id` and everything below it; the area a change repaints.
    fn subtree_bbox(&self, id: NodeId) -> Option<Rect> {
        let mut acc = self.tree.get(id)?.own_paint_bbox();
        self.tree.visit(id, |_, node| {
            if let Some(r) = node.own_paint_bbox() {
                acc = Some(geom::union(acc, r));
            }
            Visit::Continue
        });
        acc
    }

    /// Elements whose paint box relates to `rect`, in document order.
    ///
    /// With `inside == true` an element matches when its box intersects `rect`; with
    /// `inside == false` its box must lie entirely within `rect`. Elements without a
    /// paint box never match. This walks the whole tree.
    pub fn elements_by_bbox(&self, rect: Rect, inside: bool) -> Vec<NodeId> {
        let subtrees = self.subtree_boxes();
        let mut out = Vec::new();
        self.tree.visit(self.root, |id, node| {
            let bbox = match node {
                Node::Scene => None,
                Node::Layer(_) => subtrees.get(&id).copied(),
                _ => node.own_paint_bbox(),
            };
            if let Some(bbox) = bbox {
                let hit = if inside {
                    geom::intersects(rect, bbox)
                } else {
                    geom::contains(rect, bbox)
                };
                if hit {
                    out.push(id);
                }
            }
            Visit::Continue
        });
        out
    }

    /// Subtree boxes of every descendant that has one, children folded into parents.
    fn subtree_boxes(&self) -> HashMap<NodeId, Rect> {
        let order = self.tree.descendants(self.root);
        let mut boxes = HashMap::with_capacity(order.len());
        // Reverse pre-order sees every child before its parent.
        for &id in order.iter().rev() {
            let Some(node) = self.tree.get(id) else {
                continue;
            };
            let mut acc = node.own_paint_bbox();
            for child in self.tree.children(id) {
                if let Some(&r) = boxes.get(&child) {
                    acc = Some(geom::union(acc, r));
                }
            }
            if let Some(r) = acc {
                boxes.insert(id, r);
            }
        }
        boxes
    }

    // --- page layout ---

    /// Where a new page should go: right of the last page, or the origin if there is none.
    pub fn page_insert_position(&self) -> Point {
        self.tree
            .children(self.root)
            .rev()
            .find_map(|id| self.tree.get(id)?.as_page())
            .map_or(Point::ZERO, |page| {
                Point::new(page.x() + page.w() + self.config.page_spacing, page.y())
            })
    }

    /// True if `page_rect`, grown by the page spacing on every side, intersects the
    /// geometry of any page other than `page`.
    pub fn will_page_intersect_with_others(&self, page: NodeId, page_rect: Rect) -> bool {
        let candidate = geom::expand(page_rect.abs(), self.config.page_spacing);
        self.tree
            .children(self.root)
            .filter(|&id| id != page)
            .filter_map(|id| self.tree.get(id)?.as_page())
            .any(|other| geom::intersects(candidate, other.geometry_bbox()))
    }

    // --- invalidation ---

    /// Ask listeners to repaint `area`, or the whole scene when `area` is `None`.
    ///
    /// Does nothing when no listener is registered. Returns true if a request was published.
    pub fn invalidate_area(&mut self, area: Option<Rect>) -> bool {
        if !self.events.has_listener::<InvalidationRequest>() {
            return false;
        }
        tracing::trace!(?area, "invalidation requested");
        self.events.publish(&InvalidationRequest { area });
        true
    }

    fn invalidate_changed(&mut self, id: NodeId, before: Option<Rect>) {
        let area = match (before, self.subtree_bbox(id)) {
            (Some(a), after) => Some(geom::union(after, a)),
            (None, after) => after,
        };
        if area.is_some() {
            self.invalidate_area(area);
        }
    }

    // --- persistence ---

    /// Serialize the scene to a JSON document.
    pub fn to_json(&self) -> Result<String, StoreError> {
        let mut blob = Blob::new();
        self.store(&mut blob)?;
        blob.to_json_string()
    }

    /// Build a scene from a JSON document written by [`Scene::to_json`].
    pub fn from_json(text: &str) -> Result<Self, StoreError> {
        let blob = Blob::from_json_str(text)?;
        let mut scene = Self::new();
        scene.restore(&blob)?;
        Ok(scene)
    }

    fn add_node(&mut self, parent: NodeId, node: Node) -> Result<NodeId, SceneError> {
        if self.owner_scene(parent).is_none() {
            return Err(SceneError::UnknownNode(parent));
        }
        let area = node.own_paint_bbox();
        let id = self
            .tree
            .append_child(parent, node)
            .ok_or(SceneError::UnknownNode(parent))?;
        if area.is_some() {
            self.invalidate_area(area);
        }
        Ok(id)
    }

    fn store_children(&self, id: NodeId, blob: &mut Blob) -> Result<(), StoreError> {
        let mut children = Vec::new();
        for child in self.tree.children(id) {
            let Some(element) = self.tree.get(child).and_then(|n| n.as_element()) else {
                continue;
            };
            let mut child_blob = Blob::new();
            child_blob.write(TAG_KEY, Element::kind(element).tag())?;
            element.store(&mut child_blob)?;
            self.store_children(child, &mut child_blob)?;
            children.push(child_blob.into_json());
        }
        if !children.is_empty() {
            blob.insert_raw(CHILDREN_KEY, Json::Array(children));
        }
        Ok(())
    }

    /// Replace the root's children with those of the detached `staging` root.
    fn adopt_children(&mut self, staging: NodeId) {
        let old: Vec<NodeId> = self.tree.children(self.root).collect();
        for id in old {
            self.tree.remove(id);
        }
        let incoming: Vec<NodeId> = self.tree.children(staging).collect();
        for id in incoming {
            self.tree.detach(id);
            self.tree.attach(self.root, id);
        }
        self.tree.remove(staging);
    }
}

fn restore_children(tree: &mut Tree<Node>, parent: NodeId, blob: &Blob) -> Result<(), StoreError> {
    let Some(children) = blob.get(CHILDREN_KEY) else {
        return Ok(());
    };
    let Json::Array(items) = children else {
        return Err(StoreError::Malformed {
            key: CHILDREN_KEY.to_owned(),
        });
    };
    for item in items {
        let child_blob = Blob::try_from(item.clone())?;
        let node = Node::from_blob(&child_blob)?;
        let id = tree
            .append_child(parent, node)
            .ok_or_else(|| StoreError::Malformed {
                key: CHILDREN_KEY.to_owned(),
            })?;
        restore_children(tree, id, &child_blob)?;
    }
    Ok(())
}

impl Store for Scene {
    /// Write the element tree, then every metadata property keyed by name.
    ///
    /// Nothing reaches `blob` unless both steps succeed.
    fn store(&self, blob: &mut Blob) -> Result<(), StoreError> {
        let mut staged = Blob::new();
        staged.write(TAG_KEY, SCENE_TAG)?;
        self.store_children(self.root, &mut staged)?;
        self.meta.store_persisted(&mut staged)?;
        blob.merge(staged);
        tracing::debug!(entries = blob.len(), "scene stored");
        Ok(())
    }

    /// Replace the element tree and metadata with the contents of `blob`.
    ///
    /// Absent metadata keys take their defaults. On error the scene is unchanged.
    fn restore(&mut self, blob: &Blob) -> Result<(), StoreError> {
        if blob.tag() != Some(SCENE_TAG) {
            return Err(StoreError::UnexpectedTag {
                expected: SCENE_TAG,
                found: blob.tag().map(str::to_owned),
            });
        }
        let staging = self.tree.insert_root(Node::Scene);
        if let Err(err) = restore_children(&mut self.tree, staging, blob) {
            self.tree.remove(staging);
            return Err(err);
        }
        self.adopt_children(staging);

        let changes = self.meta.restore_persisted(blob);
        let version = self.version();
        if version != SCHEMA_VERSION {
            // No migrations exist yet; the document is read as-is.
            tracing::debug!(version, current = SCHEMA_VERSION, "document schema differs");
        }
        tracing::debug!(changed = changes.len(), "scene restored");
        self.invalidate_area(None);
        Ok(())
    }
}

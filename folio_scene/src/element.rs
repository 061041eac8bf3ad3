// Copyright 2025 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drawable elements and the tree payload that classifies them.

use kurbo::Rect;

use crate::blob::{Blob, Store};
use crate::error::{PropertyError, StoreError};
use crate::geom;
use crate::props::{ChangeSet, PropertyDecl, PropertyStore, Value};

/// Runtime type of an element.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ElementKind {
    /// A page with rectangular geometry.
    Page,
    /// A grouping node.
    Layer,
    /// A leaf with geometry and a stroke.
    Shape,
}

impl ElementKind {
    /// Type tag written to persisted blobs.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Layer => "layer",
            Self::Shape => "shape",
        }
    }

    /// Inverse of [`ElementKind::tag`].
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "page" => Some(Self::Page),
            "layer" => Some(Self::Layer),
            "shape" => Some(Self::Shape),
            _ => None,
        }
    }
}

/// Common surface of every drawable node.
pub trait Element: Store {
    /// Runtime type.
    fn kind(&self) -> ElementKind;

    /// Box enclosing what this element paints by itself, not counting its descendants.
    ///
    /// `None` when the element paints nothing of its own.
    fn paint_bbox(&self) -> Option<Rect>;
}

/// Page geometry property names.
pub mod page_props {
    /// Left edge.
    pub const X: &str = "x";
    /// Top edge.
    pub const Y: &str = "y";
    /// Width.
    pub const W: &str = "w";
    /// Height.
    pub const H: &str = "h";
}

/// A page: a rectangle in document coordinates that content is laid out on.
///
/// The rectangle a page is created with doubles as the defaults of its geometry properties.
#[derive(Clone, Debug)]
pub struct Page {
    props: PropertyStore,
}

impl PartialEq for Page {
    fn eq(&self, other: &Self) -> bool {
        self.props.iter().eq(other.props.iter())
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(Rect::ZERO)
    }
}

impl Page {
    /// A page covering `rect`.
    pub fn new(rect: Rect) -> Self {
        let rect = rect.abs();
        Self {
            props: PropertyStore::new(vec![
                PropertyDecl::new(page_props::X, rect.x0),
                PropertyDecl::new(page_props::Y, rect.y0),
                PropertyDecl::new(page_props::W, rect.width()),
                PropertyDecl::new(page_props::H, rect.height()),
            ]),
        }
    }

    /// Left edge.
    pub fn x(&self) -> f64 {
        self.props.number(page_props::X).unwrap_or_default()
    }

    /// Top edge.
    pub fn y(&self) -> f64 {
        self.props.number(page_props::Y).unwrap_or_default()
    }

    /// Width.
    pub fn w(&self) -> f64 {
        self.props.number(page_props::W).unwrap_or_default()
    }

    /// Height.
    pub fn h(&self) -> f64 {
        self.props.number(page_props::H).unwrap_or_default()
    }

    /// `(x, y, x + w, y + h)`.
    pub fn geometry_bbox(&self) -> Rect {
        Rect::new(self.x(), self.y(), self.x() + self.w(), self.y() + self.h())
    }

    /// Replace the geometry with `rect`.
    pub fn set_geometry(&mut self, rect: Rect) -> Result<ChangeSet, PropertyError> {
        let rect = rect.abs();
        self.props.set_many([
            (page_props::X, Value::Number(rect.x0)),
            (page_props::Y, Value::Number(rect.y0)),
            (page_props::W, Value::Number(rect.width())),
            (page_props::H, Value::Number(rect.height())),
        ])
    }

    /// The page's property store.
    pub fn props(&self) -> &PropertyStore {
        &self.props
    }
}

impl Element for Page {
    fn kind(&self) -> ElementKind {
        ElementKind::Page
    }

    fn paint_bbox(&self) -> Option<Rect> {
        Some(self.geometry_bbox())
    }
}

impl Store for Page {
    fn store(&self, blob: &mut Blob) -> Result<(), StoreError> {
        self.props.store_persisted(blob)
    }

    fn restore(&mut self, blob: &Blob) -> Result<(), StoreError> {
        self.props.restore_persisted(blob);
        Ok(())
    }
}

/// A grouping node. Paints nothing itself.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Layer {
    /// Display name.
    pub name: String,
}

impl Layer {
    /// A layer called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Element for Layer {
    fn kind(&self) -> ElementKind {
        ElementKind::Layer
    }

    fn paint_bbox(&self) -> Option<Rect> {
        None
    }
}

impl Store for Layer {
    fn store(&self, blob: &mut Blob) -> Result<(), StoreError> {
        blob.write("name", &self.name)
    }

    fn restore(&mut self, blob: &Blob) -> Result<(), StoreError> {
        self.name = blob.read("name")?.unwrap_or_default();
        Ok(())
    }
}

/// A leaf element: optional geometry stroked with a given width.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Shape {
    /// Geometry bounds; `None` for a shape without geometry.
    pub geometry: Option<Rect>,
    /// Stroke width, centered on the outline.
    pub stroke_width: f64,
}

impl Shape {
    /// A shape covering `geometry`, stroked with `stroke_width`.
    pub fn new(geometry: Option<Rect>, stroke_width: f64) -> Self {
        Self {
            geometry: geometry.map(|r| r.abs()),
            stroke_width,
        }
    }
}

impl Element for Shape {
    fn kind(&self) -> ElementKind {
        ElementKind::Shape
    }

    fn paint_bbox(&self) -> Option<Rect> {
        let half = self.stroke_width.max(0.0) / 2.0;
        self.geometry.map(|r| r.inflate(half, half))
    }
}

impl Store for Shape {
    fn store(&self, blob: &mut Blob) -> Result<(), StoreError> {
        if !self.stroke_width.is_finite() {
            return Err(StoreError::NonFinite {
                key: "strokeWidth".to_owned(),
            });
        }
        let bounds = match self.geometry {
            Some(r) if !r.is_finite() => {
                return Err(StoreError::NonFinite {
                    key: "bounds".to_owned(),
                });
            }
            Some(r) => Some([r.x0, r.y0, r.x1, r.y1]),
            None => None,
        };
        blob.write("bounds", &bounds)?;
        blob.write("strokeWidth", &self.stroke_width)
    }

    fn restore(&mut self, blob: &Blob) -> Result<(), StoreError> {
        let bounds: Option<[f64; 4]> = blob.read("bounds")?.flatten();
        self.geometry = bounds.map(|[x0, y0, x1, y1]| Rect::new(x0, y0, x1, y1).abs());
        self.stroke_width = blob.read("strokeWidth")?.unwrap_or_default();
        Ok(())
    }
}

/// Payload of a scene tree node.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    /// The document root.
    Scene,
    /// A page.
    Page(Page),
    /// A layer.
    Layer(Layer),
    /// A shape.
    Shape(Shape),
}

impl Node {
    /// The node as an element; `None` for the scene root.
    pub fn as_element(&self) -> Option<&dyn Element> {
        match self {
            Self::Scene => None,
            Self::Page(p) => Some(p),
            Self::Layer(l) => Some(l),
            Self::Shape(s) => Some(s),
        }
    }

    /// The node as a page.
    pub fn as_page(&self) -> Option<&Page> {
        match self {
            Self::Page(p) => Some(p),
            _ => None,
        }
    }

    /// The node as a mutable page.
    pub fn as_page_mut(&mut self) -> Option<&mut Page> {
        match self {
            Self::Page(p) => Some(p),
            _ => None,
        }
    }

    /// The node as a mutable shape.
    pub fn as_shape_mut(&mut self) -> Option<&mut Shape> {
        match self {
            Self::Shape(s) => Some(s),
            _ => None,
        }
    }

    /// Paint box of this node alone; empty boxes read as `None`.
    pub fn own_paint_bbox(&self) -> Option<Rect> {
        self.as_element()?
            .paint_bbox()
            .filter(|r| !geom::is_empty(*r))
    }

    /// Build an element node from a child blob, dispatching on its type tag.
    pub(crate) fn from_blob(blob: &Blob) -> Result<Self, StoreError> {
        let tag = blob.tag().ok_or(StoreError::UnexpectedTag {
            expected: "element",
            found: None,
        })?;
        let kind =
            ElementKind::from_tag(tag).ok_or_else(|| StoreError::UnknownElement(tag.to_owned()))?;
        Ok(match kind {
            ElementKind::Page => {
                let mut page = Page::default();
                page.restore(blob)?;
                Self::Page(page)
            }
            ElementKind::Layer => {
                let mut layer = Layer::default();
                layer.restore(blob)?;
                Self::Layer(layer)
            }
            ElementKind::Shape => {
                let mut shape = Shape::default();
                shape.restore(blob)?;
                Self::Shape(shape)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_geometry_from_props() {
        let mut page = Page::new(Rect::new(10.0, 20.0, 110.0, 70.0));
        assert_eq!((page.x(), page.y(), page.w(), page.h()), (10.0, 20.0, 100.0, 50.0));
        assert_eq!(page.geometry_bbox(), Rect::new(10.0, 20.0, 110.0, 70.0));

        let changes = page.set_geometry(Rect::new(10.0, 20.0, 60.0, 70.0)).unwrap();
        assert_eq!(changes.iter().collect::<Vec<_>>(), vec!["w"]);
    }

    #[test]
    fn pages_compare_by_geometry() {
        let created = Page::new(Rect::new(0.0, 0.0, 50.0, 80.0));
        let mut moved = Page::default();
        moved.set_geometry(Rect::new(0.0, 0.0, 50.0, 80.0)).unwrap();
        assert_eq!(created, moved);
        assert_ne!(created, Page::default());
    }

    #[test]
    fn shape_paint_box_includes_stroke() {
        let shape = Shape::new(Some(Rect::new(0.0, 0.0, 10.0, 10.0)), 2.0);
        assert_eq!(shape.paint_bbox(), Some(Rect::new(-1.0, -1.0, 11.0, 11.0)));
        assert_eq!(Shape::new(None, 2.0).paint_bbox(), None);
    }

    #[test]
    fn empty_boxes_read_as_none() {
        let flat = Node::Shape(Shape::new(Some(Rect::new(0.0, 5.0, 10.0, 5.0)), 0.0));
        assert_eq!(flat.own_paint_bbox(), None);
        assert_eq!(Node::Layer(Layer::new("l")).own_paint_bbox(), None);
        assert_eq!(Node::Scene.own_paint_bbox(), None);
    }

    #[test]
    fn element_blob_round_trip() {
        let nodes = [
            Node::Page(Page::new(Rect::new(0.0, 0.0, 595.0, 842.0))),
            Node::Layer(Layer::new("Background")),
            Node::Shape(Shape::new(Some(Rect::new(1.0, 2.0, 3.0, 4.0)), 0.5)),
            Node::Shape(Shape::new(None, 1.0)),
        ];
        for node in nodes {
            let element = node.as_element().unwrap();
            let mut blob = Blob::new();
            blob.write(crate::blob::TAG_KEY, element.kind().tag()).unwrap();
            element.store(&mut blob).unwrap();
            assert_eq!(Node::from_blob(&blob).unwrap(), node);
        }
    }

    #[test]
    fn unknown_tags_are_rejected() {
        let mut blob = Blob::new();
        blob.write(crate::blob::TAG_KEY, "ellipse").unwrap();
        assert!(matches!(
            Node::from_blob(&blob),
            Err(StoreError::UnknownElement(tag)) if tag == "ellipse"
        ));
        assert!(matches!(
            Node::from_blob(&Blob::new()),
            Err(StoreError::UnexpectedTag { found: None, .. })
        ));
    }
}

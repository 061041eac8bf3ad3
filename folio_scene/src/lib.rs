// Copyright 2025 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Folio Scene: the root of a vector document.
//!
//! A [`Scene`] owns the element tree of a document together with its metadata and answers the
//! questions an editor asks of the whole document.
//!
//! - Keeps typed metadata (schema version, displayed unit, snapping and grid settings) and
//!   persists it alongside the elements.
//! - Converts user-entered length expressions to points and renders points back in the
//!   displayed unit.
//! - Finds elements by paint box, either by overlap or by full containment.
//! - Places new pages and checks that a page keeps its distance from the others.
//! - Publishes [`InvalidationRequest`]s on an [`EventBus`](folio_events::EventBus) when
//!   something visible changes.
//!
//! ## API overview
//!
//! - [`Scene`]: the document root.
//! - [`Node`], [`Page`], [`Layer`], [`Shape`]: tree payloads and the [`Element`] trait.
//! - [`PropertyStore`] and [`Value`]: declared, typed properties with change sets.
//! - [`Blob`] and [`Store`]: the persisted key/value form.
//! - [`meta`]: metadata keys and defaults.
//!
//! ## Query modes
//!
//! [`Scene::elements_by_bbox`] takes an `inside` flag whose meaning is the reverse of what the
//! name suggests: `true` selects every element whose paint box *intersects* the query, `false`
//! only those whose paint box lies *entirely within* it. Callers rely on this; it is kept.
//!
//! # Example
//!
//! ```rust
//! use folio_events::Outcome;
//! use folio_scene::{InvalidationRequest, Scene};
//! use folio_units::Unit;
//! use kurbo::{Point, Rect};
//!
//! let mut scene = Scene::new();
//! scene.add_page(Rect::new(0.0, 0.0, 595.0, 842.0)).unwrap();
//!
//! // The next page goes to the right, one spacing away, and keeps clear of the first.
//! let at = scene.page_insert_position();
//! assert_eq!(at, Point::new(605.0, 0.0));
//! let second = scene.add_page(Rect::from_origin_size(at, (595.0, 842.0))).unwrap();
//! let placed = scene.page(second).unwrap().geometry_bbox();
//! assert!(!scene.will_page_intersect_with_others(second, placed));
//!
//! // Sliding it halfway over the first page is refused.
//! let crowded = Rect::new(300.0, 0.0, 895.0, 842.0);
//! assert!(scene.will_page_intersect_with_others(second, crowded));
//! assert!(scene.try_move_page(second, crowded).is_err());
//!
//! scene.events_mut().subscribe(|req: &InvalidationRequest| {
//!     assert_eq!(req.area, None);
//!     Outcome::Continue
//! });
//! scene.set_unit(Unit::Millimeters).unwrap();
//! assert_eq!(scene.point_to_string(72.0), "25.4");
//! assert_eq!(scene.string_to_point("1in"), Some(72.0));
//! ```

mod blob;
mod element;
mod error;
pub mod geom;
pub mod meta;
mod props;
mod scene;

pub use blob::{Blob, CHILDREN_KEY, Store, TAG_KEY};
pub use element::{Element, ElementKind, Layer, Node, Page, Shape, page_props};
pub use error::{PropertyError, SceneError, StoreError};
pub use meta::SceneConfig;
pub use props::{ChangeSet, PropertyDecl, PropertyFlags, PropertyStore, Value};
pub use scene::{InvalidationRequest, SCENE_TAG, Scene};

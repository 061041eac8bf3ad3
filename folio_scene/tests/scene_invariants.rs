// Copyright 2025 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property-based checks for scene queries, page layout, and persistence.
//!
//! Coordinates are drawn from small integers (or quarters) so every sum and every JSON
//! round trip is exact.

use folio_scene::{Scene, geom, meta};
use folio_units::Unit;
use kurbo::Rect;
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn rect_strategy() -> impl Strategy<Value = Rect> {
    (-200i32..200, -200i32..200, 1i32..150, 1i32..150).prop_map(|(x, y, w, h)| {
        Rect::from_origin_size((f64::from(x), f64::from(y)), (f64::from(w), f64::from(h)))
    })
}

fn unit_strategy() -> impl Strategy<Value = Unit> {
    proptest::sample::select(Unit::ALL.to_vec())
}

fn quarter() -> impl Strategy<Value = f64> {
    (0u16..400).prop_map(|q| f64::from(q) / 4.0)
}

fn scene_with_shapes(rects: &[Rect]) -> (Scene, Vec<folio_tree::NodeId>) {
    let mut scene = Scene::new();
    let root = scene.root();
    let ids = rects
        .iter()
        .map(|r| scene.add_shape(root, Some(*r), 0.0).unwrap())
        .collect();
    (scene, ids)
}

// ── Bounding-box queries ────────────────────────────────────────────────

proptest! {
    #[test]
    fn query_results_match_predicates(
        rects in prop::collection::vec(rect_strategy(), 0..12),
        query in rect_strategy(),
    ) {
        let (scene, ids) = scene_with_shapes(&rects);
        let overlapping = scene.elements_by_bbox(query, true);
        let contained = scene.elements_by_bbox(query, false);

        for (id, r) in ids.iter().zip(&rects) {
            prop_assert_eq!(overlapping.contains(id), geom::intersects(query, *r));
            prop_assert_eq!(contained.contains(id), geom::contains(query, *r));
        }
    }

    #[test]
    fn contained_elements_also_overlap(
        rects in prop::collection::vec(rect_strategy(), 0..12),
        query in rect_strategy(),
    ) {
        let (scene, _) = scene_with_shapes(&rects);
        let overlapping = scene.elements_by_bbox(query, true);
        for id in scene.elements_by_bbox(query, false) {
            prop_assert!(overlapping.contains(&id));
        }
    }

    #[test]
    fn results_follow_document_order(
        rects in prop::collection::vec(rect_strategy(), 0..12),
    ) {
        let (scene, ids) = scene_with_shapes(&rects);
        let everything = Rect::new(-1000.0, -1000.0, 1000.0, 1000.0);
        prop_assert_eq!(scene.elements_by_bbox(everything, false), ids);
    }
}

// ── Page layout ─────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn appended_pages_never_crowd_each_other(
        sizes in prop::collection::vec((1u16..1000, 1u16..1000), 1..8),
    ) {
        let mut scene = Scene::new();
        let mut pages = Vec::new();
        for (w, h) in sizes {
            let at = scene.page_insert_position();
            let rect = Rect::from_origin_size(at, (f64::from(w), f64::from(h)));
            let id = scene.add_page(rect).unwrap();
            pages.push((id, rect));
        }
        for (id, rect) in &pages {
            prop_assert!(!scene.will_page_intersect_with_others(*id, *rect));
        }
    }

    #[test]
    fn overlapping_moves_are_refused(a in rect_strategy(), b in rect_strategy()) {
        let mut scene = Scene::new();
        let first = scene.add_page(a).unwrap();
        let second = scene.add_page(Rect::new(5000.0, 5000.0, 5010.0, 5010.0)).unwrap();
        let crowded = geom::intersects(geom::expand(b, 10.0), a);
        let moved = scene.try_move_page(second, b);
        prop_assert_eq!(moved.is_err(), crowded);
        prop_assert_eq!(scene.page(first).unwrap().geometry_bbox(), a);
    }
}

// ── Persistence ─────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn json_round_trip_preserves_document(
        version in 0i64..100,
        unit in unit_strategy(),
        snap in quarter(),
        pick in quarter(),
        cursor in (quarter(), quarter()),
        constraint in quarter(),
        grid in (quarter(), quarter()),
        active in any::<bool>(),
        pages in prop::collection::vec(rect_strategy(), 0..5),
    ) {
        let mut scene = Scene::new();
        scene.set_property(meta::VERSION, version).unwrap();
        scene.set_unit(unit).unwrap();
        scene.set_property(meta::SNAP_DIST, snap).unwrap();
        scene.set_property(meta::PICK_DIST, pick).unwrap();
        scene.set_property(meta::CR_DIST_SMALL, cursor.0).unwrap();
        scene.set_property(meta::CR_DIST_BIG, cursor.1).unwrap();
        scene.set_property(meta::CR_CONSTRAINT, constraint).unwrap();
        scene.set_property(meta::GRID_SIZE_X, grid.0).unwrap();
        scene.set_property(meta::GRID_SIZE_Y, grid.1).unwrap();
        scene.set_property(meta::GRID_ACTIVE, active).unwrap();
        for r in &pages {
            scene.add_page(*r).unwrap();
        }

        let text = scene.to_json().unwrap();
        let back = Scene::from_json(&text).unwrap();

        prop_assert_eq!(back.metadata(), scene.metadata());
        prop_assert_eq!(back.version(), version);
        prop_assert_eq!(back.pick_dist(), pick);
        prop_assert_eq!(back.cursor_distance_small(), cursor.0);
        prop_assert_eq!(back.cursor_distance_big(), cursor.1);
        prop_assert_eq!(back.cursor_constraint(), constraint);
        prop_assert_eq!(back.page_insert_position(), scene.page_insert_position());
        let geometries: Vec<Rect> = back
            .tree()
            .children(back.root())
            .filter_map(|id| back.node(id)?.as_page().map(|p| p.geometry_bbox()))
            .collect();
        prop_assert_eq!(geometries, pages);
    }
}

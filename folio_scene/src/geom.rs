// Copyright 2025 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rectangle predicates shared by queries and layout.
//!
//! Inputs are assumed to be finite and normalized (`x0 <= x1`, `y0 <= y1`).

use kurbo::Rect;

/// True if `r` has no positive width or no positive height.
pub fn is_empty(r: Rect) -> bool {
    !(r.width() > 0.0 && r.height() > 0.0)
}

/// True if the interiors of `a` and `b` overlap. Touching edges do not intersect.
pub fn intersects(a: Rect, b: Rect) -> bool {
    a.x0 < b.x1 && b.x0 < a.x1 && a.y0 < b.y1 && b.y0 < a.y1
}

/// True if `inner` lies within `outer`, edges included.
pub fn contains(outer: Rect, inner: Rect) -> bool {
    outer.x0 <= inner.x0 && outer.y0 <= inner.y0 && inner.x1 <= outer.x1 && inner.y1 <= outer.y1
}

/// `r` grown by `d` on every side.
pub fn expand(r: Rect, d: f64) -> Rect {
    r.inflate(d, d)
}

/// Union of an optional accumulator with `r`.
pub fn union(acc: Option<Rect>, r: Rect) -> Rect {
    match acc {
        Some(a) => a.union(r),
        None => r,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_edges_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 20.0, 10.0);
        assert!(!intersects(a, b));
        assert!(intersects(a, Rect::new(9.0, 9.0, 20.0, 20.0)));
    }

    #[test]
    fn containment_includes_edges() {
        let outer = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(contains(outer, outer));
        assert!(contains(outer, Rect::new(2.0, 2.0, 3.0, 3.0)));
        assert!(!contains(outer, Rect::new(-1.0, 2.0, 3.0, 3.0)));
    }

    #[test]
    fn degenerate_boxes_are_empty() {
        assert!(is_empty(Rect::ZERO));
        assert!(is_empty(Rect::new(0.0, 0.0, 10.0, 0.0)));
        assert!(!is_empty(Rect::new(0.0, 0.0, 1.0, 1.0)));
    }

    #[test]
    fn expand_and_union() {
        let r = Rect::new(0.0, 0.0, 100.0, 50.0);
        assert_eq!(expand(r, 10.0), Rect::new(-10.0, -10.0, 110.0, 60.0));
        assert_eq!(union(None, r), r);
        assert_eq!(
            union(Some(r), Rect::new(200.0, 0.0, 210.0, 10.0)),
            Rect::new(0.0, 0.0, 210.0, 50.0)
        );
    }
}

// Copyright 2025 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lay out a few pages, draw on one, query by box, and round-trip the document.

use folio_events::Outcome;
use folio_scene::{InvalidationRequest, Scene};
use folio_units::Unit;
use kurbo::Rect;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut scene = Scene::new();
    scene.events_mut().subscribe(|req: &InvalidationRequest| {
        match req.area {
            Some(area) => println!("repaint {area:?}"),
            None => println!("repaint everything"),
        }
        Outcome::Continue
    });

    // A4 portrait, three times in a row.
    let mut pages = Vec::new();
    for _ in 0..3 {
        let at = scene.page_insert_position();
        pages.push(scene.add_page(Rect::from_origin_size(at, (595.0, 842.0)))?);
    }

    // Dragging the last page onto the first is refused.
    if let Err(err) = scene.try_move_page(pages[2], Rect::new(300.0, 0.0, 895.0, 842.0)) {
        println!("move refused: {err}");
    }

    let layer = scene.add_layer(scene.root(), "ink")?;
    let stroke = scene.add_shape(layer, Some(Rect::new(40.0, 40.0, 200.0, 120.0)), 2.0)?;

    let query = Rect::new(0.0, 0.0, 300.0, 300.0);
    println!("overlapping: {:?}", scene.elements_by_bbox(query, true));
    println!("contained:   {:?}", scene.elements_by_bbox(query, false));
    println!("shape paints {:?}", scene.paint_bbox(stroke));

    scene.set_unit(Unit::Millimeters)?;
    println!("page width: {} mm", scene.point_to_string(595.0));
    if let Some(points) = scene.string_to_point("10cm + 5") {
        println!("10cm + 5 = {points} pt");
    }

    let json = scene.to_json()?;
    let restored = Scene::from_json(&json)?;
    println!(
        "restored {} nodes, unit {}",
        restored.tree().len(),
        restored.unit()
    );
    Ok(())
}

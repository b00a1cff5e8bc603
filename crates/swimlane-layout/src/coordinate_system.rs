//! Orientation mapping.
//!
//! Placement works top-to-bottom: `x` runs across a rank and `y` along the ranks, growing away
//! from rank 0. These helpers convert sizes into that space and results back out of it.
//! `extent` is the total length of the layout along the rank axis.

use crate::config::Orientation;
use swimlane_graph::{Point, Rect};

/// Host `(width, height)` to layout `(cross, along)` size.
pub fn adjust_size(orientation: Orientation, width: f64, height: f64) -> (f64, f64) {
    if orientation.is_horizontal() {
        (height, width)
    } else {
        (width, height)
    }
}

pub fn undo_rect(orientation: Orientation, rect: Rect, extent: f64) -> Rect {
    match orientation {
        Orientation::North => rect,
        Orientation::South => Rect::new(rect.x, extent - rect.bottom(), rect.width, rect.height),
        Orientation::West => Rect::new(rect.y, rect.x, rect.height, rect.width),
        Orientation::East => Rect::new(extent - rect.bottom(), rect.x, rect.height, rect.width),
    }
}

pub fn undo_point(orientation: Orientation, point: Point, extent: f64) -> Point {
    match orientation {
        Orientation::North => point,
        Orientation::South => Point::new(point.x, extent - point.y),
        Orientation::West => Point::new(point.y, point.x),
        Orientation::East => Point::new(extent - point.y, point.x),
    }
}

//! Geometry primitives shared by the host model and the layout engine.
//!
//! These are plain `Clone` values. The engine always clones a geometry, edits the clone and
//! writes it back; shared geometry is never mutated in place.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Smallest rectangle containing both `self` and `other`.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect {
            x,
            y,
            width: self.right().max(other.right()) - x,
            height: self.bottom().max(other.bottom()) - y,
        }
    }
}

/// Cell geometry: bounds relative to the parent cell, plus edge waypoints.
///
/// A `relative` geometry marks a port: a cell attached to its owner vertex rather than laid out
/// on its own.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Geometry {
    pub bounds: Rect,
    pub relative: bool,
    pub points: Vec<Point>,
}

impl Geometry {
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            relative: false,
            points: Vec::new(),
        }
    }

    pub fn relative(bounds: Rect) -> Self {
        Self {
            bounds,
            relative: true,
            points: Vec::new(),
        }
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        if !self.relative {
            self.bounds.x += dx;
            self.bounds.y += dy;
        }
        for p in &mut self.points {
            p.x += dx;
            p.y += dy;
        }
    }
}

//! Canvas coordinates

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// A point in canvas space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.0}, {:.0})", self.x, self.y)
    }
}

/// Default distance nodes keep from the canvas edge
pub const DEFAULT_CANVAS_MARGIN: f64 = 20.0;

/// Canvas size plus the margin node positions are clamped to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasBounds {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
}

impl Default for CanvasBounds {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

impl CanvasBounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            margin: DEFAULT_CANVAS_MARGIN,
        }
    }

    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin.max(0.0);
        self
    }

    pub fn min_x(&self) -> f64 {
        self.margin
    }

    pub fn max_x(&self) -> f64 {
        (self.width - self.margin).max(self.margin)
    }

    pub fn min_y(&self) -> f64 {
        self.margin
    }

    pub fn max_y(&self) -> f64 {
        (self.height - self.margin).max(self.margin)
    }

    /// Clamp a point into `[margin, width - margin] x [margin, height - margin]`
    pub fn clamp(&self, point: Point) -> Point {
        Point::new(
            point.x.max(self.min_x()).min(self.max_x()),
            point.y.max(self.min_y()).min(self.max_y()),
        )
    }

    pub fn contains(&self, point: Point) -> bool {
        (self.min_x()..=self.max_x()).contains(&point.x)
            && (self.min_y()..=self.max_y()).contains(&point.y)
    }
}

/*
This code is part of the stormcatchments library.
Authors: Thomas Ott
Created: 02/03/2026
Last Modified: 14/10/2026
License: MIT
*/
use geo::{Coord, Point};
use std::fmt;

/// A 2-D point, with x and y fields.
#[derive(Default, Copy, Clone, Debug)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl fmt::Display for Point2D {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = format!("(x: {}, y: {})", self.x, self.y);
        write!(f, "{}", s)
    }
}

impl Point2D {
    /// Creates a new Point2D,
    pub fn new(x: f64, y: f64) -> Point2D {
        Point2D { x, y }
    }

    /// Calculate Euclidean distance between the point and another.
    pub fn distance(&self, other: &Self) -> f64 {
        self.distance_squared(other).sqrt()
    }

    pub fn distance_squared(&self, other: &Self) -> f64 {
        (self.x - other.x) * (self.x - other.x) + (self.y - other.y) * (self.y - other.y)
    }

    /// Rounds both coordinates to a fixed number of decimal places. Every
    /// coordinate that becomes a graph node goes through here.
    pub fn round(&self, decimals: u32) -> Point2D {
        let m = 10f64.powi(decimals as i32);
        Point2D::new((self.x * m).round() / m, (self.y * m).round() / m)
    }

    pub fn to_array(&self) -> [f64; 2] {
        [self.x, self.y]
    }
}

impl Eq for Point2D {}

impl PartialEq for Point2D {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl From<Point2D> for Coord<f64> {
    fn from(p: Point2D) -> Coord<f64> {
        Coord { x: p.x, y: p.y }
    }
}

impl From<Point2D> for Point<f64> {
    fn from(p: Point2D) -> Point<f64> {
        Point::new(p.x, p.y)
    }
}

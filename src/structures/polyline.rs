/*
This code is part of the stormcatchments library.
Authors: Thomas Ott
Created: 02/03/2026
Last Modified: 14/10/2026
License: MIT
*/

use crate::structures::{LineSegment, Point2D};
use std::ops::Index;

#[derive(Default, Clone, Debug, PartialEq)]
pub struct Polyline {
    pub vertices: Vec<Point2D>,
    pub id: usize,
}

impl Index<usize> for Polyline {
    type Output = Point2D;

    fn index(&self, index: usize) -> &Point2D {
        &self.vertices[index]
    }
}

impl Polyline {
    /// Creates a new Polyline from vertices
    pub fn new(vertices: &[Point2D], id: usize) -> Polyline {
        Polyline {
            vertices: vertices.to_vec(),
            id,
        }
    }

    /// returns the number of vertices
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Returns the feature geometric length.
    pub fn length(&self) -> f64 {
        self.vertices
            .windows(2)
            .map(|w| w[0].distance(&w[1]))
            .sum()
    }

    /// Explodes the polyline into its consecutive 2-vertex segments, rounding
    /// each vertex to `decimals`. Every segment keeps the line's id.
    pub fn segments(&self, decimals: u32) -> Vec<LineSegment> {
        self.vertices
            .windows(2)
            .map(|w| LineSegment::new(w[0].round(decimals), w[1].round(decimals), self.id))
            .collect()
    }
}

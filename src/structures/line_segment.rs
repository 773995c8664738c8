/*
This code is part of the stormcatchments library.
Authors: Thomas Ott
Created: 02/03/2026
Last Modified: 14/10/2026
License: MIT
*/

use crate::structures::Point2D;
use geo::{Coord, Line};

/// A data structure to hold line segments, defined by
/// starting and ending points, along with the id of the
/// line feature the segment was exploded from.
#[derive(Default, Copy, Clone, Debug, PartialEq)]
pub struct LineSegment {
    pub p1: Point2D,
    pub p2: Point2D,
    pub src_index: usize,
}

impl LineSegment {
    /// Creates a new LineSegment.
    pub fn new(p1: Point2D, p2: Point2D, src_index: usize) -> LineSegment {
        LineSegment { p1, p2, src_index }
    }

    pub fn length(&self) -> f64 {
        self.p1.distance(&self.p2)
    }

    /// Returns whichever end vertex lies closest to `p`, with its distance.
    pub fn nearest_vertex(&self, p: &Point2D) -> (Point2D, f64) {
        let d1 = self.p1.distance(p);
        let d2 = self.p2.distance(p);
        if d1 <= d2 {
            (self.p1, d1)
        } else {
            (self.p2, d2)
        }
    }

    pub fn to_line(&self) -> Line<f64> {
        Line::new(Coord::from(self.p1), Coord::from(self.p2))
    }
}

#[cfg(test)]
mod test {
    use super::LineSegment;
    use crate::structures::Point2D;

    #[test]
    fn test_nearest_vertex() {
        let seg = LineSegment::new(Point2D::new(0.0, 0.0), Point2D::new(10.0, 0.0), 1);
        let (v, d) = seg.nearest_vertex(&Point2D::new(8.0, 1.0));
        assert_eq!(v, Point2D::new(10.0, 0.0));
        assert!((d - 5f64.sqrt()).abs() < 1e-12);
        assert_eq!(seg.length(), 10.0);
    }
}

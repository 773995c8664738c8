/*
This code is part of the stormcatchments library.
Authors: Thomas Ott
Created: 02/03/2026
Last Modified: 14/10/2026
License: MIT
*/
use super::Point2D;
use std::fmt;

/// A graph node identifier built from a coordinate rounded to a fixed number
/// of decimals. The coordinate is stored as scaled integers so that a line
/// vertex and a point feature that round to the same value hash identically.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeKey {
    x: i64,
    y: i64,
    decimals: u32,
}

impl NodeKey {
    pub fn new(p: &Point2D, decimals: u32) -> NodeKey {
        let m = 10f64.powi(decimals as i32);
        NodeKey {
            x: (p.x * m).round() as i64,
            y: (p.y * m).round() as i64,
            decimals,
        }
    }

    /// The rounded coordinate this key stands for.
    pub fn point(&self) -> Point2D {
        let m = 10f64.powi(self.decimals as i32);
        Point2D::new(self.x as f64 / m, self.y as f64 / m)
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let p = self.point();
        write!(f, "({}, {})", p.x, p.y)
    }
}

#[cfg(test)]
mod test {
    use super::NodeKey;
    use crate::structures::Point2D;

    #[test]
    fn test_keys_match_after_rounding() {
        let vertex = Point2D::new(484636.1234999, 237170.5);
        let pt = Point2D::new(484636.1230001, 237170.4999);
        assert_eq!(NodeKey::new(&vertex, 3), NodeKey::new(&pt, 3));
        assert_ne!(NodeKey::new(&vertex, 6), NodeKey::new(&pt, 6));
    }

    #[test]
    fn test_point_round_trip() {
        let key = NodeKey::new(&Point2D::new(10.25, -3.5), 2);
        assert_eq!(key.point(), Point2D::new(10.25, -3.5));
        assert_eq!(format!("{}", key), "(10.25, -3.5)");
    }
}

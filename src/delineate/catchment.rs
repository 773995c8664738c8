/*
This code is part of the stormcatchments library.
Authors: Thomas Ott
Created: 23/03/2026
Last Modified: 14/10/2026
License: MIT
*/

use super::Reproject;
use crate::error::{Result, StormError};
use crate::structures::Point2D;
use crate::vector::Crs;
use geo::{Area, BooleanOps, Intersects, MultiPolygon, Point, Polygon};

/// A (multi-)polygon catchment tagged with its coordinate reference system.
#[derive(Clone, Debug, PartialEq)]
pub struct Catchment {
    pub geometry: MultiPolygon<f64>,
    pub crs: Crs,
}

impl Catchment {
    pub fn new(geometry: MultiPolygon<f64>, crs: Crs) -> Catchment {
        Catchment { geometry, crs }
    }

    pub fn from_polygon(polygon: Polygon<f64>, crs: Crs) -> Catchment {
        Catchment::new(MultiPolygon::new(vec![polygon]), crs)
    }

    pub fn area(&self) -> f64 {
        self.geometry.unsigned_area()
    }

    pub fn is_empty(&self) -> bool {
        self.geometry.0.is_empty()
    }

    /// Points on the boundary count as inside.
    pub fn contains_point(&self, p: &Point2D) -> bool {
        self.geometry.intersects(&Point::from(*p))
    }

    pub fn difference(&self, other: &Catchment) -> Result<Catchment> {
        self.check_crs(other)?;
        Ok(Catchment::new(self.geometry.difference(&other.geometry), self.crs))
    }

    /// Union of both catchments, dissolved into one multipolygon.
    pub fn union(&self, other: &Catchment) -> Result<Catchment> {
        self.check_crs(other)?;
        Ok(Catchment::new(self.geometry.union(&other.geometry), self.crs))
    }

    /// The catchment expressed in `crs`. A reprojector is only needed when
    /// the systems differ.
    pub fn to_crs(&self, crs: Crs, reprojector: Option<&dyn Reproject>) -> Result<Catchment> {
        if crs == self.crs {
            return Ok(self.clone());
        }
        match reprojector {
            Some(r) => Ok(Catchment::new(r.reproject(&self.geometry, self.crs, crs)?, crs)),
            None => Err(StormError::Configuration(format!(
                "cannot reproject catchment from {} to {} without a reprojector",
                self.crs, crs
            ))),
        }
    }

    fn check_crs(&self, other: &Catchment) -> Result<()> {
        if self.crs != other.crs {
            return Err(StormError::Configuration(format!(
                "catchments in {} and {} cannot be overlaid",
                self.crs, other.crs
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::Catchment;
    use crate::fixtures::{rect, ShiftReprojector, EPSG};
    use crate::structures::Point2D;
    use crate::vector::Crs;

    #[test]
    fn test_overlay() {
        let crs = Crs::from_epsg(EPSG);
        let base = Catchment::from_polygon(rect(0.0, 0.0, 10.0, 10.0), crs);
        let hole = Catchment::from_polygon(rect(0.0, 0.0, 4.0, 10.0), crs);
        let diff = base.difference(&hole).unwrap();
        assert!((diff.area() - 60.0).abs() < 1e-6);
        assert!(!diff.contains_point(&Point2D::new(2.0, 5.0)));
        assert!(diff.contains_point(&Point2D::new(4.0, 5.0)));

        let extra = Catchment::from_polygon(rect(20.0, 0.0, 25.0, 2.0), crs);
        let joined = diff.union(&extra).unwrap();
        assert!((joined.area() - 70.0).abs() < 1e-6);
        assert!(joined.contains_point(&Point2D::new(22.0, 1.0)));
    }

    #[test]
    fn test_crs_checks() {
        let a = Catchment::from_polygon(rect(0.0, 0.0, 1.0, 1.0), Crs::from_epsg(EPSG));
        let b = Catchment::from_polygon(rect(0.0, 0.0, 1.0, 1.0), Crs::from_epsg(4326));
        assert!(a.union(&b).is_err());
        assert!(a.to_crs(b.crs, None).is_err());
        assert_eq!(a.to_crs(a.crs, None).unwrap(), a);

        let r = ShiftReprojector::new(Crs::from_epsg(EPSG), Crs::from_epsg(4326), 100.0, 0.0);
        let moved = a.to_crs(b.crs, Some(&r)).unwrap();
        assert_eq!(moved.crs, b.crs);
        assert!(moved.contains_point(&Point2D::new(100.5, 0.5)));
        assert!((moved.area() - 1.0).abs() < 1e-9);
    }
}

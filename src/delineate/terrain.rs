/*
This code is part of the stormcatchments library.
Authors: Thomas Ott
Created: 23/03/2026
Last Modified: 14/10/2026
License: MIT
*/

use crate::error::Result;
use crate::structures::Point2D;
use crate::vector::Crs;
use geo::MultiPolygon;

/// Surface-flow catchment delineation from a DEM, flow direction and flow
/// accumulation grid. Implementations snap `pour_pt` to the nearest cell
/// whose accumulation exceeds `acc_thresh` and return the polygonised
/// catchment of that cell in `crs()`.
///
/// Calls take `&self`: any clipping or masking must work on a copy of the
/// grid so that repeated calls see the same terrain.
pub trait TerrainService {
    fn crs(&self) -> Crs;

    fn get_catchment(&self, pour_pt: Point2D, acc_thresh: f64) -> Result<MultiPolygon<f64>>;
}

impl<T: TerrainService + ?Sized> TerrainService for &T {
    fn crs(&self) -> Crs {
        (**self).crs()
    }

    fn get_catchment(&self, pour_pt: Point2D, acc_thresh: f64) -> Result<MultiPolygon<f64>> {
        (**self).get_catchment(pour_pt, acc_thresh)
    }
}

/// Coordinate transformation between reference systems.
pub trait Reproject {
    fn reproject(&self, geometry: &MultiPolygon<f64>, from: Crs, to: Crs) -> Result<MultiPolygon<f64>>;

    fn reproject_point(&self, p: Point2D, from: Crs, to: Crs) -> Result<Point2D>;
}

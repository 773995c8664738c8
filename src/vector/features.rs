/*
This file is part of the stormcatchments library.
Authors: Thomas Ott
Created: 05/03/2026
Last Modified: 14/10/2026
License: MIT
*/

use super::FieldData;
use crate::structures::{Point2D, Polyline};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A coordinate reference system, identified by its EPSG code. Loading and
/// transforming between systems happens outside this crate; values are only
/// compared so that mismatched layers fail early.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Crs {
    pub epsg: u32,
}

impl Crs {
    pub fn from_epsg(epsg: u32) -> Crs {
        Crs { epsg }
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum PointGeometry {
    Point(Point2D),
    MultiPoint(Vec<Point2D>),
}

#[derive(Clone, Debug)]
pub struct PointFeature {
    pub index: usize,
    pub geometry: PointGeometry,
    pub attributes: HashMap<String, FieldData>,
}

impl PointFeature {
    pub fn new(index: usize, geometry: PointGeometry) -> PointFeature {
        PointFeature {
            index,
            geometry,
            attributes: HashMap::new(),
        }
    }

    pub fn from_xy(index: usize, x: f64, y: f64) -> PointFeature {
        PointFeature::new(index, PointGeometry::Point(Point2D::new(x, y)))
    }

    pub fn with_attribute(mut self, name: &str, value: FieldData) -> PointFeature {
        self.attributes.insert(name.to_string(), value);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&FieldData> {
        self.attributes.get(name)
    }
}

#[derive(Clone, Debug)]
pub struct LineFeature {
    pub index: usize,
    pub geometry: Polyline,
}

impl LineFeature {
    pub fn new(index: usize, vertices: &[Point2D]) -> LineFeature {
        LineFeature {
            index,
            geometry: Polyline::new(vertices, index),
        }
    }
}

/// A set of features sharing one coordinate reference system.
#[derive(Clone, Debug)]
pub struct Layer<T> {
    pub crs: Crs,
    pub features: Vec<T>,
}

impl<T> Layer<T> {
    pub fn new(crs: Crs, features: Vec<T>) -> Layer<T> {
        Layer { crs, features }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

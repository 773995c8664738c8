/*
This code is part of the stormcatchments library.
Authors: Thomas Ott
Created: 11/03/2026
Last Modified: 15/10/2026
License: MIT

NOTE: Synthetic networks and a lookup terrain used by the unit tests.
*/

use crate::configs::Configs;
use crate::delineate::{Reproject, TerrainService};
use crate::error::{Result, StormError};
use crate::network::{Network, ResolveMethod};
use crate::structures::Point2D;
use crate::vector::{Crs, FieldData, Layer, LineFeature, PointFeature};
use geo::{Coord, LineString, MapCoords, MultiPolygon, Polygon};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cell::Cell;

/// NAD83 / Vermont
pub const EPSG: u32 = 32145;

pub fn typed_point(index: usize, x: f64, y: f64, type_code: i32) -> PointFeature {
    PointFeature::from_xy(index, x, y).with_attribute("Type", FieldData::Int(type_code))
}

pub fn flagged_point(index: usize, x: f64, y: f64, is_sink: bool, is_source: bool) -> PointFeature {
    PointFeature::from_xy(index, x, y)
        .with_attribute("IS_SINK", FieldData::Bool(is_sink))
        .with_attribute("IS_SOURCE", FieldData::Bool(is_source))
}

fn line(index: usize, coords: &[(f64, f64)]) -> LineFeature {
    let vertices: Vec<Point2D> = coords.iter().map(|&(x, y)| Point2D::new(x, y)).collect();
    LineFeature::new(index, &vertices)
}

/// Catchbasin A (0, 0), manhole B (10, 0) and outfall C (20, 0) on one line
/// drawn from C to A.
pub fn chain_network() -> Network {
    let crs = Crs::from_epsg(EPSG);
    let lines = Layer::new(crs, vec![line(0, &[(20.0, 0.0), (10.0, 0.0), (0.0, 0.0)])]);
    let pts = Layer::new(
        crs,
        vec![
            typed_point(1, 0.0, 0.0, 2),
            typed_point(2, 10.0, 0.0, 3),
            typed_point(3, 20.0, 0.0, 5),
        ],
    );
    Network::new(&lines, &pts, &Configs::default()).unwrap()
}

/// Four subnetworks:
/// - the chain above plus a branch from catchbasin 4 at (10, 10) to the manhole
/// - catchbasin 10, outfall 11 and outfall 12 in a row along x = 100..120
/// - an island at x = 200..210 holding only catchbasin 20
/// - floating catchbasin 30 near (210, 0) and floating manhole 31
pub fn synthetic_network_with(configs: &Configs) -> Network {
    let crs = Crs::from_epsg(EPSG);
    let lines = Layer::new(
        crs,
        vec![
            line(0, &[(20.0, 0.0), (10.0, 0.0), (0.0, 0.0)]),
            line(1, &[(100.0, 0.0), (110.0, 0.0), (120.0, 0.0)]),
            line(2, &[(200.0, 0.0), (210.0, 0.0)]),
            line(3, &[(10.0, 10.0), (10.0, 0.0)]),
        ],
    );
    let pts = Layer::new(
        crs,
        vec![
            typed_point(1, 0.0, 0.0, 2),
            typed_point(2, 10.0, 0.0, 3),
            typed_point(3, 20.0, 0.0, 5),
            typed_point(4, 10.0, 10.0, 2),
            typed_point(10, 100.0, 0.0, 2),
            typed_point(11, 110.0, 0.0, 5),
            typed_point(12, 120.0, 0.0, 5),
            typed_point(20, 200.0, 0.0, 2),
            typed_point(30, 210.5, 1.0, 2),
            typed_point(31, 50.0, 50.0, 3),
        ],
    );
    Network::new(&lines, &pts, configs).unwrap()
}

pub fn synthetic_network() -> Network {
    synthetic_network_with(&Configs::default())
}

pub fn resolved_synthetic_network() -> Network {
    let mut net = synthetic_network();
    net.resolve_directions(ResolveMethod::FromSources).unwrap();
    net
}

/// A random tree of `n` nodes draining to an outfall at its root. Each edge
/// is its own line, drawn in a random direction.
pub fn random_tree_network(seed: u64, n: usize) -> Network {
    let mut rng = StdRng::seed_from_u64(seed);
    let nodes: Vec<(f64, f64)> = (0..n)
        .map(|i| (i as f64 * 10.0, rng.gen_range(0..1000) as f64))
        .collect();
    let mut lines = vec![];
    for child in 1..n {
        let parent = rng.gen_range(0..child);
        if rng.gen_bool(0.5) {
            lines.push(line(child, &[nodes[child], nodes[parent]]));
        } else {
            lines.push(line(child, &[nodes[parent], nodes[child]]));
        }
    }
    let pts: Vec<PointFeature> = nodes
        .iter()
        .enumerate()
        .map(|(i, &(x, y))| typed_point(i, x, y, if i == 0 { 5 } else { 2 }))
        .collect();
    let crs = Crs::from_epsg(EPSG);
    Network::new(&Layer::new(crs, lines), &Layer::new(crs, pts), &Configs::default()).unwrap()
}

pub fn rect(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Polygon<f64> {
    Polygon::new(
        LineString::from(vec![
            (min_x, min_y),
            (max_x, min_y),
            (max_x, max_y),
            (min_x, max_y),
            (min_x, min_y),
        ]),
        vec![],
    )
}

/// Terrain service returning fixed rectangles for known pour points.
pub struct RectTerrain {
    crs: Crs,
    entries: Vec<(Point2D, Polygon<f64>)>,
    calls: Cell<usize>,
}

impl RectTerrain {
    pub fn new(crs: Crs, entries: Vec<(Point2D, Polygon<f64>)>) -> RectTerrain {
        RectTerrain {
            crs,
            entries,
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl TerrainService for RectTerrain {
    fn crs(&self) -> Crs {
        self.crs
    }

    fn get_catchment(&self, pour_pt: Point2D, _acc_thresh: f64) -> Result<MultiPolygon<f64>> {
        self.calls.set(self.calls.get() + 1);
        self.entries
            .iter()
            .find(|(p, _)| p.distance(&pour_pt) < 1e-6)
            .map(|(_, poly)| MultiPolygon::new(vec![poly.clone()]))
            .ok_or_else(|| StormError::Terrain(format!("no catchment for pour point {}", pour_pt)))
    }
}

/// Catchments for the synthetic network, shifted by `dx` along x:
/// - pour point (8, -4): [-5, 15] x [-5, 5], holding sink 1 whose outlet is outside
/// - pour point (22, 0): [15, 25] x [-5, 5], holding only outfall 3
/// - sink 1: [-5, 2] x [-5, 5]
/// - sink 4: [5, 15] x [8, 12]
pub fn scenario_terrain(crs: Crs, dx: f64) -> RectTerrain {
    let entries = vec![
        (Point2D::new(8.0 + dx, -4.0), rect(-5.0 + dx, -5.0, 15.0 + dx, 5.0)),
        (Point2D::new(22.0 + dx, 0.0), rect(15.0 + dx, -5.0, 25.0 + dx, 5.0)),
        (Point2D::new(0.0 + dx, 0.0), rect(-5.0 + dx, -5.0, 2.0 + dx, 5.0)),
        (Point2D::new(10.0 + dx, 10.0), rect(5.0 + dx, 8.0, 15.0 + dx, 12.0)),
    ];
    RectTerrain::new(crs, entries)
}

/// Two pipes whose outfalls sit in each other's catchments:
/// - catchbasin 1 at (0, 0) drains to outfall 2 at (50, 0)
/// - catchbasin 3 at (100, 0) drains via (100, 20) to outfall 4 at (20, 20)
pub fn crossover_network() -> Network {
    let crs = Crs::from_epsg(EPSG);
    let lines = Layer::new(
        crs,
        vec![
            line(0, &[(0.0, 0.0), (50.0, 0.0)]),
            line(1, &[(100.0, 0.0), (100.0, 20.0), (20.0, 20.0)]),
        ],
    );
    let pts = Layer::new(
        crs,
        vec![
            typed_point(1, 0.0, 0.0, 2),
            typed_point(2, 50.0, 0.0, 5),
            typed_point(3, 100.0, 0.0, 2),
            typed_point(4, 20.0, 20.0, 5),
        ],
    );
    let mut net = Network::new(&lines, &pts, &Configs::default()).unwrap();
    net.resolve_directions(ResolveMethod::FromSources).unwrap();
    net
}

/// Catchments for the crossover network:
/// - pour point (10, 10): [-5, 30] x [-5, 30], holding catchbasin 1 and outfall 4
/// - catchbasin 1: [-5, 5] x [-5, 5]
/// - catchbasin 3: [40, 120] x [-10, 10], holding outfall 2
pub fn crossover_terrain(crs: Crs) -> RectTerrain {
    RectTerrain::new(
        crs,
        vec![
            (Point2D::new(10.0, 10.0), rect(-5.0, -5.0, 30.0, 30.0)),
            (Point2D::new(0.0, 0.0), rect(-5.0, -5.0, 5.0, 5.0)),
            (Point2D::new(100.0, 0.0), rect(40.0, -10.0, 120.0, 10.0)),
        ],
    )
}

/// Treats `to` as `from` translated by (dx, dy).
pub struct ShiftReprojector {
    from: Crs,
    to: Crs,
    dx: f64,
    dy: f64,
}

impl ShiftReprojector {
    pub fn new(from: Crs, to: Crs, dx: f64, dy: f64) -> ShiftReprojector {
        ShiftReprojector { from, to, dx, dy }
    }

    fn offset(&self, from: Crs, to: Crs) -> Result<(f64, f64)> {
        if from == self.from && to == self.to {
            Ok((self.dx, self.dy))
        } else if from == self.to && to == self.from {
            Ok((-self.dx, -self.dy))
        } else {
            Err(StormError::Configuration(format!("cannot reproject {} to {}", from, to)))
        }
    }
}

impl Reproject for ShiftReprojector {
    fn reproject(&self, geometry: &MultiPolygon<f64>, from: Crs, to: Crs) -> Result<MultiPolygon<f64>> {
        let (dx, dy) = self.offset(from, to)?;
        Ok(geometry.map_coords(|c| Coord {
            x: c.x + dx,
            y: c.y + dy,
        }))
    }

    fn reproject_point(&self, p: Point2D, from: Crs, to: Crs) -> Result<Point2D> {
        let (dx, dy) = self.offset(from, to)?;
        Ok(Point2D::new(p.x + dx, p.y + dy))
    }
}

/*
This code is part of the stormcatchments library.
Authors: Thomas Ott
Created: 09/03/2026
Last Modified: 15/10/2026
License: MIT
*/

//! Graph model of a stormwater infrastructure network.
//!
//! Line features are exploded into 2-vertex segments and every segment seeds
//! a pair of opposing directed edges between its rounded end vertices, since
//! the direction water travels along a pipe is not known from the line data.
//! Point features (catchbasins, outfalls, culverts, ...) are classified as
//! flow sinks, flow sources or neither and matched to graph nodes by their
//! rounded coordinate. See `resolve` for turning the seed graph into a
//! directed flow graph and `query` for the questions asked of it during
//! delineation.

mod query;
mod resolve;

pub use self::resolve::{ResolutionReport, ResolveMethod};

use crate::configs::{Configs, StackedPointPolicy};
use crate::error::{Ambiguity, Result, StormError};
use crate::structures::{LineSegment, NodeKey, Point2D, Polyline};
use crate::vector::{Crs, Layer, LineFeature, PointFeature, PointGeometry};
use log::{info, warn};
use petgraph::graphmap::DiGraphMap;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

pub(crate) const SINK_COLUMN: &str = "IS_SINK";
pub(crate) const SOURCE_COLUMN: &str = "IS_SOURCE";

/// A stormwater infrastructure point with its flow classification resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct StormPoint {
    pub index: usize,
    /// Coordinate rounded to the network's precision.
    pub coords: Point2D,
    pub node: NodeKey,
    pub type_code: Option<String>,
    /// Surface flow enters the piped system here, e.g. a catchbasin.
    pub is_sink: bool,
    /// Flow leaves the piped system here, e.g. an outfall.
    pub is_source: bool,
}

/// Which of a segment's two possible edges get added to the graph.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum EdgeDirection {
    Both,
    Original,
    Reverse,
}

#[derive(Clone, Debug)]
pub struct Network {
    pub crs: Crs,
    pub lines: Vec<Polyline>,
    pub segments: Vec<LineSegment>,
    pub pts: Vec<StormPoint>,
    pub graph: DiGraphMap<NodeKey, ()>,
    configs: Configs,
    pt_lookup: HashMap<usize, usize>,
    node_pts: HashMap<NodeKey, Vec<usize>>,
    selected: HashMap<NodeKey, usize>,
    adjacency: HashMap<NodeKey, Vec<NodeKey>>,
    directions_resolved: bool,
    method: Option<ResolveMethod>,
    ambiguities: RefCell<Vec<Ambiguity>>,
}

impl Network {
    /// Builds the segment table, the classified point table and the
    /// bidirectional seed graph from line and point layers.
    pub fn new(
        storm_lines: &Layer<LineFeature>,
        storm_pts: &Layer<PointFeature>,
        configs: &Configs,
    ) -> Result<Network> {
        if storm_lines.crs != storm_pts.crs {
            return Err(StormError::Configuration(format!(
                "coordinate reference systems of point ({}) and line ({}) datasets must match",
                storm_pts.crs, storm_lines.crs
            )));
        }

        check_unique(storm_lines.features.iter().map(|l| l.index), "line")?;
        check_unique(storm_pts.features.iter().map(|p| p.index), "point")?;

        let decimals = configs.coord_decimals;
        let mut lines = Vec::with_capacity(storm_lines.len());
        let mut segments = vec![];
        for line in &storm_lines.features {
            let mut polyline = line.geometry.clone();
            polyline.id = line.index;
            segments.extend(polyline.segments(decimals));
            lines.push(polyline);
        }

        let mut ambiguities = vec![];
        let flags = classify_points(&storm_pts.features, configs)?;
        let mut pts = Vec::with_capacity(storm_pts.len());
        for (feature, (type_code, is_sink, is_source)) in storm_pts.features.iter().zip(flags) {
            let coords = match &feature.geometry {
                PointGeometry::Point(p) => *p,
                PointGeometry::MultiPoint(members) => {
                    let first = members.first().ok_or_else(|| {
                        StormError::Configuration(format!(
                            "point {} has an empty MultiPoint geometry",
                            feature.index
                        ))
                    })?;
                    if members.len() > 1 {
                        ambiguities.push(Ambiguity::MultiPointGeometry {
                            point: feature.index,
                            members: members.len(),
                        });
                    }
                    *first
                }
            }
            .round(decimals);
            pts.push(StormPoint {
                index: feature.index,
                coords,
                node: NodeKey::new(&coords, decimals),
                type_code,
                is_sink,
                is_source,
            });
        }

        let mut net = Network {
            crs: storm_lines.crs,
            lines,
            segments,
            pts,
            graph: DiGraphMap::new(),
            configs: configs.clone(),
            pt_lookup: HashMap::new(),
            node_pts: HashMap::new(),
            selected: HashMap::new(),
            adjacency: HashMap::new(),
            directions_resolved: false,
            method: None,
            ambiguities: RefCell::new(vec![]),
        };
        for a in ambiguities {
            net.record(a);
        }
        net.index_points()?;
        net.build_adjacency();
        net.seed_graph(EdgeDirection::Both);

        if net.configs.verbose_mode {
            info!(
                "Built network with {} lines, {} segments, {} points, {} nodes and {} edges",
                net.lines.len(),
                net.segments.len(),
                net.pts.len(),
                net.graph.node_count(),
                net.graph.edge_count()
            );
        }
        Ok(net)
    }

    pub fn configs(&self) -> &Configs {
        &self.configs
    }

    pub fn directions_resolved(&self) -> bool {
        self.directions_resolved
    }

    pub fn resolve_method(&self) -> Option<ResolveMethod> {
        self.method
    }

    pub fn point(&self, idx: usize) -> Option<&StormPoint> {
        self.pt_lookup.get(&idx).map(|&i| &self.pts[i])
    }

    pub(crate) fn require_point(&self, idx: usize) -> Result<&StormPoint> {
        self.point(idx)
            .ok_or_else(|| StormError::Configuration(format!("no point with index {}", idx)))
    }

    /// All point ids sitting on `node`, in input order.
    pub fn points_at(&self, node: NodeKey) -> &[usize] {
        self.node_pts.get(&node).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// The point representing `node` under the stacked-point policy.
    pub fn point_at(&self, node: NodeKey) -> Option<&StormPoint> {
        self.selected.get(&node).and_then(|&idx| self.point(idx))
    }

    /// True if the point's coordinate is present as a node in the graph.
    pub fn has_point(&self, idx: usize) -> bool {
        match self.point(idx) {
            Some(pt) => self.graph.contains_node(pt.node),
            None => false,
        }
    }

    /// Every directed edge with a flag telling whether its reverse is present too.
    pub fn edges(&self) -> Vec<(NodeKey, NodeKey, bool)> {
        self.graph
            .all_edges()
            .map(|(u, v, _)| (u, v, self.graph.contains_edge(v, u)))
            .collect()
    }

    /// Warnings recorded so far, oldest first.
    pub fn ambiguities(&self) -> Vec<Ambiguity> {
        self.ambiguities.borrow().clone()
    }

    pub fn take_ambiguities(&self) -> Vec<Ambiguity> {
        std::mem::take(&mut *self.ambiguities.borrow_mut())
    }

    /// Logs and stores `ambiguity` unless an equal one is already stored.
    pub(crate) fn record(&self, ambiguity: Ambiguity) {
        let mut recorded = self.ambiguities.borrow_mut();
        if recorded.contains(&ambiguity) {
            return;
        }
        warn!("{}", ambiguity);
        recorded.push(ambiguity);
    }

    pub(crate) fn require_resolved(&self, operation: &str) -> Result<()> {
        if !self.directions_resolved {
            return Err(StormError::Precondition(format!(
                "cannot {} until graph directions of the network are resolved",
                operation
            )));
        }
        Ok(())
    }

    /// Moves a point onto a new coordinate. Under `StackedPointPolicy::Reject`
    /// a point is not moved onto a node already holding points, and `false`
    /// is returned.
    pub(crate) fn relocate_point(&mut self, idx: usize, p: Point2D) -> Result<bool> {
        let decimals = self.configs.coord_decimals;
        let i = *self
            .pt_lookup
            .get(&idx)
            .ok_or_else(|| StormError::Configuration(format!("no point with index {}", idx)))?;
        let coords = p.round(decimals);
        let node = NodeKey::new(&coords, decimals);
        let old = self.pts[i].node;
        if node == old {
            self.pts[i].coords = coords;
            return Ok(true);
        }
        if self.configs.stacked_points == StackedPointPolicy::Reject {
            if let Some(ids) = self.node_pts.get(&node) {
                warn!(
                    "point {} left in place, points {:?} already sit at {}",
                    idx, ids, node
                );
                return Ok(false);
            }
        }

        self.pts[i].coords = coords;
        self.pts[i].node = node;
        if let Some(ids) = self.node_pts.get_mut(&old) {
            ids.retain(|&id| id != idx);
        }
        self.refresh_node(old);

        let lookup = &self.pt_lookup;
        let ids = self.node_pts.entry(node).or_default();
        ids.push(idx);
        ids.sort_by_key(|id| lookup[id]);
        self.refresh_node(node);

        let points = self.points_at(node).to_vec();
        if points.len() > 1 {
            let kept = self.selected[&node];
            self.record(Ambiguity::StackedPoints { node, points, kept });
        }
        Ok(true)
    }

    /// Picks the point representing a node from the ids stacked on it.
    fn select(&self, ids: &[usize]) -> usize {
        match self.configs.stacked_points {
            StackedPointPolicy::KeepFirst | StackedPointPolicy::Reject => ids[0],
            StackedPointPolicy::PreferFlagged => ids
                .iter()
                .copied()
                .find(|id| {
                    let pt = &self.pts[self.pt_lookup[id]];
                    pt.is_sink || pt.is_source
                })
                .unwrap_or(ids[0]),
        }
    }

    fn refresh_node(&mut self, node: NodeKey) {
        let kept = self
            .node_pts
            .get(&node)
            .filter(|ids| !ids.is_empty())
            .map(|ids| self.select(ids));
        match kept {
            Some(kept) => {
                self.selected.insert(node, kept);
            }
            None => {
                self.node_pts.remove(&node);
                self.selected.remove(&node);
            }
        }
    }

    fn index_points(&mut self) -> Result<()> {
        self.pt_lookup.clear();
        self.node_pts.clear();
        self.selected.clear();
        for (i, pt) in self.pts.iter().enumerate() {
            self.pt_lookup.insert(pt.index, i);
            self.node_pts.entry(pt.node).or_default().push(pt.index);
        }

        let mut stacked: Vec<(NodeKey, Vec<usize>)> = vec![];
        let mut selected = HashMap::with_capacity(self.node_pts.len());
        for (node, ids) in &self.node_pts {
            selected.insert(*node, self.select(ids));
            if ids.len() > 1 {
                stacked.push((*node, ids.clone()));
            }
        }
        self.selected = selected;
        stacked.sort();

        if self.configs.stacked_points == StackedPointPolicy::Reject {
            if let Some((node, ids)) = stacked.first() {
                return Err(StormError::Configuration(format!(
                    "points {:?} are stacked at {}",
                    ids, node
                )));
            }
        }
        for (node, points) in stacked {
            let kept = self.selected[&node];
            self.record(Ambiguity::StackedPoints { node, points, kept });
        }
        Ok(())
    }

    fn build_adjacency(&mut self) {
        let decimals = self.configs.coord_decimals;
        self.adjacency.clear();
        for seg in &self.segments {
            let a = NodeKey::new(&seg.p1, decimals);
            let b = NodeKey::new(&seg.p2, decimals);
            if a == b {
                self.adjacency.entry(a).or_default();
                continue;
            }
            for (from, to) in [(a, b), (b, a)] {
                let list = self.adjacency.entry(from).or_default();
                if !list.contains(&to) {
                    list.push(to);
                }
            }
        }
    }

    /// Rebuilds the graph from the segment table. Zero-length segments only
    /// contribute a node.
    pub(crate) fn seed_graph(&mut self, direction: EdgeDirection) {
        let decimals = self.configs.coord_decimals;
        self.graph = DiGraphMap::with_capacity(self.segments.len() + 1, self.segments.len() * 2);
        for seg in &self.segments {
            let a = NodeKey::new(&seg.p1, decimals);
            let b = NodeKey::new(&seg.p2, decimals);
            if a == b {
                self.graph.add_node(a);
                continue;
            }
            match direction {
                EdgeDirection::Both => {
                    self.graph.add_edge(a, b, ());
                    self.graph.add_edge(b, a, ());
                }
                EdgeDirection::Original => {
                    self.graph.add_edge(a, b, ());
                }
                EdgeDirection::Reverse => {
                    self.graph.add_edge(b, a, ());
                }
            }
        }
    }
}

fn check_unique(ids: impl Iterator<Item = usize>, kind: &str) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(StormError::Configuration(format!(
                "{} identifiers must be unique, {} appears more than once",
                kind, id
            )));
        }
    }
    Ok(())
}

/// Works out (type code, is sink, is source) for every point. Pre-supplied
/// boolean IS_SINK/IS_SOURCE columns win over the type mapping.
fn classify_points(
    pts: &[PointFeature],
    configs: &Configs,
) -> Result<Vec<(Option<String>, bool, bool)>> {
    let has_column = |name: &str| pts.iter().any(|p| p.attributes.contains_key(name));
    let type_code = |p: &PointFeature| p.attribute(&configs.type_column).and_then(|v| v.type_code());

    if has_column(SINK_COLUMN) || has_column(SOURCE_COLUMN) {
        let mut ret = Vec::with_capacity(pts.len());
        for p in pts {
            let is_sink = bool_column(p, SINK_COLUMN)?;
            let is_source = bool_column(p, SOURCE_COLUMN)?;
            ret.push((type_code(p), is_sink, is_source));
        }
        return Ok(ret);
    }

    if !pts.is_empty() && !has_column(&configs.type_column) {
        return Err(StormError::Configuration(format!(
            "type column \"{}\" not present in point data; supply it or bool \"{}\" and \"{}\" columns",
            configs.type_column, SINK_COLUMN, SOURCE_COLUMN
        )));
    }
    Ok(pts
        .iter()
        .map(|p| {
            let code = type_code(p);
            let (is_sink, is_source) = match &code {
                Some(c) => (
                    configs.sink_types.contains(c),
                    configs.source_types.contains(c),
                ),
                None => (false, false),
            };
            (code, is_sink, is_source)
        })
        .collect())
}

fn bool_column(p: &PointFeature, name: &str) -> Result<bool> {
    match p.attribute(name) {
        Some(value) => value.as_bool().ok_or_else(|| {
            StormError::Configuration(format!(
                "column \"{}\" must be bool type, point {} has a {} value",
                name,
                p.index,
                value.type_name()
            ))
        }),
        None => Err(StormError::Configuration(format!(
            "column \"{}\" not present for point {}; supply bool \"{}\" and \"{}\" columns or a type column",
            name, p.index, SINK_COLUMN, SOURCE_COLUMN
        ))),
    }
}

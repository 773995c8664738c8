/*
This code is part of the stormcatchments library.
Authors: Thomas Ott
Created: 02/04/2026
Last Modified: 15/10/2026
License: MIT
*/

/*
Data quality checks on the infrastructure network. Points that do not sit on
a line vertex cannot take part in any traversal, and subnetworks with more
than one flow source make the outlet of their sinks ambiguous.
*/

use crate::error::{Ambiguity, Result, StormError};
use crate::network::Network;
use crate::structures::{NodeKey, Point2D};
use geo::{LineString, MultiLineString};
use log::info;
use petgraph::unionfind::UnionFind;
use rstar::primitives::{GeomWithData, Line};
use rstar::RTree;
use std::collections::{HashMap, HashSet};

/// A weakly connected subnetwork with more than one flow source.
#[derive(Clone, Debug)]
pub struct MultiOutlet {
    pub sources: Vec<usize>,
    pub nodes: Vec<NodeKey>,
    pub geometry: MultiLineString<f64>,
}

/// Ids of the points that are not snapped to a line vertex, in input order.
pub fn find_floating_points(net: &Network) -> Vec<usize> {
    let decimals = net.configs().coord_decimals;
    let mut vertices = HashSet::new();
    for seg in &net.segments {
        vertices.insert(NodeKey::new(&seg.p1, decimals));
        vertices.insert(NodeKey::new(&seg.p2, decimals));
    }
    let floating: Vec<usize> = net
        .pts
        .iter()
        .filter(|p| !vertices.contains(&p.node))
        .map(|p| p.index)
        .collect();
    if !floating.is_empty() {
        net.record(Ambiguity::FloatingPoints {
            points: floating.clone(),
        });
    }
    floating
}

/// Returns a copy of `net` in which every floating point is moved onto the
/// nearest line vertex no further than `tolerance` away. Points with no
/// vertex in range stay where they are, as do points that would land on an
/// occupied vertex under `StackedPointPolicy::Reject`.
pub fn snap_points(net: &Network, tolerance: f64) -> Result<Network> {
    if !(tolerance > 0f64) {
        return Err(StormError::Configuration(format!(
            "snapping tolerance must be positive, got {}",
            tolerance
        )));
    }

    let floating = find_floating_points(net);
    let mut snapped = net.clone();
    if floating.is_empty() {
        return Ok(snapped);
    }

    let line_segments: Vec<GeomWithData<Line<[f64; 2]>, usize>> = net
        .segments
        .iter()
        .enumerate()
        .map(|(i, seg)| GeomWithData::new(Line::new(seg.p1.to_array(), seg.p2.to_array()), i))
        .collect();
    let tree = RTree::bulk_load(line_segments);
    let tol_sq = tolerance * tolerance;

    let mut num_snapped = 0;
    for idx in floating {
        let p = match net.point(idx) {
            Some(pt) => pt.coords,
            None => continue,
        };
        let mut min_dist = f64::INFINITY;
        let mut nearest: Option<(usize, Point2D)> = None;
        for line in tree.locate_within_distance(p.to_array(), tol_sq) {
            let (vertex, dist) = net.segments[line.data].nearest_vertex(&p);
            let better = match nearest {
                Some((seg, _)) => dist < min_dist || (dist == min_dist && line.data < seg),
                None => true,
            };
            if dist <= tolerance && better {
                min_dist = dist;
                nearest = Some((line.data, vertex));
            }
        }
        if let Some((_, vertex)) = nearest {
            if snapped.relocate_point(idx, vertex)? {
                num_snapped += 1;
            }
        }
    }

    if net.configs().verbose_mode {
        info!("Snapped {} points to a line vertex", num_snapped);
    }
    Ok(snapped)
}

/// Weakly connected components of the resolved graph holding more than one
/// point flagged as a flow source.
pub fn find_multi_outlet(net: &Network) -> Result<Vec<MultiOutlet>> {
    net.require_resolved("find multi-outlet subnetworks")?;

    let nodes: Vec<NodeKey> = net.graph.nodes().collect();
    let index: HashMap<NodeKey, usize> = nodes.iter().enumerate().map(|(i, n)| (*n, i)).collect();
    let mut uf = UnionFind::<usize>::new(nodes.len());
    for (u, v, _) in net.graph.all_edges() {
        uf.union(index[&u], index[&v]);
    }

    let mut components: Vec<Vec<NodeKey>> = vec![];
    let mut component_of: HashMap<usize, usize> = HashMap::new();
    for (i, node) in nodes.iter().enumerate() {
        let root = uf.find(i);
        let c = *component_of.entry(root).or_insert_with(|| {
            components.push(vec![]);
            components.len() - 1
        });
        components[c].push(*node);
    }

    let decimals = net.configs().coord_decimals;
    let mut ret = vec![];
    for members in components {
        let sources: Vec<usize> = members
            .iter()
            .flat_map(|n| net.points_at(*n).iter().copied())
            .filter(|idx| net.point(*idx).map_or(false, |p| p.is_source))
            .collect();
        if sources.len() < 2 {
            continue;
        }
        let member_set: HashSet<NodeKey> = members.iter().copied().collect();
        let lines: Vec<LineString<f64>> = net
            .segments
            .iter()
            .filter(|s| member_set.contains(&NodeKey::new(&s.p1, decimals)))
            .map(|s| LineString::from(s.to_line()))
            .collect();
        net.record(Ambiguity::MultiOutlet {
            sources: sources.clone(),
        });
        ret.push(MultiOutlet {
            sources,
            nodes: members,
            geometry: MultiLineString::new(lines),
        });
    }
    Ok(ret)
}

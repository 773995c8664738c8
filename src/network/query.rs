/*
This code is part of the stormcatchments library.
Authors: Thomas Ott
Created: 16/03/2026
Last Modified: 15/10/2026
License: MIT
*/

use super::{Network, StormPoint};
use crate::configs::UnresolvedPolicy;
use crate::delineate::Catchment;
use crate::error::{Ambiguity, Result, StormError};
use crate::structures::NodeKey;
use petgraph::visit::{Bfs, Dfs, Reversed};
use petgraph::Direction;
use std::collections::HashSet;

impl Network {
    /// Id of the point at the terminus reached by following resolved edges
    /// downstream from point `idx`. `None` when the point is not a graph node
    /// or no point sits on the terminus.
    pub fn get_outlet(&self, idx: usize) -> Result<Option<usize>> {
        self.require_resolved("get outlet")?;
        let pt = self.require_point(idx)?;
        if !self.graph.contains_node(pt.node) {
            self.record(Ambiguity::PointNotInGraph { point: idx });
            return Ok(None);
        }

        let mut termini = vec![];
        let mut bidirectional = false;
        let mut dfs = Dfs::new(&self.graph, pt.node);
        while let Some(n) = dfs.next(&self.graph) {
            let mut out_degree = 0;
            for m in self.graph.neighbors_directed(n, Direction::Outgoing) {
                out_degree += 1;
                if self.graph.contains_edge(m, n) {
                    bidirectional = true;
                }
            }
            if out_degree == 0 {
                termini.push(n);
            }
        }

        let terminus = match termini.first() {
            Some(t) => *t,
            None if bidirectional => match self.configs.unresolved_edges {
                UnresolvedPolicy::Warn => {
                    self.record(Ambiguity::UnresolvedOutlet { point: idx });
                    return Ok(None);
                }
                UnresolvedPolicy::Error => {
                    return Err(StormError::StructuralInvariant(format!(
                        "point {} drains into a subnetwork whose directions are unresolved",
                        idx
                    )));
                }
            },
            None => {
                return Err(StormError::StructuralInvariant(format!(
                    "subgraph of point {} has no outlet",
                    idx
                )));
            }
        };
        if termini.len() > 1 {
            self.record(Ambiguity::MultipleTermini {
                point: idx,
                termini,
            });
        }
        Ok(self.point_at(terminus).map(|p| p.index))
    }

    /// Walks the undirected segment adjacency away from point `idx` until a
    /// point flagged as a flow source turns up. Works on the line data alone,
    /// so directions do not need to be resolved.
    pub fn find_downstream_pt(&self, idx: usize) -> Result<Option<&StormPoint>> {
        let start = self.require_point(idx)?.node;
        if !self.adjacency.contains_key(&start) {
            self.record(Ambiguity::PointNotInGraph { point: idx });
            return Ok(None);
        }

        let mut visited: HashSet<NodeKey> = HashSet::new();
        let mut stack = vec![start];
        while let Some(n) = stack.pop() {
            if !visited.insert(n) {
                continue;
            }
            if n != start {
                if let Some(pt) = self.point_at(n).filter(|p| p.is_source) {
                    return Ok(Some(pt));
                }
            }
            if let Some(neighbours) = self.adjacency.get(&n) {
                stack.extend(neighbours.iter().rev().filter(|m| !visited.contains(m)));
            }
        }
        Ok(None)
    }

    /// Sink points inside `catchment` whose resolved outlet lies outside it.
    /// Their flow is piped out of the catchment.
    pub fn get_outlet_points(&self, catchment: &Catchment) -> Result<Vec<&StormPoint>> {
        self.require_resolved("get outlet points")?;
        self.require_crs(catchment)?;

        let mut ret = vec![];
        for pt in self.pts.iter().filter(|p| p.is_sink) {
            if !catchment.contains_point(&pt.coords) {
                continue;
            }
            if let Some(outlet_idx) = self.get_outlet(pt.index)? {
                let outlet = self.require_point(outlet_idx)?;
                if !catchment.contains_point(&outlet.coords) {
                    ret.push(pt);
                }
            }
        }
        Ok(ret)
    }

    /// Sink points outside `catchment` draining through the piped system to a
    /// flow source inside it. Their flow is carried into the catchment.
    pub fn get_inlet_points(&self, catchment: &Catchment) -> Result<Vec<&StormPoint>> {
        self.require_resolved("get inlet points")?;
        self.require_crs(catchment)?;

        let rev = Reversed(&self.graph);
        let mut seen = HashSet::new();
        let mut ret = vec![];
        for source in self.pts.iter().filter(|p| p.is_source) {
            if !catchment.contains_point(&source.coords) || !self.graph.contains_node(source.node) {
                continue;
            }
            let mut bfs = Bfs::new(rev, source.node);
            while let Some(n) = bfs.next(rev) {
                if catchment.contains_point(&n.point()) {
                    continue;
                }
                for pt in self.points_at(n).iter().filter_map(|id| self.point(*id)) {
                    if pt.is_sink && seen.insert(pt.index) {
                        ret.push(pt);
                    }
                }
            }
        }
        Ok(ret)
    }

    fn require_crs(&self, catchment: &Catchment) -> Result<()> {
        if catchment.crs != self.crs {
            return Err(StormError::Configuration(format!(
                "catchment is in {} but the network is in {}, reproject it first",
                catchment.crs, self.crs
            )));
        }
        Ok(())
    }
}

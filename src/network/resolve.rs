/*
This code is part of the stormcatchments library.
Authors: Thomas Ott
Created: 11/03/2026
Last Modified: 14/10/2026
License: MIT
*/

use super::{EdgeDirection, Network};
use crate::configs::UnresolvedPolicy;
use crate::delineate::Catchment;
use crate::error::{Ambiguity, Result, StormError};
use crate::structures::NodeKey;
use crate::utils::get_formatted_elapsed_time;
use log::info;
use petgraph::Direction;
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

/// How edge directions get decided.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ResolveMethod {
    /// Walk upstream from every point flagged as a flow source, keeping only
    /// the edges that point back toward the source.
    FromSources,
    /// Trust the vertex order of the line data.
    VertexOrder,
    /// Trust the reverse of the vertex order of the line data.
    VertexOrderReversed,
}

impl FromStr for ResolveMethod {
    type Err = StormError;

    fn from_str(s: &str) -> Result<ResolveMethod> {
        match s.trim().to_lowercase().as_str() {
            "from_sources" => Ok(ResolveMethod::FromSources),
            "vertex_order" => Ok(ResolveMethod::VertexOrder),
            "vertex_order_r" => Ok(ResolveMethod::VertexOrderReversed),
            _ => Err(StormError::Configuration(format!(
                "method \"{}\" is not a valid edge resolution method, must be \"from_sources\", \"vertex_order\", or \"vertex_order_r\"",
                s
            ))),
        }
    }
}

impl fmt::Display for ResolveMethod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            ResolveMethod::FromSources => "from_sources",
            ResolveMethod::VertexOrder => "vertex_order",
            ResolveMethod::VertexOrderReversed => "vertex_order_r",
        };
        write!(f, "{}", s)
    }
}

/// Outcome of a resolution pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolutionReport {
    /// Edges with no opposing edge.
    pub resolved_edges: usize,
    /// Opposing edge pairs that are still present.
    pub unresolved_pairs: usize,
    /// Declared flow sources whose coordinate is not a graph node.
    pub missing_sources: Vec<usize>,
}

struct Frame {
    node: NodeKey,
    preds: Vec<NodeKey>,
    next: usize,
}

impl Network {
    /// Resolves the direction of every edge in the graph and marks the network
    /// resolved. Running the same method twice gives the same graph.
    pub fn resolve_directions(&mut self, method: ResolveMethod) -> Result<ResolutionReport> {
        let start = Instant::now();
        if self.configs.verbose_mode {
            info!("Resolving edge directions using {}...", method);
        }

        let report = match method {
            ResolveMethod::FromSources => self.resolve_from_sources()?,
            ResolveMethod::VertexOrder => {
                self.seed_graph(EdgeDirection::Original);
                self.report(vec![])
            }
            ResolveMethod::VertexOrderReversed => {
                self.seed_graph(EdgeDirection::Reverse);
                self.report(vec![])
            }
        };
        self.method = Some(method);
        self.directions_resolved = true;

        if self.configs.verbose_mode {
            info!(
                "Resolved direction for {} edges ({} pairs unresolved)",
                report.resolved_edges, report.unresolved_pairs
            );
            info!("Elapsed Time: {}", get_formatted_elapsed_time(start));
        }
        Ok(report)
    }

    /// Reseeds the graph in both directions and walks upstream from each
    /// declared flow source.
    fn resolve_from_sources(&mut self) -> Result<ResolutionReport> {
        self.seed_graph(EdgeDirection::Both);

        let sources: Vec<(usize, NodeKey)> = self
            .pts
            .iter()
            .filter(|p| p.is_source)
            .map(|p| (p.index, p.node))
            .collect();

        let mut missing = vec![];
        for (idx, node) in sources {
            if !self.graph.contains_node(node) {
                self.record(Ambiguity::MissingSource { point: idx });
                missing.push(idx);
                continue;
            }
            let mut visited = HashSet::new();
            self.traverse_upstream(node, &mut visited);
        }

        let report = self.report(missing);
        self.check_unresolved(report.unresolved_pairs)?;
        Ok(report)
    }

    /// Resolves upstream from one declared flow source. Returns false when the
    /// source's coordinate is not a graph node.
    pub fn resolve_direction(&mut self, source_idx: usize) -> Result<bool> {
        let pt = self.require_point(source_idx)?;
        if !pt.is_source {
            return Err(StormError::Precondition(format!(
                "cannot resolve direction from point {} as it is not marked as a flow source",
                source_idx
            )));
        }
        let node = pt.node;
        if !self.graph.contains_node(node) {
            self.record(Ambiguity::MissingSource { point: source_idx });
            return Ok(false);
        }
        let mut visited = HashSet::new();
        self.traverse_upstream(node, &mut visited);
        self.directions_resolved = true;
        Ok(true)
    }

    /// Resolves only the subnetworks drained by the sinks inside `catchment`,
    /// walking upstream from the flow source each of them reaches.
    pub fn resolve_catchment_graph(&mut self, catchment: &Catchment) -> Result<ResolutionReport> {
        if catchment.crs != self.crs {
            return Err(StormError::Configuration(format!(
                "catchment is in {} but the network is in {}",
                catchment.crs, self.crs
            )));
        }

        let sinks: Vec<usize> = self
            .pts
            .iter()
            .filter(|p| p.is_sink && catchment.contains_point(&p.coords))
            .map(|p| p.index)
            .collect();

        let mut sources = BTreeSet::new();
        for idx in sinks {
            if let Some(source) = self.find_downstream_pt(idx)? {
                sources.insert(source.index);
            }
        }

        let mut missing = vec![];
        for idx in sources {
            if !self.resolve_direction(idx)? {
                missing.push(idx);
            }
        }
        self.directions_resolved = true;
        if self.configs.verbose_mode {
            info!("Resolved the subnetworks draining the catchment");
        }
        Ok(self.report(missing))
    }

    /// Depth-first walk over predecessors starting at a confirmed downstream
    /// node. On first visiting `u` from `v`, the edge `v -> u` is dropped so
    /// only `u -> v` survives.
    fn traverse_upstream(&mut self, start: NodeKey, visited: &mut HashSet<NodeKey>) {
        visited.insert(start);
        let mut stack = vec![Frame {
            node: start,
            preds: self.predecessors(start),
            next: 0,
        }];
        while let Some(top) = stack.len().checked_sub(1) {
            let frame = &mut stack[top];
            if frame.next == frame.preds.len() {
                stack.pop();
                continue;
            }
            let v = frame.node;
            let u = frame.preds[frame.next];
            frame.next += 1;
            if !visited.insert(u) {
                continue;
            }
            self.graph.remove_edge(v, u);
            stack.push(Frame {
                node: u,
                preds: self.predecessors(u),
                next: 0,
            });
        }
    }

    fn predecessors(&self, node: NodeKey) -> Vec<NodeKey> {
        self.graph
            .neighbors_directed(node, Direction::Incoming)
            .collect()
    }

    /// Number of opposing edge pairs still in the graph.
    pub fn unresolved_edge_pairs(&self) -> usize {
        self.graph
            .all_edges()
            .filter(|(u, v, _)| u < v && self.graph.contains_edge(*v, *u))
            .count()
    }

    fn report(&self, missing_sources: Vec<usize>) -> ResolutionReport {
        let unresolved_pairs = self.unresolved_edge_pairs();
        ResolutionReport {
            resolved_edges: self.graph.edge_count() - 2 * unresolved_pairs,
            unresolved_pairs,
            missing_sources,
        }
    }

    fn check_unresolved(&self, pairs: usize) -> Result<()> {
        if pairs == 0 {
            return Ok(());
        }
        match self.configs.unresolved_edges {
            UnresolvedPolicy::Warn => {
                self.record(Ambiguity::UnresolvedEdges { pairs });
                Ok(())
            }
            UnresolvedPolicy::Error => Err(StormError::StructuralInvariant(format!(
                "failed to resolve direction for {} edge pairs",
                pairs
            ))),
        }
    }
}

/*
This code is part of the stormcatchments library.
Authors: Thomas Ott
Created: 02/03/2026
Last Modified: 14/10/2026
License: MIT
*/

//! Error and warning types shared by the network, delineation and topology
//! modules.

use crate::structures::NodeKey;
use std::fmt;
use thiserror::Error;

/// Fatal errors. Missing-data cases (a point that is not in the graph, no
/// downstream point found) are not errors and come back as `None` instead.
#[derive(Debug, Error)]
pub enum StormError {
    /// Malformed or missing input columns, CRS mismatch, bad column types.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An operation that needs resolved edge directions was called first.
    #[error("precondition violated: {0}")]
    Precondition(String),

    /// A resolved subgraph broke a construction invariant, e.g. a reachable
    /// region with no terminus.
    #[error("structural invariant violated: {0}")]
    StructuralInvariant(String),

    /// Raised by a `TerrainService` implementation.
    #[error("terrain service error: {0}")]
    Terrain(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StormError>;

/// Non-fatal conditions. These are logged when they happen and recorded on
/// the `Network` so callers can inspect them afterwards.
#[derive(Debug, Clone, PartialEq)]
pub enum Ambiguity {
    /// A MultiPoint geometry with several members was collapsed to its first point.
    MultiPointGeometry { point: usize, members: usize },
    /// Several point records share one rounded coordinate; `kept` was used.
    StackedPoints { node: NodeKey, points: Vec<usize>, kept: usize },
    /// Forward traversal from `point` reached more than one terminus.
    MultipleTermini { point: usize, termini: Vec<NodeKey> },
    /// A declared flow source whose coordinate is not a graph node.
    MissingSource { point: usize },
    /// Opposing edge pairs left after resolution.
    UnresolvedEdges { pairs: usize },
    /// The outlet of `point` lies in a region that was never resolved.
    UnresolvedOutlet { point: usize },
    /// A point whose coordinate is not a graph node.
    PointNotInGraph { point: usize },
    /// Points that do not sit on any segment vertex.
    FloatingPoints { points: Vec<usize> },
    /// A connected subnetwork with more than one flow source.
    MultiOutlet { sources: Vec<usize> },
}

impl fmt::Display for Ambiguity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Ambiguity::MultiPointGeometry { point, members } => write!(
                f,
                "point {} has MultiPoint geometry with {} members, only the first was kept",
                point, members
            ),
            Ambiguity::StackedPoints { node, points, kept } => write!(
                f,
                "found {} points stacked at {} ({:?}), only keeping point {}",
                points.len(),
                node,
                points,
                kept
            ),
            Ambiguity::MultipleTermini { point, termini } => write!(
                f,
                "multiple outlet coordinates found for point {}, only returning the first of {}",
                point,
                termini.len()
            ),
            Ambiguity::MissingSource { point } => write!(
                f,
                "flow source point {} is not present in the graph, ensure it is snapped to a line vertex",
                point
            ),
            Ambiguity::UnresolvedEdges { pairs } => {
                write!(f, "failed to resolve direction for {} edge pairs", pairs)
            }
            Ambiguity::UnresolvedOutlet { point } => write!(
                f,
                "point {} drains into a subnetwork whose directions are unresolved",
                point
            ),
            Ambiguity::PointNotInGraph { point } => write!(
                f,
                "point {} does not have its coordinates as a node in the graph",
                point
            ),
            Ambiguity::FloatingPoints { points } => {
                write!(f, "{} points are not snapped to a line vertex: {:?}", points.len(), points)
            }
            Ambiguity::MultiOutlet { sources } => write!(
                f,
                "subnetwork has {} flow sources: {:?}",
                sources.len(),
                sources
            ),
        }
    }
}

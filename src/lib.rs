/*
This code is part of the stormcatchments library.
Authors: Thomas Ott
Created: 02/03/2026
Last Modified: 14/10/2026
License: MIT
*/

//! Stormwater infrastructure network aware catchment delineation.
//!
//! A `Network` is built from stormwater line and point features, its edge
//! directions are resolved, and a `Delineate` corrects terrain-derived
//! catchments for flow that the piped network carries across their
//! boundaries. The `topology` module holds data quality checks.

pub mod configs;
pub mod delineate;
pub mod error;
pub mod network;
pub mod structures;
pub mod topology;
pub mod utils;
pub mod vector;

#[cfg(test)]
mod fixtures;

pub use crate::configs::Configs;
pub use crate::delineate::{Catchment, Delineate, Delineation, Reproject, TerrainService};
pub use crate::error::{Ambiguity, Result, StormError};
pub use crate::network::{Network, ResolutionReport, ResolveMethod, StormPoint};

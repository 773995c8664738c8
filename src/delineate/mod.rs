/*
This code is part of the stormcatchments library.
Authors: Thomas Ott
Created: 23/03/2026
Last Modified: 15/10/2026
License: MIT
*/

/*
Stormcatchment delineation. A terrain-only catchment is corrected for the
piped infrastructure network by repeatedly subtracting the sub-catchments of
sinks that pipe flow out of it and unioning the sub-catchments of sinks that
pipe flow into it, until no point crosses the boundary. Every point is
delineated at most once per call, which bounds the number of iterations.
*/

// private sub-module defined in other files
mod catchment;
mod terrain;

// exports identifiers from private sub-modules in the current module namespace
pub use self::catchment::Catchment;
pub use self::terrain::{Reproject, TerrainService};

use crate::error::{Result, StormError};
use crate::network::{Network, StormPoint};
use crate::structures::Point2D;
use crate::utils::get_formatted_elapsed_time;
use log::info;
use std::collections::HashSet;
use std::time::Instant;

/// The result of a traced delineation.
#[derive(Clone, Debug)]
pub struct Delineation {
    pub catchment: Catchment,
    /// Point ids in the order their sub-catchments were requested.
    pub delineated: Vec<usize>,
    /// Outlet points whose sub-catchments were subtracted.
    pub removed: Vec<usize>,
    /// Inlet points whose sub-catchments were unioned.
    pub added: Vec<usize>,
    pub iterations: usize,
}

pub struct Delineate<T: TerrainService> {
    net: Network,
    terrain: T,
    reprojector: Option<Box<dyn Reproject>>,
}

impl<T: TerrainService> Delineate<T> {
    pub fn new(net: Network, terrain: T) -> Result<Delineate<T>> {
        if !net.directions_resolved() {
            return Err(StormError::Precondition(String::from(
                "cannot generate stormcatchment until graph directions of the network are resolved",
            )));
        }
        Ok(Delineate {
            net,
            terrain,
            reprojector: None,
        })
    }

    /// Used whenever the terrain and the network are in different reference
    /// systems.
    pub fn with_reprojector(mut self, reprojector: Box<dyn Reproject>) -> Delineate<T> {
        self.reprojector = Some(reprojector);
        self
    }

    pub fn network(&self) -> &Network {
        &self.net
    }

    pub fn into_network(self) -> Network {
        self.net
    }

    /// Terrain-only catchment of `pour_pt`, given in the terrain's reference system.
    pub fn get_catchment(&self, pour_pt: Point2D, acc_thresh: f64) -> Result<Catchment> {
        let geometry = self.terrain.get_catchment(pour_pt, acc_thresh)?;
        Ok(Catchment::new(geometry, self.terrain.crs()))
    }

    /// Delineates and unions the catchments of the points in `ids` that are
    /// not in `delineated` yet, adding them to it. `None` if every point was
    /// already delineated.
    pub fn delineate_points(
        &self,
        ids: &[usize],
        delineated: &mut HashSet<usize>,
        acc_thresh: f64,
    ) -> Result<Option<Catchment>> {
        let mut ret: Option<Catchment> = None;
        for &idx in ids {
            if !delineated.insert(idx) {
                continue;
            }
            let pt = self.net.require_point(idx)?;
            let pour_pt = self.to_terrain_crs(pt.coords)?;
            let pt_catchment = self.get_catchment(pour_pt, acc_thresh)?;
            ret = Some(match ret {
                Some(c) => c.union(&pt_catchment)?,
                None => pt_catchment,
            });
        }
        Ok(ret)
    }

    /// Delineates the stormcatchment of `pour_pt` (in the terrain's reference
    /// system). `acc_thresh` falls back to the configured threshold.
    pub fn get_stormcatchment(&self, pour_pt: Point2D, acc_thresh: Option<f64>) -> Result<Catchment> {
        Ok(self.get_stormcatchment_traced(pour_pt, acc_thresh)?.catchment)
    }

    pub fn get_stormcatchment_traced(
        &self,
        pour_pt: Point2D,
        acc_thresh: Option<f64>,
    ) -> Result<Delineation> {
        let start = Instant::now();
        let verbose = self.net.configs().verbose_mode;
        let acc_thresh = acc_thresh.unwrap_or(self.net.configs().acc_thresh);

        let mut catchment = self.get_catchment(pour_pt, acc_thresh)?;
        if verbose {
            info!(
                "Terrain catchment of ({}, {}) has area {:.3}",
                pour_pt.x,
                pour_pt.y,
                catchment.area()
            );
        }

        let mut delineated = HashSet::new();
        let mut order: Vec<usize> = vec![];
        let mut removed = vec![];
        let mut added = vec![];
        let mut iterations = 0;
        loop {
            iterations += 1;

            let outlet_ids = pending(
                self.net.get_outlet_points(&self.to_network_crs(&catchment)?)?,
                &delineated,
            );
            if let Some(sub) = self.delineate_points(&outlet_ids, &mut delineated, acc_thresh)? {
                catchment = catchment.difference(&sub)?;
            }

            let inlet_ids = pending(
                self.net.get_inlet_points(&self.to_network_crs(&catchment)?)?,
                &delineated,
            );
            if let Some(sub) = self.delineate_points(&inlet_ids, &mut delineated, acc_thresh)? {
                catchment = catchment.union(&sub)?;
            }

            if verbose {
                info!(
                    "Iteration {}: removed {} outlet and added {} inlet sub-catchments",
                    iterations,
                    outlet_ids.len(),
                    inlet_ids.len()
                );
            }
            if outlet_ids.is_empty() && inlet_ids.is_empty() {
                break;
            }
            order.extend(outlet_ids.iter().chain(inlet_ids.iter()));
            removed.extend(outlet_ids);
            added.extend(inlet_ids);
        }

        if verbose {
            info!(
                "Stormcatchment complete, area {:.3} after {} iterations",
                catchment.area(),
                iterations
            );
            info!("Elapsed Time: {}", get_formatted_elapsed_time(start));
        }
        Ok(Delineation {
            catchment,
            delineated: order,
            removed,
            added,
            iterations,
        })
    }

    fn to_network_crs(&self, catchment: &Catchment) -> Result<Catchment> {
        catchment.to_crs(self.net.crs, self.reprojector.as_deref())
    }

    fn to_terrain_crs(&self, p: Point2D) -> Result<Point2D> {
        let (from, to) = (self.net.crs, self.terrain.crs());
        if from == to {
            return Ok(p);
        }
        match &self.reprojector {
            Some(r) => r.reproject_point(p, from, to),
            None => Err(StormError::Configuration(format!(
                "network is in {} and terrain in {}, a reprojector is required",
                from, to
            ))),
        }
    }
}

/// Ids of `pts` not delineated yet.
fn pending(pts: Vec<&StormPoint>, delineated: &HashSet<usize>) -> Vec<usize> {
    pts.iter()
        .map(|p| p.index)
        .filter(|idx| !delineated.contains(idx))
        .collect()
}

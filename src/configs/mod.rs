/*
This code is part of the stormcatchments library.
Authors: Thomas Ott
Created: 05/03/2026
Last Modified: 15/10/2026
License: MIT
*/

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

const SETTINGS_FILE: &str = "settings.json";

/// What to do when several point records round to the same coordinate.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackedPointPolicy {
    /// Keep the first record in input order and warn.
    KeepFirst,
    /// Prefer the first record flagged as a sink or source, then the first record.
    PreferFlagged,
    /// Refuse to build the network.
    Reject,
}

/// What to do with edge pairs that remain bidirectional after resolving from
/// flow sources, i.e. subnetworks with no declared source.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnresolvedPolicy {
    Warn,
    Error,
}

/// Settings for network construction and delineation. Backed by an optional
/// settings.json file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Configs {
    pub verbose_mode: bool,
    pub coord_decimals: u32,
    pub type_column: String,
    pub sink_types: Vec<String>,
    pub source_types: Vec<String>,
    pub stacked_points: StackedPointPolicy,
    pub unresolved_edges: UnresolvedPolicy,
    pub acc_thresh: f64,
}

impl Default for Configs {
    fn default() -> Configs {
        Configs {
            verbose_mode: false,
            coord_decimals: 3,
            type_column: String::from("Type"),
            // 2 = catchbasin, 8 = culvert inlet
            sink_types: vec![String::from("2"), String::from("8")],
            // 5 = outfall, 9 = culvert outlet
            source_types: vec![String::from("5"), String::from("9")],
            stacked_points: StackedPointPolicy::KeepFirst,
            unresolved_edges: UnresolvedPolicy::Warn,
            acc_thresh: 1000.0,
        }
    }
}

impl Configs {
    pub fn new() -> Configs {
        Configs::default()
    }
}

/// Reads settings.json from `dir`, falling back to the defaults when the file
/// does not exist.
pub fn get_configs(dir: &Path) -> Result<Configs> {
    let config_file = dir.join(SETTINGS_FILE);
    let configs: Configs = match fs::read_to_string(config_file) {
        Ok(contents) => serde_json::from_str(&contents)?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => Configs::new(),
        Err(e) => return Err(e.into()),
    };
    Ok(configs)
}

pub fn save_configs(dir: &Path, configs: &Configs) -> Result<()> {
    let configs_json = serde_json::to_string_pretty(configs)?;
    fs::write(dir.join(SETTINGS_FILE), configs_json.as_bytes())?;
    Ok(())
}

/*
This code is part of the stormcatchments library.
Authors: Thomas Ott
Created: 05/03/2026
Last Modified: 14/10/2026
License: MIT
*/

/*
Input feature records. Reading these from files happens upstream of this
crate; callers build them from whatever vector source they use.
*/

// private sub-module defined in other files
mod attributes;
mod features;

// exports identifiers from private sub-modules in the current module namespace
pub use self::attributes::FieldData;
pub use self::features::{Crs, Layer, LineFeature, PointFeature, PointGeometry};

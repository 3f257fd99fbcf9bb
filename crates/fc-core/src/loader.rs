//! JSON configuration loader.
//!
//! # Format
//!
//! A single JSON object whose keys mirror [`CrossingConfig`].  Missing keys
//! take their defaults, so the smallest valid file is `{}`.
//!
//! ```json
//! {
//!   "station_count": 3,
//!   "ferry_capacity": 10,
//!   "seed": 7,
//!   "arrival": { "kind": "bulk_fill", "units_per_station": 50, "car_probability": 0.1 }
//! }
//! ```
//!
//! The continuous-arrival variant is selected with
//! `"arrival": { "kind": "continuous" }`.

use std::io::Read;
use std::path::Path;

use crate::{CrossingConfig, FcError, FcResult};

/// Load and validate a [`CrossingConfig`] from a JSON file.
pub fn load_config(path: &Path) -> FcResult<CrossingConfig> {
    let file = std::fs::File::open(path)?;
    load_config_reader(file)
}

/// Like [`load_config`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`) or for configs embedded in
/// the binary.
pub fn load_config_reader<R: Read>(reader: R) -> FcResult<CrossingConfig> {
    let config: CrossingConfig =
        serde_json::from_reader(reader).map_err(|e| FcError::Parse(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

//! Builds the `{"inputs": {...}}` execution body from one or two locations.
//!
//! Key names follow the GeoFRESH process contracts:
//!
//! | Locations               | Inputs                                         |
//! |-------------------------|------------------------------------------------|
//! | one coordinate          | `point` (GeoJSON Point)                        |
//! | one subcatchment        | `subc_id`                                      |
//! | two coordinates         | `point_start`, `point_end`                     |
//! | two subcatchments       | `subc_id_start`, `subc_id_end`                 |
//! | coordinate + id (mixed) | `lon_<slot>`, `lat_<slot>`, `subc_id_<slot>`   |

use geofresh_core::{Location, LocationSpec, ProcessId};
use serde_json::{json, Map, Value};

use crate::error::JobError;

/// A validated execution request for one process.
#[derive(Debug, Clone, PartialEq)]
pub struct JobRequest {
    process: ProcessId,
    inputs: Map<String, Value>,
}

impl JobRequest {
    /// Validates the locations against the process and builds its inputs.
    ///
    /// # Errors
    ///
    /// Returns [`JobError::InvalidInput`] if a location is out of range or
    /// not finite, a snapping process is given a subcatchment id, or a
    /// catalogued process is given the wrong number of locations.
    pub fn new(process: ProcessId, spec: &LocationSpec) -> Result<Self, JobError> {
        for location in spec.iter() {
            location.validated()?;
        }

        if let Some(expected) = process.expected_locations() {
            if expected != spec.len() {
                return Err(JobError::InvalidInput(format!(
                    "{process} takes {expected} location(s), got {}",
                    spec.len()
                )));
            }
        }

        if process.is_snapping() && spec.iter().any(|l| !l.is_coordinate()) {
            return Err(JobError::InvalidInput(format!(
                "{process} snaps literal coordinates and cannot take a subc_id"
            )));
        }

        Ok(Self {
            process,
            inputs: build_inputs(spec),
        })
    }

    /// Adds or replaces one input, e.g. `geometry_only`.
    #[must_use]
    pub fn with_input(mut self, key: &str, value: Value) -> Self {
        self.inputs.insert(key.to_owned(), value);
        self
    }

    #[must_use]
    pub fn process(&self) -> &ProcessId {
        &self.process
    }

    #[must_use]
    pub fn inputs(&self) -> &Map<String, Value> {
        &self.inputs
    }

    /// The JSON body sent to `/processes/{id}/execution`.
    #[must_use]
    pub fn body(&self) -> Value {
        json!({ "inputs": self.inputs })
    }
}

fn point(lon: f64, lat: f64) -> Value {
    json!({ "type": "Point", "coordinates": [lon, lat] })
}

fn build_inputs(spec: &LocationSpec) -> Map<String, Value> {
    let mut inputs = Map::new();
    match *spec {
        LocationSpec::One(Location::Coordinate { lon, lat }) => {
            inputs.insert("point".to_owned(), point(lon, lat));
        }
        LocationSpec::One(Location::Subcatchment(id)) => {
            inputs.insert("subc_id".to_owned(), json!(id));
        }
        LocationSpec::Two { start, end } => {
            let mixed = start.is_coordinate() != end.is_coordinate();
            for (slot, location) in [("start", start), ("end", end)] {
                match location {
                    Location::Coordinate { lon, lat } if mixed => {
                        inputs.insert(format!("lon_{slot}"), json!(lon));
                        inputs.insert(format!("lat_{slot}"), json!(lat));
                    }
                    Location::Coordinate { lon, lat } => {
                        inputs.insert(format!("point_{slot}"), point(lon, lat));
                    }
                    Location::Subcatchment(id) => {
                        inputs.insert(format!("subc_id_{slot}"), json!(id));
                    }
                }
            }
        }
    }
    inputs
}

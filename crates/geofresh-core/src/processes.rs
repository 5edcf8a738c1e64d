//! Catalog of the GeoFRESH pygeoapi processes this client knows about.
//!
//! Unknown process ids are still accepted; the catalog only adds arity checks
//! and descriptions for the ones the map client offers.

use std::fmt;
use std::str::FromStr;

use crate::CoreError;

/// A process the client knows, with the number of locations it takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownProcess {
    pub id: &'static str,
    pub locations: usize,
    pub description: &'static str,
}

pub const KNOWN_PROCESSES: &[KnownProcess] = &[
    KnownProcess {
        id: "get-upstream-bbox",
        locations: 1,
        description: "Bounding box of the upstream catchment",
    },
    KnownProcess {
        id: "get-upstream-dissolved-cont",
        locations: 1,
        description: "Upstream catchment as one dissolved polygon",
    },
    KnownProcess {
        id: "get-upstream-subcatchments",
        locations: 1,
        description: "Upstream subcatchment polygons",
    },
    KnownProcess {
        id: "get-upstream-streamsegments",
        locations: 1,
        description: "Upstream stream segments",
    },
    KnownProcess {
        id: "get-local-streamsegments",
        locations: 1,
        description: "Stream segment of the local subcatchment",
    },
    KnownProcess {
        id: "get-local-streamsegments-subcatchments",
        locations: 1,
        description: "Local stream segment and subcatchment polygon",
    },
    KnownProcess {
        id: "get-snapped-points",
        locations: 1,
        description: "Point snapped to the nearest stream segment",
    },
    KnownProcess {
        id: "get-snapped-point-plus",
        locations: 1,
        description: "Snapped point with segment, subcatchment and connecting line",
    },
    KnownProcess {
        id: "get-shortest-path-to-outlet",
        locations: 1,
        description: "Downstream path from the location to the sea",
    },
    KnownProcess {
        id: "get-shortest-path-between-points",
        locations: 2,
        description: "Path along the river network between two locations",
    },
];

/// Which way along the river network a process walks from its location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowDirection {
    Upstream,
    Downstream,
}

/// Identifier of a remote process, e.g. `get-upstream-bbox`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProcessId(String);

impl ProcessId {
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidProcessId`] if the id is empty or contains
    /// characters that cannot appear in a URL path segment unescaped.
    pub fn new(id: &str) -> Result<Self, CoreError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(CoreError::InvalidProcessId(
                "process id must not be empty".to_string(),
            ));
        }
        if !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        {
            return Err(CoreError::InvalidProcessId(format!(
                "'{id}' may only contain ASCII letters, digits, '-', '_' and '.'"
            )));
        }
        Ok(Self(id.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Snapping processes move a literal coordinate onto the network, so they
    /// cannot take a subcatchment id.
    #[must_use]
    pub fn is_snapping(&self) -> bool {
        self.0.contains("snapped")
    }

    #[must_use]
    pub fn flow_direction(&self) -> Option<FlowDirection> {
        if self.0.starts_with("get-upstream") {
            Some(FlowDirection::Upstream)
        } else if self.0 == "get-shortest-path-to-outlet" {
            Some(FlowDirection::Downstream)
        } else {
            None
        }
    }

    #[must_use]
    pub fn known(&self) -> Option<&'static KnownProcess> {
        KNOWN_PROCESSES.iter().find(|p| p.id == self.0)
    }

    /// Number of locations the process takes, if it is in the catalog.
    #[must_use]
    pub fn expected_locations(&self) -> Option<usize> {
        self.known().map(|p| p.locations)
    }
}

impl FromStr for ProcessId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[path = "processes_test.rs"]
mod tests;

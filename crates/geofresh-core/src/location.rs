//! Locations a job can be run for.
//!
//! A location is either a WGS84 coordinate pair or the id of an existing
//! subcatchment. Jobs take one location, or two (start and end) for routing
//! processes; the two slots may use different forms.

use std::fmt;

use crate::CoreError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Location {
    /// Longitude/latitude in WGS84 degrees.
    Coordinate { lon: f64, lat: f64 },
    /// A `subc_id` from the Hydrography90m subcatchment layer.
    Subcatchment(i64),
}

impl Location {
    /// Builds a coordinate location, rejecting non-finite or out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidLocation`] if either value is NaN, infinite,
    /// or outside the WGS84 range.
    pub fn coordinate(lon: f64, lat: f64) -> Result<Self, CoreError> {
        if !lon.is_finite() || !lat.is_finite() {
            return Err(CoreError::InvalidLocation(format!(
                "coordinates must be finite numbers, got lon={lon}, lat={lat}"
            )));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(CoreError::InvalidLocation(format!(
                "longitude {lon} is outside [-180, 180]"
            )));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoreError::InvalidLocation(format!(
                "latitude {lat} is outside [-90, 90]"
            )));
        }
        Ok(Self::Coordinate { lon, lat })
    }

    /// Builds a subcatchment location.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidLocation`] if `subc_id` is not positive.
    pub fn subcatchment(subc_id: i64) -> Result<Self, CoreError> {
        if subc_id <= 0 {
            return Err(CoreError::InvalidLocation(format!(
                "subc_id must be a positive integer, got {subc_id}"
            )));
        }
        Ok(Self::Subcatchment(subc_id))
    }

    /// Builds a location from optional form fields.
    ///
    /// Exactly one of a complete coordinate pair or a `subc_id` must be given.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidLocation`] if nothing usable is given, if
    /// only half of a coordinate pair is given, if both forms are given, or if
    /// the values themselves are invalid.
    pub fn from_parts(
        lon: Option<f64>,
        lat: Option<f64>,
        subc_id: Option<i64>,
    ) -> Result<Self, CoreError> {
        match (lon, lat, subc_id) {
            (None, None, Some(id)) => Self::subcatchment(id),
            (Some(lon), Some(lat), None) => Self::coordinate(lon, lat),
            (None, None, None) => Err(CoreError::InvalidLocation(
                "either a coordinate pair or a subc_id is required".to_string(),
            )),
            (_, _, Some(_)) => Err(CoreError::InvalidLocation(
                "give either a coordinate pair or a subc_id, not both".to_string(),
            )),
            (Some(_), None, None) | (None, Some(_), None) => Err(CoreError::InvalidLocation(
                "both lon and lat are required for a coordinate pair".to_string(),
            )),
        }
    }

    /// Re-runs the constructor checks on a location that may have been built
    /// from its variants directly.
    ///
    /// # Errors
    ///
    /// Same as [`Location::coordinate`] and [`Location::subcatchment`].
    pub fn validated(self) -> Result<Self, CoreError> {
        match self {
            Self::Coordinate { lon, lat } => Self::coordinate(lon, lat),
            Self::Subcatchment(id) => Self::subcatchment(id),
        }
    }

    #[must_use]
    pub fn is_coordinate(&self) -> bool {
        matches!(self, Self::Coordinate { .. })
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Coordinate { lon, lat } => write!(f, "{lon:.3}, {lat:.3} (lon, lat)"),
            Self::Subcatchment(id) => write!(f, "subcatchment {id}"),
        }
    }
}

/// One or two locations, in the order the process expects them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationSpec {
    One(Location),
    Two { start: Location, end: Location },
}

impl LocationSpec {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::One(_) => 1,
            Self::Two { .. } => 2,
        }
    }

    /// Always `false`; a `LocationSpec` holds at least one location.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        let (first, second) = match self {
            Self::One(only) => (only, None),
            Self::Two { start, end } => (start, Some(end)),
        };
        std::iter::once(first).chain(second)
    }
}

impl fmt::Display for LocationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One(location) => write!(f, "{location}"),
            Self::Two { start, end } => write!(f, "{start} to {end}"),
        }
    }
}

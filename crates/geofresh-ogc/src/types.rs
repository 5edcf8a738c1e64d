//! Wire types for OGC API - Processes job documents and the values the client
//! hands back to callers.

use std::fmt;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use geofresh_core::ProcessId;
use reqwest::Url;
use serde::{Deserialize, Deserializer};

use crate::error::JobError;

/// Link relation pygeoapi uses for a finished job's result document.
pub const RESULTS_REL: &str = "http://www.opengis.net/def/rel/ogc/1.0/results";

/// Status of an asynchronous job as reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Accepted,
    Running,
    Successful,
    Failed,
    Dismissed,
}

impl JobStatus {
    /// `successful`, `failed` and `dismissed` end the poll loop.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Successful | Self::Failed | Self::Dismissed)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Running => "running",
            Self::Successful => "successful",
            Self::Failed => "failed",
            Self::Dismissed => "dismissed",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Link {
    pub rel: Option<String>,
    #[serde(rename = "type")]
    pub media_type: Option<String>,
    pub href: String,
    pub title: Option<String>,
}

impl Link {
    /// `true` for the OGC results relation with a JSON media type.
    ///
    /// Media type parameters (`; charset=utf-8`) are ignored.
    #[must_use]
    pub fn is_json_result(&self) -> bool {
        let essence = self
            .media_type
            .as_deref()
            .and_then(|t| t.split(';').next())
            .map(str::trim);
        self.rel.as_deref() == Some(RESULTS_REL)
            && essence.is_some_and(|t| t.eq_ignore_ascii_case("application/json"))
    }
}

/// Job status document returned by `GET {statusUrl}`.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusInfo {
    pub status: JobStatus,
    #[serde(rename = "jobID")]
    pub job_id: Option<String>,
    /// Entries that are not valid links (no `href`) are skipped.
    #[serde(default, deserialize_with = "lenient_links")]
    pub links: Vec<Link>,
    pub description: Option<String>,
    pub message: Option<String>,
    pub progress: Option<u8>,
}

impl StatusInfo {
    #[must_use]
    pub fn result_link(&self) -> Option<&Link> {
        self.links.iter().find(|link| link.is_json_result())
    }

    /// Human-readable reason for a `failed` or `dismissed` job: the
    /// `description`, else the `message`, else `Job {status}.`.
    #[must_use]
    pub fn failure_description(&self) -> String {
        [self.description.as_deref(), self.message.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|text| !text.is_empty())
            .map_or_else(|| format!("Job {}.", self.status), str::to_owned)
    }
}

fn lenient_links<'de, D>(deserializer: D) -> Result<Vec<Link>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect())
}

/// pygeoapi error body, e.g. `{"code": "...", "description": "..."}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub(crate) description: Option<String>,
}

/// A submitted job, owned by the poll loop until it reaches a terminal state.
#[derive(Debug, Clone)]
pub struct JobHandle {
    /// The `Location` header of the submission response, verbatim.
    pub status_url: String,
    pub process: ProcessId,
    pub submitted_at: DateTime<Utc>,
    pub(crate) execution_url: Url,
    pub(crate) started_at: Instant,
}

impl JobHandle {
    /// Time since the submission response arrived.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Absolute status URL; relative `Location` values are resolved against
    /// the execution URL.
    pub(crate) fn resolved_status_url(&self) -> Result<Url, JobError> {
        Url::parse(&self.status_url)
            .or_else(|_| self.execution_url.join(&self.status_url))
            .map_err(|e| {
                JobError::PollFailed(format!("invalid status URL '{}': {e}", self.status_url))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoJsonKind {
    FeatureCollection,
    Feature,
    GeometryCollection,
}

impl GeoJsonKind {
    fn parse(kind: &str) -> Option<Self> {
        match kind {
            "FeatureCollection" => Some(Self::FeatureCollection),
            "Feature" => Some(Self::Feature),
            "GeometryCollection" => Some(Self::GeometryCollection),
            _ => None,
        }
    }
}

impl fmt::Display for GeoJsonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::FeatureCollection => "FeatureCollection",
            Self::Feature => "Feature",
            Self::GeometryCollection => "GeometryCollection",
        })
    }
}

/// A result document whose `type` is one of the GeoJSON container types.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoJson {
    kind: GeoJsonKind,
    value: serde_json::Value,
}

impl GeoJson {
    /// Validates the top-level `type` of a parsed result.
    ///
    /// # Errors
    ///
    /// Returns [`JobError::ResultNotGeoJson`] if the value is not an object or
    /// its `type` is not `FeatureCollection`, `Feature` or
    /// `GeometryCollection`.
    pub fn from_value(value: serde_json::Value) -> Result<Self, JobError> {
        let found = value
            .get("type")
            .and_then(serde_json::Value::as_str)
            .map(str::to_owned);
        match found.as_deref().and_then(GeoJsonKind::parse) {
            Some(kind) => Ok(Self { kind, value }),
            None => Err(JobError::ResultNotGeoJson { found }),
        }
    }

    #[must_use]
    pub fn kind(&self) -> GeoJsonKind {
        self.kind
    }

    #[must_use]
    pub fn value(&self) -> &serde_json::Value {
        &self.value
    }

    #[must_use]
    pub fn into_value(self) -> serde_json::Value {
        self.value
    }

    /// Features (or geometries) in the document; a lone `Feature` counts as one.
    #[must_use]
    pub fn feature_count(&self) -> usize {
        let members = |key: &str| {
            self.value
                .get(key)
                .and_then(serde_json::Value::as_array)
                .map_or(0, Vec::len)
        };
        match self.kind {
            GeoJsonKind::FeatureCollection => members("features"),
            GeoJsonKind::GeometryCollection => members("geometries"),
            GeoJsonKind::Feature => 1,
        }
    }
}

/// What a successful job produced.
#[derive(Debug, Clone, PartialEq)]
pub enum JobResult {
    GeoJson(GeoJson),
    /// The result body was literal `null`.
    Empty,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn status(doc: serde_json::Value) -> StatusInfo {
        serde_json::from_value(doc).expect("valid status document")
    }

    #[test]
    fn parses_pygeoapi_status_document() {
        let info = status(json!({
            "jobID": "1f1c9a8e",
            "status": "successful",
            "message": "Job complete",
            "progress": 100,
            "links": [{
                "href": "https://example.org/pygeoapi/jobs/1f1c9a8e/results?f=json",
                "rel": RESULTS_REL,
                "type": "application/json",
                "title": "results of job 1f1c9a8e as JSON"
            }]
        }));
        assert_eq!(info.status, JobStatus::Successful);
        assert_eq!(info.job_id.as_deref(), Some("1f1c9a8e"));
        assert!(info.result_link().is_some());
    }

    #[test]
    fn unknown_status_does_not_parse() {
        let parsed = serde_json::from_value::<StatusInfo>(json!({"status": "paused"}));
        assert!(parsed.is_err());
    }

    #[test]
    fn terminal_states() {
        assert!(!JobStatus::Accepted.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
        assert!(JobStatus::Successful.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(JobStatus::Dismissed.is_terminal());
    }

    #[test]
    fn result_link_needs_rel_and_json_type() {
        let info = status(json!({
            "status": "successful",
            "links": [
                {"href": "a", "rel": "self", "type": "application/json"},
                {"href": "b", "rel": RESULTS_REL, "type": "text/html"},
                {"href": "c", "rel": RESULTS_REL, "type": "application/json; charset=utf-8"}
            ]
        }));
        assert_eq!(info.result_link().map(|l| l.href.as_str()), Some("c"));
    }

    #[test]
    fn links_without_rel_or_href_do_not_break_the_document() {
        let info = status(json!({
            "status": "successful",
            "links": [
                {"href": "https://example.org/jobs/abc?f=html", "type": "text/html"},
                {"rel": "alternate", "type": "application/json"},
                {"href": "c", "rel": RESULTS_REL, "type": "application/json"}
            ]
        }));
        assert_eq!(info.links.len(), 2);
        assert_eq!(info.links[0].rel, None);
        assert_eq!(info.result_link().map(|l| l.href.as_str()), Some("c"));
    }

    #[test]
    fn null_links_are_empty() {
        let info = status(json!({"status": "running", "links": null}));
        assert!(info.links.is_empty());
    }

    #[test]
    fn failure_description_prefers_description_then_message() {
        let both = status(json!({"status": "failed", "description": "boom", "message": "other"}));
        assert_eq!(both.failure_description(), "boom");

        let message_only = status(json!({"status": "failed", "message": "boom2"}));
        assert_eq!(message_only.failure_description(), "boom2");

        let neither = status(json!({"status": "dismissed"}));
        assert_eq!(neither.failure_description(), "Job dismissed.");

        let blank = status(json!({"status": "failed", "description": ""}));
        assert_eq!(blank.failure_description(), "Job failed.");
    }

    #[test]
    fn geojson_accepts_container_types() {
        let fc = GeoJson::from_value(json!({
            "type": "FeatureCollection",
            "features": [{"type": "Feature"}, {"type": "Feature"}]
        }))
        .unwrap();
        assert_eq!(fc.kind(), GeoJsonKind::FeatureCollection);
        assert_eq!(fc.feature_count(), 2);

        let gc = GeoJson::from_value(json!({"type": "GeometryCollection", "geometries": []}))
            .unwrap();
        assert_eq!(gc.feature_count(), 0);

        let feature = GeoJson::from_value(json!({"type": "Feature", "geometry": null})).unwrap();
        assert_eq!(feature.feature_count(), 1);
    }

    #[test]
    fn geojson_rejects_bare_geometries_and_non_objects() {
        let polygon = GeoJson::from_value(json!({"type": "Polygon", "coordinates": []}));
        assert_eq!(
            polygon.unwrap_err(),
            JobError::ResultNotGeoJson {
                found: Some("Polygon".to_owned())
            }
        );
        assert!(matches!(
            GeoJson::from_value(json!([1, 2, 3])),
            Err(JobError::ResultNotGeoJson { found: None })
        ));
    }
}

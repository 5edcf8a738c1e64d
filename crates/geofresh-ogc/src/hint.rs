//! Advisory run-time estimate for upstream and downstream queries.
//!
//! How long a network walk takes depends on where the location sits in the
//! river network. A cheap synchronous call to `get-local-streamsegments`
//! returns the Strahler order of the segment, which is a good proxy: low
//! orders are headwaters (small upstream catchment, long way to the sea),
//! high orders are large rivers (the opposite).

use std::fmt;

use geofresh_core::{FlowDirection, Location, LocationSpec, ProcessId};
use reqwest::header::ACCEPT;
use serde_json::Value;

use crate::client::OgcClient;
use crate::error::{FailureReason, JobError};
use crate::payload::JobRequest;

const STREAM_SEGMENT_PROCESS: &str = "get-local-streamsegments";

/// Expected run time of a query, derived from the Strahler order at its location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationHint {
    pub direction: FlowDirection,
    pub strahler: u32,
    pub message: &'static str,
}

impl DurationHint {
    /// Looks up the hint for `strahler` in the table for `direction`.
    ///
    /// | Strahler | Upstream                           | Downstream               |
    /// |----------|------------------------------------|--------------------------|
    /// | 1-3      | probably superfast                 | will take a long time    |
    /// | 4-6      | may take a little                  | may take a while         |
    /// | 7-9      | may take a while                   | probably reasonably fast |
    /// | >= 10    | will take a long time or even fail | probably superfast       |
    ///
    /// Returns `None` for order 0, which the stream network never assigns.
    #[must_use]
    pub fn for_direction(direction: FlowDirection, strahler: u32) -> Option<Self> {
        let message = match (direction, strahler) {
            (_, 0) => return None,
            (FlowDirection::Upstream, 1..=3) => "probably superfast",
            (FlowDirection::Upstream, 4..=6) => "may take a little",
            (FlowDirection::Upstream, 7..=9) => "may take a while",
            (FlowDirection::Upstream, _) => "will take a long time or even fail",
            (FlowDirection::Downstream, 1..=3) => "will take a long time",
            (FlowDirection::Downstream, 4..=6) => "may take a while",
            (FlowDirection::Downstream, 7..=9) => "probably reasonably fast",
            (FlowDirection::Downstream, _) => "probably superfast",
        };
        Some(Self {
            direction,
            strahler,
            message,
        })
    }
}

impl fmt::Display for DurationHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Strahler order {}, this {}", self.strahler, self.message)
    }
}

impl OgcClient {
    /// Reads the Strahler order of the stream segment at `location`.
    ///
    /// Runs `get-local-streamsegments` synchronously with
    /// `geometry_only: false` so the segment's properties are returned.
    /// `Ok(None)` means the service answered without an order.
    ///
    /// # Errors
    ///
    /// Returns [`JobError::SubmissionFailed`] on a transport failure, a
    /// non-2xx status or a body that is not JSON.
    pub async fn strahler_order(&self, location: &Location) -> Result<Option<u32>, JobError> {
        let process = ProcessId::new(STREAM_SEGMENT_PROCESS)?;
        let request = JobRequest::new(process, &LocationSpec::One(*location))?
            .with_input("geometry_only", Value::Bool(false));
        let url = self.execution_url(request.process());
        tracing::debug!(location = %location, url = %url, "requesting strahler order");

        let response = self
            .client
            .post(url)
            .header(ACCEPT, "application/json")
            .json(&request.body())
            .send()
            .await
            .map_err(|e| JobError::SubmissionFailed(FailureReason::from_transport(&e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| JobError::SubmissionFailed(FailureReason::from_transport(&e)))?;
        if !status.is_success() {
            return Err(JobError::SubmissionFailed(FailureReason::classify(
                status, &body,
            )));
        }

        let document: Value = serde_json::from_str(&body)
            .map_err(|e| JobError::SubmissionFailed(FailureReason::MalformedBody(e.to_string())))?;
        Ok(strahler_from_document(&document))
    }

    /// Duration hint for single-location upstream or downstream queries.
    ///
    /// Returns `None` for every other request, and when the pre-request fails;
    /// the hint is advisory and its failures are only logged.
    pub async fn duration_hint(
        &self,
        process: &ProcessId,
        spec: &LocationSpec,
    ) -> Option<DurationHint> {
        let direction = process.flow_direction()?;
        let LocationSpec::One(location) = spec else {
            return None;
        };

        match self.strahler_order(location).await {
            Ok(Some(strahler)) => {
                let hint = DurationHint::for_direction(direction, strahler);
                if hint.is_none() {
                    tracing::warn!(strahler, "unexpected strahler order");
                }
                hint
            }
            Ok(None) => {
                tracing::warn!(location = %location, "no strahler order found");
                None
            }
            Err(err) => {
                tracing::warn!(location = %location, error = %err, "strahler pre-request failed");
                None
            }
        }
    }
}

/// `properties.strahler_order` of a Feature, or of the first member of a
/// FeatureCollection.
fn strahler_from_document(document: &Value) -> Option<u32> {
    let feature = match document.get("type").and_then(Value::as_str) {
        Some("FeatureCollection") => document.get("features")?.get(0)?,
        _ => document,
    };
    let order = feature.get("properties")?.get("strahler_order")?;
    let order = match order {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    u32::try_from(order).ok()
}

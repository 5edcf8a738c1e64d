//! Fetching and validating the result document of a successful job.

use reqwest::header::ACCEPT;
use reqwest::Url;
use tokio_util::sync::CancellationToken;

use crate::client::OgcClient;
use crate::error::{FailureReason, JobError};
use crate::types::{GeoJson, JobResult, StatusInfo};

impl OgcClient {
    /// Follows the JSON results link of a `successful` status document.
    ///
    /// Relative link targets are resolved against `status_url`.
    ///
    /// # Errors
    ///
    /// - [`JobError::NoResultLink`] if `info` has no JSON results link; no
    ///   request is made.
    /// - [`JobError::ResultFetchFailed`] on a transport failure, a non-2xx
    ///   status or a body that is not JSON.
    /// - [`JobError::ResultNotGeoJson`] if the document is not a
    ///   `FeatureCollection`, `Feature` or `GeometryCollection`.
    /// - [`JobError::Cancelled`] if `cancel` fires.
    pub async fn fetch_result(
        &self,
        status_url: &Url,
        info: &StatusInfo,
        cancel: &CancellationToken,
    ) -> Result<JobResult, JobError> {
        let link = info.result_link().ok_or(JobError::NoResultLink)?;
        let url = status_url.join(&link.href).map_err(|e| {
            JobError::ResultFetchFailed(FailureReason::MalformedBody(format!(
                "invalid result link '{}': {e}",
                link.href
            )))
        })?;
        tracing::debug!(url = %url, "fetching job result");

        let fetch = async {
            let response = self
                .client
                .get(url)
                .header(ACCEPT, "application/json")
                .send()
                .await?;
            let status = response.status();
            let body = response.text().await?;
            Ok::<_, reqwest::Error>((status, body))
        };
        let fetched = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(JobError::Cancelled),
            fetched = fetch => fetched,
        };
        let (status, body) =
            fetched.map_err(|e| JobError::ResultFetchFailed(FailureReason::from_transport(&e)))?;

        if !status.is_success() {
            let reason = FailureReason::classify(status, &body);
            tracing::warn!(status = status.as_u16(), reason = %reason, "result fetch rejected");
            return Err(JobError::ResultFetchFailed(reason));
        }

        parse_result(&body)
    }
}

/// `null` is an empty result; anything else must be GeoJSON.
fn parse_result(body: &str) -> Result<JobResult, JobError> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| JobError::ResultFetchFailed(FailureReason::MalformedBody(e.to_string())))?;
    if value.is_null() {
        return Ok(JobResult::Empty);
    }
    GeoJson::from_value(value).map(JobResult::GeoJson)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GeoJsonKind;

    #[test]
    fn null_is_empty() {
        assert_eq!(parse_result("null").unwrap(), JobResult::Empty);
        assert_eq!(parse_result("  null\n").unwrap(), JobResult::Empty);
    }

    #[test]
    fn feature_collection_is_accepted() {
        let result =
            parse_result(r#"{"type":"FeatureCollection","features":[{"type":"Feature"}]}"#)
                .unwrap();
        match result {
            JobResult::GeoJson(geojson) => {
                assert_eq!(geojson.kind(), GeoJsonKind::FeatureCollection);
                assert_eq!(geojson.feature_count(), 1);
            }
            JobResult::Empty => panic!("expected GeoJSON"),
        }
    }

    #[test]
    fn html_body_is_malformed() {
        let err = parse_result("<html>oops</html>").unwrap_err();
        assert!(matches!(
            err,
            JobError::ResultFetchFailed(FailureReason::MalformedBody(_))
        ));
    }

    #[test]
    fn bare_geometry_is_not_geojson() {
        let err = parse_result(r#"{"type":"LineString","coordinates":[[0,0],[1,1]]}"#).unwrap_err();
        assert_eq!(
            err,
            JobError::ResultNotGeoJson {
                found: Some("LineString".to_owned())
            }
        );
    }
}

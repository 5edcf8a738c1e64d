//! `geofresh run`: one job from the command line to stdout.

use std::future::Future;
use std::str::FromStr;

use anyhow::Context;
use clap::Args;
use geofresh_core::AppConfig;
use geofresh_ogc::{
    CancellationToken, DurationHint, JobHandle, JobObserver, Location, LocationSpec, OgcClient,
    Outcome, ProcessId, ProgressUpdate,
};

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Process to execute, e.g. get-upstream-bbox
    #[arg(long)]
    pub process: String,
    /// Longitude of the (first) location
    #[arg(long, allow_negative_numbers = true)]
    pub lon: Option<f64>,
    /// Latitude of the (first) location
    #[arg(long, allow_negative_numbers = true)]
    pub lat: Option<f64>,
    /// Subcatchment id of the (first) location
    #[arg(long)]
    pub subc_id: Option<i64>,
    /// Longitude of the end location, for two-location processes
    #[arg(long, allow_negative_numbers = true)]
    pub lon2: Option<f64>,
    /// Latitude of the end location
    #[arg(long, allow_negative_numbers = true)]
    pub lat2: Option<f64>,
    /// Subcatchment id of the end location
    #[arg(long)]
    pub subc_id2: Option<i64>,
    /// Base URL of the pygeoapi service (overrides GEOFRESH_SERVICE_URL)
    #[arg(long)]
    pub service_url: Option<String>,
    /// Delay before each status request in milliseconds
    #[arg(long)]
    pub poll_interval_ms: Option<u64>,
    /// Give up after this many seconds
    #[arg(long)]
    pub max_wait_secs: Option<u64>,
    /// Skip the Strahler-order pre-request for upstream/downstream processes
    #[arg(long)]
    pub no_hint: bool,
    /// Print the GeoJSON on a single line
    #[arg(long)]
    pub compact: bool,
}

impl RunArgs {
    /// The first location, plus the second one if any of its flags is set.
    pub(crate) fn location_spec(&self) -> anyhow::Result<LocationSpec> {
        let start = Location::from_parts(self.lon, self.lat, self.subc_id)
            .context("invalid start location")?;
        if self.lon2.is_none() && self.lat2.is_none() && self.subc_id2.is_none() {
            return Ok(LocationSpec::One(start));
        }
        let end = Location::from_parts(self.lon2, self.lat2, self.subc_id2)
            .context("invalid end location")?;
        Ok(LocationSpec::Two { start, end })
    }

    /// Applies command-line overrides on top of the environment config.
    pub(crate) fn apply_overrides(&self, mut config: AppConfig) -> anyhow::Result<AppConfig> {
        if let Some(url) = &self.service_url {
            config.service_url.clone_from(url);
        }
        if let Some(ms) = self.poll_interval_ms {
            anyhow::ensure!(ms > 0, "--poll-interval-ms must be greater than zero");
            config.poll_interval_ms = ms;
        }
        if let Some(secs) = self.max_wait_secs {
            config.poll_max_wait_secs = secs;
        }
        Ok(config)
    }
}

/// Reports job progress through the log on stderr.
struct ProgressLog;

impl JobObserver for ProgressLog {
    fn on_submitted(&self, handle: &JobHandle) {
        tracing::info!(
            process = %handle.process,
            status_url = %handle.status_url,
            "job submitted"
        );
    }

    fn on_progress(&self, update: &ProgressUpdate) {
        tracing::info!(
            poll = update.poll,
            status = %update.status,
            elapsed_secs = update.elapsed_secs(),
            "waiting for job"
        );
    }
}

pub(crate) async fn run_process(config: AppConfig, args: RunArgs) -> anyhow::Result<()> {
    let process = ProcessId::from_str(&args.process)?;
    let spec = args.location_spec()?;
    let config = args.apply_overrides(config)?;
    let client = OgcClient::from_app_config(&config)?;

    let cancel = CancellationToken::new();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("interrupted, cancelling job");
                cancel.cancel();
            }
        })
    };

    tracing::info!(process = %process, locations = %spec, service = %client.base_url(), "starting job");

    let hint = async {
        if args.no_hint {
            return None;
        }
        tokio::select! {
            biased;
            () = cancel.cancelled() => None,
            hint = client.duration_hint(&process, &spec) => hint,
        }
    };
    let job = client.run(process.clone(), &spec, &ProgressLog, &cancel);
    let report = with_hint(job, hint, |hint| eprintln!("{hint}")).await;
    interrupt.abort();

    tracing::debug!(polls = report.polls, progress_updates = report.trail.len(), "job report");
    if let Some(output) = render(&report.outcome, args.compact)? {
        println!("{output}");
    }
    Ok(())
}

/// Drives `job` to completion with the duration hint running alongside.
///
/// The hint is shown if it arrives first and dropped as soon as the job ends.
pub(crate) async fn with_hint<T, J, H, S>(job: J, hint: H, show: S) -> T
where
    J: Future<Output = T>,
    H: Future<Output = Option<DurationHint>>,
    S: FnOnce(DurationHint),
{
    tokio::pin!(job);
    tokio::select! {
        biased;
        out = &mut job => out,
        hint = hint => {
            if let Some(hint) = hint {
                show(hint);
            }
            job.await
        }
    }
}

/// Stdout text for a finished job. Empty results are explained on stderr and
/// print nothing; failures become the command's error.
pub(crate) fn render(outcome: &Outcome, compact: bool) -> anyhow::Result<Option<String>> {
    match outcome {
        Outcome::Success(geojson) => {
            let text = if compact {
                serde_json::to_string(geojson.value())?
            } else {
                serde_json::to_string_pretty(geojson.value())?
            };
            Ok(Some(text))
        }
        Outcome::Empty => {
            eprintln!("{}", outcome.message());
            Ok(None)
        }
        Outcome::Failed(err) => anyhow::bail!("{err}"),
    }
}

#[cfg(test)]
#[path = "run_test.rs"]
mod tests;

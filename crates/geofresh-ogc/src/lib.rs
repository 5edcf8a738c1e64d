//! Client for GeoFRESH processes served through OGC API - Processes (pygeoapi).
//!
//! A job goes through four stages: the payload is built from one or two
//! locations, submitted with `Prefer: respond-async`, its status URL is polled
//! until a terminal state, and the GeoJSON result is fetched and validated.
//! [`OgcClient::run`] drives the whole sequence and always returns a
//! [`JobReport`]; failures never escape as `Err`.

pub mod client;
pub mod error;
pub mod hint;
pub mod observer;
pub mod outcome;
pub mod payload;
mod poll;
mod result;
mod retry;
mod run;
mod submit;
pub mod types;

pub use client::{OgcClient, PollConfig};
pub use error::{ClientError, FailureReason, JobError};
pub use hint::DurationHint;
pub use observer::{JobObserver, NoopObserver};
pub use outcome::{JobReport, Outcome, ProgressUpdate};
pub use payload::JobRequest;
pub use types::{GeoJson, GeoJsonKind, JobHandle, JobResult, JobStatus, Link, StatusInfo};

pub use geofresh_core::{FlowDirection, Location, LocationSpec, ProcessId};
pub use tokio_util::sync::CancellationToken;

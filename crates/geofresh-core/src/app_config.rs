/// Runtime settings for talking to a GeoFRESH pygeoapi deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Base URL of the pygeoapi instance, without the `/processes` suffix.
    pub service_url: String,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Delay before every status poll.
    pub poll_interval_ms: u64,
    /// Wall-clock ceiling for a single job, measured from submission.
    pub poll_max_wait_secs: u64,
    /// Consecutive transient poll failures tolerated before giving up.
    pub poll_max_retries: u32,
}

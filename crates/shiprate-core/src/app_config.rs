use std::path::PathBuf;

/// Process-level configuration resolved from the environment.
///
/// Provider credentials are not stored here; the caller reads
/// `SHIPRATE_<FIELD_KEY>` variables against the selected provider's own
/// settings-field schema, keeping this struct provider-agnostic.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Slug of the distance provider to use (e.g. `google_routes`).
    pub provider: String,
    pub rates_path: PathBuf,
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

use std::env;
use std::str::FromStr;

/// What to do with a manual attendee row, or a spreadsheet row, that has
/// content but no name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlankRowPolicy {
    #[default]
    Skip,
    Reject,
}

impl FromStr for BlankRowPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "reject" => Ok(Self::Reject),
            other => Err(format!("expected 'skip' or 'reject', got '{other}'")),
        }
    }
}

/// Process configuration, loaded once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub session_key: Option<String>,
    pub default_university: String,
    /// Per uploaded file.
    pub max_upload_bytes: usize,
    /// Whole multipart body.
    pub max_request_bytes: usize,
    /// Images wider than this are downscaled before embedding.
    pub max_image_px: u32,
    pub blank_rows: BlankRowPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            session_key: None,
            default_university: "CHRIST (Deemed to be University), Bangalore".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
            max_request_bytes: 60 * 1024 * 1024,
            max_image_px: 1200,
            blank_rows: BlankRowPolicy::Skip,
        }
    }
}

impl AppConfig {
    /// Read configuration from the environment. Unset variables keep their
    /// defaults; malformed values are logged and ignored.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            session_key: env::var("SESSION_KEY").ok(),
            default_university: env::var("DEFAULT_UNIVERSITY")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.default_university),
            max_upload_bytes: parse_var("MAX_UPLOAD_BYTES", defaults.max_upload_bytes),
            max_request_bytes: parse_var("MAX_REQUEST_BYTES", defaults.max_request_bytes),
            max_image_px: parse_var("MAX_IMAGE_PX", defaults.max_image_px),
            blank_rows: parse_var("ATTENDANCE_BLANK_ROWS", defaults.blank_rows),
        }
    }
}

fn parse_var<T>(name: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => match raw.parse::<T>() {
            Ok(v) => v,
            Err(e) => {
                log::warn!("Ignoring {name}={raw:?}: {e}");
                default
            }
        },
        Err(_) => default,
    }
}

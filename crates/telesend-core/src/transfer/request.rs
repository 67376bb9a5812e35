//! Immutable description of one outbound POST and its engine options.

use std::collections::HashMap;
use std::time::Duration;

use crate::config::TelesendConfig;

/// One outbound call. The method is always POST with an empty body.
///
/// No validation happens here: an empty or malformed URL is passed through
/// and surfaces later as a transport error.
#[derive(Debug, Clone)]
pub struct TransferRequest {
    url: String,
    headers: HashMap<String, String>,
}

impl TransferRequest {
    pub fn new(url: impl Into<String>, headers: HashMap<String, String>) -> Self {
        Self {
            url: url.into(),
            headers,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Header lines in curl's `Name: value` form. An empty value becomes
    /// `Name;`, since curl reads `Name:` as "remove this header".
    pub(crate) fn header_lines(&self) -> impl Iterator<Item = String> + '_ {
        self.headers.iter().map(|(k, v)| {
            let (name, value) = (k.trim(), v.trim());
            if value.is_empty() {
                format!("{name};")
            } else {
                format!("{name}: {value}")
            }
        })
    }

    /// Host part of the URL for log fields; full URLs may carry credentials.
    pub(crate) fn host_for_log(&self) -> String {
        url::Url::parse(&self.url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_else(|| "<unparsed>".to_string())
    }
}

/// Per-transfer engine settings, projected from [`TelesendConfig`].
#[derive(Debug, Clone)]
pub struct TransferOptions {
    pub connect_timeout: Duration,
    /// Whole-transfer limit; `None` leaves curl's default (no limit).
    pub timeout: Option<Duration>,
    pub user_agent: Option<String>,
    /// Stack size for the background thread; `None` uses the std default.
    pub worker_stack_size: Option<usize>,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self::from(&TelesendConfig::default())
    }
}

impl From<&TelesendConfig> for TransferOptions {
    fn from(cfg: &TelesendConfig) -> Self {
        Self {
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            timeout: cfg.timeout_secs.map(Duration::from_secs),
            user_agent: cfg.user_agent.clone(),
            worker_stack_size: cfg.worker_stack_size,
        }
    }
}

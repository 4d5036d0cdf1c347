use crate::{ErrorLocation, ModelError};

use std::panic::Location;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_TIMEOUT_MS: u64 = 30 * 1000;
pub const DEFAULT_REDIRECT_TIMEOUT_MS: i64 = 3 * 1000;

/// Timing options of an iframe HTTP request.
///
/// `timeout_ms` bounds the whole request. `redirect_timeout_ms` is the
/// settling window after a load lands on a different path than requested;
/// zero or less resolves on the first load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpRequestOptions {
    #[serde(rename = "timeout", default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(rename = "redirectTimeout", default = "default_redirect_timeout_ms")]
    pub redirect_timeout_ms: i64,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}
fn default_redirect_timeout_ms() -> i64 {
    DEFAULT_REDIRECT_TIMEOUT_MS
}

impl Default for HttpRequestOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            redirect_timeout_ms: DEFAULT_REDIRECT_TIMEOUT_MS,
        }
    }
}

impl HttpRequestOptions {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// The settling window, or `None` when redirect settling is disabled.
    pub fn redirect_window(&self) -> Option<Duration> {
        u64::try_from(self.redirect_timeout_ms)
            .ok()
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }
}

/// Builder for validated [`HttpRequestOptions`]. Unset fields take the defaults.
#[derive(Debug, Default)]
pub struct HttpRequestOptionsBuilder {
    timeout_ms: Option<u64>,
    redirect_timeout_ms: Option<i64>,
}

impl HttpRequestOptionsBuilder {
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    pub fn with_redirect_timeout_ms(mut self, redirect_timeout_ms: i64) -> Self {
        self.redirect_timeout_ms = Some(redirect_timeout_ms);
        self
    }

    #[track_caller]
    pub fn build(self) -> Result<HttpRequestOptions, ModelError> {
        let timeout_ms = self.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS);
        if timeout_ms == 0 {
            return Err(ModelError::RequestOptions {
                field: "timeout",
                message: String::from("must be non-zero"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(HttpRequestOptions {
            timeout_ms,
            redirect_timeout_ms: self
                .redirect_timeout_ms
                .unwrap_or(DEFAULT_REDIRECT_TIMEOUT_MS),
        })
    }
}

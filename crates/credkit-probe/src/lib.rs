//! Connectivity probes
//!
//! A probe is one `HEAD` request carrying the credential as a bearer token.
//! It is advisory: it never returns an error and always returns within the
//! caller's timeout, whatever the HTTP client's own defaults are.
//!
//! Classification:
//! - any status below 500 (401/403 included) → [`ProbeResult::Reachable`]
//! - a 5xx status or a transport failure → [`ProbeResult::Unreachable`]
//! - the timeout elapsing → [`ProbeResult::Inconclusive`] (`"timeout"`)

use async_trait::async_trait;
use credkit_registry::ProbeTarget;
use reqwest::header::USER_AGENT;
use std::fmt;
use std::time::Duration;

/// Default time budget for one probe
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// User agent sent with every probe
pub const PROBE_USER_AGENT: &str = concat!("credkit-setup/", env!("CARGO_PKG_VERSION"));

/// Outcome of a probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeResult {
    /// The service answered with a non-server-error status
    Reachable,
    /// Server error or transport failure
    Unreachable(String),
    /// No answer could be obtained in time, or the request was never sent
    Inconclusive(String),
}

impl ProbeResult {
    /// Whether the service answered with a non-server-error status
    #[inline]
    #[must_use]
    pub fn is_reachable(&self) -> bool {
        matches!(self, Self::Reachable)
    }

    /// Shorthand for the timeout outcome
    #[must_use]
    pub fn timeout() -> Self {
        Self::Inconclusive("timeout".to_string())
    }

    /// Classify an HTTP status code
    #[must_use]
    pub fn from_status(status: u16) -> Self {
        if status < 500 {
            Self::Reachable
        } else {
            Self::Unreachable(format!("server error {status}"))
        }
    }
}

impl fmt::Display for ProbeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reachable => f.write_str("reachable"),
            Self::Unreachable(reason) => write!(f, "unreachable ({reason})"),
            Self::Inconclusive(reason) => write!(f, "inconclusive ({reason})"),
        }
    }
}

/// Reachability check against a descriptor's probe target
#[async_trait]
pub trait Prober: Send + Sync {
    /// Probe `target` once; must return within `timeout`
    async fn probe(&self, target: &ProbeTarget, credential: &str, timeout: Duration) -> ProbeResult;
}

/// URL scheme used to reach probe targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scheme {
    /// Plain HTTP; only for local test servers
    Http,
    /// TLS
    #[default]
    Https,
}

impl Scheme {
    /// URL scheme prefix without `://`
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

/// [`Prober`] issuing real HTTP requests
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: reqwest::Client,
    scheme: Scheme,
}

impl HttpProber {
    /// Create an HTTPS prober that does not follow redirects
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be initialised.
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self {
            client,
            scheme: Scheme::Https,
        })
    }

    /// With URL scheme
    #[inline]
    #[must_use]
    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Full URL for a target
    #[must_use]
    pub fn url_for(&self, target: &ProbeTarget) -> String {
        format!("{}://{}{}", self.scheme.as_str(), target.hostname, target.path)
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, target: &ProbeTarget, credential: &str, timeout: Duration) -> ProbeResult {
        let url = self.url_for(target);
        tracing::debug!(%url, ?timeout, "probing");

        let request = self
            .client
            .head(&url)
            .bearer_auth(credential)
            .header(USER_AGENT, PROBE_USER_AGENT)
            .timeout(timeout)
            .send();

        let result = match tokio::time::timeout(timeout, request).await {
            Err(_) => ProbeResult::timeout(),
            Ok(Ok(response)) => ProbeResult::from_status(response.status().as_u16()),
            Ok(Err(e)) => classify_error(&e),
        };

        tracing::debug!(%url, %result, "probe finished");
        result
    }
}

fn classify_error(error: &reqwest::Error) -> ProbeResult {
    if error.is_timeout() {
        ProbeResult::timeout()
    } else if error.is_builder() {
        ProbeResult::Inconclusive(format!("request not sent: {error}"))
    } else {
        ProbeResult::Unreachable(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_below_500_is_reachable() {
        for status in [200, 204, 301, 400, 401, 403, 404, 499] {
            assert_eq!(ProbeResult::from_status(status), ProbeResult::Reachable, "{status}");
        }
    }

    #[test]
    fn server_errors_are_unreachable() {
        for status in [500, 502, 503] {
            assert!(matches!(ProbeResult::from_status(status), ProbeResult::Unreachable(_)));
        }
    }

    #[test]
    fn url_joins_scheme_host_and_path() {
        let prober = HttpProber::new().unwrap();
        let target = ProbeTarget::new("api.example.com", "/v1/ping");
        assert_eq!(prober.url_for(&target), "https://api.example.com/v1/ping");
        let prober = prober.with_scheme(Scheme::Http);
        assert_eq!(prober.url_for(&ProbeTarget::root("127.0.0.1:9")), "http://127.0.0.1:9/");
    }
}

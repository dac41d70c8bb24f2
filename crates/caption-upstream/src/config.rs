//! Upstream endpoint configuration

use std::fmt;
use std::time::Duration;

use url::Url;

/// Header carrying the vendor credential
pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Where images are sent and how to authenticate.
///
/// The URL is used as-is, query string included, so API version and
/// requested features belong in it.
#[derive(Clone)]
pub struct UpstreamConfig {
    pub url: Url,
    pub subscription_key: String,
    /// Overall request timeout. `None` keeps the HTTP client default.
    pub timeout: Option<Duration>,
}

impl UpstreamConfig {
    pub fn new(url: Url, subscription_key: impl Into<String>) -> Self {
        Self {
            url,
            subscription_key: subscription_key.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

// The key must never end up in logs.
impl fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("url", &self.url.as_str())
            .field("subscription_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_key() {
        let config = UpstreamConfig::new(
            Url::parse("https://vision.example.com/analyze?features=caption").unwrap(),
            "super-secret-key",
        );
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret-key"));
        assert!(rendered.contains("<redacted>"));
        assert!(rendered.contains("features=caption"));
    }

    #[test]
    fn test_timeout_defaults_to_none() {
        let url = Url::parse("https://vision.example.com/analyze").unwrap();
        assert!(UpstreamConfig::new(url.clone(), "k").timeout.is_none());
        assert_eq!(
            UpstreamConfig::new(url, "k")
                .with_timeout(Duration::from_secs(5))
                .timeout,
            Some(Duration::from_secs(5))
        );
    }
}

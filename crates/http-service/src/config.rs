use std::time::Duration;

/// Builder for [`HttpServiceConfig`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct HttpServiceConfigBuilder {
    base_url: Option<String>,
    request_timeout: Option<Duration>,
}

impl HttpServiceConfigBuilder {
    /// Creates a builder without a base URL.
    ///
    /// Without a base URL, request paths are relative (`/api/chat`).
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL of the chat service.
    #[inline]
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets a transport-level timeout applied to every request.
    #[inline]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Builds the configuration.
    #[inline]
    pub fn build(self) -> HttpServiceConfig {
        let base_url = self.base_url.unwrap_or_default();
        HttpServiceConfig {
            base_url: normalize_base_url(&base_url).to_owned(),
            request_timeout: self.request_timeout,
        }
    }
}

/// Configuration for [`crate::HttpChatService`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HttpServiceConfig {
    pub(crate) base_url: String,
    pub(crate) request_timeout: Option<Duration>,
}

impl HttpServiceConfig {
    /// Returns the normalized base URL.
    #[inline]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[inline]
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Strips one trailing slash, if any.
#[inline]
fn normalize_base_url(base_url: &str) -> &str {
    base_url.strip_suffix('/').unwrap_or(base_url)
}

//! HTTP plumbing between the client facade and the lookup endpoint.

use crate::{
    config::{validate_timeout, validate_url, Config},
    errors::{Result, WhoisApiError},
    parameters::RequestParameters,
};
use async_trait::async_trait;
use std::{collections::BTreeMap, sync::Arc, time::Duration};
use tracing::{debug, warn};

pub type WireParameters = BTreeMap<&'static str, String>;

/// Executes one GET request and hands back the status code and body.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn perform(
        &self,
        url: &str,
        params: &WireParameters,
        timeout: Duration,
    ) -> Result<(u16, String)>;
}

pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(connect_timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .user_agent(concat!("whois-api-client/", env!("CARGO_PKG_VERSION")))
            .gzip(true)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn perform(
        &self,
        url: &str,
        params: &WireParameters,
        timeout: Duration,
    ) -> Result<(u16, String)> {
        let response = self
            .client
            .get(url)
            .query(params)
            .timeout(timeout)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_transport_error)?;

        debug!("Lookup endpoint answered {} with {} bytes", status, body.len());
        Ok((status, body))
    }
}

fn map_transport_error(e: reqwest::Error) -> WhoisApiError {
    if e.is_timeout() {
        WhoisApiError::Timeout
    } else {
        WhoisApiError::Http(e)
    }
}

/// Holds the endpoint, default parameters and timeout for issuing requests.
#[derive(Clone)]
pub struct ApiRequester {
    base_url: String,
    parameters: RequestParameters,
    timeout_seconds: f64,
    transport: Arc<dyn Transport>,
}

impl ApiRequester {
    pub fn new(
        base_url: &str,
        parameters: RequestParameters,
        timeout_seconds: f64,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        let mut requester = Self {
            base_url: String::new(),
            parameters,
            timeout_seconds: 0.0,
            transport,
        };
        requester.set_base_url(base_url)?;
        requester.set_timeout(timeout_seconds)?;
        Ok(requester)
    }

    /// Requester backed by [`HttpTransport`] using the endpoint and timeouts from `config`.
    pub fn from_config(config: &Config, parameters: RequestParameters) -> Result<Self> {
        let transport = HttpTransport::new(Duration::from_secs(config.connect_timeout_seconds))?;
        Self::new(&config.url, parameters, config.timeout_seconds, Arc::new(transport))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_base_url(&mut self, url: &str) -> Result<()> {
        validate_url(url)?;
        self.base_url = url.to_string();
        Ok(())
    }

    pub fn parameters(&self) -> &RequestParameters {
        &self.parameters
    }

    pub fn parameters_mut(&mut self) -> &mut RequestParameters {
        &mut self.parameters
    }

    pub fn set_parameters(&mut self, parameters: RequestParameters) {
        self.parameters = parameters;
    }

    pub fn timeout(&self) -> f64 {
        self.timeout_seconds
    }

    pub fn set_timeout(&mut self, seconds: f64) -> Result<()> {
        validate_timeout(seconds)?;
        self.timeout_seconds = seconds;
        Ok(())
    }

    /// Fetch the response body for `domain`.
    ///
    /// Explicit `params` without an API key borrow the requester's key. A
    /// non-empty `domain` replaces whatever domain the parameters carry.
    pub async fn get_data(&self, domain: &str, params: Option<&RequestParameters>) -> Result<String> {
        let mut payload = match params {
            Some(explicit) if explicit.api_key().is_empty() && !self.parameters.api_key().is_empty() => {
                let mut merged = explicit.clone();
                merged.set_api_key(self.parameters.api_key())?;
                merged.serialize_for_wire()?
            }
            Some(explicit) => explicit.serialize_for_wire()?,
            None => self.parameters.serialize_for_wire()?,
        };

        if !domain.is_empty() {
            payload.insert("domainName", domain.to_string());
        }

        debug!("Requesting {} for {}", self.base_url, domain);
        let (status, body) = self
            .transport
            .perform(
                &self.base_url,
                &payload,
                Duration::from_secs_f64(self.timeout_seconds),
            )
            .await?;

        match status {
            200..=299 => Ok(body),
            401 => {
                warn!("Lookup endpoint rejected the API key");
                Err(WhoisApiError::ApiAuth(body))
            }
            _ => {
                warn!("Lookup endpoint returned HTTP {}", status);
                Err(WhoisApiError::HttpApi { status, body })
            }
        }
    }
}

impl std::fmt::Debug for ApiRequester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiRequester")
            .field("base_url", &self.base_url)
            .field("parameters", &self.parameters)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    const KEY: &str = "at_abcdefghijklmnopqrstuvwxyz123";
    const URL: &str = "https://api.example.com/whois";

    struct Recorded {
        reply: (u16, String),
        seen: Mutex<Vec<WireParameters>>,
    }

    #[async_trait]
    impl Transport for Recorded {
        async fn perform(
            &self,
            _url: &str,
            params: &WireParameters,
            _timeout: Duration,
        ) -> Result<(u16, String)> {
            self.seen.lock().unwrap().push(params.clone());
            Ok(self.reply.clone())
        }
    }

    fn build_requester(status: u16, body: &str) -> (ApiRequester, Arc<Recorded>) {
        let transport = Arc::new(Recorded {
            reply: (status, body.to_string()),
            seen: Mutex::new(Vec::new()),
        });
        let params = RequestParameters::with_api_key(KEY).unwrap();
        let requester = ApiRequester::new(URL, params, 30.0, transport.clone()).unwrap();
        (requester, transport)
    }

    #[test]
    fn test_construction_rules() {
        let transport = Arc::new(Recorded {
            reply: (200, String::new()),
            seen: Mutex::new(Vec::new()),
        });
        let params = RequestParameters::new();

        assert!(matches!(
            ApiRequester::new("localhost", params.clone(), 30.0, transport.clone()),
            Err(WhoisApiError::InvalidUrl(_))
        ));
        assert!(matches!(
            ApiRequester::new(URL, params, 90.0, transport),
            Err(WhoisApiError::InvalidTimeout(_))
        ));
    }

    #[tokio::test]
    async fn test_domain_overrides_parameters() {
        let (requester, transport) = build_requester(200, "{}");
        let body = requester.get_data("example.com", None).await.unwrap();
        assert_eq!(body, "{}");

        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen[0]["domainName"], "example.com");
        assert_eq!(seen[0]["apiKey"], KEY);
    }

    #[tokio::test]
    async fn test_explicit_params_borrow_api_key() {
        let (requester, transport) = build_requester(200, "{}");
        let mut explicit = RequestParameters::new();
        explicit.set_da(2).unwrap();

        requester.get_data("example.com", Some(&explicit)).await.unwrap();

        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen[0]["apiKey"], KEY);
        assert_eq!(seen[0]["da"], "2");
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let (requester, _) = build_requester(401, "ACCESS_RESTRICTED");
        assert!(matches!(
            requester.get_data("example.com", None).await,
            Err(WhoisApiError::ApiAuth(body)) if body == "ACCESS_RESTRICTED"
        ));

        let (requester, _) = build_requester(503, "busy");
        assert!(matches!(
            requester.get_data("example.com", None).await,
            Err(WhoisApiError::HttpApi { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let transport = Arc::new(Recorded {
            reply: (200, String::new()),
            seen: Mutex::new(Vec::new()),
        });
        let requester =
            ApiRequester::new(URL, RequestParameters::new(), 30.0, transport.clone()).unwrap();

        assert!(matches!(
            requester.get_data("example.com", None).await,
            Err(WhoisApiError::EmptyApiKey)
        ));
        assert!(transport.seen.lock().unwrap().is_empty());
    }
}

//! # WhoisXML API Client
//!
//! A typed client for the WhoisXML API domain lookup service.
//!
//! ## Features
//!
//! - Validated request parameters that fail fast on bad input
//! - Lenient decoding of the service's JSON into typed records
//! - Service errors and malformed responses surfaced as typed errors
//! - Pluggable HTTP transport
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use whois_api_client::{Config, WhoisClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = WhoisClient::new(&Config::load()?)?;
//!     let record = client.data("whoisxmlapi.com", None).await?;
//!
//!     println!("Domain: {}", record.domain_name);
//!     println!("Created: {:?}", record.created_date);
//!     println!("Registrar: {}", record.registrar_name);
//!
//!     Ok(())
//! }
//! ```

pub mod audit;
pub mod coerce;
pub mod config;
pub mod contact;
pub mod errors;
pub mod parameters;
pub mod record;
pub mod response;
pub mod transport;

// Re-export main types for easy access
pub use audit::{Audit, NameServers};
pub use config::Config;
pub use contact::{Contact, Registrant};
pub use errors::{Result, WhoisApiError};
pub use parameters::{OutputFormat, ParameterField, RequestParameters};
pub use record::{BaseWhoisRecord, RegistryData, WhoisRecord};
pub use response::{parse_response, ErrorMessage};
pub use transport::{ApiRequester, HttpTransport, Transport};

use std::sync::Arc;
use tracing::debug;

/// High-level client returning either parsed records or raw response text.
#[derive(Clone, Debug)]
pub struct WhoisClient {
    requester: ApiRequester,
}

impl WhoisClient {
    /// Create a client from configuration. The configuration must carry an API key.
    pub fn new(config: &Config) -> Result<Self> {
        let parameters = Self::parameters_from_config(config)?;
        Self::with_parameters(config, parameters)
    }

    /// Create a client from environment and `.env` configuration.
    pub fn from_env() -> Result<Self> {
        Self::new(&Config::load()?)
    }

    /// Create a client with a full parameter set instead of a bare API key.
    pub fn with_parameters(config: &Config, parameters: RequestParameters) -> Result<Self> {
        let requester = ApiRequester::from_config(config, parameters)?;
        Ok(Self { requester })
    }

    /// Create a client that sends requests through `transport`.
    pub fn with_transport(
        config: &Config,
        parameters: RequestParameters,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        let requester =
            ApiRequester::new(&config.url, parameters, config.timeout_seconds, transport)?;
        Ok(Self { requester })
    }

    fn parameters_from_config(config: &Config) -> Result<RequestParameters> {
        if config.api_key.is_empty() {
            return Err(WhoisApiError::Parameter(
                "Either 'api_key' or 'parameters' required.".to_string(),
            ));
        }
        RequestParameters::with_api_key(&config.api_key)
    }

    /// Look up `domain` and decode the response into a [`WhoisRecord`].
    ///
    /// The output format is always forced to JSON. `params` default to the
    /// client's own parameters.
    pub async fn data(&self, domain: &str, params: Option<&RequestParameters>) -> Result<WhoisRecord> {
        let mut params = params.unwrap_or(self.requester.parameters()).clone();
        params.set_output_format(OutputFormat::Json);

        let body = self.requester.get_data(domain, Some(&params)).await?;
        debug!("Decoding {} byte response for {}", body.len(), domain);
        parse_response(&body)
    }

    /// Look up `domain` and return the response body untouched.
    pub async fn raw_data(&self, domain: &str, params: Option<&RequestParameters>) -> Result<String> {
        self.requester.get_data(domain, params).await
    }

    pub fn parameters(&self) -> &RequestParameters {
        self.requester.parameters()
    }

    pub fn parameters_mut(&mut self) -> &mut RequestParameters {
        self.requester.parameters_mut()
    }

    pub fn set_parameters(&mut self, parameters: RequestParameters) {
        self.requester.set_parameters(parameters);
    }

    pub fn timeout(&self) -> f64 {
        self.requester.timeout()
    }

    pub fn set_timeout(&mut self, seconds: f64) -> Result<()> {
        self.requester.set_timeout(seconds)
    }

    pub fn api_requester(&self) -> &ApiRequester {
        &self.requester
    }
}

//! Validated request parameters for the lookup endpoint.
//!
//! Every setter checks its value before storing it, and a rejected value
//! leaves the field untouched. Construction from overrides goes through the
//! same setters.

use crate::{
    coerce::stringify,
    errors::{Result, WhoisApiError},
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::{collections::BTreeMap, fmt, str::FromStr};

static API_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^at_[a-z0-9]{29}$").expect("api key pattern"));

const BINARY_FLAG: &[u8] = &[0, 1];
const DA_FLAG: &[u8] = &[0, 1, 2];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum OutputFormat {
    #[default]
    #[serde(rename = "JSON")]
    Json,
    #[serde(rename = "XML")]
    Xml,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "JSON",
            OutputFormat::Xml => "XML",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = WhoisApiError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "xml" => Ok(OutputFormat::Xml),
            _ => Err(WhoisApiError::Parameter(
                "Output format should either JSON or XML.".to_string(),
            )),
        }
    }
}

/// Names accepted by [`RequestParameters::validate_and_set`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterField {
    ApiKey,
    DomainName,
    OutputFormat,
    PreferFresh,
    Da,
    Ip,
    IpWhois,
    CheckProxyData,
    ThinWhois,
    IgnoreRawTexts,
}

impl ParameterField {
    pub fn name(&self) -> &'static str {
        match self {
            ParameterField::ApiKey => "api_key",
            ParameterField::DomainName => "domain_name",
            ParameterField::OutputFormat => "output_format",
            ParameterField::PreferFresh => "prefer_fresh",
            ParameterField::Da => "da",
            ParameterField::Ip => "ip",
            ParameterField::IpWhois => "ip_whois",
            ParameterField::CheckProxyData => "check_proxy_data",
            ParameterField::ThinWhois => "thin_whois",
            ParameterField::IgnoreRawTexts => "ignore_raw_texts",
        }
    }

    /// Query string key used by the service.
    pub fn wire_name(&self) -> &'static str {
        match self {
            ParameterField::ApiKey => "apiKey",
            ParameterField::DomainName => "domainName",
            ParameterField::OutputFormat => "outputFormat",
            ParameterField::PreferFresh => "preferFresh",
            ParameterField::Da => "da",
            ParameterField::Ip => "ip",
            ParameterField::IpWhois => "ipWhois",
            ParameterField::CheckProxyData => "checkProxyData",
            ParameterField::ThinWhois => "thinWhois",
            ParameterField::IgnoreRawTexts => "ignoreRawTexts",
        }
    }
}

impl FromStr for ParameterField {
    type Err = WhoisApiError;

    fn from_str(s: &str) -> Result<Self> {
        let field = match s {
            "api_key" => ParameterField::ApiKey,
            "domain_name" => ParameterField::DomainName,
            "output_format" => ParameterField::OutputFormat,
            "prefer_fresh" => ParameterField::PreferFresh,
            "da" => ParameterField::Da,
            "ip" => ParameterField::Ip,
            "ip_whois" => ParameterField::IpWhois,
            "check_proxy_data" => ParameterField::CheckProxyData,
            "thin_whois" => ParameterField::ThinWhois,
            "ignore_raw_texts" => ParameterField::IgnoreRawTexts,
            other => {
                return Err(WhoisApiError::Parameter(format!(
                    "Unknown parameter '{}'.",
                    other
                )))
            }
        };
        Ok(field)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestParameters {
    api_key: String,
    domain_name: String,
    output_format: OutputFormat,
    prefer_fresh: u8,
    da: u8,
    ip: u8,
    ip_whois: u8,
    check_proxy_data: u8,
    thin_whois: u8,
    ignore_raw_texts: u8,
}

impl Default for RequestParameters {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            domain_name: String::new(),
            output_format: OutputFormat::Json,
            prefer_fresh: 0,
            da: 0,
            ip: 0,
            ip_whois: 0,
            check_proxy_data: 0,
            thin_whois: 0,
            ignore_raw_texts: 0,
        }
    }
}

impl RequestParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_key(api_key: &str) -> Result<Self> {
        let mut params = Self::default();
        params.set_api_key(api_key)?;
        Ok(params)
    }

    /// Defaults overridden by `(field, value)` pairs, each validated in turn.
    pub fn with_overrides<'a, I>(overrides: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, Value)>,
    {
        let mut params = Self::default();
        for (field, value) in overrides {
            params.validate_and_set(field, &value)?;
        }
        Ok(params)
    }

    /// Validate `value` for the snake_case `field` and store it.
    pub fn validate_and_set(&mut self, field: &str, value: &Value) -> Result<()> {
        let field: ParameterField = field.parse()?;

        match field {
            ParameterField::ApiKey => self.set_api_key(&stringify(value)),
            ParameterField::DomainName => self.set_domain_name(&stringify(value)),
            ParameterField::OutputFormat => {
                self.output_format = stringify(value).parse()?;
                Ok(())
            }
            flag => {
                let n = flag_value(flag, value)?;
                self.set_flag(flag, n)
            }
        }
    }

    pub fn set_api_key(&mut self, value: &str) -> Result<()> {
        if !API_KEY.is_match(value) {
            return Err(WhoisApiError::Parameter("Invalid API key format.".to_string()));
        }
        self.api_key = value.to_string();
        Ok(())
    }

    pub fn set_domain_name(&mut self, value: &str) -> Result<()> {
        if value.chars().count() <= 4 {
            return Err(WhoisApiError::Parameter("Invalid domain name.".to_string()));
        }
        self.domain_name = value.to_string();
        Ok(())
    }

    pub fn set_output_format(&mut self, value: OutputFormat) {
        self.output_format = value;
    }

    pub fn set_prefer_fresh(&mut self, value: u8) -> Result<()> {
        self.set_flag(ParameterField::PreferFresh, i64::from(value))
    }

    pub fn set_da(&mut self, value: u8) -> Result<()> {
        self.set_flag(ParameterField::Da, i64::from(value))
    }

    pub fn set_ip(&mut self, value: u8) -> Result<()> {
        self.set_flag(ParameterField::Ip, i64::from(value))
    }

    pub fn set_ip_whois(&mut self, value: u8) -> Result<()> {
        self.set_flag(ParameterField::IpWhois, i64::from(value))
    }

    pub fn set_check_proxy_data(&mut self, value: u8) -> Result<()> {
        self.set_flag(ParameterField::CheckProxyData, i64::from(value))
    }

    pub fn set_thin_whois(&mut self, value: u8) -> Result<()> {
        self.set_flag(ParameterField::ThinWhois, i64::from(value))
    }

    pub fn set_ignore_raw_texts(&mut self, value: u8) -> Result<()> {
        self.set_flag(ParameterField::IgnoreRawTexts, i64::from(value))
    }

    fn set_flag(&mut self, field: ParameterField, value: i64) -> Result<()> {
        let (slot, allowed) = match field {
            ParameterField::PreferFresh => (&mut self.prefer_fresh, BINARY_FLAG),
            ParameterField::Da => (&mut self.da, DA_FLAG),
            ParameterField::Ip => (&mut self.ip, BINARY_FLAG),
            ParameterField::IpWhois => (&mut self.ip_whois, BINARY_FLAG),
            ParameterField::CheckProxyData => (&mut self.check_proxy_data, BINARY_FLAG),
            ParameterField::ThinWhois => (&mut self.thin_whois, BINARY_FLAG),
            ParameterField::IgnoreRawTexts => (&mut self.ignore_raw_texts, BINARY_FLAG),
            other => {
                return Err(WhoisApiError::Parameter(format!(
                    "'{}' is not a flag.",
                    other.name()
                )))
            }
        };

        match u8::try_from(value).ok().filter(|v| allowed.contains(v)) {
            Some(v) => {
                *slot = v;
                Ok(())
            }
            None => Err(WhoisApiError::Parameter(flag_message(field.name(), allowed))),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn domain_name(&self) -> &str {
        &self.domain_name
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    pub fn prefer_fresh(&self) -> u8 {
        self.prefer_fresh
    }

    pub fn da(&self) -> u8 {
        self.da
    }

    pub fn ip(&self) -> u8 {
        self.ip
    }

    pub fn ip_whois(&self) -> u8 {
        self.ip_whois
    }

    pub fn check_proxy_data(&self) -> u8 {
        self.check_proxy_data
    }

    pub fn thin_whois(&self) -> u8 {
        self.thin_whois
    }

    pub fn ignore_raw_texts(&self) -> u8 {
        self.ignore_raw_texts
    }

    /// Query parameters for one request, keyed by their wire names.
    pub fn serialize_for_wire(&self) -> Result<BTreeMap<&'static str, String>> {
        if self.api_key.is_empty() {
            return Err(WhoisApiError::EmptyApiKey);
        }

        let wire = [
            (ParameterField::ApiKey, self.api_key.clone()),
            (ParameterField::DomainName, self.domain_name.clone()),
            (ParameterField::OutputFormat, self.output_format.to_string()),
            (ParameterField::Da, self.da.to_string()),
            (ParameterField::Ip, self.ip.to_string()),
            (ParameterField::IpWhois, self.ip_whois.to_string()),
            (ParameterField::ThinWhois, self.thin_whois.to_string()),
            (ParameterField::PreferFresh, self.prefer_fresh.to_string()),
            (ParameterField::CheckProxyData, self.check_proxy_data.to_string()),
            (ParameterField::IgnoreRawTexts, self.ignore_raw_texts.to_string()),
        ];

        Ok(wire
            .into_iter()
            .map(|(field, value)| (field.wire_name(), value))
            .collect())
    }
}

fn flag_value(field: ParameterField, value: &Value) -> Result<i64> {
    let parsed = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    };

    parsed.ok_or_else(|| {
        WhoisApiError::Parameter(format!(
            "'{}' should be an integer, got {}.",
            field.name(),
            value
        ))
    })
}

fn flag_message(name: &str, allowed: &[u8]) -> String {
    let options: Vec<String> = allowed.iter().map(u8::to_string).collect();
    match options.split_last() {
        Some((last, rest)) if !rest.is_empty() => {
            format!("'{}' should be {} or {}.", name, rest.join(", "), last)
        }
        _ => format!("'{}' should be {}.", name, options.join("")),
    }
}

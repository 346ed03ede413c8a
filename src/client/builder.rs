use super::{Client, DEFAULT_BASE_URL};
use crate::config::Config;
use crate::error::{ConfigError, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use http::{
    header::{HeaderMap, HeaderName, ACCEPT, AUTHORIZATION},
    HeaderValue,
};
use reqwest::{Client as ReqwestClient, Proxy};
use std::str::FromStr;
use std::time::Duration;
use url::Url;

#[derive(Default)]
pub struct ClientBuilder {
    username: Option<String>,
    api_key: Option<String>,
    base_url: Option<String>,
    proxy: Option<String>,
    timeout: Option<Duration>,
    headers: HeaderMap,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self {
            headers: HeaderMap::new(),
            ..Default::default()
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let mut builder = Self::new()
            .credentials(&config.api_username, &config.api_key)
            .base_url(&config.base_url)
            .timeout(Duration::from_secs(config.request_timeout));

        if let Some(proxy) = &config.proxy {
            builder = builder.proxy(proxy);
        }
        builder
    }

    pub fn credentials(mut self, username: impl Into<String>, api_key: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.api_key = Some(api_key.into());
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Whole-request timeout enforced by the transport.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn header<K, V>(mut self, key: K, value: V) -> Result<Self>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let header_name = HeaderName::from_str(key.as_ref())
            .map_err(|e| ConfigError::InvalidValue(format!("Invalid header name: {}", e)))?;

        let header_value = HeaderValue::from_str(value.as_ref())
            .map_err(|e| ConfigError::InvalidValue(format!("Invalid header value: {}", e)))?;

        self.headers.insert(header_name, header_value);
        Ok(self)
    }

    pub fn build(self) -> Result<Client> {
        let username = self
            .username
            .filter(|name| !name.is_empty())
            .ok_or_else(|| ConfigError::MissingField("API username".to_string()))?;
        let api_key = self
            .api_key
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ConfigError::MissingField("API key".to_string()))?;

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        // Validate base URL
        Url::parse(&base_url)
            .map_err(|e| ConfigError::InvalidValue(format!("Invalid base URL: {}", e)))?;

        let mut headers = self.headers;
        headers.insert(AUTHORIZATION, basic_auth_header(&username, &api_key)?);
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));

        let mut client_builder = ReqwestClient::builder();

        if let Some(proxy_url) = self.proxy {
            client_builder = client_builder.proxy(Proxy::all(&proxy_url).map_err(|e| {
                ConfigError::InvalidValue(format!("Failed to configure proxy: {}", e))
            })?);
        }

        if let Some(timeout) = self.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        let inner = client_builder
            .build()
            .map_err(|e| ConfigError::InvalidValue(format!("Failed to build client: {}", e)))?;

        Ok(Client {
            inner,
            base_url,
            headers,
        })
    }
}

fn basic_auth_header(username: &str, api_key: &str) -> Result<HeaderValue> {
    let token = STANDARD.encode(format!("{}:{}", username, api_key));
    let mut value = HeaderValue::from_str(&format!("Basic {}", token))
        .map_err(|e| ConfigError::InvalidValue(format!("Invalid credentials: {}", e)))?;
    value.set_sensitive(true);
    Ok(value)
}

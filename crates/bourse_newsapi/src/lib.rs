pub mod everything;
pub mod method;

use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Client, ClientBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;

pub const BASE_URL: &str = "https://newsapi.org";

/// NewsAPI rejects requests that carry no `User-Agent`.
pub const USER_AGENT: &str = concat!("bourse/", env!("CARGO_PKG_VERSION"));

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct NewsApiClient {
    api_key: String,
    base_url: String,
    reqwest: Client,
}

impl NewsApiClient {
    pub fn new(api_key: &str) -> reqwest::Result<Self> {
        Self::with_timeout(api_key, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(api_key: &str, timeout: Duration) -> reqwest::Result<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let reqwest = ClientBuilder::new()
            .default_headers(default_headers)
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            api_key: api_key.trim().to_string(),
            base_url: BASE_URL.to_string(),
            reqwest,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) async fn get<T: DeserializeOwned, P: Serialize + ?Sized>(
        &self,
        path: &str,
        params: &P,
    ) -> reqwest::Result<T> {
        let url = format!("{}{}", self.base_url, path);
        log::debug!("GET {url}");

        let response = self
            .reqwest
            .get(&url)
            .query(params)
            .query(&[("apiKey", self.api_key.as_str())])
            .send()
            .await?;
        let response = response.error_for_status()?;

        response.json().await
    }

    pub async fn call<M: method::Method>(&self, params: M::Params) -> reqwest::Result<M::Response> {
        self.get(M::PATH, &params).await
    }
}

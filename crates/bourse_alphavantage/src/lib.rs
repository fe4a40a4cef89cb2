pub mod method;
pub mod time_series_daily;

use std::time::Duration;

use reqwest::{Client, ClientBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;

pub const BASE_URL: &str = "https://www.alphavantage.co";
pub const QUERY_PATH: &str = "/query";

/// Requests are interactive, so a hung upstream fails fast instead of blocking the run.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct AlphaVantageClient {
    api_key: String,
    base_url: String,
    reqwest: Client,
}

impl AlphaVantageClient {
    pub fn new(api_key: &str) -> reqwest::Result<Self> {
        Self::with_timeout(api_key, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(api_key: &str, timeout: Duration) -> reqwest::Result<Self> {
        let reqwest = ClientBuilder::new().timeout(timeout).build()?;

        Ok(Self {
            api_key: api_key.trim().to_string(),
            base_url: BASE_URL.to_string(),
            reqwest,
        })
    }

    /// Sends requests to `base_url` instead of the public host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) async fn get<T: DeserializeOwned, P: Serialize + ?Sized>(
        &self,
        function: &str,
        params: &P,
    ) -> reqwest::Result<T> {
        let url = format!("{}{}", self.base_url, QUERY_PATH);
        log::debug!("GET {url} function={function}");

        let response = self
            .reqwest
            .get(&url)
            .query(&[("function", function)])
            .query(params)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json::<T>()
            .await?;

        Ok(response)
    }

    pub async fn call<M: method::Method>(&self, params: M::Params) -> reqwest::Result<M::Response> {
        self.get(M::FUNCTION, &params).await
    }
}

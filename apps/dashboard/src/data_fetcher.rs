use std::fs::{self, File};
use std::io::BufReader;
use std::path::PathBuf;

use bourse_alphavantage::time_series_daily::{
    OutputSize, TimeSeriesDaily, TimeSeriesDailyParams, TimeSeriesDailyResponse,
};
use bourse_alphavantage::AlphaVantageClient;
use bourse_market_data::MarketDataError;
use bourse_newsapi::everything::{Everything, EverythingParams, EverythingResponse};
use bourse_newsapi::NewsApiClient;
use chrono::{Local, NaiveDate};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

const DAILY_ENDPOINT: &str = "daily";
const NEWS_ENDPOINT: &str = "news";

#[derive(Debug, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub symbol: String,
    pub fetched_on: NaiveDate,
    pub payload: T,
}

/// Raw upstream envelopes on disk, one file per endpoint, symbol and calendar day.
pub struct FetchCache {
    dir: Option<PathBuf>,
}

impl FetchCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    pub fn disabled() -> Self {
        Self { dir: None }
    }

    fn path(&self, endpoint: &str, symbol: &str, day: NaiveDate) -> Option<PathBuf> {
        self.dir.as_ref().map(|dir| {
            dir.join(format!(
                "{endpoint}_{}_{}.json",
                symbol.to_lowercase(),
                day.format("%Y-%m-%d")
            ))
        })
    }

    pub fn load<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        symbol: &str,
        day: NaiveDate,
    ) -> Option<T> {
        let path = self.path(endpoint, symbol, day)?;
        if !path.exists() {
            return None;
        }

        let file = File::open(&path).ok()?;
        let reader = BufReader::new(file);

        match serde_json::from_reader::<_, CacheEntry<T>>(reader) {
            Ok(entry) if entry.fetched_on == day => {
                log::info!("Using cached {endpoint} data for {symbol} from {day}");
                Some(entry.payload)
            }
            Ok(_) => None,
            Err(e) => {
                log::warn!("Ignoring unreadable cache file {}: {e}", path.display());
                None
            }
        }
    }

    pub fn store<T: Serialize>(
        &self,
        endpoint: &str,
        symbol: &str,
        day: NaiveDate,
        payload: T,
    ) -> std::io::Result<()> {
        let Some(path) = self.path(endpoint, symbol, day) else {
            return Ok(());
        };

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }

        let entry = CacheEntry {
            symbol: symbol.to_string(),
            fetched_on: day,
            payload,
        };

        let json = serde_json::to_string_pretty(&entry)?;
        fs::write(&path, json)?;

        log::debug!("Saved {endpoint} data for {symbol} to {}", path.display());
        Ok(())
    }
}

/// Transport and status problems are fetch failures; a body that does not
/// decode into the expected envelope is a malformed payload.
pub fn classify(err: reqwest::Error) -> MarketDataError {
    if err.is_decode() {
        MarketDataError::MalformedPayload(err.to_string())
    } else {
        MarketDataError::FetchFailure(err.to_string())
    }
}

pub struct DataFetcher {
    prices: AlphaVantageClient,
    news: NewsApiClient,
    cache: FetchCache,
    output_size: Option<OutputSize>,
    news_limit: Option<u32>,
    news_language: Option<String>,
}

impl DataFetcher {
    pub fn new(prices: AlphaVantageClient, news: NewsApiClient, cache: FetchCache) -> Self {
        Self {
            prices,
            news,
            cache,
            output_size: None,
            news_limit: None,
            news_language: None,
        }
    }

    pub fn with_output_size(mut self, output_size: OutputSize) -> Self {
        self.output_size = Some(output_size);
        self
    }

    pub fn with_news_limit(mut self, limit: u32) -> Self {
        self.news_limit = Some(limit);
        self
    }

    pub fn with_news_language(mut self, language: Option<String>) -> Self {
        self.news_language = language;
        self
    }

    fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    /// Cache key of the daily series: the same symbol fetched with another
    /// output size is a different payload.
    fn daily_cache_key(&self) -> String {
        format!("{DAILY_ENDPOINT}-{}", self.output_size.unwrap_or_default())
    }

    fn news_cache_key(&self) -> String {
        let limit = self
            .news_limit
            .map_or_else(|| "default".to_string(), |limit| limit.to_string());
        let language = self.news_language.as_deref().unwrap_or("any");

        format!("{NEWS_ENDPOINT}-{limit}-{language}")
    }

    pub async fn fetch_daily(
        &self,
        symbol: &str,
    ) -> Result<TimeSeriesDailyResponse, MarketDataError> {
        let today = Self::today();
        let key = self.daily_cache_key();
        if let Some(cached) = self.cache.load(&key, symbol, today) {
            return Ok(cached);
        }

        log::info!("Fetching daily series of {symbol}");
        let params = TimeSeriesDailyParams::builder()
            .symbol(symbol)
            .maybe_output_size(self.output_size)
            .build();

        let response = self
            .prices
            .call::<TimeSeriesDaily>(params)
            .await
            .map_err(classify)?;

        // error envelopes are not cached so the next run asks again
        if response.time_series.is_some() {
            if let Err(e) = self.cache.store(&key, symbol, today, &response) {
                log::warn!("Failed to cache daily series of {symbol}: {e}");
            }
        } else if let Some(message) = response.upstream_message() {
            log::warn!("Alpha Vantage answered without data for {symbol}: {message}");
        }

        Ok(response)
    }

    pub async fn fetch_news(&self, symbol: &str) -> Result<EverythingResponse, MarketDataError> {
        let today = Self::today();
        let key = self.news_cache_key();
        if let Some(cached) = self.cache.load(&key, symbol, today) {
            return Ok(cached);
        }

        log::info!("Fetching news of {symbol}");
        let params = EverythingParams::builder()
            .query(symbol)
            .maybe_page_size(self.news_limit)
            .maybe_language(self.news_language.clone())
            .build();

        let response = self
            .news
            .call::<Everything>(params)
            .await
            .map_err(classify)?;

        if response.articles.is_some() {
            if let Err(e) = self.cache.store(&key, symbol, today, &response) {
                log::warn!("Failed to cache news of {symbol}: {e}");
            }
        }

        Ok(response)
    }
}

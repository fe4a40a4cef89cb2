use bourse_alphavantage::time_series_daily::TimeSeriesDailyResponse;
use bourse_market_data::{MarketDataError, NewsSnapshot, QuoteStore, Variation, VariationPeriod};
use bourse_newsapi::everything::EverythingResponse;

use crate::data_fetcher::DataFetcher;

/// Everything rendered for one symbol, derived from a single fetch of each endpoint.
#[derive(Debug)]
pub struct SymbolReport {
    pub symbol: String,
    pub quotes: QuoteStore,
    pub variations: Vec<Variation>,
    pub news: Result<NewsSnapshot, MarketDataError>,
}

impl SymbolReport {
    /// The price series is required; a news failure is kept in the report so it
    /// can be shown next to the prices.
    pub fn build(
        symbol: &str,
        daily: &TimeSeriesDailyResponse,
        news: Result<EverythingResponse, MarketDataError>,
        window: usize,
        periods: &[VariationPeriod],
    ) -> Result<Self, MarketDataError> {
        let quotes = QuoteStore::from_time_series(daily)?.with_moving_average(window)?;
        let variations = quotes.variations(periods)?;
        let news = news.and_then(|response| NewsSnapshot::from_everything(&response));

        Ok(Self {
            symbol: symbol.to_string(),
            quotes,
            variations,
            news,
        })
    }
}

pub async fn load_report(
    fetcher: &DataFetcher,
    symbol: &str,
    window: usize,
    periods: &[VariationPeriod],
) -> Result<SymbolReport, MarketDataError> {
    let daily = fetcher.fetch_daily(symbol).await?;
    let news = fetcher.fetch_news(symbol).await;

    if let Err(e) = &news {
        log::warn!("News for {symbol} unavailable: {e}");
    }

    SymbolReport::build(symbol, &daily, news, window, periods)
}

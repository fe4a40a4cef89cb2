use std::collections::BTreeMap;

use bourse_alphavantage::time_series_daily::{DailyBar, TimeSeriesDailyResponse};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{MarketDataError, Result};
use crate::indicators::{Indicators, Variation, VariationPeriod};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One trading day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Quote {
    pub fn from_daily_bar(date: &str, bar: &DailyBar) -> Result<Self> {
        let parsed = NaiveDate::parse_from_str(date.trim(), DATE_FORMAT).map_err(|e| {
            MarketDataError::MalformedPayload(format!("invalid date '{date}': {e}"))
        })?;

        Ok(Self {
            date: parsed,
            open: parse_price(date, "open", &bar.open)?,
            high: parse_price(date, "high", &bar.high)?,
            low: parse_price(date, "low", &bar.low)?,
            close: parse_price(date, "close", &bar.close)?,
        })
    }
}

fn parse_price(date: &str, field: &str, raw: &str) -> Result<f64> {
    let value: f64 = raw.trim().parse().map_err(|_| {
        MarketDataError::MalformedPayload(format!("{date}: {field} '{raw}' is not a number"))
    })?;

    if !value.is_finite() || value < 0.0 {
        return Err(MarketDataError::MalformedPayload(format!(
            "{date}: {field} '{raw}' is not a valid price"
        )));
    }

    Ok(value)
}

/// Trailing simple moving average of `close`, aligned with the store's quotes.
#[derive(Debug, Clone, PartialEq)]
pub struct MovingAverage {
    pub window: usize,
    pub values: Vec<Option<f64>>,
}

/// Daily quotes keyed by date, kept in ascending date order.
///
/// The upstream series arrives newest-first as a JSON object, so its order is
/// never relied upon: entries are re-keyed by parsed date on construction.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QuoteStore {
    quotes: Vec<Quote>,
    moving_average: Option<MovingAverage>,
}

impl QuoteStore {
    /// Builds a store from a `TIME_SERIES_DAILY` envelope.
    ///
    /// An envelope without `Time Series (Daily)` is an upstream error (bad symbol,
    /// throttled key) and fails with `MalformedPayload`; an empty series is a
    /// valid, empty store.
    pub fn from_time_series(response: &TimeSeriesDailyResponse) -> Result<Self> {
        let Some(series) = &response.time_series else {
            let reason = response
                .upstream_message()
                .unwrap_or("response has no \"Time Series (Daily)\" key");
            return Err(MarketDataError::MalformedPayload(reason.to_string()));
        };

        let quotes = series
            .iter()
            .map(|(date, bar)| Quote::from_daily_bar(date, bar))
            .collect::<Result<Vec<_>>>()?;

        log::debug!("parsed {} daily quotes", quotes.len());
        Self::from_quotes(quotes)
    }

    pub fn from_quotes(quotes: Vec<Quote>) -> Result<Self> {
        let mut by_date = BTreeMap::new();
        for quote in quotes {
            let date = quote.date;
            if by_date.insert(date, quote).is_some() {
                return Err(MarketDataError::MalformedPayload(format!(
                    "duplicate entry for {date}"
                )));
            }
        }

        Ok(Self {
            quotes: by_date.into_values().collect(),
            moving_average: None,
        })
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Quotes in ascending date order.
    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn get(&self, date: NaiveDate) -> Option<&Quote> {
        self.quotes
            .binary_search_by_key(&date, |quote| quote.date)
            .ok()
            .map(|idx| &self.quotes[idx])
    }

    pub fn latest(&self) -> Option<&Quote> {
        self.quotes.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.quotes.iter().map(|quote| quote.close).collect()
    }

    pub fn moving_average(&self) -> Option<&MovingAverage> {
        self.moving_average.as_ref()
    }

    pub fn moving_average_at(&self, idx: usize) -> Option<f64> {
        self.moving_average
            .as_ref()
            .and_then(|ma| ma.values.get(idx).copied().flatten())
    }

    /// Returns a copy of the store with the `window`-day moving average attached.
    pub fn with_moving_average(&self, window: usize) -> Result<Self> {
        let values = Indicators::new(self)?.moving_average(window)?;

        Ok(Self {
            quotes: self.quotes.clone(),
            moving_average: Some(MovingAverage { window, values }),
        })
    }

    /// Percentage change between the latest close and the close `lag` entries before it.
    pub fn variation(&self, lag: usize) -> Result<f64> {
        Indicators::new(self)?.variation(lag)
    }

    pub fn variations(&self, periods: &[VariationPeriod]) -> Result<Vec<Variation>> {
        Ok(Indicators::new(self)?.variations(periods))
    }

    /// Rows paired with their moving average, most recent first.
    pub fn rows_newest_first(&self) -> impl Iterator<Item = (&Quote, Option<f64>)> + '_ {
        self.quotes
            .iter()
            .enumerate()
            .rev()
            .map(move |(idx, quote)| (quote, self.moving_average_at(idx)))
    }
}

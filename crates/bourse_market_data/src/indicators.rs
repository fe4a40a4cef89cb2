use polars::prelude::*;

use crate::error::{MarketDataError, Result};
use crate::quote::QuoteStore;

/// Column frame over a [`QuoteStore`], in chronological order.
pub struct Indicators {
    pub data: LazyFrame,
    rows: usize,
}

fn window(size: usize) -> RollingOptionsFixedWindow {
    RollingOptionsFixedWindow {
        window_size: size,
        ..Default::default()
    }
}

/// A named lag for the variation table, e.g. "last week change" over 5 rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariationPeriod {
    pub label: String,
    pub lag: usize,
}

impl VariationPeriod {
    pub fn new(label: impl Into<String>, lag: usize) -> Self {
        Self {
            label: label.into(),
            lag,
        }
    }

    /// Labels the usual trading-row lags; anything else is named after its length.
    pub fn from_lag(lag: usize) -> Self {
        match lag {
            1 => Self::new("last day change", 1),
            5 => Self::new("last week change", 5),
            20 => Self::new("last month change", 20),
            other => Self::new(format!("last {other} days change"), other),
        }
    }

    pub fn defaults() -> Vec<Self> {
        [1, 5, 20].into_iter().map(Self::from_lag).collect()
    }
}

#[derive(Debug)]
pub struct Variation {
    pub period: VariationPeriod,
    pub result: Result<f64>,
}

impl Indicators {
    pub fn new(store: &QuoteStore) -> PolarsResult<Self> {
        let quotes = store.quotes();

        let data = DataFrame::new(vec![
            Column::new(
                "open".into(),
                quotes.iter().map(|q| q.open).collect::<Vec<_>>(),
            ),
            Column::new(
                "high".into(),
                quotes.iter().map(|q| q.high).collect::<Vec<_>>(),
            ),
            Column::new("low".into(), quotes.iter().map(|q| q.low).collect::<Vec<_>>()),
            Column::new(
                "close".into(),
                quotes.iter().map(|q| q.close).collect::<Vec<_>>(),
            ),
        ])?
        .lazy();

        Ok(Self {
            data,
            rows: quotes.len(),
        })
    }

    fn calculate_moving_average(frame: LazyFrame, size: usize) -> LazyFrame {
        frame.with_column(
            col("close")
                .rolling_mean(window(size))
                .alias("moving_average"),
        )
    }

    /// Percent change of `close` against the row `lag` positions earlier,
    /// reduced to the most recent row:
    /// ```text
    /// variation = (close[t] - close[t - lag]) / close[t - lag] * 100
    /// ```
    fn calculate_variation(frame: LazyFrame, lag: usize) -> LazyFrame {
        let reference = col("close").shift(lit(lag as i64));

        frame.select([((col("close") - reference.clone()) / reference * lit(100.0))
            .last()
            .alias("variation")])
    }

    /// Trailing mean of `close` over `size` rows. Rows without `size` entries up
    /// to and including themselves are `None`.
    pub fn moving_average(&self, size: usize) -> Result<Vec<Option<f64>>> {
        if size == 0 {
            return Err(MarketDataError::InvalidWindow);
        }

        if size > self.rows {
            return Ok(vec![None; self.rows]);
        }

        let df = Self::calculate_moving_average(self.data.clone(), size).collect()?;
        let closes = df.column("close")?.f64()?;
        let means = df.column("moving_average")?.f64()?;

        // length of the run of equal closes ending at each row
        let mut run = 0usize;
        let mut previous = None;

        let values = closes
            .into_iter()
            .zip(means)
            .enumerate()
            .map(|(idx, (close, mean))| {
                run = if close.is_some() && close == previous {
                    run + 1
                } else {
                    1
                };
                previous = close;

                if idx + 1 < size {
                    // partial windows at the head stay undefined
                    None
                } else if run >= size {
                    // a flat window averages to exactly its price
                    close
                } else {
                    mean
                }
            })
            .collect();

        Ok(values)
    }

    /// Change of the latest close against the close `lag` rows before it, in percent.
    pub fn variation(&self, lag: usize) -> Result<f64> {
        if lag >= self.rows {
            return Err(MarketDataError::InsufficientHistory {
                required: lag.saturating_add(1),
                available: self.rows,
            });
        }

        if lag == 0 {
            return Ok(0.0);
        }

        let df = Self::calculate_variation(self.data.clone(), lag).collect()?;

        match df.column("variation")?.f64()?.get(0) {
            Some(value) if value.is_finite() => Ok(value),
            _ => Err(MarketDataError::MalformedPayload(format!(
                "reference close {lag} rows before the latest is zero"
            ))),
        }
    }

    pub fn variations(&self, periods: &[VariationPeriod]) -> Vec<Variation> {
        periods
            .iter()
            .map(|period| Variation {
                period: period.clone(),
                result: self.variation(period.lag),
            })
            .collect()
    }
}

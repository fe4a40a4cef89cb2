pub mod error;
pub mod indicators;
pub mod news;
pub mod quote;

pub use error::{MarketDataError, Result};
pub use indicators::{Indicators, Variation, VariationPeriod};
pub use news::{NewsArticle, NewsSnapshot};
pub use quote::{MovingAverage, Quote, QuoteStore};

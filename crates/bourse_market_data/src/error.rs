use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarketDataError {
    #[error("fetch failed: {0}")]
    FetchFailure(String),
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
    #[error("insufficient history: {required} entries required, {available} available")]
    InsufficientHistory { required: usize, available: usize },
    #[error("moving-average window must be at least 1")]
    InvalidWindow,
    #[error("dataframe evaluation failed: {0}")]
    Polars(#[from] PolarsError),
}

pub type Result<T> = std::result::Result<T, MarketDataError>;

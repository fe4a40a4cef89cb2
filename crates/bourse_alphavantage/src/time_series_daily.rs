use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::method::Method;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputSize {
    /// The latest 100 trading days.
    #[default]
    Compact,
    /// The full history, 20+ years.
    Full,
}

impl fmt::Display for OutputSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputSize::Compact => write!(f, "compact"),
            OutputSize::Full => write!(f, "full"),
        }
    }
}

impl FromStr for OutputSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(OutputSize::Compact),
            "full" => Ok(OutputSize::Full),
            other => Err(format!("unknown output size '{other}', expected compact or full")),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Builder)]
#[builder(on(String, into))]
pub struct TimeSeriesDailyParams {
    pub symbol: String,
    #[serde(rename = "outputsize", skip_serializing_if = "Option::is_none")]
    pub output_size: Option<OutputSize>,
}

/// Envelope of a `TIME_SERIES_DAILY` answer.
///
/// A successful answer carries `Meta Data` and `Time Series (Daily)`. When the
/// symbol is unknown or the key is throttled the API still answers 200, but with
/// one of `Error Message`, `Note` or `Information` instead of the series.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct TimeSeriesDailyResponse {
    #[serde(rename = "Meta Data", skip_serializing_if = "Option::is_none")]
    pub meta_data: Option<MetaData>,
    #[serde(rename = "Time Series (Daily)", skip_serializing_if = "Option::is_none")]
    pub time_series: Option<BTreeMap<String, DailyBar>>,
    #[serde(rename = "Error Message", skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(rename = "Note", skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(rename = "Information", skip_serializing_if = "Option::is_none")]
    pub information: Option<String>,
}

impl TimeSeriesDailyResponse {
    /// The message the API sent in place of data, if any.
    pub fn upstream_message(&self) -> Option<&str> {
        self.error_message
            .as_deref()
            .or(self.note.as_deref())
            .or(self.information.as_deref())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MetaData {
    #[serde(rename = "1. Information")]
    pub information: String,
    #[serde(rename = "2. Symbol")]
    pub symbol: String,
    #[serde(rename = "3. Last Refreshed")]
    pub last_refreshed: String,
    #[serde(rename = "4. Output Size")]
    pub output_size: String,
    #[serde(rename = "5. Time Zone")]
    pub time_zone: String,
}

/// One day of the series. Prices are sent as JSON strings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DailyBar {
    #[serde(rename = "1. open")]
    pub open: String,
    #[serde(rename = "2. high")]
    pub high: String,
    #[serde(rename = "3. low")]
    pub low: String,
    #[serde(rename = "4. close")]
    pub close: String,
    #[serde(rename = "5. volume", skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
}

pub struct TimeSeriesDaily;

impl Method for TimeSeriesDaily {
    const FUNCTION: &'static str = "TIME_SERIES_DAILY";

    type Response = TimeSeriesDailyResponse;
    type Params = TimeSeriesDailyParams;
}

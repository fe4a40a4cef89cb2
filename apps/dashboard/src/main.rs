use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use bourse_alphavantage::time_series_daily::OutputSize;
use bourse_alphavantage::AlphaVantageClient;
use bourse_market_data::VariationPeriod;
use bourse_newsapi::NewsApiClient;
use clap::Parser;
use credentials::Credentials;
use data_fetcher::{DataFetcher, FetchCache};
use dotenv::dotenv;

mod chart;
mod credentials;
mod data_fetcher;
mod render;
mod report;

/// Symbols shown when none are given on the command line.
const WATCHLIST: [&str; 5] = ["NVDA", "AAPL", "GOOGL", "AMZN", "MSFT"];

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Daily stock dashboard: prices, moving average, variations and news",
    long_about = None
)]
struct Args {
    /// Ticker symbols to show (default: NVDA AAPL GOOGL AMZN MSFT)
    symbols: Vec<String>,

    /// Moving-average window, in trading days
    #[arg(long, short, default_value_t = 20)]
    window: usize,

    /// Variation lags, in trading days
    #[arg(long, value_delimiter = ',', default_value = "1,5,20")]
    lags: Vec<usize>,

    /// Most recent rows of the quote table
    #[arg(long, default_value_t = 5)]
    rows: usize,

    /// Articles requested per symbol
    #[arg(long, default_value_t = 10)]
    news_limit: u32,

    /// Restrict news to one language (e.g. en)
    #[arg(long)]
    news_language: Option<String>,

    /// Key file: `label: value` lines, Alpha Vantage first, NewsAPI second
    #[arg(long, env = "DASHBOARD_CREDENTIALS")]
    credentials: Option<PathBuf>,

    /// Directory of the per-day fetch cache
    #[arg(long, env = "DASHBOARD_CACHE_DIR", default_value = ".cache/bourse")]
    cache_dir: PathBuf,

    /// Always call the upstream APIs
    #[arg(long)]
    no_cache: bool,

    /// Write an HTML candlestick chart per symbol into this directory
    #[arg(long)]
    chart_dir: Option<PathBuf>,

    /// Per-request timeout, in seconds
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    /// Alpha Vantage history length: compact or full
    #[arg(long, default_value = "compact")]
    output_size: OutputSize,

    #[arg(
        long,
        env = "ALPHAVANTAGE_BASE_URL",
        default_value = bourse_alphavantage::BASE_URL,
        hide = true
    )]
    alphavantage_url: String,

    #[arg(
        long,
        env = "NEWSAPI_BASE_URL",
        default_value = bourse_newsapi::BASE_URL,
        hide = true
    )]
    newsapi_url: String,
}

fn clean_symbol(raw: &str) -> String {
    raw.trim_matches(|c| c == '"' || c == '\'' || c == ' ')
        .to_uppercase()
}

async fn run(args: Args) -> anyhow::Result<()> {
    let credentials = Credentials::load(args.credentials.as_deref())?;
    let timeout = Duration::from_secs(args.timeout_secs);

    let prices = AlphaVantageClient::with_timeout(&credentials.alphavantage, timeout)
        .context("Failed to build Alpha Vantage client")?
        .with_base_url(&args.alphavantage_url);
    let news = NewsApiClient::with_timeout(&credentials.newsapi, timeout)
        .context("Failed to build NewsAPI client")?
        .with_base_url(&args.newsapi_url);

    let cache = if args.no_cache {
        FetchCache::disabled()
    } else {
        FetchCache::new(&args.cache_dir)
    };

    let fetcher = DataFetcher::new(prices, news, cache)
        .with_output_size(args.output_size)
        .with_news_limit(args.news_limit)
        .with_news_language(args.news_language.clone());

    let periods: Vec<VariationPeriod> = args
        .lags
        .iter()
        .copied()
        .map(VariationPeriod::from_lag)
        .collect();

    let symbols: Vec<String> = if args.symbols.is_empty() {
        WATCHLIST.iter().map(|s| s.to_string()).collect()
    } else {
        args.symbols.iter().map(|s| clean_symbol(s)).collect()
    };

    let mut failed = Vec::new();

    for symbol in &symbols {
        match report::load_report(&fetcher, symbol, args.window, &periods).await {
            Ok(report) => {
                render::print_report(&report, args.rows);

                if let Some(dir) = &args.chart_dir {
                    if let Err(e) = chart::export_candlestick(&report, dir) {
                        log::error!("Failed to write chart for {symbol}: {e}");
                    }
                }
            }
            Err(e) => {
                log::error!("Failed to load {symbol}: {e}");
                render::print_failure(symbol, &e);
                failed.push(symbol.clone());
            }
        }
    }

    if !failed.is_empty() {
        anyhow::bail!("Could not load price data for {}", failed.join(", "));
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    log::debug!("Command line input recorded: {args:?}");

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    rt.block_on(run(args))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_are_cleaned() {
        assert_eq!(clean_symbol("\"nvda\" "), "NVDA");
        assert_eq!(clean_symbol("'msft'"), "MSFT");
    }

    #[test]
    fn cli_defaults() {
        let args = Args::parse_from(["dashboard"]);

        assert!(args.symbols.is_empty());
        assert_eq!(args.window, 20);
        assert_eq!(args.lags, vec![1, 5, 20]);
        assert_eq!(args.output_size, OutputSize::Compact);
    }

    #[test]
    fn cli_parses_lags_and_output_size() {
        let args = Args::parse_from([
            "dashboard",
            "AAPL",
            "MSFT",
            "--window",
            "25",
            "--lags",
            "1,7,30,365",
            "--output-size",
            "full",
            "--no-cache",
        ]);

        assert_eq!(args.symbols, vec!["AAPL", "MSFT"]);
        assert_eq!(args.window, 25);
        assert_eq!(args.lags, vec![1, 7, 30, 365]);
        assert_eq!(args.output_size, OutputSize::Full);
        assert!(args.no_cache);
    }
}

use bourse_market_data::{MarketDataError, NewsSnapshot};
use prettytable::{format, row, Table};

use crate::report::SymbolReport;

fn price(value: f64) -> String {
    format!("{value:.2}")
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
    table
}

/// The `rows` most recent quotes with their moving average.
pub fn quotes_table(report: &SymbolReport, rows: usize) -> Table {
    let mut table = new_table();

    let ma_title = match report.quotes.moving_average() {
        Some(ma) => format!("MA{}", ma.window),
        None => "MA".to_string(),
    };
    table.set_titles(row!["Date", "Open", "High", "Low", "Close", ma_title]);

    for (quote, ma) in report.quotes.rows_newest_first().take(rows) {
        table.add_row(row![
            quote.date,
            price(quote.open),
            price(quote.high),
            price(quote.low),
            price(quote.close),
            ma.map(price).unwrap_or_else(|| "-".to_string())
        ]);
    }

    table
}

/// One line per variation figure: latest close and its change, or why it is missing.
pub fn variations_table(report: &SymbolReport) -> Table {
    let mut table = new_table();
    table.set_titles(row!["Metric", "Close", "Change"]);

    let close = report
        .quotes
        .latest()
        .map(|quote| price(quote.close))
        .unwrap_or_else(|| "-".to_string());

    for variation in &report.variations {
        let change = match &variation.result {
            Ok(value) => format!("{value:.2}%"),
            Err(e) => format!("n/a ({e})"),
        };
        table.add_row(row![variation.period.label, close, change]);
    }

    table
}

pub fn news_table(news: &NewsSnapshot) -> Table {
    let mut table = new_table();
    table.set_titles(row!["Published", "Title", "Source", "Url"]);

    for article in news.articles() {
        table.add_row(row![
            article.published_at.format("%Y-%m-%d %H:%M"),
            article.title,
            article.source.as_deref().unwrap_or("-"),
            article.url
        ]);
    }

    table
}

pub fn print_report(report: &SymbolReport, rows: usize) {
    println!("\n===== Daily data for {} =====\n", report.symbol);

    if report.quotes.is_empty() {
        println!("No daily data returned for {}", report.symbol);
    } else {
        quotes_table(report, rows).printstd();
    }

    println!("\n--- Variations ---\n");
    variations_table(report).printstd();

    println!("\n--- News ---\n");
    match &report.news {
        Ok(news) if news.is_empty() => println!("No articles found"),
        Ok(news) => news_table(news).printstd(),
        Err(e) => println!("News unavailable: {e}"),
    }
}

pub fn print_failure(symbol: &str, err: &MarketDataError) {
    println!("\n===== Daily data for {symbol} =====\n");
    println!("Could not load prices: {err}");
}

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;

use crate::report::SymbolReport;

/// Writes `<dir>/<symbol>_candlestick.html`: a Plotly candlestick of the quotes
/// with the moving average drawn over it.
pub fn export_candlestick(report: &SymbolReport, dir: &Path) -> std::io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let file_path = dir.join(format!("{}_candlestick.html", report.symbol.to_lowercase()));

    fs::write(&file_path, candlestick_html(report))?;

    log::info!("Candlestick chart of {} written to {}", report.symbol, file_path.display());
    Ok(file_path)
}

pub fn candlestick_html(report: &SymbolReport) -> String {
    let quotes = report.quotes.quotes();
    let dates: Vec<String> = quotes.iter().map(|q| q.date.to_string()).collect();

    let ma_name = match report.quotes.moving_average() {
        Some(ma) => format!("Moving average ({})", ma.window),
        None => "Moving average".to_string(),
    };
    let ma_values: Vec<Option<f64>> = (0..quotes.len())
        .map(|idx| report.quotes.moving_average_at(idx))
        .collect();

    let data = json!([
        {
            "type": "candlestick",
            "name": report.symbol,
            "x": dates,
            "open": quotes.iter().map(|q| q.open).collect::<Vec<_>>(),
            "high": quotes.iter().map(|q| q.high).collect::<Vec<_>>(),
            "low": quotes.iter().map(|q| q.low).collect::<Vec<_>>(),
            "close": quotes.iter().map(|q| q.close).collect::<Vec<_>>()
        },
        {
            "type": "scatter",
            "mode": "lines",
            "name": ma_name,
            "x": dates,
            "y": ma_values,
            "line": { "color": "red" }
        }
    ]);

    let layout = json!({
        "title": format!("{} candlestick chart", report.symbol),
        "xaxis": { "title": "Date" },
        "yaxis": { "title": "Price" }
    });

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>{symbol} daily prices</title>
    <script src="https://cdn.plot.ly/plotly-latest.min.js"></script>
    <style>
        body {{ font-family: Arial, sans-serif; margin: 20px; }}
        .container {{ width: 900px; height: 600px; }}
        h1 {{ color: #333; }}
    </style>
</head>
<body>
    <h1>Daily data for {symbol}</h1>
    <div class="container" id="chart"></div>
    <script>
        var data = {data};
        var layout = {layout};
        Plotly.newPlot('chart', data, layout);
    </script>
</body>
</html>
"#,
        symbol = report.symbol,
        data = data,
        layout = layout,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use bourse_market_data::VariationPeriod;

    fn report() -> SymbolReport {
        let daily = serde_json::from_value(json!({
            "Time Series (Daily)": {
                "2024-01-02": { "1. open": "99", "2. high": "101", "3. low": "98", "4. close": "100" },
                "2024-01-01": { "1. open": "94", "2. high": "96", "3. low": "93", "4. close": "95" }
            }
        }))
        .unwrap();

        SymbolReport::build(
            "AAPL",
            &daily,
            Ok(Default::default()),
            2,
            &VariationPeriod::defaults(),
        )
        .unwrap()
    }

    #[test]
    fn html_contains_both_traces_in_date_order() {
        let html = candlestick_html(&report());

        assert!(html.contains("\"type\":\"candlestick\""));
        assert!(html.contains("Moving average (2)"));
        assert!(html.contains("[\"2024-01-01\",\"2024-01-02\"]"));
        assert!(html.contains("[null,97.5]"));
    }

    #[test]
    fn export_writes_one_file_per_symbol() {
        let dir = tempfile::tempdir().unwrap();

        let path = export_candlestick(&report(), dir.path()).unwrap();

        assert_eq!(path, dir.path().join("aapl_candlestick.html"));
        let written = fs::read_to_string(path).unwrap();
        assert!(written.contains("Plotly.newPlot"));
    }
}

use std::path::Path;

use clap::ValueEnum;
use error_stack::{Report, ResultExt, bail};
use tracing::{info, warn};

use crate::error::LoadError;
use crate::model::Candle;

/// On-disk layout of a price series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    /// Array of `{timestamp, open, high, low, close, volume?}` objects
    Json,
    /// Header row `timestamp,open,high,low,close[,volume]`
    Csv,
}

impl InputFormat {
    /// Infer the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self, Report<LoadError>> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            _ => Err(Report::new(LoadError::UnsupportedFormat { format: ext })
                .attach(format!("path: {}", path.display()))),
        }
    }
}

/// Load a chronologically ordered price series from `path`.
pub fn load(path: &Path, format: Option<InputFormat>) -> Result<Vec<Candle>, Report<LoadError>> {
    let format = match format {
        Some(format) => format,
        None => InputFormat::from_path(path)?,
    };

    let content = std::fs::read_to_string(path)
        .change_context(LoadError::ReadFile)
        .attach_with(|| format!("path: {}", path.display()))?;

    let candles = match format {
        InputFormat::Json => parse_json(&content),
        InputFormat::Csv => parse_csv(&content),
    }
    .attach_with(|| format!("path: {}", path.display()))?;

    info!(
        path = %path.display(),
        format = ?format,
        candles = candles.len(),
        "price series loaded"
    );

    Ok(candles)
}

pub fn parse_json(content: &str) -> Result<Vec<Candle>, Report<LoadError>> {
    let candles: Vec<Candle> =
        serde_json::from_str(content).change_context(LoadError::Parse {
            reason: "expected an array of price rows".into(),
        })?;
    check_series(&candles)?;
    Ok(candles)
}

pub fn parse_csv(content: &str) -> Result<Vec<Candle>, Report<LoadError>> {
    let mut reader = csv::Reader::from_reader(content.as_bytes());
    let candles = reader
        .deserialize::<Candle>()
        .enumerate()
        .map(|(i, row)| {
            row.change_context(LoadError::Parse {
                reason: "malformed CSV row".into(),
            })
            .attach_with(|| format!("row: {}", i + 1))
        })
        .collect::<Result<Vec<_>, _>>()?;
    check_series(&candles)?;
    Ok(candles)
}

fn check_series(candles: &[Candle]) -> Result<(), Report<LoadError>> {
    if let Some(i) = candles.iter().position(|c| !c.close.is_finite()) {
        bail!(LoadError::Parse {
            reason: format!("row {} has a non-finite close", i + 1),
        });
    }

    // Ordering is the caller's contract; flag it but keep the rows as given.
    if let Some(i) = candles
        .windows(2)
        .position(|w| w[1].timestamp < w[0].timestamp)
    {
        warn!(
            row = i + 2,
            "price series timestamps are not monotonically non-decreasing"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_rows_parse() {
        let json = r#"[
            {"timestamp": 1000, "open": 1.0, "high": 2.0, "low": 0.5, "close": 1.5, "volume": 3.0},
            {"timestamp": 2000, "open": 1.5, "high": 2.5, "low": 1.0, "close": 2.0}
        ]"#;
        let candles = parse_json(json).unwrap();
        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0].timestamp.timestamp_millis(), 1000);
        assert_eq!(candles[1].close, 2.0);
        assert_eq!(candles[1].volume, 0.0);
    }

    #[test]
    fn json_not_an_array_rejected() {
        let err = parse_json(r#"{"timestamp": 1}"#).unwrap_err();
        assert!(matches!(err.current_context(), LoadError::Parse { .. }));
    }

    #[test]
    fn csv_rows_parse() {
        let csv = "timestamp,open,high,low,close,volume\n\
                   1000,1.0,2.0,0.5,1.5,3.0\n\
                   2000,1.5,2.5,1.0,2.0,4.0\n";
        let candles = parse_csv(csv).unwrap();
        assert_eq!(candles.len(), 2);
        assert_eq!(candles[1].timestamp.timestamp_millis(), 2000);
        assert_eq!(candles[1].volume, 4.0);
    }

    #[test]
    fn csv_without_volume_column_parses() {
        let csv = "timestamp,open,high,low,close\n1000,1.0,2.0,0.5,1.5\n";
        let candles = parse_csv(csv).unwrap();
        assert_eq!(candles[0].volume, 0.0);
    }

    #[test]
    fn csv_malformed_row_rejected() {
        let csv = "timestamp,open,high,low,close\n1000,1.0,2.0,0.5,abc\n";
        assert!(parse_csv(csv).is_err());
    }

    #[test]
    fn non_finite_close_rejected() {
        let csv = "timestamp,open,high,low,close\n1000,1.0,2.0,0.5,NaN\n";
        let err = parse_csv(csv).unwrap_err();
        assert!(matches!(err.current_context(), LoadError::Parse { .. }));
    }

    #[test]
    fn unordered_series_still_loads() {
        let json = r#"[
            {"timestamp": 2000, "open": 1.0, "high": 1.0, "low": 1.0, "close": 1.0},
            {"timestamp": 1000, "open": 1.0, "high": 1.0, "low": 1.0, "close": 1.0}
        ]"#;
        assert_eq!(parse_json(json).unwrap().len(), 2);
    }

    #[test]
    fn format_inferred_from_extension() {
        assert_eq!(
            InputFormat::from_path(Path::new("data/ohlcv.json")).unwrap(),
            InputFormat::Json
        );
        assert_eq!(
            InputFormat::from_path(Path::new("bars.CSV")).unwrap(),
            InputFormat::Csv
        );
        let err = InputFormat::from_path(Path::new("bars.parquet")).unwrap_err();
        assert!(matches!(
            err.current_context(),
            LoadError::UnsupportedFormat { .. }
        ));
    }

    #[test]
    fn missing_file_reports_read_error() {
        let err = load(Path::new("/nonexistent/ohlcv.json"), None).unwrap_err();
        assert!(matches!(err.current_context(), LoadError::ReadFile));
    }
}

use std::io::Write;

use clap::ValueEnum;
use error_stack::{Report, ResultExt};
use serde::Serialize;

use crate::error::ReportError;
use crate::indicator::bollinger::{BandSeries, BollingerParams};
use crate::model::{BandPoint, Candle, defined};
use crate::style::StyleDirectives;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Params, style directives and points in one document
    Json,
    /// One row per bar; undefined band values are empty cells
    Csv,
}

/// Everything the renderer needs for one overlay.
#[derive(Debug, Serialize)]
pub struct Overlay {
    pub params: BollingerParams,
    pub style: StyleDirectives,
    pub points: Vec<BandPoint>,
}

impl Overlay {
    pub fn new(
        params: BollingerParams,
        style: StyleDirectives,
        candles: &[Candle],
        bands: &BandSeries,
    ) -> Self {
        Self {
            params,
            style,
            points: band_points(candles, bands),
        }
    }
}

/// Zip candles with their band values.
pub fn band_points(candles: &[Candle], bands: &BandSeries) -> Vec<BandPoint> {
    candles
        .iter()
        .enumerate()
        .map(|(i, candle)| BandPoint {
            timestamp: candle.timestamp,
            close: candle.close,
            basis: bands.basis.get(i).copied().and_then(defined),
            upper: bands.upper.get(i).copied().and_then(defined),
            lower: bands.lower.get(i).copied().and_then(defined),
        })
        .collect()
}

pub fn write_overlay<W: Write>(
    mut writer: W,
    overlay: &Overlay,
    format: OutputFormat,
) -> Result<(), Report<ReportError>> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, overlay)
                .change_context(ReportError::Serialize)?;
            writeln!(writer).change_context(ReportError::Write)?;
        }
        OutputFormat::Csv => {
            let mut csv = csv::Writer::from_writer(&mut writer);
            for point in &overlay.points {
                csv.serialize(point).change_context(ReportError::Serialize)?;
            }
            csv.flush().change_context(ReportError::Write)?;
        }
    }
    writer.flush().change_context(ReportError::Write)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicator::bollinger::compute_bollinger_bands;
    use crate::style::BandStyle;
    use chrono::DateTime;

    fn candles_from_closes(closes: &[f64]) -> Vec<Candle> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Candle {
                timestamp: DateTime::from_timestamp_millis(1_000 * (i as i64 + 1)).unwrap(),
                open: c,
                high: c,
                low: c,
                close: c,
                volume: 1.0,
            })
            .collect()
    }

    fn overlay(closes: &[f64], length: usize) -> Overlay {
        let candles = candles_from_closes(closes);
        let params = BollingerParams {
            length,
            std_multiplier: 1.0,
            offset: 0,
        };
        let bands = compute_bollinger_bands(&candles, &params).unwrap();
        Overlay::new(params, BandStyle::default().resolve(), &candles, &bands)
    }

    #[test]
    fn points_map_sentinel_to_none() {
        let overlay = overlay(&[10.0, 11.0, 12.0], 3);
        assert_eq!(overlay.points.len(), 3);
        assert_eq!(overlay.points[0].basis, None);
        assert_eq!(overlay.points[1].upper, None);
        assert_eq!(overlay.points[2].basis, Some(11.0));
        assert_eq!(overlay.points[2].close, 12.0);
    }

    #[test]
    fn json_output_has_nulls_and_directives() {
        let overlay = overlay(&[10.0, 11.0, 12.0], 3);
        let mut buf = Vec::new();
        write_overlay(&mut buf, &overlay, OutputFormat::Json).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["params"]["length"], 3);
        assert_eq!(value["style"]["basis"]["color"], "#0066ff");
        assert_eq!(value["style"]["band_fill"], "transparent");
        assert!(value["points"][0]["basis"].is_null());
        assert_eq!(value["points"][2]["basis"], 11.0);
        assert_eq!(value["points"][2]["timestamp"], 3_000);
    }

    #[test]
    fn csv_output_leaves_sentinel_cells_empty() {
        let overlay = overlay(&[10.0, 11.0, 12.0], 3);
        let mut buf = Vec::new();
        write_overlay(&mut buf, &overlay, OutputFormat::Csv).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "timestamp,close,basis,upper,lower");
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("1000,"));
        assert!(lines[1].ends_with(",,,"));

        let cells: Vec<&str> = lines[3].split(',').collect();
        assert_eq!(cells[0], "3000");
        let basis: f64 = cells[2].parse().unwrap();
        let upper: f64 = cells[3].parse().unwrap();
        assert!((basis - 11.0).abs() < 1e-9);
        assert!((upper - (11.0 + (2.0_f64 / 3.0).sqrt())).abs() < 1e-9);
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One bar of the price series.
///
/// `timestamp` is serialized as epoch milliseconds, the format chart data
/// files use. Only `close` feeds the band calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}

/// A single row of the computed overlay, index-aligned with the input series.
///
/// `None` marks a position with insufficient history or one the offset
/// shift left empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandPoint {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub close: f64,
    pub basis: Option<f64>,
    pub upper: Option<f64>,
    pub lower: Option<f64>,
}

/// Map the NaN sentinel to `None`.
pub fn defined(value: f64) -> Option<f64> {
    if value.is_nan() { None } else { Some(value) }
}

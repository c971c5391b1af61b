//! Fixed-length sliding-window statistics.
//!
//! Both functions return one value per input element. Indices before the
//! first full window hold `f64::NAN`.

use error_stack::{Report, bail};

use crate::error::IndicatorError;
use crate::indicator::{Indicator, close_prices};
use crate::model::Candle;

fn ensure_period(period: usize) -> Result<(), Report<IndicatorError>> {
    if period == 0 {
        bail!(IndicatorError::InvalidParameter {
            name: "period must be > 0".into(),
        });
    }
    Ok(())
}

/// Simple moving average over the trailing `period` values.
///
/// Keeps a running sum, so the whole pass is O(N).
pub fn sma(values: &[f64], period: usize) -> Result<Vec<f64>, Report<IndicatorError>> {
    ensure_period(period)?;

    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    for (i, &value) in values.iter().enumerate() {
        sum += value;
        if i >= period {
            sum -= values[i - period];
        }
        if i + 1 >= period {
            out.push(sum / period as f64);
        } else {
            out.push(f64::NAN);
        }
    }
    Ok(out)
}

/// Population standard deviation (divides by `period`) over the trailing
/// `period` values.
pub fn std_dev(values: &[f64], period: usize) -> Result<Vec<f64>, Report<IndicatorError>> {
    let means = sma(values, period)?;

    Ok(means
        .iter()
        .enumerate()
        .map(|(i, &mean)| {
            if i + 1 < period {
                return f64::NAN;
            }
            let window = &values[i + 1 - period..=i];
            let sum_sq: f64 = window.iter().map(|&v| (v - mean).powi(2)).sum();
            (sum_sq / period as f64).sqrt()
        })
        .collect())
}

/// Simple Moving Average of close prices.
pub struct Sma {
    period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Result<Self, Report<IndicatorError>> {
        ensure_period(period)?;
        Ok(Self { period })
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        "sma"
    }

    fn required_candles(&self) -> usize {
        self.period
    }

    fn calculate(&self, candles: &[Candle]) -> Result<Vec<f64>, Report<IndicatorError>> {
        sma(&close_prices(candles), self.period)
    }
}

/// Rolling population standard deviation of close prices.
pub struct StdDev {
    period: usize,
}

impl StdDev {
    pub fn new(period: usize) -> Result<Self, Report<IndicatorError>> {
        ensure_period(period)?;
        Ok(Self { period })
    }
}

impl Indicator for StdDev {
    fn name(&self) -> &str {
        "stddev"
    }

    fn required_candles(&self) -> usize {
        self.period
    }

    fn calculate(&self, candles: &[Candle]) -> Result<Vec<f64>, Report<IndicatorError>> {
        std_dev(&close_prices(candles), self.period)
    }
}

use error_stack::{Report, bail};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::IndicatorError;
use crate::indicator::rolling::{sma, std_dev};
use crate::indicator::{Indicator, close_prices};
use crate::model::Candle;

fn default_length() -> usize {
    20
}

fn default_std_multiplier() -> f64 {
    2.0
}

/// Bollinger parameters as edited in the indicator settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerParams {
    /// SMA window length in bars.
    #[serde(default = "default_length")]
    pub length: usize,
    #[serde(default = "default_std_multiplier")]
    pub std_multiplier: f64,
    /// Bars to shift every output series by. Positive moves values later.
    #[serde(default)]
    pub offset: i64,
}

impl Default for BollingerParams {
    fn default() -> Self {
        Self {
            length: default_length(),
            std_multiplier: default_std_multiplier(),
            offset: 0,
        }
    }
}

impl BollingerParams {
    pub fn validate(&self) -> Result<(), Report<IndicatorError>> {
        if self.length == 0 {
            bail!(IndicatorError::InvalidParameter {
                name: "length must be > 0".into(),
            });
        }
        if !self.std_multiplier.is_finite() {
            bail!(IndicatorError::InvalidParameter {
                name: "std_multiplier must be finite".into(),
            });
        }
        if self.std_multiplier < 0.0 {
            bail!(IndicatorError::InvalidParameter {
                name: "std_multiplier must be >= 0".into(),
            });
        }
        Ok(())
    }
}

/// Basis, upper and lower bands, each index-aligned with the input series.
#[derive(Debug, Clone, Default)]
pub struct BandSeries {
    pub basis: Vec<f64>,
    pub upper: Vec<f64>,
    pub lower: Vec<f64>,
}

impl BandSeries {
    pub fn len(&self) -> usize {
        self.basis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.basis.is_empty()
    }
}

/// Move every value `offset` slots along the index axis.
///
/// Slots nothing lands on hold `f64::NAN`; values pushed past either end are
/// dropped. A zero offset hands the input back untouched.
pub fn shift(values: Vec<f64>, offset: i64) -> Vec<f64> {
    if offset == 0 {
        return values;
    }

    let len = values.len();
    let mut shifted = vec![f64::NAN; len];
    for (i, value) in values.into_iter().enumerate() {
        let Some(target) = (i as i64).checked_add(offset) else {
            continue;
        };
        if target >= 0 && (target as usize) < len {
            shifted[target as usize] = value;
        }
    }
    shifted
}

pub struct BollingerBands {
    params: BollingerParams,
}

impl BollingerBands {
    pub fn new(params: BollingerParams) -> Result<Self, Report<IndicatorError>> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &BollingerParams {
        &self.params
    }

    pub fn compute(&self, candles: &[Candle]) -> Result<BandSeries, Report<IndicatorError>> {
        if candles.is_empty() {
            bail!(IndicatorError::EmptySeries);
        }

        let BollingerParams {
            length,
            std_multiplier,
            offset,
        } = self.params;

        let closes = close_prices(candles);
        let basis = sma(&closes, length)?;
        let sd = std_dev(&closes, length)?;

        let (upper, lower): (Vec<f64>, Vec<f64>) = basis
            .iter()
            .zip(&sd)
            .map(|(&b, &s)| {
                if b.is_nan() {
                    (f64::NAN, f64::NAN)
                } else {
                    (b + std_multiplier * s, b - std_multiplier * s)
                }
            })
            .unzip();

        debug!(
            length,
            std_multiplier,
            offset,
            candles = candles.len(),
            defined = basis.iter().filter(|b| !b.is_nan()).count(),
            "bollinger bands computed"
        );

        Ok(BandSeries {
            basis: shift(basis, offset),
            upper: shift(upper, offset),
            lower: shift(lower, offset),
        })
    }
}

impl Indicator for BollingerBands {
    fn name(&self) -> &str {
        "bollinger"
    }

    fn required_candles(&self) -> usize {
        self.params.length
    }

    /// Returns the basis (SMA) series only.
    fn calculate(&self, candles: &[Candle]) -> Result<Vec<f64>, Report<IndicatorError>> {
        Ok(self.compute(candles)?.basis)
    }
}

/// Validate `params` and compute the bands in one call.
pub fn compute_bollinger_bands(
    candles: &[Candle],
    params: &BollingerParams,
) -> Result<BandSeries, Report<IndicatorError>> {
    BollingerBands::new(*params)?.compute(candles)
}

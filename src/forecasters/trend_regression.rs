use crate::indicators::linear_regression;
use crate::models::*;
use log::debug;

const MAX_PERIOD: usize = 20;

/// Extends the least-squares line through the trailing window.
pub struct TrendRegressionForecaster {
    max_period: usize,
}

impl TrendRegressionForecaster {
    pub fn new() -> Self {
        Self {
            max_period: MAX_PERIOD,
        }
    }
}

impl Default for TrendRegressionForecaster {
    fn default() -> Self {
        Self::new()
    }
}

impl super::Forecaster for TrendRegressionForecaster {
    type Prediction = RegressionPrediction;

    fn name(&self) -> &str {
        "linearRegression"
    }

    fn min_data_points(&self) -> usize {
        2
    }

    fn forecast(&self, candles: &[Candle], days_ahead: usize) -> Option<Vec<RegressionPrediction>> {
        let last = candles.last()?;
        let period = self.max_period.min(candles.len());
        let fit = linear_regression(candles, period, candles.len() - 1)?;
        debug!(
            "trend regression over {} candles: slope={:.6} intercept={:.4}",
            period, fit.slope, fit.intercept
        );

        let predictions = (1..=days_ahead)
            .map(|day| {
                // continue the x axis used for fitting: the last candle sits at period - 1
                let price = fit.value_at((period + day - 1) as f64).max(0.0);
                RegressionPrediction {
                    day,
                    price,
                    change: super::percent_change(price, last.close),
                }
            })
            .collect();
        Some(predictions)
    }
}

#[cfg(test)]
mod tests {
    use super::super::Forecaster;
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn series(closes: impl IntoIterator<Item = f64>) -> Vec<Candle> {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        closes
            .into_iter()
            .enumerate()
            .map(|(i, close)| Candle::new(base + Duration::days(i as i64), close))
            .collect()
    }

    #[test]
    fn projects_linear_series_exactly() {
        let a = 50.0;
        let b = 1.5;
        let candles = series((0..30).map(|i| a + b * i as f64));
        let predictions = TrendRegressionForecaster::new()
            .forecast(&candles, 5)
            .unwrap();

        assert_eq!(predictions.len(), 5);
        let last = candles.last().unwrap().close;
        for (i, prediction) in predictions.iter().enumerate() {
            let expected = a + b * (29 + i + 1) as f64;
            assert_eq!(prediction.day, i + 1);
            assert!((prediction.price - expected).abs() < 1e-9);
            assert!((prediction.change - (expected - last) / last * 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn steep_decline_is_floored_at_zero() {
        let candles = series((0..20).map(|i| 100.0 - 5.0 * i as f64));
        let predictions = TrendRegressionForecaster::new()
            .forecast(&candles, 5)
            .unwrap();
        // next points would be 0, -5, -10, ...
        assert!(predictions.iter().all(|p| p.price >= 0.0));
        assert_eq!(predictions[4].price, 0.0);
        assert!((predictions[4].change + 100.0).abs() < 1e-9);
    }

    #[test]
    fn single_candle_has_no_trend() {
        let candles = series([10.0]);
        assert!(TrendRegressionForecaster::new()
            .forecast(&candles, 5)
            .is_none());
        assert!(TrendRegressionForecaster::new().forecast(&[], 5).is_none());
    }
}

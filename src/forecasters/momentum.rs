use crate::indicators::{ema, sma};
use crate::models::*;
use log::debug;

const FAST_PERIOD: usize = 5;
const SLOW_PERIOD: usize = 20;
const EMA_PERIOD: usize = 12;
const MOMENTUM_DAMPING: f64 = 0.1;

/// Compounds the fast/slow SMA gap forward, day after day.
pub struct MomentumForecaster {
    fast_period: usize,
    slow_period: usize,
    ema_period: usize,
}

impl MomentumForecaster {
    pub fn new() -> Self {
        Self {
            fast_period: FAST_PERIOD,
            slow_period: SLOW_PERIOD,
            ema_period: EMA_PERIOD,
        }
    }
}

impl Default for MomentumForecaster {
    fn default() -> Self {
        Self::new()
    }
}

impl super::Forecaster for MomentumForecaster {
    type Prediction = MomentumPrediction;

    fn name(&self) -> &str {
        "movingAverage"
    }

    fn min_data_points(&self) -> usize {
        self.fast_period.max(self.slow_period).max(self.ema_period)
    }

    fn forecast(&self, candles: &[Candle], days_ahead: usize) -> Option<Vec<MomentumPrediction>> {
        let last = candles.last()?;
        let last_index = candles.len() - 1;
        let fast = sma(candles, self.fast_period, last_index)?;
        let slow = sma(candles, self.slow_period, last_index)?;
        // Required for availability even though the projection only uses the SMAs.
        let medium = ema(candles, self.ema_period, last_index)?;

        let trend = TrendDirection::from_comparison(fast, slow);
        let momentum = (fast - slow) / slow;
        debug!(
            "momentum: sma{}={:.4} sma{}={:.4} ema{}={:.4} momentum={:.6}",
            self.fast_period, fast, self.slow_period, slow, self.ema_period, medium, momentum
        );

        let mut price = last.close;
        let predictions = (1..=days_ahead)
            .map(|day| {
                price = (price * (1.0 + momentum * MOMENTUM_DAMPING * day as f64)).max(0.0);
                MomentumPrediction {
                    day,
                    price,
                    change: super::percent_change(price, last.close),
                    trend,
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
    fn requires_slow_window() {
        let candles = series((0..19).map(|i| 100.0 + i as f64));
        assert!(MomentumForecaster::new().forecast(&candles, 5).is_none());
        let candles = series((0..20).map(|i| 100.0 + i as f64));
        assert!(MomentumForecaster::new().forecast(&candles, 5).is_some());
    }

    #[test]
    fn compounds_from_previous_projection() {
        let candles = series((0..20).map(|i| 100.0 + i as f64));
        // sma5 = 117, sma20 = 109.5
        let momentum = (117.0 - 109.5) / 109.5;
        let predictions = MomentumForecaster::new().forecast(&candles, 3).unwrap();

        let mut expected = 119.0;
        for prediction in &predictions {
            expected *= 1.0 + momentum * 0.1 * prediction.day as f64;
            assert!((prediction.price - expected).abs() < 1e-9);
            assert!((prediction.change - (expected - 119.0) / 119.0 * 100.0).abs() < 1e-9);
            assert_eq!(prediction.trend, TrendDirection::Bullish);
        }
    }

    #[test]
    fn flat_series_is_bearish_with_no_change() {
        let candles = series(std::iter::repeat(80.0).take(25));
        let predictions = MomentumForecaster::new().forecast(&candles, 5).unwrap();
        for prediction in predictions {
            assert!((prediction.price - 80.0).abs() < 1e-9);
            assert!(prediction.change.abs() < 1e-9);
            assert_eq!(prediction.trend, TrendDirection::Bearish);
        }
    }

    #[test]
    fn falling_series_projects_lower_prices() {
        let candles = series((0..30).map(|i| 200.0 - 2.0 * i as f64));
        let predictions = MomentumForecaster::new().forecast(&candles, 5).unwrap();
        assert!(predictions.windows(2).all(|w| w[1].price < w[0].price));
        assert!(predictions.iter().all(|p| p.trend == TrendDirection::Bearish));
    }
}

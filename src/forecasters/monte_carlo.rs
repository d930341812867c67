use crate::indicators::{mean_return, volatility};
use crate::models::*;
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use rayon::prelude::*;

pub const DEFAULT_SIMULATIONS: usize = 1000;
const MAX_PERIOD: usize = 60;
const SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Random-walk simulation calibrated on the mean and volatility of recent
/// daily returns. Each step draws `avg_return + volatility * U` with `U`
/// uniform on `[-1, 1)`.
pub struct MonteCarloForecaster {
    simulations: usize,
    seed: Option<u64>,
    max_period: usize,
}

impl MonteCarloForecaster {
    pub fn new(simulations: usize) -> Self {
        Self {
            simulations,
            seed: None,
            max_period: MAX_PERIOD,
        }
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Runs the simulation with randomness drawn from `rng`.
    ///
    /// Only one value is taken from `rng`; every path then runs on its own
    /// generator derived from it, so the result does not depend on how rayon
    /// schedules the paths.
    pub fn forecast_with_rng<R>(
        &self,
        candles: &[Candle],
        days_ahead: usize,
        rng: &mut R,
    ) -> Option<Vec<SimulationPrediction>>
    where
        R: RngCore + ?Sized,
    {
        if self.simulations == 0 {
            return None;
        }
        let last = candles.last()?;
        let last_index = candles.len() - 1;
        let period = self.max_period.min(candles.len());
        let volatility = volatility(candles, period, last_index)?;
        let avg_return = mean_return(candles, period, last_index)?;
        debug!(
            "monte carlo over {} returns: avg_return={:.6} volatility={:.6} simulations={}",
            period, avg_return, volatility, self.simulations
        );

        let master_seed = rng.next_u64();
        let paths: Vec<Vec<f64>> = (0..self.simulations)
            .into_par_iter()
            .map(|path| {
                let mut path_rng = StdRng::seed_from_u64(path_seed(master_seed, path));
                simulate_path(
                    last.close,
                    avg_return,
                    volatility,
                    days_ahead,
                    &mut path_rng,
                )
            })
            .collect();

        let predictions = (0..days_ahead)
            .map(|step| {
                let mut prices: Vec<f64> = paths.iter().map(|path| path[step]).collect();
                summarize_day(step + 1, &mut prices, last.close)
            })
            .collect();
        Some(predictions)
    }
}

impl Default for MonteCarloForecaster {
    fn default() -> Self {
        Self::new(DEFAULT_SIMULATIONS)
    }
}

impl super::Forecaster for MonteCarloForecaster {
    type Prediction = SimulationPrediction;

    fn name(&self) -> &str {
        "monteCarlo"
    }

    fn min_data_points(&self) -> usize {
        self.max_period + 1
    }

    fn forecast(&self, candles: &[Candle], days_ahead: usize) -> Option<Vec<SimulationPrediction>> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.forecast_with_rng(candles, days_ahead, &mut rng)
    }
}

fn path_seed(master_seed: u64, path: usize) -> u64 {
    master_seed ^ (path as u64 + 1).wrapping_mul(SEED_STRIDE)
}

fn simulate_path<R: Rng>(
    start_price: f64,
    avg_return: f64,
    volatility: f64,
    days_ahead: usize,
    rng: &mut R,
) -> Vec<f64> {
    let mut price = start_price;
    (0..days_ahead)
        .map(|_| {
            let shock = rng.gen::<f64>() * 2.0 - 1.0;
            price = (price * (1.0 + avg_return + volatility * shock)).max(0.0);
            price
        })
        .collect()
}

/// Order-statistic percentile: `sorted[floor(n * quantile)]`, no
/// interpolation.
fn pick(sorted: &[f64], quantile: f64) -> f64 {
    let index = (sorted.len() as f64 * quantile).floor() as usize;
    sorted[index.min(sorted.len() - 1)]
}

fn summarize_day(day: usize, prices: &mut [f64], last_price: f64) -> SimulationPrediction {
    prices.sort_by(|a, b| a.total_cmp(b));
    let mean = prices.iter().sum::<f64>() / prices.len() as f64;
    SimulationPrediction {
        day,
        mean,
        median: pick(prices, 0.5),
        lower: pick(prices, 0.1),
        upper: pick(prices, 0.9),
        q1: pick(prices, 0.25),
        q3: pick(prices, 0.75),
        change: super::percent_change(mean, last_price),
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

    fn zigzag(len: usize) -> Vec<Candle> {
        let mut price = 100.0;
        series((0..len).map(|i| {
            if i > 0 {
                price *= if i % 2 == 0 { 1.02 } else { 0.99 };
            }
            price
        }))
    }

    #[test]
    fn unavailable_without_calibration_window() {
        let forecaster = MonteCarloForecaster::new(100).with_seed(Some(1));
        assert!(forecaster.forecast(&zigzag(60), 5).is_none());
        assert!(forecaster.forecast(&zigzag(61), 5).is_some());
    }

    #[test]
    fn percentiles_are_ordered() {
        let forecaster = MonteCarloForecaster::new(500).with_seed(Some(7));
        let predictions = forecaster.forecast(&zigzag(90), 5).unwrap();
        assert_eq!(predictions.len(), 5);
        for (i, p) in predictions.iter().enumerate() {
            assert_eq!(p.day, i + 1);
            assert!(p.lower <= p.q1);
            assert!(p.q1 <= p.median);
            assert!(p.median <= p.q3);
            assert!(p.q3 <= p.upper);
            assert!(p.lower <= p.mean && p.mean <= p.upper);
        }
    }

    #[test]
    fn mean_converges_to_drift() {
        let candles = zigzag(120);
        let last = candles.last().unwrap().close;
        let avg_return = mean_return(&candles, 60, 119).unwrap();

        let forecaster = MonteCarloForecaster::new(20_000);
        let mut rng = StdRng::seed_from_u64(2024);
        let predictions = forecaster.forecast_with_rng(&candles, 5, &mut rng).unwrap();

        for p in &predictions {
            let expected = last * (1.0 + avg_return).powi(p.day as i32);
            let relative_error = (p.mean - expected).abs() / expected;
            assert!(
                relative_error < 0.002,
                "day {}: mean {} expected {}",
                p.day,
                p.mean,
                expected
            );
            assert!((p.change - (p.mean - last) / last * 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn same_seed_same_paths() {
        let candles = zigzag(80);
        let forecaster = MonteCarloForecaster::new(300);
        let first = forecaster.forecast_with_rng(&candles, 4, &mut StdRng::seed_from_u64(9));
        let second = forecaster.forecast_with_rng(&candles, 4, &mut StdRng::seed_from_u64(9));
        assert_eq!(first, second);

        let other = forecaster.forecast_with_rng(&candles, 4, &mut StdRng::seed_from_u64(10));
        assert_ne!(first, other);
    }

    #[test]
    fn constant_prices_collapse_to_last_price() {
        let candles = series(std::iter::repeat(25.0).take(70));
        let forecaster = MonteCarloForecaster::new(50).with_seed(Some(3));
        let predictions = forecaster.forecast(&candles, 3).unwrap();
        for p in predictions {
            assert_eq!(p.mean, 25.0);
            assert_eq!(p.lower, 25.0);
            assert_eq!(p.upper, 25.0);
            assert_eq!(p.change, 0.0);
        }
    }

    #[test]
    fn pick_uses_floor_index() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(pick(&sorted, 0.1), 1.0);
        assert_eq!(pick(&sorted, 0.25), 2.0);
        assert_eq!(pick(&sorted, 0.5), 3.0);
        assert_eq!(pick(&sorted, 0.9), 4.0);
    }
}

use crate::models::*;

pub const DEFAULT_DAYS_AHEAD: usize = 5;

pub trait Forecaster {
    type Prediction: PointEstimate + Send;

    fn name(&self) -> &str;

    /// Shortest series for which `forecast` can return a value.
    fn min_data_points(&self) -> usize;

    /// Projects `days_ahead` future days from the last candle, or `None` when
    /// the series is too short for this forecaster.
    fn forecast(&self, candles: &[Candle], days_ahead: usize) -> Option<Vec<Self::Prediction>>;
}

/// The single number a forecaster contributes to the consensus for a day.
pub trait PointEstimate {
    fn day(&self) -> usize;
    fn point(&self) -> f64;
}

impl PointEstimate for RegressionPrediction {
    fn day(&self) -> usize {
        self.day
    }

    fn point(&self) -> f64 {
        self.price
    }
}

impl PointEstimate for MomentumPrediction {
    fn day(&self) -> usize {
        self.day
    }

    fn point(&self) -> f64 {
        self.price
    }
}

impl PointEstimate for SimulationPrediction {
    fn day(&self) -> usize {
        self.day
    }

    fn point(&self) -> f64 {
        self.mean
    }
}

pub(crate) fn percent_change(price: f64, base: f64) -> f64 {
    (price - base) / base * 100.0
}

#[path = "forecasters/trend_regression.rs"]
pub mod trend_regression;

pub use trend_regression::TrendRegressionForecaster;

#[path = "forecasters/momentum.rs"]
pub mod momentum;

pub use momentum::MomentumForecaster;

#[path = "forecasters/monte_carlo.rs"]
pub mod monte_carlo;

pub use monte_carlo::MonteCarloForecaster;

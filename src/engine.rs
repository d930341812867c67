use crate::candle_utils::{resolve_stock_id, validate_candles};
use crate::config::ForecastConfig;
use crate::consensus::{analyze_market, build_consensus};
use crate::error::{ForecastError, Result};
use crate::forecaster::{
    Forecaster, MomentumForecaster, MonteCarloForecaster, TrendRegressionForecaster,
};
use crate::models::*;
use log::{info, warn};

/// Fewest candles the engine will forecast from.
pub const MIN_CANDLES: usize = 20;

/// Runs the enabled forecasters over one candle series and merges their
/// output into a consensus report.
#[derive(Debug, Clone, Default)]
pub struct ForecastEngine {
    config: ForecastConfig,
}

impl ForecastEngine {
    pub fn new(config: ForecastConfig) -> Self {
        Self { config }
    }

    /// Never fails: rejected input comes back as `ForecastResponse::Failure`.
    pub fn forecast(&self, candles: &[Candle]) -> ForecastResponse {
        match self.run(candles) {
            Ok(report) => ForecastResponse::Success(report),
            Err(err) => {
                warn!("Forecast rejected: {}", err);
                ForecastResponse::Failure {
                    error: err.to_string(),
                }
            }
        }
    }

    pub fn run(&self, candles: &[Candle]) -> Result<ForecastReport> {
        self.config.validate()?;
        if candles.len() < MIN_CANDLES {
            return Err(ForecastError::InsufficientData {
                required: MIN_CANDLES,
                actual: candles.len(),
            });
        }
        validate_candles(candles)?;
        let Some(last) = candles.last() else {
            return Err(ForecastError::InsufficientData {
                required: MIN_CANDLES,
                actual: 0,
            });
        };

        let config = &self.config;
        let (linear_regression, (moving_average, monte_carlo)) = rayon::join(
            || {
                self.run_forecaster(
                    config.include_linear_regression,
                    &TrendRegressionForecaster::new(),
                    candles,
                )
            },
            || {
                rayon::join(
                    || {
                        self.run_forecaster(
                            config.include_moving_average,
                            &MomentumForecaster::new(),
                            candles,
                        )
                    },
                    || {
                        self.run_forecaster(
                            config.include_monte_carlo,
                            &MonteCarloForecaster::new(config.monte_carlo_simulations)
                                .with_seed(config.monte_carlo_seed),
                            candles,
                        )
                    },
                )
            },
        );

        let mut predictions = Predictions {
            linear_regression,
            moving_average,
            monte_carlo,
            consensus: Vec::new(),
        };
        predictions.consensus =
            build_consensus(&predictions, &config.consensus, last.close, config.days_ahead);
        let market_analysis = analyze_market(candles);

        info!(
            "Forecast over {} candles: {} day(s) ahead from {:.4} using [{}]",
            candles.len(),
            config.days_ahead,
            last.close,
            predictions.available_forecasters().join(", ")
        );

        Ok(ForecastReport {
            stock_id: resolve_stock_id(candles),
            last_price: last.close,
            last_date: last.date,
            days_ahead: config.days_ahead,
            predictions,
            market_analysis,
        })
    }

    fn run_forecaster<F: Forecaster>(
        &self,
        enabled: bool,
        forecaster: &F,
        candles: &[Candle],
    ) -> Option<Vec<F::Prediction>> {
        if !enabled {
            return None;
        }
        let predictions = forecaster.forecast(candles, self.config.days_ahead);
        if predictions.is_none() {
            info!(
                "Skipping {}: needs at least {} candles, got {}",
                forecaster.name(),
                forecaster.min_data_points(),
                candles.len()
            );
        }
        predictions
    }
}

use crate::commands::candle_file::{load_candles, write_json};
use crate::config::ForecastConfig;
use crate::engine::ForecastEngine;
use anyhow::Result;
use log::{info, warn};
use std::path::Path;

/// Forecasts the candle file and writes the response JSON. Returns whether the
/// engine produced a successful forecast.
pub fn run(candles_path: &Path, config: ForecastConfig, output: Option<&Path>) -> Result<bool> {
    info!("Loading candles from {}", candles_path.display());
    let candles = load_candles(candles_path)?;
    info!(
        "Forecasting {} day(s) ahead from {} candles ({} simulation paths)",
        config.days_ahead,
        candles.len(),
        config.monte_carlo_simulations
    );

    let engine = ForecastEngine::new(config);
    let response = engine.forecast(&candles);
    write_json(&response, output)?;

    if let Some(path) = output {
        info!("Forecast written to {}", path.display());
    }
    if let Some(error) = response.error() {
        warn!("Forecast failed: {}", error);
    }
    Ok(response.is_success())
}

//! Consensus price forecasting for a daily candle series.
//!
//! Three independent forecasters (trend regression, moving-average momentum,
//! Monte Carlo simulation) run over the same series and are blended into a
//! weighted consensus with a confidence label and a market-regime summary.
//! [`engine::ForecastEngine`] is the entry point.

pub mod candle_utils;
pub mod commands;
pub mod config;
pub mod consensus;
pub mod engine;
pub mod error;
pub mod forecaster;
pub mod indicators;
pub mod models;
pub mod param_utils;

pub use config::{ConsensusWeights, ForecastConfig};
pub use engine::{ForecastEngine, MIN_CANDLES};
pub use error::ForecastError;
pub use models::{Candle, ForecastReport, ForecastResponse};

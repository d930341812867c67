use crate::candle_utils::{resolve_stock_id, validate_candles};
use crate::commands::candle_file::{load_candles, write_json};
use crate::consensus::analyze_market;
use crate::indicators::{ema, sma, volatility};
use crate::models::{Candle, MarketAnalysis};
use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use log::info;
use serde::Serialize;
use std::path::Path;

/// Latest indicator readings behind the forecasters and the regime summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSnapshot {
    pub stock_id: Option<String>,
    pub last_date: NaiveDate,
    pub last_price: f64,
    pub sma5: Option<f64>,
    pub sma20: Option<f64>,
    pub ema12: Option<f64>,
    pub volatility20: Option<f64>,
    pub market_analysis: MarketAnalysis,
}

pub fn snapshot(candles: &[Candle]) -> Result<IndicatorSnapshot> {
    validate_candles(candles)?;
    let last = candles
        .last()
        .ok_or_else(|| anyhow!("Cannot analyze an empty candle series"))?;
    let last_index = candles.len() - 1;

    Ok(IndicatorSnapshot {
        stock_id: resolve_stock_id(candles),
        last_date: last.date,
        last_price: last.close,
        sma5: sma(candles, 5, last_index),
        sma20: sma(candles, 20, last_index),
        ema12: ema(candles, 12, last_index),
        volatility20: volatility(candles, 20, last_index),
        market_analysis: analyze_market(candles),
    })
}

pub fn run(candles_path: &Path, output: Option<&Path>) -> Result<()> {
    info!("Analyzing candles from {}", candles_path.display());
    let candles = load_candles(candles_path)?;
    let snapshot = snapshot(&candles)?;
    write_json(&snapshot, output)
}

//! Trailing-window indicators evaluated at an explicit candle index.
//!
//! Every function returns `None` when the window ending at `end_index` does
//! not fit inside the series; a short window is never computed partially.

use crate::models::Candle;
use statrs::statistics::Statistics;

/// Ordinary-least-squares fit of close against `x = 0..period`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Regression {
    pub slope: f64,
    pub intercept: f64,
}

impl Regression {
    pub fn value_at(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

fn window_start(len: usize, period: usize, end_index: usize) -> Option<usize> {
    if period == 0 || end_index >= len || end_index + 1 < period {
        return None;
    }
    Some(end_index + 1 - period)
}

pub fn sma(candles: &[Candle], period: usize, end_index: usize) -> Option<f64> {
    let start = window_start(candles.len(), period, end_index)?;
    let sum: f64 = candles[start..=end_index].iter().map(|c| c.close).sum();
    Some(sum / period as f64)
}

/// EMA seeded with the SMA of the first `period` candles, then smoothed
/// forward with multiplier `2 / (period + 1)` up to `end_index`.
pub fn ema(candles: &[Candle], period: usize, end_index: usize) -> Option<f64> {
    window_start(candles.len(), period, end_index)?;

    let multiplier = 2.0 / (period as f64 + 1.0);
    let mut value = sma(candles, period, period - 1)?;
    for candle in &candles[period..=end_index] {
        value = (candle.close - value) * multiplier + value;
    }
    Some(value)
}

/// Requires `period >= 2`; a single point has no slope.
pub fn linear_regression(candles: &[Candle], period: usize, end_index: usize) -> Option<Regression> {
    if period < 2 {
        return None;
    }
    let start = window_start(candles.len(), period, end_index)?;

    let n = period as f64;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_xx = 0.0;
    for (x, candle) in candles[start..=end_index].iter().enumerate() {
        let x = x as f64;
        sum_x += x;
        sum_y += candle.close;
        sum_xy += x * candle.close;
        sum_xx += x * x;
    }

    let denominator = n * sum_xx - sum_x * sum_x;
    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;
    Some(Regression { slope, intercept })
}

/// Simple day-over-day returns for the `period` returns ending at
/// `end_index`, which needs `period + 1` prices.
pub fn daily_returns(candles: &[Candle], period: usize, end_index: usize) -> Option<Vec<f64>> {
    if period == 0 || end_index >= candles.len() || end_index < period {
        return None;
    }

    let returns = (end_index + 1 - period..=end_index)
        .map(|i| {
            let prev_close = candles[i - 1].close;
            (candles[i].close - prev_close) / prev_close
        })
        .collect();
    Some(returns)
}

/// Population standard deviation of daily returns over the window.
pub fn volatility(candles: &[Candle], period: usize, end_index: usize) -> Option<f64> {
    let returns = daily_returns(candles, period, end_index)?;
    Some(returns.population_std_dev())
}

/// Arithmetic mean of daily returns over the window.
pub fn mean_return(candles: &[Candle], period: usize, end_index: usize) -> Option<f64> {
    let returns = daily_returns(candles, period, end_index)?;
    Some(returns.mean())
}

use crate::config::ConsensusWeights;
use crate::forecaster::{percent_change, PointEstimate};
use crate::indicators::{sma, volatility};
use crate::models::*;
use log::info;

const REGIME_PERIOD: usize = 20;

/// Weighted blend of whichever forecasters produced a value for each day.
///
/// A day with no contributing forecaster produces no entry, so the result
/// can be shorter than `days_ahead`.
pub fn build_consensus(
    predictions: &Predictions,
    weights: &ConsensusWeights,
    last_price: f64,
    days_ahead: usize,
) -> Vec<ConsensusPrediction> {
    let mut consensus = Vec::with_capacity(days_ahead);

    for day in 1..=days_ahead {
        let contributions = [
            (
                point_for_day(predictions.linear_regression.as_deref(), day),
                weights.linear_regression,
            ),
            (
                point_for_day(predictions.moving_average.as_deref(), day),
                weights.moving_average,
            ),
            (
                point_for_day(predictions.monte_carlo.as_deref(), day),
                weights.monte_carlo,
            ),
        ];

        let mut weighted_sum = 0.0;
        let mut total_weight = 0.0;
        let mut contributors = 0;
        for (point, weight) in contributions {
            if let Some(value) = point {
                weighted_sum += value * weight;
                total_weight += weight;
                contributors += 1;
            }
        }

        if contributors == 0 {
            continue;
        }
        if total_weight <= 0.0 {
            info!(
                "Skipping consensus day {}: {} forecaster(s) contributed with zero total weight",
                day, contributors
            );
            continue;
        }

        let price = weighted_sum / total_weight;
        consensus.push(ConsensusPrediction {
            day,
            price,
            change: percent_change(price, last_price),
            confidence: weights.confidence_for(total_weight),
        });
    }

    consensus
}

fn point_for_day<P: PointEstimate>(series: Option<&[P]>, day: usize) -> Option<f64> {
    series?
        .iter()
        .find(|prediction| prediction.day() == day)
        .map(PointEstimate::point)
}

/// Regime summary from SMA(20) and volatility(20) at the last candle,
/// independent of which forecasters ran.
pub fn analyze_market(candles: &[Candle]) -> MarketAnalysis {
    let Some(last) = candles.last() else {
        return MarketAnalysis::default();
    };
    let last_index = candles.len() - 1;
    let support = sma(candles, REGIME_PERIOD, last_index);
    let volatility = volatility(candles, REGIME_PERIOD, last_index);

    MarketAnalysis {
        current_trend: support.map(|sma20| TrendDirection::from_comparison(last.close, sma20)),
        volatility: volatility.map(|value| value * 100.0),
        support,
        price_position: support.map(|sma20| percent_change(last.close, sma20)),
    }
}

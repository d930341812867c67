use crate::error::{ForecastError, Result};
use crate::models::Candle;

/// Checks the ingestion contract: every close is positive and finite and dates
/// are strictly ascending. The series is never reordered.
pub fn validate_candles(candles: &[Candle]) -> Result<()> {
    for (index, candle) in candles.iter().enumerate() {
        if !candle.close.is_finite() || candle.close <= 0.0 {
            return Err(ForecastError::NonPositivePrice {
                index,
                date: candle.date,
                close: candle.close,
            });
        }
        if index > 0 {
            let previous = candles[index - 1].date;
            if candle.date <= previous {
                return Err(ForecastError::UnsortedCandles {
                    index,
                    previous,
                    current: candle.date,
                });
            }
        }
    }
    Ok(())
}

/// Stock id reported for the series, taken from the most recent candle that
/// carries one.
pub fn resolve_stock_id(candles: &[Candle]) -> Option<String> {
    candles
        .iter()
        .rev()
        .find_map(|c| c.stock_id.as_deref().and_then(normalize_stock_id))
}

/// Trims whitespace; blank ids are treated as absent.
pub fn normalize_stock_id(value: &str) -> Option<String> {
    let normalized = value.trim();
    if normalized.is_empty() {
        None
    } else {
        Some(normalized.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn candles(closes: &[f64]) -> Vec<Candle> {
        let base = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Candle::new(base + Duration::days(i as i64), close))
            .collect()
    }

    #[test]
    fn accepts_positive_ascending_series() {
        assert!(validate_candles(&candles(&[10.0, 10.5, 9.8])).is_ok());
        assert!(validate_candles(&[]).is_ok());
    }

    #[test]
    fn rejects_non_positive_and_non_finite_closes() {
        let err = validate_candles(&candles(&[10.0, 0.0, 9.8])).unwrap_err();
        assert!(matches!(err, ForecastError::NonPositivePrice { index: 1, .. }));

        let err = validate_candles(&candles(&[10.0, 11.0, -3.0])).unwrap_err();
        assert!(matches!(err, ForecastError::NonPositivePrice { index: 2, .. }));

        let err = validate_candles(&candles(&[f64::NAN])).unwrap_err();
        assert!(matches!(err, ForecastError::NonPositivePrice { index: 0, .. }));
    }

    #[test]
    fn rejects_out_of_order_dates() {
        let mut series = candles(&[10.0, 11.0, 12.0]);
        series.swap(1, 2);
        let err = validate_candles(&series).unwrap_err();
        assert!(matches!(err, ForecastError::UnsortedCandles { index: 2, .. }));

        let mut duplicate = candles(&[10.0, 11.0]);
        duplicate[1].date = duplicate[0].date;
        assert!(validate_candles(&duplicate).is_err());
    }

    #[test]
    fn stock_id_comes_from_latest_candle() {
        let mut series = candles(&[1.0, 2.0, 3.0]);
        series[0].stock_id = Some("AAA".to_string());
        series[1].stock_id = Some(" 2330 ".to_string());
        series[2].stock_id = Some("   ".to_string());
        assert_eq!(resolve_stock_id(&series).as_deref(), Some("2330"));
        assert_eq!(resolve_stock_id(&candles(&[1.0])), None);
    }
}

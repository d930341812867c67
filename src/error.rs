use chrono::NaiveDate;
use thiserror::Error;

/// Failures that stop a forecast before any forecaster runs.
///
/// A single forecaster lacking history is not an error; it is reported as an
/// absent series instead.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ForecastError {
    #[error("Insufficient data: at least {required} candles required, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("Candle {index} ({date}) has a non-positive or non-finite close: {close}")]
    NonPositivePrice {
        index: usize,
        date: NaiveDate,
        close: f64,
    },

    #[error("Candle {index} is out of order: {current} does not follow {previous}")]
    UnsortedCandles {
        index: usize,
        previous: NaiveDate,
        current: NaiveDate,
    },

    #[error("Invalid forecast configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, ForecastError>;

#[cfg(test)]
mod tests {
    use super::ForecastError;

    #[test]
    fn insufficient_data_message_names_both_counts() {
        let err = ForecastError::InsufficientData {
            required: 20,
            actual: 7,
        };
        let message = err.to_string();
        assert!(message.contains("20"));
        assert!(message.contains("7"));
    }
}

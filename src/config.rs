use crate::error::ForecastError;
use crate::forecaster::{monte_carlo::DEFAULT_SIMULATIONS, DEFAULT_DAYS_AHEAD};
use anyhow::{anyhow, Result};
use std::collections::HashMap;

const WEIGHT_TOLERANCE: f64 = 1e-9;

/// Consensus weights and the total-weight thresholds for the confidence label.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsensusWeights {
    pub linear_regression: f64,
    pub moving_average: f64,
    pub monte_carlo: f64,
    pub high_confidence: f64,
    pub medium_confidence: f64,
}

impl Default for ConsensusWeights {
    fn default() -> Self {
        Self {
            linear_regression: 0.3,
            moving_average: 0.3,
            monte_carlo: 0.4,
            high_confidence: 0.9,
            medium_confidence: 0.6,
        }
    }
}

impl ConsensusWeights {
    pub fn confidence_for(&self, total_weight: f64) -> crate::models::Confidence {
        use crate::models::Confidence;

        if total_weight + WEIGHT_TOLERANCE >= self.high_confidence {
            Confidence::High
        } else if total_weight + WEIGHT_TOLERANCE >= self.medium_confidence {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }

    fn validate(&self) -> std::result::Result<(), ForecastError> {
        let weights = [
            ("linear regression", self.linear_regression),
            ("moving average", self.moving_average),
            ("monte carlo", self.monte_carlo),
        ];
        for (label, weight) in weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ForecastError::InvalidConfig(format!(
                    "{} weight must be a non-negative number (value: {})",
                    label, weight
                )));
            }
        }
        if weights.iter().all(|(_, weight)| *weight == 0.0) {
            return Err(ForecastError::InvalidConfig(
                "at least one consensus weight must be positive".to_string(),
            ));
        }
        if !self.high_confidence.is_finite() || !self.medium_confidence.is_finite() {
            return Err(ForecastError::InvalidConfig(
                "confidence thresholds must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

/// Options for one forecast invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastConfig {
    pub days_ahead: usize,
    pub include_linear_regression: bool,
    pub include_moving_average: bool,
    pub include_monte_carlo: bool,
    pub monte_carlo_simulations: usize,
    /// Fixed seed for reproducible simulations; fresh entropy when `None`.
    pub monte_carlo_seed: Option<u64>,
    pub consensus: ConsensusWeights,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            days_ahead: DEFAULT_DAYS_AHEAD,
            include_linear_regression: true,
            include_moving_average: true,
            include_monte_carlo: true,
            monte_carlo_simulations: DEFAULT_SIMULATIONS,
            monte_carlo_seed: None,
            consensus: ConsensusWeights::default(),
        }
    }
}

impl ForecastConfig {
    /// Builds a config from the caller's camelCase option object. Missing or
    /// non-finite entries fall back to their defaults.
    pub fn from_parameters(parameters: &HashMap<String, f64>) -> Self {
        use crate::param_utils::*;

        let defaults = Self::default();
        let weights = ConsensusWeights::default();
        Self {
            days_ahead: get_usize_param_min(parameters, "daysAhead", defaults.days_ahead, 1),
            include_linear_regression: get_flag_param(parameters, "includeLinearRegression", true),
            include_moving_average: get_flag_param(parameters, "includeMovingAverage", true),
            include_monte_carlo: get_flag_param(parameters, "includeMonteCarlo", true),
            monte_carlo_simulations: get_usize_param_min(
                parameters,
                "monteCarloSimulations",
                defaults.monte_carlo_simulations,
                1,
            ),
            monte_carlo_seed: get_seed_param(parameters, "monteCarloSeed"),
            consensus: ConsensusWeights {
                linear_regression: get_weight_param(
                    parameters,
                    "linearRegressionWeight",
                    weights.linear_regression,
                ),
                moving_average: get_weight_param(
                    parameters,
                    "movingAverageWeight",
                    weights.moving_average,
                ),
                monte_carlo: get_weight_param(
                    parameters,
                    "monteCarloWeight",
                    weights.monte_carlo,
                ),
                ..weights
            },
        }
    }

    /// Reads upper-snake settings (environment, settings table). A missing key
    /// keeps its default; a present but malformed value is an error.
    pub fn from_settings_map(settings: &HashMap<String, String>) -> Result<Self> {
        let defaults = Self::default();
        let weights = ConsensusWeights::default();

        let config = Self {
            days_ahead: optional_setting_usize(settings, "FORECAST_DAYS_AHEAD", 1)?
                .unwrap_or(defaults.days_ahead),
            include_linear_regression: optional_setting_bool(
                settings,
                "FORECAST_INCLUDE_LINEAR_REGRESSION",
            )?
            .unwrap_or(defaults.include_linear_regression),
            include_moving_average: optional_setting_bool(
                settings,
                "FORECAST_INCLUDE_MOVING_AVERAGE",
            )?
            .unwrap_or(defaults.include_moving_average),
            include_monte_carlo: optional_setting_bool(settings, "FORECAST_INCLUDE_MONTE_CARLO")?
                .unwrap_or(defaults.include_monte_carlo),
            monte_carlo_simulations: optional_setting_usize(settings, "MONTE_CARLO_SIMULATIONS", 1)?
                .unwrap_or(defaults.monte_carlo_simulations),
            monte_carlo_seed: optional_setting_u64(settings, "MONTE_CARLO_SEED")?,
            consensus: ConsensusWeights {
                linear_regression: optional_setting_f64(
                    settings,
                    "CONSENSUS_WEIGHT_LINEAR_REGRESSION",
                    Some(0.0),
                    None,
                )?
                .unwrap_or(weights.linear_regression),
                moving_average: optional_setting_f64(
                    settings,
                    "CONSENSUS_WEIGHT_MOVING_AVERAGE",
                    Some(0.0),
                    None,
                )?
                .unwrap_or(weights.moving_average),
                monte_carlo: optional_setting_f64(
                    settings,
                    "CONSENSUS_WEIGHT_MONTE_CARLO",
                    Some(0.0),
                    None,
                )?
                .unwrap_or(weights.monte_carlo),
                high_confidence: optional_setting_f64(
                    settings,
                    "CONSENSUS_HIGH_CONFIDENCE",
                    Some(0.0),
                    None,
                )?
                .unwrap_or(weights.high_confidence),
                medium_confidence: optional_setting_f64(
                    settings,
                    "CONSENSUS_MEDIUM_CONFIDENCE",
                    Some(0.0),
                    None,
                )?
                .unwrap_or(weights.medium_confidence),
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> std::result::Result<(), ForecastError> {
        if self.days_ahead == 0 {
            return Err(ForecastError::InvalidConfig(
                "daysAhead must be a positive integer".to_string(),
            ));
        }
        if self.include_monte_carlo && self.monte_carlo_simulations == 0 {
            return Err(ForecastError::InvalidConfig(
                "monteCarloSimulations must be a positive integer".to_string(),
            ));
        }
        self.consensus.validate()?;

        let enabled = [
            (
                "linearRegressionWeight",
                self.include_linear_regression,
                self.consensus.linear_regression,
            ),
            (
                "movingAverageWeight",
                self.include_moving_average,
                self.consensus.moving_average,
            ),
            (
                "monteCarloWeight",
                self.include_monte_carlo,
                self.consensus.monte_carlo,
            ),
        ];
        for (key, included, weight) in enabled {
            if included && weight == 0.0 {
                return Err(ForecastError::InvalidConfig(format!(
                    "{} must be positive while its forecaster is included",
                    key
                )));
            }
        }
        Ok(())
    }
}

fn optional_setting<'a>(settings: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    settings
        .get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

fn optional_setting_f64(
    settings: &HashMap<String, String>,
    key: &str,
    min: Option<f64>,
    max: Option<f64>,
) -> Result<Option<f64>> {
    let Some(raw) = optional_setting(settings, key) else {
        return Ok(None);
    };
    let value = raw
        .parse::<f64>()
        .map_err(|_| anyhow!("Setting {} must be a number (value: {})", key, raw))?;
    if !value.is_finite() {
        return Err(anyhow!("Setting {} must be finite (value: {})", key, raw));
    }
    if let Some(min_value) = min {
        if value < min_value {
            return Err(anyhow!(
                "Setting {} must be >= {} (value: {})",
                key,
                min_value,
                raw
            ));
        }
    }
    if let Some(max_value) = max {
        if value > max_value {
            return Err(anyhow!(
                "Setting {} must be <= {} (value: {})",
                key,
                max_value,
                raw
            ));
        }
    }
    Ok(Some(value))
}

fn optional_setting_usize(
    settings: &HashMap<String, String>,
    key: &str,
    min: usize,
) -> Result<Option<usize>> {
    let Some(raw) = optional_setting(settings, key) else {
        return Ok(None);
    };
    let value = raw
        .parse::<f64>()
        .map_err(|_| anyhow!("Setting {} must be a number (value: {})", key, raw))?;
    if !value.is_finite() {
        return Err(anyhow!("Setting {} must be finite (value: {})", key, raw));
    }
    if value.fract() != 0.0 {
        return Err(anyhow!(
            "Setting {} must be an integer (value: {})",
            key,
            raw
        ));
    }
    if value < min as f64 {
        return Err(anyhow!(
            "Setting {} must be >= {} (value: {})",
            key,
            min,
            raw
        ));
    }
    Ok(Some(value as usize))
}

fn optional_setting_u64(settings: &HashMap<String, String>, key: &str) -> Result<Option<u64>> {
    let Some(raw) = optional_setting(settings, key) else {
        return Ok(None);
    };
    raw.parse::<u64>()
        .map(Some)
        .map_err(|_| anyhow!("Setting {} must be an unsigned integer (value: {})", key, raw))
}

fn optional_setting_bool(settings: &HashMap<String, String>, key: &str) -> Result<Option<bool>> {
    let Some(raw) = optional_setting(settings, key) else {
        return Ok(None);
    };
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" => Ok(Some(false)),
        _ => Err(anyhow!(
            "Setting {} must be true or false (value: {})",
            key,
            raw
        )),
    }
}

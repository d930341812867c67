use std::collections::HashMap;

/// Non-negative weight with a default for missing or non-finite entries.
pub fn get_weight_param(params: &HashMap<String, f64>, key: &str, default: f64) -> f64 {
    finite_param(params, key).map_or(default, |value| value.max(0.0))
}

/// Whole-number count rounded to the nearest integer and held at `min` or
/// above.
pub fn get_usize_param_min(
    params: &HashMap<String, f64>,
    key: &str,
    default: usize,
    min: usize,
) -> usize {
    finite_param(params, key)
        .map(|value| value.round().max(min as f64) as usize)
        .unwrap_or(default)
}

/// On/off parameter; values at or above 0.5 count as on
pub fn get_flag_param(params: &HashMap<String, f64>, key: &str, default: bool) -> bool {
    finite_param(params, key).map_or(default, |value| value >= 0.5)
}

/// Seed parameter; negative values are ignored
pub fn get_seed_param(params: &HashMap<String, f64>, key: &str) -> Option<u64> {
    finite_param(params, key)
        .filter(|value| *value >= 0.0)
        .map(|value| value.round() as u64)
}

pub fn finite_param(params: &HashMap<String, f64>, key: &str) -> Option<f64> {
    params.get(key).copied().filter(|v| v.is_finite())
}

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One trading day's observation as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candle {
    pub date: NaiveDate,
    pub close: f64,
    #[serde(
        default,
        deserialize_with = "deserialize_stock_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub stock_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

/// Ids arrive either as strings or as bare numbers (`2330`).
fn deserialize_stock_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawStockId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(
        Option::<RawStockId>::deserialize(deserializer)?.map(|raw| match raw {
            RawStockId::Text(text) => text,
            RawStockId::Number(number) => number.to_string(),
        }),
    )
}

impl Candle {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self {
            date,
            close,
            stock_id: None,
            volume: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Bullish,
    Bearish,
}

impl TrendDirection {
    /// Bullish only when `value` is strictly above `reference`.
    pub fn from_comparison(value: f64, reference: f64) -> Self {
        if value > reference {
            TrendDirection::Bullish
        } else {
            TrendDirection::Bearish
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// Trend-regression estimate for one future day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegressionPrediction {
    pub day: usize,
    pub price: f64,
    pub change: f64,
}

/// Moving-average momentum estimate for one future day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MomentumPrediction {
    pub day: usize,
    pub price: f64,
    pub change: f64,
    pub trend: TrendDirection,
}

/// Distribution of simulated prices for one future day.
///
/// `lower`/`upper` are the 10th/90th percentiles, `q1`/`q3` the 25th/75th.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationPrediction {
    pub day: usize,
    pub mean: f64,
    pub median: f64,
    pub lower: f64,
    pub upper: f64,
    pub q1: f64,
    pub q3: f64,
    pub change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsensusPrediction {
    pub day: usize,
    pub price: f64,
    pub change: f64,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Predictions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linear_regression: Option<Vec<RegressionPrediction>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moving_average: Option<Vec<MomentumPrediction>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monte_carlo: Option<Vec<SimulationPrediction>>,
    pub consensus: Vec<ConsensusPrediction>,
}

impl Predictions {
    /// Names of the forecasters that produced a series, in output order.
    pub fn available_forecasters(&self) -> Vec<&'static str> {
        let mut names = Vec::with_capacity(3);
        if self.linear_regression.is_some() {
            names.push("linearRegression");
        }
        if self.moving_average.is_some() {
            names.push("movingAverage");
        }
        if self.monte_carlo.is_some() {
            names.push("monteCarlo");
        }
        names
    }
}

/// Market regime derived from SMA(20) and volatility(20) of the input series.
/// Fields are `None` when the series is too short for the underlying
/// indicator.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketAnalysis {
    pub current_trend: Option<TrendDirection>,
    pub volatility: Option<f64>,
    pub support: Option<f64>,
    pub price_position: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastReport {
    pub stock_id: Option<String>,
    pub last_price: f64,
    pub last_date: NaiveDate,
    pub days_ahead: usize,
    pub predictions: Predictions,
    pub market_analysis: MarketAnalysis,
}

/// What the engine hands back to its caller: a full report or a single
/// structured failure.
#[derive(Debug, Clone, PartialEq)]
pub enum ForecastResponse {
    Success(ForecastReport),
    Failure { error: String },
}

impl ForecastResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, ForecastResponse::Success(_))
    }

    pub fn report(&self) -> Option<&ForecastReport> {
        match self {
            ForecastResponse::Success(report) => Some(report),
            ForecastResponse::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ForecastResponse::Success(_) => None,
            ForecastResponse::Failure { error } => Some(error),
        }
    }
}

impl Serialize for ForecastResponse {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        #[derive(Serialize)]
        struct Envelope<'a> {
            success: bool,
            #[serde(flatten)]
            report: Option<&'a ForecastReport>,
            #[serde(skip_serializing_if = "Option::is_none")]
            error: Option<&'a str>,
        }

        Envelope {
            success: self.is_success(),
            report: self.report(),
            error: self.error(),
        }
        .serialize(serializer)
    }
}

//! Wire and domain types.
//!
//! UI-facing shapes use camelCase, upstream (optimizer service) shapes keep
//! the service's snake_case names.

use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Datasets the dashboard can ask the optimizer for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dataset {
    #[serde(rename = "NIFTY50")]
    Nifty50,
    #[serde(rename = "NASDAQ100")]
    Nasdaq100,
    #[serde(rename = "CRYPTO50")]
    Crypto50,
}

impl Dataset {
    pub const ALL: [Dataset; 3] = [Dataset::Nifty50, Dataset::Nasdaq100, Dataset::Crypto50];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dataset::Nifty50 => "NIFTY50",
            Dataset::Nasdaq100 => "NASDAQ100",
            Dataset::Crypto50 => "CRYPTO50",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_str() == raw)
    }
}

/// Canonical dataset tokens understood by the upstream optimizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpstreamDataset {
    #[serde(rename = "NIFTY50")]
    Nifty50,
    #[serde(rename = "NASDAQ")]
    Nasdaq,
    #[serde(rename = "Crypto")]
    Crypto,
}

impl UpstreamDataset {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpstreamDataset::Nifty50 => "NIFTY50",
            UpstreamDataset::Nasdaq => "NASDAQ",
            UpstreamDataset::Crypto => "Crypto",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 3] = [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }

    /// Strict parse used by the validator (exact lowercase token).
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Objective {
    Sharpe,
    Variance,
}

impl Objective {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "sharpe" => Some(Objective::Sharpe),
            "variance" => Some(Objective::Variance),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightConstraints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_weight: Option<f64>,
}

// ===== Optimize =====

/// Validated dataset-mode optimize request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeRequest {
    pub dataset: Dataset,
    pub time_horizon: Option<u32>,
    pub risk_level: RiskLevel,
    /// Total investment in currency units.
    pub budget: f64,
    /// Number of assets to select.
    pub max_assets: u32,
    pub objective: Option<Objective>,
    pub constraints: Option<WeightConstraints>,
    pub include: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
    pub qaoa_params: Option<Map<String, Value>>,
}

/// Body POSTed to the optimizer's `/optimize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamOptimizeBody {
    pub dataset_option: UpstreamDataset,
    /// Asset count (upstream naming).
    pub budget: u32,
    pub risk_factor: RiskLevel,
    /// Currency amount (upstream naming).
    pub total_investment: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamOptimizeResponse {
    pub dataset: String,
    pub budget: f64,
    pub risk_factor: String,
    pub total_investment: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objective_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gamma: Option<f64>,
    pub portfolio: Vec<UpstreamPortfolioEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamPortfolioEntry {
    pub asset: String,
    #[serde(default)]
    pub expected_return: Option<f64>,
    /// Fraction in [0, 1].
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub investment: Option<f64>,
    /// Percent in [0, 100].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedValue<T> {
    pub name: String,
    pub value: T,
}

impl<T> NamedValue<T> {
    pub fn new(name: impl Into<String>, value: T) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objective_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gamma: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedOptimizeResult {
    pub run_id: String,
    pub method: String,
    pub selected: Vec<String>,
    pub weights: Vec<f64>,
    pub allocation: Vec<NamedValue<i64>>,
    pub expected_return: Option<f64>,
    pub risk: Option<f64>,
    pub sharpe: Option<f64>,
    pub diagnostics: Diagnostics,
}

// ===== Rebalance =====

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RebalanceRequest {
    pub dataset: String,
    /// Asset count.
    pub budget: u32,
    pub risk: RiskLevel,
    pub total_investment: f64,
    /// Days of synthesized evolution, in [5, 365].
    pub time_horizon: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamRebalanceBody {
    pub dataset_option: UpstreamDataset,
    /// Left out so the optimizer falls back to `<dataset>_Future`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub future_dataset_option: Option<String>,
    pub budget: u32,
    pub risk_factor: RiskLevel,
    pub total_investment: f64,
}

/// How an upstream holding expresses its weight.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum WeightShape {
    Fraction { weight: f64 },
    Percentage { percentage: f64 },
    Absent {},
}

/// How an upstream holding expresses its expected return.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ReturnShape {
    Expected { expected_return: f64 },
    Abbreviated { exp_ret: f64 },
    Absent {},
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UpstreamHolding {
    pub asset: String,
    #[serde(flatten)]
    pub weight: WeightShape,
    #[serde(flatten)]
    pub expected: ReturnShape,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UpstreamRecommendation {
    pub action: String,
    pub asset: String,
    #[serde(default, alias = "current")]
    pub current_pct: Option<f64>,
    #[serde(default, alias = "future")]
    pub future_pct: Option<f64>,
    #[serde(default, alias = "change")]
    pub change_pct: Option<f64>,
}

/// Arrays decode element-wise; `null` or any other non-array reads as empty.
fn list_or_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        items @ Value::Array(_) => serde_json::from_value(items).map_err(de::Error::custom),
        _ => Ok(Vec::new()),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UpstreamRebalanceResponse {
    #[serde(default)]
    pub dataset: Option<String>,
    #[serde(default, deserialize_with = "list_or_empty")]
    pub current_portfolio: Vec<UpstreamHolding>,
    #[serde(default, deserialize_with = "list_or_empty")]
    pub future_portfolio: Vec<UpstreamHolding>,
    #[serde(default, deserialize_with = "list_or_empty")]
    pub recommendations: Vec<UpstreamRecommendation>,
    #[serde(default)]
    pub objective_value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioLine {
    pub asset: String,
    pub weight: f64,
    pub expected_return: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebalanceAction {
    pub action: String,
    pub asset: String,
    pub current_pct: f64,
    pub future_pct: f64,
    pub change_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionPoint {
    pub time: String,
    #[serde(rename = "Current")]
    pub current: i64,
    #[serde(rename = "Future")]
    pub future: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebalanceSummary {
    pub mu_current: f64,
    pub mu_future: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebalanceResult {
    pub run_id: String,
    pub dataset: String,
    pub current: Vec<PortfolioLine>,
    pub future: Vec<PortfolioLine>,
    pub actions: Vec<RebalanceAction>,
    pub evolution: Vec<EvolutionPoint>,
    pub summary: RebalanceSummary,
}

// ===== Compare / demo analytics =====

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccuracyComparison {
    pub metric: String,
    pub quantum: u32,
    pub classical: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskReturnRequest {
    pub dataset: String,
    /// Already bounded to [3, 12].
    pub count: usize,
    pub asset_names: Vec<String>,
    pub weights: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskReturn {
    pub risk: f64,
    pub ret: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReturnPoint {
    pub name: String,
    pub classical: RiskReturn,
    pub quantum: RiskReturn,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReturnResponse {
    pub dataset: String,
    pub points: Vec<RiskReturnPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrontierPoint {
    pub risk: f64,
    #[serde(rename = "return")]
    pub ret: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QaoaBitstring {
    pub bits: String,
    pub p: f64,
    pub exp_ret: f64,
    pub risk: f64,
    pub constraints: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EquityEvolutionRequest {
    pub initial_equity: f64,
    pub time_horizon: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub time: String,
    #[serde(rename = "Quantum")]
    pub quantum: i64,
    #[serde(rename = "Classical")]
    pub classical: i64,
}

// ===== Stress =====

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StressShocks {
    pub rates_bps: f64,
    pub oil_pct: f64,
    pub tech_pct: f64,
    pub fx_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StressRequest {
    /// Percent weights in [0, 100].
    pub alloc: Vec<NamedValue<f64>>,
    pub initial_equity: f64,
    /// Percent of initial equity, in [0, 100].
    pub threshold: f64,
    pub stress: StressShocks,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StressResult {
    pub bars: Vec<NamedValue<u64>>,
    pub ruin_line: u64,
}

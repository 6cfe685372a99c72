//! Input validation.
//!
//! Inbound bodies are read as untyped JSON and checked field by field. All
//! violations are collected before failing so one response lists them all.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::error::{ApiError, ValidationErrors};
use crate::models::{
    Dataset, EquityEvolutionRequest, NamedValue, Objective, OptimizeRequest, RebalanceRequest,
    RiskLevel, RiskReturnRequest, StressRequest, StressShocks, WeightConstraints,
};

pub const DEFAULT_REBALANCE_HORIZON: u32 = 30;
pub const REBALANCE_HORIZON_RANGE: (u32, u32) = (5, 365);
pub const DEFAULT_EVOLUTION_STEPS: u32 = 12;
pub const DEFAULT_INITIAL_EQUITY: f64 = 100_000.0;
pub const DEFAULT_RUIN_THRESHOLD: f64 = 60.0;
pub const RISK_RETURN_COUNT_RANGE: (usize, usize) = (3, 12);
const DEFAULT_RISK_RETURN_COUNT: usize = 5;

/// A request shape that can be built from an untyped JSON object.
pub trait FromPayload: Sized {
    fn from_payload(payload: &Map<String, Value>) -> Result<Self, ApiError>;
}

/// Validate an arbitrary JSON value into `T`. A missing body counts as `{}`.
pub fn parse<T: FromPayload>(payload: &Value) -> Result<T, ApiError> {
    match payload {
        Value::Object(map) => T::from_payload(map),
        Value::Null => T::from_payload(&Map::new()),
        _ => Err(ApiError::BadRequest(
            "request body must be a JSON object".to_string(),
        )),
    }
}

/// Extractor that runs [`FromPayload`] on the request body.
pub struct Validated<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Validated<T>
where
    S: Send + Sync,
    T: FromPayload,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        let value = if bytes.iter().all(u8::is_ascii_whitespace) {
            Value::Null
        } else {
            serde_json::from_slice::<Value>(&bytes)
                .map_err(|e| ApiError::BadRequest(format!("malformed JSON body: {e}")))?
        };
        parse(&value).map(Validated)
    }
}

/// Field reader that records violations instead of stopping at the first.
/// `null` is treated the same as an absent key.
struct Fields<'a> {
    map: &'a Map<String, Value>,
    prefix: String,
    errors: ValidationErrors,
}

impl<'a> Fields<'a> {
    fn new(map: &'a Map<String, Value>) -> Self {
        Self {
            map,
            prefix: String::new(),
            errors: ValidationErrors::new(),
        }
    }

    fn path(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    fn fail(&mut self, key: &str, message: impl std::fmt::Display) {
        let path = self.path(key);
        self.errors.push(&path, message);
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|v| !v.is_null())
    }

    fn number(&mut self, key: &str) -> Option<f64> {
        match self.get(key)? {
            Value::Number(n) => match n.as_f64().filter(|v| v.is_finite()) {
                Some(v) => Some(v),
                None => {
                    self.fail(key, "must be a finite number");
                    None
                }
            },
            _ => {
                self.fail(key, "expected a number");
                None
            }
        }
    }

    fn required_number(&mut self, key: &str) -> Option<f64> {
        if self.get(key).is_none() {
            self.fail(key, "is required");
            return None;
        }
        self.number(key)
    }

    fn positive_number(&mut self, key: &str, required: bool) -> Option<f64> {
        let value = if required {
            self.required_number(key)?
        } else {
            self.number(key)?
        };
        if value > 0.0 {
            Some(value)
        } else {
            self.fail(key, "must be a positive finite number");
            None
        }
    }

    fn number_in(&mut self, key: &str, lo: f64, hi: f64) -> Option<f64> {
        let value = self.number(key)?;
        if (lo..=hi).contains(&value) {
            Some(value)
        } else {
            self.fail(key, format!("must be between {lo} and {hi}"));
            None
        }
    }

    fn integer(&mut self, key: &str, required: bool) -> Option<u32> {
        let value = if required {
            self.required_number(key)?
        } else {
            self.number(key)?
        };
        if value.fract() != 0.0 || value < 0.0 || value > u32::MAX as f64 {
            self.fail(key, "must be a non-negative integer");
            return None;
        }
        Some(value as u32)
    }

    fn positive_integer(&mut self, key: &str, required: bool) -> Option<u32> {
        let value = self.integer(key, required)?;
        if value == 0 {
            self.fail(key, "must be a positive integer");
            return None;
        }
        Some(value)
    }

    fn integer_in(&mut self, key: &str, lo: u32, hi: u32) -> Option<u32> {
        let value = self.integer(key, false)?;
        if (lo..=hi).contains(&value) {
            Some(value)
        } else {
            self.fail(key, format!("must be between {lo} and {hi}"));
            None
        }
    }

    fn string(&mut self, key: &str) -> Option<&'a str> {
        match self.get(key)? {
            Value::String(s) => Some(s.as_str()),
            _ => {
                self.fail(key, "expected a string");
                None
            }
        }
    }

    fn required_string(&mut self, key: &str) -> Option<&'a str> {
        if self.get(key).is_none() {
            self.fail(key, "is required");
            return None;
        }
        self.string(key)
    }

    fn choice<T>(
        &mut self,
        key: &str,
        required: bool,
        parse: impl Fn(&str) -> Option<T>,
        allowed: &str,
    ) -> Option<T> {
        let raw = if required {
            self.required_string(key)?
        } else {
            self.string(key)?
        };
        match parse(raw) {
            Some(v) => Some(v),
            None => {
                self.fail(key, format!("must be one of {allowed}"));
                None
            }
        }
    }

    fn string_list(&mut self, key: &str) -> Option<Vec<String>> {
        let items = match self.get(key)? {
            Value::Array(items) => items,
            _ => {
                self.fail(key, "expected a list of strings");
                return None;
            }
        };
        let mut out = Vec::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            match item {
                Value::String(s) => out.push(s.clone()),
                _ => self.fail(&format!("{key}[{idx}]"), "expected a string"),
            }
        }
        Some(out)
    }

    fn object(&mut self, key: &str) -> Option<&'a Map<String, Value>> {
        match self.get(key)? {
            Value::Object(map) => Some(map),
            _ => {
                self.fail(key, "expected an object");
                None
            }
        }
    }

    /// Run `f` against a nested object, reporting paths as `key.field`.
    fn nested<T>(
        &mut self,
        key: &str,
        map: &'a Map<String, Value>,
        f: impl FnOnce(&mut Fields<'a>) -> T,
    ) -> T {
        let mut inner = Fields {
            map,
            prefix: format!("{}.", self.path(key)),
            errors: std::mem::take(&mut self.errors),
        };
        let out = f(&mut inner);
        self.errors = inner.errors;
        out
    }

    fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    fn into_error(self) -> ApiError {
        let mut errors = self.errors;
        if errors.is_empty() {
            errors.push("body", "is incomplete");
        }
        ApiError::Validation(errors)
    }
}

impl FromPayload for OptimizeRequest {
    fn from_payload(payload: &Map<String, Value>) -> Result<Self, ApiError> {
        let mut f = Fields::new(payload);

        f.choice(
            "mode",
            true,
            |m| (m == "dataset").then_some(()),
            "\"dataset\"",
        );
        let dataset = f.choice("dataset", true, Dataset::parse, "NIFTY50, NASDAQ100, CRYPTO50");
        let time_horizon = f.positive_integer("timeHorizon", false);
        let risk_level = f
            .choice("riskLevel", false, RiskLevel::parse, "low, medium, high")
            .unwrap_or_default();
        let budget = f.positive_number("budget", true);
        let max_assets = f.positive_integer("maxAssets", true);
        let objective = f.choice("objective", false, Objective::parse, "sharpe, variance");

        let constraints = f.object("constraints").map(|map| {
            f.nested("constraints", map, |c| WeightConstraints {
                min_weight: c.number_in("minWeight", 0.0, 1.0),
                max_weight: c.number_in("maxWeight", 0.0, 1.0),
            })
        });
        let include = f.string_list("include");
        let exclude = f.string_list("exclude");
        let qaoa_params = f.object("qaoaParams").cloned();

        let (Some(dataset), Some(budget), Some(max_assets)) = (dataset, budget, max_assets) else {
            return Err(f.into_error());
        };
        if !f.is_clean() {
            return Err(f.into_error());
        }

        if let Some(WeightConstraints {
            min_weight: Some(lo),
            max_weight: Some(hi),
        }) = &constraints
        {
            if lo > hi {
                return Err(ApiError::BadRequest(format!(
                    "constraints.minWeight ({lo}) exceeds constraints.maxWeight ({hi})"
                )));
            }
        }
        if let (Some(include), Some(exclude)) = (&include, &exclude) {
            let excluded: HashSet<&str> = exclude.iter().map(String::as_str).collect();
            if let Some(both) = include.iter().find(|a| excluded.contains(a.as_str())) {
                return Err(ApiError::BadRequest(format!(
                    "asset {both} is both included and excluded"
                )));
            }
        }

        Ok(OptimizeRequest {
            dataset,
            time_horizon,
            risk_level,
            budget,
            max_assets,
            objective,
            constraints,
            include,
            exclude,
            qaoa_params,
        })
    }
}

impl FromPayload for RebalanceRequest {
    fn from_payload(payload: &Map<String, Value>) -> Result<Self, ApiError> {
        let mut f = Fields::new(payload);

        let dataset = f.required_string("dataset").and_then(|d| {
            if d.is_empty() {
                f.fail("dataset", "must not be empty");
                None
            } else {
                Some(d.to_string())
            }
        });
        let budget = f.positive_integer("budget", true);
        let risk = f.choice("risk", true, RiskLevel::parse, "low, medium, high");
        let total_investment = f.positive_number("totalInvestment", true);
        let (lo, hi) = REBALANCE_HORIZON_RANGE;
        let time_horizon = f
            .integer_in("timeHorizon", lo, hi)
            .unwrap_or(DEFAULT_REBALANCE_HORIZON);

        match (dataset, budget, risk, total_investment) {
            (Some(dataset), Some(budget), Some(risk), Some(total_investment)) if f.is_clean() => {
                Ok(RebalanceRequest {
                    dataset,
                    budget,
                    risk,
                    total_investment,
                    time_horizon,
                })
            }
            _ => Err(f.into_error()),
        }
    }
}

impl FromPayload for StressRequest {
    fn from_payload(payload: &Map<String, Value>) -> Result<Self, ApiError> {
        let mut f = Fields::new(payload);

        let mut alloc = Vec::new();
        match f.get("alloc") {
            None => {}
            Some(Value::Array(items)) => {
                for (idx, item) in items.iter().enumerate() {
                    let key = format!("alloc[{idx}]");
                    let Some(line) = item.as_object() else {
                        f.fail(&key, "expected an object");
                        continue;
                    };
                    let entry = f.nested(&key, line, |a| {
                        let name = a
                            .string("name")
                            .filter(|n| !n.is_empty())
                            .unwrap_or("Asset")
                            .to_string();
                        let value = a.number_in("value", 0.0, 100.0).unwrap_or(0.0);
                        NamedValue::new(name, value)
                    });
                    alloc.push(entry);
                }
            }
            Some(_) => f.fail("alloc", "expected a list"),
        }

        let initial_equity = f
            .positive_number("initialEquity", false)
            .unwrap_or(DEFAULT_INITIAL_EQUITY);
        let threshold = f
            .number_in("threshold", 0.0, 100.0)
            .unwrap_or(DEFAULT_RUIN_THRESHOLD);
        let stress = match f.object("stress") {
            Some(map) => f.nested("stress", map, |s| StressShocks {
                rates_bps: s.number("ratesBps").unwrap_or(0.0),
                oil_pct: s.number("oilPct").unwrap_or(0.0),
                tech_pct: s.number("techPct").unwrap_or(0.0),
                fx_pct: s.number("fxPct").unwrap_or(0.0),
            }),
            None => StressShocks::default(),
        };

        if !f.is_clean() {
            return Err(f.into_error());
        }
        Ok(StressRequest {
            alloc,
            initial_equity,
            threshold,
            stress,
        })
    }
}

impl FromPayload for RiskReturnRequest {
    fn from_payload(payload: &Map<String, Value>) -> Result<Self, ApiError> {
        let mut f = Fields::new(payload);

        let dataset = f.string("dataset").unwrap_or("nifty50").to_string();
        let (lo, hi) = RISK_RETURN_COUNT_RANGE;
        let count = payload
            .get("maxAssets")
            .and_then(Value::as_f64)
            .filter(|n| n.is_finite() && *n != 0.0)
            .map(|n| n.clamp(lo as f64, hi as f64) as usize)
            .unwrap_or(DEFAULT_RISK_RETURN_COUNT);
        let asset_names = f.string_list("assetNames").unwrap_or_default();
        let weights = match payload.get("weights") {
            Some(Value::Array(items)) => items
                .iter()
                .map(|w| w.as_f64().filter(|v| v.is_finite()).unwrap_or(0.0).max(0.0))
                .collect(),
            _ => Vec::new(),
        };

        if !f.is_clean() {
            return Err(f.into_error());
        }
        Ok(RiskReturnRequest {
            dataset,
            count,
            asset_names,
            weights,
        })
    }
}

impl FromPayload for EquityEvolutionRequest {
    fn from_payload(payload: &Map<String, Value>) -> Result<Self, ApiError> {
        let mut f = Fields::new(payload);
        let initial_equity = f
            .positive_number("initialEquity", false)
            .unwrap_or(DEFAULT_INITIAL_EQUITY);
        let time_horizon = f
            .integer_in("timeHorizon", 1, REBALANCE_HORIZON_RANGE.1)
            .unwrap_or(DEFAULT_EVOLUTION_STEPS);
        if !f.is_clean() {
            return Err(f.into_error());
        }
        Ok(EquityEvolutionRequest {
            initial_equity,
            time_horizon,
        })
    }
}

/// `{riskLevel}` body of the frontier endpoint.
///
/// Only the exact tokens `low` and `medium` pick those levels. A missing
/// level reads as medium; any other value, `"LOW"` included, reads as high.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrontierRequest {
    pub risk_level: RiskLevel,
}

impl FromPayload for FrontierRequest {
    fn from_payload(payload: &Map<String, Value>) -> Result<Self, ApiError> {
        let risk_level = match Fields::new(payload).get("riskLevel") {
            None => RiskLevel::Medium,
            Some(Value::String(s)) if s == "low" => RiskLevel::Low,
            Some(Value::String(s)) if s == "medium" => RiskLevel::Medium,
            Some(_) => RiskLevel::High,
        };
        Ok(Self { risk_level })
    }
}

/// `{dataset}` body of the allocation endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationRequest {
    pub dataset: String,
}

impl FromPayload for AllocationRequest {
    fn from_payload(payload: &Map<String, Value>) -> Result<Self, ApiError> {
        let mut f = Fields::new(payload);
        let dataset = f.string("dataset").unwrap_or("nifty50").to_string();
        if !f.is_clean() {
            return Err(f.into_error());
        }
        Ok(Self { dataset })
    }
}

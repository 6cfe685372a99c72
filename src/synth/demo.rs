//! Fixed and randomized demo analytics.

use rand::Rng;

use crate::models::{FrontierPoint, NamedValue, QaoaBitstring, RiskLevel};

pub const NIFTY50_ASSETS: [&str; 7] = [
    "Reliance",
    "HDFC Bank",
    "Infosys",
    "TCS",
    "ICICI Bank",
    "HUL",
    "Bharti Airtel",
];
pub const NASDAQ_ASSETS: [&str; 7] = [
    "Apple",
    "Microsoft",
    "Amazon",
    "Google",
    "Tesla",
    "Nvidia",
    "Meta",
];
pub const CRYPTO_ASSETS: [&str; 7] = [
    "Bitcoin", "Ethereum", "Solana", "Cardano", "Polkadot", "BNB", "XRP",
];
pub const FALLBACK_ASSETS: [&str; 6] = ["Alpha", "Beta", "Gamma", "Delta", "Epsilon", "Zeta"];

const ALLOCATION_SLOTS: usize = 5;
const FRONTIER_POINTS: usize = 8;

/// Asset universe for a dashboard dataset key (`nifty50`, `nasdaq`, `crypto`).
pub fn dataset_assets(key: &str) -> &'static [&'static str] {
    match key.to_ascii_lowercase().as_str() {
        "nifty50" => &NIFTY50_ASSETS,
        "nasdaq" => &NASDAQ_ASSETS,
        "crypto" => &CRYPTO_ASSETS,
        _ => &FALLBACK_ASSETS,
    }
}

pub fn sharpe_comparison() -> Vec<NamedValue<f64>> {
    vec![
        NamedValue::new("Classical", 1.1),
        NamedValue::new("Quantum", 1.35),
        NamedValue::new("Hybrid", 1.42),
    ]
}

pub fn efficient_frontier(risk: RiskLevel) -> Vec<FrontierPoint> {
    let base = match risk {
        RiskLevel::Low => 5.0,
        RiskLevel::Medium => 10.0,
        RiskLevel::High => 20.0,
    };
    (0..FRONTIER_POINTS)
        .map(|i| FrontierPoint {
            risk: base + i as f64 * 2.0,
            ret: base / 2.0 + i as f64 * 1.5,
        })
        .collect()
}

pub fn qaoa_bitstrings() -> Vec<QaoaBitstring> {
    [
        ("00111", 0.21, 0.093, 0.113, "OK"),
        ("11100", 0.20, 0.088, 0.092, "OK"),
        ("10101", 0.19, 0.097, 0.117, "ESG excluded"),
        ("11010", 0.18, 0.092, 0.095, "ESG excluded"),
        ("10011", 0.13, 0.090, 0.096, "OK"),
    ]
    .into_iter()
    .map(|(bits, p, exp_ret, risk, constraints)| QaoaBitstring {
        bits: bits.to_string(),
        p,
        exp_ret,
        risk,
        constraints: constraints.to_string(),
    })
    .collect()
}

/// Random raw weights in [5, 40), normalized to fractions summing to 1.
pub fn random_weights<R: Rng>(n: usize, rng: &mut R) -> Vec<f64> {
    let raw: Vec<f64> = (0..n).map(|_| rng.gen_range(5.0..40.0)).collect();
    let sum: f64 = raw.iter().sum();
    raw.into_iter().map(|w| w / sum).collect()
}

/// Integer-percent split over the first five assets of the dataset.
pub fn allocation<R: Rng>(dataset: &str, rng: &mut R) -> Vec<NamedValue<i64>> {
    let names = dataset_assets(dataset);
    let names = &names[..names.len().min(ALLOCATION_SLOTS)];
    names
        .iter()
        .zip(random_weights(names.len(), rng))
        .map(|(name, w)| NamedValue::new(*name, (w * 100.0).round() as i64))
        .collect()
}

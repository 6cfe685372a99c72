//! Quantum-vs-classical comparison metrics for the dashboard.

use rand::seq::SliceRandom;
use rand::Rng;

use super::rng::{name_seed, SeededStream, XorShift32};
use super::round1;
use crate::models::{
    AccuracyComparison, RiskLevel, RiskReturn, RiskReturnPoint, RiskReturnRequest,
    RiskReturnResponse,
};

pub const NAME_BANK: [&str; 15] = [
    "Reliance",
    "HDFC Bank",
    "Infosys",
    "TCS",
    "ICICI Bank",
    "HUL",
    "Bharti Airtel",
    "Bajaj Auto",
    "Sun Pharmaceutical",
    "M&M",
    "HCL Tech",
    "Tata Motors",
    "Larsen & Toubro",
    "Axis Bank",
    "ITC",
];

const QUANTUM_ACCURACY_CAP: u32 = 97;
const CLASSICAL_ACCURACY_FLOOR: u32 = 55;
const QUANTUM_RISK_FLOOR: f64 = 3.0;

/// Quantum always edges out classical; deterministic per risk level.
pub fn accuracy(risk: RiskLevel) -> AccuracyComparison {
    let base: u32 = match risk {
        RiskLevel::Low => 72,
        RiskLevel::Medium => 76,
        RiskLevel::High => 80,
    };
    AccuracyComparison {
        metric: "accuracy".to_string(),
        quantum: (base + 12).min(QUANTUM_ACCURACY_CAP),
        classical: base.saturating_sub(8).max(CLASSICAL_ACCURACY_FLOOR),
    }
}

/// `n` distinct names from [`NAME_BANK`].
pub fn pick_names<R: Rng>(n: usize, rng: &mut R) -> Vec<String> {
    NAME_BANK
        .choose_multiple(rng, n.min(NAME_BANK.len()))
        .map(|s| s.to_string())
        .collect()
}

/// Per-asset risk/return points. Names fall back to a random draw from the
/// bank; the jitter itself is seeded from the inputs.
pub fn risk_return<R: Rng>(req: &RiskReturnRequest, rng: &mut R) -> RiskReturnResponse {
    let names = if req.asset_names.is_empty() {
        pick_names(req.count, rng)
    } else {
        req.asset_names.clone()
    };
    RiskReturnResponse {
        dataset: req.dataset.clone(),
        points: risk_return_points::<XorShift32>(&req.dataset, req.count, &names, &req.weights),
    }
}

/// Deterministic for identical inputs. `weights` are percents; they are only
/// used when there is one per name, otherwise names share 100% equally.
pub fn risk_return_points<S: SeededStream>(
    dataset: &str,
    count: usize,
    names: &[String],
    weights: &[f64],
) -> Vec<RiskReturnPoint> {
    let equal = 100.0 / names.len().max(1) as f64;
    let base_seed = name_seed(dataset).wrapping_add((count as u32).wrapping_mul(97));

    names
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let pct = if weights.len() == names.len() {
                weights[idx].max(0.0)
            } else {
                equal
            };
            let w = (pct / 100.0).clamp(0.0, 1.0);
            let seed = base_seed
                .wrapping_add(name_seed(name))
                .wrapping_add((idx as u32).wrapping_mul(17));
            let mut rnd = S::from_seed(seed);

            // heavier weight: lower risk, higher return
            let risk_from_weight = 20.0 - 12.0 * w;
            let return_from_weight = 6.0 + 10.0 * w;

            let jitter_risk = (rnd.next_unit() - 0.5) * 1.2;
            let jitter_ret = (rnd.next_unit() - 0.5) * 1.2;
            let classical = RiskReturn {
                risk: round1(risk_from_weight + jitter_risk),
                ret: round1(return_from_weight + jitter_ret),
            };

            let bonus_ret = round1(0.8 + rnd.next_unit());
            let risk_edge = round1(0.3 + rnd.next_unit() * 0.5);
            let quantum = RiskReturn {
                risk: round1(classical.risk - risk_edge).max(QUANTUM_RISK_FLOOR),
                ret: round1(classical.ret + bonus_ret),
            };

            RiskReturnPoint {
                name: name.clone(),
                classical,
                quantum,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// Always yields 0.2.
    struct Flat;

    impl SeededStream for Flat {
        fn from_seed(_seed: u32) -> Self {
            Flat
        }
        fn next_unit(&mut self) -> f64 {
            0.2
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_accuracy_favors_quantum_within_bounds() {
        for risk in RiskLevel::ALL {
            let acc = accuracy(risk);
            assert!(acc.quantum > acc.classical);
            assert!(acc.quantum <= 97);
            assert!(acc.classical >= 55);
        }
        let high = accuracy(RiskLevel::High);
        assert_eq!((high.quantum, high.classical), (92, 72));
        let low = accuracy(RiskLevel::Low);
        assert_eq!((low.quantum, low.classical), (84, 64));
    }

    #[test]
    fn test_risk_return_with_fixed_stream() {
        let list = names(&["TCS", "HUL"]);
        let points = risk_return_points::<Flat>("nifty50", 5, &list, &[50.0, 50.0]);
        let p = &points[0];
        // w = 0.5, jitter = -0.36, bonus = 1.0, edge = 0.4
        assert!((p.classical.risk - 13.6).abs() < 1e-9);
        assert!((p.classical.ret - 10.6).abs() < 1e-9);
        assert!((p.quantum.risk - 13.2).abs() < 1e-9);
        assert!((p.quantum.ret - 11.6).abs() < 1e-9);
    }

    #[test]
    fn test_risk_return_is_deterministic() {
        let list = names(&["Reliance", "Infosys", "ITC"]);
        let weights = [50.0, 30.0, 20.0];
        let a = risk_return_points::<XorShift32>("nifty50", 3, &list, &weights);
        let b = risk_return_points::<XorShift32>("nifty50", 3, &list, &weights);
        assert_eq!(
            serde_json::to_string(&a).expect("json"),
            serde_json::to_string(&b).expect("json")
        );
    }

    #[test]
    fn test_quantum_dominates_classical() {
        let list = names(&["Reliance", "HDFC Bank", "Infosys", "TCS", "HUL", "ITC"]);
        for dataset in ["nifty50", "nasdaq", "crypto"] {
            for p in risk_return_points::<XorShift32>(dataset, list.len(), &list, &[]) {
                assert!(p.quantum.ret > p.classical.ret);
                assert!(p.quantum.risk < p.classical.risk);
                assert!(p.quantum.risk >= 3.0);
                // equal split of 6: w = 1/6, jitter bounded by 0.6
                assert!((p.classical.risk - 18.0).abs() <= 0.65);
            }
        }
    }

    #[test]
    fn test_mismatched_weights_fall_back_to_equal_split() {
        let list = names(&["TCS", "HUL"]);
        let equal = risk_return_points::<Flat>("x", 3, &list, &[]);
        let mismatched = risk_return_points::<Flat>("x", 3, &list, &[90.0]);
        assert_eq!(equal, mismatched);
    }

    #[test]
    fn test_missing_names_are_drawn_from_bank() {
        let req = RiskReturnRequest {
            dataset: "nifty50".to_string(),
            count: 6,
            asset_names: vec![],
            weights: vec![],
        };
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let out = risk_return(&req, &mut rng);
        assert_eq!(out.points.len(), 6);
        let mut seen: Vec<&str> = out.points.iter().map(|p| p.name.as_str()).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 6);
        assert!(seen.iter().all(|n| NAME_BANK.contains(n)));
    }
}

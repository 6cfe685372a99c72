//! Sector stress test.
//!
//! Each holding is bucketed into a coarse sector from its name, then hit with
//! a base drawdown plus the shock terms that sector is sensitive to.

use crate::models::{NamedValue, StressRequest, StressResult, StressShocks};

pub const MIN_STRESS_FACTOR: f64 = 0.02;
pub const MAX_STRESS_FACTOR: f64 = 0.35;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sector {
    Energy,
    Tech,
    Finance,
    Auto,
    Health,
    Other,
}

impl Sector {
    /// First keyword hit wins; energy and tech are checked before the rest.
    pub fn classify(name: &str) -> Self {
        let n = name.to_lowercase();
        let any = |keys: &[&str]| keys.iter().any(|k| n.contains(k));
        if any(&["oil", "coal", "petro", "energy"]) {
            Sector::Energy
        } else if any(&["tech", "it", "software", "airtel"]) {
            Sector::Tech
        } else if any(&["bank", "finance"]) {
            Sector::Finance
        } else if any(&["auto"]) {
            Sector::Auto
        } else if any(&["pharma", "lab", "health"]) {
            Sector::Health
        } else {
            Sector::Other
        }
    }

    pub fn base_factor(self) -> f64 {
        match self {
            Sector::Energy => 0.10,
            Sector::Tech => 0.12,
            Sector::Finance => 0.08,
            Sector::Auto => 0.07,
            Sector::Health => 0.05,
            Sector::Other => 0.06,
        }
    }
}

/// Fractional drawdown for one sector under the given shocks.
pub fn stress_factor(sector: Sector, shocks: &StressShocks) -> f64 {
    let rates_hit = shocks.rates_bps.max(0.0) / 10_000.0;
    let oil_shock = shocks.oil_pct / 100.0;
    let tech_shock = shocks.tech_pct / 100.0;
    let fx_shock = shocks.fx_pct.abs() / 100.0 * 0.3;

    let extra = match sector {
        Sector::Finance => rates_hit * 0.8 + fx_shock * 0.2,
        Sector::Tech => rates_hit * 0.3 + (-tech_shock).max(0.0) * 0.6 + fx_shock * 0.1,
        Sector::Energy => oil_shock.max(0.0) * 0.7 + fx_shock * 0.1,
        Sector::Auto => rates_hit * 0.2 + fx_shock * 0.2,
        Sector::Health => rates_hit * 0.1,
        Sector::Other => 0.0,
    };
    (sector.base_factor() + extra).clamp(MIN_STRESS_FACTOR, MAX_STRESS_FACTOR)
}

pub fn run_stress(req: &StressRequest) -> StressResult {
    let bars = req
        .alloc
        .iter()
        .map(|a| {
            let factor = stress_factor(Sector::classify(&a.name), &req.stress);
            let after = req.initial_equity * a.value / 100.0 * (1.0 - factor);
            NamedValue::new(a.name.clone(), after.max(0.0).round() as u64)
        })
        .collect();

    StressResult {
        bars,
        ruin_line: (req.threshold / 100.0 * req.initial_equity).max(0.0).round() as u64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(alloc: &[(&str, f64)], stress: StressShocks) -> StressRequest {
        StressRequest {
            alloc: alloc
                .iter()
                .map(|(name, value)| NamedValue::new(*name, *value))
                .collect(),
            initial_equity: 100_000.0,
            threshold: 60.0,
            stress,
        }
    }

    #[test]
    fn test_classify_priority() {
        assert_eq!(Sector::classify("Oil India"), Sector::Energy);
        assert_eq!(Sector::classify("Bharti Airtel"), Sector::Tech);
        assert_eq!(Sector::classify("HCL Tech"), Sector::Tech);
        assert_eq!(Sector::classify("HDFC Bank"), Sector::Finance);
        assert_eq!(Sector::classify("Bajaj Auto"), Sector::Auto);
        assert_eq!(Sector::classify("Dr Reddy Labs"), Sector::Health);
        assert_eq!(Sector::classify("Reliance"), Sector::Other);
        // energy wins over finance, tech wins over finance
        assert_eq!(Sector::classify("Petro Finance"), Sector::Energy);
        assert_eq!(Sector::classify("Fintech Bank"), Sector::Tech);
        // plain substring match, no word boundaries
        assert_eq!(Sector::classify("Bitcoin"), Sector::Tech);
    }

    #[test]
    fn test_finance_example() {
        let shocks = StressShocks {
            rates_bps: 200.0,
            fx_pct: 3.0,
            ..Default::default()
        };
        let factor = stress_factor(Sector::Finance, &shocks);
        assert!((factor - 0.0978).abs() < 1e-9);

        let out = run_stress(&request(&[("Axis Bank", 50.0)], shocks));
        assert_eq!(out.bars[0].name, "Axis Bank");
        assert_eq!(out.bars[0].value, 45_110);
        assert_eq!(out.ruin_line, 60_000);
    }

    #[test]
    fn test_factor_is_always_clamped() {
        let extremes = [
            StressShocks::default(),
            StressShocks {
                rates_bps: 5_000.0,
                oil_pct: 300.0,
                tech_pct: -300.0,
                fx_pct: -200.0,
            },
            StressShocks {
                rates_bps: -5_000.0,
                oil_pct: -100.0,
                tech_pct: 100.0,
                fx_pct: 0.0,
            },
        ];
        let sectors = [
            Sector::Energy,
            Sector::Tech,
            Sector::Finance,
            Sector::Auto,
            Sector::Health,
            Sector::Other,
        ];
        for shocks in &extremes {
            for sector in sectors {
                let f = stress_factor(sector, shocks);
                assert!((MIN_STRESS_FACTOR..=MAX_STRESS_FACTOR).contains(&f));
            }
        }
        assert_eq!(
            stress_factor(Sector::Energy, &extremes[1]),
            MAX_STRESS_FACTOR
        );
    }

    #[test]
    fn test_no_shock_uses_base_factor() {
        let out = run_stress(&request(&[("Reliance", 100.0), ("Sun Pharma", 0.0)], StressShocks::default()));
        assert_eq!(out.bars[0].value, 94_000);
        assert_eq!(out.bars[1].value, 0);
    }

    #[test]
    fn test_negative_rates_do_not_help() {
        let cut = StressShocks {
            rates_bps: -300.0,
            ..Default::default()
        };
        assert_eq!(stress_factor(Sector::Finance, &cut), 0.08);
    }
}

//! Process configuration.
//!
//! Read once from flags and environment at startup, then shared read-only.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(name = "qportfolio")]
#[command(about = "Portfolio optimization backend: proxies the quantum optimizer or synthesizes demo analytics")]
pub struct Cli {
    /// HTTP listen port
    #[arg(long, env = "PORT", default_value = "5000")]
    pub port: u16,

    /// Allowed CORS origin (`*` for any)
    #[arg(long, env = "ALLOW_ORIGIN", default_value = "*")]
    pub allow_origin: String,

    /// Base URL of the optimizer service
    #[arg(long, env = "QUANTUM_BASE_URL")]
    pub quantum_base_url: Option<String>,

    /// Bearer token for the optimizer service
    #[arg(long, env = "QUANTUM_API_KEY")]
    pub quantum_api_key: Option<String>,

    /// Timeout for optimize and rebalance calls
    #[arg(long, env = "REQUEST_TIMEOUT_MS", default_value = "60000")]
    pub request_timeout_ms: u64,

    /// Timeout for the upstream health probe
    #[arg(long, env = "HEALTH_TIMEOUT_MS", default_value = "5000")]
    pub health_timeout_ms: u64,

    /// Serve synthesized data instead of calling the optimizer
    #[arg(
        long,
        env = "MOCK_MODE",
        default_value = "false",
        action = clap::ArgAction::Set,
        value_parser = parse_flag
    )]
    pub mock_mode: bool,

    /// Upstream-shaped optimize payload served in mock mode
    #[arg(long, env = "MOCK_OPTIMIZE_PAYLOAD")]
    pub mock_optimize_payload: Option<PathBuf>,

    /// Artificial delay on demo analytics endpoints
    #[arg(long, env = "DEMO_LATENCY_MS", default_value = "0")]
    pub demo_latency_ms: u64,
}

fn parse_flag(raw: &str) -> Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Ok(true),
        "" | "0" | "false" | "off" | "no" => Ok(false),
        other => Err(format!("expected a boolean, got `{other}`")),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub port: u16,
    pub allow_origin: String,
    /// No trailing slash; `None` when unset or blank.
    pub quantum_base_url: Option<String>,
    pub quantum_api_key: Option<String>,
    pub request_timeout: Duration,
    pub health_timeout: Duration,
    pub mock_mode: bool,
    pub mock_optimize_payload: Option<PathBuf>,
    pub demo_latency: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            allow_origin: "*".to_string(),
            quantum_base_url: None,
            quantum_api_key: None,
            request_timeout: Duration::from_millis(60_000),
            health_timeout: Duration::from_millis(5_000),
            mock_mode: false,
            mock_optimize_payload: None,
            demo_latency: Duration::ZERO,
        }
    }
}

impl From<Cli> for AppConfig {
    fn from(cli: Cli) -> Self {
        Self {
            port: cli.port,
            allow_origin: cli.allow_origin,
            quantum_base_url: cli
                .quantum_base_url
                .map(|u| u.trim().trim_end_matches('/').to_string())
                .filter(|u| !u.is_empty()),
            quantum_api_key: cli.quantum_api_key.filter(|k| !k.trim().is_empty()),
            request_timeout: Duration::from_millis(cli.request_timeout_ms),
            health_timeout: Duration::from_millis(cli.health_timeout_ms),
            mock_mode: cli.mock_mode,
            mock_optimize_payload: cli.mock_optimize_payload,
            demo_latency: Duration::from_millis(cli.demo_latency_ms),
        }
    }
}

impl AppConfig {
    pub fn mode(&self) -> &'static str {
        if self.mock_mode {
            "mock"
        } else {
            "live"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> AppConfig {
        let argv = std::iter::once("qportfolio").chain(args.iter().copied());
        Cli::try_parse_from(argv).expect("valid args").into()
    }

    #[test]
    fn test_flag_spellings() {
        for raw in ["1", "true", "TRUE", "on", "Yes"] {
            assert_eq!(parse_flag(raw), Ok(true), "{raw}");
        }
        for raw in ["0", "false", "off", "no", ""] {
            assert_eq!(parse_flag(raw), Ok(false), "{raw}");
        }
        assert!(parse_flag("maybe").is_err());
    }

    #[test]
    fn test_base_url_is_trimmed() {
        let cfg = parse(&["--quantum-base-url", "http://optimizer:8000///"]);
        assert_eq!(cfg.quantum_base_url.as_deref(), Some("http://optimizer:8000"));

        let blank = parse(&["--quantum-base-url", "  "]);
        assert_eq!(blank.quantum_base_url, None);
    }

    #[test]
    fn test_timeouts_and_mode() {
        let cfg = parse(&[
            "--request-timeout-ms",
            "1500",
            "--mock-mode",
            "yes",
            "--demo-latency-ms",
            "250",
        ]);
        assert_eq!(cfg.request_timeout, Duration::from_millis(1500));
        assert_eq!(cfg.health_timeout, Duration::from_millis(5000));
        assert_eq!(cfg.demo_latency, Duration::from_millis(250));
        assert!(cfg.mock_mode);
        assert_eq!(cfg.mode(), "mock");
    }
}

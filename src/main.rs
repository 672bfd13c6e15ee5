#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Amunchain token ledger entrypoint.
//! Runs one ledger operation per process against the local sled ledger.
//!
//! Usage: `amun-token <Operation> [args...]`
//!
//! Environment:
//! - `AMUN_TOKEN_CONFIG`   optional TOML config path
//! - `AMUN_DATA_DIR`       overrides `store.data_dir`
//! - `AMUN_CALLER_ID_FILE` file holding the caller identity bytes (e.g. an MSP identity / PEM cert)
//! - `AMUN_CALLER_ID_HEX`  caller identity bytes as hex (used when no file is given)
//! - `AMUN_LOG_FORMAT`     `compact` or `json`, overrides `log.format`
//! - `AMUN_METRICS_DUMP`   if `1`, print Prometheus text exposition to stderr on exit

use std::sync::Arc;

use amun_token::core::config::{LedgerConfig, LogFormat};
use amun_token::core::identity::HostIdentity;
use amun_token::core::ledger::TokenEngine;
use amun_token::core::state::PersistentState;
use amun_token::monitoring::{logging::init_logging, metrics::Metrics};
use anyhow::{bail, Context, Result};
use tracing::{info, warn};

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn load_config() -> Result<LedgerConfig> {
    let mut cfg = match env_opt("AMUN_TOKEN_CONFIG") {
        Some(path) => LedgerConfig::load(&path).with_context(|| format!("config {path}"))?,
        None => LedgerConfig::default(),
    };
    if let Some(dir) = env_opt("AMUN_DATA_DIR") {
        cfg.store.data_dir = dir;
    }
    if let Some(fmt) = env_opt("AMUN_LOG_FORMAT") {
        cfg.log.format = match fmt.as_str() {
            "json" => LogFormat::Json,
            "compact" => LogFormat::Compact,
            other => bail!("unknown AMUN_LOG_FORMAT {other:?}"),
        };
    }
    cfg.validate()?;
    Ok(cfg)
}

/// Caller identity as supplied by the invoking environment.
fn caller_identity() -> Result<HostIdentity> {
    if let Some(path) = env_opt("AMUN_CALLER_ID_FILE") {
        let bytes = std::fs::read(&path).with_context(|| format!("caller identity {path}"))?;
        return Ok(HostIdentity::new(bytes));
    }
    if let Some(h) = env_opt("AMUN_CALLER_ID_HEX") {
        let bytes = hex::decode(h.trim()).context("AMUN_CALLER_ID_HEX is not hex")?;
        return Ok(HostIdentity::new(bytes));
    }
    Ok(HostIdentity::unavailable())
}

fn main() -> Result<()> {
    let cfg = load_config()?;
    init_logging(cfg.log.format);

    let mut argv = std::env::args().skip(1);
    let Some(op) = argv.next() else {
        bail!("usage: amun-token <Operation> [args...]");
    };
    let args: Vec<String> = argv.collect();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        rustc = option_env!("VERGEN_RUSTC_SEMVER").unwrap_or("unknown"),
        built = option_env!("VERGEN_BUILD_TIMESTAMP").unwrap_or("unknown"),
        data_dir = %cfg.store.data_dir,
        "amun-token starting"
    );

    let metrics = Arc::new(Metrics::new()?);
    let engine = TokenEngine::from_config(&cfg).with_metrics(metrics.clone());
    let mut state = PersistentState::open(&cfg.store.data_dir)
        .with_context(|| format!("open ledger at {}", cfg.store.data_dir))?;
    let caller = caller_identity()?;

    let outcome = engine.invoke(&mut state, &caller, &op, args.as_slice());

    if env_opt("AMUN_METRICS_DUMP").as_deref() == Some("1") {
        match metrics.render() {
            Ok(text) => eprint!("{text}"),
            Err(e) => warn!(error = %e, "metrics render failed"),
        }
    }

    let resp = outcome?;
    if let Some(notice) = &resp.notice {
        info!(event = notice.name, payload = %notice.payload, "notice");
    }
    if let Some(payload) = resp.payload {
        println!("{payload}");
    }
    Ok(())
}

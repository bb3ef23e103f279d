//! Config parsing and profile/preset resolution.
//!
//! This crate is intentionally IO-free: it parses and resolves configuration provided as strings.

#![forbid(unsafe_code)]

mod model;
mod presets;
mod resolve;

pub use model::{EnforcerConfigV1, RuleConfig, SCHEMA_CONFIG_V1};
pub use resolve::{Overrides, ResolvedConfig};

/// Parse `enforcer.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<EnforcerConfigV1> {
    let cfg: EnforcerConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the effective config used by the engine (profile + overrides + per-rule config).
pub fn resolve_config(
    cfg: EnforcerConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}

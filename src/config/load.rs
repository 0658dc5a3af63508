// src/config/load.rs
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::AppConfig;

pub const ENV_CONFIG_PATH: &str = "DIGEST_CONFIG_PATH";
pub const DEFAULT_TOML_PATH: &str = "config/digest.toml";
pub const DEFAULT_JSON_PATH: &str = "config/digest.json";

/// Load, resolve "ENV" secrets and validate a config file. TOML or JSON,
/// picked by extension with a fallback to the other format.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading config from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let mut cfg = parse_config(&content, &ext)
        .with_context(|| format!("parsing config {}", path.display()))?;
    resolve_env_secrets(&mut cfg)?;
    cfg.validate()?;
    Ok(cfg)
}

/// Locate the config file:
/// 1) $DIGEST_CONFIG_PATH
/// 2) config/digest.toml
/// 3) config/digest.json
pub fn load_config_default() -> Result<AppConfig> {
    if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_config_from(&pb);
        }
        return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
    }
    let toml_p = PathBuf::from(DEFAULT_TOML_PATH);
    if toml_p.exists() {
        return load_config_from(&toml_p);
    }
    let json_p = PathBuf::from(DEFAULT_JSON_PATH);
    if json_p.exists() {
        return load_config_from(&json_p);
    }
    Err(anyhow!(
        "no config found (set {ENV_CONFIG_PATH} or create {DEFAULT_TOML_PATH})"
    ))
}

fn parse_config(s: &str, hint_ext: &str) -> Result<AppConfig> {
    if hint_ext == "json" {
        return serde_json::from_str(s).or_else(|json_err| {
            toml::from_str(s).map_err(|_| anyhow!(json_err))
        });
    }
    toml::from_str(s).or_else(|toml_err| serde_json::from_str(s).map_err(|_| anyhow!(toml_err)))
}

fn resolve_env_secrets(cfg: &mut AppConfig) -> Result<()> {
    resolve(&mut cfg.reddit.client_id, "REDDIT_CLIENT_ID")?;
    resolve(&mut cfg.reddit.client_secret, "REDDIT_CLIENT_SECRET")?;
    resolve(&mut cfg.mail.login, "SMTP_USER")?;
    resolve(&mut cfg.mail.password, "SMTP_PASS")?;
    Ok(())
}

fn resolve(field: &mut String, var: &str) -> Result<()> {
    if field.trim().eq_ignore_ascii_case("env") {
        *field = std::env::var(var).map_err(|_| anyhow!("Missing {var} env var"))?;
    }
    Ok(())
}

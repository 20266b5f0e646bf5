use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Global configuration loaded from `~/.config/vup/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VupConfig {
    /// Base URL of the vault service.
    pub endpoint: String,
    /// Part size used when `--chunk-size` is not given, in megabytes.
    pub default_chunk_size_mb: u64,
    /// Directory for resume dumps; the working directory when unset.
    #[serde(default)]
    pub dump_dir: Option<PathBuf>,
    /// Extra headers forwarded verbatim on every request (e.g. auth tokens
    /// injected by a local signing proxy).
    #[serde(default)]
    pub extra_headers: HashMap<String, String>,
}

impl Default for VupConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:7878".to_string(),
            default_chunk_size_mb: 128,
            dump_dir: None,
            extra_headers: HashMap::new(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("vup")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<VupConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = VupConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: VupConfig = toml::from_str(&data)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = VupConfig::default();
        assert_eq!(cfg.default_chunk_size_mb, 128);
        assert!(cfg.dump_dir.is_none());
        assert!(cfg.extra_headers.is_empty());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = VupConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: VupConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.endpoint, cfg.endpoint);
        assert_eq!(parsed.default_chunk_size_mb, cfg.default_chunk_size_mb);
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            endpoint = "https://vault.example.net"
            default_chunk_size_mb = 64
            dump_dir = "/var/lib/vup"

            [extra_headers]
            "x-auth-token" = "secret"
        "#;
        let cfg: VupConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.endpoint, "https://vault.example.net");
        assert_eq!(cfg.default_chunk_size_mb, 64);
        assert_eq!(cfg.dump_dir.as_deref(), Some(std::path::Path::new("/var/lib/vup")));
        assert_eq!(cfg.extra_headers.get("x-auth-token").map(String::as_str), Some("secret"));
    }
}

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{env_subst::substitute_env, schema::SayvaiConfig};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &["sayvai.toml", "sayvai.yaml", "sayvai.yml", "sayvai.json"];

/// Environment variables that override file values, applied after loading.
pub const ENV_CLIENT_ID: &str = "ZOHO_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "ZOHO_CLIENT_SECRET";
pub const ENV_AUTH_CODE: &str = "ZOHO_AUTH_CODE";
pub const ENV_REDIRECT_URI: &str = "ZOHO_REDIRECT_URI";
pub const ENV_SERVICE_ID: &str = "SERVICE_ID";
pub const ENV_STAFF_ID: &str = "STAFF_ID";

/// Load config from the given path (any supported format), then apply
/// environment overrides.
pub fn load_config(path: &Path) -> anyhow::Result<SayvaiConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let raw = substitute_env(&raw);
    let mut config = parse_config(&raw, path)?;
    apply_env_overrides(&mut config, |k| std::env::var(k).ok());
    Ok(config)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./sayvai.{toml,yaml,yml,json}` (project-local)
/// 2. `~/.config/sayvai/sayvai.{toml,yaml,yml,json}` (user-global)
///
/// Falls back to `SayvaiConfig::default()` plus environment overrides when no
/// file is found or the file fails to parse.
pub fn discover_and_load() -> SayvaiConfig {
    if let Some(path) = find_config_file() {
        debug!(path = %path.display(), "loading config");
        match load_config(&path) {
            Ok(cfg) => return cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            },
        }
    } else {
        debug!("no config file found, using defaults");
    }
    let mut config = SayvaiConfig::default();
    apply_env_overrides(&mut config, |k| std::env::var(k).ok());
    config
}

/// Overlay values from the environment. Empty values are ignored.
pub fn apply_env_overrides(config: &mut SayvaiConfig, lookup: impl Fn(&str) -> Option<String>) {
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
    let zoho = &mut config.zoho;

    if let Some(v) = get(ENV_CLIENT_ID) {
        zoho.client_id = Some(v);
    }
    if let Some(v) = get(ENV_CLIENT_SECRET) {
        zoho.client_secret = Some(v);
    }
    if let Some(v) = get(ENV_AUTH_CODE) {
        zoho.auth_code = Some(v);
    }
    if let Some(v) = get(ENV_REDIRECT_URI) {
        zoho.redirect_uri = v;
    }
    if let Some(v) = get(ENV_SERVICE_ID) {
        zoho.service_id = Some(v);
    }
    if let Some(v) = get(ENV_STAFF_ID) {
        zoho.staff_id = Some(v);
    }
}

fn find_config_file() -> Option<PathBuf> {
    // Project-local
    for name in CONFIG_FILENAMES {
        let p = PathBuf::from(name);
        if p.exists() {
            return Some(p);
        }
    }

    let dir = config_dir()?;
    CONFIG_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.exists())
}

/// Returns the config directory: `~/.config/sayvai/` on all platforms.
pub fn config_dir() -> Option<PathBuf> {
    home_dir().map(|h| h.join(".config").join("sayvai"))
}

fn home_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf())
}

fn parse_config(raw: &str, path: &Path) -> anyhow::Result<SayvaiConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        _ => anyhow::bail!("unsupported config format: .{ext}"),
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, std::collections::HashMap};

    #[test]
    fn parses_toml() {
        let raw = r#"
            [zoho]
            client_id = "1000.ABC"
            service_id = "svc-1"

            [http]
            timeout_secs = 5
        "#;
        let cfg = parse_config(raw, Path::new("sayvai.toml")).unwrap();
        assert_eq!(cfg.zoho.client_id.as_deref(), Some("1000.ABC"));
        assert_eq!(cfg.zoho.service_id.as_deref(), Some("svc-1"));
        assert_eq!(cfg.http.timeout_secs, 5);
        // Unspecified fields keep their defaults.
        assert_eq!(cfg.zoho.redirect_uri, crate::schema::DEFAULT_REDIRECT_URI);
    }

    #[test]
    fn parses_yaml_and_json() {
        let yaml = "zoho:\n  staff_id: staff-9\n";
        let cfg = parse_config(yaml, Path::new("sayvai.yaml")).unwrap();
        assert_eq!(cfg.zoho.staff_id.as_deref(), Some("staff-9"));

        let json = r#"{"zoho": {"client_secret": "s3cr3t"}}"#;
        let cfg = parse_config(json, Path::new("sayvai.json")).unwrap();
        assert_eq!(cfg.zoho.client_secret.as_deref(), Some("s3cr3t"));
    }

    #[test]
    fn rejects_unknown_extension() {
        let err = parse_config("", Path::new("sayvai.ini")).unwrap_err();
        assert!(err.to_string().contains("unsupported config format"));
    }

    #[test]
    fn load_config_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sayvai.toml");
        std::fs::write(&path, "[zoho]\nbookings_url = \"http://localhost:9/json\"\n").unwrap();
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.zoho.bookings_url, "http://localhost:9/json");
    }

    #[test]
    fn load_config_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(&dir.path().join("nope.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_CLIENT_ID, "env-client"),
            (ENV_AUTH_CODE, "1000.code"),
            (ENV_STAFF_ID, "  "),
        ]);
        let mut cfg = SayvaiConfig::default();
        cfg.zoho.client_id = Some("file-client".into());
        cfg.zoho.staff_id = Some("file-staff".into());

        apply_env_overrides(&mut cfg, |k| env.get(k).map(|v| v.to_string()));

        assert_eq!(cfg.zoho.client_id.as_deref(), Some("env-client"));
        assert_eq!(cfg.zoho.auth_code.as_deref(), Some("1000.code"));
        // Blank values do not clobber configured ones.
        assert_eq!(cfg.zoho.staff_id.as_deref(), Some("file-staff"));
    }
}

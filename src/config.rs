use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;
use tracing::warn;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub uploads: UploadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Route the phone posts to.
    pub path: String,
    /// Honour `X-Forwarded-Proto` when rebuilding the signed URL behind a proxy.
    pub trust_forwarded_proto: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8092,
            path: "/kalsms".to_string(),
            trust_forwarded_proto: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Shared secret configured on the phone.
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub dir: String,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: "~/.kalsms/uploads".to_string(),
        }
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

pub fn resolve_config_path() -> PathBuf {
    config_path_from(env::var("KALSMS_CONFIG").ok().as_deref())
}

/// Config location for a given `KALSMS_CONFIG` value.
pub fn config_path_from(configured: Option<&str>) -> PathBuf {
    configured
        .filter(|path| !path.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| expand_tilde("~/.kalsms/kalsms.json"))
}

pub fn load_config() -> Config {
    let config_path = resolve_config_path();
    let mut cfg = Config::default();

    if config_path.exists() {
        match fs::read_to_string(&config_path) {
            Ok(raw) => match serde_json::from_str::<Config>(&raw) {
                Ok(file_cfg) => cfg = file_cfg,
                Err(err) => warn!("ignoring invalid config {}: {err}", config_path.display()),
            },
            Err(err) => warn!("cannot read config {}: {err}", config_path.display()),
        }
    }

    apply_env_overrides(&mut cfg);
    cfg
}

fn apply_env_overrides(cfg: &mut Config) {
    if let Ok(password) = env::var("KALSMS_PASSWORD") {
        if !password.trim().is_empty() {
            cfg.auth.password = Some(password);
        }
    }

    if let Ok(host) = env::var("KALSMS_HOST") {
        if !host.trim().is_empty() {
            cfg.server.host = host;
        }
    }

    if let Ok(port) = env::var("KALSMS_PORT") {
        match port.trim().parse() {
            Ok(port) => cfg.server.port = port,
            Err(_) => warn!("ignoring invalid KALSMS_PORT: {port}"),
        }
    }

    if let Ok(dir) = env::var("KALSMS_UPLOAD_DIR") {
        if !dir.trim().is_empty() {
            cfg.uploads.dir = dir;
        }
    }
}

pub fn resolve_upload_dir(cfg: &Config) -> PathBuf {
    expand_tilde(&cfg.uploads.dir)
}

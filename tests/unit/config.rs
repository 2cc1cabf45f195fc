use kalsms::config::{config_path_from, expand_tilde, resolve_upload_dir, Config};
use std::path::PathBuf;

#[test]
fn test_default_config() {
    let cfg = Config::default();
    assert_eq!(cfg.server.host, "0.0.0.0");
    assert_eq!(cfg.server.port, 8092);
    assert_eq!(cfg.server.path, "/kalsms");
    assert!(!cfg.server.trust_forwarded_proto);
    assert!(cfg.auth.password.is_none());
    assert_eq!(cfg.uploads.dir, "~/.kalsms/uploads");
}

#[test]
fn test_config_from_json() {
    let raw = r#"{
        "server": {"host": "127.0.0.1", "port": 9000, "path": "/sms", "trust_forwarded_proto": true},
        "auth": {"password": "s3cret"},
        "uploads": {"dir": "/srv/uploads"}
    }"#;
    let cfg: Config = serde_json::from_str(raw).unwrap();
    assert_eq!(cfg.server.port, 9000);
    assert_eq!(cfg.server.path, "/sms");
    assert!(cfg.server.trust_forwarded_proto);
    assert_eq!(cfg.auth.password.as_deref(), Some("s3cret"));
    assert_eq!(resolve_upload_dir(&cfg).to_string_lossy(), "/srv/uploads");
}

#[test]
fn test_expand_tilde() {
    let expanded = expand_tilde("~/test/path");
    assert!(expanded.to_string_lossy().contains("test/path"));
}

#[test]
fn test_expand_tilde_no_tilde() {
    let expanded = expand_tilde("/absolute/path");
    assert_eq!(expanded.to_string_lossy(), "/absolute/path");
}

#[test]
fn test_config_path_default() {
    let path = config_path_from(None);
    assert!(path.to_string_lossy().contains(".kalsms"));
    assert!(path.to_string_lossy().contains("kalsms.json"));
}

#[test]
fn test_config_path_override() {
    let path = config_path_from(Some("/etc/kalsms/custom.json"));
    assert_eq!(path, PathBuf::from("/etc/kalsms/custom.json"));
}

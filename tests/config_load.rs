// tests/config_load.rs
use reddit_digest::config::load::ENV_CONFIG_PATH;
use reddit_digest::config::{load_config_default, load_config_from};
use std::{env, fs};

const TOML_CFG: &str = r#"
error_log = "logs/errors.txt"

[reddit]
client_id = "id"
client_secret = "ENV"
user_agent = "digest/0.1 by tester"
limit = 250

[mail]
login = "bot@example.com"
password = "ENV"
from = "bot@example.com"
to = "me@example.com"

[scan]
skip_failed_boards = true

[boards]
rust = ["Tokio", "async/await"]
gadgets = ["Gizmo!"]
"#;

#[serial_test::serial]
#[test]
fn toml_file_with_env_secrets() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("digest.toml");
    fs::write(&p, TOML_CFG).unwrap();

    env::set_var("REDDIT_CLIENT_SECRET", "from-env");
    env::set_var("SMTP_PASS", "hunter2");
    let cfg = load_config_from(&p).unwrap();
    env::remove_var("REDDIT_CLIENT_SECRET");
    env::remove_var("SMTP_PASS");

    assert_eq!(cfg.reddit.client_secret, "from-env");
    assert_eq!(cfg.mail.password, "hunter2");
    assert_eq!(cfg.reddit.limit, 250);
    assert!(cfg.scan.skip_failed_boards);
    assert_eq!(cfg.error_log, std::path::PathBuf::from("logs/errors.txt"));
    // BTreeMap: boards come back sorted.
    let names: Vec<_> = cfg.boards.keys().cloned().collect();
    assert_eq!(names, vec!["gadgets".to_string(), "rust".to_string()]);
}

#[serial_test::serial]
#[test]
fn missing_env_secret_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("digest.toml");
    fs::write(&p, TOML_CFG).unwrap();

    env::remove_var("REDDIT_CLIENT_SECRET");
    env::set_var("SMTP_PASS", "x");
    let err = load_config_from(&p).unwrap_err();
    env::remove_var("SMTP_PASS");
    assert!(err.to_string().contains("REDDIT_CLIENT_SECRET"));
}

#[serial_test::serial]
#[test]
fn default_uses_env_then_fallbacks() {
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();
    env::remove_var(ENV_CONFIG_PATH);
    env::set_var("REDDIT_CLIENT_SECRET", "s");
    env::set_var("SMTP_PASS", "p");

    // 1) Nothing on disk
    assert!(load_config_default().is_err());

    // 2) JSON fallback in ./config/
    let cfg_dir = tmp.path().join("config");
    fs::create_dir_all(&cfg_dir).unwrap();
    fs::write(
        cfg_dir.join("digest.json"),
        r#"{
            "reddit": {"client_id": "json-id", "client_secret": "s", "user_agent": "ua"},
            "mail": {"login": "l", "password": "p", "from": "a@b.io", "to": "c@d.io"},
            "boards": {"news": ["x"]}
        }"#,
    )
    .unwrap();
    assert_eq!(load_config_default().unwrap().reddit.client_id, "json-id");

    // 3) TOML wins over JSON
    fs::write(cfg_dir.join("digest.toml"), TOML_CFG).unwrap();
    assert_eq!(load_config_default().unwrap().reddit.client_id, "id");

    // 4) Env path wins over both
    let p_env = tmp.path().join("custom.toml");
    fs::write(&p_env, TOML_CFG.replace("client_id = \"id\"", "client_id = \"env-id\"")).unwrap();
    env::set_var(ENV_CONFIG_PATH, p_env.display().to_string());
    assert_eq!(load_config_default().unwrap().reddit.client_id, "env-id");

    // 5) Env path pointing nowhere
    env::set_var(ENV_CONFIG_PATH, tmp.path().join("missing.toml").display().to_string());
    assert!(load_config_default().is_err());

    env::remove_var(ENV_CONFIG_PATH);
    env::remove_var("REDDIT_CLIENT_SECRET");
    env::remove_var("SMTP_PASS");
    env::set_current_dir(&old).unwrap();
}

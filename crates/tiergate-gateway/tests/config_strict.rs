#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use tiergate_gateway::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
bot:
  prefx: "?" # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.code().as_str(), "BAD_REQUEST");
}

#[test]
fn ok_minimal_config() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.bot.prefix, "!");
    assert_eq!(cfg.bot.response_time_ms, 4000);
    assert!(!cfg.features.enable_prefix_command);
    assert!(cfg.bot.prefix_file.is_none());
}

#[test]
fn full_config() {
    let ok = r#"
version: 1
bot:
  listen: "127.0.0.1:9000"
  prefix: "tg!"
  config_dir: "/var/lib/tiergate"
  response_time_ms: 1500
  help_link: "https://example.org/help"
  prefix_file: "/var/lib/tiergate/prefix.json"
features:
  enable_prefix_command: true
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.bot.listen, "127.0.0.1:9000");
    assert_eq!(cfg.bot.prefix, "tg!");
    assert_eq!(cfg.bot.config_dir, "/var/lib/tiergate");
    assert_eq!(cfg.bot.response_time_ms, 1500);
    assert_eq!(cfg.bot.prefix_file.as_deref(), Some("/var/lib/tiergate/prefix.json"));
    assert!(cfg.features.enable_prefix_command);
}

#[test]
fn rejects_unsupported_version() {
    let err = config::load_from_str("version: 2\n").expect_err("must fail");
    assert_eq!(err.code().as_str(), "UNSUPPORTED_VERSION");
}

#[test]
fn rejects_bad_prefix() {
    for prefix in ["\"\"", "\"a b\"", "\"toolong\""] {
        let yaml = format!("version: 1\nbot:\n  prefix: {prefix}\n");
        let err = config::load_from_str(&yaml).expect_err("must fail");
        assert_eq!(err.code().as_str(), "BAD_REQUEST", "prefix={prefix}");
    }
}

#[test]
fn rejects_out_of_range_reply_lifetime() {
    for ms in [0u64, 499, 60001] {
        let yaml = format!("version: 1\nbot:\n  response_time_ms: {ms}\n");
        let err = config::load_from_str(&yaml).expect_err("must fail");
        assert_eq!(err.code().as_str(), "BAD_REQUEST", "ms={ms}");
    }
}

#[test]
fn rejects_blank_prefix_file() {
    let err = config::load_from_str("version: 1\nbot:\n  prefix_file: \"  \"\n").expect_err("must fail");
    assert_eq!(err.code().as_str(), "BAD_REQUEST");
}

//! Tests for the routemine configuration system.

use std::sync::Mutex;

use routemine_core::config::{parse_drop_steps, parse_edit_distance, CliOverrides, RouteMineConfig};
use routemine_core::errors::ConfigError;

/// Global mutex to serialize tests that modify environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn tempdir() -> tempfile::TempDir {
    tempfile::TempDir::new().unwrap()
}

/// Clear all ROUTEMINE_ env vars to prevent cross-test contamination.
fn clear_routemine_env_vars() {
    for key in [
        "ROUTEMINE_DROP_STEPS",
        "ROUTEMINE_REMOVE_IMMEDIATE_REPEATS",
        "ROUTEMINE_CLUSTER",
        "ROUTEMINE_MAX_EDIT_DISTANCE",
        "ROUTEMINE_OUTPUT_PREFIX",
    ] {
        std::env::remove_var(key);
    }
}

/// Point the user-config lookup at an empty directory.
fn isolate_home(home: &tempfile::TempDir) {
    std::env::set_var("HOME", home.path());
}

#[test]
fn test_layered_resolution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_routemine_env_vars();
    let home = tempdir();
    isolate_home(&home);

    let dir = tempdir();
    std::fs::write(
        dir.path().join("routemine.toml"),
        r#"
[normalization]
drop_steps = ["CMM"]

[clustering]
enabled = true
max_edit_distance = 3
"#,
    )
    .unwrap();

    std::env::set_var("ROUTEMINE_MAX_EDIT_DISTANCE", "2");
    std::env::set_var("ROUTEMINE_DROP_STEPS", "et");

    let cli = CliOverrides {
        drop_steps: Some("deb, cmm".to_string()),
        ..Default::default()
    };

    let config = RouteMineConfig::load(dir.path(), Some(&cli)).unwrap();

    // CLI beats env and project for drop steps
    assert_eq!(config.normalization.drop_steps, vec!["DEB", "CMM"]);
    // Env beats project for the threshold
    assert_eq!(config.clustering.max_edit_distance, Some(2));
    // Project value survives where nothing overrides it
    assert_eq!(config.clustering.enabled, Some(true));
    assert_eq!(config.clustering_threshold(), Some(2));

    clear_routemine_env_vars();
}

#[test]
fn test_load_missing_files_fallback() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_routemine_env_vars();
    let home = tempdir();
    isolate_home(&home);

    let dir = tempdir();
    let config = RouteMineConfig::load(dir.path(), None).unwrap();

    assert_eq!(config, RouteMineConfig::default());
    assert!(config.normalization.effective_strip_whitespace());
    assert!(config.normalization.effective_uppercase());
    assert!(config.normalization.effective_remove_immediate_repeats());
    assert!(!config.normalization.effective_remove_self_loops_anywhere());
    assert!(!config.clustering.effective_enabled());
    assert_eq!(config.clustering.effective_max_edit_distance(), 1);
    assert_eq!(config.clustering_threshold(), None);
    assert_eq!(config.library.effective_example_limit(), 8);
    assert_eq!(config.library.effective_summary_top(), 10);
    assert_eq!(config.library.effective_top_flows(), 6);
    assert_eq!(config.io.effective_output_prefix(), "routing_patterns");
}

#[test]
fn test_user_config_is_lowest_file_layer() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_routemine_env_vars();
    let home = tempdir();
    isolate_home(&home);

    let user_dir = home.path().join(".routemine");
    std::fs::create_dir_all(&user_dir).unwrap();
    std::fs::write(
        user_dir.join("config.toml"),
        r#"
[library]
example_limit = 4
summary_top = 5
"#,
    )
    .unwrap();

    let dir = tempdir();
    std::fs::write(
        dir.path().join("routemine.toml"),
        r#"
[library]
summary_top = 20
"#,
    )
    .unwrap();

    let config = RouteMineConfig::load(dir.path(), None).unwrap();
    assert_eq!(config.library.effective_example_limit(), 4);
    assert_eq!(config.library.effective_summary_top(), 20);
}

#[test]
fn test_invalid_toml_syntax() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_routemine_env_vars();
    let home = tempdir();
    isolate_home(&home);

    let dir = tempdir();
    std::fs::write(dir.path().join("routemine.toml"), "this is not valid toml {{{{").unwrap();

    match RouteMineConfig::load(dir.path(), None).unwrap_err() {
        ConfigError::ParseError { .. } => {}
        other => panic!("Expected ParseError, got: {:?}", other),
    }
}

#[test]
fn test_unknown_option_rejected() {
    let err = RouteMineConfig::from_toml(
        r#"
[normalization]
remove_repeats = true
"#,
    )
    .unwrap_err();
    match err {
        ConfigError::ParseError { message, .. } => assert!(message.contains("remove_repeats")),
        other => panic!("Expected ParseError, got: {:?}", other),
    }

    assert!(RouteMineConfig::from_toml("[sankey]\ntop = 3\n").is_err());
}

#[test]
fn test_negative_threshold_in_file_rejected() {
    let err = RouteMineConfig::from_toml(
        r#"
[clustering]
max_edit_distance = -1
"#,
    )
    .unwrap_err();
    match err {
        ConfigError::InvalidValue { field, value, .. } => {
            assert_eq!(field, "clustering.max_edit_distance");
            assert_eq!(value, "-1");
        }
        other => panic!("Expected InvalidValue, got: {:?}", other),
    }
}

#[test]
fn test_non_integer_threshold_from_env_rejected() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_routemine_env_vars();
    let home = tempdir();
    isolate_home(&home);

    std::env::set_var("ROUTEMINE_MAX_EDIT_DISTANCE", "one");
    let dir = tempdir();
    let err = RouteMineConfig::load(dir.path(), None).unwrap_err();
    assert!(err.to_string().contains("'one'"));

    clear_routemine_env_vars();
}

#[test]
fn test_cli_flags_applied() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_routemine_env_vars();
    let home = tempdir();
    isolate_home(&home);

    let cli = CliOverrides {
        input_path: Some("routings.xlsx".into()),
        output_prefix: Some("run1".to_string()),
        no_immediate_repeat_removal: true,
        cluster: true,
        max_edit_distance: Some("0".to_string()),
        ..Default::default()
    };
    let dir = tempdir();
    let config = RouteMineConfig::load(dir.path(), Some(&cli)).unwrap();

    assert_eq!(config.io.effective_output_prefix(), "run1");
    assert_eq!(config.io.input_path.as_deref(), Some(std::path::Path::new("routings.xlsx")));
    assert!(!config.normalization.effective_remove_immediate_repeats());
    assert_eq!(config.clustering_threshold(), Some(0));
}

#[test]
fn test_cli_negative_threshold_rejected() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_routemine_env_vars();
    let home = tempdir();
    isolate_home(&home);

    let cli = CliOverrides {
        max_edit_distance: Some("-2".to_string()),
        ..Default::default()
    };
    let dir = tempdir();
    match RouteMineConfig::load(dir.path(), Some(&cli)).unwrap_err() {
        ConfigError::InvalidValue { value, .. } => assert_eq!(value, "-2"),
        other => panic!("Expected InvalidValue, got: {:?}", other),
    }
}

#[test]
fn test_mapping_cycle_rejected_at_load() {
    let err = RouteMineConfig::from_toml(
        r#"
[normalization.map_codes]
TM = "MILL"
MILL = "TM"
"#,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::ValidationFailed { .. }));
}

#[test]
fn test_to_toml_round_trip() {
    let config = RouteMineConfig::from_toml(
        r#"
[normalization]
uppercase = false
drop_steps = ["CMM", "ET"]

[normalization.map_codes]
TM1 = "TM"

[clustering]
enabled = true
max_edit_distance = 2

[io]
output_prefix = "weekly"
"#,
    )
    .unwrap();

    let rendered = config.to_toml().unwrap();
    let reparsed = RouteMineConfig::from_toml(&rendered).unwrap();
    assert_eq!(config, reparsed);
}

#[test]
fn test_normalization_config_from_merged_options() {
    let config = RouteMineConfig::from_toml(
        r#"
[normalization]
drop_steps = [" cmm "]

[normalization.map_codes]
tm1 = "tm"
"#,
    )
    .unwrap();
    let normalization = config.normalization_config().unwrap();
    assert!(normalization.is_dropped("CMM"));
    assert_eq!(normalization.canonical_step("tm1"), "TM");
}

#[test]
fn test_parse_helpers() {
    assert_eq!(parse_drop_steps(" cmm, ,Et,"), vec!["CMM", "ET"]);
    assert!(parse_drop_steps("").is_empty());

    assert_eq!(parse_edit_distance("3").unwrap(), 3);
    assert_eq!(parse_edit_distance(" 0 ").unwrap(), 0);
    assert!(parse_edit_distance("-1").is_err());
    assert!(parse_edit_distance("1.5").is_err());
    assert!(parse_edit_distance("").is_err());
}

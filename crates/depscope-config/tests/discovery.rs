//! Tests for config discovery and layered loading

use depscope_config::{ConfigDiscovery, ConfigError, ConfigLoader, ConfigOverrides, validate_fs};
use depscope_graph::test_utils::create_test_project;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn loader(dir: &TempDir) -> ConfigLoader {
    ConfigLoader::new(dir.path()).without_env()
}

#[test]
fn discovers_depscope_toml() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("depscope.toml"),
        r#"
entry = "src/main.js"
external = ["vue", "axios"]
max_concurrency = 8

[aliases]
"@views" = "src/views"
"#,
    )
    .unwrap();

    let found = ConfigDiscovery::new(dir.path()).find().unwrap();
    assert_eq!(found.file_name().unwrap(), "depscope.toml");

    let config = loader(&dir).load(&ConfigOverrides::default()).unwrap();
    assert_eq!(config.entry, Some(PathBuf::from("src/main.js")));
    assert_eq!(config.external, vec!["vue", "axios"]);
    assert_eq!(config.max_concurrency, 8);
    assert_eq!(config.aliases["@views"], PathBuf::from("src/views"));
    assert_eq!(config.marker, "@Description");
}

#[test]
fn discovers_package_json() {
    let dir = create_test_project(&[(
        "package.json",
        r#"{
  "name": "shop",
  "depscope": {
    "entry": "src/main.ts",
    "followReexports": true,
    "aliases": { "@": "src" }
  }
}"#,
    )]);

    let config = loader(&dir).load(&ConfigOverrides::default()).unwrap();
    assert_eq!(config.entry, Some(PathBuf::from("src/main.ts")));
    assert!(config.follow_reexports);
    assert_eq!(config.aliases["@"], PathBuf::from("src"));
}

#[test]
fn camel_case_keys_merge_with_flags() {
    let dir = create_test_project(&[(
        "package.json",
        r#"{"depscope":{"entry":"src/main.js","maxConcurrency":4,"alias":{"@views":"src/views"}}}"#,
    )]);

    let overrides = ConfigOverrides {
        max_concurrency: Some(2),
        aliases: [("@api".to_string(), PathBuf::from("src/api"))]
            .into_iter()
            .collect(),
        ..ConfigOverrides::default()
    };
    let config = loader(&dir).load(&overrides).unwrap();
    assert_eq!(config.max_concurrency, 2);
    assert_eq!(config.aliases["@views"], PathBuf::from("src/views"));
    assert_eq!(config.aliases["@api"], PathBuf::from("src/api"));
}

#[test]
fn camel_case_keys_in_toml() {
    let dir = create_test_project(&[(
        "depscope.toml",
        "entry = \"src/main.js\"\nfollowDynamicImports = false\n\n[alias]\n\"@\" = \"src\"\n",
    )]);

    let config = loader(&dir).load(&ConfigOverrides::default()).unwrap();
    assert!(!config.follow_dynamic_imports);
    assert_eq!(config.aliases["@"], PathBuf::from("src"));
}

#[test]
fn toml_takes_precedence_over_package_json() {
    let dir = create_test_project(&[
        ("depscope.toml", "entry = \"from-toml.js\""),
        ("package.json", r#"{"depscope":{"entry":"from-pkg.js"}}"#),
    ]);

    let config = loader(&dir).load(&ConfigOverrides::default()).unwrap();
    assert_eq!(config.entry, Some(PathBuf::from("from-toml.js")));
}

#[test]
fn overrides_replace_scalars_and_extend_lists() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("depscope.toml"),
        r#"
entry = "src/main.js"
external = ["vue"]
marker = "@Description"
"#,
    )
    .unwrap();

    let overrides = ConfigOverrides {
        entry: Some(PathBuf::from("src/admin.js")),
        external: vec!["lodash".to_string()],
        marker: Some("@Module".to_string()),
        ..ConfigOverrides::default()
    };
    let config = loader(&dir).load(&overrides).unwrap();

    assert_eq!(config.entry, Some(PathBuf::from("src/admin.js")));
    assert_eq!(config.external, vec!["vue", "lodash"]);
    assert_eq!(config.marker, "@Module");
}

#[test]
fn explicit_file_must_exist() {
    let dir = TempDir::new().unwrap();
    let err = loader(&dir)
        .file("missing.toml")
        .load(&ConfigOverrides::default())
        .unwrap_err();
    assert!(matches!(err, ConfigError::NotFound(_)));
}

#[test]
fn explicit_file_outside_root() {
    let dir = TempDir::new().unwrap();
    let other = TempDir::new().unwrap();
    let path = other.path().join("custom.toml");
    fs::write(&path, "entry = \"index.js\"").unwrap();

    let config = loader(&dir)
        .file(&path)
        .load(&ConfigOverrides::default())
        .unwrap();
    assert_eq!(config.entry, Some(PathBuf::from("index.js")));
}

#[test]
fn invalid_toml_is_reported() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("depscope.toml"), "entry = ").unwrap();

    let err = loader(&dir).load(&ConfigOverrides::default()).unwrap_err();
    assert!(matches!(err, ConfigError::Load(_)));
}

#[test]
fn wrong_field_type_is_reported() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("depscope.toml"), "max_concurrency = \"lots\"").unwrap();

    let err = loader(&dir).load(&ConfigOverrides::default()).unwrap_err();
    assert!(err.to_string().contains("max_concurrency"));
}

#[test]
fn fs_validation_checks_entry() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("depscope.toml"), "entry = \"src/main.js\"").unwrap();
    let config = loader(&dir).load(&ConfigOverrides::default()).unwrap();

    let err = validate_fs(&config, dir.path()).unwrap_err();
    assert!(matches!(err, ConfigError::EntryNotFound(_)));

    fs::create_dir_all(dir.path().join("src")).unwrap();
    fs::write(dir.path().join("src/main.js"), "").unwrap();
    assert!(validate_fs(&config, dir.path()).is_ok());
}

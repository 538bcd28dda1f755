//! Integration tests for the full configure pipeline: parse, identity
//! filtering, path resolution, type-directed binding, and substitution.

use std::collections::HashMap;
use std::io::Write;

use confit::{record, BindOptions, ConfigError, Registry, Scalar, Session, Strictness};

record! {
    #[derive(Debug, Default)]
    pub struct DatabaseConfig {
        pub path: String,
        pub max_connections: u32,
    }
}

record! {
    #[derive(Debug, Default)]
    pub struct LoggingConfig {
        pub level: String,
        pub retention_days: u32,
    }
}

record! {
    #[derive(Debug, Default)]
    pub struct EndpointConfig {
        pub name: String,
        pub url: String,
        pub weight: f64,
    }
}

record! {
    #[derive(Debug, Default)]
    pub struct AppConfig {
        pub max_agents: usize,
        pub database: DatabaseConfig,
        pub logging: Option<LoggingConfig>,
        pub endpoints: Vec<EndpointConfig>,
        pub limits: HashMap<String, i64>,
        pub annotation: Scalar,
    }
}

const YAML: &str = r#"
app:
  max_agents: 12
  database:
    path: /var/lib/app.db
    max_connections: 5
  logging:
    level: debug
    retention_days: 14
  endpoints:
    - name: first
      url: http://a.example
      weight: 0.75
    - name: second
      url: http://b.example
      weight: 0.25
  limits:
    requests: 100
    connections: 10
  annotation: experimental
"#;

#[test]
fn test_binds_nested_records_sequences_and_maps() {
    let session = Session::from_yaml(YAML).unwrap();
    let mut config = AppConfig::default();
    session.configure("app", &mut config).unwrap();

    assert_eq!(config.max_agents, 12);
    assert_eq!(config.database.path, "/var/lib/app.db");
    assert_eq!(config.database.max_connections, 5);

    let logging = config.logging.expect("allocated on demand");
    assert_eq!(logging.level, "debug");
    assert_eq!(logging.retention_days, 14);

    assert_eq!(config.endpoints.len(), 2);
    assert_eq!(config.endpoints[0].name, "first");
    assert_eq!(config.endpoints[1].name, "second");

    assert_eq!(config.limits.len(), 2);
    assert_eq!(config.limits["requests"], 100);
    assert_eq!(config.limits["connections"], 10);

    assert_eq!(config.annotation, Scalar::Str("experimental".to_string()));
}

#[test]
fn test_identity_selects_regional_alternative() {
    let yaml = r#"
app:
  "database[east]":
    path: /east/db
  "database[west]":
    path: /west/db
"#;
    let mut config = AppConfig::default();

    let east = Session::from_yaml(yaml).unwrap().with_identity("east");
    east.configure("app", &mut config).unwrap();
    assert_eq!(config.database.path, "/east/db");

    let west = Session::from_yaml(yaml).unwrap().with_identity("west");
    west.configure("app", &mut config).unwrap();
    assert_eq!(config.database.path, "/west/db");
}

#[test]
fn test_value_substitution_with_overridden_source() {
    let mut hostname_file = tempfile::NamedTempFile::new().unwrap();
    writeln!(hostname_file, "app.public.example").unwrap();
    hostname_file.flush().unwrap();

    let yaml = "app:\n  endpoints:\n    - url: \"https://$public_hostname/v1\"\n";
    let session = Session::from_yaml(yaml).unwrap().with_options(BindOptions {
        public_hostname_file: hostname_file.path().to_path_buf(),
        ..BindOptions::default()
    });

    let mut config = AppConfig::default();
    session.configure("app", &mut config).unwrap();
    assert_eq!(config.endpoints[0].url, "https://app.public.example/v1");
}

#[test]
fn test_hostname_key_substitution_in_maps() {
    let yaml = "app:\n  limits:\n    \"per_node_$hostname\": 3\n";
    let session = Session::from_yaml(yaml).unwrap();

    let mut first = AppConfig::default();
    session.configure("app", &mut first).unwrap();
    let mut second = AppConfig::default();
    session.configure("app", &mut second).unwrap();

    assert_eq!(first.limits.len(), 1);
    let key = first.limits.keys().next().unwrap();
    assert!(key.starts_with("per_node_"));
    assert!(!key.contains("$hostname"));
    assert_eq!(
        first.limits.keys().collect::<Vec<_>>(),
        second.limits.keys().collect::<Vec<_>>(),
        "key substitution is deterministic across calls"
    );
}

#[test]
fn test_type_mismatch_aborts_and_names_the_path() {
    let yaml = "app:\n  database:\n    max_connections: many\n";
    let session = Session::from_yaml(yaml).unwrap();
    let mut config = AppConfig::default();
    let err = session.configure("app", &mut config).unwrap_err();
    match err {
        ConfigError::TypeMismatch { path, found, .. } => {
            assert_eq!(path, "app.database.max_connections");
            assert_eq!(found, "string");
        }
        other => panic!("expected TypeMismatch, got {other}"),
    }
}

#[test]
fn test_unknown_fields_reported_in_batch_mode() {
    let yaml = "app:\n  max_agents: 1\n  stray: 2\n  database:\n    also_stray: 3\n";
    let session = Session::from_yaml(yaml).unwrap().with_options(BindOptions {
        strictness: Strictness::Batch,
        ..BindOptions::default()
    });
    let mut config = AppConfig::default();
    let err = session.configure("app", &mut config).unwrap_err();

    let ConfigError::Batch(diagnostics) = err else {
        panic!("expected batch error");
    };
    assert_eq!(diagnostics.len(), 2);
    assert!(diagnostics
        .iter()
        .all(|d| matches!(d, ConfigError::FieldNotFound { .. })));
    assert_eq!(config.max_agents, 1, "valid fields still bound");
}

#[test]
fn test_unknown_fields_skipped_when_lenient() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("confit=debug")
        .try_init();

    let yaml = "app:\n  max_agents: 3\n  stray: 2\n";
    let session = Session::from_yaml(yaml).unwrap();
    let mut config = AppConfig::default();
    session.configure("app", &mut config).unwrap();
    assert_eq!(config.max_agents, 3);
}

#[test]
fn test_registry_binds_independent_sections() {
    let yaml = "database:\n  path: /var/db\nlogging:\n  level: warn\n";
    let session = Session::from_yaml(yaml).unwrap();

    let mut database = DatabaseConfig::default();
    let mut logging = LoggingConfig::default();
    let mut registry = Registry::new();
    registry
        .register("database", &mut database)
        .register("logging", &mut logging);
    registry.configure_all(&session).unwrap();

    assert_eq!(database.path, "/var/db");
    assert_eq!(logging.level, "warn");
}

#[test]
fn test_rebinding_reinitializes_sequences() {
    let session = Session::from_yaml(YAML).unwrap();
    let mut config = AppConfig::default();
    session.configure("app", &mut config).unwrap();
    assert_eq!(config.endpoints.len(), 2);

    let shorter = Session::from_yaml("app:\n  endpoints:\n    - name: only\n").unwrap();
    shorter.configure("app", &mut config).unwrap();
    assert_eq!(config.endpoints.len(), 1);
    assert_eq!(config.endpoints[0].name, "only");
}

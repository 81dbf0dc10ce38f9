use std::io::Write;

use airenv::{
    AirEnvError, AssembleOptions, CancellationToken, MemorySecretBackend, PROJECT_ENV_VAR,
};
use serial_test::serial;

fn config_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn snapshot() -> Vec<(String, String)> {
    let mut vars: Vec<_> = std::env::vars().collect();
    vars.sort();
    vars
}

#[test]
#[serial]
fn missing_file_leaves_environment_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join(".air-env.toml");
    let before = snapshot();

    airenv::init_environment(missing.to_str().unwrap(), &CancellationToken::new()).unwrap();

    assert_eq!(snapshot(), before);
}

#[test]
#[serial]
fn decode_error_leaves_environment_untouched() {
    let file = config_file("project_id = \"proj1\"\n[env]\nAIRENV_IT_BROKEN = \n");
    let before = snapshot();

    let err = airenv::init_environment(file.path().to_str().unwrap(), &CancellationToken::new())
        .unwrap_err();

    assert!(matches!(err, AirEnvError::ConfigDecode { .. }));
    assert_eq!(snapshot(), before);
}

#[test]
#[serial]
fn plain_only_config_is_applied_without_secret_store() {
    let file = config_file(
        "project_id = \"proj1\"\n[env]\nAIRENV_IT_DATABASE = \"{project_id}-db\"\n",
    );

    airenv::init_environment(file.path().to_str().unwrap(), &CancellationToken::new()).unwrap();

    assert_eq!(std::env::var("AIRENV_IT_DATABASE").unwrap(), "proj1-db");
    assert_eq!(std::env::var(PROJECT_ENV_VAR).unwrap(), "proj1");
    unsafe {
        std::env::remove_var("AIRENV_IT_DATABASE");
        std::env::remove_var(PROJECT_ENV_VAR);
    }
}

#[test]
#[serial]
fn resolved_secrets_override_plain_values_when_applied() {
    let file = config_file(
        r#"
project_id = "proj1"
[env]
AIRENV_IT_MAPKEY = "plain"
[secret]
AIRENV_IT_MAPKEY = "map-secret"
AIRENV_IT_AUTH = "auth-token"
"#,
    );
    let backend = MemorySecretBackend::new()
        .with_secret("projects/proj1/secrets/auth-token/versions/latest", "s3cr3t")
        .with_secret("projects/proj1/secrets/map-secret/versions/latest", "secret");

    let env = airenv::resolve_environment(
        file.path().to_str().unwrap(),
        &backend,
        AssembleOptions {
            export_project_var: false,
            ..Default::default()
        },
        &CancellationToken::new(),
    )
    .unwrap()
    .unwrap();
    env.apply().unwrap();

    assert_eq!(std::env::var("AIRENV_IT_MAPKEY").unwrap(), "secret");
    assert_eq!(std::env::var("AIRENV_IT_AUTH").unwrap(), "s3cr3t");
    unsafe {
        std::env::remove_var("AIRENV_IT_MAPKEY");
        std::env::remove_var("AIRENV_IT_AUTH");
    }
}

#[test]
#[serial]
fn failed_secret_batch_applies_nothing() {
    let file = config_file(
        r#"
project_id = "proj1"
[env]
AIRENV_IT_PLAIN = "value"
[secret]
AIRENV_IT_A = "a"
AIRENV_IT_B = "b"
AIRENV_IT_C = "c"
"#,
    );
    let backend = MemorySecretBackend::new()
        .with_secret("projects/proj1/secrets/a/versions/latest", "1")
        .with_secret("projects/proj1/secrets/c/versions/latest", "3");
    let before = snapshot();

    let err = airenv::resolve_environment(
        file.path().to_str().unwrap(),
        &backend,
        AssembleOptions::default(),
        &CancellationToken::new(),
    )
    .unwrap_err();

    assert!(matches!(err, AirEnvError::SecretNotFound { .. }));
    assert_eq!(backend.accessed().len(), 2, "fetching stops at the first failure");
    assert_eq!(snapshot(), before);
}

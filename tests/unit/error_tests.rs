//! Unit tests for the shared error type.

use flashpoint_launcher::AppError;

#[test]
fn display_prefixes_the_domain() {
    assert_eq!(
        AppError::Config("bad value".into()).to_string(),
        "config: bad value"
    );
    assert_eq!(
        AppError::Catalog("query failed".into()).to_string(),
        "catalog: query failed"
    );
    assert_eq!(
        AppError::Playlist("bad json".into()).to_string(),
        "playlist: bad json"
    );
    assert_eq!(
        AppError::Launch("spawn failed".into()).to_string(),
        "launch: spawn failed"
    );
    assert_eq!(
        AppError::Probe("scan failed".into()).to_string(),
        "probe: scan failed"
    );
    assert_eq!(
        AppError::NotFound("no such game".into()).to_string(),
        "not found: no such game"
    );
    assert_eq!(AppError::Io("disk gone".into()).to_string(), "io: disk gone");
}

#[test]
fn io_errors_convert() {
    let err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let app: AppError = err.into();
    assert!(matches!(app, AppError::Io(_)));
}

#[test]
fn json_errors_convert_to_playlist() {
    let err = serde_json::from_str::<serde_json::Value>("{broken").unwrap_err();
    let app: AppError = err.into();
    assert!(matches!(app, AppError::Playlist(_)));
}

#[test]
fn toml_errors_convert_to_config() {
    let err = toml::from_str::<toml::Value>("not = = toml").unwrap_err();
    let app: AppError = err.into();
    assert!(matches!(app, AppError::Config(_)));
}

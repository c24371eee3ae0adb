//! Loading analysis settings from disk.

use std::fs;

use tempfile::TempDir;
use u_spc::config::SpcSettings;
use u_spc::spc::{FactorMode, Rule};
use u_spc::SpcError;

#[test]
fn load_settings_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("spc.toml");
    fs::write(
        &path,
        r#"
[analysis]
subgroup_size = 3
factor_mode = "by_subgroup_size"
target = 10.0

[rules]
rule7Enabled = false

[cpk]
excellent = 2.0
good = 1.5
acceptable = 1.2
"#,
    )
    .unwrap();

    let settings = SpcSettings::load(&path).unwrap();
    assert_eq!(settings.analysis.subgroup_size, 3);
    assert_eq!(settings.analysis.factor_mode, FactorMode::BySubgroupSize);
    assert_eq!(settings.analysis.target, Some(10.0));

    let calc = settings.calculator().unwrap();
    assert_eq!(calc.subgroup_size(), 3);
    assert!((calc.factors().a2 - 1.023).abs() < 1e-12);

    let detector = settings.detector();
    assert!(!detector.config().is_enabled(Rule::FifteenWithin1Sigma));
    assert!(detector.config().is_enabled(Rule::BeyondLimits));
}

#[test]
fn missing_file_reports_path() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("absent.toml");
    match SpcSettings::load(&path) {
        Err(SpcError::ConfigRead { path: p, .. }) => assert_eq!(p, path),
        other => panic!("expected ConfigRead, got {other:?}"),
    }
}

#[test]
fn invalid_file_is_rejected() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("bad.toml");
    fs::write(&path, "[analysis]\nsubgroup_size = \"five\"\n").unwrap();
    assert!(matches!(SpcSettings::load(&path), Err(SpcError::ConfigParse(_))));
}

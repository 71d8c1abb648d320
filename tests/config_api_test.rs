// ==========================================
// ConfigApi 集成测试
// ==========================================
// 测试目标: 配置更新校验、快照导出/导入
// ==========================================


use std::sync::Arc;

use portfolio_evm::api::{ApiError, ConfigApi};
use portfolio_evm::config::{config_keys, ConfigManager, HealthThresholds, ThresholdScheme};
use test_helpers::create_test_db;

fn setup() -> (tempfile::NamedTempFile, ConfigApi) {
    let (temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let manager = Arc::new(ConfigManager::new(&db_path).expect("Failed to create ConfigManager"));
    (temp_file, ConfigApi::new(manager))
}

#[test]
fn test_update_config_validates_values() {
    let (_temp_file, api) = setup();

    api.update_config(config_keys::HEALTH_THRESHOLD_SCHEME, "strict").unwrap();
    assert_eq!(
        api.get_config(config_keys::HEALTH_THRESHOLD_SCHEME).unwrap(),
        Some("strict".to_string())
    );

    for (key, value) in [
        (config_keys::RISK_TOTAL_CAP, "0"),
        (config_keys::SUMMARY_TOP_N, "-3"),
        (config_keys::DEFAULT_VARIANCE_PERIOD, "year"),
        (config_keys::HEALTH_THRESHOLD_SCHEME, "lenient"),
        ("unknown_key", "1"),
        ("  ", "1"),
    ] {
        assert!(
            matches!(api.update_config(key, value), Err(ApiError::InvalidInput(_))),
            "{} = {} should be rejected",
            key,
            value
        );
    }
}

#[tokio::test]
async fn test_dashboard_config_reflects_updates() {
    let (_temp_file, api) = setup();

    api.update_config(config_keys::HEALTH_THRESHOLD_SCHEME, "STRICT").unwrap();
    api.update_config(config_keys::SUMMARY_TOP_N, "3").unwrap();

    let config = api.get_dashboard_config().await.unwrap();
    assert_eq!(config.scheme, ThresholdScheme::Strict);
    assert_eq!(config.health_thresholds, HealthThresholds::strict());
    assert_eq!(config.summary_top_n, 3);
}

#[test]
fn test_custom_thresholds_via_api() {
    let (_temp_file, api) = setup();

    let mut broken = HealthThresholds::standard();
    broken.spi_penalties.reverse();
    assert!(matches!(
        api.set_custom_thresholds(&broken),
        Err(ApiError::InvalidInput(_))
    ));

    api.set_custom_thresholds(&HealthThresholds::strict()).unwrap();
    assert!(api.list_configs().unwrap().contains_key(config_keys::HEALTH_THRESHOLDS));
    assert!(api.reset_custom_thresholds().unwrap());
    assert!(!api.reset_custom_thresholds().unwrap());
}

#[test]
fn test_export_import_snapshot() {
    let (_src_file, source) = setup();
    let (_dst_file, target) = setup();

    source.update_config(config_keys::RISK_BUDGET_CAP, "4").unwrap();
    let snapshot = source.export_snapshot().unwrap();

    assert_eq!(target.import_snapshot(&snapshot).unwrap(), 1);
    assert_eq!(
        target.get_config(config_keys::RISK_BUDGET_CAP).unwrap(),
        Some("4".to_string())
    );
    assert!(matches!(
        target.import_snapshot("   "),
        Err(ApiError::InvalidInput(_))
    ));
}

#[test]
fn test_import_snapshot_rejects_invalid_values() {
    let (_temp_file, api) = setup();
    api.update_config(config_keys::RISK_TOTAL_CAP, "30").unwrap();

    let bad = r#"{"risk_budget_cap": "5", "risk_total_cap": "0"}"#;
    assert!(matches!(api.import_snapshot(bad), Err(ApiError::InvalidInput(_))));
    // 整体拒绝，合法键也不写入
    assert_eq!(
        api.get_config(config_keys::RISK_TOTAL_CAP).unwrap(),
        Some("30".to_string())
    );
    assert_eq!(api.get_config(config_keys::RISK_BUDGET_CAP).unwrap(), None);

    let unknown = r#"{"legacy_key": "1"}"#;
    assert!(matches!(api.import_snapshot(unknown), Err(ApiError::InvalidInput(_))));

    let with_meta = r#"{"__meta_exported_at": "2025-06-30", "risk_budget_cap": "5"}"#;
    assert_eq!(api.import_snapshot(with_meta).unwrap(), 1);
    assert_eq!(
        api.get_config(config_keys::RISK_BUDGET_CAP).unwrap(),
        Some("5".to_string())
    );
}

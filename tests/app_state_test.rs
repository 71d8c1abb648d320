// ==========================================
// AppState 集成测试
// ==========================================
// 测试目标: 视图会话生命周期、配置重载、驾驶舱视图装配
// ==========================================

mod helpers;

use helpers::test_data_builder::{fixed_now, milestone, snapshot_days_ago, TaskBuilder};
use portfolio_evm::api::{ApiError, DashboardInput};
use portfolio_evm::app::AppState;
use portfolio_evm::config::config_keys;
use portfolio_evm::domain::filter::filter_types;
use portfolio_evm::domain::snapshot::metric_names;
use portfolio_evm::domain::types::{TrafficLight, VariancePeriod};
use portfolio_evm::domain::{CrossFilter, DrillPathEntry};
use portfolio_evm::engine::FilterAction;
use portfolio_evm::i18n;
use test_helpers::create_test_db;

fn dataset() -> DashboardInput {
    DashboardInput {
        tasks: vec![
            TaskBuilder::new("a1", "A").hours(100.0, 110.0).percent_complete(100.0).build(),
            TaskBuilder::new("a2", "A").hours(100.0, 90.0).percent_complete(50.0).build(),
            TaskBuilder::new("a3", "A").hours(100.0, 100.0).percent_complete(75.0).build(),
            TaskBuilder::new("b1", "B").hours(200.0, 250.0).percent_complete(40.0).build(),
        ],
        milestones: vec![
            milestone("m1", "A", 20.0, "Open"),
            milestone("m2", "B", 9.0, "Open"),
        ],
        ..Default::default()
    }
}

#[tokio::test]
async fn test_session_lifecycle() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let state = AppState::new(db_path).await.unwrap();

    let first = state.open_session("overview").unwrap();
    let again = state.open_session(" overview ").unwrap();
    assert_eq!(first, again);

    let snapshot = state
        .update_session(
            "overview",
            FilterAction::Toggle {
                filter: CrossFilter::new(filter_types::PROJECT, "A"),
            },
        )
        .unwrap();
    assert!(snapshot.is_active(filter_types::PROJECT, "A"));
    assert_eq!(state.session_snapshot("overview").unwrap(), snapshot);

    assert!(state.close_session("overview").unwrap());
    assert!(!state.close_session("overview").unwrap());
    assert!(matches!(
        state.session_snapshot("overview"),
        Err(ApiError::NotFound(_))
    ));
    assert!(matches!(
        state.update_session("overview", FilterAction::Clear),
        Err(ApiError::NotFound(_))
    ));
    assert!(matches!(state.open_session("  "), Err(ApiError::InvalidInput(_))));
}

#[tokio::test]
async fn test_sessions_are_independent_per_view() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let state = AppState::new(db_path).await.unwrap();

    state.open_session("left").unwrap();
    state.open_session("right").unwrap();
    state
        .update_session(
            "left",
            FilterAction::DrillDown {
                entry: DrillPathEntry::new("A", "Project A"),
            },
        )
        .unwrap();

    assert_eq!(state.session_snapshot("left").unwrap().drill_down_path.len(), 1);
    assert!(state.session_snapshot("right").unwrap().is_empty());
}

#[tokio::test]
async fn test_build_view_with_filters() {
    portfolio_evm::logging::init_test();
    let (_temp_file, db_path) = create_test_db().unwrap();
    let state = AppState::new(db_path).await.unwrap();
    state.open_session("main").unwrap();

    let history = vec![snapshot_days_ago(8, metric_names::SPI, 0.5)];
    let view = state
        .build_view("main", &dataset(), &history, None, fixed_now())
        .unwrap();

    assert_eq!(view.period, VariancePeriod::Week);
    assert_eq!(view.metrics.len(), 2);
    assert_eq!(view.health.health_score, 50);
    assert_eq!(
        view.status_labels.schedule,
        i18n::traffic_light_label(TrafficLight::Red)
    );
    let risk_ids: Vec<&str> = view.risks.iter().map(|r| r.item.source_id.as_str()).collect();
    assert_eq!(risk_ids, vec!["m1", "m2", "b1", "a1"]);
    assert!(view.risks.iter().all(|r| !r.description.is_empty()));

    let spi_trend = view.trends.get(metric_names::SPI).unwrap();
    assert_eq!(spi_trend.previous_value, 0.5);
    assert_eq!(spi_trend.current_value, 0.61);
    // 无历史的指标以当前值兜底
    let cpi_trend = view.trends.get(metric_names::CPI).unwrap();
    assert_eq!(cpi_trend.change, 0.0);
    assert_eq!(view.trends.len(), 5);

    state
        .update_session(
            "main",
            FilterAction::Toggle {
                filter: CrossFilter::new(filter_types::PROJECT, "A"),
            },
        )
        .unwrap();
    let filtered = state
        .build_view("main", &dataset(), &history, Some(VariancePeriod::Day), fixed_now())
        .unwrap();

    assert_eq!(filtered.metrics.len(), 1);
    assert_eq!(filtered.health.spi, 0.75);
    let risk_ids: Vec<&str> = filtered
        .risks
        .iter()
        .map(|r| r.item.source_id.as_str())
        .collect();
    assert_eq!(risk_ids, vec!["m1", "a1"]);
    assert_eq!(filtered.filters.active_filters.len(), 1);

    let json = serde_json::to_value(&filtered).unwrap();
    assert_eq!(json["metrics"][0]["projectId"], "A");
    assert_eq!(json["risks"][0]["riskType"], "schedule");
    assert!(json["risks"][0]["description"].is_string());
}

#[tokio::test]
async fn test_reload_config_applies_new_limits() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let state = AppState::new(db_path).await.unwrap();
    state.open_session("main").unwrap();

    state
        .config_api
        .update_config(config_keys::RISK_TOTAL_CAP, "1")
        .unwrap();
    state
        .config_api
        .update_config(config_keys::DEFAULT_VARIANCE_PERIOD, "month")
        .unwrap();

    // 重载前沿用旧配置
    let before = state
        .build_view("main", &dataset(), &[], None, fixed_now())
        .unwrap();
    assert_eq!(before.risks.len(), 4);

    let config = state.reload_config().await.unwrap();
    assert_eq!(config.risk_limits.total_cap, 1);

    let after = state
        .build_view("main", &dataset(), &[], None, fixed_now())
        .unwrap();
    assert_eq!(after.risks.len(), 1);
    assert_eq!(after.period, VariancePeriod::Month);
}

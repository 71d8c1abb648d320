// ==========================================
// 交叉筛选会话集成测试
// ==========================================
// 测试目标: 会话动作序列、快照隔离、动作 JSON 协议
// ==========================================

use portfolio_evm::domain::filter::filter_types;
use portfolio_evm::domain::{CrossFilter, CrossFilterState, DrillPathEntry};
use portfolio_evm::engine::{reduce, CrossFilterSession, FilterAction};

#[test]
fn test_drill_to_level_leaves_filters_untouched() {
    let mut session = CrossFilterSession::new();
    session.toggle_filter(CrossFilter::new(filter_types::PROJECT, "Alpha"));
    session.drill_down(DrillPathEntry::new("portfolio", "Portfolio"));
    session.drill_down(DrillPathEntry::new("unit-7", "Unit 7"));
    session.drill_down(DrillPathEntry::new("task-9", "Task 9"));

    assert!(session.drill_to_level("portfolio"));

    let state = session.snapshot();
    assert_eq!(state.drill_down_path.len(), 1);
    assert_eq!(state.drill_down_path[0].id, "portfolio");
    assert!(state.is_active(filter_types::PROJECT, "Alpha"));
    assert_eq!(state.active_filters.len(), 1);
}

#[test]
fn test_snapshot_is_isolated_from_later_actions() {
    let mut session = CrossFilterSession::new();
    session.toggle_filter(CrossFilter::new(filter_types::STATUS, "Open"));
    let before = session.snapshot();

    session.toggle_filter(CrossFilter::new(filter_types::STATUS, "Closed"));
    session.clear_filters();

    assert_eq!(before.values_of(filter_types::STATUS), vec!["Open"]);
    assert!(session.snapshot().is_empty());
}

#[test]
fn test_toggle_twice_restores_state() {
    let mut session = CrossFilterSession::new();
    let filter = CrossFilter::new(filter_types::RISK_TYPE, "budget").with_source("risk-chart");

    assert!(session.toggle_filter(filter.clone()));
    assert!(session.is_active(filter_types::RISK_TYPE, "budget"));
    assert!(session.toggle_filter(filter));
    assert!(!session.is_active(filter_types::RISK_TYPE, "budget"));
    assert!(session.snapshot().is_empty());
}

#[test]
fn test_noop_actions_report_unchanged() {
    let mut session = CrossFilterSession::new();
    assert!(!session.remove_filter(filter_types::PROJECT, Some("ghost")));
    assert!(!session.drill_to_level("missing"));
    assert!(!session.clear_filters());
}

#[test]
fn test_remove_whole_dimension() {
    let state = CrossFilterState {
        active_filters: vec![
            CrossFilter::new(filter_types::PROJECT, "A"),
            CrossFilter::new(filter_types::STATUS, "Open"),
            CrossFilter::new(filter_types::PROJECT, "B"),
        ],
        drill_down_path: Vec::new(),
    };

    let next = reduce(
        &state,
        &FilterAction::Remove {
            filter_type: filter_types::PROJECT.to_string(),
            value: None,
        },
    );
    assert_eq!(next.active_filters.len(), 1);
    assert_eq!(next.active_filters[0].filter_type, filter_types::STATUS);
    // 原状态不变
    assert_eq!(state.active_filters.len(), 3);
}

#[test]
fn test_action_json_protocol() {
    let raw = r#"[
        {"action": "toggle", "filter": {"type": "project", "value": "Alpha"}},
        {"action": "drillDown", "entry": {"id": "p-1", "label": "Alpha"}},
        {"action": "remove", "filterType": "project", "value": "Alpha"},
        {"action": "drillToLevel", "id": "p-1"},
        {"action": "clear"}
    ]"#;
    let actions: Vec<FilterAction> = serde_json::from_str(raw).unwrap();
    assert_eq!(actions.len(), 5);
    assert_eq!(
        actions[2],
        FilterAction::Remove {
            filter_type: "project".to_string(),
            value: Some("Alpha".to_string()),
        }
    );

    let mut session = CrossFilterSession::new();
    let changes: Vec<bool> = actions.into_iter().map(|a| session.apply(a)).collect();
    assert_eq!(changes, vec![true, true, true, false, true]);
    assert!(session.snapshot().is_empty());
}

#[test]
fn test_restored_state_with_duplicates_keeps_toggle_self_inverse() {
    let raw = r#"{
        "activeFilters": [
            {"type": "project", "value": "Alpha"},
            {"type": "project", "value": "Alpha", "label": "dup"}
        ],
        "drillDownPath": []
    }"#;
    let restored: CrossFilterState = serde_json::from_str(raw).unwrap();
    let mut session = CrossFilterSession::with_state(restored);
    let before = session.snapshot();
    assert_eq!(before.active_filters.len(), 1);

    let alpha = CrossFilter::new(filter_types::PROJECT, "Alpha");
    session.toggle_filter(alpha.clone());
    assert!(!session.is_active(filter_types::PROJECT, "Alpha"));
    session.toggle_filter(alpha);
    assert_eq!(session.snapshot().active_filters.len(), before.active_filters.len());
    assert!(session.is_active(filter_types::PROJECT, "Alpha"));
}

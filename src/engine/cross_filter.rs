// ==========================================
// 项目组合挣值引擎 - 交叉筛选会话
// ==========================================
// 职责: 维护驾驶舱共享的筛选集合与下钻面包屑
// 模型: 纯 reducer (state, action) -> state，会话整体替换 Arc 快照
// 红线: 所有操作都是全函数；找不到目标时为 no-op
// ==========================================

use crate::domain::filter::{CrossFilter, CrossFilterState, DrillPathEntry};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

// ==========================================
// FilterAction - 会话动作
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum FilterAction {
    /// 已存在同 (type, value) 则移除，否则追加
    Toggle { filter: CrossFilter },
    /// value 为空时移除该维度全部筛选
    Remove {
        #[serde(rename = "filterType")]
        filter_type: String,
        value: Option<String>,
    },
    /// 清空筛选与面包屑
    Clear,
    /// 下钻一层（已在路径中则回退到该层）
    DrillDown { entry: DrillPathEntry },
    /// 截断面包屑到指定层（含）
    DrillToLevel { id: String },
}

/// 纯状态转换
pub fn reduce(state: &CrossFilterState, action: &FilterAction) -> CrossFilterState {
    match action {
        FilterAction::Toggle { filter } => {
            let mut next = state.clone();
            let existing = next
                .active_filters
                .iter()
                .position(|f| f.same_key(&filter.filter_type, &filter.value));
            match existing {
                Some(idx) => {
                    next.active_filters.remove(idx);
                }
                None => next.active_filters.push(filter.clone()),
            }
            next
        }
        FilterAction::Remove { filter_type, value } => {
            let mut next = state.clone();
            next.active_filters.retain(|f| match value {
                Some(v) => !f.same_key(filter_type, v),
                None => f.filter_type != *filter_type,
            });
            next
        }
        FilterAction::Clear => CrossFilterState::default(),
        FilterAction::DrillDown { entry } => {
            let mut next = state.clone();
            match next.drill_down_path.iter().position(|e| e.id == entry.id) {
                Some(idx) => next.drill_down_path.truncate(idx + 1),
                None => next.drill_down_path.push(entry.clone()),
            }
            next
        }
        FilterAction::DrillToLevel { id } => {
            let mut next = state.clone();
            if let Some(idx) = next.drill_down_path.iter().position(|e| e.id == *id) {
                next.drill_down_path.truncate(idx + 1);
            }
            next
        }
    }
}

// ==========================================
// CrossFilterSession - 单视图的筛选会话
// ==========================================
#[derive(Debug, Clone)]
pub struct CrossFilterSession {
    session_id: Uuid,
    state: Arc<CrossFilterState>,
}

impl CrossFilterSession {
    pub fn new() -> Self {
        Self::with_state(CrossFilterState::default())
    }

    /// 从已有状态恢复（例如外部保存的筛选集）
    ///
    /// 同 (type, value) 的重复筛选只保留第一条
    pub fn with_state(mut state: CrossFilterState) -> Self {
        let before = state.active_filters.len();
        let mut seen = HashSet::new();
        state
            .active_filters
            .retain(|f| seen.insert((f.filter_type.clone(), f.value.clone())));
        if state.active_filters.len() != before {
            debug!(
                dropped = before - state.active_filters.len(),
                "恢复筛选状态时移除重复条件"
            );
        }

        Self {
            session_id: Uuid::new_v4(),
            state: Arc::new(state),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// 当前状态快照（只读，不受后续操作影响）
    pub fn snapshot(&self) -> Arc<CrossFilterState> {
        Arc::clone(&self.state)
    }

    /// 应用动作，返回状态是否变化
    pub fn apply(&mut self, action: FilterAction) -> bool {
        let next = reduce(&self.state, &action);
        let changed = next != *self.state;
        if changed {
            self.state = Arc::new(next);
        }
        debug!(
            session_id = %self.session_id,
            action = ?action,
            changed = changed,
            filters = self.state.active_filters.len(),
            depth = self.state.drill_down_path.len(),
            "交叉筛选会话更新"
        );
        changed
    }

    // ==========================================
    // 便捷操作
    // ==========================================

    pub fn toggle_filter(&mut self, filter: CrossFilter) -> bool {
        self.apply(FilterAction::Toggle { filter })
    }

    pub fn remove_filter(&mut self, filter_type: &str, value: Option<&str>) -> bool {
        self.apply(FilterAction::Remove {
            filter_type: filter_type.to_string(),
            value: value.map(str::to_string),
        })
    }

    pub fn clear_filters(&mut self) -> bool {
        self.apply(FilterAction::Clear)
    }

    pub fn drill_down(&mut self, entry: DrillPathEntry) -> bool {
        self.apply(FilterAction::DrillDown { entry })
    }

    pub fn drill_to_level(&mut self, id: &str) -> bool {
        self.apply(FilterAction::DrillToLevel { id: id.to_string() })
    }

    // ==========================================
    // 查询
    // ==========================================

    pub fn is_active(&self, filter_type: &str, value: &str) -> bool {
        self.state.is_active(filter_type, value)
    }

    pub fn values_of(&self, filter_type: &str) -> Vec<String> {
        self.state
            .values_of(filter_type)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn allows(&self, filter_type: &str, value: &str) -> bool {
        self.state.allows(filter_type, value)
    }
}

impl Default for CrossFilterSession {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::filter::filter_types;

    fn alpha() -> CrossFilter {
        CrossFilter::new(filter_types::PROJECT, "Alpha").with_label("Project Alpha")
    }

    #[test]
    fn test_toggle_twice_restores_state() {
        let mut session = CrossFilterSession::new();
        session.toggle_filter(CrossFilter::new(filter_types::STATUS, "Late"));
        let before = session.snapshot();

        assert!(session.toggle_filter(alpha()));
        assert!(session.is_active(filter_types::PROJECT, "Alpha"));
        assert!(session.toggle_filter(alpha()));

        assert_eq!(*session.snapshot(), *before);
    }

    #[test]
    fn test_toggle_matches_on_type_and_value_only() {
        let mut session = CrossFilterSession::new();
        session.toggle_filter(alpha());
        session.toggle_filter(CrossFilter::new(filter_types::PROJECT, "Alpha").with_source("table"));
        assert!(session.snapshot().active_filters.is_empty());
    }

    #[test]
    fn test_remove_by_type_keeps_other_types() {
        let mut session = CrossFilterSession::new();
        session.toggle_filter(alpha());
        session.toggle_filter(CrossFilter::new(filter_types::PROJECT, "Beta"));
        session.toggle_filter(CrossFilter::new(filter_types::CHARGE_TYPE, "EX"));

        assert!(session.remove_filter(filter_types::PROJECT, None));

        let state = session.snapshot();
        assert_eq!(state.active_filters.len(), 1);
        assert_eq!(state.active_filters[0].filter_type, filter_types::CHARGE_TYPE);
    }

    #[test]
    fn test_remove_single_value() {
        let mut session = CrossFilterSession::new();
        session.toggle_filter(alpha());
        session.toggle_filter(CrossFilter::new(filter_types::PROJECT, "Beta"));

        assert!(session.remove_filter(filter_types::PROJECT, Some("Alpha")));
        assert_eq!(session.values_of(filter_types::PROJECT), vec!["Beta".to_string()]);
        assert!(!session.remove_filter(filter_types::PROJECT, Some("Gamma")));
    }

    #[test]
    fn test_drill_to_level_keeps_project_filter() {
        let mut session = CrossFilterSession::new();
        session.toggle_filter(alpha());
        session.drill_down(DrillPathEntry::new("portfolio", "Portfolio"));
        session.drill_down(DrillPathEntry::new("unit-7", "Unit 7"));
        session.drill_down(DrillPathEntry::new("phase-2", "Phase 2"));

        assert!(session.drill_to_level("unit-7"));

        let state = session.snapshot();
        assert_eq!(state.drill_down_path.len(), 2);
        assert_eq!(state.current_level().map(|e| e.id.as_str()), Some("unit-7"));
        assert!(state.is_active(filter_types::PROJECT, "Alpha"));
    }

    #[test]
    fn test_unmatched_targets_are_noops() {
        let mut session = CrossFilterSession::new();
        session.drill_down(DrillPathEntry::new("portfolio", "Portfolio"));
        let before = session.snapshot();

        assert!(!session.drill_to_level("missing"));
        assert!(!session.remove_filter(filter_types::STATUS, None));
        assert!(Arc::ptr_eq(&before, &session.snapshot()));
    }

    #[test]
    fn test_drill_down_to_existing_level_truncates() {
        let mut session = CrossFilterSession::new();
        session.drill_down(DrillPathEntry::new("a", "A"));
        session.drill_down(DrillPathEntry::new("b", "B"));
        session.drill_down(DrillPathEntry::new("a", "A"));
        assert_eq!(session.snapshot().drill_down_path.len(), 1);
    }

    #[test]
    fn test_clear_resets_filters_and_path() {
        let mut session = CrossFilterSession::new();
        session.toggle_filter(alpha());
        session.drill_down(DrillPathEntry::new("a", "A"));

        assert!(session.clear_filters());
        assert!(session.snapshot().is_empty());
        assert!(!session.clear_filters());
    }

    #[test]
    fn test_snapshot_is_isolated_from_later_updates() {
        let mut session = CrossFilterSession::new();
        let before = session.snapshot();
        session.toggle_filter(alpha());
        assert!(before.active_filters.is_empty());
        assert_eq!(session.snapshot().active_filters.len(), 1);
    }

    #[test]
    fn test_with_state_drops_duplicate_filters() {
        let state = CrossFilterState {
            active_filters: vec![
                alpha().with_label("first"),
                CrossFilter::new("status", "Open"),
                alpha().with_label("second"),
            ],
            drill_down_path: Vec::new(),
        };
        let mut session = CrossFilterSession::with_state(state);

        let before = session.snapshot();
        assert_eq!(before.active_filters.len(), 2);
        assert_eq!(before.active_filters[0].label, "first");

        session.toggle_filter(alpha());
        session.toggle_filter(alpha());
        let after = session.snapshot();
        assert_eq!(after.values_of("project"), vec!["Alpha"]);
        assert_eq!(after.active_filters.len(), before.active_filters.len());
    }

    #[test]
    fn test_action_json_shape() {
        let action: FilterAction = serde_json::from_str(
            r#"{"action":"remove","filterType":"project"}"#,
        )
        .unwrap();
        assert_eq!(
            action,
            FilterAction::Remove {
                filter_type: "project".to_string(),
                value: None
            }
        );
    }
}

// ==========================================
// 项目组合挣值引擎 - 交叉筛选领域模型
// ==========================================
// 职责: 筛选条件、下钻路径、会话状态快照
// 约束: 活动筛选集合内 (filter_type, value) 唯一
// ==========================================

use serde::{Deserialize, Serialize};

/// 常用筛选维度
pub mod filter_types {
    pub const PROJECT: &str = "project";
    pub const STATUS: &str = "status";
    pub const CHARGE_TYPE: &str = "chargeType";
    pub const RISK_TYPE: &str = "riskType";
}

// ==========================================
// CrossFilter - 交叉筛选条件
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossFilter {
    #[serde(rename = "type")]
    pub filter_type: String, // 维度
    pub value: String,       // 取值
    #[serde(default)]
    pub label: String,       // 显示标签
    #[serde(default)]
    pub source: String,      // 发起筛选的视图/图表
}

impl CrossFilter {
    pub fn new(filter_type: &str, value: &str) -> Self {
        Self {
            filter_type: filter_type.to_string(),
            value: value.to_string(),
            label: value.to_string(),
            source: String::new(),
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    pub fn with_source(mut self, source: &str) -> Self {
        self.source = source.to_string();
        self
    }

    /// 身份判定只看 (filter_type, value)
    pub fn same_key(&self, filter_type: &str, value: &str) -> bool {
        self.filter_type == filter_type && self.value == value
    }
}

// ==========================================
// DrillPathEntry - 下钻面包屑
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrillPathEntry {
    pub id: String,
    pub label: String,
}

impl DrillPathEntry {
    pub fn new(id: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
        }
    }
}

// ==========================================
// CrossFilterState - 会话状态（不可变值）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossFilterState {
    pub active_filters: Vec<CrossFilter>,     // 按加入顺序
    pub drill_down_path: Vec<DrillPathEntry>, // 由浅到深
}

impl CrossFilterState {
    /// 是否存在 (filter_type, value) 筛选
    pub fn is_active(&self, filter_type: &str, value: &str) -> bool {
        self.active_filters
            .iter()
            .any(|f| f.same_key(filter_type, value))
    }

    /// 指定维度上的所有取值（按加入顺序）
    pub fn values_of(&self, filter_type: &str) -> Vec<&str> {
        self.active_filters
            .iter()
            .filter(|f| f.filter_type == filter_type)
            .map(|f| f.value.as_str())
            .collect()
    }

    /// 维度未筛选时放行一切；否则仅放行已选取值
    pub fn allows(&self, filter_type: &str, value: &str) -> bool {
        let mut any_of_type = false;
        for f in self.active_filters.iter().filter(|f| f.filter_type == filter_type) {
            if f.value == value {
                return true;
            }
            any_of_type = true;
        }
        !any_of_type
    }

    /// 当前下钻层级（最深一层）
    pub fn current_level(&self) -> Option<&DrillPathEntry> {
        self.drill_down_path.last()
    }

    pub fn is_empty(&self) -> bool {
        self.active_filters.is_empty() && self.drill_down_path.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(filters: &[(&str, &str)]) -> CrossFilterState {
        CrossFilterState {
            active_filters: filters
                .iter()
                .map(|(t, v)| CrossFilter::new(t, v))
                .collect(),
            drill_down_path: Vec::new(),
        }
    }

    #[test]
    fn test_allows_without_filters_of_type() {
        let state = state_with(&[("status", "Late")]);
        assert!(state.allows("project", "Alpha"));
    }

    #[test]
    fn test_allows_only_selected_values() {
        let state = state_with(&[("project", "Alpha"), ("project", "Beta")]);
        assert!(state.allows("project", "Alpha"));
        assert!(state.allows("project", "Beta"));
        assert!(!state.allows("project", "Gamma"));
        assert_eq!(state.values_of("project"), vec!["Alpha", "Beta"]);
    }

    #[test]
    fn test_cross_filter_serializes_type_key() {
        let f = CrossFilter::new("project", "Alpha").with_source("hours-chart");
        let json = serde_json::to_value(&f).unwrap();
        assert_eq!(json["type"], "project");
        assert_eq!(json["source"], "hours-chart");
    }
}

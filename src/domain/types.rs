// ==========================================
// 项目组合挣值引擎 - 领域类型定义
// ==========================================
// 职责: 红黄绿灯状态、风险类型、对比周期、依赖关系类型
// ==========================================

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 红黄绿灯状态 (Traffic Light)
// ==========================================
// 顺序: Red < Yellow < Green (越大越健康)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficLight {
    Red,    // 危险
    Yellow, // 关注
    Green,  // 正常
}

impl TrafficLight {
    /// i18n 标签键
    pub fn label_key(&self) -> &'static str {
        match self {
            TrafficLight::Green => "status.green",
            TrafficLight::Yellow => "status.yellow",
            TrafficLight::Red => "status.red",
        }
    }
}

impl fmt::Display for TrafficLight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrafficLight::Green => write!(f, "green"),
            TrafficLight::Yellow => write!(f, "yellow"),
            TrafficLight::Red => write!(f, "red"),
        }
    }
}

// ==========================================
// 风险类型 (Risk Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskType {
    Schedule, // 进度风险（里程碑延期）
    Budget,   // 预算风险（工时超支）
}

impl fmt::Display for RiskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskType::Schedule => write!(f, "schedule"),
            RiskType::Budget => write!(f, "budget"),
        }
    }
}

// ==========================================
// 对比周期 (Variance Period)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariancePeriod {
    Day,
    Week,
    Month,
    Quarter,
}

impl VariancePeriod {
    /// 周期时长（月按 30 天、季按 90 天计）
    pub fn duration(&self) -> Duration {
        match self {
            VariancePeriod::Day => Duration::days(1),
            VariancePeriod::Week => Duration::days(7),
            VariancePeriod::Month => Duration::days(30),
            VariancePeriod::Quarter => Duration::days(90),
        }
    }

    /// 从字符串解析，未知值返回 None
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "day" => Some(VariancePeriod::Day),
            "week" => Some(VariancePeriod::Week),
            "month" => Some(VariancePeriod::Month),
            "quarter" => Some(VariancePeriod::Quarter),
            _ => None,
        }
    }
}

impl Default for VariancePeriod {
    fn default() -> Self {
        VariancePeriod::Week
    }
}

impl fmt::Display for VariancePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariancePeriod::Day => write!(f, "day"),
            VariancePeriod::Week => write!(f, "week"),
            VariancePeriod::Month => write!(f, "month"),
            VariancePeriod::Quarter => write!(f, "quarter"),
        }
    }
}

// ==========================================
// 任务依赖关系类型 (Relation Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationType {
    #[serde(rename = "FS")]
    FinishStart,
    #[serde(rename = "SS")]
    StartStart,
    #[serde(rename = "FF")]
    FinishFinish,
    #[serde(rename = "SF")]
    StartFinish,
}

impl RelationType {
    /// 规范化外部排程工具输出的关系名称
    ///
    /// 同时接受缩写（FS/SS/FF/SF）与全称（FINISH_START 等，大小写/下划线不敏感），
    /// 无法识别时回退为 FS。
    pub fn normalize(raw: &str) -> Self {
        let upper = raw.trim().to_uppercase();
        let compact = upper.replace(['_', '-', ' '], "");
        match compact.as_str() {
            "FS" | "FINISHSTART" => RelationType::FinishStart,
            "SS" | "STARTSTART" => RelationType::StartStart,
            "FF" | "FINISHFINISH" => RelationType::FinishFinish,
            "SF" | "STARTFINISH" => RelationType::StartFinish,
            _ => RelationType::FinishStart,
        }
    }
}

impl Default for RelationType {
    fn default() -> Self {
        RelationType::FinishStart
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationType::FinishStart => write!(f, "FS"),
            RelationType::StartStart => write!(f, "SS"),
            RelationType::FinishFinish => write!(f, "FF"),
            RelationType::StartFinish => write!(f, "SF"),
        }
    }
}

// ==========================================
// 大纲层级类型 (Hierarchy Type)
// ==========================================
// 大纲级别: 2 = 单元, 3 = 阶段, >=4 = 任务, 其余 = 项目
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HierarchyType {
    Project,
    Unit,
    Phase,
    Task,
}

impl HierarchyType {
    pub fn from_outline_level(level: u32) -> Self {
        match level {
            2 => HierarchyType::Unit,
            3 => HierarchyType::Phase,
            l if l >= 4 => HierarchyType::Task,
            _ => HierarchyType::Project,
        }
    }
}

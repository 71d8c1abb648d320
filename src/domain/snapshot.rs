// ==========================================
// 项目组合挣值引擎 - 指标历史快照
// ==========================================
// 来源: 外部维护的历史序列（本库不负责持久化）
// ==========================================

use crate::common::json_utils::{lenient_f64, lenient_string};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// MetricSnapshot - 历史序列中的一个点
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSnapshot {
    pub timestamp: DateTime<Utc>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub metric_name: String,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub value: f64,
}

impl MetricSnapshot {
    pub fn new(timestamp: DateTime<Utc>, metric_name: &str, value: f64) -> Self {
        Self {
            timestamp,
            metric_name: metric_name.to_string(),
            value,
        }
    }
}

// ==========================================
// VarianceTrend - 当前值与历史值对比
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VarianceTrend {
    pub current_value: f64,
    pub previous_value: f64,
    pub change: f64,         // current - previous
    pub percent_change: f64, // round(change / |previous| * 100)，previous 为 0 时为 0
}

impl VarianceTrend {
    /// 无历史可比时的对比结果: previous = current，变化为 0
    pub fn unchanged(current_value: f64) -> Self {
        Self {
            current_value,
            previous_value: current_value,
            change: 0.0,
            percent_change: 0.0,
        }
    }
}

/// 驾驶舱跟踪的标准指标名
pub mod metric_names {
    pub const SPI: &str = "spi";
    pub const CPI: &str = "cpi";
    pub const HEALTH_SCORE: &str = "healthScore";
    pub const PERCENT_COMPLETE: &str = "percentComplete";
    pub const TOTAL_HOURS: &str = "totalHours";
}

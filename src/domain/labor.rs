// ==========================================
// 项目组合挣值引擎 - 工时台账领域模型
// ==========================================
// 来源: 外部工时填报协作方
// ==========================================

use crate::common::json_utils::{lenient_f64, lenient_naive_date, lenient_opt_string, lenient_string};
use crate::domain::task::UNKNOWN_PROJECT;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 缺失计费类型时的归类
pub const UNCLASSIFIED_CHARGE_TYPE: &str = "Unclassified";

// ==========================================
// HourEntry - 工时/成本台账行
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourEntry {
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub project_id: Option<String>, // 所属项目ID

    #[serde(default, deserialize_with = "lenient_string")]
    pub charge_type: String, // 计费类型 (EX/QC/...)

    #[serde(default, deserialize_with = "lenient_f64")]
    pub hours: f64, // 工时

    #[serde(default, deserialize_with = "lenient_f64")]
    pub actual_cost: f64, // 实际成本

    #[serde(default, deserialize_with = "lenient_naive_date")]
    pub date: Option<NaiveDate>, // 填报日期
}

impl HourEntry {
    /// 分组键: 项目ID（去空白），缺失时为 "Unknown"
    pub fn project_key(&self) -> &str {
        self.project_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(UNKNOWN_PROJECT)
    }

    /// 计费类型键（去空白），缺失时归入 "Unclassified"
    pub fn charge_type_key(&self) -> &str {
        let trimmed = self.charge_type.trim();
        if trimmed.is_empty() {
            UNCLASSIFIED_CHARGE_TYPE
        } else {
            trimmed
        }
    }
}

// ==========================================
// 项目组合挣值引擎 - 偏差趋势引擎
// ==========================================
// 职责: 将当前指标值与按周期选出的历史快照比较
// 输入: 历史快照序列 + 指标名 + 当前值 + 周期 + 当前时刻
// 输出: Option<VarianceTrend>（无可用快照时为 None）
// 红线: 不 panic；当前值兜底由调用方负责
// ==========================================

use crate::domain::snapshot::{MetricSnapshot, VarianceTrend};
use crate::domain::types::VariancePeriod;
use crate::engine::numeric::{finite_or, percent_change, round_ratio};
use chrono::{DateTime, Utc};
use tracing::debug;

// ==========================================
// VarianceTrendEngine - 偏差趋势引擎
// ==========================================
pub struct VarianceTrendEngine {
    // 无状态引擎
}

impl VarianceTrendEngine {
    pub fn new() -> Self {
        Self {}
    }

    /// 计算偏差趋势
    ///
    /// # 选点规则
    /// - 只看 metric_name 匹配的快照
    /// - 取时间戳 <= now - period 中最新的一条
    /// - 时间戳相同时取输入序列中靠后的一条
    ///
    /// # 返回
    /// - Some: {current, previous, change, percent_change}
    /// - None: 历史为空或没有满足条件的快照
    pub fn compare(
        &self,
        history: &[MetricSnapshot],
        metric_name: &str,
        current_value: f64,
        period: VariancePeriod,
        now: DateTime<Utc>,
    ) -> Option<VarianceTrend> {
        let cutoff = now - period.duration();
        let baseline = Self::select_baseline(history, metric_name, cutoff);

        let Some(snapshot) = baseline else {
            debug!(
                metric = metric_name,
                period = %period,
                history_len = history.len(),
                "无可比较的历史快照"
            );
            return None;
        };

        Some(Self::build_trend(current_value, snapshot.value))
    }

    /// 选出比较基准快照
    pub fn select_baseline<'a>(
        history: &'a [MetricSnapshot],
        metric_name: &str,
        cutoff: DateTime<Utc>,
    ) -> Option<&'a MetricSnapshot> {
        let mut selected: Option<&MetricSnapshot> = None;
        for snapshot in history
            .iter()
            .filter(|s| s.metric_name == metric_name && s.timestamp <= cutoff)
        {
            match selected {
                // 时间戳相同时后者覆盖前者
                Some(current) if snapshot.timestamp < current.timestamp => {}
                _ => selected = Some(snapshot),
            }
        }
        selected
    }

    fn build_trend(current_value: f64, previous_value: f64) -> VarianceTrend {
        let current_value = finite_or(current_value, 0.0);
        let previous_value = finite_or(previous_value, 0.0);
        let change = current_value - previous_value;

        VarianceTrend {
            current_value,
            previous_value,
            change: round_ratio(change),
            percent_change: percent_change(change, previous_value),
        }
    }
}

impl Default for VarianceTrendEngine {
    fn default() -> Self {
        Self::new()
    }
}

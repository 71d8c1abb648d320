// ==========================================
// 项目组合挣值引擎 - 指标重算缓存
// ==========================================
// 职责: 以输入集合指纹为键记忆聚合结果，仅在数据真正变化时重算
// 输入: 任务 / 项目名称表 / 工时台账
// 输出: Arc<Vec<ProjectMetrics>>（命中时返回同一 Arc）
// ==========================================

use crate::domain::labor::HourEntry;
use crate::domain::metrics::ProjectMetrics;
use crate::domain::task::{Project, Task};
use crate::engine::metrics_aggregator::MetricsAggregator;
use serde::Serialize;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// 输入指纹
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct InputFingerprint(pub u64);

impl InputFingerprint {
    /// 计算指纹（只覆盖参与聚合的字段）
    pub fn of(
        tasks: &[Task],
        projects: Option<&[Project]>,
        hour_entries: Option<&[HourEntry]>,
    ) -> Self {
        let mut hasher = DefaultHasher::new();

        tasks.len().hash(&mut hasher);
        for task in tasks {
            task.id.hash(&mut hasher);
            task.project_id.hash(&mut hasher);
            task.project_name.hash(&mut hasher);
            task.status.hash(&mut hasher);
            task.baseline_hours.to_bits().hash(&mut hasher);
            task.actual_hours.to_bits().hash(&mut hasher);
            task.percent_complete.to_bits().hash(&mut hasher);
        }

        // None 与空切片区分开
        projects.map(<[Project]>::len).hash(&mut hasher);
        for project in projects.unwrap_or_default() {
            project.id.hash(&mut hasher);
            project.name.hash(&mut hasher);
        }

        hour_entries.map(<[HourEntry]>::len).hash(&mut hasher);
        for entry in hour_entries.unwrap_or_default() {
            entry.project_id.hash(&mut hasher);
            entry.charge_type.hash(&mut hasher);
            entry.hours.to_bits().hash(&mut hasher);
            entry.actual_cost.to_bits().hash(&mut hasher);
        }

        Self(hasher.finish())
    }
}

/// 缓存命中统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

#[derive(Debug, Default)]
struct CacheInner {
    entry: Option<(InputFingerprint, Arc<Vec<ProjectMetrics>>)>,
    stats: CacheStats,
}

// ==========================================
// MetricsCache - 记忆化聚合
// ==========================================
#[derive(Debug, Default)]
pub struct MetricsCache {
    aggregator: MetricsAggregator,
    inner: Mutex<CacheInner>,
}

impl MetricsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 指纹未变化时返回缓存结果，否则重新聚合
    pub fn get_or_compute(
        &self,
        tasks: &[Task],
        projects: Option<&[Project]>,
        hour_entries: Option<&[HourEntry]>,
    ) -> Arc<Vec<ProjectMetrics>> {
        let fingerprint = InputFingerprint::of(tasks, projects, hour_entries);
        let mut inner = self.lock();

        if let Some((cached_fp, cached)) = &inner.entry {
            if *cached_fp == fingerprint {
                let cached = Arc::clone(cached);
                inner.stats.hits += 1;
                debug!(fingerprint = fingerprint.0, "指标缓存命中");
                return cached;
            }
        }

        let metrics = Arc::new(self.aggregator.aggregate(tasks, projects, hour_entries));
        inner.entry = Some((fingerprint, Arc::clone(&metrics)));
        inner.stats.misses += 1;
        debug!(
            fingerprint = fingerprint.0,
            project_count = metrics.len(),
            "指标缓存未命中，已重算"
        );
        metrics
    }

    /// 丢弃缓存结果（统计保留）
    pub fn invalidate(&self) {
        self.lock().entry = None;
    }

    pub fn stats(&self) -> CacheStats {
        self.lock().stats
    }

    fn lock(&self) -> MutexGuard<'_, CacheInner> {
        // 缓存内容可重算，中毒后继续使用
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

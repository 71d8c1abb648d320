// ==========================================
// 项目组合挣值引擎 - 数值守卫
// ==========================================
// 职责: 除零保护 + 输出边界的非有限值回退 + 统一取整
// 红线: 任何 NaN / Infinity 不得越过输出边界
// ==========================================

/// 非有限值回退为 default
#[inline]
pub fn finite_or(value: f64, default: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        default
    }
}

/// 比值（分母 <= 0 或结果非有限时返回 default）
#[inline]
pub fn ratio_or(numerator: f64, denominator: f64, default: f64) -> f64 {
    if denominator > 0.0 {
        finite_or(numerator / denominator, default)
    } else {
        default
    }
}

/// 取整（工时/成本/百分比），非有限值回退为 0
#[inline]
pub fn round_whole(value: f64) -> f64 {
    // +0.0 消除 -0.0
    finite_or(value.round(), 0.0) + 0.0
}

/// 保留 2 位小数（指数），非有限值回退为 0
#[inline]
pub fn round_ratio(value: f64) -> f64 {
    finite_or((value * 100.0).round() / 100.0, 0.0) + 0.0
}

/// 相对变化百分比: round(change / |base| * 100)，base 为 0 时为 0
#[inline]
pub fn percent_change(change: f64, base: f64) -> f64 {
    if base == 0.0 || !base.is_finite() {
        return 0.0;
    }
    round_whole(change / base.abs() * 100.0)
}

/// 区间截断（NaN 回退为下界）
#[inline]
pub fn clamp_or_min(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}

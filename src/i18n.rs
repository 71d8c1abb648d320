// ==========================================
// 项目组合挣值引擎 - 国际化 (i18n)
// ==========================================
// 使用 rust-i18n 库，支持中文（默认）和英文
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

use crate::domain::risk::RiskItem;
use crate::domain::types::{RiskType, TrafficLight};

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言
///
/// # 参数
/// - locale: 语言代码（"zh-CN" 或 "en"）
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// 翻译消息（无参数）
///
/// # 示例
/// ```no_run
/// use portfolio_evm::i18n::t;
/// let msg = t("status.green");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（带参数，占位符形如 %{name}）
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

/// 红黄绿灯显示名
pub fn traffic_light_label(light: TrafficLight) -> String {
    t(light.label_key())
}

/// 风险条目描述
pub fn risk_description(item: &RiskItem) -> String {
    let impact = item.impact.to_string();
    let probability = item.probability.to_string();
    match item.risk_type {
        RiskType::Schedule => {
            let days = item.variance_days.unwrap_or(0.0).to_string();
            t_with_args(
                "risk.schedule_description",
                &[
                    ("name", item.name.as_str()),
                    ("days", days.as_str()),
                    ("impact", impact.as_str()),
                    ("probability", probability.as_str()),
                ],
            )
        }
        RiskType::Budget => {
            let pct = item.variance_pct.unwrap_or(0.0).to_string();
            t_with_args(
                "risk.budget_description",
                &[
                    ("name", item.name.as_str()),
                    ("pct", pct.as_str()),
                    ("impact", impact.as_str()),
                    ("probability", probability.as_str()),
                ],
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // rust-i18n 的 locale 为全局状态，测试默认并行执行，这里串行化
    static LOCALE_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_set_locale() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("en");
        assert_eq!(current_locale(), "en");
        set_locale("zh-CN");
        assert_eq!(current_locale(), "zh-CN");
    }

    #[test]
    fn test_traffic_light_labels() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("zh-CN");
        assert_eq!(traffic_light_label(TrafficLight::Red), "红");

        set_locale("en");
        assert_eq!(traffic_light_label(TrafficLight::Yellow), "Yellow");

        set_locale("zh-CN");
    }

    #[test]
    fn test_risk_description_with_args() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        let item = RiskItem {
            source_id: "M1".to_string(),
            name: "Design Freeze".to_string(),
            project_id: None,
            status: "Late".to_string(),
            risk_type: RiskType::Schedule,
            variance_days: Some(20.0),
            variance_pct: None,
            baseline_hours: None,
            actual_hours: None,
            impact: 90,
            probability: 90,
            risk_score: 81.0,
        };

        set_locale("en");
        let msg = risk_description(&item);
        assert!(msg.contains("Design Freeze"));
        assert!(msg.contains("20 days"));

        set_locale("zh-CN");
        let msg = risk_description(&item);
        assert!(msg.contains("延期 20 天"));
    }
}

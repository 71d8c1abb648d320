// ==========================================
// 项目组合挣值引擎 - JSON 工具模块
// ==========================================
// 职责: 外部数据字段的宽松解析
// 规则: 缺失/null/格式错误的数值一律降级为 0，字符串降级为空串，
//       不向调用方抛出错误
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// JSON 值转 f64
///
/// - 数字: 原值（非有限值降级为 0）
/// - 数字字符串: 解析值
/// - 其他: 0
fn value_to_f64(value: &Value) -> f64 {
    let raw = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if raw.is_finite() {
        raw
    } else {
        0.0
    }
}

/// 宽松解析 f64 字段（配合 `#[serde(default, deserialize_with = "...")]`）
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(value_to_f64).unwrap_or(0.0))
}

/// 宽松解析可选 f64 字段（缺失/null/无法解析时为 None，0 保留为 Some(0.0)）
pub fn lenient_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let raw = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(raw.filter(|v| v.is_finite()))
}

/// 宽松解析 u32 字段（负数降级为 0）
pub fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .map(|v| value_to_f64(v).round().clamp(0.0, u32::MAX as f64) as u32)
        .unwrap_or(0))
}

/// 宽松解析字符串字段（数字转文本，null 转空串）
pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    })
}

/// 宽松解析可选字符串字段（空白串视为缺失）
pub fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let text = match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => return Ok(None),
    };
    if text.trim().is_empty() {
        Ok(None)
    } else {
        Ok(Some(text))
    }
}

/// 宽松解析日期字段
///
/// 接受 `YYYY-MM-DD` 或以其开头的时间戳（如 `2025-03-01T08:00:00Z`），
/// 其余情况返回 None。
pub fn lenient_naive_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            let head = trimmed.get(..10).unwrap_or(trimmed);
            NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
        }
        _ => None,
    })
}

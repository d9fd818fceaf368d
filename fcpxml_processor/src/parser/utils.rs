//! # FCPXML 解析器的工具函数
//!
//! 该模块提供了时间码解析、属性提取和实体解码等辅助函数。

use motion_core::{ConversionWarning, ConvertError};
use quick_xml::{Reader, events::BytesStart};

/// 解析 FCPXML 时间码，返回秒数。
///
/// 支持有理数形式（`"1001/30000s"`）和小数形式（`"10s"`, `"2.5"`），
/// 末尾的单位 `s` 可有可无。无法识别时返回 `None`。
#[must_use]
pub fn try_parse_time(time_str: &str) -> Option<f64> {
    let value = time_str.strip_suffix('s').unwrap_or(time_str);

    let seconds = if let Some((numerator, denominator)) = value.split_once('/') {
        let numerator = numerator.parse::<f64>().ok()?;
        let denominator = denominator.parse::<f64>().ok()?;
        if denominator == 0.0 {
            return None;
        }
        numerator / denominator
    } else {
        value.parse::<f64>().ok()?
    };

    seconds.is_finite().then_some(seconds)
}

/// 解析 FCPXML 时间码，返回秒数。永不失败，无法识别的输入按 `0.0` 处理。
#[must_use]
pub fn parse_time(time_str: &str) -> f64 {
    try_parse_time(time_str).unwrap_or(0.0)
}

/// 读取指定属性并交给 `processor` 转换。
///
/// # 返回
/// * `Result<Option<T>, ConvertError>` - 属性不存在时返回 `None`。
pub(super) fn get_attribute<T, F>(
    e: &BytesStart,
    reader: &Reader<&[u8]>,
    attr_name: &[u8],
    processor: F,
) -> Result<Option<T>, ConvertError>
where
    F: FnOnce(&str) -> T,
{
    e.try_get_attribute(attr_name)?
        .map(|attr| -> Result<T, ConvertError> {
            let decoded_value = attr.decode_and_unescape_value(reader.decoder())?;
            Ok(processor(&decoded_value))
        })
        .transpose()
}

/// 获取字符串类型的属性值。
pub(super) fn get_string_attribute(
    e: &BytesStart,
    reader: &Reader<&[u8]>,
    attr_name: &[u8],
) -> Result<Option<String>, ConvertError> {
    get_attribute(e, reader, attr_name, str::to_owned)
}

/// 获取时间码属性（秒）。
///
/// 属性存在但无法解析时按 0 秒处理，并记录一条警告。
pub(super) fn get_time_attribute(
    e: &BytesStart,
    reader: &Reader<&[u8]>,
    attr_name: &[u8],
    warnings: &mut Vec<ConversionWarning>,
) -> Result<Option<f64>, ConvertError> {
    Ok(get_string_attribute(e, reader, attr_name)?.map(|value| {
        try_parse_time(&value).unwrap_or_else(|| {
            warnings.push(ConversionWarning::MalformedTime { value });
            0.0
        })
    }))
}

/// 解码一个 XML 实体引用（不含 `&` 和 `;`）。
///
/// 支持预定义实体和十进制/十六进制数字字符引用，未知实体返回 `None`。
pub(super) fn resolve_entity(entity_name: &str) -> Option<char> {
    if let Some(num_str) = entity_name.strip_prefix('#') {
        let (radix, code_point_str) = num_str
            .strip_prefix('x')
            .map_or((10, num_str), |stripped| (16, stripped));
        return u32::from_str_radix(code_point_str, radix)
            .ok()
            .and_then(char::from_u32);
    }

    match entity_name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_seconds(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "期望 {expected}，实际 {actual}"
        );
    }

    #[test]
    fn test_parse_time_rational() {
        assert_seconds(parse_time("1001/30000s"), 1001.0 / 30000.0);
        assert_seconds(parse_time("3600/2400s"), 1.5);
        assert_seconds(parse_time("100/1"), 100.0);
    }

    #[test]
    fn test_parse_time_decimal() {
        assert_seconds(parse_time("10s"), 10.0);
        assert_seconds(parse_time("0s"), 0.0);
        assert_seconds(parse_time("2.5s"), 2.5);
        assert_seconds(parse_time("7"), 7.0);
    }

    #[test]
    fn test_parse_time_never_fails() {
        assert_seconds(parse_time("not-a-time"), 0.0);
        assert_seconds(parse_time(""), 0.0);
        assert_seconds(parse_time("s"), 0.0);
        assert_seconds(parse_time("1/0s"), 0.0);
        assert_seconds(parse_time("a/2s"), 0.0);
        assert_seconds(parse_time("1/2/3s"), 0.0);
        assert_seconds(parse_time("infs"), 0.0);

        assert!(try_parse_time("not-a-time").is_none());
        assert!(try_parse_time("1/0s").is_none());
    }

    #[test]
    fn test_resolve_entity() {
        assert_eq!(resolve_entity("amp"), Some('&'));
        assert_eq!(resolve_entity("#38"), Some('&'));
        assert_eq!(resolve_entity("#x3042"), Some('あ'));
        assert_eq!(resolve_entity("nbsp"), None);
        assert_eq!(resolve_entity("#xZZ"), None);
    }
}

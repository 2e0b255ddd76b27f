// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

use std::collections::BTreeMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};
use serde_json::Value;

/// 百分号解码。`%XX` 还原为字节，非法序列原样保留，最终按 UTF-8 有损转换。
pub fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(h), Some(l)) = (hex_val(bytes[i + 1]), hex_val(bytes[i + 2])) {
                out.push(h << 4 | l);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// 查询字符串中的键或值：`+` 视为空格，再做百分号解码。
pub fn decode_query_component(input: &str) -> String {
    percent_decode(&input.replace('+', " "))
}

fn hex_val(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// 将 `a=1&b=2&a=3` 解析为保持原始顺序的键值对列表，重复的键全部保留。
pub fn parse_query(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|s| !s.is_empty())
        .map(|pair| {
            let mut parts = pair.splitn(2, '=');
            let key = parts.next().unwrap_or("");
            let value = parts.next().unwrap_or("");
            (decode_query_component(key), decode_query_component(value))
        })
        .collect()
}

/// 以 `map[key:[v1 v2] ...]` 的形式展示多值映射，键按字典序排列。
pub fn format_multi_map(pairs: &[(String, String)]) -> String {
    let mut grouped: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for (k, v) in pairs {
        grouped.entry(k.as_str()).or_default().push(v.as_str());
    }
    let body: Vec<String> = grouped
        .iter()
        .map(|(k, vs)| format!("{}:[{}]", k, vs.join(" ")))
        .collect();
    format!("map[{}]", body.join(" "))
}

/// 将耗时格式化为紧凑的文本形式，例如 `812ns`、`1.5µs`、`2.013ms`、`1m30s`。
pub fn format_duration(d: Duration) -> String {
    let nanos = d.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }
    if nanos < 1_000 {
        return format!("{}ns", nanos);
    }
    if nanos < 1_000_000 {
        return format!("{}µs", fixed_point(nanos, 1_000));
    }
    if nanos < 1_000_000_000 {
        return format!("{}ms", fixed_point(nanos, 1_000_000));
    }

    let total_secs = nanos / 1_000_000_000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let rest = nanos % 60_000_000_000;

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{}h", hours));
    }
    if hours > 0 || minutes > 0 {
        out.push_str(&format!("{}m", minutes));
    }
    out.push_str(&format!("{}s", fixed_point(rest, 1_000_000_000)));
    out
}

/// `value / unit`，小数部分去掉末尾的 0。
fn fixed_point(value: u128, unit: u128) -> String {
    let integer = value / unit;
    let frac = value % unit;
    if frac == 0 {
        return integer.to_string();
    }
    let width = unit.to_string().len() - 1;
    let digits = format!("{:0width$}", frac, width = width);
    format!("{}.{}", integer, digits.trim_end_matches('0'))
}

/// HTTP `Date` 头使用的 IMF-fixdate 格式。
pub fn http_date(date: &DateTime<Utc>) -> String {
    date.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// RFC 1123 格式的时间文本（用于纯文本接口）。
pub fn rfc1123(date: &DateTime<Utc>) -> String {
    date.format("%a, %d %b %Y %H:%M:%S UTC").to_string()
}

pub fn unix_nanos() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0)
}

/// 把 JSON 值编码为 XML 文本。
///
/// 对象的每个字段成为一个子元素，数组展开为同名的重复元素，`null` 输出为空元素。
pub fn to_xml(root: &str, value: &Value) -> String {
    let mut out = String::new();
    write_xml_element(&mut out, root, value);
    out
}

fn write_xml_element(out: &mut String, name: &str, value: &Value) {
    match value {
        Value::Array(items) => {
            for item in items {
                write_xml_element(out, name, item);
            }
        }
        Value::Object(map) => {
            out.push_str(&format!("<{}>", name));
            for (key, child) in map {
                write_xml_element(out, key, child);
            }
            out.push_str(&format!("</{}>", name));
        }
        Value::Null => out.push_str(&format!("<{}></{}>", name, name)),
        Value::String(s) => out.push_str(&format!("<{}>{}</{}>", name, escape_xml(s), name)),
        other => out.push_str(&format!("<{}>{}</{}>", name, other, name)),
    }
}

pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

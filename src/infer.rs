//! Cell Type Inference Module
//!
//! 生のセル値を意味的な型を持つJSON値に変換するモジュール。
//!
//! 判定は次の順序で行い、最初に一致した規則を採用します。
//!
//! 1. JSONリテラル（`[`/`{`で始まる、または`true`/`false`/`null`）
//! 2. セミコロン区切りのリスト
//! 3. 整数（`-?\d+`）
//! 4. 小数（`-?\d+\.\d+`）
//! 5. 文字列（元の値のまま）
//!
//! セル内容の解釈に失敗しても呼び出し側にエラーは返さず、次の規則にフォールバックします。

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Number, Value};

use crate::types::CellValue;

fn integer_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^-?[0-9]+$").expect("integer pattern is valid"))
}

fn decimal_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^-?[0-9]+\.[0-9]+$").expect("decimal pattern is valid"))
}

/// 浮動小数点数をJSON値に変換する
///
/// NaNや無限大はJSONで表現できないため`null`になります。
pub(crate) fn float_value(f: f64) -> Value {
    Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
}

/// セル値を型付きの値に変換する
///
/// # 引数
///
/// * `raw` - 解決済みのセル値（`None`はフィールドが存在しないことを表す）
///
/// # 戻り値
///
/// 推論された値。文字列以外のセルはそのままの型で返します。
///
/// # 使用例
///
/// ```rust
/// use serde_json::json;
/// use trainerpack::{infer_cell, CellValue};
///
/// let cell = CellValue::from("Fire; Flying");
/// assert_eq!(infer_cell(Some(&cell)), json!(["Fire", "Flying"]));
/// assert_eq!(infer_cell(Some(&CellValue::from("025"))), json!(25));
/// assert_eq!(infer_cell(None), json!(null));
/// ```
pub fn infer_cell(raw: Option<&CellValue>) -> Value {
    match raw {
        None | Some(CellValue::Null) => Value::Null,
        Some(CellValue::Bool(b)) => Value::Bool(*b),
        Some(CellValue::Int(i)) => Value::from(*i),
        Some(CellValue::Float(f)) => float_value(*f),
        Some(CellValue::String(s)) => infer_str(s),
    }
}

/// 文字列セルの内容から型を推論する
pub fn infer_str(raw: &str) -> Value {
    let s = raw.trim();
    if s.is_empty() {
        return Value::String(String::new());
    }

    if looks_like_json(s) {
        if let Ok(value) = serde_json::from_str::<Value>(s) {
            return value;
        }
    }

    if s.contains(';') {
        return split_list(s, ';');
    }

    if integer_pattern().is_match(s) {
        // i64に収まらない桁数は小数・文字列の判定に回す
        if let Ok(i) = s.parse::<i64>() {
            return Value::from(i);
        }
    }

    if decimal_pattern().is_match(s) {
        if let Ok(f) = s.parse::<f64>() {
            return float_value(f);
        }
    }

    // 分類には前後の空白を除いた値を使うが、文字列として返すのは元の値
    Value::String(raw.to_string())
}

fn looks_like_json(s: &str) -> bool {
    s.starts_with('[') || s.starts_with('{') || matches!(s, "true" | "false" | "null")
}

/// 区切り文字で分割し、前後の空白を除いて空要素を捨てた文字列リストを返す
pub(crate) fn split_list(s: &str, delimiter: char) -> Value {
    Value::Array(
        s.split(delimiter)
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| Value::String(part.to_string()))
            .collect(),
    )
}

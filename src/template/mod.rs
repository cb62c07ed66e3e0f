//! Template Rendering Module
//!
//! `{{NAME}}`形式のプレースホルダーを含むJSONテンプレートを再帰的に走査し、
//! 型付きの値で置き換えるモジュール。
//!
//! # 置換の規則
//!
//! - 文字列全体が1つのプレースホルダーの場合: 解決された値をそのままの型で返す
//!   （オブジェクト、配列、数値、文字列）
//! - それ以外の文字列: 埋め込まれた各プレースホルダーを文字列化した値で置換する
//!
//! 名前が`[A-Za-z0-9_]+`に一致しないトークンはプレースホルダーとして扱わず、
//! そのまま文字列として残します。

mod context;
mod set;

use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde_json::{Map, Value};

pub use context::{AttributeContext, GroupContext, TEAM_LIST_PLACEHOLDER};
pub use set::{TemplatePaths, TemplateSet};

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\{\{([A-Za-z0-9_]+)\}\}").expect("placeholder pattern is valid")
    })
}

fn whole_placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\{\{([A-Za-z0-9_]+)\}\}$").expect("placeholder pattern is valid")
    })
}

/// プレースホルダー名から値を解決するための境界
///
/// レンダラーはテンプレートの木構造だけを扱い、名前の解決はこのトレイトに委譲します。
/// 解決できない名前もエラーにはせず、空文字列などの既定値を返す実装にします。
pub trait PlaceholderContext {
    /// 文字列全体が1つのプレースホルダーの場合に使う、型付きの値
    fn resolve(&self, name: &str) -> Value;

    /// 文字列に埋め込まれたプレースホルダーの置換に使う文字列
    fn stringify(&self, name: &str) -> String {
        stringify_value(&self.resolve(name))
    }
}

/// 文字列全体が1つのプレースホルダーであれば、その名前を返す
pub fn whole_placeholder(s: &str) -> Option<&str> {
    whole_placeholder_pattern()
        .captures(s)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// 文字列中のプレースホルダーをすべて文字列化した値で置換する
pub fn interpolate<C: PlaceholderContext + ?Sized>(s: &str, context: &C) -> String {
    placeholder_pattern()
        .replace_all(s, |caps: &Captures<'_>| context.stringify(&caps[1]))
        .into_owned()
}

/// 文字列ノード1つを描画する
///
/// 木構造の再帰とは独立に、全体一致と埋め込みの区別を検証できるように分けています。
pub fn render_str<C: PlaceholderContext + ?Sized>(s: &str, context: &C) -> Value {
    match whole_placeholder(s) {
        Some(name) => context.resolve(name),
        None => Value::String(interpolate(s, context)),
    }
}

/// テンプレートを描画する
///
/// # 引数
///
/// * `template` - プレースホルダーを含むテンプレート（変更されません）
/// * `context` - プレースホルダー名の解決に使うコンテキスト
///
/// # 戻り値
///
/// 新しく構築された描画済みの木。オブジェクトのキーと順序はテンプレートのまま保持されます。
///
/// # 使用例
///
/// ```rust
/// use serde_json::json;
/// use trainerpack::{render, CellValue, GroupContext, Record};
///
/// let record = Record::from_pairs([("LEVEL", CellValue::from("5")), ("IDS", CellValue::from("[1,2,3]"))]);
/// let context = GroupContext::new(&record, &[]);
///
/// let template = json!({"ids": "{{IDS}}", "label": "Lv. {{LEVEL}}", "level": "{{LEVEL}}"});
/// assert_eq!(
///     render(&template, &context),
///     json!({"ids": [1, 2, 3], "label": "Lv. 5", "level": 5})
/// );
/// ```
pub fn render<C: PlaceholderContext + ?Sized>(template: &Value, context: &C) -> Value {
    match template {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, value)| (key.clone(), render(value, context)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(|v| render(v, context)).collect()),
        Value::String(s) => render_str(s, context),
        scalar => scalar.clone(),
    }
}

/// 値を埋め込み用の文字列に変換する
///
/// 文字列はそのまま、Nullは空文字列、配列・オブジェクトはコンパクトなJSON表記になります。
pub fn stringify_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

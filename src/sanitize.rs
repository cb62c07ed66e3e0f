//! Identifier Sanitizer Module
//!
//! 自由記述の名前（ポケモン名、技名、特性名、持ち物名）を、
//! ゲームアセットIDとして使える`[a-z0-9_]`のトークンに正規化するモジュール。

use std::sync::OnceLock;

use regex::Regex;

use crate::types::CellValue;

/// 空白の連続をどの文字列に置き換えるか
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    /// 空白を詰める（技名・特性名など。例: `"Water Gun"` → `"watergun"`）
    Tight,

    /// 空白をアンダースコアにする（持ち物名など。例: `"Choice Band"` → `"choice_band"`）
    Loose,
}

impl Separator {
    fn as_str(self) -> &'static str {
        match self {
            Separator::Tight => "",
            Separator::Loose => "_",
        }
    }
}

fn whitespace_run() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\s+").expect("whitespace pattern is valid"))
}

fn disallowed_identifier_chars() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^a-z0-9_]").expect("identifier pattern is valid"))
}

fn disallowed_file_chars() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^A-Za-z0-9._-]+").expect("file token pattern is valid"))
}

/// 識別子を正規化する
///
/// 1. 前後の空白を除去して小文字化
/// 2. 空白の連続を`separator`に置換
/// 3. `[a-z0-9_]`以外の文字を削除
///
/// # 使用例
///
/// ```rust
/// use trainerpack::{sanitize_identifier, Separator};
///
/// assert_eq!(sanitize_identifier("Ice-Beam", Separator::Tight), "icebeam");
/// assert_eq!(sanitize_identifier("Choice Band", Separator::Loose), "choice_band");
/// ```
pub fn sanitize_identifier(text: &str, separator: Separator) -> String {
    let lowered = text.trim().to_lowercase();
    let joined = whitespace_run().replace_all(&lowered, separator.as_str());
    disallowed_identifier_chars()
        .replace_all(&joined, "")
        .into_owned()
}

/// セル値を識別子として正規化する
///
/// フィールドが存在しない、またはNullの場合は空文字列を返します（エラーにはしません）。
pub fn sanitize_cell(cell: Option<&CellValue>, separator: Separator) -> String {
    match cell {
        None | Some(CellValue::Null) => String::new(),
        Some(value) => sanitize_identifier(&value.to_text(), separator),
    }
}

/// ファイル名として安全なトークンを生成する
///
/// `[A-Za-z0-9._-]`以外の文字の連続を`_`に置き換え、前後の`_`を取り除きます。
/// 出力ファイル名と前提条件リストの両方で使用します。
pub fn file_token(text: &str) -> String {
    disallowed_file_chars()
        .replace_all(text, "_")
        .trim_matches('_')
        .to_string()
}

//! Placeholder Contexts
//!
//! ロスター（グループ）用とエンティティ属性用の2種類のコンテキスト。

use serde_json::{Map, Value};

use super::{stringify_value, PlaceholderContext};
use crate::infer::infer_cell;
use crate::types::Record;

/// エンティティ（手持ちポケモン）リスト全体に展開される特別なプレースホルダー名
pub const TEAM_LIST_PLACEHOLDER: &str = "POKEMON_TEAM_LIST";

/// ロスターのメタデータレコードとエンティティリストに対するコンテキスト
///
/// - `POKEMON_TEAM_LIST`: エンティティリスト全体（文字列中ではJSON表記）
/// - それ以外: レコードのフィールドを解決し、型推論した値（存在しない場合は空文字列）
///
/// 文字列中に埋め込まれた場合は、型推論前のセルの生の値を文字列化します。
#[derive(Debug, Clone, Copy)]
pub struct GroupContext<'a> {
    record: &'a Record,
    entities: &'a [Value],
}

impl<'a> GroupContext<'a> {
    pub fn new(record: &'a Record, entities: &'a [Value]) -> Self {
        Self { record, entities }
    }
}

impl PlaceholderContext for GroupContext<'_> {
    fn resolve(&self, name: &str) -> Value {
        if name == TEAM_LIST_PLACEHOLDER {
            return Value::Array(self.entities.to_vec());
        }
        match self.record.resolve(name) {
            Some(cell) => infer_cell(Some(cell)),
            None => Value::String(String::new()),
        }
    }

    fn stringify(&self, name: &str) -> String {
        if name == TEAM_LIST_PLACEHOLDER {
            return Value::Array(self.entities.to_vec()).to_string();
        }
        self.record
            .resolve(name)
            .map(|cell| cell.to_text())
            .unwrap_or_default()
    }
}

/// エンティティ属性マップに対するコンテキスト
///
/// レコードへのフォールバックは行いません。存在しない属性は空文字列になります。
#[derive(Debug, Clone, Copy)]
pub struct AttributeContext<'a> {
    attributes: &'a Map<String, Value>,
}

impl<'a> AttributeContext<'a> {
    pub fn new(attributes: &'a Map<String, Value>) -> Self {
        Self { attributes }
    }
}

impl PlaceholderContext for AttributeContext<'_> {
    fn resolve(&self, name: &str) -> Value {
        self.attributes
            .get(name)
            .cloned()
            .unwrap_or_else(|| Value::String(String::new()))
    }

    fn stringify(&self, name: &str) -> String {
        self.attributes
            .get(name)
            .map(stringify_value)
            .unwrap_or_default()
    }
}

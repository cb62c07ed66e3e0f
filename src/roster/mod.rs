//! Roster Aggregation Module
//!
//! シートのレコードをロスターキー（バッジレベル）ごとにまとめ、
//! ロスター単位のメタデータとエンティティリストを組み立てるモジュール。
//!
//! # 処理の流れ
//!
//! 1. キー列と名前列を前方補完する（`fill::forward_fill`）
//! 2. キーでレコードを分割し、キーの昇順に並べる
//! 3. 先頭レコードを代表として名前・ファイルトークンを決める
//!
//! 前提条件は全シートのロスターが揃ってから決まるため、
//! メタデータの生成（`Roster::metadata`）は呼び出し側が第2パスで行います。

mod fill;
mod policy;

use std::collections::{BTreeMap, BTreeSet};

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entity::build_entity;
use crate::sanitize::file_token;
use crate::types::{CellValue, Record, Sheet};

pub use fill::forward_fill;
pub use policy::{NoPrerequisites, PrerequisitePolicy, RosterEntry, RosterIndex, TierPolicy};

/// ロスターの集計に使う列名
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterColumns {
    /// ロスターキー列
    pub key: String,
    /// リーダー名列
    pub name: String,
    /// `name`列が空の場合に使うリーダー名列
    pub name_fallback: String,
    /// 対戦形式列
    pub format: String,
}

impl Default for RosterColumns {
    fn default() -> Self {
        Self {
            key: "Badge Level".to_string(),
            name: "Leader Name".to_string(),
            name_fallback: "Leader".to_string(),
            format: "Format".to_string(),
        }
    }
}

/// 同じキーを持つレコードの集まり（1人のリーダーの手持ち）
#[derive(Debug, Clone, PartialEq)]
pub struct Roster {
    /// ロスターキー
    pub key: i64,
    /// 読み込み元のシート名
    pub sheet: String,
    /// 小文字化したリーダー名
    pub identifier: String,
    /// 表示名（`identifier`の先頭文字を大文字化）
    pub display_name: String,
    /// `file_token("<identifier>_<key>")`
    pub file_token: String,
    /// メタデータの元になる先頭レコード
    pub representative: Record,
    /// メンバーのレコード（元の順序）
    pub members: Vec<Record>,
    format_field: String,
}

impl Roster {
    /// メンバーごとにエンティティを構築する
    ///
    /// エンティティテンプレートがない場合は空のリストを返します。
    pub fn entities(&self, template: Option<&Value>) -> Vec<Value> {
        match template {
            Some(template) => self
                .members
                .iter()
                .map(|record| build_entity(record, template))
                .collect(),
            None => Vec::new(),
        }
    }

    /// テンプレート描画用のメタデータレコードを生成
    ///
    /// 代表レコードの全フィールドに、導出したフィールドを上書きして返します。
    pub fn metadata(&self, prerequisites: &[String], team_size: usize) -> Record {
        let mut record = self.representative.clone();

        let has_format = record
            .resolve("BATTLE_FORMAT")
            .map(|cell| !cell.is_blank())
            .unwrap_or(false);
        if !has_format {
            if let Some(format) = self.representative.resolve(&self.format_field) {
                record.set_resolved("BATTLE_FORMAT", format.clone());
            }
        }

        record.set_resolved("LEADER_NAME", CellValue::from(self.display_name.as_str()));
        record.set_resolved("LEADER_ID", CellValue::from(self.identifier.as_str()));
        record.set_resolved("ROSTER_FILE", CellValue::from(self.file_token.as_str()));
        record.set_resolved("BADGE_LEVEL", CellValue::Int(self.key));
        record.set_resolved("SHEET_NAME", CellValue::from(self.sheet.as_str()));
        // JSON表記で保持し、型推論でリストに戻す
        let prerequisites = Value::from(prerequisites.to_vec()).to_string();
        record.set_resolved("REQUIRED_PREREQUISITES", CellValue::from(prerequisites));
        record.set_resolved(
            "TEAM_SIZE",
            CellValue::Int(i64::try_from(team_size).unwrap_or(i64::MAX)),
        );

        record
    }
}

/// 先頭文字だけを大文字化
fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn is_label(cell: &CellValue, label: &str) -> bool {
    cell.to_text().trim().eq_ignore_ascii_case(label.trim())
}

/// 代表レコードからリーダー名を取得
fn leader_name<'r>(record: &'r Record, columns: &RosterColumns) -> Option<&'r CellValue> {
    [&columns.name, &columns.name_fallback]
        .into_iter()
        .filter_map(|field| record.resolve(field))
        .find(|cell| !cell.is_blank())
}

/// シートのレコードをロスターに集計する
///
/// # 引数
///
/// * `sheet` - 読み込み済みのシート
/// * `columns` - キー列・名前列・対戦形式列の名前
///
/// # 戻り値
///
/// キーの昇順に並んだロスターのリスト。次のレコード・グループは除外されます。
///
/// - 前方補完後もキーが空のレコード
/// - キーが列名そのもの（繰り返されたヘッダー行）のレコード
/// - キーを整数に変換できないレコード（警告を出力）
/// - リーダー名が列名そのもののグループ
pub fn group_rosters(sheet: &Sheet, columns: &RosterColumns) -> Vec<Roster> {
    let filled = forward_fill(
        &sheet.records,
        &[
            columns.key.as_str(),
            columns.name.as_str(),
            columns.name_fallback.as_str(),
        ],
    );

    let mut groups: BTreeMap<i64, Vec<Record>> = BTreeMap::new();
    let mut invalid_keys = BTreeSet::new();

    for record in filled {
        let Some(cell) = record.resolve(&columns.key).filter(|c| !c.is_blank()) else {
            continue;
        };
        if is_label(cell, &columns.key) {
            debug!("[{}] skipping repeated header row", sheet.name);
            continue;
        }
        match cell.as_integer() {
            Some(key) => groups.entry(key).or_default().push(record),
            None => {
                invalid_keys.insert(cell.to_text());
            }
        }
    }

    for key in invalid_keys {
        warn!(
            "[{}] skipping rows with non-integer {} '{}'",
            sheet.name, columns.key, key
        );
    }

    groups
        .into_iter()
        .filter_map(|(key, members)| {
            let representative = members.first()?.clone();

            let identifier = match leader_name(&representative, columns) {
                Some(cell) if is_label(cell, &columns.name) || is_label(cell, &columns.name_fallback) => {
                    debug!("[{}] dropping roster {} named after its header", sheet.name, key);
                    return None;
                }
                Some(cell) => cell.to_text().trim().to_lowercase(),
                None => format!("leader_{}", key),
            };

            Some(Roster {
                key,
                sheet: sheet.name.clone(),
                display_name: capitalize_first(&identifier),
                file_token: file_token(&format!("{}_{}", identifier, key)),
                identifier,
                representative,
                members,
                format_field: columns.format.clone(),
            })
        })
        .collect()
}

//! Entity Builder Module
//!
//! 1行分のレコードから手持ちポケモン1体分の属性マップを組み立て、
//! エンティティテンプレートを描画するモジュール。

use serde_json::{Map, Value};

use crate::infer::{infer_cell, split_list};
use crate::sanitize::{sanitize_cell, Separator};
use crate::template::{render, AttributeContext};
use crate::types::{CellValue, Record};

/// 個体値・努力値を展開するステータス名
pub const STATS: [&str; 6] = ["HP", "ATK", "DEF", "SPA", "SPD", "SPE"];

/// 技スロットの列数（`Slot 0`〜`Slot 4`）
const MOVE_SLOTS: usize = 5;

const DEFAULT_NATURE: &str = "docile";
const DEFAULT_GENDER: &str = "MALE";

/// 空でないセルを、前後の空白を除いた文字列として取得
fn present_text(record: &Record, field: &str) -> Option<String> {
    record
        .resolve(field)
        .filter(|cell| !cell.is_blank())
        .map(|cell| cell.to_text().trim().to_string())
}

/// レベル列（空の場合は空文字列）
fn level(record: &Record) -> Value {
    match record.resolve("Level") {
        Some(cell) if !cell.is_blank() => infer_cell(Some(cell)),
        _ => Value::String(String::new()),
    }
}

/// 見た目（アスペクト）のカンマ区切りリスト
///
/// 文字列・数値のセルだけを対象にし、それ以外は属性自体を作りません。
/// 空白だけの文字列は空のリストになります（長さ0の文字列とNaNは対象外）。
fn aspects(record: &Record) -> Option<Value> {
    match record.resolve("Aspect")? {
        CellValue::String(s) if s.is_empty() => None,
        CellValue::Float(f) if f.is_nan() => None,
        cell @ (CellValue::String(_) | CellValue::Int(_) | CellValue::Float(_)) => {
            Some(split_list(&cell.to_text(), ','))
        }
        _ => None,
    }
}

/// `Slot 0`〜`Slot 4`の技名を順に正規化
///
/// 空セル、Null、`false`のセル、および正規化後に空になる技名は捨てます。
fn moveset(record: &Record) -> Value {
    let moves = (0..MOVE_SLOTS)
        .filter_map(|slot| record.resolve(&format!("Slot {}", slot)))
        .filter(|cell| !cell.is_blank() && **cell != CellValue::Bool(false))
        .map(|cell| sanitize_cell(Some(cell), Separator::Tight))
        .filter(|name| !name.is_empty())
        .map(Value::String)
        .collect();
    Value::Array(moves)
}

/// 個体値・努力値
///
/// 数値の場合は整数（小数部は切り捨て）に、それ以外はそのまま渡します。
/// 論理値は数値として扱います（`true`は1、`false`は0）。
fn stat_value(record: &Record, field: &str) -> Value {
    match infer_cell(record.resolve(field)) {
        Value::Bool(b) => Value::from(i64::from(b)),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Value::from(i),
            (None, Some(f)) => Value::from(f.trunc() as i64),
            (None, None) => Value::Number(n),
        },
        other => other,
    }
}

/// レコードからエンティティの属性マップを組み立てる
///
/// 列が存在しない場合もエラーにはせず、既定値を使います。
pub fn entity_attributes(record: &Record) -> Map<String, Value> {
    let mut attributes = Map::new();

    attributes.insert(
        "POKEMON_NAME".to_string(),
        Value::String(sanitize_cell(record.resolve("Pokemon"), Separator::Tight)),
    );
    attributes.insert("POKEMON_LEVEL".to_string(), level(record));
    if let Some(aspects) = aspects(record) {
        attributes.insert("POKEMON_ASPECT_LIST".to_string(), aspects);
    }
    attributes.insert("POKEMON_MOVESET_LIST".to_string(), moveset(record));
    attributes.insert(
        "POKEMON_ABILITY".to_string(),
        Value::String(sanitize_cell(record.resolve("Ability"), Separator::Tight)),
    );
    attributes.insert(
        "POKEMON_HELD_ITEM".to_string(),
        Value::String(sanitize_cell(record.resolve("Item"), Separator::Loose)),
    );

    let nature = present_text(record, "Nature")
        .map(|s| s.to_lowercase())
        .unwrap_or_else(|| DEFAULT_NATURE.to_string());
    attributes.insert("POKEMON_NATURE".to_string(), Value::String(nature));

    let gender = present_text(record, "Gender")
        .map(|s| s.to_uppercase())
        .unwrap_or_else(|| DEFAULT_GENDER.to_string());
    attributes.insert("POKEMON_GENDER".to_string(), Value::String(gender));

    let ivs = stat_value(record, "IVs");
    let evs = stat_value(record, "EVs");
    for stat in STATS {
        attributes.insert(format!("POKEMON_IV_{}", stat), ivs.clone());
        attributes.insert(format!("POKEMON_EV_{}", stat), evs.clone());
    }

    attributes
}

/// レコードからエンティティを構築する
///
/// # 引数
///
/// * `record` - 手持ちポケモン1体分のレコード
/// * `template` - エンティティテンプレート
///
/// # 戻り値
///
/// 属性マップで描画したエンティティ。テンプレートにない属性は出力されず、
/// 属性にないプレースホルダーは空文字列になります。
pub fn build_entity(record: &Record, template: &Value) -> Value {
    let attributes = entity_attributes(record);
    render(template, &AttributeContext::new(&attributes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pikachu() -> Record {
        Record::from_pairs([
            ("Pokemon", CellValue::from("Pikachu")),
            ("Gender", CellValue::from("female")),
            ("Aspect", CellValue::from("shiny, , alolan")),
            ("Level", CellValue::Int(25)),
            ("Slot 0", CellValue::from("Tackle")),
            ("Slot 1", CellValue::from("")),
            ("Slot 2", CellValue::from("Water Gun")),
            ("Slot 3", CellValue::Null),
            ("Slot 4", CellValue::from("Ice-Beam")),
            ("Ability", CellValue::from("Lightning Rod")),
            ("Item", CellValue::from("Choice Band")),
            ("IVs", CellValue::Float(31.0)),
            ("EVs", CellValue::from("85")),
            ("Nature", CellValue::from("Timid")),
        ])
    }

    fn template() -> Value {
        json!({
            "species": "{{POKEMON_NAME}}",
            "level": "{{POKEMON_LEVEL}}",
            "aspects": "{{POKEMON_ASPECT_LIST}}",
            "moveset": "{{POKEMON_MOVESET_LIST}}",
            "ability": "{{POKEMON_ABILITY}}",
            "heldItem": "{{POKEMON_HELD_ITEM}}",
            "nature": "cobblemon:{{POKEMON_NATURE}}",
            "gender": "{{POKEMON_GENDER}}",
            "ivs": {"hp": "{{POKEMON_IV_HP}}", "spe": "{{POKEMON_IV_SPE}}"},
            "evs": {"atk": "{{POKEMON_EV_ATK}}", "spd": "{{POKEMON_EV_SPD}}"},
            "unknown": "{{POKEMON_SHINY}}"
        })
    }

    #[test]
    fn test_build_entity_full_row() {
        let entity = build_entity(&pikachu(), &template());
        assert_eq!(
            entity,
            json!({
                "species": "pikachu",
                "level": 25,
                "aspects": ["shiny", "alolan"],
                "moveset": ["tackle", "watergun", "icebeam"],
                "ability": "lightningrod",
                "heldItem": "choice_band",
                "nature": "cobblemon:timid",
                "gender": "FEMALE",
                "ivs": {"hp": 31, "spe": 31},
                "evs": {"atk": 85, "spd": 85},
                "unknown": ""
            })
        );
    }

    #[test]
    fn test_moveset_skips_empty_and_false_slots() {
        let record = Record::from_pairs([
            ("Slot 0", CellValue::Bool(false)),
            ("Slot 1", CellValue::from("   ")),
            ("slot 2", CellValue::from("Thunder Shock")),
            ("Slot 3", CellValue::from("!!!")),
        ]);
        assert_eq!(moveset(&record), json!(["thundershock"]));
    }

    #[test]
    fn test_defaults_for_missing_columns() {
        let record = Record::from_pairs([("Pokemon", CellValue::from("Mr. Mime"))]);
        let attributes = entity_attributes(&record);

        assert_eq!(attributes["POKEMON_NAME"], json!("mrmime"));
        assert_eq!(attributes["POKEMON_LEVEL"], json!(""));
        assert!(!attributes.contains_key("POKEMON_ASPECT_LIST"));
        assert_eq!(attributes["POKEMON_MOVESET_LIST"], json!([]));
        assert_eq!(attributes["POKEMON_ABILITY"], json!(""));
        assert_eq!(attributes["POKEMON_HELD_ITEM"], json!(""));
        assert_eq!(attributes["POKEMON_NATURE"], json!("docile"));
        assert_eq!(attributes["POKEMON_GENDER"], json!("MALE"));
        assert_eq!(attributes["POKEMON_IV_HP"], Value::Null);
        assert_eq!(attributes["POKEMON_EV_SPE"], Value::Null);
    }

    #[test]
    fn test_blank_nature_and_gender_use_defaults() {
        let record = Record::from_pairs([
            ("Nature", CellValue::from("  ")),
            ("Gender", CellValue::Null),
        ]);
        let attributes = entity_attributes(&record);
        assert_eq!(attributes["POKEMON_NATURE"], json!("docile"));
        assert_eq!(attributes["POKEMON_GENDER"], json!("MALE"));
    }

    #[test]
    fn test_numeric_aspect_and_bool_aspect() {
        let numeric = Record::from_pairs([("Aspect", CellValue::Int(2))]);
        assert_eq!(entity_attributes(&numeric)["POKEMON_ASPECT_LIST"], json!(["2"]));

        let boolean = Record::from_pairs([("Aspect", CellValue::Bool(true))]);
        assert!(!entity_attributes(&boolean).contains_key("POKEMON_ASPECT_LIST"));

        let nan = Record::from_pairs([("Aspect", CellValue::Float(f64::NAN))]);
        assert!(!entity_attributes(&nan).contains_key("POKEMON_ASPECT_LIST"));
    }

    #[test]
    fn test_whitespace_aspect_is_empty_list() {
        let spaces = Record::from_pairs([("Aspect", CellValue::from("  "))]);
        assert_eq!(entity_attributes(&spaces)["POKEMON_ASPECT_LIST"], json!([]));

        let commas = Record::from_pairs([("Aspect", CellValue::from(" , ,"))]);
        assert_eq!(entity_attributes(&commas)["POKEMON_ASPECT_LIST"], json!([]));

        let empty = Record::from_pairs([("Aspect", CellValue::from(""))]);
        assert!(!entity_attributes(&empty).contains_key("POKEMON_ASPECT_LIST"));

        let rendered = build_entity(&spaces, &json!({"aspects": "{{POKEMON_ASPECT_LIST}}"}));
        assert_eq!(rendered, json!({"aspects": []}));
    }

    #[test]
    fn test_bool_stat_values_become_numbers() {
        let record = Record::from_pairs([
            ("IVs", CellValue::Bool(true)),
            ("EVs", CellValue::Bool(false)),
        ]);
        let attributes = entity_attributes(&record);
        assert_eq!(attributes["POKEMON_IV_HP"], json!(1));
        assert_eq!(attributes["POKEMON_EV_SPE"], json!(0));
    }

    #[test]
    fn test_stat_values_are_truncated_or_passed_through() {
        let record = Record::from_pairs([
            ("IVs", CellValue::from("20.9")),
            ("EVs", CellValue::from("max")),
        ]);
        let attributes = entity_attributes(&record);
        for stat in STATS {
            assert_eq!(attributes[&format!("POKEMON_IV_{}", stat)], json!(20));
            assert_eq!(attributes[&format!("POKEMON_EV_{}", stat)], json!("max"));
        }
    }

    #[test]
    fn test_held_item_examples() {
        let leftovers = Record::from_pairs([("Item", CellValue::from("Leftovers"))]);
        assert_eq!(entity_attributes(&leftovers)["POKEMON_HELD_ITEM"], json!("leftovers"));

        let band = Record::from_pairs([("item", CellValue::from("Choice Band"))]);
        assert_eq!(entity_attributes(&band)["POKEMON_HELD_ITEM"], json!("choice_band"));
    }
}

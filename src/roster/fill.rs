//! Forward Fill
//!
//! 結合セルなどで空になっている列を、直前の行の値で埋める。

use crate::types::Record;

/// 指定した列を前方補完した新しいレコード列を返す
///
/// 列ごとに直前の空でない値を保持し、欠損（存在しない、Null、空白）のセルをその値で埋めます。
/// 入力のレコード列は変更しません。
pub fn forward_fill(records: &[Record], fields: &[&str]) -> Vec<Record> {
    let mut last = vec![None; fields.len()];

    records
        .iter()
        .map(|record| {
            let mut filled = record.clone();
            for (field, carried) in fields.iter().zip(last.iter_mut()) {
                match record.resolve(field) {
                    Some(cell) if !cell.is_blank() => *carried = Some(cell.clone()),
                    _ => {
                        if let Some(value) = carried {
                            filled.set_resolved(field, value.clone());
                        }
                    }
                }
            }
            filled
        })
        .collect()
}

//! Workbook Parser
//!
//! calamineのラッパーとして、シートの選択とレコード列への変換を提供します。

use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, ExcelDateTime, Reader, Sheets, Xlsx};
use chrono::NaiveTime;
use log::{debug, warn};

use crate::api::SheetSelector;
use crate::error::TrainerPackError;
use crate::security::SecurityConfig;
use crate::types::{CellValue, Record, Sheet};

/// ワークブックパーサー
pub struct WorkbookParser {
    /// calamineのワークブック（XLSX形式のみサポート）
    workbook: Xlsx<Cursor<Vec<u8>>>,
}

impl WorkbookParser {
    /// ファイルパスからワークブックを開く
    ///
    /// # 戻り値
    ///
    /// * `Ok(WorkbookParser)` - 読み込みに成功した場合
    /// * `Err(TrainerPackError::MissingInput)` - ファイルが存在しない場合
    /// * `Err(TrainerPackError)` - その他のエラーが発生した場合
    pub fn open_path(path: &Path) -> Result<Self, TrainerPackError> {
        if !path.is_file() {
            return Err(TrainerPackError::MissingInput {
                kind: "workbook",
                path: path.to_path_buf(),
            });
        }
        Self::open(File::open(path)?)
    }

    /// ワークブックを開く
    ///
    /// 入力全体をメモリに読み込み、サイズ上限を確認してからcalamineに渡します。
    ///
    /// # 戻り値
    ///
    /// * `Ok(WorkbookParser)` - 読み込みに成功した場合
    /// * `Err(TrainerPackError::SecurityViolation)` - 入力サイズが上限を超える場合
    /// * `Err(TrainerPackError::Parse)` - ワークブックとして読み込めない場合
    /// * `Err(TrainerPackError::Config)` - XLSX形式でない場合
    pub fn open<R: Read>(mut reader: R) -> Result<Self, TrainerPackError> {
        let security_config = SecurityConfig::default();

        let mut buffer = Vec::new();
        let bytes_read = reader.read_to_end(&mut buffer)?;

        if bytes_read as u64 > security_config.max_input_file_size {
            return Err(TrainerPackError::SecurityViolation(format!(
                "Input file size exceeds maximum: {} bytes (max: {} bytes)",
                bytes_read, security_config.max_input_file_size
            )));
        }

        let sheets = open_workbook_auto_from_rs(Cursor::new(buffer)).map_err(TrainerPackError::Parse)?;
        match sheets {
            Sheets::Xlsx(workbook) => Ok(Self { workbook }),
            _ => Err(TrainerPackError::Config(
                "Only XLSX format is supported".to_string(),
            )),
        }
    }

    /// すべてのシート名を取得
    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names().to_vec()
    }

    /// シート選択方式に基づいてシートを選択
    ///
    /// # 戻り値
    ///
    /// * `Ok(Vec<String>)` - 選択されたシート名のリスト（選択方式の順序）
    /// * `Err(TrainerPackError::Config)` - 明示的に指定したシートが見つからない、
    ///   またはインデックスが範囲外の場合
    pub fn select_sheets(&self, selector: &SheetSelector) -> Result<Vec<String>, TrainerPackError> {
        let all_sheet_names = self.sheet_names();

        let by_index = |index: usize| {
            all_sheet_names.get(index).cloned().ok_or_else(|| {
                TrainerPackError::Config(format!(
                    "Sheet index {} is out of range (total: {})",
                    index,
                    all_sheet_names.len()
                ))
            })
        };
        let by_name = |name: &String| {
            if all_sheet_names.contains(name) {
                Ok(name.clone())
            } else {
                Err(TrainerPackError::Config(format!("Sheet '{}' not found", name)))
            }
        };

        match selector {
            SheetSelector::All => Ok(all_sheet_names.clone()),
            SheetSelector::Index(index) => Ok(vec![by_index(*index)?]),
            SheetSelector::Name(name) => Ok(vec![by_name(name)?]),
            SheetSelector::Indices(indices) => indices.iter().map(|&i| by_index(i)).collect(),
            SheetSelector::Names(names) => names.iter().map(by_name).collect(),
            SheetSelector::AnyOf(names) => Ok(names
                .iter()
                .filter(|name| {
                    let found = all_sheet_names.contains(name);
                    if !found {
                        warn!("Sheet '{}' not found in workbook, skipping", name);
                    }
                    found
                })
                .cloned()
                .collect()),
        }
    }

    /// シートを読み込み、ヘッダー行をフィールド名とするレコード列に変換
    ///
    /// - 空のヘッダーは`Unnamed: <列番号>`、重複したヘッダーは`<名前>.<n>`になります
    /// - すべてのセルが空の行はスキップします
    pub fn read_sheet(&mut self, sheet_name: &str) -> Result<Sheet, TrainerPackError> {
        let range = self
            .workbook
            .worksheet_range(sheet_name)
            .map_err(|e| TrainerPackError::Parse(e.into()))?;

        let mut rows = range.rows();
        let Some(header_row) = rows.next() else {
            debug!("[{}] sheet is empty", sheet_name);
            return Ok(Sheet::new(sheet_name, Vec::new()));
        };
        let headers = header_names(header_row);

        let records = rows
            .map(|row| {
                Record::from_pairs(
                    headers
                        .iter()
                        .enumerate()
                        .map(|(i, name)| {
                            let value = row.get(i).map(convert_cell).unwrap_or(CellValue::Null);
                            (name.clone(), value)
                        }),
                )
            })
            .filter(|record| !record.is_blank())
            .collect::<Vec<_>>();

        debug!("[{}] read {} records", sheet_name, records.len());
        Ok(Sheet::new(sheet_name, records))
    }
}

/// ヘッダー行からフィールド名を作る
fn header_names(row: &[Data]) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(row.len());
    for (i, cell) in row.iter().enumerate() {
        let base = match convert_cell(cell) {
            value if value.is_blank() => format!("Unnamed: {}", i),
            value => value.to_text(),
        };
        let mut name = base.clone();
        let mut suffix = 1;
        while names.contains(&name) {
            name = format!("{}.{}", base, suffix);
            suffix += 1;
        }
        names.push(name);
    }
    names
}

/// calamineのセルを`CellValue`に変換
///
/// 整数値の浮動小数点数は`Int`として扱います（Excelは数値をすべて浮動小数点数で保持するため）。
pub(crate) fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Null,
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => float_cell(*f),
        Data::String(s) => CellValue::String(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => datetime_cell(dt),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::String(s.clone()),
    }
}

fn float_cell(f: f64) -> CellValue {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        CellValue::Int(f as i64)
    } else {
        CellValue::Float(f)
    }
}

/// Excelが扱える最大のシリアル値（9999-12-31）
const MAX_DATE_SERIAL: f64 = 2_958_466.0;

/// 日付セルをISO 8601形式の文字列に変換
///
/// 時刻部分がない場合は`YYYY-MM-DD`、ある場合は`YYYY-MM-DDTHH:MM:SS`になります。
/// 1900年・1904年のどちらの日付システムもcalamineが解決します。
/// 経過時間（duration）のセルと、日付として表せないシリアル値は数値として扱います。
fn datetime_cell(dt: &ExcelDateTime) -> CellValue {
    let serial = dt.as_f64();
    if dt.is_duration() || !(0.0..MAX_DATE_SERIAL).contains(&serial) {
        return float_cell(serial);
    }
    match dt.as_datetime() {
        Some(datetime) if datetime.time() == NaiveTime::MIN => {
            CellValue::String(datetime.date().format("%Y-%m-%d").to_string())
        }
        Some(datetime) => CellValue::String(datetime.format("%Y-%m-%dT%H:%M:%S").to_string()),
        None => float_cell(serial),
    }
}

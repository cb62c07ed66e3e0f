//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。
//! ワークブックから読み込んだセル値（`CellValue`）、行（`Record`）、シート（`Sheet`）を扱います。

/// セルの値を表す列挙型
///
/// ワークブック読み込み時に確定する閉じた型です。
/// 型推論（`crate::infer`）はこの列挙型に対してのみ動作します。
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// 空セル・欠損値
    Null,

    /// 論理値
    Bool(bool),

    /// 整数
    Int(i64),

    /// 浮動小数点数
    Float(f64),

    /// 文字列
    String(String),
}

impl CellValue {
    /// 値がNullかどうかを判定
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// 値が「空」かどうかを判定
    ///
    /// Null、空白のみの文字列、NaNを空とみなします。
    /// 前方補完（forward-fill）やデフォルト値の適用判定に使用します。
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::String(s) => s.trim().is_empty(),
            CellValue::Float(f) => f.is_nan(),
            CellValue::Bool(_) | CellValue::Int(_) => false,
        }
    }

    /// 値を文字列として取得（型推論前の生の表現）
    ///
    /// 埋め込みプレースホルダーの置換で使用します。
    /// 整数値の浮動小数点数は小数部なしで出力します（例: `50.0` → `"50"`）。
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Int(i) => i.to_string(),
            CellValue::Float(f) => {
                if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                    (*f as i64).to_string()
                } else {
                    f.to_string()
                }
            }
            CellValue::String(s) => s.clone(),
        }
    }

    /// 値を整数に変換（グループキー用）
    ///
    /// `Int`、整数値の`Float`、整数表記の文字列（`"3"`, `"3.0"`）を受け付けます。
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            CellValue::Int(i) => Some(*i),
            CellValue::Float(f) if f.is_finite() && f.fract() == 0.0 => Some(*f as i64),
            CellValue::String(s) => {
                let s = s.trim();
                s.parse::<i64>().ok().or_else(|| {
                    s.parse::<f64>()
                        .ok()
                        .filter(|f| f.is_finite() && f.fract() == 0.0)
                        .map(|f| f as i64)
                })
            }
            _ => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

/// フィールド名の比較用正規化（前後の空白除去 + 小文字化）
fn normalize_field_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// 1行分のデータ（フィールド名 → セル値の順序付きマッピング）
///
/// フィールド名の大文字・小文字や前後の空白はレコードごとに揺れることがあるため、
/// 参照には`resolve`を使用します。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, CellValue)>,
}

impl Record {
    /// 空のレコードを生成
    pub fn new() -> Self {
        Self::default()
    }

    /// (フィールド名, 値) のペア列からレコードを生成
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<CellValue>,
    {
        let mut record = Self::new();
        for (name, value) in pairs {
            record.insert(name, value);
        }
        record
    }

    /// フィールドを追加する
    ///
    /// 同名（完全一致）のフィールドが既にある場合は値を置き換えます。
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<CellValue>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    /// `resolve`と同じ規則で見つかったフィールドの値を置き換える
    ///
    /// 該当するフィールドがない場合は`name`で新規追加します。
    /// 前方補完で、既存の列名の表記を保ったまま値を埋めるために使用します。
    pub fn set_resolved(&mut self, name: &str, value: CellValue) {
        match self.position_of(name) {
            Some(idx) => self.fields[idx].1 = value,
            None => self.fields.push((name.trim().to_string(), value)),
        }
    }

    /// フィールド名で値を解決する
    ///
    /// 1. 前後の空白を除いたフィールド名の完全一致を優先
    /// 2. 大文字・小文字と前後の空白を無視した一致（フィールド順で最初のもの）
    /// 3. 見つからない場合は`None`（デフォルト値は呼び出し側が決める）
    pub fn resolve(&self, name: &str) -> Option<&CellValue> {
        self.position_of(name).map(|idx| &self.fields[idx].1)
    }

    fn position_of(&self, name: &str) -> Option<usize> {
        let trimmed = name.trim();
        if let Some(idx) = self.fields.iter().position(|(n, _)| n == trimmed) {
            return Some(idx);
        }

        let wanted = normalize_field_name(name);
        self.fields
            .iter()
            .position(|(n, _)| normalize_field_name(n) == wanted)
    }

    /// フィールドを順序どおりに走査
    pub fn fields(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// フィールド数
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// フィールドが1つもないかどうか
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// すべての値が空かどうか（空行の判定用）
    pub fn is_blank(&self) -> bool {
        self.fields.iter().all(|(_, v)| v.is_blank())
    }
}

/// ワークブックの1シート分のレコード列
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    /// シート名
    pub name: String,

    /// ヘッダー行を除いたデータ行（元の順序を保持）
    pub records: Vec<Record>,
}

impl Sheet {
    /// 新しいシートを生成
    pub fn new(name: impl Into<String>, records: Vec<Record>) -> Self {
        Self {
            name: name.into(),
            records,
        }
    }

    /// 指定したフィールドを持つレコードが1つでもあるか
    pub fn has_column(&self, name: &str) -> bool {
        self.records.iter().any(|r| r.resolve(name).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> Record {
        Record::from_pairs([
            ("Pokemon", CellValue::from("Pikachu")),
            (" Level ", CellValue::Int(50)),
            ("IVs", CellValue::Float(31.0)),
            ("Aspect", CellValue::Null),
        ])
    }

    #[test]
    fn test_cell_value_is_blank() {
        assert!(CellValue::Null.is_blank());
        assert!(CellValue::from("   ").is_blank());
        assert!(CellValue::Float(f64::NAN).is_blank());
        assert!(!CellValue::Int(0).is_blank());
        assert!(!CellValue::Bool(false).is_blank());
        assert!(!CellValue::from("x").is_blank());
    }

    #[test]
    fn test_cell_value_to_text() {
        assert_eq!(CellValue::Null.to_text(), "");
        assert_eq!(CellValue::Int(-3).to_text(), "-3");
        assert_eq!(CellValue::Float(50.0).to_text(), "50");
        assert_eq!(CellValue::Float(0.5).to_text(), "0.5");
        assert_eq!(CellValue::Bool(true).to_text(), "true");
        assert_eq!(CellValue::from(" raw ").to_text(), " raw ");
    }

    #[test]
    fn test_cell_value_as_integer() {
        assert_eq!(CellValue::Int(3).as_integer(), Some(3));
        assert_eq!(CellValue::Float(3.0).as_integer(), Some(3));
        assert_eq!(CellValue::Float(3.5).as_integer(), None);
        assert_eq!(CellValue::from(" 7 ").as_integer(), Some(7));
        assert_eq!(CellValue::from("8.0").as_integer(), Some(8));
        assert_eq!(CellValue::from("Badge Level").as_integer(), None);
        assert_eq!(CellValue::Null.as_integer(), None);
    }

    #[test]
    fn test_record_resolve_exact_and_fallback() {
        let record = sample_record();

        assert_eq!(record.resolve("Pokemon"), Some(&CellValue::from("Pikachu")));
        // 大文字・小文字と空白を無視
        assert_eq!(record.resolve("POKEMON"), Some(&CellValue::from("Pikachu")));
        assert_eq!(record.resolve("level"), Some(&CellValue::Int(50)));
        assert_eq!(record.resolve("  ivs"), Some(&CellValue::Float(31.0)));
        assert_eq!(record.resolve("Aspect"), Some(&CellValue::Null));
        assert_eq!(record.resolve("Nature"), None);
    }

    #[test]
    fn test_record_resolve_prefers_exact_match() {
        let record = Record::from_pairs([
            ("level", CellValue::Int(1)),
            ("Level", CellValue::Int(2)),
        ]);

        assert_eq!(record.resolve("Level"), Some(&CellValue::Int(2)));
        // 完全一致がない場合はフィールド順で最初の一致
        assert_eq!(record.resolve("LEVEL"), Some(&CellValue::Int(1)));
    }

    #[test]
    fn test_record_insert_replaces_exact_name() {
        let mut record = sample_record();
        record.insert("Pokemon", "Raichu");
        assert_eq!(record.len(), 4);
        assert_eq!(record.resolve("Pokemon"), Some(&CellValue::from("Raichu")));
    }

    #[test]
    fn test_record_set_resolved_keeps_original_column_name() {
        let mut record = sample_record();
        record.set_resolved("level", CellValue::Int(60));

        let names: Vec<&str> = record.fields().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Pokemon", " Level ", "IVs", "Aspect"]);
        assert_eq!(record.resolve("Level"), Some(&CellValue::Int(60)));

        record.set_resolved("Nature", CellValue::from("Bold"));
        assert_eq!(record.len(), 5);
    }

    #[test]
    fn test_record_is_blank() {
        assert!(Record::from_pairs([("A", CellValue::Null), ("B", CellValue::from(" "))]).is_blank());
        assert!(!sample_record().is_blank());
    }

    #[test]
    fn test_sheet_has_column() {
        let sheet = Sheet::new("Fire", vec![sample_record()]);
        assert!(sheet.has_column("pokemon"));
        assert!(!sheet.has_column("Badge Level"));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            // 大文字・小文字、前後の空白に依存せず同じ値が解決される
            #[test]
            fn test_resolve_is_case_and_trim_insensitive(
                names in proptest::collection::btree_set("[a-z][a-z0-9 ]{0,8}[a-z0-9]", 1..6),
                pick in 0usize..6,
            ) {
                let names: Vec<String> = names.into_iter().collect();
                let record = Record::from_pairs(
                    names.iter().enumerate().map(|(i, n)| (n.clone(), CellValue::Int(i as i64))),
                );
                let field = &names[pick % names.len()];

                let expected = record.resolve(field);
                prop_assert!(expected.is_some());
                prop_assert_eq!(record.resolve(&field.to_uppercase()), expected);
                prop_assert_eq!(record.resolve(&format!(" {} ", field)), expected);
            }
        }
    }
}

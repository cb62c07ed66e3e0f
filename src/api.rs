//! Public API Types
//!
//! 公開APIで使用する列挙型と定数を定義するモジュール。

use std::fmt;

/// 既定で変換するシート（タイプ別の18シート）
pub const DEFAULT_SHEETS: [&str; 18] = [
    "Normal", "Fire", "Water", "Grass", "Electric", "Ice", "Fighting", "Poison", "Ground",
    "Flying", "Psychic", "Bug", "Rock", "Ghost", "Dragon", "Dark", "Steel", "Fairy",
];

/// シート選択方式
///
/// 変換対象のシートを選択する方法を指定します。
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SheetSelector {
    /// すべてのシートを変換
    All,

    /// インデックス指定（0始まり）
    Index(usize),

    /// シート名指定
    Name(String),

    /// 複数のインデックス指定
    Indices(Vec<usize>),

    /// 複数のシート名指定（存在しないシートはエラー）
    Names(Vec<String>),

    /// 存在するシートだけを選ぶシート名指定（存在しないシートは警告してスキップ）
    ///
    /// `SheetSelector::default()`は`DEFAULT_SHEETS`に対するこの選択方式です。
    AnyOf(Vec<String>),
}

impl Default for SheetSelector {
    fn default() -> Self {
        SheetSelector::AnyOf(DEFAULT_SHEETS.iter().map(|s| s.to_string()).collect())
    }
}

impl SheetSelector {
    /// コマンドラインや設定ファイルのシート名リストから選択方式を決める
    ///
    /// - 空のリスト、または`all`（大文字・小文字を問わない）を含む: 既定の18シート
    /// - それ以外: 指定したシート名
    ///
    /// ワークブックのすべてのシートを対象にするには`SheetSelector::All`を直接使います。
    pub fn from_names(names: &[String]) -> Self {
        if names.is_empty() || names.iter().any(|n| n.trim().eq_ignore_ascii_case("all")) {
            SheetSelector::default()
        } else {
            SheetSelector::Names(names.to_vec())
        }
    }
}

/// 出力ファイルの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[non_exhaustive]
pub enum OutputKind {
    /// ジムリーダー（ロスター）定義
    Roster,

    /// モブトレーナーグループ定義
    Squad,

    /// 進行（アドバンスメント）定義
    Progression,

    /// トレーナータイプ定義（テンプレートをそのままコピー）
    TrainerType,
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputKind::Roster => "roster",
            OutputKind::Squad => "squad",
            OutputKind::Progression => "progression",
            OutputKind::TrainerType => "trainer type",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_selector_is_soft_type_list() {
        match SheetSelector::default() {
            SheetSelector::AnyOf(names) => {
                assert_eq!(names.len(), 18);
                assert_eq!(names[0], "Normal");
                assert_eq!(names[17], "Fairy");
            }
            other => panic!("Expected AnyOf, got {:?}", other),
        }
    }

    #[test]
    fn test_from_names() {
        assert_eq!(SheetSelector::from_names(&[]), SheetSelector::default());
        assert_eq!(
            SheetSelector::from_names(&["Fire".to_string(), "ALL".to_string()]),
            SheetSelector::default()
        );
        assert_eq!(
            SheetSelector::from_names(&["all".to_string()]),
            SheetSelector::default()
        );
        assert_eq!(
            SheetSelector::from_names(&["Fire".to_string()]),
            SheetSelector::Names(vec!["Fire".to_string()])
        );
    }

    #[test]
    fn test_output_kind_display() {
        assert_eq!(OutputKind::Roster.to_string(), "roster");
        assert_eq!(OutputKind::TrainerType.to_string(), "trainer type");
    }
}

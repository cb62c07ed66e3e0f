//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use std::path::PathBuf;

use thiserror::Error;

/// trainerpackクレート全体で使用するエラー型
///
/// ワークブックの読み込み、テンプレートの読み込み、パックの書き出し中に
/// 発生するエラーを統一的に扱います。
///
/// セル値の解釈失敗やプレースホルダーの未解決はエラーになりません。
/// それぞれ推論規則のフォールバックと空文字列で吸収されます。
///
/// # エラーの種類
///
/// - `Io`: I/O操作中に発生したエラー
/// - `Parse`: ワークブックの解析中に発生したエラー（calamine由来）
/// - `MissingInput`: 必須の入力（ワークブック、ロスターテンプレート）が存在しない
/// - `Template`: テンプレートファイルのJSONが不正
/// - `Config`: 設定の検証に失敗したエラー
///
/// # 使用例
///
/// ```rust,no_run
/// use trainerpack::TrainerPackError;
/// use std::fs::File;
///
/// fn open_workbook(path: &str) -> Result<File, TrainerPackError> {
///     let file = File::open(path)?; // Ioエラーが自動的に変換される
///     Ok(file)
/// }
/// ```
#[derive(Error, Debug)]
pub enum TrainerPackError {
    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ワークブックの解析中に発生したエラー
    ///
    /// calamineがファイルを解析する際に発生したエラーです。
    #[error("Failed to parse workbook: {0}")]
    Parse(#[from] calamine::Error),

    /// JSONのシリアライズ・デシリアライズエラー
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// テンプレートファイルの解析エラー
    ///
    /// どのテンプレートが壊れているかを示すため、パスを保持します。
    #[error("Invalid template '{}': {source}", path.display())]
    Template {
        /// テンプレートファイルのパス
        path: PathBuf,
        /// serde_json由来のエラー
        source: serde_json::Error,
    },

    /// 必須入力が存在しないエラー
    ///
    /// ワークブックやロスターテンプレートが見つからない場合に発生します。
    /// 後続の処理が意味を持たないため、実行全体を中断します。
    #[error("Missing {kind}: '{}'", path.display())]
    MissingInput {
        /// 入力の種類（例: "roster template"）
        kind: &'static str,
        /// 探索したパス
        path: PathBuf,
    },

    /// ZIPアーカイブの書き出しエラー
    #[error("ZIP archive error: {0}")]
    Zip(String),

    /// 設定ファイル（TOML）の解析エラー
    #[error("Settings error: {0}")]
    Toml(#[from] toml::de::Error),

    /// 設定の検証に失敗したエラー
    ///
    /// `PackBuilder::build()`時の検証や、存在しないシートの指定などで発生します。
    ///
    /// # 例
    ///
    /// ```rust,no_run
    /// use trainerpack::{PackBuilder, TrainerPackError};
    ///
    /// let result = PackBuilder::new().with_group_key_column("  ").build();
    ///
    /// match result {
    ///     Err(TrainerPackError::Config(msg)) => {
    ///         println!("設定エラー: {}", msg);
    ///     }
    ///     _ => {}
    /// }
    /// ```
    #[error("Configuration error: {0}")]
    Config(String),

    /// セキュリティ制限に違反したエラー
    ///
    /// 入力ファイルサイズの上限超過や、パック内の不正なパスなどで発生します。
    #[error("Security violation: {0}")]
    SecurityViolation(String),
}

impl From<zip::result::ZipError> for TrainerPackError {
    fn from(e: zip::result::ZipError) -> Self {
        TrainerPackError::Zip(e.to_string())
    }
}

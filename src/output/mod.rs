//! Output Module
//!
//! 描画済みの出力をパックのレイアウトに従って書き出すモジュール。
//! 出力先（ディレクトリ、ZIPアーカイブ）はenumで表現し、各ライターに振り分けます。

mod writers;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::OutputKind;
use crate::error::TrainerPackError;
use crate::security::{validate_pack_path, SecurityConfig};

pub use writers::{DirectoryWriter, ZipPackWriter};

/// 出力パックのディレクトリ構成とファイル名の規則
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackLayout {
    pub roster_dir: String,
    pub squad_dir: String,
    /// スクワッドのファイル名の接頭辞
    pub squad_prefix: String,
    pub progression_dir: String,
    pub trainer_type_dir: String,
    /// トレーナータイプのファイル名（拡張子なし）
    pub trainer_type_file: String,
}

impl Default for PackLayout {
    fn default() -> Self {
        Self {
            roster_dir: "trainers".to_string(),
            squad_dir: "mobs/trainers/groups".to_string(),
            squad_prefix: "chickencoopleader_".to_string(),
            progression_dir: "advancements".to_string(),
            trainer_type_dir: "trainer_types".to_string(),
            trainer_type_file: "gymleader_chickencoop".to_string(),
        }
    }
}

impl PackLayout {
    /// 出力ルートからの相対パスを返す
    ///
    /// `name`はロスターのファイルトークンです。トレーナータイプでは使用しません。
    pub fn relative_path(&self, kind: OutputKind, name: &str) -> String {
        let join = |dir: &str, file: String| {
            let dir = dir.trim_matches('/');
            if dir.is_empty() {
                file
            } else {
                format!("{}/{}", dir, file)
            }
        };
        match kind {
            OutputKind::Roster => join(&self.roster_dir, format!("{}.json", name)),
            OutputKind::Squad => join(
                &self.squad_dir,
                format!("{}{}.json", self.squad_prefix, name),
            ),
            OutputKind::Progression => join(&self.progression_dir, format!("{}.json", name)),
            OutputKind::TrainerType => join(
                &self.trainer_type_dir,
                format!("{}.json", self.trainer_type_file),
            ),
        }
    }
}

/// 描画済みの出力1件
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedOutput {
    pub kind: OutputKind,
    /// ロスターのファイルトークン（トレーナータイプでは空）
    pub name: String,
    /// 読み込み元のシート名（トレーナータイプでは`None`）
    pub sheet: Option<String>,
    pub tree: Value,
}

impl RenderedOutput {
    pub fn new(kind: OutputKind, name: impl Into<String>, sheet: Option<String>, tree: Value) -> Self {
        Self {
            kind,
            name: name.into(),
            sheet,
            tree,
        }
    }
}

/// 書き出し用に直列化したエントリ（相対パス, 内容）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackEntry {
    pub path: String,
    pub contents: Vec<u8>,
}

/// 出力をパスの検証と直列化まで済ませたエントリに変換する
///
/// JSONは2スペースのインデントで整形し、末尾に改行を付けます。
/// すべてのエントリの準備が成功してから書き込みを始めるため、途中で失敗した場合は何も書き込まれません。
pub fn prepare_entries(
    layout: &PackLayout,
    outputs: &[RenderedOutput],
) -> Result<Vec<PackEntry>, TrainerPackError> {
    let security_config = SecurityConfig::default();
    if outputs.len() > security_config.max_output_files {
        return Err(TrainerPackError::SecurityViolation(format!(
            "Too many output files: {} (max: {})",
            outputs.len(),
            security_config.max_output_files
        )));
    }

    outputs
        .iter()
        .map(|output| {
            let path = layout.relative_path(output.kind, &output.name);
            validate_pack_path(&path).map_err(TrainerPackError::SecurityViolation)?;

            let mut contents = serde_json::to_vec_pretty(&output.tree)?;
            contents.push(b'\n');
            Ok(PackEntry { path, contents })
        })
        .collect()
}

/// 出力先
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackSink {
    /// 出力ルートディレクトリ
    Directory(PathBuf),
    /// ZIPアーカイブのパス
    Zip(PathBuf),
}

impl PackSink {
    /// エントリを出力先に書き込む
    ///
    /// # 戻り値
    ///
    /// * `Ok(usize)` - 書き込んだファイル数
    /// * `Err(TrainerPackError)` - I/OエラーまたはZIPエラーが発生した場合
    pub fn write(&self, entries: &[PackEntry]) -> Result<usize, TrainerPackError> {
        match self {
            PackSink::Directory(root) => DirectoryWriter::new(root).write(entries),
            PackSink::Zip(path) => ZipPackWriter::new(path).write(entries),
        }
    }
}

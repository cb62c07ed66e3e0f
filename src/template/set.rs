//! Template Set
//!
//! 実行ごとに1回だけ読み込むテンプレート群。

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TrainerPackError;

/// テンプレートファイルのパス
///
/// ロスターテンプレートのみ必須で、それ以外は存在しなければ該当する出力を生成しません。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplatePaths {
    /// ジムリーダー（ロスター）テンプレート
    pub roster: PathBuf,
    /// ポケモン（エンティティ）テンプレート
    pub entity: PathBuf,
    /// モブトレーナーグループ（スクワッド）テンプレート
    pub squad: PathBuf,
    /// 進行（アドバンスメント）テンプレート
    pub progression: PathBuf,
    /// トレーナータイプテンプレート（置換せずにそのままコピー）
    pub trainer_type: PathBuf,
}

impl Default for TemplatePaths {
    fn default() -> Self {
        Self {
            roster: PathBuf::from("templates/gym_leader_template.json"),
            entity: PathBuf::from("templates/pokemon_template.json"),
            squad: PathBuf::from("templates/mob_trainer_group_template.json"),
            progression: PathBuf::from("templates/advancement_template.json"),
            trainer_type: PathBuf::from("templates/trainer_type_template.json"),
        }
    }
}

/// 読み込み済みのテンプレート群
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateSet {
    pub roster: Value,
    pub entity: Option<Value>,
    pub squad: Option<Value>,
    pub progression: Option<Value>,
    pub trainer_type: Option<Value>,
}

impl TemplateSet {
    /// ロスターテンプレートだけを持つテンプレート群を生成
    pub fn new(roster: Value) -> Self {
        Self {
            roster,
            entity: None,
            squad: None,
            progression: None,
            trainer_type: None,
        }
    }

    pub fn with_entity(mut self, template: Value) -> Self {
        self.entity = Some(template);
        self
    }

    pub fn with_squad(mut self, template: Value) -> Self {
        self.squad = Some(template);
        self
    }

    pub fn with_progression(mut self, template: Value) -> Self {
        self.progression = Some(template);
        self
    }

    pub fn with_trainer_type(mut self, template: Value) -> Self {
        self.trainer_type = Some(template);
        self
    }

    /// テンプレートファイルを読み込む
    ///
    /// # 戻り値
    ///
    /// * `Ok(TemplateSet)` - 読み込みに成功した場合
    /// * `Err(TrainerPackError::MissingInput)` - ロスターテンプレートが存在しない場合
    /// * `Err(TrainerPackError::Template)` - いずれかのテンプレートのJSONが不正な場合
    pub fn load(paths: &TemplatePaths) -> Result<Self, TrainerPackError> {
        if !paths.roster.is_file() {
            return Err(TrainerPackError::MissingInput {
                kind: "roster template",
                path: paths.roster.clone(),
            });
        }

        Ok(Self {
            roster: read_template(&paths.roster)?,
            entity: load_optional(&paths.entity)?,
            squad: load_optional(&paths.squad)?,
            progression: load_optional(&paths.progression)?,
            trainer_type: load_optional(&paths.trainer_type)?,
        })
    }
}

fn load_optional(path: &Path) -> Result<Option<Value>, TrainerPackError> {
    if !path.is_file() {
        debug!("optional template not found, skipping: {}", path.display());
        return Ok(None);
    }
    read_template(path).map(Some)
}

fn read_template(path: &Path) -> Result<Value, TrainerPackError> {
    let content = fs::read_to_string(path)?;
    // UTF-8 BOM付きのファイルも受け付ける
    let content = content.trim_start_matches('\u{FEFF}');
    serde_json::from_str(content).map_err(|source| TrainerPackError::Template {
        path: path.to_path_buf(),
        source,
    })
}

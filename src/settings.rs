//! Settings Module
//!
//! TOML形式の設定ファイルを読み込むモジュール。
//! 値の優先順位は「コマンドライン引数 > 設定ファイル > デフォルト値」です。
//!
//! # 設定ファイルの例
//!
//! ```toml
//! input = "trainers.xlsx"
//! sheets = ["Fire", "Water"]
//! output_dir = "output_jsons"
//! zip = "dist/trainer_pack.zip"
//!
//! [templates]
//! roster = "templates/gym_leader_template.json"
//! entity = "templates/pokemon_template.json"
//!
//! [columns]
//! key = "Badge Level"
//! name = "Leader Name"
//!
//! [prerequisites]
//! elite_tier = 9
//! elite_cap = 8
//!
//! [layout]
//! squad_prefix = "chickencoopleader_"
//! trainer_type_file = "gymleader_chickencoop"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::api::SheetSelector;
use crate::builder::PackBuilder;
use crate::error::TrainerPackError;
use crate::output::{PackLayout, PackSink};
use crate::roster::{RosterColumns, TierPolicy};
use crate::template::TemplatePaths;

/// 前提条件の規則の設定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrerequisiteSettings {
    pub elite_tier: i64,
    pub elite_cap: usize,
}

impl Default for PrerequisiteSettings {
    fn default() -> Self {
        Self {
            elite_tier: TierPolicy::DEFAULT_ELITE_TIER,
            elite_cap: TierPolicy::DEFAULT_ELITE_CAP,
        }
    }
}

/// 実行設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// 入力ワークブック
    pub input: PathBuf,
    /// 変換するシート（空または`all`なら既定の18シート）
    pub sheets: Vec<String>,
    /// 出力ルートディレクトリ
    pub output_dir: PathBuf,
    /// ZIPアーカイブの出力先（指定した場合のみ作成）
    pub zip: Option<PathBuf>,
    pub templates: TemplatePaths,
    pub columns: RosterColumns,
    pub prerequisites: PrerequisiteSettings,
    pub layout: PackLayout,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input: PathBuf::from("trainers.xlsx"),
            sheets: Vec::new(),
            output_dir: PathBuf::from("output_jsons"),
            zip: None,
            templates: TemplatePaths::default(),
            columns: RosterColumns::default(),
            prerequisites: PrerequisiteSettings::default(),
            layout: PackLayout::default(),
        }
    }
}

/// コマンドライン引数による上書き
///
/// `None`（または空のリスト）の項目は設定ファイルの値を使います。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsOverrides {
    pub input: Option<PathBuf>,
    pub sheets: Vec<String>,
    pub output_dir: Option<PathBuf>,
    pub zip: Option<PathBuf>,
    pub roster_template: Option<PathBuf>,
    pub entity_template: Option<PathBuf>,
    pub squad_template: Option<PathBuf>,
    pub progression_template: Option<PathBuf>,
    pub trainer_type_template: Option<PathBuf>,
}

impl Settings {
    /// TOML文字列から設定を読み込む
    pub fn from_toml_str(content: &str) -> Result<Self, TrainerPackError> {
        Ok(toml::from_str(content)?)
    }

    /// 設定ファイルを読み込む
    ///
    /// # 戻り値
    ///
    /// * `Ok(Settings)` - 読み込みに成功した場合
    /// * `Err(TrainerPackError::MissingInput)` - ファイルが存在しない場合
    /// * `Err(TrainerPackError::Toml)` - TOMLとして不正な場合
    pub fn load(path: &Path) -> Result<Self, TrainerPackError> {
        if !path.is_file() {
            return Err(TrainerPackError::MissingInput {
                kind: "settings file",
                path: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// コマンドライン引数で上書きした設定を返す
    pub fn with_overrides(mut self, overrides: SettingsOverrides) -> Self {
        fn set<T>(slot: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *slot = value;
            }
        }

        set(&mut self.input, overrides.input);
        if !overrides.sheets.is_empty() {
            self.sheets = overrides.sheets;
        }
        set(&mut self.output_dir, overrides.output_dir);
        if overrides.zip.is_some() {
            self.zip = overrides.zip;
        }
        set(&mut self.templates.roster, overrides.roster_template);
        set(&mut self.templates.entity, overrides.entity_template);
        set(&mut self.templates.squad, overrides.squad_template);
        set(&mut self.templates.progression, overrides.progression_template);
        set(&mut self.templates.trainer_type, overrides.trainer_type_template);
        self
    }

    /// シート選択方式
    pub fn sheet_selector(&self) -> SheetSelector {
        SheetSelector::from_names(&self.sheets)
    }

    /// 設定を反映したビルダー
    pub fn to_builder(&self) -> PackBuilder {
        PackBuilder::new()
            .with_sheet_selector(self.sheet_selector())
            .with_columns(self.columns.clone())
            .with_elite_tier(self.prerequisites.elite_tier)
            .with_elite_cap(self.prerequisites.elite_cap)
            .with_layout(self.layout.clone())
    }

    /// 出力先（ディレクトリと、指定されていればZIPアーカイブ）
    pub fn sinks(&self) -> Vec<PackSink> {
        let mut sinks = vec![PackSink::Directory(self.output_dir.clone())];
        if let Some(zip) = &self.zip {
            sinks.push(PackSink::Zip(zip.clone()));
        }
        sinks
    }
}

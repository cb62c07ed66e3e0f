//! Builder Module
//!
//! Fluent Builder APIを提供し、`PackConverter`インスタンスを段階的に構築する。

use std::collections::HashMap;
use std::io::Read;
use std::sync::Arc;

use log::{info, warn};
use rayon::prelude::*;

use crate::api::{OutputKind, SheetSelector};
use crate::error::TrainerPackError;
use crate::output::{prepare_entries, PackLayout, PackSink, RenderedOutput};
use crate::parser::WorkbookParser;
use crate::roster::{
    group_rosters, PrerequisitePolicy, Roster, RosterColumns, RosterEntry, RosterIndex, TierPolicy,
};
use crate::template::{render, GroupContext, TemplateSet};
use crate::types::Sheet;

/// 変換処理の設定を保持する内部構造体
#[derive(Debug, Clone)]
pub(crate) struct PackConfig {
    /// シート選択方式
    pub sheet_selector: SheetSelector,

    /// ロスターの集計に使う列名
    pub columns: RosterColumns,

    /// 既定の前提条件規則の設定
    pub tier_policy: TierPolicy,

    /// 既定の規則を置き換える前提条件規則
    pub custom_policy: Option<Arc<dyn PrerequisitePolicy>>,

    /// 出力パックのレイアウト
    pub layout: PackLayout,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            sheet_selector: SheetSelector::default(),
            columns: RosterColumns::default(),
            tier_policy: TierPolicy::default(),
            custom_policy: None,
            layout: PackLayout::default(),
        }
    }
}

/// Fluent Builder APIを提供する構造体
///
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust,no_run
/// use trainerpack::{PackBuilder, SheetSelector};
///
/// # fn main() -> Result<(), trainerpack::TrainerPackError> {
/// let converter = PackBuilder::new()
///     .with_sheet_selector(SheetSelector::Name("Fire".to_string()))
///     .with_elite_tier(10)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct PackBuilder {
    config: PackConfig,
}

impl PackBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - シート選択: タイプ別の18シート（存在しないシートはスキップ）
    /// - 列名: `Badge Level` / `Leader Name`（代替: `Leader`）/ `Format`
    /// - 前提条件: 1つ下のキーのロスター、キー9は8件まで
    /// - レイアウト: `PackLayout::default()`
    pub fn new() -> Self {
        Self::default()
    }

    /// 変換対象のシートを選択する
    pub fn with_sheet_selector(mut self, selector: SheetSelector) -> Self {
        self.config.sheet_selector = selector;
        self
    }

    /// ロスターキー列の名前を指定する
    pub fn with_group_key_column(mut self, name: impl Into<String>) -> Self {
        self.config.columns.key = name.into();
        self
    }

    /// リーダー名列の名前を指定する
    pub fn with_name_column(mut self, name: impl Into<String>) -> Self {
        self.config.columns.name = name.into();
        self
    }

    /// リーダー名列が空の場合に使う列の名前を指定する
    pub fn with_name_fallback_column(mut self, name: impl Into<String>) -> Self {
        self.config.columns.name_fallback = name.into();
        self
    }

    /// 対戦形式列の名前を指定する
    pub fn with_format_column(mut self, name: impl Into<String>) -> Self {
        self.config.columns.format = name.into();
        self
    }

    /// 列名をまとめて指定する
    pub fn with_columns(mut self, columns: RosterColumns) -> Self {
        self.config.columns = columns;
        self
    }

    /// 精鋭扱いにするロスターキーを指定する
    pub fn with_elite_tier(mut self, tier: i64) -> Self {
        self.config.tier_policy.elite_tier = tier;
        self
    }

    /// 精鋭ロスターの前提条件の上限件数を指定する
    pub fn with_elite_cap(mut self, cap: usize) -> Self {
        self.config.tier_policy.elite_cap = cap;
        self
    }

    /// 前提条件の規則を置き換える
    ///
    /// 指定した場合、`with_elite_tier`と`with_elite_cap`の設定は使用されません。
    pub fn with_prerequisite_policy<P: PrerequisitePolicy + 'static>(mut self, policy: P) -> Self {
        self.config.custom_policy = Some(Arc::new(policy));
        self
    }

    /// 出力パックのレイアウトを指定する
    pub fn with_layout(mut self, layout: PackLayout) -> Self {
        self.config.layout = layout;
        self
    }

    /// 設定を検証し、`PackConverter`インスタンスを生成する
    ///
    /// # 発生し得るエラー
    ///
    /// * `TrainerPackError::Config(String)`: 設定の検証に失敗した場合
    ///   * キー列・リーダー名列の名前が空
    ///   * 精鋭ロスターの上限件数が0
    ///   * トレーナータイプのファイル名が空
    pub fn build(self) -> Result<PackConverter, TrainerPackError> {
        let columns = &self.config.columns;
        if columns.key.trim().is_empty() {
            return Err(TrainerPackError::Config(
                "Group key column name must not be empty".to_string(),
            ));
        }
        if columns.name.trim().is_empty() {
            return Err(TrainerPackError::Config(
                "Leader name column name must not be empty".to_string(),
            ));
        }

        if self.config.custom_policy.is_none() && self.config.tier_policy.elite_cap == 0 {
            return Err(TrainerPackError::Config(
                "Elite cap must be at least 1".to_string(),
            ));
        }

        if self.config.layout.trainer_type_file.trim().is_empty() {
            return Err(TrainerPackError::Config(
                "Trainer type file name must not be empty".to_string(),
            ));
        }

        Ok(PackConverter::new(self.config))
    }
}

/// 1回の変換の集計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    /// 処理したシート数（キー列のないシートを除く）
    pub sheets: usize,
    /// 生成したロスター数
    pub rosters: usize,
    /// 出力先1つあたりに書き込んだファイル数
    pub files: usize,
}

/// 変換処理のファサード
///
/// ワークブックを読み込み、2パスでロスターを集計・描画して出力先に書き込みます。
///
/// 1. 第1パス: 全シートのロスターを集計し、`RosterIndex`を構築
/// 2. 第2パス: ロスターごとにエンティティと各テンプレートを並列に描画
///
/// # 使用例
///
/// ```rust,no_run
/// use std::fs::File;
/// use std::path::PathBuf;
/// use trainerpack::{PackBuilder, PackSink, TemplatePaths, TemplateSet};
///
/// # fn main() -> Result<(), trainerpack::TrainerPackError> {
/// let converter = PackBuilder::new().build()?;
/// let templates = TemplateSet::load(&TemplatePaths::default())?;
/// let input = File::open("trainers.xlsx")?;
/// let sinks = [PackSink::Directory(PathBuf::from("output_jsons"))];
/// let summary = converter.convert(input, &templates, &sinks)?;
/// println!("{} rosters", summary.rosters);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PackConverter {
    config: PackConfig,
    policy: Arc<dyn PrerequisitePolicy>,
}

impl PackConverter {
    pub(crate) fn new(config: PackConfig) -> Self {
        let policy = match &config.custom_policy {
            Some(policy) => Arc::clone(policy),
            None => Arc::new(config.tier_policy) as Arc<dyn PrerequisitePolicy>,
        };
        Self { config, policy }
    }

    /// 出力パックのレイアウト
    pub fn layout(&self) -> &PackLayout {
        &self.config.layout
    }

    /// ワークブックから選択されたシートを読み込む
    ///
    /// # 戻り値
    ///
    /// * `Ok(Vec<Sheet>)` - 選択方式の順序で読み込んだシート
    /// * `Err(TrainerPackError)` - 読み込みエラー、または明示的に指定したシートが存在しない場合
    pub fn read_sheets<R: Read>(&self, input: R) -> Result<Vec<Sheet>, TrainerPackError> {
        let mut parser = WorkbookParser::open(input)?;
        let sheet_names = parser.select_sheets(&self.config.sheet_selector)?;

        sheet_names
            .iter()
            .map(|name| {
                info!("Processing sheet: {}", name);
                parser.read_sheet(name)
            })
            .collect()
    }

    /// 第1パス: 全シートのロスターを集計する
    ///
    /// キー列のないシートは警告を出してスキップします。
    pub fn collect_rosters(&self, sheets: &[Sheet]) -> Vec<Roster> {
        let key = &self.config.columns.key;
        sheets
            .iter()
            .filter(|sheet| {
                let usable = sheet.has_column(key);
                if !usable {
                    warn!("[{}] no '{}' column, skipping sheet", sheet.name, key);
                }
                usable
            })
            .flat_map(|sheet| {
                let rosters = group_rosters(sheet, &self.config.columns);
                info!("[{}] {} rosters", sheet.name, rosters.len());
                rosters
            })
            .collect()
    }

    /// シートを描画済みの出力に変換する
    ///
    /// # 戻り値
    ///
    /// ロスター順（シート順、シート内はキーの昇順）の出力。
    /// 各ロスターはロスター・スクワッド・進行の順に並び、最後にトレーナータイプが続きます。
    /// テンプレートが読み込まれていない種類の出力は含まれません。
    pub fn convert_sheets(&self, sheets: &[Sheet], templates: &TemplateSet) -> Vec<RenderedOutput> {
        let rosters = self.collect_rosters(sheets);
        let index: RosterIndex = rosters.iter().collect();
        warn_duplicate_tokens(&index);

        let mut rendered: Vec<(usize, Vec<RenderedOutput>)> = rosters
            .par_iter()
            .enumerate()
            .map(|(idx, roster)| (idx, self.render_roster(roster, &index, templates)))
            .collect();

        // 並列処理の順序に依存しないようにロスター順に並べ直す
        rendered.sort_by_key(|(idx, _)| *idx);

        let mut outputs: Vec<RenderedOutput> =
            rendered.into_iter().flat_map(|(_, outputs)| outputs).collect();

        if let Some(trainer_type) = &templates.trainer_type {
            outputs.push(RenderedOutput::new(
                OutputKind::TrainerType,
                "",
                None,
                trainer_type.clone(),
            ));
        }
        outputs
    }

    /// 第2パス: ロスター1件分の出力を描画する
    fn render_roster(
        &self,
        roster: &Roster,
        index: &RosterIndex,
        templates: &TemplateSet,
    ) -> Vec<RenderedOutput> {
        let entities = roster.entities(templates.entity.as_ref());
        let prerequisites = self.policy.prerequisites(&RosterEntry::from(roster), index);
        let metadata = roster.metadata(&prerequisites, roster.members.len());
        let context = GroupContext::new(&metadata, &entities);

        [
            (OutputKind::Roster, Some(&templates.roster)),
            (OutputKind::Squad, templates.squad.as_ref()),
            (OutputKind::Progression, templates.progression.as_ref()),
        ]
        .into_iter()
        .filter_map(|(kind, template)| {
            template.map(|template| {
                RenderedOutput::new(
                    kind,
                    roster.file_token.clone(),
                    Some(roster.sheet.clone()),
                    render(template, &context),
                )
            })
        })
        .collect()
    }

    /// ワークブックを変換し、すべての出力先に書き込む
    ///
    /// すべての描画とパスの検証が成功してから書き込みを始めます。
    ///
    /// # 引数
    ///
    /// * `input` - ワークブックを読み込むためのリーダー
    /// * `templates` - 読み込み済みのテンプレート群
    /// * `sinks` - 出力先（ディレクトリ、ZIPアーカイブ）
    pub fn convert<R: Read>(
        &self,
        input: R,
        templates: &TemplateSet,
        sinks: &[PackSink],
    ) -> Result<ConversionSummary, TrainerPackError> {
        let sheets = self.read_sheets(input)?;
        let outputs = self.convert_sheets(&sheets, templates);
        let entries = prepare_entries(&self.config.layout, &outputs)?;

        let mut summary = ConversionSummary {
            sheets: sheets
                .iter()
                .filter(|s| s.has_column(&self.config.columns.key))
                .count(),
            rosters: outputs
                .iter()
                .filter(|o| o.kind == OutputKind::Roster)
                .count(),
            files: 0,
        };

        for sink in sinks {
            summary.files = sink.write(&entries)?;
        }

        info!(
            "Successfully created {} roster files from {} sheets",
            summary.rosters, summary.sheets
        );
        Ok(summary)
    }
}

/// 同じファイルトークンを持つロスターは後のものが先の出力を上書きする
fn warn_duplicate_tokens(index: &RosterIndex) {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    for entry in index.entries() {
        *seen.entry(entry.file_token.as_str()).or_default() += 1;
    }
    let mut duplicates: Vec<&str> = seen
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(token, _)| token)
        .collect();
    duplicates.sort_unstable();
    for token in duplicates {
        warn!("Duplicate roster file '{}', later rosters overwrite earlier ones", token);
    }
}

//! Prerequisite Policy
//!
//! 全シートを走査して作るロスター索引と、そこから各ロスターの前提条件を導く規則。

use std::fmt;

use super::Roster;

/// ロスター索引の1エントリ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    /// ロスターキー（バッジレベル）
    pub key: i64,
    /// 小文字化したリーダー名
    pub identifier: String,
    /// 出力ファイル名と前提条件リストに使うトークン
    pub file_token: String,
}

impl RosterEntry {
    pub fn new(key: i64, identifier: impl Into<String>, file_token: impl Into<String>) -> Self {
        Self {
            key,
            identifier: identifier.into(),
            file_token: file_token.into(),
        }
    }
}

impl From<&Roster> for RosterEntry {
    fn from(roster: &Roster) -> Self {
        Self::new(roster.key, roster.identifier.clone(), roster.file_token.clone())
    }
}

/// 第1パスで構築する、全シート分のロスター索引
///
/// エントリは走査順（シート順、シート内はキーの昇順）に保持します。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterIndex {
    entries: Vec<RosterEntry>,
}

impl RosterIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: RosterEntry) {
        self.entries.push(entry);
    }

    /// 指定したキーのエントリを走査順に返す
    pub fn at_tier(&self, key: i64) -> impl Iterator<Item = &RosterEntry> {
        self.entries.iter().filter(move |e| e.key == key)
    }

    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> FromIterator<&'a Roster> for RosterIndex {
    fn from_iter<I: IntoIterator<Item = &'a Roster>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(RosterEntry::from).collect(),
        }
    }
}

/// ロスターの前提条件（先に倒しておくべきロスター）を決める規則
///
/// 戻り値はロスターのファイルトークンのリストです。
pub trait PrerequisitePolicy: Send + Sync + fmt::Debug {
    fn prerequisites(&self, roster: &RosterEntry, index: &RosterIndex) -> Vec<String>;
}

/// 1つ下のキーのロスターを前提条件とする規則
///
/// - キー`k`のロスター: キー`k-1`の他のロスターすべて（自身と同名のものを除く）
/// - キーが`elite_tier`のロスター: キー`k-1`のロスターを走査順に`elite_cap`件まで
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierPolicy {
    pub elite_tier: i64,
    pub elite_cap: usize,
}

impl TierPolicy {
    pub const DEFAULT_ELITE_TIER: i64 = 9;
    pub const DEFAULT_ELITE_CAP: usize = 8;

    pub fn new(elite_tier: i64, elite_cap: usize) -> Self {
        Self {
            elite_tier,
            elite_cap,
        }
    }
}

impl Default for TierPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ELITE_TIER, Self::DEFAULT_ELITE_CAP)
    }
}

impl PrerequisitePolicy for TierPolicy {
    fn prerequisites(&self, roster: &RosterEntry, index: &RosterIndex) -> Vec<String> {
        let Some(previous) = roster.key.checked_sub(1) else {
            return Vec::new();
        };

        let candidates = index.at_tier(previous);
        let candidates: Vec<&RosterEntry> = if roster.key == self.elite_tier {
            candidates.take(self.elite_cap).collect()
        } else {
            candidates.collect()
        };

        candidates
            .into_iter()
            .filter(|e| e.identifier != roster.identifier)
            .map(|e| e.file_token.clone())
            .collect()
    }
}

/// 前提条件を一切付けない規則
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoPrerequisites;

impl PrerequisitePolicy for NoPrerequisites {
    fn prerequisites(&self, _roster: &RosterEntry, _index: &RosterIndex) -> Vec<String> {
        Vec::new()
    }
}

//! 品番→ベンダー索引
//!
//! 実行ごとに一度だけ構築し、以降は読み取り専用。
//! 照合は正規化キーの完全一致のみ。

use crate::columns::{cell, is_blank, ColumnSelection, MappingTable};
use crate::error::{Error, Result};
use crate::normalize::NormalizeOptions;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 同じキーに別ベンダーが割り当てられた場合の扱い
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictPolicy {
    /// 後の行で上書き
    #[default]
    LastWins,
    /// 最初の行を維持
    FirstWins,
    /// 索引構築を失敗させる
    Reject,
}

impl std::str::FromStr for ConflictPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "last-wins" | "last" => Ok(ConflictPolicy::LastWins),
            "first-wins" | "first" => Ok(ConflictPolicy::FirstWins),
            "reject" | "error" => Ok(ConflictPolicy::Reject),
            _ => Err(format!(
                "Unknown conflict policy: {}. Use last-wins, first-wins, or reject",
                s
            )),
        }
    }
}

impl std::fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConflictPolicy::LastWins => write!(f, "last-wins"),
            ConflictPolicy::FirstWins => write!(f, "first-wins"),
            ConflictPolicy::Reject => write!(f, "reject"),
        }
    }
}

/// キー衝突の記録
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyConflict {
    pub key: String,
    pub existing: String,
    pub incoming: String,
    /// 方針適用後に残ったベンダー
    pub kept: String,
}

/// 索引構築オプション
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexOptions {
    pub normalize: NormalizeOptions,
    pub conflict_policy: ConflictPolicy,
}

/// 正規化キー→ベンダー名
#[derive(Debug, Clone, Default)]
pub struct VendorIndex {
    entries: HashMap<String, String>,
    conflicts: Vec<KeyConflict>,
    skipped_rows: usize,
}

impl VendorIndex {
    /// 表から索引を構築
    ///
    /// ベンダー欄が空（または nan/None 等）の行は品番が入っていても丸ごと無視する。
    pub fn build(
        table: &MappingTable,
        selection: &ColumnSelection,
        options: &IndexOptions,
    ) -> Result<Self> {
        let mut index = Self::default();

        for row in &table.rows {
            let vendor = cell(row, selection.vendor).trim();
            if is_blank(vendor) {
                index.skipped_rows += 1;
                continue;
            }

            for &column in &selection.keys {
                let value = cell(row, column);
                if is_blank(value) {
                    continue;
                }

                let key = options.normalize.normalize(value);
                if key.is_empty() {
                    continue;
                }
                index.insert(key, vendor, options.conflict_policy)?;
            }
        }

        Ok(index)
    }

    /// 正規化済みのキーから直接作成
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            ..Default::default()
        }
    }

    fn insert(&mut self, key: String, vendor: &str, policy: ConflictPolicy) -> Result<()> {
        let Some(existing) = self.entries.get(&key) else {
            self.entries.insert(key, vendor.to_string());
            return Ok(());
        };

        if existing == vendor {
            return Ok(());
        }

        let existing = existing.clone();
        let kept = match policy {
            ConflictPolicy::LastWins => vendor.to_string(),
            ConflictPolicy::FirstWins => existing.clone(),
            ConflictPolicy::Reject => {
                return Err(Error::KeyConflict {
                    key,
                    existing,
                    incoming: vendor.to_string(),
                });
            }
        };

        self.conflicts.push(KeyConflict {
            key: key.clone(),
            existing,
            incoming: vendor.to_string(),
            kept: kept.clone(),
        });
        self.entries.insert(key, kept);
        Ok(())
    }

    /// 正規化キーでベンダーを引く（完全一致）
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 構築中に検出した衝突
    pub fn conflicts(&self) -> &[KeyConflict] {
        &self.conflicts
    }

    /// ベンダー欄が空で無視した行数
    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    /// 登録されているベンダー名（重複なし・昇順）
    pub fn vendors(&self) -> Vec<&str> {
        let mut vendors: Vec<&str> = self.entries.values().map(|s| s.as_str()).collect();
        vendors.sort();
        vendors.dedup();
        vendors
    }
}

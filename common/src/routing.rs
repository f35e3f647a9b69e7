//! ページ振り分け
//!
//! 各ページを「ベンダー別」「混在」「未照合」のどれか1つだけに割り当てる。
//! ベンダー別はベンダーごとに1ファイルへまとめ、混在・未照合は1ページ1ファイル。

use crate::classify::{Decision, PageDecision, PageRef};
use regex::Regex;
use std::collections::{HashMap, HashSet};

/// 混在ページの振り分け先名
pub const MIXED: &str = "MIXED";
/// 未照合ページの振り分け先名
pub const UNMATCHED: &str = "UNMATCHED";

/// 振り分け先
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Destination {
    Vendor(String),
    Mixed,
    Unmatched,
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Destination::Vendor(vendor) => write!(f, "{}", vendor),
            Destination::Mixed => write!(f, "{}", MIXED),
            Destination::Unmatched => write!(f, "{}", UNMATCHED),
        }
    }
}

/// 出力ファイル1つ分
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub destination: Destination,
    /// 出力ファイル名（ディレクトリなし）
    pub file_name: String,
    /// 収録ページ（処理順）
    pub pages: Vec<PageRef>,
}

/// 実行結果の集計
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total_pages: usize,
    pub routed: usize,
    pub mixed: usize,
    pub unmatched: usize,
    /// ベンダー別ページ数（初出順）
    pub per_vendor: Vec<(String, usize)>,
}

/// 振り分け結果の蓄積
///
/// ベンダーの枠は最初にページが来た時点で作る。ベンダー名は表の表記のまま
/// （大文字小文字を区別）キーにする。
#[derive(Debug, Clone, Default)]
pub struct RoutingPlan {
    vendors: Vec<(String, Vec<PageRef>)>,
    vendor_slots: HashMap<String, usize>,
    mixed: Vec<PageRef>,
    unmatched: Vec<PageRef>,
}

impl RoutingPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// ページを1つの振り分け先に割り当てる
    pub fn route(&mut self, page: &PageDecision) -> Destination {
        match &page.decision {
            Decision::Routed { vendor, .. } => {
                let slot = match self.vendor_slots.get(vendor) {
                    Some(&slot) => slot,
                    None => {
                        self.vendors.push((vendor.clone(), Vec::new()));
                        let slot = self.vendors.len() - 1;
                        self.vendor_slots.insert(vendor.clone(), slot);
                        slot
                    }
                };
                self.vendors[slot].1.push(page.page.clone());
                Destination::Vendor(vendor.clone())
            }
            Decision::Mixed { .. } => {
                self.mixed.push(page.page.clone());
                Destination::Mixed
            }
            Decision::Unmatched => {
                self.unmatched.push(page.page.clone());
                Destination::Unmatched
            }
        }
    }

    /// ベンダー別のページ（初出順）
    pub fn vendor_pages(&self) -> impl Iterator<Item = (&str, &[PageRef])> {
        self.vendors
            .iter()
            .map(|(vendor, pages)| (vendor.as_str(), pages.as_slice()))
    }

    pub fn mixed(&self) -> &[PageRef] {
        &self.mixed
    }

    pub fn unmatched(&self) -> &[PageRef] {
        &self.unmatched
    }

    pub fn total_pages(&self) -> usize {
        self.vendors.iter().map(|(_, pages)| pages.len()).sum::<usize>()
            + self.mixed.len()
            + self.unmatched.len()
    }

    /// ページの振り分け先を探す
    pub fn destinations_of(&self, page: &PageRef) -> Vec<Destination> {
        let mut found = Vec::new();
        for (vendor, pages) in &self.vendors {
            if pages.contains(page) {
                found.push(Destination::Vendor(vendor.clone()));
            }
        }
        if self.mixed.contains(page) {
            found.push(Destination::Mixed);
        }
        if self.unmatched.contains(page) {
            found.push(Destination::Unmatched);
        }
        found
    }

    /// 出力ファイルの一覧
    ///
    /// ベンダー別は `{ベンダー}.pdf`、混在・未照合は `{元ファイル}_p{ページ}.pdf`。
    /// 同じ入力なら毎回同じ名前になる。サニタイズ後に名前が重なった場合は
    /// 後の方に `_2`, `_3` … を付ける。
    pub fn artifacts(&self) -> Vec<Artifact> {
        let mut artifacts = Vec::new();

        let mut vendor_names = UniqueNames::default();
        for (vendor, pages) in &self.vendors {
            if pages.is_empty() {
                continue;
            }
            let stem = non_empty_or(safe_name(vendor), "vendor");
            artifacts.push(Artifact {
                destination: Destination::Vendor(vendor.clone()),
                file_name: format!("{}.pdf", vendor_names.claim(stem)),
                pages: pages.clone(),
            });
        }

        for (destination, pages) in [
            (Destination::Mixed, &self.mixed),
            (Destination::Unmatched, &self.unmatched),
        ] {
            let mut names = UniqueNames::default();
            for page in pages {
                artifacts.push(Artifact {
                    destination: destination.clone(),
                    file_name: format!("{}.pdf", names.claim(page_stem(page))),
                    pages: vec![page.clone()],
                });
            }
        }

        artifacts
    }

    /// 集計
    pub fn summary(&self) -> RunSummary {
        let per_vendor: Vec<(String, usize)> = self
            .vendors
            .iter()
            .map(|(vendor, pages)| (vendor.clone(), pages.len()))
            .collect();

        RunSummary {
            total_pages: self.total_pages(),
            routed: per_vendor.iter().map(|(_, n)| n).sum(),
            mixed: self.mixed.len(),
            unmatched: self.unmatched.len(),
            per_vendor,
        }
    }
}

/// 1ページ出力のファイル名（拡張子なし）
pub fn page_stem(page: &PageRef) -> String {
    format!(
        "{}_p{}",
        non_empty_or(safe_name(&page.source_name), "document"),
        page.page_number()
    )
}

/// ファイル名に使えない文字の並びを `_` に置き換え、前後の `_` を除く
pub fn safe_name(name: &str) -> String {
    lazy_static::lazy_static! {
        static ref UNSAFE_RE: Regex = Regex::new(r"[^\w\-]+").unwrap();
    }

    UNSAFE_RE.replace_all(name, "_").trim_matches('_').to_string()
}

fn non_empty_or(name: String, fallback: &str) -> String {
    if name.is_empty() {
        fallback.to_string()
    } else {
        name
    }
}

/// 重複しない名前の払い出し
#[derive(Debug, Default)]
struct UniqueNames {
    used: HashSet<String>,
}

impl UniqueNames {
    fn claim(&mut self, stem: String) -> String {
        if self.used.insert(stem.clone()) {
            return stem;
        }
        let mut n = 2;
        loop {
            let name = format!("{}_{}", stem, n);
            if self.used.insert(name.clone()) {
                return name;
            }
            n += 1;
        }
    }
}

//! ページ分類
//!
//! 品番候補を索引で引き、ヒットしたベンダーの数で振り分けを決める。
//!
//! ## 判定
//! - 0社 → 未照合（Unmatched）
//! - 1社 → そのベンダーへ（最も信頼度の高い照合を根拠として残す）
//! - 2社以上 → 混在（Mixed）。推測で振り分けず目視確認に回す

use crate::anchor::AnchorSet;
use crate::extract::{extract_candidates, Candidate};
use crate::index::VendorIndex;
use crate::normalize::NormalizeOptions;
use serde::{Deserialize, Serialize};

/// 抽出方式（現状はテキスト抽出のみ）
pub const METHOD_NATIVE: &str = "native";

/// ベンダーに解決できた品番候補
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub raw_token: String,
    pub normalized_key: String,
    pub vendor: String,
    pub anchor_label: String,
    pub method: String,
    pub confidence: f64,
}

/// ページの出所（何番目の文書の何ページ目か）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PageRef {
    /// 入力文書の通し番号（処理順）
    pub document: usize,
    /// 0始まりのページ番号
    pub page_index: usize,
    /// 元のファイル名
    pub source_name: String,
}

impl PageRef {
    pub fn new(document: usize, source_name: impl Into<String>, page_index: usize) -> Self {
        Self {
            document,
            page_index,
            source_name: source_name.into(),
        }
    }

    /// 1始まりのページ番号
    pub fn page_number(&self) -> usize {
        self.page_index + 1
    }
}

/// 分類結果
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    Routed { vendor: String, best: Match },
    Mixed { matches: Vec<Match> },
    Unmatched,
}

impl Decision {
    /// ログ・表示用の振り分け先名
    pub fn destination_label(&self) -> &str {
        match self {
            Decision::Routed { vendor, .. } => vendor.as_str(),
            Decision::Mixed { .. } => crate::routing::MIXED,
            Decision::Unmatched => crate::routing::UNMATCHED,
        }
    }

    /// 混在ページに関係するベンダー（重複なし・出現順）
    pub fn vendors(&self) -> Vec<&str> {
        match self {
            Decision::Routed { vendor, .. } => vec![vendor.as_str()],
            Decision::Mixed { matches } => distinct_vendors(matches),
            Decision::Unmatched => Vec::new(),
        }
    }
}

/// ページ1枚分の分類結果
#[derive(Debug, Clone, PartialEq)]
pub struct PageDecision {
    pub page: PageRef,
    pub decision: Decision,
}

/// 候補を索引で引いて照合結果にする
///
/// 索引にないキーの候補は捨てる。信頼度はアンカーの優先度から決まる。
pub fn resolve_matches(
    candidates: &[Candidate],
    index: &VendorIndex,
    anchors: &AnchorSet,
    options: &NormalizeOptions,
) -> Vec<Match> {
    candidates
        .iter()
        .filter_map(|candidate| {
            let key = options.normalize(&candidate.raw_token);
            let vendor = index.lookup(&key)?;
            Some(Match {
                raw_token: candidate.raw_token.clone(),
                normalized_key: key,
                vendor: vendor.to_string(),
                anchor_label: candidate.label.clone(),
                method: METHOD_NATIVE.to_string(),
                confidence: anchors.confidence_for(&candidate.label),
            })
        })
        .collect()
}

/// 照合結果から分類を決める
pub fn decide(matches: Vec<Match>, anchors: &AnchorSet) -> Decision {
    let vendor_count = distinct_vendors(&matches).len();

    match vendor_count {
        0 => Decision::Unmatched,
        1 => {
            let best = best_match(&matches, anchors)
                .cloned()
                .unwrap_or_else(|| matches[0].clone());
            Decision::Routed {
                vendor: best.vendor.clone(),
                best,
            }
        }
        _ => Decision::Mixed { matches },
    }
}

/// 候補列を分類
pub fn classify(
    candidates: &[Candidate],
    index: &VendorIndex,
    anchors: &AnchorSet,
    options: &NormalizeOptions,
) -> Decision {
    decide(resolve_matches(candidates, index, anchors, options), anchors)
}

/// 最も信頼度の高い照合
///
/// 同点ならアンカー優先度の高い方、それも同じならテキスト上で先の方。
pub fn best_match<'a>(matches: &'a [Match], anchors: &AnchorSet) -> Option<&'a Match> {
    let rank = |m: &Match| anchors.priority_index(&m.anchor_label).unwrap_or(usize::MAX);

    let mut best: Option<&Match> = None;
    for candidate in matches {
        best = match best {
            None => Some(candidate),
            Some(current) => {
                let better = candidate.confidence > current.confidence
                    || (candidate.confidence == current.confidence
                        && rank(candidate) < rank(current));
                if better {
                    Some(candidate)
                } else {
                    Some(current)
                }
            }
        };
    }
    best
}

fn distinct_vendors(matches: &[Match]) -> Vec<&str> {
    let mut vendors: Vec<&str> = Vec::new();
    for m in matches {
        if !vendors.contains(&m.vendor.as_str()) {
            vendors.push(m.vendor.as_str());
        }
    }
    vendors
}

/// 分類器（アンカー・索引・正規化設定の組）
///
/// 構築後は読み取り専用なので、複数スレッドから共有して使える。
#[derive(Debug, Clone)]
pub struct Classifier {
    anchors: AnchorSet,
    index: VendorIndex,
    options: NormalizeOptions,
}

impl Classifier {
    pub fn new(anchors: AnchorSet, index: VendorIndex, options: NormalizeOptions) -> Self {
        Self {
            anchors,
            index,
            options,
        }
    }

    pub fn anchors(&self) -> &AnchorSet {
        &self.anchors
    }

    pub fn index(&self) -> &VendorIndex {
        &self.index
    }

    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    /// テキストから候補を抽出
    pub fn candidates(&self, text: &str) -> Vec<Candidate> {
        extract_candidates(text, &self.anchors)
    }

    /// テキストを分類
    pub fn classify_text(&self, text: &str) -> Decision {
        let candidates = self.candidates(text);
        classify(&candidates, &self.index, &self.anchors, &self.options)
    }

    /// ページを分類（出所付き）
    pub fn classify_page(&self, page: PageRef, text: &str) -> PageDecision {
        PageDecision {
            page,
            decision: self.classify_text(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::{ITEM, MODEL, SKU};

    fn candidates() -> Vec<Candidate> {
        vec![Candidate::new(MODEL, "ABC-123"), Candidate::new(ITEM, "XYZ999")]
    }

    fn run(candidates: &[Candidate], index: &VendorIndex) -> Decision {
        classify(candidates, index, &AnchorSet::default(), &NormalizeOptions::default())
    }

    #[test]
    fn test_single_vendor_prefers_model() {
        let index = VendorIndex::with_entries([("ABC123", "Acme"), ("XYZ999", "Acme")]);
        match run(&candidates(), &index) {
            Decision::Routed { vendor, best } => {
                assert_eq!(vendor, "Acme");
                assert_eq!(best.anchor_label, MODEL);
                assert_eq!(best.raw_token, "ABC-123");
                assert_eq!(best.normalized_key, "ABC123");
                assert_eq!(best.method, METHOD_NATIVE);
                assert!((best.confidence - 1.0).abs() < 1e-9);
            }
            other => panic!("expected Routed, got {:?}", other),
        }
    }

    #[test]
    fn test_two_vendors_is_mixed() {
        let index = VendorIndex::with_entries([("ABC123", "Acme"), ("XYZ999", "Beta")]);
        match run(&candidates(), &index) {
            Decision::Mixed { matches } => {
                assert_eq!(matches.len(), 2);
                assert_eq!(matches[0].vendor, "Acme");
                assert_eq!(matches[1].vendor, "Beta");
                assert!((matches[1].confidence - 0.9).abs() < 1e-9);
            }
            other => panic!("expected Mixed, got {:?}", other),
        }
    }

    #[test]
    fn test_no_candidates_is_unmatched() {
        let index = VendorIndex::with_entries([("ABC123", "Acme")]);
        assert_eq!(run(&[], &index), Decision::Unmatched);
    }

    #[test]
    fn test_unknown_keys_are_discarded() {
        let index = VendorIndex::with_entries([("XYZ999", "Beta")]);
        match run(&candidates(), &index) {
            Decision::Routed { vendor, best } => {
                assert_eq!(vendor, "Beta");
                assert_eq!(best.anchor_label, ITEM);
                assert!((best.confidence - 0.9).abs() < 1e-9);
            }
            other => panic!("expected Routed, got {:?}", other),
        }
        assert_eq!(run(&candidates(), &VendorIndex::default()), Decision::Unmatched);
    }

    #[test]
    fn test_unranked_label_scores_half() {
        let index = VendorIndex::with_entries([("QQQ111", "Acme")]);
        let matches = resolve_matches(
            &[Candidate::new("UPC", "qqq-111")],
            &index,
            &AnchorSet::default(),
            &NormalizeOptions::default(),
        );
        assert_eq!(matches.len(), 1);
        assert!((matches[0].confidence - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_best_match_first_occurrence_on_tie() {
        let index = VendorIndex::with_entries([("AAA111", "Acme"), ("BBB222", "Acme")]);
        let cands = vec![Candidate::new(SKU, "AAA111"), Candidate::new(SKU, "BBB222")];
        match run(&cands, &index) {
            Decision::Routed { best, .. } => assert_eq!(best.raw_token, "AAA111"),
            other => panic!("expected Routed, got {:?}", other),
        }
    }

    #[test]
    fn test_best_match_ranked_over_unranked() {
        let anchors = AnchorSet::default();
        let make = |label: &str, confidence: f64| Match {
            raw_token: label.to_string(),
            normalized_key: String::new(),
            vendor: "Acme".into(),
            anchor_label: label.to_string(),
            method: METHOD_NATIVE.into(),
            confidence,
        };
        let matches = vec![make("UPC", 0.5), make(SKU, 0.7), make(ITEM, 0.9)];
        assert_eq!(best_match(&matches, &anchors).unwrap().anchor_label, ITEM);
        assert!(best_match(&[], &anchors).is_none());
    }

    #[test]
    fn test_strip_leading_zeros_applies_to_candidates() {
        let index = VendorIndex::with_entries([("42", "Acme")]);
        let cands = vec![Candidate::new(SKU, "00042")];
        let anchors = AnchorSet::default();
        assert_eq!(
            classify(&cands, &index, &anchors, &NormalizeOptions::new(false)),
            Decision::Unmatched
        );
        assert!(matches!(
            classify(&cands, &index, &anchors, &NormalizeOptions::new(true)),
            Decision::Routed { .. }
        ));
    }

    #[test]
    fn test_classifier_end_to_end() {
        let index = VendorIndex::with_entries([("ABC123", "Acme"), ("XYZ999", "Acme")]);
        let classifier = Classifier::new(AnchorSet::default(), index, NormalizeOptions::default());

        let page = classifier.classify_page(
            PageRef::new(0, "order.pdf", 2),
            "PO 5512\nModel #: ABC-123\nItem# XYZ999",
        );
        assert_eq!(page.page.page_number(), 3);
        assert_eq!(page.decision.destination_label(), "Acme");

        let empty = classifier.classify_page(PageRef::new(0, "order.pdf", 3), "");
        assert_eq!(empty.decision, Decision::Unmatched);

        let none = classifier.classify_text("Thank you for your business");
        assert_eq!(none, Decision::Unmatched);
    }

    #[test]
    fn test_mixed_vendors_listed() {
        let index = VendorIndex::with_entries([("ABC123", "Acme"), ("XYZ999", "Beta")]);
        let classifier = Classifier::new(AnchorSet::default(), index, NormalizeOptions::default());
        let decision = classifier.classify_text("SKU XYZ999 Model ABC123 SKU XYZ-999");
        assert_eq!(decision.destination_label(), "MIXED");
        assert_eq!(decision.vendors(), vec!["Acme", "Beta"]);
    }
}

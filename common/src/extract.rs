//! ページテキストから品番候補を抽出

use crate::anchor::AnchorSet;
use serde::{Deserialize, Serialize};

/// 抽出された品番候補
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// アンカーのラベル（Model, Item, ...）
    pub label: String,
    /// 抽出したままのトークン
    pub raw_token: String,
}

impl Candidate {
    pub fn new(label: impl Into<String>, raw_token: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            raw_token: raw_token.into(),
        }
    }
}

/// ページテキストから品番候補を抽出
///
/// 改行は空白に置き換えてから照合するため、見出し語と品番が行をまたいでも拾える。
/// 結果はアンカーの宣言順、同じアンカー内ではテキスト中の出現順。
/// 同じ品番が複数回出ても重複除去はしない。
///
/// # Examples
/// ```
/// use order_splitter_common::{extract_candidates, AnchorSet};
///
/// let candidates = extract_candidates("Model #: ABC-123 Item# XYZ999", &AnchorSet::default());
/// assert_eq!(candidates.len(), 2);
/// assert_eq!(candidates[0].raw_token, "ABC-123");
/// ```
pub fn extract_candidates(text: &str, anchors: &AnchorSet) -> Vec<Candidate> {
    if text.is_empty() {
        return Vec::new();
    }

    let joined = text.replace(['\r', '\n'], " ");

    let mut candidates = Vec::new();
    for pattern in anchors.patterns() {
        for token in pattern.find_tokens(&joined) {
            let token = token.trim().trim_end_matches([':', '#']);
            candidates.push(Candidate::new(pattern.label(), token));
        }
    }
    candidates
}

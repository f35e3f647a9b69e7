//! アンカーパターン定義
//!
//! 「Model #」「Item #」「SKU」などの見出し語と、その直後の品番トークンを
//! 組にした検出ルール。並び順がそのまま優先度になる（先頭ほど高い）。

use crate::error::{Error, Result};
use regex::Regex;

/// 品番トークン部分（英数字始まり、英数字と `-` `/` `_` で3文字以上）
const TOKEN_PATTERN: &str = r"([A-Z0-9][A-Z0-9\-/_]{2,})";

/// 標準アンカーのラベル（優先度順）
pub const MODEL: &str = "Model";
pub const ITEM: &str = "Item";
pub const INTERNET: &str = "Internet";
pub const SKU: &str = "SKU";

/// 優先度順に並んでいないラベルの信頼度
pub const UNRANKED_CONFIDENCE: f64 = 0.5;

lazy_static::lazy_static! {
    static ref CANONICAL: AnchorSet = AnchorSet {
        patterns: vec![
            AnchorPattern::canonical(
                MODEL,
                r"(Model(?:\s*#|(?:\s*Number)?)\s*[:\-]?\s*)",
            ),
            AnchorPattern::canonical(ITEM, r"(Item\s*#\s*[:\-]?\s*)"),
            AnchorPattern::canonical(INTERNET, r"(Internet\s*#\s*[:\-]?\s*)"),
            AnchorPattern::canonical(SKU, r"(\bSKU\b(?:\s*#)?\s*[:\-]?\s*)"),
        ],
    };
}

/// 1つのアンカールール
///
/// 正規表現は2番目のキャプチャグループを品番トークンとして扱う。
#[derive(Debug, Clone)]
pub struct AnchorPattern {
    label: String,
    regex: Regex,
}

impl AnchorPattern {
    /// 任意の正規表現からアンカーを作成
    ///
    /// 大文字小文字は区別しない。キャプチャグループが2つ未満ならエラー。
    pub fn new(label: &str, pattern: &str) -> Result<Self> {
        if label.trim().is_empty() {
            return Err(Error::Config("anchor label is empty".into()));
        }

        let regex = Regex::new(&format!("(?i){}", pattern))?;
        if regex.captures_len() < 3 {
            return Err(Error::Config(format!(
                "anchor pattern for '{}' needs a prefix group and a token group",
                label
            )));
        }

        Ok(Self {
            label: label.to_string(),
            regex,
        })
    }

    /// 見出し語からアンカーを作成
    ///
    /// `SKU` と同じ形（語境界、任意の `#`、任意の `:`/`-`）で品番を拾う。
    pub fn from_phrase(label: &str, phrase: &str) -> Result<Self> {
        let phrase = phrase.trim();
        if phrase.is_empty() {
            return Err(Error::Config(format!("anchor phrase for '{}' is empty", label)));
        }

        let starts_word = phrase.chars().next().is_some_and(|c| c.is_alphanumeric());
        let ends_word = phrase.chars().last().is_some_and(|c| c.is_alphanumeric());
        let prefix = format!(
            r"({}{}{}(?:\s*#)?\s*[:\-]?\s*)",
            if starts_word { r"\b" } else { "" },
            regex::escape(phrase),
            if ends_word { r"\b" } else { "" },
        );

        Self::new(label, &format!("{}{}", prefix, TOKEN_PATTERN))
    }

    fn canonical(label: &str, prefix: &str) -> Self {
        Self::new(label, &format!("{}{}", prefix, TOKEN_PATTERN)).unwrap()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// テキスト中の全出現について品番トークンを返す（出現順）
    pub fn find_tokens<'a, 't>(&'a self, text: &'t str) -> impl Iterator<Item = &'t str> + 'a
    where
        't: 'a,
    {
        self.regex
            .captures_iter(text)
            .filter_map(|caps| caps.get(2))
            .map(|m| m.as_str())
    }
}

/// 優先度付きアンカーの集合
#[derive(Debug, Clone)]
pub struct AnchorSet {
    patterns: Vec<AnchorPattern>,
}

impl Default for AnchorSet {
    /// 標準の4アンカー（Model, Item, Internet, SKU）
    fn default() -> Self {
        CANONICAL.clone()
    }
}

impl AnchorSet {
    pub fn new(patterns: Vec<AnchorPattern>) -> Self {
        Self { patterns }
    }

    /// 末尾（最低優先度）にアンカーを追加
    pub fn push(&mut self, pattern: AnchorPattern) {
        self.patterns.push(pattern);
    }

    pub fn patterns(&self) -> &[AnchorPattern] {
        &self.patterns
    }

    /// ラベルの優先度順（重複ラベルは最初の位置のみ）
    pub fn priority_order(&self) -> Vec<&str> {
        let mut order: Vec<&str> = Vec::new();
        for pattern in &self.patterns {
            if !order.contains(&pattern.label()) {
                order.push(pattern.label());
            }
        }
        order
    }

    /// ラベルの優先度（0始まり）
    pub fn priority_index(&self, label: &str) -> Option<usize> {
        self.priority_order().iter().position(|l| *l == label)
    }

    /// ラベルに対応する信頼度
    ///
    /// `1.0 - 0.1 * 優先度`。優先度順にないラベルは `0.5`。
    pub fn confidence_for(&self, label: &str) -> f64 {
        match self.priority_index(label) {
            Some(index) => 1.0 - 0.1 * index as f64,
            None => UNRANKED_CONFIDENCE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_priority_order() {
        let anchors = AnchorSet::default();
        assert_eq!(anchors.priority_order(), vec![MODEL, ITEM, INTERNET, SKU]);
    }

    #[test]
    fn test_confidence_for() {
        let anchors = AnchorSet::default();
        assert!((anchors.confidence_for(MODEL) - 1.0).abs() < 1e-9);
        assert!((anchors.confidence_for(ITEM) - 0.9).abs() < 1e-9);
        assert!((anchors.confidence_for(INTERNET) - 0.8).abs() < 1e-9);
        assert!((anchors.confidence_for(SKU) - 0.7).abs() < 1e-9);
        assert!((anchors.confidence_for("UPC") - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_find_tokens_case_insensitive() {
        let anchors = AnchorSet::default();
        let sku = &anchors.patterns()[3];
        let tokens: Vec<&str> = sku.find_tokens("sku# ab-12 and SKU: 99x").collect();
        assert_eq!(tokens, vec!["ab-12", "99x"]);
    }

    #[test]
    fn test_sku_requires_word_boundary() {
        let anchors = AnchorSet::default();
        let sku = &anchors.patterns()[3];
        assert_eq!(sku.find_tokens("PSKU 12345").count(), 0);
    }

    #[test]
    fn test_from_phrase() {
        let pattern = AnchorPattern::from_phrase("UPC", "UPC").unwrap();
        let tokens: Vec<&str> = pattern.find_tokens("upc #: 0123-45").collect();
        assert_eq!(tokens, vec!["0123-45"]);
    }

    #[test]
    fn test_from_phrase_with_symbol() {
        let pattern = AnchorPattern::from_phrase("PO", "P.O.").unwrap();
        let tokens: Vec<&str> = pattern.find_tokens("P.O. 778899").collect();
        assert_eq!(tokens, vec!["778899"]);
    }

    #[test]
    fn test_new_rejects_missing_groups() {
        assert!(matches!(
            AnchorPattern::new("X", r"X\s*(\w+)"),
            Err(Error::Config(_))
        ));
        assert!(matches!(AnchorPattern::new("X", "("), Err(Error::Pattern(_))));
        assert!(matches!(AnchorPattern::new(" ", "(a)(b)"), Err(Error::Config(_))));
    }

    #[test]
    fn test_push_extends_priority() {
        let mut anchors = AnchorSet::default();
        anchors.push(AnchorPattern::from_phrase("UPC", "UPC").unwrap());
        assert_eq!(anchors.priority_index("UPC"), Some(4));
        assert!((anchors.confidence_for("UPC") - 0.6).abs() < 1e-9);
    }
}

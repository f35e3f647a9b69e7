//! 監査ログ
//!
//! 振り分け結果に関係なく、1ページにつき1行を残す。
//! 列順は固定: store, source_pdf, page_index, vendor, raw_token, normalized,
//! anchor, method, confidence

use crate::classify::{Decision, PageDecision};
use serde::{Deserialize, Serialize};

/// ログの列名（出力順）
pub const LOG_COLUMNS: [&str; 9] = [
    "store",
    "source_pdf",
    "page_index",
    "vendor",
    "raw_token",
    "normalized",
    "anchor",
    "method",
    "confidence",
];

/// 照合なしのときの信頼度表記
const NO_CONFIDENCE: &str = "0.00";

/// ログ1行
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub store: String,
    pub source_pdf: String,
    /// 0始まり
    pub page_index: String,
    /// ベンダー名、または "MIXED" / "UNMATCHED"
    pub vendor: String,
    pub raw_token: String,
    pub normalized: String,
    pub anchor: String,
    pub method: String,
    /// 小数2桁
    pub confidence: String,
}

impl LogRecord {
    /// 分類結果を1行に平坦化
    ///
    /// 根拠の照合が1つに決まるのはベンダー確定時のみ。混在・未照合は空欄。
    pub fn from_decision(store: &str, page: &PageDecision) -> Self {
        let mut record = LogRecord {
            store: store.to_string(),
            source_pdf: page.page.source_name.clone(),
            page_index: page.page.page_index.to_string(),
            vendor: page.decision.destination_label().to_string(),
            confidence: NO_CONFIDENCE.to_string(),
            ..Default::default()
        };

        if let Decision::Routed { best, .. } = &page.decision {
            record.raw_token = best.raw_token.clone();
            record.normalized = best.normalized_key.clone();
            record.anchor = best.anchor_label.clone();
            record.method = best.method.clone();
            record.confidence = format!("{:.2}", best.confidence);
        }

        record
    }

    /// 列順の値
    pub fn values(&self) -> [&str; 9] {
        [
            &self.store,
            &self.source_pdf,
            &self.page_index,
            &self.vendor,
            &self.raw_token,
            &self.normalized,
            &self.anchor,
            &self.method,
            &self.confidence,
        ]
    }
}

/// 実行全体のログ
///
/// 並列処理で完了順が前後しても、出力は（文書順, ページ順）に揃える。
#[derive(Debug, Clone, Default)]
pub struct AuditLog {
    entries: Vec<((usize, usize), LogRecord)>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 1ページ分を追記
    pub fn record(&mut self, store: &str, page: &PageDecision) {
        let order = (page.page.document, page.page.page_index);
        self.entries.push((order, LogRecord::from_decision(store, page)));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 処理順に並べたログ
    pub fn into_sorted(mut self) -> Vec<LogRecord> {
        self.entries.sort_by_key(|(order, _)| *order);
        self.entries.into_iter().map(|(_, record)| record).collect()
    }
}

//! 振り分け処理の本体
//!
//! 入力検証 → PDF読み込み → ページ分類（rayonで並列）→ 振り分け・ログ集約。
//! 分類器は読み取り専用で共有し、集約はメインスレッドで文書順・ページ順に行う。

use crate::error::{Result, SplitterError};
use crate::pdf::{PageSource, PdfBackend};
use crate::scanner;
use indicatif::{ProgressBar, ProgressStyle};
use order_splitter_common::{
    AuditLog, Classifier, Decision, LogRecord, PageDecision, PageRef, RoutingPlan, RunSummary,
};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// 振り分け結果
#[derive(Debug, Clone)]
pub struct SplitOutcome {
    pub plan: RoutingPlan,
    /// 1ページ1行（文書順・ページ順）
    pub log: Vec<LogRecord>,
    pub summary: RunSummary,
}

/// 実行前の入力検証
///
/// PDFが1つもない、ベンダー表がない場合はページ処理の前にエラーにする。
pub fn validate_inputs(inputs: &[PathBuf], mapping: Option<&Path>) -> Result<(Vec<PathBuf>, PathBuf)> {
    let pdfs = scanner::collect_pdfs(inputs)?;
    if pdfs.is_empty() {
        return Err(SplitterError::NoInputDocuments);
    }

    let mapping = mapping.ok_or(SplitterError::NoMappingSource)?;
    if !mapping.exists() {
        return Err(SplitterError::FileNotFound(mapping.display().to_string()));
    }

    Ok((pdfs, mapping.to_path_buf()))
}

/// PDFをすべて開く（1つでも開けなければエラー）
pub fn open_documents<B: PdfBackend>(backend: &B, paths: &[PathBuf]) -> Result<Vec<B::Document>> {
    paths
        .iter()
        .map(|path| {
            let document = backend.open(path)?;
            info!(source = document.name(), pages = document.page_count(), "PDFを読み込み");
            Ok(document)
        })
        .collect()
}

/// ページ数分の進捗バー
pub fn progress_bar(total: usize, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(total as u64);
    if let Ok(style) = ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len}ページ [{elapsed}]") {
        bar.set_style(style);
    }
    bar
}

/// 1文書の全ページを分類（ページ順で返す）
pub fn classify_document<S: PageSource>(
    document: usize,
    source: &S,
    classifier: &Classifier,
    progress: &ProgressBar,
) -> Vec<PageDecision> {
    (0..source.page_count())
        .into_par_iter()
        .map(|index| {
            let text = source.page_text(index);
            let decision = classifier.classify_page(PageRef::new(document, source.name(), index), &text);
            progress.inc(1);
            decision
        })
        .collect()
}

/// 全文書を分類し、振り分け先とログを集約
pub fn split_documents<S: PageSource>(
    store: &str,
    sources: &[S],
    classifier: &Classifier,
    progress: &ProgressBar,
) -> SplitOutcome {
    let mut plan = RoutingPlan::new();
    let mut log = AuditLog::new();

    for (ordinal, source) in sources.iter().enumerate() {
        for page in classify_document(ordinal, source, classifier, progress) {
            if let Decision::Mixed { .. } = &page.decision {
                warn!(
                    source = %page.page.source_name,
                    page = page.page.page_number(),
                    vendors = ?page.decision.vendors(),
                    "複数ベンダーの品番を含むページ"
                );
            }
            plan.route(&page);
            log.record(store, &page);
        }
    }
    progress.finish_and_clear();

    let summary = plan.summary();
    SplitOutcome {
        plan,
        log: log.into_sorted(),
        summary,
    }
}

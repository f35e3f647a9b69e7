pub mod archive;
pub mod log;

use crate::cli::LogFormat;
use crate::error::{Result, SplitterError};
use crate::pdf::PdfBackend;
use crate::splitter::SplitOutcome;
use order_splitter_common::Destination;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const LOG_STEM: &str = "summary";

/// 取引先ごとの出力フォルダ
///
/// ```text
/// {output}/{store}/
///   vendors/            ベンダー別PDF
///   errors/unmatched/   未照合ページ
///   errors/mixed/       混在ページ
///   logs/               summary.csv / summary.xlsx
/// ```
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(output_dir: &Path, store_key: &str) -> Self {
        Self {
            root: output_dir.join(store_key),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn vendors_dir(&self) -> PathBuf {
        self.root.join("vendors")
    }

    pub fn unmatched_dir(&self) -> PathBuf {
        self.root.join("errors").join("unmatched")
    }

    pub fn mixed_dir(&self) -> PathBuf {
        self.root.join("errors").join("mixed")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    pub fn dir_for(&self, destination: &Destination) -> PathBuf {
        match destination {
            Destination::Vendor(_) => self.vendors_dir(),
            Destination::Mixed => self.mixed_dir(),
            Destination::Unmatched => self.unmatched_dir(),
        }
    }

    pub fn create_dirs(&self) -> Result<()> {
        for dir in [
            self.vendors_dir(),
            self.unmatched_dir(),
            self.mixed_dir(),
            self.logs_dir(),
        ] {
            std::fs::create_dir_all(&dir)?;
        }
        Ok(())
    }
}

/// 書き出したファイル
#[derive(Debug, Clone, Default)]
pub struct WrittenFiles {
    pub pdfs: Vec<PathBuf>,
    pub logs: Vec<PathBuf>,
}

/// 振り分け結果をPDFとログに書き出す
///
/// `documents` は分類時と同じ順序で渡すこと（ページ参照は文書の位置で解決する）。
pub fn write_outputs<B: PdfBackend>(
    backend: &B,
    documents: &[B::Document],
    outcome: &SplitOutcome,
    layout: &OutputLayout,
    log_format: LogFormat,
) -> Result<WrittenFiles> {
    layout.create_dirs()?;
    let mut written = WrittenFiles::default();

    for artifact in outcome.plan.artifacts() {
        if artifact.pages.is_empty() {
            warn!(destination = %artifact.destination, "ページがないため出力しません");
            continue;
        }

        let pages = artifact
            .pages
            .iter()
            .map(|page| {
                documents
                    .get(page.document)
                    .map(|document| (document, page.page_index))
                    .ok_or_else(|| {
                        SplitterError::PdfWrite(format!("文書が見つかりません: {}", page.source_name))
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        let path = layout.dir_for(&artifact.destination).join(&artifact.file_name);
        backend.write_pages(&pages, &path)?;
        info!(path = %path.display(), pages = pages.len(), "PDFを出力");
        written.pdfs.push(path);
    }

    if log_format.writes_csv() {
        let path = layout.logs_dir().join(format!("{}.csv", LOG_STEM));
        log::write_csv_log(&outcome.log, &path)?;
        written.logs.push(path);
    }
    if log_format.writes_xlsx() {
        let path = layout.logs_dir().join(format!("{}.xlsx", LOG_STEM));
        log::write_xlsx_log(&outcome.log, &path)?;
        written.logs.push(path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_paths() {
        let layout = OutputLayout::new(Path::new("outputs"), "Depot");
        assert_eq!(layout.root(), Path::new("outputs/Depot"));
        assert_eq!(layout.vendors_dir(), PathBuf::from("outputs/Depot/vendors"));
        assert_eq!(
            layout.dir_for(&Destination::Mixed),
            PathBuf::from("outputs/Depot/errors/mixed")
        );
        assert_eq!(
            layout.dir_for(&Destination::Unmatched),
            PathBuf::from("outputs/Depot/errors/unmatched")
        );
        assert_eq!(layout.logs_dir(), PathBuf::from("outputs/Depot/logs"));
    }
}

//! 出力フォルダのzipアーカイブ

use crate::error::{Result, SplitterError};
use std::fs::File;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const ARCHIVE_EXTENSION: &str = "zip";

/// `{root}/{store}_{YYYY-MM-DD}.zip`
pub fn archive_path(root: &Path, store: &str, date: chrono::NaiveDate) -> PathBuf {
    root.join(format!("{}_{}.{}", store, date.format("%Y-%m-%d"), ARCHIVE_EXTENSION))
}

/// `root` 以下の全ファイルを `archive` に圧縮
///
/// 既存のzip（今回作るものを含む）は対象外。格納パスは `root` からの相対パス。
/// 戻り値は格納したファイル数。
pub fn create_archive(root: &Path, archive: &Path) -> Result<usize> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|entry| entry.into_path())
        .filter(|path| path.is_file() && !is_archive(path))
        .collect();
    files.retain(|path| path != archive);

    let file = File::create(archive)?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for path in &files {
        let name = entry_name(root, path);
        zip.start_file(name, options)
            .map_err(|e| SplitterError::Archive(e.to_string()))?;
        let mut source = File::open(path)?;
        std::io::copy(&mut source, &mut zip)?;
    }

    zip.finish()
        .map_err(|e| SplitterError::Archive(e.to_string()))?;
    Ok(files.len())
}

fn is_archive(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(ARCHIVE_EXTENSION))
        .unwrap_or(false)
}

/// zip内のパス（区切りは常に `/`）
fn entry_name(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect::<Vec<_>>()
        .join("/")
}

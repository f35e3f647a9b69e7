use crate::error::{Result, SplitterError};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const PDF_EXTENSION: &str = "pdf";

/// 入力（ファイル・フォルダ混在）からPDFの一覧を作る
///
/// フォルダは直下の `*.pdf` をファイル名順に、ファイルは指定順のまま並べる。
/// 同じパスが複数回指定された場合は最初の1回だけ使う。
pub fn collect_pdfs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut pdfs = Vec::new();
    let mut seen = HashSet::new();

    for input in inputs {
        if input.is_dir() {
            for path in scan_folder(input)? {
                if seen.insert(path.clone()) {
                    pdfs.push(path);
                }
            }
        } else if input.is_file() {
            if seen.insert(input.clone()) {
                pdfs.push(input.clone());
            }
        } else {
            return Err(SplitterError::FileNotFound(input.display().to_string()));
        }
    }

    Ok(pdfs)
}

/// フォルダ直下のPDF（ファイル名順）
pub fn scan_folder(folder: &Path) -> Result<Vec<PathBuf>> {
    if !folder.exists() {
        return Err(SplitterError::FileNotFound(folder.display().to_string()));
    }

    let mut pdfs: Vec<PathBuf> = WalkDir::new(folder)
        .max_depth(1) // 直下のみ（再帰しない）
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|entry| entry.into_path())
        .filter(|path| path.is_file() && is_pdf(path))
        .collect();

    pdfs.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(pdfs)
}

/// 拡張子が pdf か（大文字小文字無視）
pub fn is_pdf(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(PDF_EXTENSION))
        .unwrap_or(false)
}

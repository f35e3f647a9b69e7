//! PDFの読み書き
//!
//! 分類処理はページテキストしか見ないので、`PageSource` だけに依存させる。
//! 実装はビルド時に決まる（`LopdfBackend`）。

mod lopdf_backend;

pub use lopdf_backend::{LopdfBackend, LopdfDocument};

use crate::error::Result;
use std::path::Path;

/// ページテキストの提供元
///
/// 抽出に失敗したページは空文字を返す（呼び出し側では「未照合」になる）。
pub trait PageSource: Send + Sync {
    /// ログ・出力ファイル名に使う元ファイル名
    fn name(&self) -> &str;

    fn page_count(&self) -> usize;

    /// 0始まりのページ番号でテキストを取得
    fn page_text(&self, index: usize) -> String;
}

/// PDFの読み込みとページ単位の書き出し
pub trait PdfBackend {
    type Document: PageSource;

    fn open(&self, path: &Path) -> Result<Self::Document>;

    /// 指定ページを指定順に1つのPDFへまとめる
    fn write_pages(&self, pages: &[(&Self::Document, usize)], output: &Path) -> Result<()>;
}

//! 発注書PDFのベンダー別振り分け
//!
//! 分類コアは `order-splitter-common`。ここではファイル入出力
//! （PDF・ベンダー表・ログ・アーカイブ）と設定、CLIを扱う。

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod mapping;
pub mod pdf;
pub mod scanner;
pub mod splitter;
pub mod store;

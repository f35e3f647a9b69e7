use crate::store::StoreKey;
use clap::{Parser, Subcommand};
use order_splitter_common::ConflictPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "order-splitter")]
#[command(about = "発注書PDFをベンダー別に振り分けるツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// PDFをページ単位で分類し、ベンダー別に書き出す
    Split {
        /// 取引先 (depot/lowes/tsc/任意の名前)
        #[arg(short, long)]
        store: StoreKey,

        /// SKU→ベンダー表 (xlsx/xls/xlsm/xlsb/ods/csv)
        #[arg(short, long)]
        mapping: Option<PathBuf>,

        /// 発注書PDF、またはPDFを含むフォルダ
        inputs: Vec<PathBuf>,

        /// 出力先ルート（デフォルト: 設定の output_dir）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 品番の先頭ゼロを無視して照合
        #[arg(long)]
        strip_leading_zeros: bool,

        /// 同じ品番に複数ベンダーがある場合 (last-wins/first-wins/reject)
        #[arg(long)]
        conflict_policy: Option<ConflictPolicy>,

        /// ログ形式 (csv/xlsx/both)
        #[arg(long)]
        log_format: Option<LogFormat>,

        /// zipアーカイブを作らない
        #[arg(long)]
        no_archive: bool,

        /// 進捗バーを表示しない
        #[arg(short, long)]
        quiet: bool,
    },

    /// 書き出さずに各ページの候補と判定を表示
    Inspect {
        /// SKU→ベンダー表
        #[arg(short, long)]
        mapping: PathBuf,

        /// 発注書PDF
        #[arg(required = true)]
        input: PathBuf,

        /// 品番の先頭ゼロを無視して照合
        #[arg(long)]
        strip_leading_zeros: bool,

        /// 指定ページのみ表示（1始まり）
        #[arg(short, long)]
        page: Option<usize>,
    },

    /// ベンダー表の列解決と索引の内容を確認
    Index {
        /// SKU→ベンダー表
        #[arg(short, long)]
        mapping: PathBuf,

        /// 品番の先頭ゼロを無視
        #[arg(long)]
        strip_leading_zeros: bool,

        /// 同じ品番に複数ベンダーがある場合 (last-wins/first-wins/reject)
        #[arg(long)]
        conflict_policy: Option<ConflictPolicy>,
    },

    /// 設定を表示/編集
    Config {
        /// 先頭ゼロ除去の既定値を設定
        #[arg(long)]
        set_strip_leading_zeros: Option<bool>,

        /// 品番衝突時の既定方針を設定
        #[arg(long)]
        set_conflict_policy: Option<ConflictPolicy>,

        /// 出力先ルートを設定
        #[arg(long)]
        set_output_dir: Option<PathBuf>,

        /// ログ形式の既定値を設定
        #[arg(long)]
        set_log_format: Option<LogFormat>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

/// 監査ログの出力形式
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Csv,
    Xlsx,
    Both,
}

impl LogFormat {
    pub fn writes_csv(&self) -> bool {
        matches!(self, LogFormat::Csv | LogFormat::Both)
    }

    pub fn writes_xlsx(&self) -> bool {
        matches!(self, LogFormat::Xlsx | LogFormat::Both)
    }
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(LogFormat::Csv),
            "xlsx" | "excel" => Ok(LogFormat::Xlsx),
            "both" => Ok(LogFormat::Both),
            _ => Err(format!("Unknown log format: {}. Use csv, xlsx, or both", s)),
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Csv => write!(f, "csv"),
            LogFormat::Xlsx => write!(f, "xlsx"),
            LogFormat::Both => write!(f, "both"),
        }
    }
}

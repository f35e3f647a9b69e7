use thiserror::Error;

#[derive(Error, Debug)]
pub enum SplitterError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("PDFが指定されていません。PDFファイルまたはフォルダを指定してください")]
    NoInputDocuments,

    #[error("SKU→ベンダー表が指定されていません。`--mapping FILE` で指定してください")]
    NoMappingSource,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("ベンダー表の読み込みに失敗: {0}")]
    MappingLoad(String),

    #[error("ベンダー表の形式に対応していません: {0}（xlsx/xls/xlsm/xlsb/ods/csv）")]
    UnsupportedMapping(String),

    #[error("PDFを開けません: {0}")]
    PdfOpen(String),

    #[error("PDF書き出しエラー: {0}")]
    PdfWrite(String),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("アーカイブ作成エラー: {0}")]
    Archive(String),

    #[error("分類設定エラー: {0}")]
    Classification(#[from] order_splitter_common::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("CSVエラー: {0}")]
    Csv(#[from] csv::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SplitterError>;

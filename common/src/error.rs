//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("Config error: {0}")]
    Config(String),

    #[error("No vendor column found (need a header containing 'vendor')")]
    MissingVendorColumn,

    #[error("No key columns found (need SKU/Item/Model/Internet #)")]
    MissingKeyColumn,

    #[error("Key {key} is mapped to both '{existing}' and '{incoming}'")]
    KeyConflict {
        key: String,
        existing: String,
        incoming: String,
    },

    #[error("Invalid anchor pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

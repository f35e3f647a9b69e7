//! 品番キーの正規化
//!
//! 表記ゆれ（大文字小文字・区切り文字・先頭ゼロ）を吸収し、
//! ベンダー表の照合キーに揃える。
//! 索引構築時とページ照合時で必ず同じ設定を使うこと。

use serde::{Deserialize, Serialize};

/// 正規化オプション
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeOptions {
    /// 先頭の0を取り除く（全桁0の場合は "0" を残す）
    pub strip_leading_zeros: bool,
}

impl NormalizeOptions {
    pub fn new(strip_leading_zeros: bool) -> Self {
        Self { strip_leading_zeros }
    }

    /// このオプションでキーを正規化
    pub fn normalize(&self, raw: &str) -> String {
        normalize_key(raw, self.strip_leading_zeros)
    }
}

/// 生の品番文字列を照合キーに変換
///
/// 1. 前後の空白を除去
/// 2. 大文字化
/// 3. 空白・`-`・`_`・`/` を除去
/// 4. `strip_leading_zeros` なら先頭の0を除去（全桁0なら "0" を残す）
///
/// 先頭ゼロの除去は区切り除去の後に行う。`"0-01"` のように区切りの奥に
/// ゼロが残る入力でも、正規化済みのキーを再度正規化して値が変わらない。
///
/// # Examples
/// ```
/// use order_splitter_common::normalize_key;
///
/// assert_eq!(normalize_key(" abc-123 ", false), "ABC123");
/// assert_eq!(normalize_key("000", true), "0");
/// ```
pub fn normalize_key(raw: &str, strip_leading_zeros: bool) -> String {
    let key: String = raw
        .trim()
        .to_uppercase()
        .chars()
        .filter(|c| !is_separator(*c))
        .collect();

    if !strip_leading_zeros {
        return key;
    }

    let stripped = key.trim_start_matches('0');
    if stripped.is_empty() && !key.is_empty() {
        "0".to_string()
    } else {
        stripped.to_string()
    }
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, '-' | '_' | '/')
}

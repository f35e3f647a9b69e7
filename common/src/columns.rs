//! ベンダー表の列解決
//!
//! 表計算ファイルの見出しは取引先ごとにばらばらなので、部分一致で
//! ベンダー列と品番列を探す。ここで型付きの `ColumnSelection` に落とし、
//! 分類処理側には見出し名の曖昧さを持ち込まない。

use crate::error::{Error, Result};

/// ベンダー列の見出しに含まれる語
const VENDOR_HINT: &str = "vendor";

/// 品番列の見出しに含まれる語
const KEY_HINTS: &[&str] = &["sku", "item", "model", "internet"];

/// 欠損値として扱うセル文字列（大文字小文字無視）
const PLACEHOLDERS: &[&str] = &["nan", "none", "null"];

/// 読み込んだ表（1行目が見出し）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl MappingTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }
}

/// セルを取得（列が足りない行は空文字）
pub fn cell(row: &[String], column: usize) -> &str {
    row.get(column).map(|s| s.as_str()).unwrap_or("")
}

/// 解決済みの列
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSelection {
    /// ベンダー列の位置
    pub vendor: usize,
    /// 品番列の位置（見出し順）
    pub keys: Vec<usize>,
}

impl ColumnSelection {
    /// 見出し名で列を表示する（診断用）
    pub fn describe(&self, headers: &[String]) -> (String, Vec<String>) {
        let name = |i: usize| headers.get(i).cloned().unwrap_or_default();
        (name(self.vendor), self.keys.iter().map(|&i| name(i)).collect())
    }
}

/// 見出しからベンダー列と品番列を決める
///
/// ベンダー列は見出しが `vendor` と完全一致する列を優先し、なければ `vendor` を
/// 含む最初の列。品番列は `sku` / `item` / `model` / `internet` を含む列のうち、
/// ベンダー列以外のすべて。
pub fn resolve_columns(headers: &[String]) -> Result<ColumnSelection> {
    let lowered: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();

    let vendor = lowered
        .iter()
        .position(|h| h == VENDOR_HINT)
        .or_else(|| lowered.iter().position(|h| h.contains(VENDOR_HINT)))
        .ok_or(Error::MissingVendorColumn)?;

    let keys: Vec<usize> = lowered
        .iter()
        .enumerate()
        .filter(|(i, h)| *i != vendor && KEY_HINTS.iter().any(|k| h.contains(k)))
        .map(|(i, _)| i)
        .collect();

    if keys.is_empty() {
        return Err(Error::MissingKeyColumn);
    }

    Ok(ColumnSelection { vendor, keys })
}

/// 空欄または欠損値の表記か
pub fn is_blank(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || PLACEHOLDERS.iter().any(|p| value.eq_ignore_ascii_case(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_resolve_columns_basic() {
        let h = headers(&["Description", "Vendor Name", "SKU", "Model #", "Qty"]);
        let selection = resolve_columns(&h).unwrap();
        assert_eq!(selection.vendor, 1);
        assert_eq!(selection.keys, vec![2, 3]);
    }

    #[test]
    fn test_resolve_columns_case_insensitive() {
        let h = headers(&["VENDOR", "internet number", "ITEM #"]);
        let selection = resolve_columns(&h).unwrap();
        assert_eq!(selection.vendor, 0);
        assert_eq!(selection.keys, vec![1, 2]);
    }

    #[test]
    fn test_resolve_columns_prefers_exact_vendor() {
        // "Vendor SKU" は品番列、"Vendor" がベンダー列
        let h = headers(&["Vendor SKU", " vendor ", "Model"]);
        let selection = resolve_columns(&h).unwrap();
        assert_eq!(selection.vendor, 1);
        assert_eq!(selection.keys, vec![0, 2]);
    }

    #[test]
    fn test_resolve_columns_missing_vendor() {
        let h = headers(&["SKU", "Model"]);
        assert!(matches!(resolve_columns(&h), Err(Error::MissingVendorColumn)));
    }

    #[test]
    fn test_resolve_columns_missing_key() {
        let h = headers(&["Vendor", "Description"]);
        assert!(matches!(resolve_columns(&h), Err(Error::MissingKeyColumn)));
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank("   "));
        assert!(is_blank("nan"));
        assert!(is_blank("NaN"));
        assert!(is_blank("None"));
        assert!(is_blank("null"));
        assert!(!is_blank("Acme"));
        assert!(!is_blank("0"));
    }

    #[test]
    fn test_cell_short_row() {
        let table = MappingTable::new(headers(&["Vendor", "SKU"]), vec![vec!["Acme".into()]]);
        let row = &table.rows[0];
        assert_eq!(cell(row, 0), "Acme");
        assert_eq!(cell(row, 1), "");
    }

    #[test]
    fn test_describe() {
        let h = headers(&["Vendor", "SKU", "Model"]);
        let selection = resolve_columns(&h).unwrap();
        let (vendor, keys) = selection.describe(&h);
        assert_eq!(vendor, "Vendor");
        assert_eq!(keys, vec!["SKU".to_string(), "Model".to_string()]);
    }
}

//! SKU→ベンダー表の読み込み
//!
//! 表計算（calamine）とCSV（csv）を同じ `MappingTable` に揃えてから
//! 列解決・索引構築に渡す。

use crate::error::{Result, SplitterError};
use calamine::{open_workbook_auto, Data, Reader};
use order_splitter_common::{
    resolve_columns, ColumnSelection, IndexOptions, MappingTable, VendorIndex,
};
use std::path::Path;
use tracing::{debug, warn};

const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "xlsb", "ods"];
const CSV_EXTENSION: &str = "csv";

/// 読み込み済みの表と索引
#[derive(Debug, Clone)]
pub struct LoadedMapping {
    pub table: MappingTable,
    pub selection: ColumnSelection,
    pub index: VendorIndex,
}

impl LoadedMapping {
    /// (ベンダー列名, 品番列名)
    pub fn column_names(&self) -> (String, Vec<String>) {
        self.selection.describe(&self.table.headers)
    }
}

/// 表を読み込む（1行目が見出し）
pub fn load_mapping_table(path: &Path) -> Result<MappingTable> {
    if !path.exists() {
        return Err(SplitterError::FileNotFound(path.display().to_string()));
    }

    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let table = if ext == CSV_EXTENSION {
        read_csv(path)?
    } else if SPREADSHEET_EXTENSIONS.contains(&ext.as_str()) {
        read_spreadsheet(path)?
    } else {
        return Err(SplitterError::UnsupportedMapping(path.display().to_string()));
    };

    debug!(
        path = %path.display(),
        columns = table.headers.len(),
        rows = table.rows.len(),
        "ベンダー表を読み込み"
    );
    Ok(table)
}

/// 表を読み込み、列を解決して索引を作る
///
/// 品番衝突は方針に従って解決したうえで、すべて警告として残す。
pub fn load_vendor_index(path: &Path, options: &IndexOptions) -> Result<LoadedMapping> {
    let table = load_mapping_table(path)?;
    let selection = resolve_columns(&table.headers)?;
    let index = VendorIndex::build(&table, &selection, options)?;

    for conflict in index.conflicts() {
        warn!(
            key = %conflict.key,
            existing = %conflict.existing,
            incoming = %conflict.incoming,
            kept = %conflict.kept,
            "同じ品番に複数のベンダーが登録されています"
        );
    }

    Ok(LoadedMapping {
        table,
        selection,
        index,
    })
}

fn read_spreadsheet(path: &Path) -> Result<MappingTable> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| SplitterError::MappingLoad(format!("{}: {}", path.display(), e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SplitterError::MappingLoad(format!("{}: シートがありません", path.display())))?
        .map_err(|e| SplitterError::MappingLoad(format!("{}: {}", path.display(), e)))?;

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect::<Vec<String>>());

    let headers = rows
        .next()
        .ok_or_else(|| SplitterError::MappingLoad(format!("{}: 表が空です", path.display())))?;

    Ok(MappingTable::new(
        headers,
        rows.filter(|row| row.iter().any(|v| !v.is_empty())).collect(),
    ))
}

fn read_csv(path: &Path) -> Result<MappingTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_path(path)?;

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: Vec<String> = record.iter().map(|v| v.trim().to_string()).collect();
        if row.iter().any(|v| !v.is_empty()) {
            rows.push(row);
        }
    }

    Ok(MappingTable::new(headers, rows))
}

/// セルを文字列に（品番の数値セルは小数点なしで）
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::Error(_) => String::new(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_to_string() {
        assert_eq!(cell_to_string(&Data::Empty), "");
        assert_eq!(cell_to_string(&Data::String(" ABC-1 ".into())), "ABC-1");
        assert_eq!(cell_to_string(&Data::Float(12345.0)), "12345");
        assert_eq!(cell_to_string(&Data::Float(1.5)), "1.5");
        assert_eq!(cell_to_string(&Data::Int(42)), "42");
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("map.txt");
        std::fs::write(&path, "Vendor,SKU\n").unwrap();

        assert!(matches!(
            load_mapping_table(&path),
            Err(SplitterError::UnsupportedMapping(_))
        ));
    }
}

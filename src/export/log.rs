//! 監査ログの書き出し（CSV / Excel）

use crate::error::{Result, SplitterError};
use order_splitter_common::{LogRecord, LOG_COLUMNS};
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook};
use std::path::Path;

const SHEET_NAME: &str = "summary";

/// 見出し＋1ページ1行のCSV
pub fn write_csv_log(records: &[LogRecord], output_path: &Path) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(output_path)?;

    writer.write_record(LOG_COLUMNS)?;
    for record in records {
        writer.write_record(record.values())?;
    }
    writer.flush()?;
    Ok(())
}

/// CSVと同じ列構成のExcel
pub fn write_xlsx_log(records: &[LogRecord], output_path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Thin);

    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(SHEET_NAME)
        .map_err(|e| SplitterError::ExcelGeneration(format!("シート名設定エラー: {}", e)))?;

    for (col, name) in LOG_COLUMNS.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *name, &header_format)
            .map_err(|e| SplitterError::ExcelGeneration(e.to_string()))?;
    }

    for (row, record) in records.iter().enumerate() {
        for (col, value) in record.values().iter().enumerate() {
            worksheet
                .write_string(row as u32 + 1, col as u16, *value)
                .map_err(|e| SplitterError::ExcelGeneration(e.to_string()))?;
        }
    }

    worksheet
        .set_freeze_panes(1, 0)
        .map_err(|e| SplitterError::ExcelGeneration(e.to_string()))?;

    workbook
        .save(output_path)
        .map_err(|e| SplitterError::ExcelGeneration(format!("{}: {}", output_path.display(), e)))?;
    Ok(())
}

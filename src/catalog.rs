//! カタログファイル読み込み
//!
//! - .csv: 1行目ヘッダーのCSV
//! - .xlsx / .xls / .ods: 先頭シート（calamine）

use crate::error::{PhotoSearchError, Result};
use calamine::{open_workbook_auto, Data, DataType, Reader};
use photo_search_common::CatalogTable;
use std::path::Path;

const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "ods"];

/// カタログファイルを読み込む
///
/// 任意列が無い場合は警告だけ出して続行する。
pub fn load_catalog(path: &Path) -> Result<CatalogTable> {
    if !path.exists() {
        return Err(PhotoSearchError::FileNotFound(path.display().to_string()));
    }

    let catalog = if is_spreadsheet(path) {
        load_spreadsheet(path)?
    } else {
        let content = std::fs::read_to_string(path)?;
        CatalogTable::from_csv_str(&content)?
    };

    for column in catalog.missing_optional_columns() {
        tracing::warn!(column = %column, "カタログに列がありません。この列の条件は無視されます");
    }
    if catalog.skipped_rows() > 0 {
        tracing::warn!(
            skipped = catalog.skipped_rows(),
            "ID/Name/URL が空の行を読み飛ばしました"
        );
    }
    tracing::debug!(rows = catalog.len(), path = %path.display(), "カタログ読み込み完了");

    Ok(catalog)
}

fn is_spreadsheet(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .map(|ext| SPREADSHEET_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

fn load_spreadsheet(path: &Path) -> Result<CatalogTable> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| PhotoSearchError::CatalogLoad(format!("{}: {}", path.display(), e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| PhotoSearchError::CatalogLoad("シートがありません".into()))?
        .map_err(|e| PhotoSearchError::CatalogLoad(e.to_string()))?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|row| row.iter().map(cell_to_string).collect())
        .unwrap_or_default();
    let records: Vec<Vec<String>> = rows
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();

    Ok(CatalogTable::from_rows(&headers, records)?)
}

/// セルを文字列化（日付セルは YYYY-MM-DD）
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::DateTime(_) | Data::DateTimeIso(_) => cell
            .as_date()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| cell.to_string()),
        Data::Empty => String::new(),
        _ => cell.to_string(),
    }
}

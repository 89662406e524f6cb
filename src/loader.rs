//! Excel読み込み
//!
//! calamine でブックを開き、共通の Workbook モデルに変換する。

use crate::error::{PriceMatchError, Result, WorkbookSide};
use calamine::{open_workbook_auto, Data, Range, Reader};
use price_match_common::{CellValue, Sheet, Workbook};
use std::path::Path;

/// ブックを開いて全シートを読み込む
///
/// `keep_formulas` が true の場合、数式セルは計算結果ではなく数式として保持する。
pub fn open_workbook(path: &Path, side: WorkbookSide, keep_formulas: bool) -> Result<Workbook> {
    let load_err = |source| PriceMatchError::Load { side, source };

    let mut source = open_workbook_auto(path).map_err(load_err)?;
    let mut workbook = Workbook::new();

    for name in source.sheet_names() {
        let range = source.worksheet_range(&name).map_err(load_err)?;
        let mut sheet = Sheet::new(name.as_str());
        copy_values(&range, &mut sheet);

        if keep_formulas {
            match source.worksheet_formula(&name) {
                Ok(formulas) => copy_formulas(&formulas, &mut sheet),
                // xls など数式を取得できない形式は値のみで続行
                Err(e) => tracing::debug!(sheet = %name, error = %e, "formula range unavailable"),
            }
        }

        tracing::debug!(
            sheet = %name,
            rows = sheet.row_count(),
            cols = sheet.column_count(),
            "loaded sheet"
        );
        workbook.add_sheet(sheet);
    }

    Ok(workbook)
}

fn copy_values(range: &Range<Data>, sheet: &mut Sheet) {
    let (Some((row0, col0)), Some((row1, col1))) = (range.start(), range.end()) else {
        return;
    };

    for (row, col, data) in range.used_cells() {
        sheet.set(row0 + row as u32, (col0 as usize + col) as u16, cell_value(data));
    }
    sheet.extend_to(row1 + 1, (col1 + 1) as u16);
}

fn copy_formulas(range: &Range<String>, sheet: &mut Sheet) {
    let Some((row0, col0)) = range.start() else {
        return;
    };

    for (row, col, formula) in range.used_cells() {
        if formula.is_empty() {
            continue;
        }
        let formula = formula.strip_prefix('=').unwrap_or(formula);
        sheet.set(
            row0 + row as u32,
            (col0 as usize + col) as u16,
            CellValue::Formula(formula.to_string()),
        );
    }
}

/// calamine のセル値を変換
pub fn cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::String(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::DateTime(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(e) => CellValue::Error(e.to_string()),
    }
}

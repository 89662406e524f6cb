//! Excel保存（CLI版）
//!
//! 照会ブックは元ファイル（.xlsx）に変更セルだけを書き込んで保存し、書式を残す。
//! それ以外は共通ライブラリで生成したバッファをファイルに書き出す。

use crate::error::{PriceMatchError, Result};
use price_match_common::export::excel_core::generate_workbook_buffer;
use price_match_common::{CellValue, Workbook};
use std::path::Path;

/// ワークブックを .xlsx として保存（値と数式のみ）
pub fn save_workbook(workbook: &Workbook, output_path: &Path) -> Result<()> {
    let buffer = generate_workbook_buffer(workbook)
        .map_err(|e| PriceMatchError::ExcelGeneration(e.to_string()))?;

    std::fs::write(output_path, buffer).map_err(|e| {
        PriceMatchError::ExcelGeneration(format!(
            "ファイル書き込みエラー ({}): {}",
            output_path.display(),
            e
        ))
    })?;

    tracing::debug!(path = %output_path.display(), "workbook saved");
    Ok(())
}

/// 照会ブックを保存
///
/// `source` が .xlsx なら元ファイルを開き直し、`Workbook::write` で変更したセルだけを反映する。
/// 結合セル・列幅・表示形式・フォントなどはそのまま残る。
/// .xls / .xlsm / .ods などは `save_workbook` と同じく値と数式のみを書き出す。
pub fn save_inquiry(workbook: &Workbook, source: &Path, output_path: &Path) -> Result<()> {
    if !is_xlsx(source) {
        tracing::debug!(source = %source.display(), "not an xlsx source, formatting is not carried over");
        return save_workbook(workbook, output_path);
    }

    let mut book = umya_spreadsheet::reader::xlsx::read(source).map_err(|e| {
        PriceMatchError::ExcelGeneration(format!(
            "元ファイル読み込みエラー ({}): {}",
            source.display(),
            e
        ))
    })?;

    for cell in workbook.edited_cells() {
        let (Some(sheet), Some(value)) = (workbook.sheet(cell.sheet), workbook.read(cell)) else {
            continue;
        };
        let target = book.get_sheet_by_name_mut(sheet.name()).ok_or_else(|| {
            PriceMatchError::ExcelGeneration(format!("シートが見つかりません: {}", sheet.name()))
        })?;
        write_value(target.get_cell_mut(cell.a1().as_str()), value);
    }

    umya_spreadsheet::writer::xlsx::write(&book, output_path).map_err(|e| {
        PriceMatchError::ExcelGeneration(format!(
            "ファイル書き込みエラー ({}): {}",
            output_path.display(),
            e
        ))
    })?;

    tracing::debug!(path = %output_path.display(), edits = workbook.edited_cells().count(), "inquiry saved in place");
    Ok(())
}

fn is_xlsx(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx"))
}

fn write_value(cell: &mut umya_spreadsheet::Cell, value: &CellValue) {
    match value {
        CellValue::Empty => {
            cell.set_value_string(String::new());
        }
        CellValue::String(s) | CellValue::Error(s) => {
            cell.set_value_string(s.clone());
        }
        CellValue::Number(n) | CellValue::DateTime(n) => {
            cell.set_value_number(*n);
        }
        CellValue::Bool(b) => {
            cell.set_value_bool(*b);
        }
        CellValue::Formula(formula) => {
            cell.set_formula(formula.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use price_match_common::{CellRef, Sheet};

    #[test]
    fn test_save_workbook_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");

        let mut sheet = Sheet::new("BOQ");
        sheet.set(0, 0, "Description");
        let mut workbook = Workbook::new();
        workbook.add_sheet(sheet);

        save_workbook(&workbook, &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_save_into_missing_folder_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.xlsx");

        let err = save_workbook(&Workbook::new(), &path).unwrap_err();
        assert!(matches!(err, PriceMatchError::ExcelGeneration(_)));
    }

    #[test]
    fn test_is_xlsx() {
        assert!(is_xlsx(Path::new("inquiry.xlsx")));
        assert!(is_xlsx(Path::new("INQUIRY.XLSX")));
        assert!(!is_xlsx(Path::new("inquiry.xls")));
        assert!(!is_xlsx(Path::new("inquiry.xlsm")));
        assert!(!is_xlsx(Path::new("inquiry")));
    }

    #[test]
    fn test_save_inquiry_applies_edits_to_source() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("inquiry.xlsx");
        let output = dir.path().join("out.xlsx");

        let mut sheet = Sheet::new("BOQ");
        sheet.set(0, 0, "Description");
        sheet.set(0, 1, "Rate");
        sheet.set(1, 0, "Timber door");
        let mut workbook = Workbook::new();
        workbook.add_sheet(sheet);
        save_workbook(&workbook, &source).unwrap();

        workbook.write(CellRef::new(0, 1, 1), 1200.0).unwrap();
        workbook.write(CellRef::new(0, 0, 2), "Matched Description").unwrap();
        save_inquiry(&workbook, &source, &output).unwrap();

        let saved = crate::loader::open_workbook(&output, crate::error::WorkbookSide::Inquiry, false).unwrap();
        let sheet = saved.sheet(0).unwrap();
        assert_eq!(sheet.name(), "BOQ");
        assert_eq!(sheet.get(1, 0), &CellValue::from("Timber door"));
        assert_eq!(sheet.get(1, 1), &CellValue::Number(1200.0));
        assert_eq!(sheet.get(0, 2), &CellValue::from("Matched Description"));
    }
}

//! Excel書き出し（共通ライブラリ）
//!
//! メモリ上の Workbook を rust_xlsxwriter で .xlsx バイト列に変換する。
//! 値・数式・シート名・シート順序のみを出力し、書式は引き継がない。

use crate::error::{Error, Result};
use crate::workbook::{CellValue, Workbook};
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook, Worksheet, XlsxError};

/// 日付セルの表示形式
const DATE_NUM_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Workbook を .xlsx のバイト列に変換
pub fn generate_workbook_buffer(workbook: &Workbook) -> Result<Vec<u8>> {
    let mut xlsx = XlsxWorkbook::new();
    let date_format = Format::new().set_num_format(DATE_NUM_FORMAT);

    for sheet in workbook.sheets() {
        let worksheet = xlsx.add_worksheet();
        worksheet
            .set_name(sheet.name())
            .map_err(|e| Error::Excel(format!("シート名設定エラー ({}): {}", sheet.name(), e)))?;

        for (row, col, value) in sheet.cells() {
            write_cell(worksheet, row, col, value, &date_format).map_err(|e| {
                Error::Excel(format!(
                    "セル書き込みエラー ({}!{}{}): {}",
                    sheet.name(),
                    crate::workbook::column_name(col),
                    row + 1,
                    e
                ))
            })?;
        }
    }

    xlsx.save_to_buffer()
        .map_err(|e| Error::Excel(format!("Excel保存エラー: {}", e)))
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &CellValue,
    date_format: &Format,
) -> std::result::Result<(), XlsxError> {
    match value {
        CellValue::Empty => {}
        CellValue::String(s) => {
            worksheet.write_string(row, col, s.as_str())?;
        }
        CellValue::Number(n) => {
            worksheet.write_number(row, col, *n)?;
        }
        CellValue::Bool(b) => {
            worksheet.write_boolean(row, col, *b)?;
        }
        CellValue::DateTime(serial) => {
            worksheet.write_number_with_format(row, col, *serial, date_format)?;
        }
        CellValue::Formula(formula) => {
            worksheet.write_formula(row, col, formula.as_str())?;
        }
        CellValue::Error(e) => {
            worksheet.write_string(row, col, e.as_str())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::Sheet;

    #[test]
    fn test_generate_buffer_is_zip() {
        let mut workbook = Workbook::new();
        let mut sheet = Sheet::new("BOQ");
        sheet.set(0, 0, "Description");
        sheet.set(0, 1, "Rate");
        sheet.set(1, 0, "timber door");
        sheet.set(1, 1, 1200.0);
        sheet.set(1, 2, CellValue::Formula("B2*2".into()));
        sheet.set(1, 3, CellValue::Bool(true));
        workbook.add_sheet(sheet);

        let buffer = generate_workbook_buffer(&workbook).unwrap();
        // xlsx は ZIP コンテナ
        assert!(buffer.starts_with(b"PK"));
    }

    #[test]
    fn test_invalid_sheet_name_is_reported() {
        let mut workbook = Workbook::new();
        workbook.add_sheet(Sheet::new("bad[name]"));

        let err = generate_workbook_buffer(&workbook).unwrap_err();
        assert!(matches!(err, Error::Excel(_)));
    }
}

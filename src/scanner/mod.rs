//! 照会シートの走査
//!
//! シートごとにヘッダー行を探し、単価が未記入の行を照合対象として抽出する。

use crate::error::{PriceMatchError, Result, WorkbookSide};
use crate::loader;
use crate::normalizer::normalize_description;
use price_match_common::layout::{
    DESCRIPTION_LABEL, HEADER_PROBE_ROWS, QUANTITY_LABELS, RATE_LABEL,
};
use price_match_common::{column_name, CellRef, HeaderLayout, Sheet, Workbook};
use std::collections::BTreeMap;
use std::path::Path;

/// 照合対象（単価を埋める行）
#[derive(Debug, Clone, PartialEq)]
pub struct InquiryTarget {
    /// 単価セル
    pub cell: CellRef,
    /// 正規化済みの説明
    pub description: String,
}

/// 走査結果
#[derive(Debug, Clone, Default)]
pub struct InquiryScan {
    pub targets: Vec<InquiryTarget>,
    /// シート番号 → ヘッダー配置（ヘッダーが見つかったシートのみ）
    pub layouts: BTreeMap<usize, HeaderLayout>,
}

impl InquiryScan {
    pub fn targets_in_sheet(&self, sheet: usize) -> usize {
        self.targets.iter().filter(|t| t.cell.sheet == sheet).count()
    }
}

/// 照会ファイルを開く（数式は保持）
pub fn open_inquiry(path: &Path, log: &dyn Fn(&str)) -> Result<Workbook> {
    log("Reading inquiry file...");
    loader::open_workbook(path, WorkbookSide::Inquiry, true)
}

/// 全シートを走査して照合対象を集める
pub fn scan_inquiry(workbook: &Workbook, log: &dyn Fn(&str)) -> Result<InquiryScan> {
    let mut scan = InquiryScan::default();

    for (sheet_idx, sheet) in workbook.sheets().iter().enumerate() {
        log(&format!("Scanning inquiry sheet '{}' for headers...", sheet.name()));

        let Some(layout) = detect_header(sheet) else {
            log(&format!("Skipping sheet '{}' (no valid headers).", sheet.name()));
            continue;
        };

        log(&format!(
            "Found headers in '{}' at row {} (Desc col={}, Rate col={}, Qty col={}).",
            sheet.name(),
            layout.header_row + 1,
            column_name(layout.description_col),
            column_name(layout.rate_col),
            layout
                .quantity_col
                .map(column_name)
                .unwrap_or_else(|| "none".to_string()),
        ));

        scan.layouts.insert(sheet_idx, layout);
        let before = scan.targets.len();
        scan.targets.extend(sheet_targets(sheet_idx, sheet, layout));

        log(&format!(
            "Found {} items to price in '{}'.",
            scan.targets.len() - before,
            sheet.name()
        ));
    }

    if scan.targets.is_empty() {
        return Err(PriceMatchError::EmptyInquiry);
    }

    Ok(scan)
}

/// 先頭10行からヘッダー行を探す
///
/// ラベル列は行をまたいで記録し（同じラベルは後に見つかった列で上書き）、
/// 説明列と単価列の両方が揃った最初の行をヘッダー行とする。
pub fn detect_header(sheet: &Sheet) -> Option<HeaderLayout> {
    let mut description_col = None;
    let mut rate_col = None;
    let mut quantity_col = None;

    for row in 0..HEADER_PROBE_ROWS {
        for col in 0..sheet.column_count() {
            let Some(text) = sheet.get(row, col).as_str() else {
                continue;
            };
            let label = text.trim().to_lowercase();
            if label == DESCRIPTION_LABEL {
                description_col = Some(col);
            } else if label == RATE_LABEL {
                rate_col = Some(col);
            } else if QUANTITY_LABELS.contains(&label.as_str()) {
                quantity_col = Some(col);
            }
        }

        if let (Some(description_col), Some(rate_col)) = (description_col, rate_col) {
            return Some(HeaderLayout {
                header_row: row,
                description_col,
                rate_col,
                quantity_col,
            });
        }
    }

    None
}

/// ヘッダー行より下で単価が未記入の行
fn sheet_targets(
    sheet_idx: usize,
    sheet: &Sheet,
    layout: HeaderLayout,
) -> impl Iterator<Item = InquiryTarget> + '_ {
    (layout.header_row + 1..sheet.row_count()).filter_map(move |row| {
        let description = sheet.get(row, layout.description_col);
        if description.is_blank() {
            return None;
        }
        if let Some(qty_col) = layout.quantity_col {
            if sheet.get(row, qty_col).is_blank() {
                return None;
            }
        }
        // 既に単価が入っている行は上書きしない
        if !sheet.get(row, layout.rate_col).is_empty() {
            return None;
        }

        Some(InquiryTarget {
            cell: CellRef::new(sheet_idx, row, layout.rate_col),
            description: normalize_description(&description.to_string()),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use price_match_common::CellValue;

    fn boq_sheet() -> Sheet {
        let mut sheet = Sheet::new("BOQ");
        sheet.set(0, 0, "Project: Villa 12");
        sheet.set(2, 0, "Item");
        sheet.set(2, 1, " Description ");
        sheet.set(2, 2, "QTY");
        sheet.set(2, 3, "Rate");
        sheet.set(2, 4, "Amount");

        // 対象
        sheet.set(3, 0, "1");
        sheet.set(3, 1, "100mm. R.C.C. slab");
        sheet.set(3, 2, 12.0);
        // 単価記入済み
        sheet.set(4, 0, "2");
        sheet.set(4, 1, "Timber door");
        sheet.set(4, 2, 3.0);
        sheet.set(4, 3, 1150.0);
        // 数量なし
        sheet.set(5, 0, "3");
        sheet.set(5, 1, "Painting");
        // 説明なし
        sheet.set(6, 0, "4");
        sheet.set(6, 2, 1.0);
        // 対象（数式の数量）
        sheet.set(7, 0, "5");
        sheet.set(7, 1, "Gypsum board");
        sheet.set(7, 2, CellValue::Formula("C4*2".into()));
        sheet
    }

    #[test]
    fn test_detect_header() {
        let layout = detect_header(&boq_sheet()).unwrap();
        assert_eq!(
            layout,
            HeaderLayout {
                header_row: 2,
                description_col: 1,
                rate_col: 3,
                quantity_col: Some(2),
            }
        );
    }

    #[test]
    fn test_detect_header_across_rows() {
        let mut sheet = Sheet::new("Split");
        sheet.set(1, 0, "Description");
        sheet.set(3, 4, "Rate");

        let layout = detect_header(&sheet).unwrap();
        assert_eq!(layout.header_row, 3);
        assert_eq!(layout.description_col, 0);
        assert_eq!(layout.rate_col, 4);
        assert_eq!(layout.quantity_col, None);
    }

    #[test]
    fn test_detect_header_last_occurrence_wins() {
        let mut sheet = Sheet::new("Dup");
        sheet.set(0, 0, "Description");
        sheet.set(0, 2, "description");
        sheet.set(0, 3, "rate");

        let layout = detect_header(&sheet).unwrap();
        assert_eq!(layout.description_col, 2);
    }

    #[test]
    fn test_detect_header_on_tenth_row() {
        let mut sheet = Sheet::new("Deep");
        sheet.set(9, 0, "Description");
        sheet.set(9, 1, "Rate");
        sheet.set(10, 0, "Excavation");

        let layout = detect_header(&sheet).unwrap();
        assert_eq!(layout.header_row, 9);

        let mut workbook = Workbook::new();
        workbook.add_sheet(sheet);
        let scan = scan_inquiry(&workbook, &|_| {}).unwrap();
        assert_eq!(scan.targets[0].cell, CellRef::new(0, 10, 1));
    }

    #[test]
    fn test_detect_header_beyond_probe_rows() {
        let mut sheet = Sheet::new("Deep");
        sheet.set(10, 0, "Description");
        sheet.set(10, 1, "Rate");
        assert_eq!(detect_header(&sheet), None);
    }

    #[test]
    fn test_scan_targets() {
        let mut workbook = Workbook::new();
        workbook.add_sheet(boq_sheet());

        let scan = scan_inquiry(&workbook, &|_| {}).unwrap();
        assert_eq!(scan.targets.len(), 2);
        assert_eq!(scan.targets[0].cell, CellRef::new(0, 3, 3));
        assert_eq!(scan.targets[0].description, "100mm rcc slab");
        assert_eq!(scan.targets[1].cell, CellRef::new(0, 7, 3));
        assert_eq!(scan.targets[1].description, "gypsum board");
        assert_eq!(scan.layouts.len(), 1);
    }

    #[test]
    fn test_whitespace_rate_is_not_overwritten() {
        let mut sheet = Sheet::new("S");
        sheet.set(0, 0, "Description");
        sheet.set(0, 1, "Rate");
        sheet.set(1, 0, "Excavation");
        sheet.set(1, 1, " ");
        sheet.set(2, 0, "Backfill");

        let mut workbook = Workbook::new();
        workbook.add_sheet(sheet);

        let scan = scan_inquiry(&workbook, &|_| {}).unwrap();
        assert_eq!(scan.targets.len(), 1);
        assert_eq!(scan.targets[0].description, "backfill");
    }

    #[test]
    fn test_sheet_without_headers_is_skipped() {
        let mut notes = Sheet::new("Notes");
        notes.set(0, 0, "General notes");
        let mut workbook = Workbook::new();
        workbook.add_sheet(notes);
        workbook.add_sheet(boq_sheet());

        let logs = std::cell::RefCell::new(Vec::new());
        let scan = scan_inquiry(&workbook, &|m| logs.borrow_mut().push(m.to_string())).unwrap();

        assert!(!scan.layouts.contains_key(&0));
        assert!(scan.layouts.contains_key(&1));
        assert_eq!(scan.targets_in_sheet(0), 0);
        assert_eq!(scan.targets_in_sheet(1), 2);
        assert!(logs
            .borrow()
            .contains(&"Skipping sheet 'Notes' (no valid headers).".to_string()));
        assert!(logs
            .borrow()
            .contains(&"Found 2 items to price in 'BOQ'.".to_string()));
    }

    #[test]
    fn test_only_headerless_sheet_is_empty_inquiry() {
        let mut notes = Sheet::new("Notes");
        notes.set(0, 0, "Description only");
        let mut workbook = Workbook::new();
        workbook.add_sheet(notes);

        let err = scan_inquiry(&workbook, &|_| {}).unwrap_err();
        assert!(matches!(err, PriceMatchError::EmptyInquiry));
    }
}

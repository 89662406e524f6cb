//! 単価表の読み込み
//!
//! 全シート・全行から（説明, 単価）の組を抽出する。
//! 抽出順（シート順 → 行順）のインデックスが後段の照合キーになる。

use crate::error::{PriceMatchError, Result, WorkbookSide};
use crate::loader;
use crate::normalizer::normalize_description;
use price_match_common::{CellValue, Sheet, Workbook};
use serde::Serialize;
use std::path::Path;

/// 単価表の1品目
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceEntry {
    /// 正規化済みの説明
    pub description: String,
    /// 単価（セルの値をそのまま保持）
    pub rate: CellValue,
}

/// 単価表ファイルを読み込む
pub fn load_pricelist(path: &Path, log: &dyn Fn(&str)) -> Result<Vec<PriceEntry>> {
    log("Reading pricelist file...");
    let workbook = loader::open_workbook(path, WorkbookSide::Pricelist, false)?;
    extract_entries(&workbook, log)
}

/// 読み込み済みのブックから品目を抽出する
pub fn extract_entries(workbook: &Workbook, log: &dyn Fn(&str)) -> Result<Vec<PriceEntry>> {
    log(&format!("Pricelist has {} sheet(s).", workbook.sheet_count()));

    let mut entries = Vec::new();
    for sheet in workbook.sheets() {
        log(&format!("Processing pricelist sheet '{}'...", sheet.name()));
        entries.extend(sheet_entries(sheet));
    }

    if entries.is_empty() {
        return Err(PriceMatchError::EmptyPricelist);
    }

    log(&format!("Loaded {} pricelist items.", entries.len()));
    Ok(entries)
}

/// 1シート分の品目
///
/// 説明は2列目（1列しかなければ1列目）、単価はシートの最終列から取る。
fn sheet_entries(sheet: &Sheet) -> impl Iterator<Item = PriceEntry> + '_ {
    let width = sheet.column_count();

    (0..sheet.row_count()).filter_map(move |row| {
        if width == 0 || sheet.row(row).all(CellValue::is_empty) {
            return None;
        }

        let description = sheet.get(row, if width > 1 { 1 } else { 0 });
        let rate = sheet.get(row, width - 1);

        if description.is_empty() || description.is_zero() {
            return None;
        }
        if rate.is_empty() || rate.is_zero() {
            return None;
        }

        let description = normalize_description(&description.to_string());
        if description.is_empty() {
            return None;
        }

        Some(PriceEntry {
            description,
            rate: rate.clone(),
        })
    })
}

//! ワークブックモデル
//!
//! 読み込んだExcelをシート単位の疎なセルマップとして保持する。
//! 座標はすべて0始まり（行: u32, 列: u16）で、rust_xlsxwriter の RowNum/ColNum に合わせている。

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// セル値
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum CellValue {
    #[default]
    Empty,
    String(String),
    Number(f64),
    Bool(bool),
    /// Excelシリアル値
    DateTime(f64),
    /// 先頭の `=` を含まない数式
    Formula(String),
    /// `#DIV/0!` などのエラー値
    Error(String),
}

static EMPTY: CellValue = CellValue::Empty;

impl CellValue {
    /// 値なし、または空文字列
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// 値なし、または空白のみの文字列
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::String(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// 数値0 / false
    pub fn is_zero(&self) -> bool {
        matches!(self, CellValue::Number(n) if *n == 0.0) || matches!(self, CellValue::Bool(false))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::String(s) => write!(f, "{}", s),
            // 整数値は小数点なしで表示（"100mm" の 100 が "100.0" にならないように）
            CellValue::Number(n) | CellValue::DateTime(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            CellValue::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            CellValue::Formula(formula) => write!(f, "={}", formula),
            CellValue::Error(e) => write!(f, "{}", e),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::String(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::String(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

/// セル参照（シート番号 + 行 + 列）
///
/// ワークブックへの借用は持たず、書き込み時に `Workbook::write` で解決する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellRef {
    pub sheet: usize,
    pub row: u32,
    pub col: u16,
}

impl CellRef {
    pub fn new(sheet: usize, row: u32, col: u16) -> Self {
        Self { sheet, row, col }
    }

    /// 同じ行の別の列
    pub fn with_col(self, col: u16) -> Self {
        Self { col, ..self }
    }

    /// A1形式（例: "C4"）
    pub fn a1(&self) -> String {
        format!("{}{}", column_name(self.col), self.row + 1)
    }
}

/// 0始まりの列番号を列名に変換（0 → "A", 26 → "AA"）
pub fn column_name(col: u16) -> String {
    let mut n = col as u32 + 1;
    let mut name = Vec::new();
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        name.push(b'A' + rem);
        n = (n - 1) / 26;
    }
    name.reverse();
    String::from_utf8(name).unwrap_or_default()
}

/// ワークシート
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    name: String,
    cells: BTreeMap<(u32, u16), CellValue>,
    /// 使用範囲の行数（最終行 + 1）
    rows: u32,
    /// 使用範囲の列数（最終列 + 1）
    cols: u16,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 使用範囲の行数
    pub fn row_count(&self) -> u32 {
        self.rows
    }

    /// 使用範囲の列数
    pub fn column_count(&self) -> u16 {
        self.cols
    }

    pub fn get(&self, row: u32, col: u16) -> &CellValue {
        self.cells.get(&(row, col)).unwrap_or(&EMPTY)
    }

    /// セルに値を設定する。`Empty` の場合はセルを削除するが、使用範囲は縮めない
    pub fn set(&mut self, row: u32, col: u16, value: impl Into<CellValue>) {
        let value = value.into();
        if value == CellValue::Empty {
            self.cells.remove(&(row, col));
            return;
        }
        self.extend_to(row + 1, col + 1);
        self.cells.insert((row, col), value);
    }

    /// 使用範囲を少なくとも `rows` x `cols` まで広げる
    pub fn extend_to(&mut self, rows: u32, cols: u16) {
        self.rows = self.rows.max(rows);
        self.cols = self.cols.max(cols);
    }

    /// 行の全セル（使用範囲の列数分、空セル込み）
    pub fn row(&self, row: u32) -> impl Iterator<Item = &CellValue> + '_ {
        (0..self.cols).map(move |col| self.get(row, col))
    }

    /// 値のあるセルを行優先で列挙
    pub fn cells(&self) -> impl Iterator<Item = (u32, u16, &CellValue)> + '_ {
        self.cells.iter().map(|(&(row, col), value)| (row, col, value))
    }
}

/// ワークブック（シートの順序はファイル内の順序）
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    sheets: Vec<Sheet>,
    /// `write` で書き込まれたセル（元ファイルへの反映用）
    edits: BTreeSet<CellRef>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// シートを末尾に追加し、そのインデックスを返す
    pub fn add_sheet(&mut self, sheet: Sheet) -> usize {
        self.sheets.push(sheet);
        self.sheets.len() - 1
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn sheet(&self, index: usize) -> Option<&Sheet> {
        self.sheets.get(index)
    }

    pub fn sheet_mut(&mut self, index: usize) -> Option<&mut Sheet> {
        self.sheets.get_mut(index)
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// セル参照を解決して値を取得
    pub fn read(&self, cell: CellRef) -> Option<&CellValue> {
        self.sheet(cell.sheet).map(|s| s.get(cell.row, cell.col))
    }

    /// セル参照を解決して値を書き込む
    pub fn write(&mut self, cell: CellRef, value: impl Into<CellValue>) -> crate::Result<()> {
        let sheet = self
            .sheet_mut(cell.sheet)
            .ok_or(crate::Error::SheetNotFound(cell.sheet))?;
        sheet.set(cell.row, cell.col, value);
        self.edits.insert(cell);
        Ok(())
    }

    /// 読み込み後に `write` で変更されたセル（シート・行・列順）
    pub fn edited_cells(&self) -> impl Iterator<Item = CellRef> + '_ {
        self.edits.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_name() {
        assert_eq!(column_name(0), "A");
        assert_eq!(column_name(2), "C");
        assert_eq!(column_name(25), "Z");
        assert_eq!(column_name(26), "AA");
        assert_eq!(column_name(27), "AB");
        assert_eq!(column_name(701), "ZZ");
        assert_eq!(column_name(702), "AAA");
    }

    #[test]
    fn test_cell_ref_a1() {
        assert_eq!(CellRef::new(0, 3, 1).a1(), "B4");
        assert_eq!(CellRef::new(2, 0, 27).with_col(4).a1(), "E1");
    }

    #[test]
    fn test_sheet_extent_grows_with_writes() {
        let mut sheet = Sheet::new("BOQ");
        assert_eq!(sheet.row_count(), 0);
        assert_eq!(sheet.column_count(), 0);

        sheet.set(2, 1, "Description");
        assert_eq!(sheet.row_count(), 3);
        assert_eq!(sheet.column_count(), 2);

        // 空値の書き込みでは範囲は縮まない
        sheet.set(2, 1, CellValue::Empty);
        assert_eq!(sheet.column_count(), 2);
        assert!(sheet.get(2, 1).is_empty());
    }

    #[test]
    fn test_row_is_padded_to_column_count() {
        let mut sheet = Sheet::new("Prices");
        sheet.set(0, 0, "A-1");
        sheet.set(1, 3, 120.0);

        let row: Vec<&CellValue> = sheet.row(0).collect();
        assert_eq!(row.len(), 4);
        assert_eq!(row[0], &CellValue::from("A-1"));
        assert!(row[3].is_empty());
    }

    #[test]
    fn test_cell_value_predicates() {
        assert!(CellValue::Empty.is_empty());
        assert!(CellValue::from("").is_empty());
        assert!(!CellValue::from("  ").is_empty());
        assert!(CellValue::from("  ").is_blank());
        assert!(CellValue::Number(0.0).is_zero());
        assert!(CellValue::Bool(false).is_zero());
        assert!(!CellValue::Number(0.5).is_zero());
        assert!(!CellValue::Formula("SUM(A1:A3)".into()).is_blank());
    }

    #[test]
    fn test_cell_value_display() {
        assert_eq!(CellValue::Number(100.0).to_string(), "100");
        assert_eq!(CellValue::Number(12.5).to_string(), "12.5");
        assert_eq!(CellValue::Formula("B2*C2".into()).to_string(), "=B2*C2");
        assert_eq!(CellValue::Empty.to_string(), "");
    }

    #[test]
    fn test_workbook_write_through_cell_ref() {
        let mut workbook = Workbook::new();
        let idx = workbook.add_sheet(Sheet::new("Sheet1"));
        let cell = CellRef::new(idx, 4, 2);

        workbook.write(cell, 500.0).unwrap();
        assert_eq!(workbook.read(cell), Some(&CellValue::Number(500.0)));

        let missing = CellRef::new(9, 0, 0);
        assert!(workbook.write(missing, 1.0).is_err());
    }

    #[test]
    fn test_edited_cells_only_tracks_writes() {
        let mut sheet = Sheet::new("BOQ");
        sheet.set(0, 0, "Description");
        let mut workbook = Workbook::new();
        workbook.add_sheet(sheet);
        assert_eq!(workbook.edited_cells().count(), 0);

        workbook.write(CellRef::new(0, 3, 1), 500.0).unwrap();
        workbook.write(CellRef::new(0, 1, 4), "Matched Description").unwrap();
        workbook.write(CellRef::new(0, 3, 1), 520.0).unwrap();

        let edits: Vec<CellRef> = workbook.edited_cells().collect();
        assert_eq!(edits, vec![CellRef::new(0, 1, 4), CellRef::new(0, 3, 1)]);
    }
}

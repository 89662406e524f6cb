use price_match_common::{CellRef, CellValue};
use serde::Serialize;

/// 照合結果（照会行1件ごと）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    /// 書き込み先の単価セル
    pub cell: CellRef,
    /// 一致した単価表品目のインデックス
    pub price_index: usize,
    /// 一致した品目の正規化済み説明
    pub description: String,
    pub rate: CellValue,
    /// 内積（丸め前）
    pub score: f32,
}

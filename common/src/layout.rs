//! ヘッダー配置の定義
//!
//! 照会シートのヘッダー行・列位置と、照合結果を書き込む追加列の位置。

use serde::{Deserialize, Serialize};

/// ヘッダー探索の対象行数（先頭から）
pub const HEADER_PROBE_ROWS: u32 = 10;

pub const DESCRIPTION_LABEL: &str = "description";
pub const RATE_LABEL: &str = "rate";
pub const QUANTITY_LABELS: &[&str] = &["qty", "quantity"];

/// 追加列の見出し
pub const MATCHED_DESCRIPTION_HEADER: &str = "Matched Description";
pub const SIMILARITY_SCORE_HEADER: &str = "Similarity Score";

/// シートごとのヘッダー配置（0始まり）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderLayout {
    pub header_row: u32,
    pub description_col: u16,
    pub rate_col: u16,
    pub quantity_col: Option<u16>,
}

/// 照合結果の書き込み先列（シートごとに一度だけ決める）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputColumns {
    pub matched_description: u16,
    pub similarity_score: u16,
}

impl OutputColumns {
    /// 現在の列数の直後に2列を確保
    pub fn after(column_count: u16) -> Self {
        Self {
            matched_description: column_count,
            similarity_score: column_count + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_columns_follow_current_extent() {
        let cols = OutputColumns::after(4);
        assert_eq!(cols.matched_description, 4);
        assert_eq!(cols.similarity_score, 5);
    }
}

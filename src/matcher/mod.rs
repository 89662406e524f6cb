//! 照合・書き戻しモジュール
//!
//! 照会行ごとに単価表の最も近い品目を選び、単価・一致した説明・類似度を
//! 照会ブックへ書き込む。

mod types;

pub use types::MatchResult;

use crate::error::{PriceMatchError, Result};
use crate::pricelist::PriceEntry;
use crate::scanner::InquiryTarget;
use price_match_common::layout::{MATCHED_DESCRIPTION_HEADER, SIMILARITY_SCORE_HEADER};
use price_match_common::{
    best_match, round_score, CellRef, Embedding, Error as CommonError, HeaderLayout,
    OutputColumns, Workbook,
};
use rayon::prelude::*;
use std::collections::BTreeMap;

/// ヘッダー行に「Matched Description」「Similarity Score」の2列を追加
///
/// 列位置はこの時点のシート列数から一度だけ決め、以後の書き込みはすべて同じ列に入る。
pub fn append_output_headers(
    workbook: &mut Workbook,
    layouts: &BTreeMap<usize, HeaderLayout>,
    log: &dyn Fn(&str),
) -> Result<BTreeMap<usize, OutputColumns>> {
    log("Adding output columns to inquiry sheets...");

    let mut columns = BTreeMap::new();
    for (&sheet_idx, layout) in layouts {
        let width = workbook
            .sheet(sheet_idx)
            .ok_or(CommonError::SheetNotFound(sheet_idx))?
            .column_count();
        let cols = OutputColumns::after(width);
        let header = CellRef::new(sheet_idx, layout.header_row, cols.matched_description);

        workbook.write(header, MATCHED_DESCRIPTION_HEADER)?;
        workbook.write(header.with_col(cols.similarity_score), SIMILARITY_SCORE_HEADER)?;
        columns.insert(sheet_idx, cols);
    }

    Ok(columns)
}

/// 照会ベクトルごとに最も類似度の高い単価表ベクトルを選ぶ
///
/// 結果は照会ベクトルと同じ順序。単価表が空なら各要素は `None`。
pub fn find_best_matches(
    pricelist_vectors: &[Embedding],
    inquiry_vectors: &[Embedding],
) -> Result<Vec<Option<(usize, f32)>>> {
    if let Some(expected) = pricelist_vectors.first().map(Vec::len) {
        let mismatch = pricelist_vectors
            .iter()
            .chain(inquiry_vectors)
            .map(Vec::len)
            .find(|&len| len != expected);
        if let Some(actual) = mismatch {
            return Err(CommonError::DimensionMismatch { expected, actual }.into());
        }
    }

    Ok(inquiry_vectors
        .par_iter()
        .map(|query| best_match(query, pricelist_vectors))
        .collect())
}

/// 照合して照会ブックに書き戻す
pub fn apply_matches(
    workbook: &mut Workbook,
    entries: &[PriceEntry],
    pricelist_vectors: &[Embedding],
    targets: &[InquiryTarget],
    inquiry_vectors: &[Embedding],
    output_columns: &BTreeMap<usize, OutputColumns>,
    log: &dyn Fn(&str),
) -> Result<Vec<MatchResult>> {
    if entries.len() != pricelist_vectors.len() {
        return Err(PriceMatchError::InvalidInput(format!(
            "単価表の品目数({})とベクトル数({})が一致しません",
            entries.len(),
            pricelist_vectors.len()
        )));
    }
    if targets.len() != inquiry_vectors.len() {
        return Err(PriceMatchError::InvalidInput(format!(
            "照会行数({})とベクトル数({})が一致しません",
            targets.len(),
            inquiry_vectors.len()
        )));
    }

    log("Calculating similarity scores...");
    let best = find_best_matches(pricelist_vectors, inquiry_vectors)?;

    let mut results = Vec::with_capacity(targets.len());
    for (target, best) in targets.iter().zip(best) {
        let Some((price_index, score)) = best else {
            return Err(PriceMatchError::InvalidInput("単価表が空です".into()));
        };
        let cols = output_columns.get(&target.cell.sheet).ok_or_else(|| {
            PriceMatchError::InvalidInput(format!(
                "シート {} の出力列が未設定です",
                target.cell.sheet
            ))
        })?;
        let entry = &entries[price_index];

        workbook.write(target.cell, entry.rate.clone())?;
        workbook.write(
            target.cell.with_col(cols.matched_description),
            entry.description.as_str(),
        )?;
        workbook.write(target.cell.with_col(cols.similarity_score), round_score(score))?;

        tracing::debug!(
            cell = %target.cell.a1(),
            price_index,
            score,
            "matched"
        );

        results.push(MatchResult {
            cell: target.cell,
            price_index,
            description: entry.description.clone(),
            rate: entry.rate.clone(),
            score,
        });
    }

    Ok(results)
}

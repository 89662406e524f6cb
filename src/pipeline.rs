//! 照合パイプライン
//!
//! 読込 → 走査 → 埋め込み（単価表）→ 埋め込み（照会）→ 照合 → 保存 の順に実行する。
//! 保存は最後に一度だけ行い、途中で失敗した場合は何も書き出さない。

use crate::embedding::EmbeddingClient;
use crate::error::{PriceMatchError, Result};
use crate::export::excel::save_inquiry;
use crate::matcher::{self, MatchResult};
use crate::pricelist::{self, PriceEntry};
use crate::scanner::{self, InquiryTarget};
use price_match_common::HeaderLayout;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// 実行結果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub pricelist_items: usize,
    pub targets: usize,
    pub matches: Vec<MatchResult>,
    pub output: PathBuf,
}

/// ドライラン結果（API呼び出しなし）
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preview {
    pub pricelist_items: usize,
    pub sheets: Vec<SheetPreview>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetPreview {
    pub name: String,
    /// ヘッダーが見つからなかったシートは `None`
    pub layout: Option<HeaderLayout>,
    pub targets: usize,
}

impl Preview {
    pub fn total_targets(&self) -> usize {
        self.sheets.iter().map(|s| s.targets).sum()
    }
}

/// 入力ファイル・出力フォルダの存在確認
pub fn validate_inputs(pricelist: &Path, inquiry: &Path, output_folder: &Path) -> Result<()> {
    for path in [pricelist, inquiry] {
        if !path.is_file() {
            return Err(PriceMatchError::FileNotFound(path.display().to_string()));
        }
    }
    if !output_folder.is_dir() {
        return Err(PriceMatchError::FolderNotFound(
            output_folder.display().to_string(),
        ));
    }
    Ok(())
}

/// パイプライン全体を実行して `output` に保存
pub async fn run(
    client: &EmbeddingClient,
    pricelist_path: &Path,
    inquiry_path: &Path,
    output: &Path,
    log: &dyn Fn(&str),
) -> Result<RunSummary> {
    let entries = pricelist::load_pricelist(pricelist_path, log)?;

    let mut workbook = scanner::open_inquiry(inquiry_path, log)?;
    let scan = scanner::scan_inquiry(&workbook, log)?;
    let output_columns = matcher::append_output_headers(&mut workbook, &scan.layouts, log)?;

    log("Computing embeddings for pricelist descriptions...");
    let pricelist_vectors = client.embed(&descriptions(&entries), log).await?;

    log("Computing embeddings for inquiry descriptions...");
    let inquiry_vectors = client.embed(&target_descriptions(&scan.targets), log).await?;

    let matches = matcher::apply_matches(
        &mut workbook,
        &entries,
        &pricelist_vectors,
        &scan.targets,
        &inquiry_vectors,
        &output_columns,
        log,
    )?;
    log("All items processed. Best matches and rates filled in.");

    save_inquiry(&workbook, inquiry_path, output)?;
    log(&format!("Saved output workbook to {}.", output.display()));

    Ok(RunSummary {
        pricelist_items: entries.len(),
        targets: scan.targets.len(),
        matches,
        output: output.to_path_buf(),
    })
}

/// 同期呼び出し用（非同期ランタイムの外から呼ぶこと）
pub fn run_blocking(
    client: &EmbeddingClient,
    pricelist_path: &Path,
    inquiry_path: &Path,
    output: &Path,
    log: &dyn Fn(&str),
) -> Result<RunSummary> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run(client, pricelist_path, inquiry_path, output, log))
}

/// 読込と走査のみ行い、照合対象の件数を返す
pub fn preview(pricelist_path: &Path, inquiry_path: &Path, log: &dyn Fn(&str)) -> Result<Preview> {
    let entries = pricelist::load_pricelist(pricelist_path, log)?;
    let workbook = scanner::open_inquiry(inquiry_path, log)?;

    // 対象0件でもシートごとの内訳を返す
    let scan = match scanner::scan_inquiry(&workbook, log) {
        Ok(scan) => scan,
        Err(PriceMatchError::EmptyInquiry) => Default::default(),
        Err(e) => return Err(e),
    };

    let sheets = workbook
        .sheets()
        .iter()
        .enumerate()
        .map(|(idx, sheet)| SheetPreview {
            name: sheet.name().to_string(),
            layout: scan.layouts.get(&idx).copied(),
            targets: scan.targets_in_sheet(idx),
        })
        .collect();

    Ok(Preview {
        pricelist_items: entries.len(),
        sheets,
    })
}

fn descriptions(entries: &[PriceEntry]) -> Vec<String> {
    entries.iter().map(|e| e.description.clone()).collect()
}

fn target_descriptions(targets: &[InquiryTarget]) -> Vec<String> {
    targets.iter().map(|t| t.description.clone()).collect()
}

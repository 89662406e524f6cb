pub mod excel;

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// 出力ファイル名の書式（例: Output_03-45-PM_10-16-26.xlsx）
pub const OUTPUT_FILE_FORMAT: &str = "Output_%I-%M-%p_%m-%d-%y.xlsx";

/// 出力フォルダ内のタイムスタンプ付きファイルパス
pub fn timestamped_output_path(folder: &Path, now: DateTime<Local>) -> PathBuf {
    folder.join(now.format(OUTPUT_FILE_FORMAT).to_string())
}

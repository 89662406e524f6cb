//! Price Match Common Library
//!
//! ワークブックモデル・レイアウト・ベクトル演算など、I/Oを持たない共通部分

pub mod error;
pub mod layout;
pub mod similarity;
pub mod workbook;

#[cfg(feature = "excel")]
pub mod export;

pub use error::{Error, Result};
pub use layout::{HeaderLayout, OutputColumns};
pub use similarity::{best_match, dot, l2_normalize, round_score, Embedding};
pub use workbook::{column_name, CellRef, CellValue, Sheet, Workbook};

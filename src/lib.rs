//! price-match: 単価表と照会シートの意味類似度照合
//!
//! 単価表の品目説明と照会シートの品目説明を埋め込みベクトルで比較し、
//! 最も近い品目の単価・説明・類似度を照会ブックへ書き戻す。

pub mod ai_provider;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod export;
pub mod loader;
pub mod matcher;
pub mod normalizer;
pub mod pipeline;
pub mod pricelist;
pub mod scanner;

pub use error::{PriceMatchError, Result};

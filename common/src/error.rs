//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Sheet not found: index {0}")]
    SheetNotFound(usize),

    #[error("Excel error: {0}")]
    Excel(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_sheet_not_found() {
        let error = Error::SheetNotFound(3);
        assert_eq!(format!("{}", error), "Sheet not found: index 3");
    }

    #[test]
    fn test_error_display_dimension_mismatch() {
        let error = Error::DimensionMismatch { expected: 3072, actual: 1024 };
        assert_eq!(
            format!("{}", error),
            "Dimension mismatch: expected 3072, got 1024"
        );
    }

    #[test]
    fn test_error_debug() {
        let error = Error::Excel("シート名が不正".to_string());
        let debug = format!("{:?}", error);
        assert!(debug.contains("Excel"));
        assert!(debug.contains("シート名が不正"));
    }
}

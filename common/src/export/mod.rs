//! Export core modules.

#[cfg(feature = "excel")]
pub mod excel_core;

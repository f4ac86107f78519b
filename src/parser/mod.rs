//! Parser Module
//!
//! calamineを使用したワークブック読み込み。

mod workbook;

pub(crate) use workbook::WorkbookReader;

//! xlsxjsonl - Pure-Rust Excel workbook to JSON Lines converter
//!
//! This crate converts spreadsheet workbooks (XLSX) into newline-delimited JSON,
//! one JSON object per worksheet, for batch data-preparation pipelines
//! (log pipelines, search indexers, etc.).
//!
//! Each line has the following shape:
//!
//! ```json
//! {"sheet_name": "Data", "rows": [{"a": 1, "b": "x"}, {"a": 2, "b": "y"}]}
//! ```
//!
//! Empty cells are rendered as `null`, date/time cells as ISO 8601 strings,
//! and column order follows the header row of each worksheet.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use xlsxjsonl::ConverterBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create a converter with default settings
//!     let converter = ConverterBuilder::new().build()?;
//!
//!     // report.xlsx -> report.jsonl
//!     let output = converter.convert("report.xlsx", None)?;
//!     println!("written to {}", output.display());
//!
//!     Ok(())
//! }
//! ```
//!
//! For in-memory workbooks (e.g. uploaded files), use `convert_bytes`:
//!
//! ```rust,no_run
//! use xlsxjsonl::ConverterBuilder;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let converter = ConverterBuilder::new().build()?;
//! let excel_data: Vec<u8> = std::fs::read("upload.xlsx")?;
//!
//! // The target may also be given as UTF-8 path bytes; a directory-like
//! // target receives `output.jsonl`.
//! let output = converter.convert_bytes(excel_data, b"exports/".to_vec())?;
//! # Ok(())
//! # }
//! ```
//!
//! # Custom Configuration
//!
//! ```rust,no_run
//! use std::fs::File;
//! use xlsxjsonl::ConverterBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let converter = ConverterBuilder::new()
//!         .include_sheet_name(false) // {"rows": [...]} only
//!         .skip_empty_sheets(false)  // keep sheets without data rows
//!         .build()?;
//!
//!     let jsonl = converter.convert_to_string(File::open("report.xlsx")?)?;
//!     print!("{}", jsonl);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Record Iteration
//!
//! ```rust,no_run
//! use std::fs::File;
//! use xlsxjsonl::ConverterBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let converter = ConverterBuilder::new().build()?;
//!
//!     for record in converter.records(File::open("report.xlsx")?)? {
//!         let record = record?;
//!         println!("{}: {} rows", record.name(), record.row_count());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Logging
//!
//! The crate logs through the [`log`](https://docs.rs/log) facade and never
//! installs a logger itself.

mod api;
mod builder;
mod encoder;
mod error;
mod output;
mod parser;
mod record;
mod security;
mod types;

// 公開API
pub use api::{Orient, OutputTarget};
pub use builder::{Converter, ConverterBuilder, SheetRecords};
pub use error::XlsxToJsonlError;
pub use record::{Row, SheetRecord};
pub use types::CellValue;

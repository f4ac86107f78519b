//! Output Module
//!
//! 出力先パスの解決と、出力ディレクトリの準備を提供するモジュール。

mod path;

pub(crate) use path::{default_output_path, ensure_parent_dir, resolve_output_path};

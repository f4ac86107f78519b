//! Public API Types
//!
//! 公開APIで使用する列挙型を定義するモジュール。

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 行データのレイアウト
///
/// ワークシートの行をJSONに変換する際の配置方法を指定します。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Orient {
    /// 行優先レイアウト（デフォルト）
    ///
    /// 1行を1つのJSONオブジェクトとして、列名をキーに出力します。
    ///
    /// # 出力例
    ///
    /// ```json
    /// {"sheet_name": "Data", "rows": [{"a": 1, "b": "x"}, {"a": 2, "b": "y"}]}
    /// ```
    #[default]
    Records,
}

/// 出力先の指定
///
/// ファイルパスまたはUTF-8でエンコードされたパス文字列のバイト列を受け付けます。
/// 実際の出力ファイルパスは変換時に解決されます（ディレクトリが指定された場合は
/// デフォルトファイル名が付与されます）。
///
/// # 使用例
///
/// ```rust
/// use std::path::PathBuf;
/// use xlsxjsonl::OutputTarget;
///
/// let from_str: OutputTarget = "out/result.jsonl".into();
/// let from_path: OutputTarget = PathBuf::from("out").into();
/// let from_bytes: OutputTarget = b"out/".to_vec().into();
///
/// assert!(matches!(from_str, OutputTarget::Path(_)));
/// assert!(matches!(from_path, OutputTarget::Path(_)));
/// assert!(matches!(from_bytes, OutputTarget::Bytes(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// ファイルシステム上のパス
    Path(PathBuf),

    /// UTF-8パス文字列のバイト列
    Bytes(Vec<u8>),
}

impl From<PathBuf> for OutputTarget {
    fn from(path: PathBuf) -> Self {
        OutputTarget::Path(path)
    }
}

impl From<&Path> for OutputTarget {
    fn from(path: &Path) -> Self {
        OutputTarget::Path(path.to_path_buf())
    }
}

impl From<&str> for OutputTarget {
    fn from(path: &str) -> Self {
        OutputTarget::Path(PathBuf::from(path))
    }
}

impl From<String> for OutputTarget {
    fn from(path: String) -> Self {
        OutputTarget::Path(PathBuf::from(path))
    }
}

impl From<Vec<u8>> for OutputTarget {
    fn from(bytes: Vec<u8>) -> Self {
        OutputTarget::Bytes(bytes)
    }
}

impl From<&[u8]> for OutputTarget {
    fn from(bytes: &[u8]) -> Self {
        OutputTarget::Bytes(bytes.to_vec())
    }
}

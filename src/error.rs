//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use thiserror::Error;

/// xlsxjsonlクレート全体で使用するエラー型
///
/// ワークブックの読み込み、レコードのJSONエンコード、出力ファイルの書き込み中に
/// 発生するすべてのエラーを統一的に扱うために使用されます。
///
/// # エラーの分類
///
/// 各バリアントは次の3つのカテゴリのいずれかに属します。
///
/// - ソース形式エラー（`SourceFormat`, `UnsupportedFormat`, `SecurityViolation`）:
///   入力が読み込み可能なワークブックではない
/// - エンコードエラー（`Encoding`, `UnencodableValue`）:
///   セル値にJSON表現が存在しない
/// - I/Oエラー（`Io`, `InvalidOutputPath`）:
///   パス解決や書き込みの失敗
///
/// `Config`はビルダーの検証時にのみ発生し、変換処理中には発生しません。
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsxjsonl::{ConverterBuilder, XlsxToJsonlError};
///
/// # fn main() -> Result<(), XlsxToJsonlError> {
/// let converter = ConverterBuilder::new().build()?;
/// match converter.convert("book.xlsx", None) {
///     Ok(path) => println!("written: {}", path.display()),
///     Err(e) if e.is_source_format() => eprintln!("not a workbook: {}", e),
///     Err(e) => return Err(e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Error, Debug)]
pub enum XlsxToJsonlError {
    /// I/O操作中に発生したエラー
    ///
    /// 入力ファイルの読み込み失敗、出力ディレクトリの作成失敗、書き込み失敗など、
    /// `std::io::Error`が発生した場合に使用されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ワークブックの解析中に発生したエラー（calamine由来）
    ///
    /// 入力がZIPコンテナでない、破損している、シートが存在しないなどが原因となります。
    #[error("Failed to read workbook: {0}")]
    SourceFormat(#[from] calamine::Error),

    /// ワークブックとして開けたが、XLSX形式ではない
    #[error("Unsupported workbook format: {0}")]
    UnsupportedFormat(String),

    /// JSONシリアライズ中に発生したエラー
    #[error("Failed to encode record as JSON: {0}")]
    Encoding(#[from] serde_json::Error),

    /// JSON表現を持たないセル値が検出されたエラー
    ///
    /// 非有限の数値（NaN、無限大）が該当します。
    /// 暗黙の変換は行わず、変換全体を失敗させます。
    #[error("Value at sheet '{sheet}', cell {cell} cannot be encoded as JSON: {message}")]
    UnencodableValue {
        /// エラーが発生したシート名
        sheet: String,
        /// エラーが発生したセルの座標（A1記法）
        cell: String,
        /// エラーの詳細メッセージ
        message: String,
    },

    /// バイト列で渡された出力パスがUTF-8として解釈できない
    #[error("Output path is not valid UTF-8: {0}")]
    InvalidOutputPath(#[from] std::string::FromUtf8Error),

    /// 設定の検証に失敗したエラー
    ///
    /// `ConverterBuilder::build()`時に発生します。
    #[error("Configuration error: {0}")]
    Config(String),

    /// セキュリティ制限に違反したエラー
    ///
    /// 入力サイズが上限を超えた場合に発生します。
    #[error("Security violation: {0}")]
    SecurityViolation(String),
}

impl XlsxToJsonlError {
    /// 入力がワークブックとして読み込めなかったことを示すエラーか
    pub fn is_source_format(&self) -> bool {
        matches!(
            self,
            Self::SourceFormat(_) | Self::UnsupportedFormat(_) | Self::SecurityViolation(_)
        )
    }

    /// セル値のエンコードに失敗したことを示すエラーか
    pub fn is_encoding(&self) -> bool {
        matches!(self, Self::Encoding(_) | Self::UnencodableValue { .. })
    }

    /// パス解決または書き込みに失敗したことを示すエラーか
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_) | Self::InvalidOutputPath(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_io_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error: XlsxToJsonlError = io_err.into();

        match error {
            XlsxToJsonlError::Io(ref e) => {
                assert_eq!(e.kind(), io::ErrorKind::NotFound);
            }
            _ => panic!("Expected Io error"),
        }
        assert!(error.is_io());
        assert!(!error.is_source_format());
    }

    #[test]
    fn test_io_error_display() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "Permission denied");
        let error: XlsxToJsonlError = io_err.into();

        let error_msg = error.to_string();
        assert!(error_msg.contains("IO error"));
        assert!(error_msg.contains("Permission denied"));
    }

    #[test]
    fn test_source_format_error() {
        let parse_err = calamine::Error::Msg("Cannot detect file format");
        let error: XlsxToJsonlError = parse_err.into();

        assert!(matches!(error, XlsxToJsonlError::SourceFormat(_)));
        assert!(error.is_source_format());
        assert!(error.to_string().contains("Failed to read workbook"));
        assert!(error.to_string().contains("Cannot detect file format"));
    }

    #[test]
    fn test_unencodable_value_display() {
        let error = XlsxToJsonlError::UnencodableValue {
            sheet: "Data".to_string(),
            cell: "B3".to_string(),
            message: "non-finite number inf".to_string(),
        };

        let error_msg = error.to_string();
        assert!(error_msg.contains("'Data'"));
        assert!(error_msg.contains("B3"));
        assert!(error_msg.contains("non-finite number"));
        assert!(error.is_encoding());
    }

    #[test]
    fn test_encoding_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: XlsxToJsonlError = json_err.into();

        assert!(matches!(error, XlsxToJsonlError::Encoding(_)));
        assert!(error.is_encoding());
    }

    #[test]
    fn test_invalid_output_path_from_utf8() {
        let utf8_err = String::from_utf8(vec![0xff, 0xfe]).unwrap_err();
        let error: XlsxToJsonlError = utf8_err.into();

        assert!(matches!(error, XlsxToJsonlError::InvalidOutputPath(_)));
        assert!(error.is_io());
        assert!(error.to_string().contains("not valid UTF-8"));
    }

    #[test]
    fn test_config_error_display() {
        let error = XlsxToJsonlError::Config("Default filename must not be empty".to_string());
        let error_msg = error.to_string();

        assert!(error_msg.contains("Configuration error"));
        assert!(!error.is_io());
        assert!(!error.is_encoding());
        assert!(!error.is_source_format());
    }

    // ?演算子による自動変換
    #[test]
    fn test_error_conversion_with_question_mark() {
        fn io_operation() -> Result<(), XlsxToJsonlError> {
            let _file = std::fs::File::open("nonexistent_file.xlsx")?;
            Ok(())
        }

        match io_operation() {
            Err(XlsxToJsonlError::Io(_)) => {}
            _ => panic!("Expected Io error from ? operator"),
        }
    }

    #[test]
    fn test_error_implements_std_error() {
        fn assert_error<E: std::error::Error + 'static>() {}
        assert_error::<XlsxToJsonlError>();
    }
}

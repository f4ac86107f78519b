//! Security Module
//!
//! 入力サイズの制限を実装するモジュール。
//! 巨大な入力によるメモリ枯渇を防ぐため、ワークブックをメモリに読み込む前に上限を確認します。

use std::io::Read;

use crate::error::XlsxToJsonlError;

/// 入力ファイルの最大サイズのデフォルト値（2GB）
pub(crate) const DEFAULT_MAX_INPUT_FILE_SIZE: u64 = 2_147_483_648;

/// セキュリティ設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SecurityConfig {
    /// 入力ファイルの最大サイズ（バイト）
    /// デフォルト: 2GB (2_147_483_648 bytes)
    pub max_input_file_size: u64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_input_file_size: DEFAULT_MAX_INPUT_FILE_SIZE,
        }
    }
}

impl SecurityConfig {
    /// 入力サイズが上限以内かを確認
    pub fn check_input_size(&self, size: u64) -> Result<(), XlsxToJsonlError> {
        if size > self.max_input_file_size {
            return Err(XlsxToJsonlError::SecurityViolation(format!(
                "Input file size exceeds maximum: {} bytes (max: {} bytes)",
                size, self.max_input_file_size
            )));
        }
        Ok(())
    }

    /// リーダーの内容を上限まで読み込む
    ///
    /// 上限を1バイトでも超えた時点で読み込みを打ち切り、
    /// `SecurityViolation`を返します。
    pub fn read_limited<R: Read>(&self, reader: R) -> Result<Vec<u8>, XlsxToJsonlError> {
        let mut buffer = Vec::new();
        reader
            .take(self.max_input_file_size.saturating_add(1))
            .read_to_end(&mut buffer)?;
        self.check_input_size(buffer.len() as u64)?;
        Ok(buffer)
    }
}

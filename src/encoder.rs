//! Encoder Module
//!
//! レコードを1行のJSON文字列にエンコードするモジュール。
//! 既定のシリアライズに加えて、日時（ISO 8601文字列）と整数値の数値セル
//! （JSONの整数）を扱います。

use chrono::NaiveDateTime;
use serde::ser::{Error as _, Serialize, Serializer};
use std::io::Write;

use crate::error::XlsxToJsonlError;
use crate::record::SheetRecord;
use crate::types::CellValue;

/// 整数として出力する浮動小数点数の上限（2^53）
///
/// これを超える値はf64で正確に表現できないため、浮動小数点数のまま出力する。
pub(crate) const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// 日時をISO 8601形式に変換（例: `2024-01-15T09:30:00`）
///
/// 小数秒は0でない場合のみ出力されます。
pub(crate) fn format_iso_datetime(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
}

/// 整数値を持つ浮動小数点数をi64に変換
fn integral_value(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < MAX_SAFE_INTEGER {
        Some(f as i64)
    } else {
        None
    }
}

impl CellValue {
    /// JSON表現を持たない値の場合、その理由を返す
    pub(crate) fn unencodable_reason(&self) -> Option<String> {
        match self {
            CellValue::Float(f) if !f.is_finite() => Some(format!("non-finite number {}", f)),
            _ => None,
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Empty => serializer.serialize_none(),
            CellValue::String(s) if s.is_empty() => serializer.serialize_none(),
            CellValue::Int(i) => serializer.serialize_i64(*i),
            CellValue::Float(f) => match integral_value(*f) {
                Some(i) => serializer.serialize_i64(i),
                None if f.is_finite() => serializer.serialize_f64(*f),
                None => Err(S::Error::custom(format!("non-finite number {}", f))),
            },
            CellValue::String(s) => serializer.serialize_str(s),
            CellValue::Bool(b) => serializer.serialize_bool(*b),
            CellValue::DateTime(dt) => serializer.serialize_str(&format_iso_datetime(dt)),
            CellValue::Duration(d) => serializer.serialize_str(&d.to_string()),
            CellValue::DateTimeIso(s) | CellValue::DurationIso(s) => serializer.serialize_str(s),
        }
    }
}

/// JSON Linesエンコーダー
///
/// 1つのレコードを改行を含まない1行のJSONとして出力します。
/// 非ASCII文字は`\uXXXX`にエスケープせず、UTF-8のまま出力します。
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct JsonLineEncoder;

impl JsonLineEncoder {
    pub fn new() -> Self {
        Self
    }

    /// レコードを1行のJSON文字列にエンコード（末尾の改行なし）
    ///
    /// # 戻り値
    ///
    /// * `Ok(String)` - エンコード済み文字列
    /// * `Err(XlsxToJsonlError::UnencodableValue)` - JSON表現を持たないセル値が含まれる場合
    pub fn encode(&self, record: &SheetRecord) -> Result<String, XlsxToJsonlError> {
        self.check_encodable(record)?;
        Ok(serde_json::to_string(record)?)
    }

    /// レコードを1行としてライターに書き込む（`\n`で終端）
    pub fn write_line<W: Write>(
        &self,
        record: &SheetRecord,
        writer: &mut W,
    ) -> Result<(), XlsxToJsonlError> {
        let line = self.encode(record)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }

    /// シリアライズ前に全セルを検査し、問題のあるセルの座標をエラーに含める
    pub(crate) fn check_encodable(&self, record: &SheetRecord) -> Result<(), XlsxToJsonlError> {
        for (row_idx, row) in record.row_values().iter().enumerate() {
            for (col_idx, value) in row.iter().enumerate() {
                if let Some(message) = value.unencodable_reason() {
                    return Err(XlsxToJsonlError::UnencodableValue {
                        sheet: record.name().to_string(),
                        cell: record.cell_coord(row_idx, col_idx).to_a1_notation(),
                        message,
                    });
                }
            }
        }
        Ok(())
    }
}

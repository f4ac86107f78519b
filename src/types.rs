//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。

use chrono::{Duration, NaiveDateTime};

/// セルの値を表す列挙型
///
/// ワークブックから読み込んだセル値を、JSONエンコード前の形で保持します。
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum CellValue {
    /// 空セル（JSONでは`null`）
    Empty,

    /// 整数
    Int(i64),

    /// 浮動小数点数
    Float(f64),

    /// 文字列
    String(String),

    /// 論理値
    Bool(bool),

    /// 日時（日付書式が設定された数値セル）
    DateTime(NaiveDateTime),

    /// 経過時間（時間書式が設定された数値セル）
    Duration(Duration),

    /// ISO 8601形式の日時文字列として格納されたセル
    DateTimeIso(String),

    /// ISO 8601形式の期間文字列として格納されたセル
    DurationIso(String),
}

impl CellValue {
    /// 値が空かどうかを判定
    ///
    /// 空文字列のセルも空として扱います。
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// ヘッダー行のセルとして使用する場合の列名
    ///
    /// 空セルの場合は`None`を返します。
    pub(crate) fn header_text(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }

        let text = match self {
            CellValue::Int(i) => i.to_string(),
            CellValue::Float(f) => {
                if f.is_finite() && f.fract() == 0.0 && f.abs() < crate::encoder::MAX_SAFE_INTEGER {
                    format!("{}", *f as i64)
                } else {
                    f.to_string()
                }
            }
            CellValue::String(s) => s.clone(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::DateTime(dt) => crate::encoder::format_iso_datetime(dt),
            CellValue::Duration(d) => d.to_string(),
            CellValue::DateTimeIso(s) | CellValue::DurationIso(s) => s.clone(),
            CellValue::Empty => return None,
        };

        Some(text)
    }
}

/// セル座標（0始まり）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct CellCoord {
    pub row: u32,
    pub col: u32,
}

impl CellCoord {
    /// 新しい座標を生成
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// A1形式の文字列に変換（例: (0, 0) -> "A1"）
    #[allow(clippy::wrong_self_convention)]
    pub fn to_a1_notation(&self) -> String {
        let col_str = Self::col_index_to_letter(self.col);
        format!("{}{}", col_str, self.row + 1)
    }

    /// 列インデックスを文字列に変換（0 -> "A", 25 -> "Z", 26 -> "AA"）
    fn col_index_to_letter(mut col: u32) -> String {
        let mut result = String::new();
        loop {
            let remainder = col % 26;
            result.insert(0, (b'A' + remainder as u8) as char);
            if col < 26 {
                break;
            }
            col = col / 26 - 1;
        }
        result
    }
}

/// ヘッダー行から列名が確定したワークシート
///
/// 1回の変換の間だけ存在し、レコードに変換された時点で破棄されます。
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Worksheet {
    /// シート名
    pub name: String,

    /// 列名（A列から右の順、重複あり得る）
    pub columns: Vec<String>,

    /// データ行（ヘッダー行を除く、上から下の順）
    ///
    /// 各行の長さは`columns`の長さと一致する。
    pub rows: Vec<Vec<CellValue>>,

    /// 各データ行のシート上の行インデックス（0始まり）
    pub row_numbers: Vec<u32>,
}

impl Worksheet {
    /// データ行数（ヘッダー行を除く）
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

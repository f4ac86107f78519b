//! Parser Module
//!
//! calamineを使用したワークブック読み込みの実装。
//! ファイルパスとメモリ上のバイト列の両方から、同じ経路でワークブックを開きます。

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader, Sheets, Xlsx};
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;

use crate::error::XlsxToJsonlError;
use crate::security::SecurityConfig;
use crate::types::{CellValue, Worksheet};

/// ワークブックリーダー
///
/// calamineのラッパーとして、シート名の列挙とシート単位の読み込みを提供します。
/// 入力はメモリ上のバッファとして保持され、リーダーの破棄と同時に解放されます。
pub(crate) struct WorkbookReader {
    /// calamineのワークブック（XLSX形式のみサポート）
    workbook: Xlsx<Cursor<Vec<u8>>>,
}

impl WorkbookReader {
    /// ファイルパスからワークブックを開く
    ///
    /// ファイルハンドルは内容をバッファに読み込んだ時点で閉じられます。
    /// 読み込みに失敗した場合も、スコープを抜けた時点で確実に閉じられます。
    ///
    /// # 戻り値
    ///
    /// * `Ok(WorkbookReader)` - ワークブックの読み込みに成功した場合
    /// * `Err(XlsxToJsonlError::Io)` - ファイルが開けない場合
    /// * `Err(XlsxToJsonlError::SourceFormat)` - ワークブックとして解析できない場合
    pub fn open_path<P: AsRef<Path>>(
        path: P,
        security: &SecurityConfig,
    ) -> Result<Self, XlsxToJsonlError> {
        let file = File::open(path.as_ref())?;
        security.check_input_size(file.metadata()?.len())?;
        Self::open_reader(file, security)
    }

    /// メモリ上のバイト列からワークブックを開く
    pub fn open_bytes(buffer: Vec<u8>, security: &SecurityConfig) -> Result<Self, XlsxToJsonlError> {
        security.check_input_size(buffer.len() as u64)?;
        Self::from_buffer(buffer)
    }

    /// 任意のリーダーからワークブックを開く
    ///
    /// リーダーの内容はセキュリティ設定の上限までメモリに読み込まれます。
    pub fn open_reader<R: Read>(reader: R, security: &SecurityConfig) -> Result<Self, XlsxToJsonlError> {
        let buffer = security.read_limited(reader)?;
        Self::from_buffer(buffer)
    }

    fn from_buffer(buffer: Vec<u8>) -> Result<Self, XlsxToJsonlError> {
        let sheets = open_workbook_auto_from_rs(Cursor::new(buffer))?;
        match sheets {
            Sheets::Xlsx(workbook) => Ok(Self { workbook }),
            _ => Err(XlsxToJsonlError::UnsupportedFormat(
                "Only XLSX format is supported".to_string(),
            )),
        }
    }

    /// すべてのシート名をワークブック内の順序で取得
    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names().to_vec()
    }

    /// シートを読み込み、ヘッダー行から列名を確定したワークシートを返す
    ///
    /// # 戻り値
    ///
    /// * `Ok(Worksheet)` - 読み込みに成功した場合
    /// * `Err(XlsxToJsonlError::SourceFormat)` - シートが存在しない、または解析できない場合
    pub fn read_sheet(&mut self, sheet_name: &str) -> Result<Worksheet, XlsxToJsonlError> {
        let range = self
            .workbook
            .worksheet_range(sheet_name)
            .map_err(|e| XlsxToJsonlError::SourceFormat(e.into()))?;

        Ok(build_worksheet(sheet_name, &range))
    }
}

/// calamineのセル範囲からワークシートを構築
///
/// 空でない最初の行をヘッダー行とし、それ以降の空でない行をデータ行とします。
/// すべてのセルが空の行は出力されません。
///
/// 列はA列から数えます。表がA列から始まらない場合、先頭の空の列も
/// `Unnamed: {列インデックス}`という名前の列（値はすべて空）として含まれます。
/// 空のヘッダーセルも同じ規則で命名されます。
fn build_worksheet(sheet_name: &str, range: &Range<Data>) -> Worksheet {
    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    let leading = start_col as usize;

    let mut rows = range
        .rows()
        .enumerate()
        .filter(|(_, row)| !is_blank_row(row))
        .map(|(offset, row)| (start_row + offset as u32, row));

    let columns: Vec<String> = match rows.next() {
        Some((_, header)) => std::iter::repeat(None)
            .take(leading)
            .chain(header.iter().map(|cell| convert_cell(cell).header_text()))
            .enumerate()
            .map(|(idx, name)| name.unwrap_or_else(|| format!("Unnamed: {}", idx)))
            .collect(),
        None => Vec::new(),
    };

    let width = columns.len();
    let mut row_numbers = Vec::new();
    let mut data_rows = Vec::new();
    for (row_number, row) in rows {
        let mut values = vec![CellValue::Empty; leading];
        values.extend(row.iter().map(convert_cell));
        values.resize(width, CellValue::Empty);
        data_rows.push(values);
        row_numbers.push(row_number);
    }

    Worksheet {
        name: sheet_name.to_string(),
        columns,
        rows: data_rows,
        row_numbers,
    }
}

/// 値を持つセルが1つもない行か
///
/// エラー値のセルは値を持つものとして扱う。
fn is_blank_row(row: &[Data]) -> bool {
    row.iter().all(|cell| match cell {
        Data::Empty => true,
        Data::String(s) => s.is_empty(),
        _ => false,
    })
}

/// calamineのセル値を変換
///
/// 日付・時間書式のセルは、chronoの型に変換できない場合は数値のまま扱う。
/// エラー値（`#N/A`、`#DIV/0!`など）は未定義の値として空セルになる。
fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => CellValue::String(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => {
            if dt.is_duration() {
                dt.as_duration()
                    .map(CellValue::Duration)
                    .unwrap_or(CellValue::Float(dt.as_f64()))
            } else {
                dt.as_datetime()
                    .map(CellValue::DateTime)
                    .unwrap_or(CellValue::Float(dt.as_f64()))
            }
        }
        Data::DateTimeIso(s) => CellValue::DateTimeIso(s.clone()),
        Data::DurationIso(s) => CellValue::DurationIso(s.clone()),
        Data::Error(_) | Data::Empty => CellValue::Empty,
    }
}

//! Record Module
//!
//! ワークシートをJSONシリアライズ可能なレコードに正規化するモジュール。
//!
//! レコードは`{"sheet_name": ..., "rows": [...]}`の形をとり、各行は列名をキーとする
//! マップとして出力されます。列の順序（左から右）と行の順序（上から下）は
//! 出力まで保持されます。

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::api::Orient;
use crate::builder::ConversionConfig;
use crate::types::{CellCoord, CellValue, Worksheet};

/// 1つのワークシートに対応するレコード
///
/// `rows`の長さは常にワークシートのデータ行数（ヘッダー行を除く）と一致します。
#[derive(Debug, Clone, PartialEq)]
pub struct SheetRecord {
    name: String,
    include_sheet_name: bool,
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
    row_numbers: Vec<u32>,
}

impl SheetRecord {
    /// 元のワークシート名
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 出力に含まれるシート名（設定で無効化されている場合は`None`）
    pub fn sheet_name(&self) -> Option<&str> {
        if self.include_sheet_name {
            Some(&self.name)
        } else {
            None
        }
    }

    /// 列名（ヘッダー行の左から右の順）
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// データ行数
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// データ行を上から順に返すイテレーター
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> + '_ {
        self.rows.iter().map(move |values| Row {
            columns: &self.columns,
            values,
        })
    }

    pub(crate) fn row_values(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub(crate) fn cell_coord(&self, row_idx: usize, col_idx: usize) -> CellCoord {
        let row = self.row_numbers.get(row_idx).copied().unwrap_or(row_idx as u32 + 1);
        CellCoord::new(row, col_idx as u32)
    }
}

/// レコード内の1行
///
/// 列名と値の組を列順に保持します。重複した列名もそのまま保持されます。
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    columns: &'a [String],
    values: &'a [CellValue],
}

impl<'a> Row<'a> {
    /// (列名, 値) を左から順に返す
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a CellValue)> + 'a {
        let columns = self.columns;
        let values = self.values;
        columns.iter().map(String::as_str).zip(values.iter())
    }

    /// 列名で値を取得（重複している場合は最初の列）
    pub fn get(&self, column: &str) -> Option<&'a CellValue> {
        self.iter()
            .find(|(name, _)| *name == column)
            .map(|(_, value)| value)
    }

    /// 列数
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Serialize for Row<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

struct Rows<'a>(&'a SheetRecord);

impl Serialize for Rows<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.rows())
    }
}

impl Serialize for SheetRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.include_sheet_name { 2 } else { 1 };
        let mut map = serializer.serialize_map(Some(len))?;
        if let Some(name) = self.sheet_name() {
            map.serialize_entry("sheet_name", name)?;
        }
        map.serialize_entry("rows", &Rows(self))?;
        map.end()
    }
}

/// ワークシートをレコードに変換する
///
/// データ行が0行かつ`skip_empty_sheets`が有効な場合のみ`None`を返します。
/// 空セル・空文字列はすべての列で一律に`CellValue::Empty`（JSONの`null`）に
/// 置き換えられます。
pub(crate) fn normalize(worksheet: Worksheet, config: &ConversionConfig) -> Option<SheetRecord> {
    if worksheet.row_count() == 0 && config.skip_empty_sheets {
        return None;
    }

    let Worksheet {
        name,
        columns,
        rows,
        row_numbers,
    } = worksheet;

    let rows = match config.orient {
        Orient::Records => rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|value| if value.is_empty() { CellValue::Empty } else { value })
                    .collect()
            })
            .collect(),
    };

    Some(SheetRecord {
        name,
        include_sheet_name: config.include_sheet_name,
        columns,
        rows,
        row_numbers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sheet(name: &str, columns: &[&str], rows: Vec<Vec<CellValue>>) -> Worksheet {
        Worksheet {
            name: name.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            row_numbers: (1..=rows.len() as u32).collect(),
            rows,
        }
    }

    fn to_json(record: &SheetRecord) -> serde_json::Value {
        serde_json::to_value(record).unwrap()
    }

    #[test]
    fn test_normalize_basic() {
        let config = ConversionConfig::default();
        let record = normalize(
            sheet(
                "Data",
                &["a", "b"],
                vec![
                    vec![CellValue::Float(1.0), CellValue::String("x".to_string())],
                    vec![CellValue::Float(2.0), CellValue::String("y".to_string())],
                ],
            ),
            &config,
        )
        .unwrap();

        assert_eq!(record.name(), "Data");
        assert_eq!(record.sheet_name(), Some("Data"));
        assert_eq!(record.row_count(), 2);
        assert_eq!(
            to_json(&record),
            json!({
                "sheet_name": "Data",
                "rows": [{"a": 1, "b": "x"}, {"a": 2, "b": "y"}]
            })
        );
    }

    #[test]
    fn test_normalize_skips_empty_sheet() {
        let config = ConversionConfig::default();
        assert!(normalize(sheet("Empty", &[], vec![]), &config).is_none());

        // ヘッダーのみのシートもデータ行0行として扱う
        assert!(normalize(sheet("HeaderOnly", &["a", "b"], vec![]), &config).is_none());
    }

    #[test]
    fn test_normalize_keeps_empty_sheet_when_configured() {
        let config = ConversionConfig {
            skip_empty_sheets: false,
            ..Default::default()
        };
        let record = normalize(sheet("Empty", &[], vec![]), &config).unwrap();

        assert_eq!(record.row_count(), 0);
        assert_eq!(to_json(&record), json!({"sheet_name": "Empty", "rows": []}));
    }

    #[test]
    fn test_normalize_without_sheet_name() {
        let config = ConversionConfig {
            include_sheet_name: false,
            ..Default::default()
        };
        let record = normalize(
            sheet("Meta", &["col"], vec![vec![CellValue::Float(10.0)]]),
            &config,
        )
        .unwrap();

        assert_eq!(record.sheet_name(), None);
        assert_eq!(record.name(), "Meta");
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"rows":[{"col":10}]}"#
        );
    }

    #[test]
    fn test_normalize_empty_cells_become_null() {
        let config = ConversionConfig::default();
        let record = normalize(
            sheet(
                "Sparse",
                &["a", "blank", "b"],
                vec![
                    vec![CellValue::Int(1), CellValue::Empty, CellValue::String(String::new())],
                    vec![CellValue::Empty, CellValue::Empty, CellValue::Bool(true)],
                ],
            ),
            &config,
        )
        .unwrap();

        // 完全に空の列も含めて、キーは省略されずnullになる
        assert_eq!(
            to_json(&record)["rows"],
            json!([
                {"a": 1, "blank": null, "b": null},
                {"a": null, "blank": null, "b": true}
            ])
        );
        let first = record.rows().next().unwrap();
        assert_eq!(first.get("b"), Some(&CellValue::Empty));
    }

    #[test]
    fn test_normalize_preserves_column_order() {
        let config = ConversionConfig::default();
        let record = normalize(
            sheet(
                "Order",
                &["zeta", "alpha", "mid"],
                vec![vec![CellValue::Int(1), CellValue::Int(2), CellValue::Int(3)]],
            ),
            &config,
        )
        .unwrap();

        let line = serde_json::to_string(&record).unwrap();
        assert_eq!(
            line,
            r#"{"sheet_name":"Order","rows":[{"zeta":1,"alpha":2,"mid":3}]}"#
        );

        let row = record.rows().next().unwrap();
        let names: Vec<&str> = row.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_normalize_duplicate_columns_pass_through() {
        let config = ConversionConfig::default();
        let record = normalize(
            sheet(
                "Dup",
                &["a", "a"],
                vec![vec![CellValue::Int(1), CellValue::Int(2)]],
            ),
            &config,
        )
        .unwrap();

        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"sheet_name":"Dup","rows":[{"a":1,"a":2}]}"#
        );
        let row = record.rows().next().unwrap();
        assert_eq!(row.len(), 2);
        assert_eq!(row.get("a"), Some(&CellValue::Int(1)));
    }

    #[allow(unused_doc_comments)]
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        /// レコードの行数はワークシートのデータ行数と一致し、
        /// スキップされるのは空シートかつskip有効の場合のみ
        proptest! {
            #[test]
            fn test_row_count_invariant(
                rows in 0usize..20,
                cols in 1usize..6,
                skip in any::<bool>()
            ) {
                let columns: Vec<String> = (0..cols).map(|c| format!("c{}", c)).collect();
                let data: Vec<Vec<CellValue>> = (0..rows)
                    .map(|r| (0..cols).map(|c| CellValue::Int((r * cols + c) as i64)).collect())
                    .collect();
                let worksheet = Worksheet {
                    name: "P".to_string(),
                    columns,
                    row_numbers: (1..=rows as u32).collect(),
                    rows: data,
                };
                let config = ConversionConfig {
                    skip_empty_sheets: skip,
                    ..Default::default()
                };

                match normalize(worksheet, &config) {
                    None => prop_assert!(rows == 0 && skip),
                    Some(record) => {
                        prop_assert!(rows > 0 || !skip);
                        prop_assert_eq!(record.row_count(), rows);
                        for row in record.rows() {
                            prop_assert_eq!(row.len(), cols);
                        }
                    }
                }
            }
        }
    }
}

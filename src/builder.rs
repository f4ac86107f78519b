//! Builder Module
//!
//! Fluent Builder APIを提供し、`Converter`インスタンスを段階的に構築する。

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{is_separator, Path, PathBuf};

use crate::api::{Orient, OutputTarget};
use crate::encoder::JsonLineEncoder;
use crate::error::XlsxToJsonlError;
use crate::output::{default_output_path, ensure_parent_dir, resolve_output_path};
use crate::parser::WorkbookReader;
use crate::record::{normalize, SheetRecord};
use crate::security::SecurityConfig;

/// バイト列入力で出力先がディレクトリの場合に使うファイル名
pub(crate) const DEFAULT_OUTPUT_FILENAME: &str = "output.jsonl";

/// 変換処理の設定を保持する内部構造体
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ConversionConfig {
    /// レコードに`sheet_name`を含めるか
    pub include_sheet_name: bool,

    /// 行データのレイアウト
    pub orient: Orient,

    /// データ行のないシートを出力しないか
    pub skip_empty_sheets: bool,

    /// バイト列入力で出力先がディレクトリの場合のファイル名
    pub default_filename: String,

    /// 入力サイズの制限
    pub security: SecurityConfig,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            include_sheet_name: true,
            orient: Orient::Records,
            skip_empty_sheets: true,
            default_filename: DEFAULT_OUTPUT_FILENAME.to_string(),
            security: SecurityConfig::default(),
        }
    }
}

/// Fluent Builder APIを提供する構造体
///
/// `Converter`インスタンスを段階的に構築するためのビルダーです。
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsxjsonl::ConverterBuilder;
///
/// # fn main() -> Result<(), xlsxjsonl::XlsxToJsonlError> {
/// let converter = ConverterBuilder::new()
///     .include_sheet_name(false)
///     .skip_empty_sheets(false)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConverterBuilder {
    /// 内部設定（構築中）
    config: ConversionConfig,
}

impl Default for ConverterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConverterBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - シート名: 出力に含める
    /// - レイアウト: `Orient::Records`
    /// - 空シート: スキップ
    /// - デフォルトファイル名: `output.jsonl`
    /// - 入力サイズ上限: 2GB
    pub fn new() -> Self {
        Self {
            config: ConversionConfig::default(),
        }
    }

    /// 各レコードに`sheet_name`キーを含めるかを指定する
    ///
    /// `false`の場合、各行は`{"rows": [...]}`の形で出力されます。
    pub fn include_sheet_name(mut self, include: bool) -> Self {
        self.config.include_sheet_name = include;
        self
    }

    /// 行データのレイアウトを指定する
    pub fn with_orient(mut self, orient: Orient) -> Self {
        self.config.orient = orient;
        self
    }

    /// データ行のないシートをスキップするかを指定する
    ///
    /// # 引数
    ///
    /// * `skip: bool`:
    ///   * `true`: 空シートは出力しない（デフォルト）
    ///   * `false`: 空シートも`"rows": []`として1行出力する
    pub fn skip_empty_sheets(mut self, skip: bool) -> Self {
        self.config.skip_empty_sheets = skip;
        self
    }

    /// バイト列入力で出力先がディレクトリの場合に使用するファイル名を指定する
    ///
    /// # 制約
    ///
    /// * 空文字列、パス区切り文字を含む名前、`.`、`..`は`build()`時に
    ///   `XlsxToJsonlError::Config`となる
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use xlsxjsonl::ConverterBuilder;
    ///
    /// let builder = ConverterBuilder::new()
    ///     .with_default_filename("sheets.jsonl");
    /// ```
    pub fn with_default_filename(mut self, filename: &str) -> Self {
        self.config.default_filename = filename.to_string();
        self
    }

    /// 入力ワークブックの最大サイズ（バイト）を指定する
    pub fn with_max_input_size(mut self, bytes: u64) -> Self {
        self.config.security.max_input_file_size = bytes;
        self
    }

    /// 設定を検証し、`Converter`インスタンスを生成する
    ///
    /// # 発生し得るエラー
    ///
    /// * `XlsxToJsonlError::Config(String)`: 設定の検証に失敗した場合
    ///   * デフォルトファイル名が空、パス区切り文字を含む、または`.`/`..`
    ///   * 入力サイズ上限が0
    pub fn build(self) -> Result<Converter, XlsxToJsonlError> {
        // 1. デフォルトファイル名の検証
        let filename = &self.config.default_filename;
        if filename.is_empty() {
            return Err(XlsxToJsonlError::Config(
                "Default filename must not be empty".to_string(),
            ));
        }
        if filename.chars().any(is_separator) || filename == "." || filename == ".." {
            return Err(XlsxToJsonlError::Config(format!(
                "Default filename must be a plain file name: '{}'",
                filename
            )));
        }

        // 2. 入力サイズ上限の検証
        if self.config.security.max_input_file_size == 0 {
            return Err(XlsxToJsonlError::Config(
                "Maximum input size must be greater than zero".to_string(),
            ));
        }

        Ok(Converter::new(self.config))
    }
}

/// 変換処理のファサード
///
/// ワークブックをJSON Lines形式に変換するためのメインエントリーポイントです。
/// 各ワークシートを1行のJSONオブジェクトとして、ワークブック内の順序で出力します。
///
/// 設定は構築後に変更されないため、同じインスタンスを複数回の変換に再利用できます。
/// 内部で排他制御は行わないため、同じ出力ファイルへの変換を並行して実行しないでください。
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsxjsonl::ConverterBuilder;
///
/// # fn main() -> Result<(), xlsxjsonl::XlsxToJsonlError> {
/// let converter = ConverterBuilder::new().build()?;
///
/// // book.xlsx -> book.jsonl
/// let written = converter.convert("book.xlsx", None)?;
///
/// // 出力先ディレクトリを指定（exports/book.jsonl）
/// let written = converter.convert("book.xlsx", Some("exports/".into()))?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Converter {
    /// 変換設定
    config: ConversionConfig,

    /// JSON Linesエンコーダー
    encoder: JsonLineEncoder,
}

impl Converter {
    pub(crate) fn new(config: ConversionConfig) -> Self {
        Self {
            encoder: JsonLineEncoder::new(),
            config,
        }
    }

    /// ディスク上のワークブックをJSON Linesファイルに変換
    ///
    /// # 引数
    ///
    /// * `input_path` - 入力ワークブックのパス
    /// * `output` - 出力先。`None`の場合は入力パスの拡張子を`.jsonl`に置き換えたパス
    ///
    /// 出力先がディレクトリと判定された場合は、入力ファイル名の拡張子を`.jsonl`に
    /// 置き換えた名前でその中に出力します。
    ///
    /// # 戻り値
    ///
    /// * `Ok(PathBuf)` - 実際に書き込んだ出力ファイルのパス
    /// * `Err(XlsxToJsonlError)` - エラーが発生した場合
    ///
    /// # 処理フロー
    ///
    /// 1. ワークブックを開く（失敗した場合は出力先に何も作成しない）
    /// 2. 出力パスの解決と親ディレクトリの作成
    /// 3. シートごとに読み込み・正規化・エンコードして1行ずつ書き込む
    /// 4. 出力バッファをフラッシュ
    ///
    /// 書き込み途中でエラーが発生した場合、それまでに書き込まれた行はファイルに残ります。
    pub fn convert<P: AsRef<Path>>(
        &self,
        input_path: P,
        output: Option<OutputTarget>,
    ) -> Result<PathBuf, XlsxToJsonlError> {
        let input_path = input_path.as_ref();
        let derived = default_output_path(input_path);
        let default_filename = derived
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.config.default_filename.clone());

        let target = output.unwrap_or_else(|| OutputTarget::Path(derived.clone()));
        let output_path = resolve_output_path(&target, &default_filename)?;

        log::info!(
            "Converting {} -> {}",
            input_path.display(),
            output_path.display()
        );

        let reader = WorkbookReader::open_path(input_path, &self.config.security)?;
        self.write_to_path(reader, &output_path)?;

        Ok(output_path)
    }

    /// メモリ上のワークブックをJSON Linesファイルに変換
    ///
    /// # 引数
    ///
    /// * `buffer` - ワークブックのバイト列（アップロードされたファイルなど）
    /// * `output` - 出力先。パスまたはUTF-8パス文字列のバイト列
    ///
    /// 出力先がディレクトリと判定された場合は、その中のデフォルトファイル名
    /// （既定値: `output.jsonl`）に出力します。
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use xlsxjsonl::ConverterBuilder;
    ///
    /// # fn main() -> Result<(), xlsxjsonl::XlsxToJsonlError> {
    /// let converter = ConverterBuilder::new().build()?;
    /// let data = std::fs::read("upload.xlsx")?;
    ///
    /// // uploads/output.jsonl に出力
    /// let written = converter.convert_bytes(data, b"uploads/".to_vec())?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn convert_bytes<B, T>(&self, buffer: B, output: T) -> Result<PathBuf, XlsxToJsonlError>
    where
        B: Into<Vec<u8>>,
        T: Into<OutputTarget>,
    {
        let output_path = resolve_output_path(&output.into(), &self.config.default_filename)?;

        log::info!("Converting in-memory workbook -> {}", output_path.display());

        let reader = WorkbookReader::open_bytes(buffer.into(), &self.config.security)?;
        self.write_to_path(reader, &output_path)?;

        Ok(output_path)
    }

    /// 任意のリーダーから読み込んだワークブックを、任意のライターにJSON Linesとして書き込む
    ///
    /// # 戻り値
    ///
    /// * `Ok(usize)` - 書き込んだ行数（出力したシート数）
    /// * `Err(XlsxToJsonlError)` - エラーが発生した場合
    pub fn convert_to_writer<R: Read, W: Write>(
        &self,
        input: R,
        output: W,
    ) -> Result<usize, XlsxToJsonlError> {
        let reader = WorkbookReader::open_reader(input, &self.config.security)?;

        let mut writer = BufWriter::new(output);
        let written = self.write_records(reader, &mut writer)?;
        writer.flush()?;

        Ok(written)
    }

    /// ワークブックをJSON Lines形式の文字列に変換
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use std::fs::File;
    /// use xlsxjsonl::ConverterBuilder;
    ///
    /// # fn main() -> Result<(), xlsxjsonl::XlsxToJsonlError> {
    /// let converter = ConverterBuilder::new().build()?;
    /// let jsonl = converter.convert_to_string(File::open("book.xlsx")?)?;
    /// for line in jsonl.lines() {
    ///     println!("{}", line);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn convert_to_string<R: Read>(&self, input: R) -> Result<String, XlsxToJsonlError> {
        let mut buffer = Vec::new();
        self.convert_to_writer(input, &mut buffer)?;

        let result = String::from_utf8(buffer).map_err(|e| {
            XlsxToJsonlError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })?;

        Ok(result)
    }

    /// ワークブックのレコードを1シートずつ返すイテレーターを生成
    ///
    /// シートは要求されるたびに読み込まれ、同時に保持されるレコードは1つだけです。
    /// 空シートの扱いは設定に従います。
    pub fn records<R: Read>(&self, input: R) -> Result<SheetRecords, XlsxToJsonlError> {
        let reader = WorkbookReader::open_reader(input, &self.config.security)?;
        Ok(SheetRecords::new(reader, self.config.clone()))
    }

    /// 1つのシートを、列名をキーとするマップのリストとして読み込む
    ///
    /// 空シートの場合は空のリストを返します（`skip_empty_sheets`の設定には影響されません）。
    /// 列名が重複している場合は、後の列の値で上書きされます。
    ///
    /// # 戻り値
    ///
    /// * `Ok(Vec<Map>)` - 各データ行のマップ
    /// * `Err(XlsxToJsonlError::SourceFormat)` - シートが存在しない場合
    pub fn parse_sheet_rows<P: AsRef<Path>>(
        &self,
        input_path: P,
        sheet_name: &str,
    ) -> Result<Vec<serde_json::Map<String, serde_json::Value>>, XlsxToJsonlError> {
        let mut reader = WorkbookReader::open_path(input_path, &self.config.security)?;
        let worksheet = reader.read_sheet(sheet_name)?;

        let config = ConversionConfig {
            skip_empty_sheets: false,
            ..self.config.clone()
        };
        let record = match normalize(worksheet, &config) {
            Some(record) => record,
            None => return Ok(Vec::new()),
        };
        self.encoder.check_encodable(&record)?;

        let mut rows = Vec::with_capacity(record.row_count());
        for row in record.rows() {
            let mut map = serde_json::Map::new();
            for (name, value) in row.iter() {
                map.insert(name.to_string(), serde_json::to_value(value)?);
            }
            rows.push(map);
        }
        Ok(rows)
    }

    fn write_to_path(
        &self,
        reader: WorkbookReader,
        output_path: &Path,
    ) -> Result<usize, XlsxToJsonlError> {
        ensure_parent_dir(output_path)?;

        let mut writer = BufWriter::new(File::create(output_path)?);
        let written = self.write_records(reader, &mut writer)?;
        writer.flush()?;

        log::info!("Wrote {} line(s) to {}", written, output_path.display());
        Ok(written)
    }

    fn write_records<W: Write>(
        &self,
        reader: WorkbookReader,
        writer: &mut W,
    ) -> Result<usize, XlsxToJsonlError> {
        let mut written = 0;
        for record in SheetRecords::new(reader, self.config.clone()) {
            let record = record?;
            self.encoder.write_line(&record, writer)?;
            written += 1;
        }
        Ok(written)
    }
}

/// ワークブックのシートを順に読み込み、レコードに変換するイテレーター
///
/// `Converter::records()`で生成します。
pub struct SheetRecords {
    reader: WorkbookReader,
    sheet_names: std::vec::IntoIter<String>,
    config: ConversionConfig,
}

impl SheetRecords {
    fn new(reader: WorkbookReader, config: ConversionConfig) -> Self {
        let sheet_names = reader.sheet_names().into_iter();
        Self {
            reader,
            sheet_names,
            config,
        }
    }
}

impl Iterator for SheetRecords {
    type Item = Result<SheetRecord, XlsxToJsonlError>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(name) = self.sheet_names.next() {
            let worksheet = match self.reader.read_sheet(&name) {
                Ok(worksheet) => worksheet,
                Err(e) => return Some(Err(e)),
            };

            match normalize(worksheet, &self.config) {
                Some(record) => {
                    log::debug!("Sheet '{}': {} row(s)", name, record.row_count());
                    return Some(Ok(record));
                }
                None => log::debug!("Sheet '{}' has no data rows, skipping", name),
            }
        }
        None
    }
}

//! Output Path Resolution
//!
//! 出力先の指定から、実際に書き込むファイルパスを決定する。

use std::fs;
use std::path::{is_separator, Path, PathBuf};

use crate::api::OutputTarget;
use crate::error::XlsxToJsonlError;

/// 出力先の指定を具体的なファイルパスに解決する
///
/// 次の順で判定します。
///
/// 1. バイト列の場合はUTF-8としてデコードする
/// 2. パスが既存のディレクトリなら、その中の`default_filename`
/// 3. 拡張子がなく、区切り文字で終わるか最後の要素に`.`を含まない場合は、
///    まだ存在しないディレクトリとみなして`default_filename`を付与する
/// 4. それ以外はそのままファイルパスとして使用する
///
/// # 既知の制限
///
/// 拡張子のないファイル名（例: `report`）はディレクトリと区別できず、
/// 常にディレクトリとして扱われます。同名のファイルが既に存在する場合は、
/// ディレクトリの作成時にI/Oエラーとなります。
pub(crate) fn resolve_output_path(
    target: &OutputTarget,
    default_filename: &str,
) -> Result<PathBuf, XlsxToJsonlError> {
    let path = match target {
        OutputTarget::Path(path) => path.clone(),
        OutputTarget::Bytes(bytes) => PathBuf::from(String::from_utf8(bytes.clone())?),
    };

    if path.is_dir() {
        log::debug!(
            "Output target {} is an existing directory, appending {}",
            path.display(),
            default_filename
        );
        return Ok(path.join(default_filename));
    }

    if looks_like_directory(&path) {
        log::debug!(
            "Output target {} has no extension, treating it as a directory",
            path.display()
        );
        return Ok(path.join(default_filename));
    }

    Ok(path)
}

/// 拡張子がなく、ディレクトリを意図していると推定されるパスか
fn looks_like_directory(path: &Path) -> bool {
    if path.extension().is_some() {
        return false;
    }

    let ends_with_separator = path
        .as_os_str()
        .to_string_lossy()
        .chars()
        .last()
        .map_or(false, is_separator);

    let name_has_dot = path
        .file_name()
        .map_or(false, |name| name.to_string_lossy().contains('.'));

    ends_with_separator || !name_has_dot
}

/// 入力ファイルパスから既定の出力パスを導出（拡張子を`.jsonl`に置換）
pub(crate) fn default_output_path(input_path: &Path) -> PathBuf {
    input_path.with_extension("jsonl")
}

/// 出力ファイルの親ディレクトリをすべて作成する
pub(crate) fn ensure_parent_dir(path: &Path) -> Result<(), XlsxToJsonlError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

//! ファイル出力
//!
//! 出力先と同じディレクトリに一時ファイルを書き、完了後にリネームする。
//! 失敗時に書きかけのファイルは残らない。

use crate::error::{MemeAiError, Result};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let failure = |message: String| MemeAiError::WriteFailure {
        path: path.display().to_string(),
        message,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(parent)
        .map_err(|e| failure(format!("一時ファイル作成エラー: {}", e)))?;
    temp.write_all(bytes)
        .map_err(|e| failure(format!("書き込みエラー: {}", e)))?;
    temp.as_file()
        .sync_all()
        .map_err(|e| failure(format!("同期エラー: {}", e)))?;
    temp.persist(path)
        .map_err(|e| failure(format!("リネームエラー: {}", e.error)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_atomic_creates_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");

        write_atomic(&path, b"a,b\n1,2\n").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"a,b\n1,2\n");

        // 上書き
        write_atomic(&path, b"x\n").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"x\n");

        // 一時ファイルが残っていない
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_atomic_missing_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("out.xlsx");

        let result = write_atomic(&path, b"data");
        assert!(matches!(result, Err(MemeAiError::WriteFailure { .. })));
        assert!(!path.exists());
    }
}

use crate::error::{MemeAiError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct ImageInfo {
    pub path: PathBuf,
    pub file_name: String,
}

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

pub fn scan_folder(folder: &Path) -> Result<Vec<ImageInfo>> {
    if !folder.is_dir() {
        return Err(MemeAiError::DirectoryNotFound(folder.display().to_string()));
    }

    let mut images = Vec::new();

    for entry in WalkDir::new(folder)
        .max_depth(1)  // 直下のみ（再帰しない）
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        if let Some(ext) = path.extension() {
            if is_image_extension(&ext.to_string_lossy()) {
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();

                images.push(ImageInfo {
                    path: path.to_path_buf(),
                    file_name,
                });
            }
        }
    }

    // ファイル名でソート（行順を決定的にする）
    images.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    Ok(images)
}

/// 対応画像拡張子か（大文字小文字を区別しない）
fn is_image_extension(ext: &str) -> bool {
    let ext = ext.to_lowercase();
    IMAGE_EXTENSIONS.contains(&ext.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_is_image_extension() {
        assert!(is_image_extension("jpg"));
        assert!(is_image_extension("JPG"));
        assert!(is_image_extension("jpeg"));
        assert!(is_image_extension("png"));
        assert!(is_image_extension("WebP"));
        assert!(!is_image_extension("txt"));
        assert!(!is_image_extension("gif"));
    }

    #[test]
    fn test_scan_folder_not_found() {
        let result = scan_folder(Path::new("/nonexistent/folder"));
        assert!(matches!(result, Err(MemeAiError::DirectoryNotFound(_))));
    }

    #[test]
    fn test_scan_folder_rejects_file_path() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("meme.png");
        File::create(&file).unwrap();

        let result = scan_folder(&file);
        assert!(matches!(result, Err(MemeAiError::DirectoryNotFound(_))));
    }

    #[test]
    fn test_scan_folder_with_images() {
        let dir = tempdir().unwrap();

        File::create(dir.path().join("test1.jpg")).unwrap().write_all(b"dummy").unwrap();
        File::create(dir.path().join("test2.JPEG")).unwrap().write_all(b"dummy").unwrap();
        File::create(dir.path().join("test3.png")).unwrap().write_all(b"dummy").unwrap();
        File::create(dir.path().join("test4.webp")).unwrap().write_all(b"dummy").unwrap();
        File::create(dir.path().join("readme.txt")).unwrap().write_all(b"text").unwrap();

        let result = scan_folder(dir.path()).unwrap();
        let names: Vec<_> = result.iter().map(|i| i.file_name.as_str()).collect();
        assert_eq!(names, vec!["test1.jpg", "test2.JPEG", "test3.png", "test4.webp"]);
    }

    #[test]
    fn test_scan_folder_not_recursive() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("nested")).unwrap();
        File::create(dir.path().join("nested").join("deep.png")).unwrap();
        File::create(dir.path().join("top.png")).unwrap();

        let result = scan_folder(dir.path()).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].file_name, "top.png");
    }
}

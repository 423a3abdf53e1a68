pub mod exif;

pub use self::exif::{metadata_from_fields, ExifExtractor, MetadataExtractor};

use crate::error::{PhotoAnnotateError, Result};
use log::debug;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 対象とする拡張子（大文字小文字は区別しない）
pub const PHOTO_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "heic"];

pub fn is_photo_extension(ext: &str) -> bool {
    PHOTO_EXTENSIONS.contains(&ext.to_lowercase().as_str())
}

/// フォルダ直下の写真を列挙し、絶対パス文字列の昇順で返す
pub fn scan_folder(folder: &Path) -> Result<Vec<PathBuf>> {
    let scan_error = |source: std::io::Error| PhotoAnnotateError::FolderScan {
        path: folder.to_path_buf(),
        source,
    };

    let folder = folder.canonicalize().map_err(scan_error)?;
    if !folder.is_dir() {
        return Err(scan_error(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "not a directory",
        )));
    }

    let mut photos = Vec::new();

    for entry in WalkDir::new(&folder)
        .min_depth(1)
        .max_depth(1)  // 直下のみ（再帰しない）
    {
        let entry = entry.map_err(|e| scan_error(e.into()))?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        let matched = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(is_photo_extension)
            .unwrap_or(false);

        if matched {
            photos.push(path.to_path_buf());
        }
    }

    photos.sort_by(|a, b| a.to_string_lossy().cmp(&b.to_string_lossy()));
    debug!("{}枚の写真を検出: {}", photos.len(), folder.display());

    Ok(photos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::tempdir;

    #[test]
    fn test_is_photo_extension() {
        assert!(is_photo_extension("jpg"));
        assert!(is_photo_extension("JPG"));
        assert!(is_photo_extension("jpeg"));
        assert!(is_photo_extension("Png"));
        assert!(is_photo_extension("HEIC"));
        assert!(!is_photo_extension("txt"));
        assert!(!is_photo_extension("gif"));
        assert!(!is_photo_extension("tiff"));
    }

    #[test]
    fn test_scan_folder_not_found() {
        let result = scan_folder(Path::new("/nonexistent/folder"));
        assert!(matches!(result, Err(PhotoAnnotateError::FolderScan { .. })));
    }

    #[test]
    fn test_scan_file_instead_of_folder() {
        let dir = tempdir().expect("Failed to create temp dir");
        let file = dir.path().join("a.jpg");
        File::create(&file).unwrap();

        assert!(scan_folder(&file).is_err());
    }

    #[test]
    fn test_scan_filters_and_sorts() {
        let dir = tempdir().expect("Failed to create temp dir");

        File::create(dir.path().join("c.heic")).unwrap();
        File::create(dir.path().join("a.jpg")).unwrap();
        File::create(dir.path().join("B.JPEG")).unwrap();
        File::create(dir.path().join("b.png")).unwrap();
        File::create(dir.path().join("a.txt")).unwrap();
        File::create(dir.path().join("notes.gif")).unwrap();
        fs::create_dir(dir.path().join("folder.jpg")).unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        File::create(dir.path().join("sub").join("nested.jpg")).unwrap();

        let result = scan_folder(dir.path()).unwrap();
        let names: Vec<String> = result
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        assert_eq!(names, vec!["B.JPEG", "a.jpg", "b.png", "c.heic"]);
        assert!(result.iter().all(|p| p.is_absolute()));
    }

    #[test]
    fn test_scan_sorts_by_plain_path_string() {
        let dir = tempdir().expect("Failed to create temp dir");

        for name in ["ab.jpg", "a_b.jpg", "a-b.jpg", "a b.jpg"] {
            File::create(dir.path().join(name)).unwrap();
        }

        let names: Vec<String> = scan_folder(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        // 空白や記号はエンコードせず、そのままの文字で比較する
        assert_eq!(names, vec!["a b.jpg", "a-b.jpg", "a_b.jpg", "ab.jpg"]);
    }
}

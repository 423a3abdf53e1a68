//! 注記サイドカーファイルの読み書き
//!
//! 写真 `IMG_0001.jpg` の注記は同じフォルダの `IMG_0001.txt`（UTF-8、ヘッダなし）。

use crate::error::{PhotoAnnotateError, Result};
use log::{debug, warn};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

const SIDECAR_EXTENSION: &str = "txt";

/// 写真に対応するサイドカーのパス
pub fn sidecar_path(photo: &Path) -> PathBuf {
    photo.with_extension(SIDECAR_EXTENSION)
}

/// 注記の保存先
pub trait AnnotationStore {
    /// 注記を読む。存在しない・UTF-8でない場合は空文字
    fn load(&self, photo: &Path) -> String;

    /// 注記を書く。部分的に書かれたファイルが見えることはない
    fn save(&self, photo: &Path, text: &str) -> Result<()>;
}

/// 写真の隣に `.txt` を置くファイルシステム実装
#[derive(Debug, Clone, Copy, Default)]
pub struct SidecarStore;

impl AnnotationStore for SidecarStore {
    fn load(&self, photo: &Path) -> String {
        let path = sidecar_path(photo);
        let bytes = match fs::read(&path) {
            Ok(b) => b,
            Err(_) => return String::new(),
        };
        match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(_) => {
                warn!("UTF-8ではない注記を無視: {}", path.display());
                String::new()
            }
        }
    }

    fn save(&self, photo: &Path, text: &str) -> Result<()> {
        let path = sidecar_path(photo);
        let temp_path = temp_path_for(&path);

        let write_error = |source: std::io::Error| PhotoAnnotateError::SidecarWrite {
            path: path.clone(),
            source,
        };

        let written = write_then_rename(&temp_path, &path, text.as_bytes());
        if let Err(e) = written {
            // 一時ファイルが残っていれば消す
            let _ = fs::remove_file(&temp_path);
            return Err(write_error(e));
        }

        debug!("注記を保存: {}", path.display());
        Ok(())
    }
}

/// 同じフォルダ内の隠し一時ファイル（rename を同一ファイルシステム内に収める）
fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.tmp", name))
}

fn write_then_rename(temp_path: &Path, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut f = File::create(temp_path)?;
    f.write_all(bytes)?;
    f.sync_all()?;
    drop(f);
    fs::rename(temp_path, path)
}

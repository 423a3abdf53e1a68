use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PhotoAnnotateError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("フォルダを読み込めません: {path}: {source}")]
    FolderScan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("注記の保存に失敗: {path}: {source}")]
    SidecarWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("クリップボードエラー: {0}")]
    Clipboard(String),

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error(transparent)]
    Common(#[from] photo_annotate_common::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PhotoAnnotateError>;

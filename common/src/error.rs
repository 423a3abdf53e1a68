//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid history capacity: {0}")]
    InvalidCapacity(usize),

    #[error("Invalid map span: {0}")]
    InvalidSpan(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

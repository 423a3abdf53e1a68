//! Photo Annotate
//!
//! 写真フォルダを1枚ずつ閲覧し、EXIFの位置・方位・撮影日時を確認しながら
//! 注記を写真と同名の `.txt` に保存する。

pub mod annotation;
pub mod cli;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod interactive;
pub mod listing;
pub mod scanner;
pub mod session;

pub use session::{PendingChanges, PhotoSession, Resolution, SessionEvent, SessionState, UnsavedChangesGuard};

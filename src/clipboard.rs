use crate::error::{PhotoAnnotateError, Result};
use log::info;

/// 文字列を受け取るクリップボード
pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// OSのクリップボード（arboard）
///
/// Linuxでは所有者が生きている間だけ内容が残るため、ハンドルを保持し続ける。
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        if self.inner.is_none() {
            let c = arboard::Clipboard::new()
                .map_err(|e| PhotoAnnotateError::Clipboard(e.to_string()))?;
            self.inner = Some(c);
        }
        if let Some(clipboard) = self.inner.as_mut() {
            clipboard
                .set_text(text)
                .map_err(|e| PhotoAnnotateError::Clipboard(e.to_string()))?;
        }
        info!("クリップボードにコピー: {}", text);
        Ok(())
    }
}

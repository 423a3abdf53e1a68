//! 注記テキストの履歴とピッカー
//!
//! 保存した注記を新しい順に保持し、フィルタ付きの選択リストを作る。
//! 選択リストの先頭には常にプレースホルダーを置き、
//! 利用者が明示的に別の項目を選び直すまで「選択」が発生しないようにする。

use crate::error::{Error, Result};

/// 履歴の既定上限
pub const DEFAULT_HISTORY_LIMIT: usize = 200;

/// プレースホルダーの表示名
pub const PLACEHOLDER_LABEL: &str = "(Prior Text)";

/// 選択リストの1項目
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerEntry {
    /// 未選択（履歴には保存されない）
    Placeholder,
    /// 履歴中のテキスト
    Text(String),
}

impl PickerEntry {
    pub fn label(&self) -> &str {
        match self {
            PickerEntry::Placeholder => PLACEHOLDER_LABEL,
            PickerEntry::Text(text) => text,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            PickerEntry::Placeholder => None,
            PickerEntry::Text(text) => Some(text),
        }
    }
}

/// 保存済み注記の履歴（新しい順、重複なし、上限付き）
#[derive(Debug, Clone)]
pub struct TextHistory {
    entries: Vec<String>,
    capacity: usize,
}

impl TextHistory {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            capacity: DEFAULT_HISTORY_LIMIT,
        }
    }

    pub fn with_capacity(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity(capacity));
        }
        Ok(Self {
            entries: Vec::new(),
            capacity,
        })
    }

    /// 先頭に追加する。同じテキストが既にあれば先頭へ移動し、上限を超えた古い項目は捨てる
    pub fn insert_front(&mut self, text: &str) {
        if let Some(idx) = self.entries.iter().position(|e| e == text) {
            self.entries.remove(idx);
        }
        self.entries.insert(0, text.to_string());
        self.entries.truncate(self.capacity);
    }

    /// 大文字小文字を区別しない部分一致で絞り込む。先頭は常にプレースホルダー
    pub fn filtered(&self, query: &str) -> Vec<PickerEntry> {
        let needle = query.to_lowercase();
        std::iter::once(PickerEntry::Placeholder)
            .chain(
                self.entries
                    .iter()
                    .filter(|e| needle.is_empty() || e.to_lowercase().contains(&needle))
                    .map(|e| PickerEntry::Text(e.clone())),
            )
            .collect()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for TextHistory {
    fn default() -> Self {
        Self::new()
    }
}

/// 履歴ピッカーの状態（フィルタ文字列、表示リスト、選択位置）
#[derive(Debug, Clone)]
pub struct HistoryPicker {
    filter: String,
    entries: Vec<PickerEntry>,
    selected: usize,
}

impl HistoryPicker {
    pub fn new() -> Self {
        Self {
            filter: String::new(),
            entries: vec![PickerEntry::Placeholder],
            selected: 0,
        }
    }

    /// フィルタを変更してリストを作り直す。選択はプレースホルダーに戻る
    pub fn set_filter(&mut self, query: &str, history: &TextHistory) {
        self.filter = query.to_string();
        self.refresh(history);
    }

    /// 現在のフィルタでリストを作り直す
    pub fn refresh(&mut self, history: &TextHistory) {
        self.entries = history.filtered(&self.filter);
        self.selected = 0;
    }

    /// 項目を選択する。
    ///
    /// 選択値が変わり、かつ実テキストの場合のみそのテキストを返す。
    /// 同じ値の再選択、プレースホルダー、範囲外は `None`。
    pub fn select(&mut self, index: usize) -> Option<String> {
        let entry = self.entries.get(index)?;
        if *entry == self.entries[self.selected] {
            return None;
        }
        self.selected = index;
        entry.text().map(str::to_string)
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn entries(&self) -> &[PickerEntry] {
        &self.entries
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> &PickerEntry {
        &self.entries[self.selected]
    }
}

impl Default for HistoryPicker {
    fn default() -> Self {
        Self::new()
    }
}

//! 写真セッション（状態機械）
//!
//! フォルダ内の写真リスト、現在位置、現在写真のメタデータと注記の編集状態を持つ。
//! 状態変更はすべて `&mut self` のコマンド経由で行い、変更内容は
//! `SessionEvent` として溜めておく。UI側は `take_events()` で受け取る。
//!
//! 未保存の注記がある状態で写真を切り替える場合は、呼び出し側が渡す
//! `UnsavedChangesGuard` に「破棄」か「保存」を決めてもらうまで切り替えない。

use crate::annotation::{sidecar_path, AnnotationStore, SidecarStore};
use crate::clipboard::Clipboard;
use crate::config::Config;
use crate::error::Result;
use crate::scanner::{self, ExifExtractor, MetadataExtractor};
use log::{debug, info, warn};
use photo_annotate_common::{HistoryPicker, MapRegion, MapSpan, PhotoMetadata, TextHistory};
use std::path::{Path, PathBuf};

/// セッションの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// フォルダ未読込、または写真なし
    Empty,
    /// 写真あり、現在位置が有効
    Browsing,
}

/// 未保存の注記の扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// 保存せずに編集内容を捨てる
    Discard,
    /// 保存してから進む
    Save,
}

/// 判断材料として渡す未保存の内容
#[derive(Debug)]
pub struct PendingChanges<'a> {
    pub photo: &'a Path,
    pub saved_text: &'a str,
    pub draft_text: &'a str,
}

/// 未保存の注記がある状態で写真を切り替えるときの判断役
pub trait UnsavedChangesGuard {
    fn resolve(&mut self, pending: &PendingChanges<'_>) -> Resolution;
}

impl<F> UnsavedChangesGuard for F
where
    F: FnMut(&PendingChanges<'_>) -> Resolution,
{
    fn resolve(&mut self, pending: &PendingChanges<'_>) -> Resolution {
        self(pending)
    }
}

/// 常に同じ判断を返す
impl UnsavedChangesGuard for Resolution {
    fn resolve(&mut self, _pending: &PendingChanges<'_>) -> Resolution {
        *self
    }
}

/// セッションの変更通知
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    FolderLoaded { count: usize },
    PhotoLoaded { index: usize },
    DirtyChanged(bool),
    Saved { sidecar: PathBuf },
    /// 範囲外の番号入力を現在の番号に戻した
    DisplayNumberReverted { number: usize },
    PickerChanged,
    MapRegionChanged(MapRegion),
}

/// 取り出されずに溜めておく変更通知の上限。超えた分は古いものから捨てる
pub const MAX_PENDING_EVENTS: usize = 256;

#[derive(Debug, Clone, Copy)]
enum Direction {
    Next,
    Previous,
}

/// 写真セッション
///
/// コマンドごとに `SessionEvent` が溜まる。呼び出し側は `take_events()` で
/// 定期的に取り出すこと。取り出さない場合も `MAX_PENDING_EVENTS` 件までしか保持しない。
pub struct PhotoSession<M = ExifExtractor, S = SidecarStore> {
    extractor: M,
    store: S,

    folder: Option<PathBuf>,
    photos: Vec<PathBuf>,
    index: usize,
    /// 1始まりの表示番号（写真なしのときは0）
    display_number: usize,

    metadata: PhotoMetadata,
    saved_text: String,
    draft_text: String,
    dirty: bool,

    history: TextHistory,
    picker: HistoryPicker,

    map_span: MapSpan,
    map_region: MapRegion,

    can_go_next: bool,
    can_go_prev: bool,

    events: Vec<SessionEvent>,
}

impl PhotoSession {
    /// EXIF抽出とサイドカー保存を使う標準のセッション
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_parts(ExifExtractor, SidecarStore, config)
    }
}

impl<M: MetadataExtractor, S: AnnotationStore> PhotoSession<M, S> {
    pub fn with_parts(extractor: M, store: S, config: &Config) -> Result<Self> {
        let history = config.new_history()?;
        let map_region = config.initial_map_region();

        Ok(Self {
            extractor,
            store,
            folder: None,
            photos: Vec::new(),
            index: 0,
            display_number: 0,
            metadata: PhotoMetadata::default(),
            saved_text: String::new(),
            draft_text: String::new(),
            dirty: false,
            history,
            picker: HistoryPicker::new(),
            map_span: map_region.span,
            map_region,
            can_go_next: false,
            can_go_prev: false,
            events: Vec::new(),
        })
    }

    // ---- 参照 ----

    pub fn state(&self) -> SessionState {
        if self.photos.is_empty() {
            SessionState::Empty
        } else {
            SessionState::Browsing
        }
    }

    pub fn folder(&self) -> Option<&Path> {
        self.folder.as_deref()
    }

    pub fn photos(&self) -> &[PathBuf] {
        &self.photos
    }

    pub fn count(&self) -> usize {
        self.photos.len()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn display_number(&self) -> usize {
        self.display_number
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.photos.get(self.index).map(PathBuf::as_path)
    }

    pub fn metadata(&self) -> &PhotoMetadata {
        &self.metadata
    }

    pub fn lat_lon_display(&self) -> String {
        self.metadata.lat_lon_display()
    }

    pub fn saved_text(&self) -> &str {
        &self.saved_text
    }

    pub fn draft_text(&self) -> &str {
        &self.draft_text
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// 保存ボタンを有効にできるか
    pub fn can_save(&self) -> bool {
        self.dirty && !self.photos.is_empty()
    }

    pub fn can_go_next(&self) -> bool {
        self.can_go_next
    }

    pub fn can_go_prev(&self) -> bool {
        self.can_go_prev
    }

    pub fn history(&self) -> &TextHistory {
        &self.history
    }

    pub fn picker(&self) -> &HistoryPicker {
        &self.picker
    }

    pub fn map_span(&self) -> MapSpan {
        self.map_span
    }

    pub fn map_region(&self) -> MapRegion {
        self.map_region
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// 溜まった変更通知を取り出す
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    // ---- コマンド ----

    /// フォルダ選択ダイアログの結果を受け取る。`None`（キャンセル）は何もしない
    pub fn select_folder(
        &mut self,
        folder: Option<&Path>,
        guard: &mut dyn UnsavedChangesGuard,
    ) -> Result<()> {
        match folder {
            Some(folder) => self.load_folder(folder, guard),
            None => {
                debug!("フォルダ選択がキャンセルされました");
                Ok(())
            }
        }
    }

    /// フォルダを読み込み、先頭の写真を表示する
    ///
    /// 列挙に失敗した場合は以前の状態のまま。
    pub fn load_folder(&mut self, folder: &Path, guard: &mut dyn UnsavedChangesGuard) -> Result<()> {
        let photos = match scanner::scan_folder(folder) {
            Ok(photos) => photos,
            Err(e) => {
                warn!("{}", e);
                return Err(e);
            }
        };

        self.resolve_unsaved(guard)?;

        info!("{}枚の写真を読み込み: {}", photos.len(), folder.display());
        self.folder = Some(folder.to_path_buf());
        self.photos = photos;
        self.index = 0;
        self.display_number = self.current_number();
        if self.photos.is_empty() {
            self.metadata = PhotoMetadata::default();
            self.saved_text.clear();
            self.draft_text.clear();
        }
        self.emit(SessionEvent::FolderLoaded {
            count: self.photos.len(),
        });

        self.refresh_current();
        Ok(())
    }

    /// 現在の写真のメタデータと注記を読み直す
    pub fn refresh_current(&mut self) {
        if let Some(path) = self.photos.get(self.index).cloned() {
            self.metadata = self.extractor.extract(&path);

            // 座標がない写真では地図を前の位置のままにする
            if let Some(center) = self.metadata.coordinate {
                self.map_region = MapRegion {
                    center,
                    span: self.map_span,
                };
                self.emit(SessionEvent::MapRegionChanged(self.map_region));
            }

            self.saved_text = self.store.load(&path);
            self.draft_text = self.saved_text.clone();
            self.emit(SessionEvent::PhotoLoaded { index: self.index });
        }

        self.recompute_dirty();
        self.update_navigation_flags();
    }

    pub fn next(&mut self, guard: &mut dyn UnsavedChangesGuard) -> Result<()> {
        self.step(Direction::Next, guard)
    }

    pub fn previous(&mut self, guard: &mut dyn UnsavedChangesGuard) -> Result<()> {
        self.step(Direction::Previous, guard)
    }

    fn step(&mut self, direction: Direction, guard: &mut dyn UnsavedChangesGuard) -> Result<()> {
        if self.photos.is_empty() {
            warn!("移動できる写真がありません");
            return Ok(());
        }

        self.resolve_unsaved(guard)?;

        let last = self.photos.len() - 1;
        let target = match direction {
            Direction::Next => (self.index + 1).min(last),
            Direction::Previous => self.index.saturating_sub(1),
        };
        let changed = target != self.index;

        self.index = target;
        self.display_number = self.current_number();

        if changed {
            self.refresh_current();
        } else {
            debug!("{:?}: 端に到達 (index {})", direction, self.index);
            self.update_navigation_flags();
        }
        Ok(())
    }

    /// 1始まりの番号で移動する
    ///
    /// 範囲外なら位置は変えず、表示番号を現在の番号に黙って戻す。
    /// どちらの場合も現在の写真を読み直す。
    pub fn jump_to(&mut self, number: usize, guard: &mut dyn UnsavedChangesGuard) -> Result<()> {
        self.resolve_unsaved(guard)?;

        if number >= 1 && number <= self.photos.len() {
            self.index = number - 1;
            self.display_number = number;
        } else {
            debug!("範囲外の番号 {} を {} に戻します", number, self.current_number());
            self.display_number = self.current_number();
            self.emit(SessionEvent::DisplayNumberReverted {
                number: self.display_number,
            });
        }

        self.refresh_current();
        Ok(())
    }

    pub fn edit_draft(&mut self, text: impl Into<String>) {
        self.draft_text = text.into();
        self.recompute_dirty();
    }

    /// 編集中の注記を保存する
    ///
    /// 写真がない場合、または変更がない場合は何もしない。
    /// 書き込みに失敗した場合は未保存のまま残し、エラーを返す。
    pub fn save(&mut self) -> Result<()> {
        let Some(path) = self.current_path().map(Path::to_path_buf) else {
            debug!("写真がないため保存しません");
            return Ok(());
        };
        if !self.dirty {
            return Ok(());
        }

        self.history.insert_front(&self.draft_text);
        self.picker.refresh(&self.history);
        self.emit(SessionEvent::PickerChanged);

        if let Err(e) = self.store.save(&path, &self.draft_text) {
            warn!("{}", e);
            return Err(e);
        }

        self.saved_text = self.draft_text.clone();
        self.recompute_dirty();
        self.emit(SessionEvent::Saved {
            sidecar: sidecar_path(&path),
        });
        Ok(())
    }

    /// セッションを閉じる前に未保存の注記を解決する
    pub fn close(&mut self, guard: &mut dyn UnsavedChangesGuard) -> Result<()> {
        self.resolve_unsaved(guard)
    }

    /// 履歴ピッカーのフィルタを変更する
    pub fn set_picker_filter(&mut self, query: &str) {
        self.picker.set_filter(query, &self.history);
        self.emit(SessionEvent::PickerChanged);
    }

    /// 履歴ピッカーの項目を選ぶ。編集中の注記が変わった場合は true
    pub fn pick_history(&mut self, index: usize) -> bool {
        let Some(text) = self.picker.select(index) else {
            return false;
        };
        if text == self.draft_text {
            return false;
        }
        self.edit_draft(text);
        true
    }

    /// 地図の表示スパンの変更を受け取る。以降の写真でもこのスパンを使う
    pub fn update_map_span(&mut self, span: Option<MapSpan>) {
        if let Some(span) = span {
            self.map_span = span;
        }
    }

    /// 緯度経度の表示文字列をそのままクリップボードへ渡す
    pub fn copy_lat_lon(&self, clipboard: &mut dyn Clipboard) -> Result<()> {
        clipboard.set_text(&self.lat_lon_display())
    }

    // ---- 内部 ----

    fn current_number(&self) -> usize {
        if self.photos.is_empty() {
            0
        } else {
            self.index + 1
        }
    }

    /// 未保存の注記があれば判断役に決めてもらう。保存に失敗した場合は先へ進まない
    fn resolve_unsaved(&mut self, guard: &mut dyn UnsavedChangesGuard) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        let Some(photo) = self.photos.get(self.index) else {
            return Ok(());
        };

        let resolution = guard.resolve(&PendingChanges {
            photo,
            saved_text: &self.saved_text,
            draft_text: &self.draft_text,
        });

        match resolution {
            Resolution::Discard => {
                debug!("未保存の注記を破棄: {}", photo.display());
                self.draft_text = self.saved_text.clone();
                self.recompute_dirty();
                Ok(())
            }
            Resolution::Save => self.save(),
        }
    }

    fn emit(&mut self, event: SessionEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            let overflow = self.events.len() + 1 - MAX_PENDING_EVENTS;
            self.events.drain(..overflow);
        }
        self.events.push(event);
    }

    fn recompute_dirty(&mut self) {
        let dirty = self.draft_text != self.saved_text;
        if dirty != self.dirty {
            self.dirty = dirty;
            self.emit(SessionEvent::DirtyChanged(dirty));
        }
    }

    fn update_navigation_flags(&mut self) {
        let count = self.photos.len();
        self.can_go_next = count > 0 && self.index < count - 1;
        self.can_go_prev = self.index > 0;
    }
}

//! 対話式の注記入力
//!
//! 端末上で写真を1枚ずつ表示し、注記の編集・保存・履歴からの選択を行う。
//! 状態はすべて `PhotoSession` が持ち、ここは入力と表示だけを担当する。

use crate::clipboard::SystemClipboard;
use crate::config::Config;
use crate::error::{PhotoAnnotateError, Result};
use crate::session::{PendingChanges, PhotoSession, Resolution, SessionState, UnsavedChangesGuard};
use dialoguer::{Editor, Input, Select};
use log::{debug, warn};
use std::path::{Path, PathBuf};

/// 対話アクション
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// 次の写真
    Next,
    /// 前の写真
    Previous,
    /// 番号で移動
    Jump(usize),
    /// 1行で注記を編集
    Edit,
    /// エディタで注記を編集
    EditMultiline,
    /// 注記を保存
    Save,
    /// 履歴のフィルタを設定
    Filter,
    /// 履歴から選択
    Pick,
    /// 緯度経度をコピー
    Copy,
    /// 別のフォルダを開く
    Open,
    /// ヘルプ表示
    Help,
    /// 終了
    Quit,
    /// 解釈できない入力
    Unknown(String),
}

/// 入力文字列をアクションに変換
pub fn parse_action(input: &str) -> Action {
    let trimmed = input.trim();
    match trimmed {
        "" | "n" => Action::Next,
        "p" => Action::Previous,
        "e" => Action::Edit,
        "E" => Action::EditMultiline,
        "s" => Action::Save,
        "f" => Action::Filter,
        "h" => Action::Pick,
        "c" => Action::Copy,
        "o" => Action::Open,
        "?" => Action::Help,
        "q" | "Q" => Action::Quit,
        _ => match trimmed.parse::<usize>() {
            Ok(number) => Action::Jump(number),
            Err(_) => Action::Unknown(trimmed.to_string()),
        },
    }
}

const HELP: &str = "操作: [Enter/n]次 [p]前 [番号]移動 [e]編集 [E]エディタ編集 [s]保存 [f]履歴フィルタ [h]履歴から選択 [c]緯度経度コピー [o]フォルダを開く [q]終了";

/// 未保存の注記があるときに破棄/保存を尋ねる
pub struct PromptGuard;

impl UnsavedChangesGuard for PromptGuard {
    fn resolve(&mut self, pending: &PendingChanges<'_>) -> Resolution {
        println!("⚠ 注記が保存されていません: {}", pending.photo.display());
        println!("  保存済み: {}", pending.saved_text);
        println!("  編集中  : {}", pending.draft_text);

        let choice = Select::new()
            .with_prompt("変更をどうしますか")
            .items(&["破棄", "保存"])
            .default(1)
            .interact();

        match choice {
            Ok(0) => Resolution::Discard,
            Ok(_) => Resolution::Save,
            Err(e) => {
                // 入力できない場合は内容を失わない方を選ぶ
                warn!("選択に失敗したため保存します: {}", e);
                Resolution::Save
            }
        }
    }
}

/// 対話式で注記を入力
pub fn run_interactive(folder: &Path, config: &Config) -> Result<()> {
    let mut session = PhotoSession::new(config)?;
    let mut guard = PromptGuard;
    let mut clipboard = SystemClipboard::new();

    session.load_folder(folder, &mut guard)?;

    if session.state() == SessionState::Empty {
        println!("写真が見つかりません: {}", folder.display());
        return Ok(());
    }

    println!("📷 {}枚の写真", session.count());
    println!("---");
    println!("{}", HELP);
    println!("---\n");

    loop {
        for event in session.take_events() {
            debug!("{:?}", event);
        }
        print_current(&session);

        let input = prompt_text("操作", "")?;

        let result = match parse_action(&input) {
            Action::Next => session.next(&mut guard),
            Action::Previous => session.previous(&mut guard),
            Action::Jump(number) => session.jump_to(number, &mut guard),
            Action::Edit => {
                let text = prompt_text("注記", session.draft_text())?;
                session.edit_draft(text);
                Ok(())
            }
            Action::EditMultiline => {
                let edited = Editor::new()
                    .edit(session.draft_text())
                    .map_err(|e| PhotoAnnotateError::Prompt(e.to_string()))?;
                if let Some(text) = edited {
                    session.edit_draft(text.strip_suffix('\n').unwrap_or(&text).to_string());
                }
                Ok(())
            }
            Action::Save => {
                if session.can_save() {
                    session.save().map(|_| println!("  ✔ 保存しました"))
                } else {
                    println!("  → 変更はありません");
                    Ok(())
                }
            }
            Action::Filter => {
                let query = prompt_text("履歴フィルタ", session.picker().filter())?;
                session.set_picker_filter(&query);
                println!("  → {}件", session.picker().entries().len() - 1);
                Ok(())
            }
            Action::Pick => {
                let labels: Vec<&str> = session.picker().entries().iter().map(|e| e.label()).collect();
                let index = Select::new()
                    .with_prompt("過去の注記")
                    .items(&labels)
                    .default(session.picker().selected_index())
                    .interact()
                    .map_err(|e| PhotoAnnotateError::Prompt(e.to_string()))?;
                session.pick_history(index);
                Ok(())
            }
            Action::Copy => session
                .copy_lat_lon(&mut clipboard)
                .map(|_| println!("  ✔ コピーしました: {}", session.lat_lon_display().trim())),
            Action::Open => {
                let input = prompt_text("フォルダ（空欄でキャンセル）", "")?;
                let folder = if input.trim().is_empty() {
                    None
                } else {
                    Some(PathBuf::from(input.trim()))
                };
                session.select_folder(folder.as_deref(), &mut guard)
            }
            Action::Help => {
                println!("{}", HELP);
                Ok(())
            }
            Action::Quit => {
                if handle_quit(&mut session, &mut guard) == Flow::Exit {
                    break;
                }
                Ok(())
            }
            Action::Unknown(input) => {
                println!("  → 不明な操作: {}（?でヘルプ）", input);
                Ok(())
            }
        };

        // 失敗してもセッションは直前の状態のまま続けられる
        if let Err(e) = result {
            eprintln!("  ✖ {}", e);
        }
        println!();
    }

    Ok(())
}

/// 対話ループを続けるかどうか
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// 終了を試みる
///
/// 未保存の注記を保存できなかった場合はエラーを表示して対話を続ける。
/// 編集内容は未保存のまま残るので、再度保存や終了を選べる。
pub fn handle_quit<M, S>(session: &mut PhotoSession<M, S>, guard: &mut dyn UnsavedChangesGuard) -> Flow
where
    M: crate::scanner::MetadataExtractor,
    S: crate::annotation::AnnotationStore,
{
    match session.close(guard) {
        Ok(()) => {
            println!("終了します");
            Flow::Exit
        }
        Err(e) => {
            eprintln!("  ✖ {}", e);
            Flow::Continue
        }
    }
}

fn print_current<M, S>(session: &PhotoSession<M, S>)
where
    M: crate::scanner::MetadataExtractor,
    S: crate::annotation::AnnotationStore,
{
    let Some(path) = session.current_path() else {
        println!("（写真なし）");
        return;
    };

    let meta = session.metadata();
    println!("[{}/{}] {}", session.display_number(), session.count(), path.display());
    println!("  日時    : {}", meta.timestamp);
    println!("  緯度経度: {}", meta.lat_lon_display().trim());
    println!("  方位    : {}", meta.heading_display().unwrap_or_default().trim());
    println!(
        "  注記    : {}{}",
        session.draft_text(),
        if session.is_dirty() { " (未保存)" } else { "" }
    );
}

fn prompt_text(prompt: &str, initial: &str) -> Result<String> {
    Input::<String>::new()
        .with_prompt(prompt)
        .with_initial_text(initial)
        .allow_empty(true)
        .interact_text()
        .map_err(|e| PhotoAnnotateError::Prompt(e.to_string()))
}

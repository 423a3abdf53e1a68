//! セッションの結合テスト
//!
//! 実ファイル（一時フォルダ）上で読み込み・編集・保存・移動を検証

use photo_annotate::config::Config;
use photo_annotate::{PendingChanges, PhotoSession, Resolution, SessionState};
use std::fs::{self, File};
use std::path::Path;
use tempfile::tempdir;

fn create_photos(dir: &Path, names: &[&str]) {
    for name in names {
        File::create(dir.join(name)).unwrap();
    }
}

fn file_names(session: &PhotoSession) -> Vec<String> {
    session
        .photos()
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect()
}

/// 3枚のフォルダで編集→次へ→保存を選択
#[test]
fn test_scenario_save_on_next() {
    let dir = tempdir().expect("Failed to create temp dir");
    create_photos(dir.path(), &["c.heic", "b.jpg", "a.jpg"]);

    let mut session = PhotoSession::new(&Config::default()).unwrap();
    session.load_folder(dir.path(), &mut Resolution::Discard).unwrap();

    assert_eq!(file_names(&session), vec!["a.jpg", "b.jpg", "c.heic"]);
    assert_eq!(session.index(), 0);
    assert_eq!(session.display_number(), 1);

    session.edit_draft("hello");
    assert!(session.is_dirty());

    let mut asked = 0;
    let mut guard = |_: &PendingChanges<'_>| {
        asked += 1;
        Resolution::Save
    };
    session.next(&mut guard).unwrap();

    assert_eq!(asked, 1);
    assert_eq!(fs::read_to_string(dir.path().join("a.txt")).unwrap(), "hello");
    assert_eq!(session.index(), 1);
    assert_eq!(session.display_number(), 2);
    assert!(!session.is_dirty());
}

/// 既存のサイドカーを読み込む
#[test]
fn test_existing_sidecar_loaded() {
    let dir = tempdir().expect("Failed to create temp dir");
    create_photos(dir.path(), &["IMG_0001.JPG"]);
    fs::write(dir.path().join("IMG_0001.txt"), "既存の注記").unwrap();

    let mut session = PhotoSession::new(&Config::default()).unwrap();
    session.load_folder(dir.path(), &mut Resolution::Discard).unwrap();

    assert_eq!(session.saved_text(), "既存の注記");
    assert_eq!(session.draft_text(), "既存の注記");
    assert!(!session.is_dirty());
}

/// 保存直後に読み直しても内容が一致する
#[test]
fn test_save_then_refresh_round_trip() {
    let dir = tempdir().expect("Failed to create temp dir");
    create_photos(dir.path(), &["a.png"]);

    let mut session = PhotoSession::new(&Config::default()).unwrap();
    session.load_folder(dir.path(), &mut Resolution::Discard).unwrap();

    session.edit_draft("line 1\nline 2");
    session.save().unwrap();
    session.refresh_current();

    assert_eq!(session.saved_text(), "line 1\nline 2");
    assert_eq!(session.draft_text(), "line 1\nline 2");
    assert!(!session.is_dirty());
}

/// 書き込みに失敗しても未保存のまま残り、再試行できる
#[test]
fn test_sidecar_write_failure_keeps_dirty() {
    let dir = tempdir().expect("Failed to create temp dir");
    create_photos(dir.path(), &["a.jpg", "b.jpg"]);
    fs::create_dir(dir.path().join("a.txt")).unwrap();

    let mut session = PhotoSession::new(&Config::default()).unwrap();
    session.load_folder(dir.path(), &mut Resolution::Discard).unwrap();

    session.edit_draft("memo");
    assert!(session.save().is_err());
    assert!(session.is_dirty());

    // 保存に失敗したら移動しない
    assert!(session.next(&mut Resolution::Save).is_err());
    assert_eq!(session.index(), 0);

    fs::remove_dir(dir.path().join("a.txt")).unwrap();
    session.save().unwrap();
    assert!(!session.is_dirty());
    assert_eq!(fs::read_to_string(dir.path().join("a.txt")).unwrap(), "memo");
}

/// 別フォルダの読み込みで並びと位置がリセットされる
#[test]
fn test_reload_other_folder() {
    let first = tempdir().expect("Failed to create temp dir");
    let second = tempdir().expect("Failed to create temp dir");
    create_photos(first.path(), &["1.jpg", "2.jpg", "3.jpg"]);
    create_photos(second.path(), &["x.jpeg", "y.txt"]);

    let mut session = PhotoSession::new(&Config::default()).unwrap();
    session.load_folder(first.path(), &mut Resolution::Discard).unwrap();
    session.jump_to(3, &mut Resolution::Discard).unwrap();
    assert_eq!(session.index(), 2);

    session.select_folder(Some(second.path()), &mut Resolution::Discard).unwrap();
    assert_eq!(session.count(), 1);
    assert_eq!(session.index(), 0);
    assert_eq!(session.display_number(), 1);
    assert!(!session.can_go_next());
    assert!(!session.can_go_prev());

    let empty = tempdir().expect("Failed to create temp dir");
    session.select_folder(Some(empty.path()), &mut Resolution::Discard).unwrap();
    assert_eq!(session.state(), SessionState::Empty);
    assert_eq!(session.draft_text(), "");
}

/// 末尾での next は位置を変えない
#[test]
fn test_next_at_last_photo() {
    let dir = tempdir().expect("Failed to create temp dir");
    create_photos(dir.path(), &["a.jpg", "b.jpg"]);

    let mut session = PhotoSession::new(&Config::default()).unwrap();
    session.load_folder(dir.path(), &mut Resolution::Discard).unwrap();
    session.next(&mut Resolution::Discard).unwrap();
    session.next(&mut Resolution::Discard).unwrap();

    assert_eq!(session.index(), 1);
    assert!(!session.can_go_next());
}

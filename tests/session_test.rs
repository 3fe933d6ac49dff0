//! セッションテスト
//!
//! モデルファイルの読み込み・保存・ドライランを検証

use snha_tools::commands::sync_revisions::sync_revisions;
use snha_tools::config::RevisionSettings;
use snha_tools::error::ToolError;
use snha_tools::host::{HostModel, ModelDocument};
use snha_tools::session::Session;
use snha_tools_common::ElementId;
use std::path::Path;
use tempfile::tempdir;

const MODEL_JSON: &str = r#"{
  "title": "Sample Project",
  "revisions": [
    { "id": 200, "sequence": 1, "name": "01 - Permit" }
  ],
  "sheets": [
    {
      "id": 300,
      "number": "A101",
      "name": "Floor Plan",
      "parameters": [
        { "name": "Permit", "value": { "kind": "text", "data": "2026-01-15" } }
      ]
    }
  ]
}"#;

fn write_model(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("model.json");
    std::fs::write(&path, MODEL_JSON).expect("モデル書き込み失敗");
    path
}

fn sheet_revisions(path: &Path) -> Vec<ElementId> {
    let document = ModelDocument::load(path).expect("モデル読み込み失敗");
    document.sheets[0].additional_revision_ids.clone()
}

/// 存在しないモデルファイル
#[test]
fn test_open_missing_model() {
    let dir = tempdir().expect("Failed to create temp dir");
    let result = Session::open(&dir.path().join("missing.json"));
    assert!(matches!(result, Err(ToolError::ModelNotFound(_))));
}

/// 壊れたJSON
#[test]
fn test_open_invalid_json() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();

    let result = Session::open(&path);
    assert!(matches!(result, Err(ToolError::JsonParse(_))));
}

/// 要素IDが重複したモデルは開かない
#[test]
fn test_open_model_with_duplicate_ids() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("duplicate.json");
    std::fs::write(
        &path,
        r#"{
  "views": [{ "id": 5, "name": "Level 1", "viewType": "floorPlan" }],
  "lineStyles": [{ "id": 5, "name": "FireRating 1HR Code" }]
}"#,
    )
    .unwrap();

    let result = Session::open(&path);
    assert!(matches!(result, Err(ToolError::DuplicateElementId(ElementId(5)))));
}

/// 変更を入力ファイルに上書き保存
#[test]
fn test_close_saves_changes() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = write_model(dir.path());

    let mut session = Session::open(&path).expect("オープン失敗");
    sync_revisions(&mut session, &RevisionSettings::default()).expect("同期に失敗");
    let summary = session.close(None, false).expect("クローズ失敗");

    assert!(summary.modified);
    assert_eq!(summary.saved_to.as_deref(), Some(path.as_path()));
    assert_eq!(sheet_revisions(&path), vec![ElementId(200)]);

    let saved = ModelDocument::load(&path).unwrap();
    assert!(!saved.is_modified());
    assert_eq!(saved.title, "Sample Project");
}

/// 出力先を指定した場合は入力ファイルを変更しない
#[test]
fn test_close_to_output_path() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = write_model(dir.path());
    let output = dir.path().join("out").join("model.json");

    let mut session = Session::open(&path).expect("オープン失敗");
    sync_revisions(&mut session, &RevisionSettings::default()).expect("同期に失敗");
    let summary = session.close(Some(&output), false).expect("クローズ失敗");

    assert_eq!(summary.saved_to.as_deref(), Some(output.as_path()));
    assert_eq!(sheet_revisions(&output), vec![ElementId(200)]);
    assert!(sheet_revisions(&path).is_empty());
}

/// ドライランでは保存しない
#[test]
fn test_close_dry_run() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = write_model(dir.path());

    let mut session = Session::open(&path).expect("オープン失敗");
    sync_revisions(&mut session, &RevisionSettings::default()).expect("同期に失敗");
    let summary = session.close(None, true).expect("クローズ失敗");

    assert!(summary.modified);
    assert!(summary.saved_to.is_none());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), MODEL_JSON);
}

/// 変更がなければ保存しない
#[test]
fn test_close_without_changes() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = write_model(dir.path());

    let session = Session::open(&path).expect("オープン失敗");
    let summary = session.close(None, false).expect("クローズ失敗");

    assert!(!summary.modified);
    assert!(summary.saved_to.is_none());
}

/// クロージャがエラーを返すとロールバック
#[test]
fn test_transaction_rolls_back_on_error() {
    let mut session = Session::new(ModelDocument::from_json(MODEL_JSON).unwrap());

    let result: snha_tools::error::Result<()> = session.transaction("Failing", |host| {
        host.apply(&snha_tools::host::Change::SetAdditionalRevisions {
            sheet: ElementId(300),
            revisions: vec![ElementId(200)],
        })?;
        Err(ToolError::Transaction("中断".into()))
    });

    assert!(result.is_err());
    let host = session.into_host();
    assert!(host.sheets[0].additional_revision_ids.is_empty());
    assert!(!host.is_modified());
    assert_eq!(host.transaction_depth(), 0);
}

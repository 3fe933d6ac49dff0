//! エラーケーステスト
//!
//! エラー型の変換と表示を検証

use snha_tools::error::ToolError;
use snha_tools::host::{Change, HostModel, ModelDocument};
use snha_tools_common::{ElementId, Error as CommonError};

/// 共通エラーはそのままのメッセージで包む
#[test]
fn test_common_error_transparent() {
    let common = CommonError::NoMatch {
        subject: "line styles".into(),
        pattern: "2HR + Code".into(),
    };
    let message = common.to_string();

    let err: ToolError = common.into();
    assert_eq!(err.to_string(), message);
    assert!(matches!(err, ToolError::Common(CommonError::NoMatch { .. })));
}

/// ToolErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        ToolError::Selection("テスト選択エラー".to_string()),
        ToolError::ElementNotFound(ElementId(42)),
        ToolError::Transaction("テスト".to_string()),
        ToolError::HostWrite("テスト".to_string()),
        ToolError::UnsavedModel,
        ToolError::ModelNotFound("model.json".to_string()),
        ToolError::Config("テスト設定エラー".to_string()),
    ];

    for err in errors {
        let msg = format!("{}", err);
        assert!(!msg.is_empty(), "エラーメッセージが空: {:?}", err);
    }

    assert!(ToolError::ElementNotFound(ElementId(42)).to_string().contains("42"));
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: ToolError = io_err.into();
    assert!(matches!(err, ToolError::Io(_)));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
    let err: ToolError = json_err.into();
    assert!(matches!(err, ToolError::JsonParse(_)));
}

/// トランザクション外の変更は拒否
#[test]
fn test_change_outside_transaction() {
    let mut document = ModelDocument::default();
    let result = document.apply(&Change::DeleteElement(ElementId(1)));
    assert!(matches!(result, Err(ToolError::Transaction(_))));
    assert!(!document.is_modified());
}

/// 3段目のトランザクションは開始できない
#[test]
fn test_transaction_depth_limit() {
    let mut document = ModelDocument::default();
    document.begin_transaction("outer").unwrap();
    document.begin_transaction("inner").unwrap();

    let result = document.begin_transaction("third");
    assert!(matches!(result, Err(ToolError::Transaction(_))));
    assert_eq!(document.transaction_depth(), 2);
}

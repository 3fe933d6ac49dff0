use snha_tools_common::ElementId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error(transparent)]
    Common(#[from] snha_tools_common::Error),

    #[error("選択エラー: {0}")]
    Selection(String),

    #[error("要素が見つかりません: {0}")]
    ElementNotFound(ElementId),

    #[error("トランザクションエラー: {0}")]
    Transaction(String),

    #[error("モデル書き込みエラー: {0}")]
    HostWrite(String),

    #[error("モデルに未保存の変更があります。保存・同期してから再実行してください（--force で無視）")]
    UnsavedModel,

    #[error("要素IDが重複しています: {0}")]
    DuplicateElementId(ElementId),

    #[error("モデルファイルが見つかりません: {0}")]
    ModelNotFound(String),

    #[error("設定エラー: {0}")]
    Config(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ToolError>;

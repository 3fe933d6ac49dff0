use clap::{Parser, Subcommand};
use snha_tools_common::ElementId;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "snha-tools")]
#[command(about = "CADモデル編集ツール（耐火区画線・シートノート・リビジョン・参照ビュー）", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// モデルを保存せずに実行
    #[arg(long, global = true)]
    pub dry_run: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// アクティブビューの壁に沿って耐火区画線を作成
    FireRatingLines {
        /// モデルファイル（JSON）
        #[arg(required = true)]
        model: PathBuf,

        /// 保存先（デフォルト: 入力ファイルを上書き）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 未保存の変更があっても実行
        #[arg(long)]
        force: bool,
    },

    /// シートノートファミリを選択したファミリに統合
    MergeSheetNotes {
        /// モデルファイル（JSON）
        #[arg(required = true)]
        model: PathBuf,

        /// 保存先（デフォルト: 入力ファイルを上書き）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 統合先の注釈タイプID（省略時はモデルの選択）
        #[arg(short, long)]
        target: Option<u64>,
    },

    /// シート発行パラメータに合わせてシートのリビジョンを同期
    SyncRevisions {
        /// モデルファイル（JSON）
        #[arg(required = true)]
        model: PathBuf,

        /// 保存先（デフォルト: 入力ファイルを上書き）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 選択したビューへの参照を別のビューに付け替え
    ChangeViewRef {
        /// モデルファイル（JSON）
        #[arg(required = true)]
        model: PathBuf,

        /// 保存先（デフォルト: 入力ファイルを上書き）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 元ビュー・ビューポート・参照のID（省略時はモデルの選択）
        #[arg(short, long)]
        select: Option<u64>,

        /// 置き換え先ビューの名前またはID（省略時は対話選択）
        #[arg(long)]
        to: Option<String>,
    },

    /// 設定を表示/初期化
    Config {
        /// 現在の設定を表示
        #[arg(long)]
        show: bool,

        /// 設定をデフォルトに戻す
        #[arg(long)]
        reset: bool,
    },
}

/// 引数のIDを要素IDに変換
pub fn element_id(raw: Option<u64>) -> Option<ElementId> {
    raw.map(ElementId)
}

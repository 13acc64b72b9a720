use clap::{Args, Parser, Subcommand};
use crate::ai_provider::AiProvider;
use chrono::NaiveDate;
use photo_search_common::{Activity, QueryFields};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "photo-search")]
#[command(about = "スポーツ写真カタログ検索ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 自然文（または項目指定）で写真を検索
    Search {
        /// 検索文（例: "show 4 images of Ms Dhoni batting at night"）
        query: Option<String>,

        /// カタログファイル（.csv / .xlsx）
        #[arg(short, long)]
        catalog: Option<PathBuf>,

        /// 生成AIプロバイダ（省略時は設定値）
        #[arg(long)]
        provider: Option<AiProvider>,

        /// 生成AIを呼ばずにこのファイルの内容を応答として使う
        #[arg(long)]
        response_file: Option<PathBuf>,

        #[command(flatten)]
        fields: FieldArgs,

        #[command(flatten)]
        display: DisplayArgs,
    },

    /// 人物選択と条件フォームで写真を絞り込み
    Filter {
        /// 人物（複数指定可）
        #[arg(short, long = "player")]
        players: Vec<String>,

        /// 動作（部分一致）
        #[arg(short, long)]
        action: Option<String>,

        /// アクティビティ (Day/Night/Outdoor/Indoor/Close/Far/Unknown)
        #[arg(long, default_value = "Unspecified")]
        activity: Activity,

        /// 開始日 (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// 終了日 (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,

        /// 顔の数（0は指定なし）
        #[arg(long, default_value = "0")]
        faces: u32,

        /// カタログファイル（.csv / .xlsx）
        #[arg(short, long)]
        catalog: Option<PathBuf>,

        #[command(flatten)]
        display: DisplayArgs,
    },

    /// カタログの人物一覧
    Players {
        /// カタログファイル（.csv / .xlsx）
        #[arg(short, long)]
        catalog: Option<PathBuf>,
    },

    /// 設定を管理
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// 既定のカタログファイルを設定
        #[arg(long)]
        set_catalog: Option<PathBuf>,

        /// 現在の設定を表示
        #[arg(long)]
        show: bool,
    },
}

/// 項目指定検索の引数（自然文を使わない場合）
#[derive(Args, Debug, Clone, Default)]
pub struct FieldArgs {
    /// 人物（複数指定可）
    #[arg(short, long = "player")]
    pub players: Vec<String>,

    /// 動作タグ（完全一致）
    #[arg(short, long)]
    pub action: Option<String>,

    #[arg(long)]
    pub environment: Option<String>,

    #[arg(long)]
    pub day_night: Option<String>,

    #[arg(long)]
    pub shot_type: Option<String>,

    #[arg(long)]
    pub date: Option<String>,

    #[arg(long)]
    pub location: Option<String>,

    /// 1ページの表示枚数
    #[arg(short = 'n', long)]
    pub results: Option<usize>,
}

impl From<FieldArgs> for QueryFields {
    fn from(args: FieldArgs) -> Self {
        QueryFields {
            players: args.players,
            action: args.action,
            environment: args.environment,
            day_night: args.day_night,
            shot_type: args.shot_type,
            date: args.date,
            location: args.location,
            results: args.results,
        }
    }
}

/// 結果表示の引数
#[derive(Args, Debug, Clone)]
pub struct DisplayArgs {
    /// 表示するページ（1始まり）
    #[arg(long, default_value = "1")]
    pub page: usize,

    /// 対話モード（次へ/戻る）
    #[arg(short, long)]
    pub interactive: bool,

    /// 画像を取得せずリンクだけ表示
    #[arg(long)]
    pub no_fetch: bool,

    /// 取得した画像の保存先
    #[arg(long)]
    pub save_dir: Option<PathBuf>,
}

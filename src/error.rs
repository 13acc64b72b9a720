use thiserror::Error;

#[derive(Error, Debug)]
pub enum PhotoSearchError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIキーが設定されていません。`photo-search config --set-api-key YOUR_KEY` で設定するか、GEMINI_API_KEY を指定してください")]
    MissingApiKey,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("カタログ読み込みエラー: {0}")]
    CatalogLoad(String),

    #[error("API呼び出しエラー: {0}")]
    ApiCall(String),

    #[error("画像取得に失敗 ({attempts}回試行): {url}: {reason}")]
    ImageFetchFailed {
        url: String,
        attempts: u32,
        reason: String,
    },

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error(transparent)]
    Common(#[from] photo_search_common::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PhotoSearchError>;

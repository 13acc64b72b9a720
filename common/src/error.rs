//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    /// 構造化クエリの型・形が不正（クエリは中断）
    #[error("Malformed criteria: {0}")]
    MalformedCriteria(String),

    /// 生成レスポンスに `{` が無い
    #[error("No JSON object found in response")]
    NoJsonFound,

    /// `{ ... }` の範囲がJSONとしてパースできない
    #[error("Invalid JSON in response: {0}")]
    InvalidJson(String),

    /// カタログに任意列が無い（該当フィルタは無効化）
    #[error("Catalog column missing: {0}")]
    MissingColumn(String),

    /// カタログに必須列が無い・表が空
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

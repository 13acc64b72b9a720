//! 画像取得モジュール
//!
//! 1枚ごとに固定間隔・回数上限付きで再試行する。
//! 失敗はその1枚（グリッドの1セル）に閉じ、ページ全体は止めない。

use crate::config::Config;
use crate::error::{PhotoSearchError, Result};
use image::ImageFormat;
use reqwest::header::CONTENT_TYPE;
use std::future::Future;
use std::time::Duration;

/// 再試行設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 最大試行回数（1以上）
    pub attempts: u32,
    /// 試行間の待ち時間
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            attempts: config.fetch_retries.max(1),
            delay: config.retry_delay(),
        }
    }
}

/// 取得・デコード済みの画像
#[derive(Debug, Clone)]
pub struct FetchedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: Option<ImageFormat>,
}

impl FetchedImage {
    /// 保存用の拡張子
    pub fn extension(&self) -> &'static str {
        self.format
            .and_then(|f| f.extensions_str().first().copied())
            .unwrap_or("img")
    }
}

/// 試行回数の上限まで `op` を繰り返す
///
/// `op` には1始まりの試行番号が渡される。全て失敗した場合は最後のエラーを返す。
pub async fn retry_with_delay<T, F, Fut>(
    policy: &RetryPolicy,
    mut op: F,
) -> std::result::Result<T, String>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = std::result::Result<T, String>>,
{
    let attempts = policy.attempts.max(1);
    let mut last_error = String::new();

    for attempt in 1..=attempts {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) => {
                tracing::warn!(attempt, attempts, error = %e, "画像取得に失敗");
                last_error = e;
                if attempt < attempts {
                    tokio::time::sleep(policy.delay).await;
                }
            }
        }
    }

    Err(last_error)
}

/// バイト列を画像としてデコードできるか確認
pub fn decode_image(bytes: Vec<u8>) -> std::result::Result<FetchedImage, String> {
    let format = image::guess_format(&bytes).ok();
    let decoded =
        image::load_from_memory(&bytes).map_err(|e| format!("画像デコード失敗: {}", e))?;

    Ok(FetchedImage {
        width: decoded.width(),
        height: decoded.height(),
        format,
        bytes,
    })
}

/// HTTP画像取得
pub struct ImageFetcher {
    client: reqwest::Client,
    policy: RetryPolicy,
}

impl ImageFetcher {
    pub fn new(timeout: Duration, policy: RetryPolicy) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PhotoSearchError::Config(format!("HTTPクライアント生成エラー: {}", e)))?;
        Ok(Self { client, policy })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.fetch_timeout(), RetryPolicy::from_config(config))
    }

    /// 画像を取得（再試行込み）
    pub async fn fetch(&self, url: &str) -> Result<FetchedImage> {
        retry_with_delay(&self.policy, |_| self.fetch_once(url))
            .await
            .map_err(|reason| PhotoSearchError::ImageFetchFailed {
                url: url.to_string(),
                attempts: self.policy.attempts.max(1),
                reason,
            })
    }

    async fn fetch_once(&self, url: &str) -> std::result::Result<FetchedImage, String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("Invalid image response: {}", status));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !content_type.contains("image") {
            return Err(format!("画像ではありません (Content-Type: {})", content_type));
        }

        let bytes = response.bytes().await.map_err(|e| e.to_string())?;
        decode_image(bytes.to_vec())
    }
}

//! 自然文クエリ解析（生成AI呼び出し）
//!
//! 自然文を固定プロンプトに埋め込んで生成AIに送り、生レスポンスを返す。
//! 呼び出しの失敗は再試行せずにそのまま返す。

mod cli_backend;
mod gemini;

use crate::ai_provider::AiProvider;
use crate::config::Config;
use crate::error::{PhotoSearchError, Result};
use photo_search_common::build_query_prompt;
use std::time::Duration;

/// 生成AI呼び出しの設定
#[derive(Debug, Clone)]
pub struct QueryGenerator {
    provider: AiProvider,
    model: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl QueryGenerator {
    /// 設定から作成（Gemini APIの場合はAPIキー必須）
    pub fn from_config(config: &Config, provider: AiProvider) -> Result<Self> {
        let api_key = match provider {
            AiProvider::GeminiApi => Some(config.get_api_key()?),
            _ => None,
        };

        Ok(Self {
            provider,
            model: config.model.clone(),
            api_key,
            timeout: Duration::from_secs(60),
        })
    }

    pub fn provider(&self) -> AiProvider {
        self.provider
    }

    /// 自然文クエリを生成AIに解析させ、生レスポンスを返す
    pub async fn generate(&self, user_query: &str, verbose: bool) -> Result<String> {
        let prompt = build_query_prompt(user_query);

        if verbose {
            println!("  プロンプト長: {} chars", prompt.len());
        }

        match (self.provider, self.api_key.as_deref()) {
            (AiProvider::GeminiApi, Some(api_key)) => {
                let response =
                    gemini::generate_content(api_key, &self.model, &prompt, self.timeout).await?;
                if verbose {
                    let preview: String = response.chars().take(500).collect();
                    println!("  レスポンス: {}", preview);
                }
                Ok(response)
            }
            (AiProvider::GeminiApi, None) => Err(PhotoSearchError::MissingApiKey),
            (provider, _) => {
                // プロンプトは改行をスペースに置換してCLIに渡す
                let flat_prompt = prompt.replace('\n', " ");
                cli_backend::run_cli(provider, &flat_prompt, verbose).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_provider_needs_no_key() {
        let config = Config {
            api_key: None,
            ..Config::default()
        };
        let generator = QueryGenerator::from_config(&config, AiProvider::Claude).unwrap();
        assert_eq!(generator.provider(), AiProvider::Claude);
        assert!(generator.api_key.is_none());
    }
}

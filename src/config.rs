use crate::ai_provider::AiProvider;
use crate::error::{PhotoSearchError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// APIキーを読む環境変数（先にあるものを優先）
const API_KEY_ENV_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    /// 既定のカタログファイル
    pub catalog_path: Option<PathBuf>,
    pub provider: AiProvider,
    pub model: String,
    /// 1ページの表示枚数（条件フォーム検索）
    pub page_size: usize,
    /// グリッドの列数
    pub grid_columns: usize,
    pub fetch_retries: u32,
    pub retry_delay_secs: u64,
    pub fetch_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default_config())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| PhotoSearchError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("photo-search").join("config.json"))
    }

    fn default_config() -> Self {
        Self {
            api_key: None,
            catalog_path: None,
            provider: AiProvider::GeminiApi,
            model: "gemini-1.5-flash".into(),
            page_size: 6,
            grid_columns: 3,
            fetch_retries: 3,
            retry_delay_secs: 5,
            fetch_timeout_secs: 5,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(PhotoSearchError::Config("page_size は1以上にしてください".into()));
        }
        if self.grid_columns == 0 {
            return Err(PhotoSearchError::Config("grid_columns は1以上にしてください".into()));
        }
        if self.fetch_retries == 0 {
            return Err(PhotoSearchError::Config("fetch_retries は1以上にしてください".into()));
        }
        Ok(())
    }

    pub fn get_api_key(&self) -> Result<String> {
        // 環境変数を優先
        for var in API_KEY_ENV_VARS {
            if let Ok(key) = std::env::var(var) {
                if !key.trim().is_empty() {
                    return Ok(key);
                }
            }
        }

        self.api_key.clone().ok_or(PhotoSearchError::MissingApiKey)
    }

    pub fn set_api_key(&mut self, key: String) -> Result<()> {
        self.api_key = Some(key);
        self.save()
    }

    pub fn set_catalog_path(&mut self, path: PathBuf) -> Result<()> {
        self.catalog_path = Some(path);
        self.save()
    }

    /// カタログパスを決定（引数 > 設定 > カレントの repo1.csv）
    pub fn resolve_catalog_path(&self, arg: Option<PathBuf>) -> PathBuf {
        arg.or_else(|| self.catalog_path.clone())
            .unwrap_or_else(|| PathBuf::from("repo1.csv"))
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

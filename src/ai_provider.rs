use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// 自然文クエリの解析に使う生成AI
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AiProvider {
    /// Claude CLI
    Claude,
    /// Codex CLI
    Codex,
    /// Gemini CLI
    Gemini,
    /// Gemini REST API（APIキー必須）
    GeminiApi,
}

impl AiProvider {
    /// CLI系プロバイダーの実行コマンド名（APIはNone）
    pub fn command_name(&self) -> Option<&'static str> {
        match self {
            AiProvider::Claude => Some("claude"),
            AiProvider::Codex => Some("codex"),
            AiProvider::Gemini => Some("gemini"),
            AiProvider::GeminiApi => None,
        }
    }

    /// プロンプトを渡すCLI引数
    pub fn command_args(&self, prompt: &str) -> Vec<String> {
        match self {
            AiProvider::Claude => vec![
                "-p".into(),
                prompt.into(),
                "--output-format".into(),
                "text".into(),
            ],
            AiProvider::Codex => vec!["exec".into(), prompt.into()],
            AiProvider::Gemini => vec!["-p".into(), prompt.into()],
            AiProvider::GeminiApi => Vec::new(),
        }
    }
}

impl std::fmt::Display for AiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AiProvider::Claude => write!(f, "claude"),
            AiProvider::Codex => write!(f, "codex"),
            AiProvider::Gemini => write!(f, "gemini"),
            AiProvider::GeminiApi => write!(f, "gemini-api"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_name() {
        assert_eq!(AiProvider::Claude.command_name(), Some("claude"));
        assert_eq!(AiProvider::GeminiApi.command_name(), None);
    }

    #[test]
    fn test_claude_args() {
        let args = AiProvider::Claude.command_args("hello");
        assert_eq!(args, vec!["-p", "hello", "--output-format", "text"]);
    }

    #[test]
    fn test_serde_name() {
        let json = serde_json::to_string(&AiProvider::GeminiApi).unwrap();
        assert_eq!(json, "\"gemini-api\"");
    }
}
